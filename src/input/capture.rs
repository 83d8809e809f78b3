use egui::Id;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Pointer already captured by {held_by:?}")]
    AlreadyHeld { held_by: Id },
}

/// Exclusive pointer routing to one transient surface.
///
/// There is exactly one slot; whoever holds it must release before anyone else can grab.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PointerCapture {
    holder: Option<Id>,
}

impl PointerCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grab the pointer for `owner`. Grabbing again as the current holder is fine.
    pub fn grab(&mut self, owner: Id) -> Result<(), CaptureError> {
        match self.holder {
            Some(held_by) if held_by != owner => Err(CaptureError::AlreadyHeld { held_by }),
            _ => {
                self.holder = Some(owner);
                Ok(())
            }
        }
    }

    /// Release the pointer if `owner` holds it. Returns whether anything was released.
    pub fn release(&mut self, owner: Id) -> bool {
        if self.holder == Some(owner) {
            self.holder = None;
            true
        } else {
            false
        }
    }

    pub fn is_held(&self) -> bool {
        self.holder.is_some()
    }

    pub fn is_held_by(&self, owner: Id) -> bool {
        self.holder == Some(owner)
    }
}
