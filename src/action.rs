use std::collections::HashMap;

/// Something the host can run when a tool is picked.
pub trait InvocableAction {
    /// Fire-and-forget.
    fn trigger(&self);
}

impl<F: Fn()> InvocableAction for F {
    fn trigger(&self) {
        self()
    }
}

/// Resolves action identifiers to host actions.
///
/// Lookups that fail are not errors: the palette treats an unknown id as a no-op.
pub trait ActionRegistry {
    fn resolve_action(&self, action_id: &str) -> Option<&dyn InvocableAction>;
}

/// Resolve `action_id` and trigger it if the registry knows it.
///
/// Returns true when an action actually ran.
pub fn trigger_action(actions: &dyn ActionRegistry, action_id: Option<&str>) -> bool {
    let Some(action_id) = action_id.filter(|id| !id.is_empty()) else {
        return false;
    };

    match actions.resolve_action(action_id) {
        Some(action) => {
            log::debug!("Triggering action {action_id}");
            action.trigger();
            true
        }
        None => {
            log::debug!("No action registered for {action_id}, ignoring");
            false
        }
    }
}

/// Map from action id to closure.
#[derive(Default)]
pub struct ActionMap {
    actions: HashMap<String, Box<dyn InvocableAction>>,
}

impl std::fmt::Debug for ActionMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionMap")
            .field("actions", &format!("<{} actions>", self.actions.len()))
            .finish()
    }
}

impl ActionMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the action behind `action_id`.
    pub fn register<F>(&mut self, action_id: impl Into<String>, action: F)
    where
        F: Fn() + 'static,
    {
        let action_id = action_id.into();
        if self.contains(&action_id) {
            log::warn!("Replacing action {action_id}");
        }
        self.actions.insert(action_id, Box::new(action));
    }

    pub fn contains(&self, action_id: &str) -> bool {
        self.actions.contains_key(action_id)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl ActionRegistry for ActionMap {
    fn resolve_action(&self, action_id: &str) -> Option<&dyn InvocableAction> {
        self.actions.get(action_id).map(|action| action.as_ref())
    }
}
