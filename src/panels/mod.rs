mod canvas_panel;
mod dock_panel;

pub use canvas_panel::canvas_panel;
pub use dock_panel::{CanvasId, PaletteDock};
