#![warn(clippy::all, rust_2018_idioms)]

pub mod action;
pub mod app;
pub mod config;
pub mod icons;
pub mod input;
pub mod panels;
pub mod popup;
pub mod strip;
pub mod tool;

pub use action::{ActionMap, ActionRegistry, InvocableAction};
pub use app::{ActivityLog, PaletteApp};
pub use config::{ConfigError, PaletteConfig, ToolConfig};
pub use icons::{IconCache, IconDirectory, IconError, IconProvider};
pub use input::{InputEvent, InputHandler, InputLocation, PointerCapture};
pub use panels::{CanvasId, PaletteDock};
pub use popup::{Popup, PopupSide, PopupState};
pub use strip::ToolStrip;
pub use tool::{Tool, ToolIdentity};
