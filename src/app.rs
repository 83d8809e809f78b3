use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::action::ActionMap;
use crate::config::PaletteConfig;
use crate::icons::IconProvider;
use crate::panels::{self, CanvasId, PaletteDock};

const ACTIVITY_CAPACITY: usize = 200;

/// Most recent actions the palette triggered, newest last.
#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: Rc<RefCell<VecDeque<String>>>,
}

impl ActivityLog {
    pub fn push(&self, entry: impl Into<String>) {
        let mut entries = self.entries.borrow_mut();
        if entries.len() == ACTIVITY_CAPACITY {
            entries.pop_front();
        }
        entries.push_back(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

/// Stand-in host: a canvas that can be opened and closed, and an action per configured id
/// that records itself in the activity log.
pub struct PaletteApp {
    dock: PaletteDock,
    actions: ActionMap,
    activity: ActivityLog,
    next_canvas: u64,
}

impl PaletteApp {
    /// Called once before the first frame.
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        config: PaletteConfig,
        icons: Box<dyn IconProvider>,
    ) -> Self {
        Self::with_config(config, icons)
    }

    pub fn with_config(config: PaletteConfig, icons: Box<dyn IconProvider>) -> Self {
        let activity = ActivityLog::default();
        let actions = host_actions(&config, &activity);
        log::info!(
            "Palette loaded: {} tools, {} actions",
            config.tools.len(),
            actions.len()
        );

        Self {
            dock: PaletteDock::from_config(&config, icons),
            actions,
            activity,
            next_canvas: 1,
        }
    }

    pub fn dock(&self) -> &PaletteDock {
        &self.dock
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    pub fn has_canvas(&self) -> bool {
        self.dock.canvas().is_some()
    }

    pub fn open_canvas(&mut self) {
        let canvas = CanvasId(self.next_canvas);
        self.next_canvas += 1;
        self.dock.canvas_changed(Some(canvas));
    }

    pub fn close_canvas(&mut self) {
        self.dock.canvas_changed(None);
    }
}

fn host_actions(config: &PaletteConfig, activity: &ActivityLog) -> ActionMap {
    let mut actions = ActionMap::new();
    for action_id in config.action_ids() {
        let activity = activity.clone();
        let name = action_id.to_owned();
        actions.register(action_id, move || activity.push(name.clone()));
    }
    actions
}

impl eframe::App for PaletteApp {
    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Side panels go before the central panel.
        self.dock.show(ctx, &self.actions);
        panels::canvas_panel(self, ctx);
    }
}
