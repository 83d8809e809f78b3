use egui::{LayerId, Order};

use crate::action::ActionRegistry;
use crate::config::PaletteConfig;
use crate::icons::{IconCache, IconProvider};
use crate::input::InputHandler;
use crate::strip::ToolStrip;

const ICON_CACHE_SIZE: usize = 128;

/// Identifies the canvas the host currently has open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanvasId(pub u64);

/// Right-hand dock hosting the tool strip.
///
/// Feeds egui pointer input to the strip, drives the long-press timer from the frame clock and
/// paints the flyout above everything else. The whole strip is disabled while no canvas is open.
#[derive(Debug)]
pub struct PaletteDock {
    strip: ToolStrip,
    icons: IconCache,
    input: InputHandler,
    canvas: Option<CanvasId>,
}

impl PaletteDock {
    pub fn new(strip: ToolStrip, icons: IconCache) -> Self {
        Self {
            strip,
            icons,
            input: InputHandler::new(),
            canvas: None,
        }
    }

    pub fn from_config(config: &PaletteConfig, icons: Box<dyn IconProvider>) -> Self {
        Self::new(
            ToolStrip::from_config(config),
            IconCache::new(icons, ICON_CACHE_SIZE),
        )
    }

    pub fn strip(&self) -> &ToolStrip {
        &self.strip
    }

    pub fn canvas(&self) -> Option<CanvasId> {
        self.canvas
    }

    pub fn is_enabled(&self) -> bool {
        self.canvas.is_some()
    }

    /// The host switched canvases. With no canvas the strip is disabled, any flyout closes and the
    /// pointer history is dropped so re-enabling starts from a clean hover state.
    pub fn canvas_changed(&mut self, canvas: Option<CanvasId>) {
        if self.canvas == canvas {
            return;
        }
        log::info!("Canvas changed: {:?} -> {:?}", self.canvas, canvas);
        self.canvas = canvas;

        if canvas.is_none() {
            self.strip.close_popup();
            self.strip.on_pointer_leave();
            self.input.reset();
        }
    }

    pub fn show(&mut self, ctx: &egui::Context, actions: &dyn ActionRegistry) {
        self.icons.begin_frame();
        self.strip.set_popup_bounds(ctx.screen_rect());
        let enabled = self.is_enabled();

        if enabled {
            self.handle_input(ctx, actions);
        }

        let size = self.strip.size();
        let tooltip = self
            .strip
            .hovered_tool()
            .filter(|_| !self.strip.popup().is_open())
            .map(|tool| tool.display_name().to_owned());

        egui::SidePanel::right("coolbox_dock")
            .resizable(false)
            .exact_width(size.x)
            .show(ctx, |ui| {
                ui.add_enabled_ui(enabled, |ui| {
                    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::hover());
                    self.input.set_widget_rect(rect);

                    if ui.is_rect_visible(rect) {
                        self.strip
                            .layout_and_paint(ui.painter(), rect.min, &mut self.icons);
                    }

                    if let Some(text) = tooltip {
                        response.on_hover_text(text);
                    }
                });
            });

        if self.strip.popup().is_open() {
            let painter = ctx.layer_painter(LayerId::new(Order::Foreground, self.strip.popup().id()));
            self.strip.paint_popup(&painter, &mut self.icons);
        }
    }

    fn handle_input(&mut self, ctx: &egui::Context, actions: &dyn ActionRegistry) {
        let now = ctx.input(|i| i.time);
        let events = self.input.process_input(ctx, self.strip.is_captured());

        let mut changed = false;
        for event in &events {
            changed |= self.strip.handle_event(event, now, actions);
        }
        changed |= self.strip.tick(now);

        if let Some(remaining) = self.strip.long_press_remaining(now) {
            ctx.request_repaint_after(remaining);
        }
        if changed {
            ctx.request_repaint();
        }
    }
}
