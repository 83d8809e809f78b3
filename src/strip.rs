use std::time::Duration;

use egui::{Id, Painter, PointerButton, Pos2, Rect, Vec2, vec2};

use crate::action::ActionRegistry;
use crate::config::PaletteConfig;
use crate::icons::IconCache;
use crate::input::{InputEvent, LongPressTimer, PointerCapture};
use crate::popup::Popup;
use crate::tool::Tool;

pub const TOOL_CELL: f32 = 40.0;
pub const TOOL_PITCH: f32 = 45.0;
pub const LEFT_MARGIN: f32 = 10.0;
pub const TOP_MARGIN: f32 = 5.0;

/// Vertical strip of tools and the single router for their pointer input.
#[derive(Debug)]
pub struct ToolStrip {
    tools: Vec<Tool>,
    /// Pressed tool; only meaningful while the timer is armed or the popup is open
    current: Option<usize>,
    timer: LongPressTimer,
    popup: Popup,
    capture: PointerCapture,
}

impl ToolStrip {
    pub fn new(tools: Vec<Tool>, long_press: Duration) -> Self {
        Self {
            tools,
            current: None,
            timer: LongPressTimer::new(long_press),
            popup: Popup::new(Id::new("coolbox_popup")),
            capture: PointerCapture::new(),
        }
    }

    pub fn from_config(config: &PaletteConfig) -> Self {
        Self::new(
            config.tools.iter().map(Tool::from_config).collect(),
            config.long_press(),
        )
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn popup(&self) -> &Popup {
        &self.popup
    }

    pub fn capture(&self) -> &PointerCapture {
        &self.capture
    }

    /// Whether the popup currently owns the pointer.
    pub fn is_captured(&self) -> bool {
        self.capture.is_held_by(self.popup.id())
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn activated_tool(&self) -> Option<&Tool> {
        self.tools.iter().find(|tool| tool.is_activated())
    }

    /// Tool under the pointer: a flyout entry while the popup is open, else a strip entry.
    pub fn hovered_tool(&self) -> Option<&Tool> {
        if let Some(tool) = self.popup.tool_index().and_then(|index| self.tools.get(index)) {
            return tool.sub_tools().iter().find(|sub| sub.is_highlighted());
        }
        self.tools.iter().find(|tool| tool.is_highlighted())
    }

    pub fn is_long_press_armed(&self) -> bool {
        self.timer.is_armed()
    }

    /// Time until the long-press fires, if armed.
    pub fn long_press_remaining(&self, now: f64) -> Option<Duration> {
        self.timer.remaining(now)
    }

    /// Keep the flyout inside `bounds`, flipping it to the left of the strip when needed.
    pub fn set_popup_bounds(&mut self, bounds: Rect) {
        self.popup.set_bounds(bounds);
    }

    /// Size that exactly fits the stack.
    pub fn size(&self) -> Vec2 {
        vec2(
            2.0 * LEFT_MARGIN + TOOL_CELL,
            TOOL_PITCH * self.tools.len() as f32,
        )
    }

    pub fn tool_rect(origin: Pos2, index: usize) -> Rect {
        let min = origin + vec2(LEFT_MARGIN, TOP_MARGIN + TOOL_PITCH * index as f32);
        Rect::from_min_size(min, Vec2::splat(TOOL_CELL))
    }

    /// Paint every tool in its cell below `origin` and return the strip size.
    pub fn layout_and_paint(&mut self, painter: &Painter, origin: Pos2, icons: &mut IconCache) -> Vec2 {
        for (index, tool) in self.tools.iter_mut().enumerate() {
            tool.paint(painter, Self::tool_rect(origin, index), icons);
        }
        self.size()
    }

    pub fn paint_popup(&mut self, painter: &Painter, icons: &mut IconCache) {
        let Some(index) = self.popup.tool_index() else {
            return;
        };
        if let Some(tool) = self.tools.get_mut(index) {
            self.popup.paint(painter, tool, icons);
        }
    }

    /// Route one pointer event. Returns true if anything may need repainting.
    pub fn handle_event(&mut self, event: &InputEvent, now: f64, actions: &dyn ActionRegistry) -> bool {
        if self.popup.is_open() {
            return self.route_to_popup(event, actions);
        }

        match event {
            InputEvent::PointerDown { location, button } => {
                self.on_pointer_down(location.position, *button, now, actions)
            }
            InputEvent::PointerUp { location, .. } => {
                self.on_pointer_up(location.position);
                false
            }
            InputEvent::PointerMove { location } => {
                self.on_pointer_move(location.position);
                true
            }
            InputEvent::PointerLeave { .. } => {
                self.on_pointer_leave();
                true
            }
        }
    }

    fn route_to_popup(&mut self, event: &InputEvent, actions: &dyn ActionRegistry) -> bool {
        let Some(tool) = self.popup.tool_index().and_then(|index| self.tools.get_mut(index)) else {
            self.popup.close(None, &mut self.capture);
            self.current = None;
            return true;
        };

        match event {
            InputEvent::PointerMove { location } => {
                self.popup.on_pointer_move(tool, location.position);
            }
            InputEvent::PointerUp { location, .. } => {
                self.timer.disarm();
                self.popup
                    .on_pointer_up(tool, location.position, actions, &mut self.capture);
                self.current = None;
            }
            InputEvent::PointerLeave { .. } => {
                for sub_tool in tool.sub_tools_mut() {
                    sub_tool.set_highlighted(false);
                }
            }
            InputEvent::PointerDown { .. } => return false,
        }
        true
    }

    /// Press: pick the tool under the pointer, run it, and start the long-press countdown.
    ///
    /// Returns false when the press hit nothing.
    pub fn on_pointer_down(
        &mut self,
        pos: Pos2,
        button: PointerButton,
        now: f64,
        actions: &dyn ActionRegistry,
    ) -> bool {
        if button != PointerButton::Primary {
            return false;
        }

        let Some(index) = self.tools.iter().position(|tool| tool.contains(pos)) else {
            return false;
        };

        for (other, tool) in self.tools.iter_mut().enumerate() {
            if other != index {
                tool.activate(false, actions);
            }
        }

        let tool = &mut self.tools[index];
        tool.activate(true, actions);
        if let Some(region) = tool.last_paint_region() {
            self.popup.move_to(region);
        }

        self.current = Some(index);
        self.timer.arm(now);
        log::debug!("Long-press armed for {}", self.tools[index].display_name());
        true
    }

    /// Release cancels a pending long-press. An open popup closes on its own release.
    pub fn on_pointer_up(&mut self, _pos: Pos2) {
        if self.timer.is_armed() {
            log::debug!("Long-press cancelled");
        }
        self.timer.disarm();
        if !self.popup.is_open() {
            self.current = None;
        }
    }

    pub fn on_pointer_move(&mut self, pos: Pos2) {
        for tool in &mut self.tools {
            let hovered = tool.contains(pos);
            tool.set_highlighted(hovered);
        }
    }

    pub fn on_pointer_leave(&mut self) {
        for tool in &mut self.tools {
            tool.set_highlighted(false);
        }
    }

    /// Drive the long-press timer. Returns true if it fired on this call.
    pub fn tick(&mut self, now: f64) -> bool {
        if !self.timer.poll(now) {
            return false;
        }
        self.on_long_press();
        true
    }

    fn on_long_press(&mut self) {
        let Some(index) = self.current else {
            return;
        };
        let Some(tool) = self.tools.get_mut(index) else {
            self.current = None;
            return;
        };

        log::debug!("Long-press on {}", tool.display_name());
        self.popup.set_tool(index, tool);
        if !self.popup.show(&mut self.capture) {
            self.current = None;
        }
    }

    /// Close the popup from outside the normal release path.
    pub fn close_popup(&mut self) {
        let tool = self
            .popup
            .tool_index()
            .and_then(|index| self.tools.get_mut(index));
        self.popup.close(tool, &mut self.capture);
        self.timer.disarm();
        self.current = None;
    }
}
