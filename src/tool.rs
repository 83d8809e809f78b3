use egui::{Color32, Painter, Pos2, Rect, Shape, Stroke, pos2};

use crate::action::{ActionRegistry, trigger_action};
use crate::config::ToolConfig;
use crate::icons::IconCache;

pub const BACK_COLOR: Color32 = Color32::from_rgb(49, 49, 49);
pub const HIGHLIGHT_COLOR: Color32 = Color32::from_rgb(86, 128, 194);
pub const INDICATOR_COLOR: Color32 = Color32::from_gray(200);

const CORNER_RADIUS: f32 = 3.0;
const ICON_INSET: f32 = 10.0;
const INDICATOR_SIZE: f32 = 6.0;
const INDICATOR_MARGIN: f32 = 2.0;

/// The part of a tool that moves when tools are swapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolIdentity {
    pub display_name: String,
    pub icon_id: String,
    pub action_id: Option<String>,
}

/// One entry in the strip or in a flyout.
#[derive(Debug, Clone, PartialEq)]
pub struct Tool {
    identity: ToolIdentity,
    sub_tools: Vec<Tool>,
    is_activated: bool,
    is_highlighted: bool,
    last_paint_region: Option<Rect>,
}

impl Tool {
    pub fn new(
        display_name: impl Into<String>,
        icon_id: impl Into<String>,
        action_id: Option<&str>,
    ) -> Self {
        Self {
            identity: ToolIdentity {
                display_name: display_name.into(),
                icon_id: icon_id.into(),
                action_id: action_id.map(str::to_owned),
            },
            sub_tools: Vec::new(),
            is_activated: false,
            is_highlighted: false,
            last_paint_region: None,
        }
    }

    pub fn with_sub_tools(mut self, sub_tools: Vec<Tool>) -> Self {
        self.sub_tools = sub_tools;
        self
    }

    pub fn from_config(config: &ToolConfig) -> Self {
        Self::new(
            config.display_name.clone(),
            config.icon_id.clone(),
            config.action_id.as_deref(),
        )
        .with_sub_tools(config.sub_tools.iter().map(Tool::from_config).collect())
    }

    pub fn identity(&self) -> &ToolIdentity {
        &self.identity
    }

    pub fn display_name(&self) -> &str {
        &self.identity.display_name
    }

    pub fn icon_id(&self) -> &str {
        &self.identity.icon_id
    }

    pub fn action_id(&self) -> Option<&str> {
        self.identity.action_id.as_deref()
    }

    pub fn sub_tools(&self) -> &[Tool] {
        &self.sub_tools
    }

    pub fn sub_tools_mut(&mut self) -> &mut [Tool] {
        &mut self.sub_tools
    }

    pub fn has_sub_tools(&self) -> bool {
        !self.sub_tools.is_empty()
    }

    pub fn is_activated(&self) -> bool {
        self.is_activated
    }

    pub fn is_highlighted(&self) -> bool {
        self.is_highlighted
    }

    pub fn last_paint_region(&self) -> Option<Rect> {
        self.last_paint_region
    }

    /// Paint the tool into `region` and remember it for hit-testing.
    pub fn paint(&mut self, painter: &Painter, region: Rect, icons: &mut IconCache) {
        self.last_paint_region = Some(region);

        let fill = if self.is_activated || self.is_highlighted {
            HIGHLIGHT_COLOR
        } else {
            BACK_COLOR
        };
        painter.rect_filled(region, CORNER_RADIUS, fill);

        let icon_rect = region.shrink(ICON_INSET);
        if icon_rect.is_positive() {
            let ppp = painter.ctx().pixels_per_point();
            let size = [
                (icon_rect.width() * ppp).round() as usize,
                (icon_rect.height() * ppp).round() as usize,
            ];
            if let Some(texture) = icons.texture(painter.ctx(), self.icon_id(), size) {
                painter.image(
                    texture,
                    icon_rect,
                    Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
        }

        if self.has_sub_tools() {
            let corner = region.right_bottom() - egui::vec2(INDICATOR_MARGIN, INDICATOR_MARGIN);
            let points = vec![
                pos2(corner.x, corner.y - INDICATOR_SIZE),
                corner,
                pos2(corner.x - INDICATOR_SIZE, corner.y),
            ];
            painter.add(Shape::convex_polygon(points, INDICATOR_COLOR, Stroke::NONE));
        }
    }

    /// Press (`true`) or release the tool. Pressing runs its action.
    pub fn activate(&mut self, pressed: bool, actions: &dyn ActionRegistry) {
        self.is_activated = pressed;
        self.is_highlighted = false;
        if pressed {
            log::info!("Tool activated: {}", self.display_name());
            trigger_action(actions, self.action_id());
        }
    }

    pub fn set_highlighted(&mut self, highlighted: bool) {
        self.is_highlighted = highlighted;
    }

    /// Hit-test against the last painted region. Never true before the first paint.
    ///
    /// The region is half-open so neighbouring cells that share an edge never both match.
    pub fn contains(&self, point: Pos2) -> bool {
        self.last_paint_region.is_some_and(|rect| {
            rect.min.x <= point.x
                && point.x < rect.max.x
                && rect.min.y <= point.y
                && point.y < rect.max.y
        })
    }

    /// Drop the paint region so the tool stops matching hit-tests until painted again.
    pub fn forget_paint_region(&mut self) {
        self.last_paint_region = None;
    }

    /// Exchange identity with `sub_tools[index]` and run the new action.
    ///
    /// Sub-tool lists and flags stay where they are. An empty list or a bad index does nothing.
    pub fn swap_with(&mut self, index: usize, actions: &dyn ActionRegistry) {
        let Some(sub_tool) = self.sub_tools.get_mut(index) else {
            log::debug!(
                "Ignoring swap of {} with sub-tool {index} ({} sub-tools)",
                self.identity.display_name,
                self.sub_tools.len()
            );
            return;
        };

        std::mem::swap(&mut self.identity, &mut sub_tool.identity);
        log::debug!(
            "Swapped {} into the strip, {} moved to the flyout",
            self.identity.display_name,
            sub_tool.identity.display_name
        );

        trigger_action(actions, self.action_id());
    }
}
