use egui::{Id, Painter, Pos2, Rect, Shape, Stroke, Vec2, pos2, vec2};

use crate::action::ActionRegistry;
use crate::icons::IconCache;
use crate::input::PointerCapture;
use crate::tool::{BACK_COLOR, Tool};

pub const POPUP_CELL: f32 = 40.0;
pub const POPUP_PITCH: f32 = 40.0;
/// Horizontal gap between the anchor tool and the flyout; the pointer triangle sits in it.
pub const POPUP_GAP: f32 = 8.0;

const POINTER_HALF_HEIGHT: f32 = 8.0;

/// Which side of the anchor tool the flyout opens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupSide {
    #[default]
    Right,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupState {
    #[default]
    Closed,
    Open {
        tool_index: usize,
    },
}

/// Flyout showing one strip tool's sub-tools.
///
/// The popup never owns tools: it remembers the index of the strip tool it shows and the strip
/// hands that tool in for every operation.
#[derive(Debug, Clone)]
pub struct Popup {
    id: Id,
    state: PopupState,
    pending_tool: Option<usize>,
    size: Vec2,
    anchor: Rect,
    bounds: Rect,
}

impl Popup {
    pub fn new(id: Id) -> Self {
        Self {
            id,
            state: PopupState::Closed,
            pending_tool: None,
            size: Vec2::ZERO,
            anchor: Rect::NOTHING,
            bounds: Rect::EVERYTHING,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn state(&self) -> PopupState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PopupState::Open { .. })
    }

    /// Index of the strip tool being shown, if open.
    pub fn tool_index(&self) -> Option<usize> {
        match self.state {
            PopupState::Open { tool_index } => Some(tool_index),
            PopupState::Closed => None,
        }
    }

    /// Size of a flyout holding `count` sub-tools.
    pub fn size_for(count: usize) -> Vec2 {
        if count == 0 {
            Vec2::ZERO
        } else {
            vec2(POPUP_CELL, POPUP_PITCH * (count - 1) as f32 + POPUP_CELL)
        }
    }

    /// Attach the flyout to the region of the triggering tool.
    pub fn move_to(&mut self, anchor: Rect) {
        self.anchor = anchor;
    }

    pub fn anchor(&self) -> Rect {
        self.anchor
    }

    /// Area the flyout has to stay inside, usually the screen.
    pub fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = bounds;
    }

    /// Right of the anchor, unless only the left side has room.
    pub fn side(&self) -> PopupSide {
        let fits_right = self.anchor.right() + POPUP_GAP + self.size.x <= self.bounds.right();
        let fits_left = self.anchor.left() - POPUP_GAP - self.size.x >= self.bounds.left();
        if !fits_right && fits_left {
            PopupSide::Left
        } else {
            PopupSide::Right
        }
    }

    /// Area covered by the sub-tool cells.
    ///
    /// Top-aligned with the anchor, pushed up when that would run past the bottom of the bounds.
    pub fn rect(&self) -> Rect {
        let x = match self.side() {
            PopupSide::Right => self.anchor.right() + POPUP_GAP,
            PopupSide::Left => self.anchor.left() - POPUP_GAP - self.size.x,
        };
        let y = self
            .anchor
            .top()
            .min(self.bounds.bottom() - self.size.y)
            .max(self.bounds.top());
        Rect::from_min_size(pos2(x, y), self.size)
    }

    pub fn cell_rect(&self, index: usize) -> Rect {
        let min = self.rect().min + vec2(0.0, POPUP_PITCH * index as f32);
        Rect::from_min_size(min, Vec2::splat(POPUP_CELL))
    }

    /// Choose the tool whose sub-tools the next `show` will display.
    pub fn set_tool(&mut self, tool_index: usize, tool: &mut Tool) {
        self.pending_tool = Some(tool_index);
        self.size = Self::size_for(tool.sub_tools().len());
        for sub_tool in tool.sub_tools_mut() {
            sub_tool.set_highlighted(false);
            sub_tool.forget_paint_region();
        }
    }

    /// Open the popup and take the pointer. Returns whether it is open afterwards.
    ///
    /// With nothing to show (no tool set, or a tool without sub-tools) the popup stays closed.
    pub fn show(&mut self, capture: &mut PointerCapture) -> bool {
        if self.is_open() {
            return true;
        }

        let Some(tool_index) = self.pending_tool else {
            return false;
        };
        if self.size.y <= 0.0 {
            log::debug!("Popup for tool {tool_index} has no sub-tools, staying closed");
            return false;
        }

        if let Err(err) = capture.grab(self.id) {
            log::warn!("Cannot open popup: {err}");
            return false;
        }

        self.state = PopupState::Open { tool_index };
        log::debug!(
            "Popup opened for tool {tool_index} on the {:?} at {:?}",
            self.side(),
            self.rect()
        );
        true
    }

    /// Close and release the pointer. Safe to call from any path, open or not.
    pub fn close(&mut self, tool: Option<&mut Tool>, capture: &mut PointerCapture) {
        if let Some(tool) = tool {
            for sub_tool in tool.sub_tools_mut() {
                sub_tool.set_highlighted(false);
                sub_tool.forget_paint_region();
            }
        }

        capture.release(self.id);

        if self.is_open() {
            log::debug!("Popup closed");
        }
        self.state = PopupState::Closed;
        self.pending_tool = None;
    }

    pub fn on_pointer_move(&mut self, tool: &mut Tool, pos: Pos2) {
        if !self.is_open() {
            return;
        }
        for sub_tool in tool.sub_tools_mut() {
            let hovered = sub_tool.contains(pos);
            sub_tool.set_highlighted(hovered);
        }
    }

    /// Release ends the flyout: swap if exactly one sub-tool is under the pointer, then close.
    ///
    /// Returns the index of the sub-tool that was swapped in, if any.
    pub fn on_pointer_up(
        &mut self,
        tool: &mut Tool,
        pos: Pos2,
        actions: &dyn ActionRegistry,
        capture: &mut PointerCapture,
    ) -> Option<usize> {
        if !self.is_open() {
            return None;
        }

        let mut hits = tool
            .sub_tools()
            .iter()
            .enumerate()
            .filter(|(_, sub_tool)| sub_tool.contains(pos))
            .map(|(index, _)| index);

        let picked = match (hits.next(), hits.next()) {
            (Some(index), None) => Some(index),
            _ => None,
        };

        if let Some(index) = picked {
            tool.swap_with(index, actions);
        }

        self.close(Some(tool), capture);
        picked
    }

    pub fn paint(&mut self, painter: &Painter, tool: &mut Tool, icons: &mut IconCache) {
        if !self.is_open() {
            return;
        }

        let rect = self.rect();
        let tip_y = self.anchor.center().y;
        let (base_x, tip_x) = match self.side() {
            PopupSide::Right => (rect.left(), self.anchor.right() + 1.0),
            PopupSide::Left => (rect.right(), self.anchor.left() - 1.0),
        };
        let pointer = vec![
            pos2(base_x, tip_y - POINTER_HALF_HEIGHT),
            pos2(base_x, tip_y + POINTER_HALF_HEIGHT),
            pos2(tip_x, tip_y),
        ];
        painter.add(Shape::convex_polygon(pointer, BACK_COLOR, Stroke::NONE));

        for index in 0..tool.sub_tools().len() {
            let cell = self.cell_rect(index);
            tool.sub_tools_mut()[index].paint(painter, cell, icons);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionMap;
    use crate::icons::{IconError, IconProvider};
    use egui::{ColorImage, Context, LayerId};

    struct NoIcons;

    impl IconProvider for NoIcons {
        fn resolve_icon(&self, icon_id: &str, _size: [usize; 2]) -> Result<ColorImage, IconError> {
            Err(IconError::NotFound(icon_id.to_owned()))
        }
    }

    fn shape_group() -> Tool {
        Tool::new("Rectangle", "krita_tool_rectangle", Some("rect")).with_sub_tools(vec![
            Tool::new("Ellipse", "krita_tool_ellipse", Some("ellipse")),
            Tool::new("Polygon", "krita_tool_polygon", Some("polygon")),
        ])
    }

    fn anchor_cell() -> Rect {
        Rect::from_min_size(pos2(10.0, 50.0), vec2(40.0, 40.0))
    }

    fn open_popup(tool: &mut Tool, capture: &mut PointerCapture) -> Popup {
        let mut popup = Popup::new(Id::new("popup"));
        popup.move_to(anchor_cell());
        popup.set_tool(3, tool);
        assert!(popup.show(capture));

        let painter = Painter::new(Context::default(), LayerId::background(), Rect::EVERYTHING);
        let mut icons = IconCache::new(Box::new(NoIcons), 4);
        popup.paint(&painter, tool, &mut icons);
        popup
    }

    #[test]
    fn test_layout() {
        let mut popup = Popup::new(Id::new("popup"));
        popup.move_to(anchor_cell());
        popup.set_tool(0, &mut shape_group());

        assert_eq!(popup.side(), PopupSide::Right);
        assert_eq!(popup.rect(), Rect::from_min_size(pos2(58.0, 50.0), vec2(40.0, 80.0)));
        assert_eq!(
            popup.cell_rect(1),
            Rect::from_min_size(pos2(58.0, 90.0), vec2(40.0, 40.0))
        );
        assert_eq!(Popup::size_for(0), Vec2::ZERO);
    }

    #[test]
    fn test_flips_left_at_right_edge() {
        let mut popup = Popup::new(Id::new("popup"));
        popup.move_to(Rect::from_min_size(pos2(438.0, 7.0), vec2(40.0, 40.0)));
        popup.set_bounds(Rect::from_min_size(Pos2::ZERO, vec2(480.0, 720.0)));
        popup.set_tool(0, &mut shape_group());

        assert_eq!(popup.side(), PopupSide::Left);
        assert_eq!(popup.rect(), Rect::from_min_size(pos2(390.0, 7.0), vec2(40.0, 80.0)));
        assert!(Rect::from_min_size(Pos2::ZERO, vec2(480.0, 720.0)).contains_rect(popup.rect()));
    }

    #[test]
    fn test_stays_right_when_neither_side_fits() {
        let mut popup = Popup::new(Id::new("popup"));
        popup.move_to(anchor_cell());
        popup.set_bounds(Rect::from_min_size(Pos2::ZERO, vec2(60.0, 720.0)));
        popup.set_tool(0, &mut shape_group());

        assert_eq!(popup.side(), PopupSide::Right);
    }

    #[test]
    fn test_pushed_up_at_bottom_edge() {
        let mut popup = Popup::new(Id::new("popup"));
        popup.move_to(Rect::from_min_size(pos2(10.0, 660.0), vec2(40.0, 40.0)));
        popup.set_bounds(Rect::from_min_size(Pos2::ZERO, vec2(480.0, 720.0)));
        popup.set_tool(0, &mut shape_group());

        assert_eq!(popup.rect(), Rect::from_min_size(pos2(58.0, 640.0), vec2(40.0, 80.0)));
    }

    #[test]
    fn test_flipped_popup_picks_under_pointer() {
        let mut capture = PointerCapture::new();
        let actions = ActionMap::new();
        let mut tool = shape_group();

        let mut popup = Popup::new(Id::new("popup"));
        popup.move_to(Rect::from_min_size(pos2(438.0, 7.0), vec2(40.0, 40.0)));
        popup.set_bounds(Rect::from_min_size(Pos2::ZERO, vec2(480.0, 720.0)));
        popup.set_tool(0, &mut tool);
        assert!(popup.show(&mut capture));

        let painter = Painter::new(Context::default(), LayerId::background(), Rect::EVERYTHING);
        let mut icons = IconCache::new(Box::new(NoIcons), 4);
        popup.paint(&painter, &mut tool, &mut icons);

        let picked = popup.on_pointer_up(&mut tool, pos2(410.0, 67.0), &actions, &mut capture);
        assert_eq!(picked, Some(1));
        assert_eq!(tool.display_name(), "Polygon");
    }

    #[test]
    fn test_show_takes_capture() {
        let mut capture = PointerCapture::new();
        let mut tool = shape_group();
        let popup = open_popup(&mut tool, &mut capture);

        assert_eq!(popup.state(), PopupState::Open { tool_index: 3 });
        assert!(capture.is_held_by(popup.id()));
    }

    #[test]
    fn test_show_without_sub_tools_stays_closed() {
        let mut capture = PointerCapture::new();
        let mut popup = Popup::new(Id::new("popup"));
        popup.set_tool(0, &mut Tool::new("Crop", "tool_crop", None));

        assert!(!popup.show(&mut capture));
        assert!(!popup.is_open());
        assert!(!capture.is_held());
    }

    #[test]
    fn test_show_without_tool_stays_closed() {
        let mut capture = PointerCapture::new();
        let mut popup = Popup::new(Id::new("popup"));
        assert!(!popup.show(&mut capture));
    }

    #[test]
    fn test_show_fails_when_pointer_held_elsewhere() {
        let mut capture = PointerCapture::new();
        capture.grab(Id::new("other")).unwrap();

        let mut popup = Popup::new(Id::new("popup"));
        popup.set_tool(0, &mut shape_group());
        assert!(!popup.show(&mut capture));
        assert!(!popup.is_open());
    }

    #[test]
    fn test_move_highlights_one_sub_tool() {
        let mut capture = PointerCapture::new();
        let mut tool = shape_group();
        let mut popup = open_popup(&mut tool, &mut capture);

        popup.on_pointer_move(&mut tool, popup.cell_rect(1).center());
        assert!(!tool.sub_tools()[0].is_highlighted());
        assert!(tool.sub_tools()[1].is_highlighted());

        popup.on_pointer_move(&mut tool, pos2(0.0, 0.0));
        assert!(tool.sub_tools().iter().all(|sub| !sub.is_highlighted()));
    }

    #[test]
    fn test_release_over_sub_tool_swaps_and_closes() {
        let mut capture = PointerCapture::new();
        let actions = ActionMap::new();
        let mut tool = shape_group();
        let mut popup = open_popup(&mut tool, &mut capture);

        let picked = popup.on_pointer_up(&mut tool, popup.cell_rect(0).center(), &actions, &mut capture);

        assert_eq!(picked, Some(0));
        assert_eq!(tool.display_name(), "Ellipse");
        assert_eq!(tool.sub_tools()[0].display_name(), "Rectangle");
        assert!(!popup.is_open());
        assert!(!capture.is_held());
    }

    #[test]
    fn test_release_on_shared_edge_picks_lower_cell() {
        let mut capture = PointerCapture::new();
        let actions = ActionMap::new();
        let mut tool = shape_group();
        let mut popup = open_popup(&mut tool, &mut capture);

        let edge = pos2(popup.cell_rect(1).center().x, popup.cell_rect(1).min.y);
        let picked = popup.on_pointer_up(&mut tool, edge, &actions, &mut capture);
        assert_eq!(picked, Some(1));
    }

    #[test]
    fn test_release_outside_dismisses() {
        let mut capture = PointerCapture::new();
        let actions = ActionMap::new();
        let mut tool = shape_group();
        let before = tool.clone();
        let mut popup = open_popup(&mut tool, &mut capture);

        let picked = popup.on_pointer_up(&mut tool, pos2(500.0, 500.0), &actions, &mut capture);

        assert_eq!(picked, None);
        assert_eq!(tool.identity(), before.identity());
        assert!(!popup.is_open());
        assert!(!capture.is_held());
        assert!(tool.sub_tools().iter().all(|sub| sub.last_paint_region().is_none()));
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut capture = PointerCapture::new();
        let mut tool = shape_group();
        let mut popup = open_popup(&mut tool, &mut capture);

        popup.close(Some(&mut tool), &mut capture);
        popup.close(None, &mut capture);
        assert!(!popup.is_open());
        assert!(!capture.is_held());
        assert!(!popup.show(&mut capture));
    }
}
