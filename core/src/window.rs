//! Candidate window placement.
//!
//! The floating candidate window has a fixed width and a height derived from
//! a fixed row height times the maximum visible row count plus padding. Its
//! frame is fully recomputed from the caret origin and the active screen's
//! visible frame on every turn where it is shown; the window object's only
//! persistent identity is its existence.

use tracing::debug;

use crate::geometry::{Point, Rect};

/// Fixed window width in points.
pub const WINDOW_WIDTH: f64 = 500.0;
/// Height of one candidate row.
pub const ROW_HEIGHT: f64 = 24.0;
/// Maximum number of rows shown at once.
pub const MAX_VISIBLE_ROWS: usize = 9;
/// Vertical padding above and below the rows.
pub const VERTICAL_PADDING: f64 = 8.0;

/// Full window height: rows plus padding on both edges.
pub fn window_height() -> f64 {
    ROW_HEIGHT * MAX_VISIBLE_ROWS as f64 + VERTICAL_PADDING * 2.0
}

/// Compute the window frame for the given caret origin.
///
/// Default placement hangs the window below the caret by anchoring its
/// origin one window-height under the caret origin. When that would push the
/// frame past the bottom of the screen's visible frame, flip it to sit on
/// the caret instead.
pub fn compute_frame(cursor_origin: Point, screen_visible_frame: Rect) -> Rect {
    let height = window_height();
    let y = if cursor_origin.y - height < screen_visible_frame.min_y() {
        cursor_origin.y
    } else {
        cursor_origin.y - height
    };

    let frame = Rect::new(cursor_origin.x, y, WINDOW_WIDTH, height);
    debug!(?cursor_origin, ?frame, "candidate window frame");
    frame
}

/// The candidate window's mutable display state.
///
/// Geometry is always applied whole; there is no incremental adjustment, so
/// reapplying the same frame is a no-op.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowState {
    frame: Rect,
    visible: bool,
}

impl WindowState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the window at a freshly computed frame.
    pub fn show_at(&mut self, frame: Rect) {
        self.frame = frame;
        self.visible = true;
    }

    /// Collapse the window without destroying it. Idempotent.
    pub fn hide(&mut self) {
        self.frame = Rect::zero();
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> Rect {
        Rect::new(0.0, 0.0, 1920.0, 1080.0)
    }

    #[test]
    fn test_default_placement_is_below_the_caret_origin() {
        let frame = compute_frame(Point::new(400.0, 600.0), screen());
        assert_eq!(frame.origin.y, 600.0 - window_height());
        assert_eq!(frame.origin.x, 400.0);
        assert_eq!(frame.width, WINDOW_WIDTH);
        assert_eq!(frame.height, window_height());
    }

    #[test]
    fn test_flips_when_clipped_off_screen() {
        let cursor = Point::new(10.0, 50.0);
        let frame = compute_frame(cursor, screen());
        // Not enough room underneath; the frame anchors at the caret.
        assert_eq!(frame.origin.y, cursor.y);
    }

    #[test]
    fn test_flip_property_holds_across_the_screen() {
        let screen = screen();
        let height = window_height();
        for y in 0..108 {
            let cursor = Point::new(100.0, y as f64 * 10.0);
            let frame = compute_frame(cursor, screen);
            if cursor.y - height < screen.min_y() {
                assert!(frame.origin.y >= cursor.y);
            } else {
                assert_eq!(frame.origin.y, cursor.y - height);
            }
        }
    }

    #[test]
    fn test_hide_is_idempotent() {
        let mut window = WindowState::new();
        window.show_at(compute_frame(Point::new(10.0, 900.0), screen()));
        assert!(window.is_visible());

        window.hide();
        let hidden = window.clone();
        window.hide();
        assert_eq!(window, hidden);
        assert!(window.frame().is_empty());
    }

    #[test]
    fn test_reshow_recomputes_rather_than_adjusts() {
        let mut window = WindowState::new();
        window.show_at(compute_frame(Point::new(10.0, 900.0), screen()));
        let first = window.frame();
        window.show_at(compute_frame(Point::new(600.0, 300.0), screen()));
        assert_ne!(window.frame().origin.x, first.origin.x);
        assert!(window.is_visible());
    }
}
