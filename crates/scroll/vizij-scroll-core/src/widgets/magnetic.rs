//! Button that leans toward the pointer while hovered.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MagneticButton {
    strength: f32,
    offset: Point,
}

impl MagneticButton {
    pub fn new(strength: f32) -> Self {
        Self {
            strength,
            offset: Point::ZERO,
        }
    }

    #[inline]
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Pointer moved over a button laid out at `bounds`. Moves outside the
    /// hover region release the button like `pointer_leave`.
    pub fn pointer_move(&mut self, pointer: Point, bounds: Rect, reduced: bool) -> Point {
        self.offset = if reduced || !bounds.contains(pointer) {
            Point::ZERO
        } else {
            let c = bounds.center();
            Point::new(
                (pointer.x - c.x) * self.strength,
                (pointer.y - c.y) * self.strength,
            )
        };
        self.offset
    }

    pub fn pointer_leave(&mut self) -> Point {
        self.offset = Point::ZERO;
        self.offset
    }

    pub fn to_css(&self) -> String {
        format!(
            "transform: translate({}px, {}px);",
            self.offset.x, self.offset.y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follows_pointer_and_resets() {
        let mut btn = MagneticButton::new(0.3);
        let bounds = Rect::new(0.0, 0.0, 100.0, 40.0);
        let o = btn.pointer_move(Point::new(80.0, 30.0), bounds, false);
        assert!((o.x - 9.0).abs() < 1e-5);
        assert!((o.y - 3.0).abs() < 1e-5);
        assert_eq!(btn.pointer_leave(), Point::ZERO);
        assert_eq!(btn.offset(), Point::ZERO);
    }

    #[test]
    fn moves_outside_the_hover_region_release() {
        let mut btn = MagneticButton::new(0.3);
        let bounds = Rect::new(0.0, 0.0, 100.0, 40.0);
        btn.pointer_move(Point::new(80.0, 30.0), bounds, false);
        assert_ne!(btn.offset(), Point::ZERO);
        assert_eq!(
            btn.pointer_move(Point::new(300.0, 20.0), bounds, false),
            Point::ZERO
        );
        assert_eq!(btn.offset(), Point::ZERO);
    }

    #[test]
    fn reduced_motion_stays_put() {
        let mut btn = MagneticButton::new(0.5);
        let bounds = Rect::new(0.0, 0.0, 100.0, 40.0);
        assert_eq!(
            btn.pointer_move(Point::new(0.0, 0.0), bounds, true),
            Point::ZERO
        );
    }
}
