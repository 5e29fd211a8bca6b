use crate::geometry::{normalize_point, Point};

/// A mouse or touch event reduced to the coordinates the surface cares about.
#[derive(Clone, Debug, PartialEq)]
pub enum PointerInput {
    Mouse { client_x: f64, client_y: f64 },
    Touch { touches: Vec<Point> },
}

impl PointerInput {
    pub fn mouse(client_x: f64, client_y: f64) -> Self {
        PointerInput::Mouse { client_x, client_y }
    }

    pub fn touch(touches: Vec<Point>) -> Self {
        PointerInput::Touch { touches }
    }

    /// Layout-pixel viewport position of the active pointer. Touch events use
    /// their first touch point.
    pub fn position(&self) -> Option<Point> {
        match self {
            PointerInput::Mouse { client_x, client_y } => normalize_point(Point {
                x: *client_x as f32,
                y: *client_y as f32,
            }),
            PointerInput::Touch { touches } => touches.first().copied().and_then(normalize_point),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_uses_event_coordinates() {
        let input = PointerInput::mouse(12.0, 34.0);
        assert_eq!(input.position(), Some(Point::new(12.0, 34.0)));
    }

    #[test]
    fn touch_uses_first_touch() {
        let input = PointerInput::touch(vec![Point::new(1.0, 2.0), Point::new(9.0, 9.0)]);
        assert_eq!(input.position(), Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn touch_without_points_has_no_position() {
        assert_eq!(PointerInput::touch(Vec::new()).position(), None);
    }
}
