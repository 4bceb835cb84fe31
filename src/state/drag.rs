// Per-drag state for moving one photo.

use super::coords::{BoardGeometry, ScreenPoint};
use crate::model::{LogicalPosition, MoveRequest, PhotoId};

/// A photo being dragged by the board owner. Movement only changes the local
/// candidate position; the store hears about it once, on release.
#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    pub photo_id: PhotoId,
    pub pointer_id: i32,
    pub start_pointer: ScreenPoint,
    pub start_position: LogicalPosition,
    pub candidate: LogicalPosition,
}

impl DragSession {
    pub fn start(
        photo_id: PhotoId,
        pointer_id: i32,
        start_pointer: ScreenPoint,
        start_position: LogicalPosition,
    ) -> Self {
        Self {
            photo_id,
            pointer_id,
            start_pointer,
            start_position,
            candidate: start_position,
        }
    }

    /// Re-derives the candidate from the total pointer displacement, at the
    /// scale in effect now so the card tracks the cursor one-to-one.
    pub fn update(&mut self, pointer: ScreenPoint, geometry: &BoardGeometry, scale: f64) {
        let (dx, dy) = geometry.screen_delta_to_logical(
            pointer.x - self.start_pointer.x,
            pointer.y - self.start_pointer.y,
            scale,
        );
        let next = self.start_position.offset(dx, dy).clamped();
        if next.is_finite() {
            self.candidate = next;
        }
    }

    pub fn finish(self) -> MoveRequest {
        MoveRequest {
            photo_id: self.photo_id,
            position: self.candidate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geo() -> BoardGeometry {
        BoardGeometry::new(800.0, 600.0)
    }

    #[test]
    fn candidate_follows_pointer() {
        let mut d = DragSession::start(
            PhotoId::new("p"),
            1,
            ScreenPoint::new(100.0, 100.0),
            LogicalPosition::new(20.0, 30.0),
        );
        // 80px right = 10% of 800, 84px down = 10% of 840.
        d.update(ScreenPoint::new(180.0, 184.0), &geo(), 1.0);
        assert!((d.candidate.x - 30.0).abs() < 1e-9);
        assert!((d.candidate.y - 40.0).abs() < 1e-9);
        // Displacement is measured from the start, not accumulated.
        d.update(ScreenPoint::new(100.0, 100.0), &geo(), 1.0);
        assert_eq!(d.candidate, LogicalPosition::new(20.0, 30.0));
    }

    #[test]
    fn displacement_divides_by_current_scale() {
        let mut d = DragSession::start(
            PhotoId::new("p"),
            1,
            ScreenPoint::new(0.0, 0.0),
            LogicalPosition::new(50.0, 50.0),
        );
        d.update(ScreenPoint::new(80.0, 0.0), &geo(), 2.0);
        assert!((d.candidate.x - 55.0).abs() < 1e-9);
        d.update(ScreenPoint::new(80.0, 0.0), &geo(), 0.5);
        assert!((d.candidate.x - 70.0).abs() < 1e-9);
    }

    #[test]
    fn candidate_is_clamped_to_board() {
        let mut d = DragSession::start(
            PhotoId::new("p"),
            1,
            ScreenPoint::new(0.0, 0.0),
            LogicalPosition::new(95.0, 3.0),
        );
        d.update(ScreenPoint::new(500.0, -500.0), &geo(), 1.0);
        assert_eq!(d.candidate, LogicalPosition::new(100.0, 0.0));
    }

    #[test]
    fn release_at_same_point_gives_same_request() {
        let run = || {
            let mut d = DragSession::start(
                PhotoId::new("p9"),
                3,
                ScreenPoint::new(10.0, 10.0),
                LogicalPosition::new(40.0, 60.0),
            );
            d.update(ScreenPoint::new(37.0, -12.0), &geo(), 0.75);
            d.update(ScreenPoint::new(64.5, 22.0), &geo(), 0.75);
            d.finish()
        };
        assert_eq!(run(), run());
    }
}
