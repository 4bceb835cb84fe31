// Initial view that frames every photo on the board.

use super::camera::MIN_SCALE;
use super::coords::BoardGeometry;
use crate::model::{LogicalPosition, PHOTO_HEIGHT_PX, PHOTO_WIDTH_PX, ViewportTransform};

/// Screen margin kept around the fitted content.
pub const FIT_PADDING_PX: f64 = 20.0;
/// Fitting never zooms in past 1:1.
pub const FIT_MAX_SCALE: f64 = 1.0;

/// Pure fit computation; `None` when there is nothing to frame or the
/// viewport has no size yet. Content too large to fit above the zoom floor
/// is centered at the floor scale.
pub fn fit_transform(
    positions: &[LogicalPosition],
    geometry: &BoardGeometry,
) -> Option<ViewportTransform> {
    if !geometry.is_measured() {
        return None;
    }
    let mut it = positions.iter().filter(|p| p.is_finite());
    let first = it.next()?;
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (first.x, first.x, first.y, first.y);
    for p in it {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }

    let board_w = geometry.board_width();
    let board_h = geometry.board_height();
    let content_w = (max_x - min_x) / 100.0 * board_w + PHOTO_WIDTH_PX;
    let content_h = (max_y - min_y) / 100.0 * board_h + PHOTO_HEIGHT_PX;

    let avail_w = (geometry.viewport_width - 2.0 * FIT_PADDING_PX).max(1.0);
    let avail_h = (geometry.viewport_height - 2.0 * FIT_PADDING_PX).max(1.0);
    let scale = (avail_w / content_w)
        .min(avail_h / content_h)
        .min(FIT_MAX_SCALE)
        .max(MIN_SCALE);

    let center_x = min_x / 100.0 * board_w + content_w / 2.0;
    let center_y = min_y / 100.0 * board_h + content_h / 2.0;
    Some(ViewportTransform {
        offset_x: geometry.viewport_width / 2.0 - center_x * scale,
        offset_y: geometry.viewport_height / 2.0 - center_y * scale,
        scale,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn single_photo_is_centered_at_full_size() {
        let geo = BoardGeometry::new(800.0, 600.0);
        let t = fit_transform(&[LogicalPosition::new(50.0, 50.0)], &geo).unwrap();
        assert_eq!(t.scale, 1.0);
        // Card 180x240 anchored at (400, 420) on the board; center (490, 540).
        assert!((t.offset_x - (400.0 - 490.0)).abs() < EPS);
        assert!((t.offset_y - (300.0 - 540.0)).abs() < EPS);
        let left = t.offset_x + 400.0;
        let top = t.offset_y + 420.0;
        assert!((left + 90.0 - 400.0).abs() < EPS);
        assert!((top + 120.0 - 300.0).abs() < EPS);
    }

    #[test]
    fn spread_photos_fit_inside_padding() {
        let geo = BoardGeometry::new(800.0, 600.0);
        let positions = [LogicalPosition::new(10.0, 10.0), LogicalPosition::new(90.0, 90.0)];
        let t = fit_transform(&positions, &geo).unwrap();
        assert!(t.scale < 1.0);
        let mut min = (f64::MAX, f64::MAX);
        let mut max = (f64::MIN, f64::MIN);
        for p in positions {
            let s = geo.to_screen(&t, p);
            min = (min.0.min(s.x), min.1.min(s.y));
            max = (
                max.0.max(s.x + PHOTO_WIDTH_PX * t.scale),
                max.1.max(s.y + PHOTO_HEIGHT_PX * t.scale),
            );
        }
        let tol = 1e-6;
        assert!(min.0 >= FIT_PADDING_PX - tol && min.1 >= FIT_PADDING_PX - tol, "{min:?}");
        assert!(max.0 <= 800.0 - FIT_PADDING_PX + tol, "{max:?}");
        assert!(max.1 <= 600.0 - FIT_PADDING_PX + tol, "{max:?}");
    }

    #[test]
    fn fit_is_deterministic() {
        let geo = BoardGeometry::new(1280.0, 720.0);
        let positions = [
            LogicalPosition::new(5.0, 80.0),
            LogicalPosition::new(62.0, 14.0),
            LogicalPosition::new(33.0, 47.0),
        ];
        let a = fit_transform(&positions, &geo);
        let b = fit_transform(&positions, &geo);
        assert!(a.is_some());
        assert_eq!(a, b);
    }

    #[test]
    fn nothing_to_fit() {
        let geo = BoardGeometry::new(800.0, 600.0);
        assert_eq!(fit_transform(&[], &geo), None);
        let unmeasured = BoardGeometry::default();
        assert_eq!(fit_transform(&[LogicalPosition::new(1.0, 1.0)], &unmeasured), None);
    }

    #[test]
    fn out_of_range_positions_are_still_framed() {
        let geo = BoardGeometry::new(800.0, 600.0);
        let positions = [LogicalPosition::new(-40.0, 10.0), LogicalPosition::new(140.0, 10.0)];
        let t = fit_transform(&positions, &geo).unwrap();
        let left = geo.to_screen(&t, positions[0]);
        let right = geo.to_screen(&t, positions[1]);
        assert!(left.x >= FIT_PADDING_PX - 1e-6);
        assert!(right.x + PHOTO_WIDTH_PX * t.scale <= 800.0 - FIT_PADDING_PX + 1e-6);
    }
}
