// Viewport controller: pan offset + uniform zoom about a focal point.

use super::coords::ScreenPoint;
use crate::model::ViewportTransform;

/// One floor for every zoom path (wheel, pinch, buttons).
pub const MIN_SCALE: f64 = 0.15;
pub const MAX_SCALE: f64 = 3.0;
/// Additive scale change per wheel `deltaY` unit.
pub const WHEEL_SENSITIVITY: f64 = 0.001;
pub const BUTTON_ZOOM_IN: f64 = 1.25;
pub const BUTTON_ZOOM_OUT: f64 = 0.8;

pub fn clamp_scale(scale: f64) -> f64 {
    scale.clamp(MIN_SCALE, MAX_SCALE)
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
    /// Set once the initial fit ran, or once the viewer moved the view
    /// themselves; after that the automatic fit never touches the camera.
    pub fitted: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
            fitted: false,
        }
    }
}

impl Camera {
    pub fn transform(&self) -> ViewportTransform {
        ViewportTransform {
            offset_x: self.offset_x,
            offset_y: self.offset_y,
            scale: self.scale,
        }
    }

    pub fn set_transform(&mut self, t: ViewportTransform) {
        self.offset_x = t.offset_x;
        self.offset_y = t.offset_y;
        self.scale = clamp_scale(t.scale);
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Moves to `target_scale` (clamped) keeping `focal` fixed on screen.
    pub fn zoom_to(&mut self, focal: ScreenPoint, target_scale: f64) {
        let new_scale = clamp_scale(target_scale);
        let ratio = new_scale / self.scale;
        self.offset_x = focal.x - (focal.x - self.offset_x) * ratio;
        self.offset_y = focal.y - (focal.y - self.offset_y) * ratio;
        self.scale = new_scale;
    }

    /// Additive zoom: `scale + scale_delta`, clamped, about `focal`.
    pub fn zoom(&mut self, focal: ScreenPoint, scale_delta: f64) {
        self.zoom_to(focal, self.scale + scale_delta);
    }

    pub fn wheel_zoom(&mut self, cursor: ScreenPoint, delta_y: f64) {
        self.zoom(cursor, -delta_y * WHEEL_SENSITIVITY);
    }

    /// Multiplicative zoom used by the on-screen +/- buttons.
    pub fn zoom_by(&mut self, focal: ScreenPoint, factor: f64) {
        self.zoom_to(focal, self.scale * factor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LogicalPosition;
    use crate::state::coords::BoardGeometry;

    const EPS: f64 = 1e-9;

    fn cam(offset_x: f64, offset_y: f64, scale: f64) -> Camera {
        Camera { offset_x, offset_y, scale, fitted: true }
    }

    #[test]
    fn pan_is_unbounded() {
        let mut c = Camera::default();
        c.pan(-50_000.0, 25.0);
        c.pan(10.0, -10.0);
        assert_eq!((c.offset_x, c.offset_y), (-49_990.0, 15.0));
        assert_eq!(c.scale, 1.0);
    }

    #[test]
    fn zoom_keeps_focal_point_fixed() {
        let geo = BoardGeometry::new(800.0, 600.0);
        let starts = [cam(0.0, 0.0, 1.0), cam(-120.0, 75.0, 0.4), cam(310.0, -42.0, 2.2)];
        let focals = [ScreenPoint::new(0.0, 0.0), ScreenPoint::new(400.0, 300.0), ScreenPoint::new(713.0, 19.0)];
        let deltas = [-0.2, -0.05, 0.1, 0.5];
        for start in &starts {
            for focal in focals {
                for delta in deltas {
                    let mut c = start.clone();
                    let logical: LogicalPosition = geo.to_logical(&c.transform(), focal);
                    c.zoom(focal, delta);
                    assert!(c.scale >= MIN_SCALE && c.scale <= MAX_SCALE);
                    let after = geo.to_screen(&c.transform(), logical);
                    assert!((after.x - focal.x).abs() < EPS, "{start:?} {focal:?} {delta}");
                    assert!((after.y - focal.y).abs() < EPS, "{start:?} {focal:?} {delta}");
                }
            }
        }
    }

    #[test]
    fn scale_stays_within_bounds() {
        let mut c = Camera::default();
        for _ in 0..100 {
            c.zoom(ScreenPoint::new(10.0, 10.0), 0.37);
            assert!(c.scale <= MAX_SCALE);
        }
        assert_eq!(c.scale, MAX_SCALE);
        for _ in 0..100 {
            c.wheel_zoom(ScreenPoint::new(10.0, 10.0), 480.0);
            assert!(c.scale >= MIN_SCALE);
        }
        assert_eq!(c.scale, MIN_SCALE);
        for _ in 0..20 {
            c.zoom_by(ScreenPoint::new(0.0, 0.0), BUTTON_ZOOM_OUT);
        }
        assert_eq!(c.scale, MIN_SCALE);
    }

    #[test]
    fn wheel_step_is_proportional_to_delta() {
        let mut c = Camera::default();
        c.wheel_zoom(ScreenPoint::new(0.0, 0.0), -100.0);
        assert!((c.scale - 1.1).abs() < EPS);
        c.wheel_zoom(ScreenPoint::new(0.0, 0.0), 300.0);
        assert!((c.scale - 0.8).abs() < EPS);
    }

    #[test]
    fn zoom_at_clamp_still_pins_focal_point() {
        let geo = BoardGeometry::new(640.0, 480.0);
        let mut c = cam(15.0, 25.0, 2.9);
        let focal = ScreenPoint::new(200.0, 100.0);
        let logical = geo.to_logical(&c.transform(), focal);
        c.zoom(focal, 5.0);
        assert_eq!(c.scale, MAX_SCALE);
        let after = geo.to_screen(&c.transform(), logical);
        assert!((after.x - focal.x).abs() < EPS && (after.y - focal.y).abs() < EPS);
    }
}
