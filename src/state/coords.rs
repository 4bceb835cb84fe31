// Logical board space and its mapping to viewport pixels.
//
// Photos live at percentage offsets of a board whose pixel size is the
// viewport width by the viewport height plus one photo height, so a photo at
// `y = 100` still fits flush against the bottom edge. The viewport transform
// translates and uniformly scales that board onto the screen:
//   screen_x = offset_x + (x / 100 * board_width) * scale
//   screen_y = offset_y + (y / 100 * board_height) * scale

use crate::model::{LogicalPosition, PHOTO_HEIGHT_PX, PHOTO_WIDTH_PX, ViewportTransform};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn midpoint(self, other: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }

    pub fn distance(self, other: ScreenPoint) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

/// Measured viewport size; everything else about the board derives from it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoardGeometry {
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl BoardGeometry {
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            viewport_width,
            viewport_height,
        }
    }

    /// False until the viewport element has been laid out with a real size.
    pub fn is_measured(&self) -> bool {
        self.viewport_width.is_finite()
            && self.viewport_height.is_finite()
            && self.viewport_width > 0.0
            && self.viewport_height > 0.0
    }

    pub fn board_width(&self) -> f64 {
        self.viewport_width
    }

    pub fn board_height(&self) -> f64 {
        self.viewport_height + PHOTO_HEIGHT_PX
    }

    /// Board-pixel position (before pan/zoom) of a logical point.
    pub fn board_px(&self, pos: LogicalPosition) -> (f64, f64) {
        (
            pos.x / 100.0 * self.board_width(),
            pos.y / 100.0 * self.board_height(),
        )
    }

    pub fn to_screen(&self, t: &ViewportTransform, pos: LogicalPosition) -> ScreenPoint {
        let (bx, by) = self.board_px(pos);
        ScreenPoint::new(t.offset_x + bx * t.scale, t.offset_y + by * t.scale)
    }

    pub fn to_logical(&self, t: &ViewportTransform, p: ScreenPoint) -> LogicalPosition {
        let bx = (p.x - t.offset_x) / t.scale;
        let by = (p.y - t.offset_y) / t.scale;
        LogicalPosition::new(
            bx / self.board_width() * 100.0,
            by / self.board_height() * 100.0,
        )
    }

    /// Converts a screen-space displacement into a logical one at `scale`.
    pub fn screen_delta_to_logical(&self, dx: f64, dy: f64, scale: f64) -> (f64, f64) {
        (
            dx / scale / self.board_width() * 100.0,
            dy / scale / self.board_height() * 100.0,
        )
    }

    /// Whether `p` lands on the card of a photo anchored at `pos`.
    ///
    /// The card's top-left sits on the anchor and the card is rotated about
    /// its own center, so the point is rotated back before the box test.
    pub fn photo_contains(
        &self,
        t: &ViewportTransform,
        pos: LogicalPosition,
        rotation_deg: f64,
        p: ScreenPoint,
    ) -> bool {
        let origin = self.to_screen(t, pos);
        let half_w = PHOTO_WIDTH_PX * t.scale * 0.5;
        let half_h = PHOTO_HEIGHT_PX * t.scale * 0.5;
        let cx = origin.x + half_w;
        let cy = origin.y + half_h;
        let (sin, cos) = (-rotation_deg.to_radians()).sin_cos();
        let dx = p.x - cx;
        let dy = p.y - cy;
        let lx = dx * cos - dy * sin;
        let ly = dx * sin + dy * cos;
        lx.abs() <= half_w && ly.abs() <= half_h
    }
}
