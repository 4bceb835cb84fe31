// The board engine: viewport, gestures and the optimistic photo overlay
// behind one value the view layer owns.

use super::autofit::fit_transform;
use super::camera::{BUTTON_ZOOM_IN, BUTTON_ZOOM_OUT, Camera};
use super::coords::{BoardGeometry, ScreenPoint};
use super::gesture::GestureState;
use super::overlay::PositionOverlay;
use super::touch::ActivePointers;
use crate::model::{LogicalPosition, Photo, PhotoId, ViewportTransform};
use crate::util::{clog, cwarn};

/// A photo as it should be drawn right now: snapshot data plus the position
/// after optimistic overrides.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedPhoto<'a> {
    pub photo: &'a Photo,
    pub position: LogicalPosition,
}

/// Topmost card under `point`. Later entries are drawn above earlier ones.
pub fn find_photo_at(
    point: ScreenPoint,
    placed: &[PlacedPhoto<'_>],
    transform: &ViewportTransform,
    geometry: &BoardGeometry,
) -> Option<PhotoId> {
    placed
        .iter()
        .rev()
        .find(|p| geometry.photo_contains(transform, p.position, p.photo.rotation, point))
        .map(|p| p.photo.id.clone())
}

#[derive(Debug, Clone)]
pub struct BoardEngine {
    pub geometry: BoardGeometry,
    pub camera: Camera,
    pub gesture: GestureState,
    pub(crate) pointers: ActivePointers,
    pub(crate) overlay: PositionOverlay,
    photos: Vec<Photo>,
    loaded: bool,
    can_edit: bool,
}

impl Default for BoardEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardEngine {
    pub fn new() -> Self {
        Self {
            geometry: BoardGeometry::default(),
            camera: Camera::default(),
            gesture: GestureState::Idle,
            pointers: ActivePointers::default(),
            overlay: PositionOverlay::default(),
            photos: Vec::new(),
            loaded: false,
            can_edit: false,
        }
    }

    /// Returns true when the size actually changed.
    pub fn set_viewport_size(&mut self, width: f64, height: f64) -> bool {
        let next = BoardGeometry::new(width, height);
        if next == self.geometry {
            return false;
        }
        self.geometry = next;
        self.try_auto_fit();
        true
    }

    pub fn set_can_edit(&mut self, can_edit: bool) {
        self.can_edit = can_edit;
    }

    pub fn can_edit(&self) -> bool {
        self.can_edit
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn transform(&self) -> ViewportTransform {
        self.camera.transform()
    }

    /// Stamps a photo list read just before it is sent; hand the stamp back
    /// to `apply_snapshot` with the result.
    pub fn begin_poll(&mut self) -> u64 {
        self.overlay.issue_poll()
    }

    /// Snapshot read issued now and answered at once.
    #[cfg(test)]
    pub fn replace_photos(&mut self, photos: Vec<Photo>) {
        let issued = self.begin_poll();
        self.apply_snapshot(issued, photos);
    }

    /// Takes a snapshot from the live feed, replacing the old one whole.
    /// `issued` is the `begin_poll` stamp of the read that produced it.
    pub fn apply_snapshot(&mut self, issued: u64, photos: Vec<Photo>) {
        self.overlay.reconcile(&photos, issued);
        if let GestureState::DraggingPhoto(session) = &self.gesture {
            if !photos.iter().any(|p| p.id == session.photo_id) {
                clog(&format!("dragged photo {} left the board", session.photo_id));
                self.gesture = GestureState::Idle;
            }
        }
        self.photos = photos;
        self.loaded = true;
        self.try_auto_fit();
    }

    /// Photos that can be drawn (URL resolved), in draw order, with
    /// optimistic positions applied.
    pub fn visible_photos(&self) -> Vec<PlacedPhoto<'_>> {
        self.photos
            .iter()
            .filter(|p| p.is_resolved())
            .map(|photo| PlacedPhoto {
                photo,
                position: self.overlay.position_for(photo),
            })
            .collect()
    }

    pub fn find_photo_at(&self, point: ScreenPoint) -> Option<PhotoId> {
        find_photo_at(
            point,
            &self.visible_photos(),
            &self.camera.transform(),
            &self.geometry,
        )
    }

    pub(crate) fn displayed_position(&self, id: &PhotoId) -> Option<LogicalPosition> {
        self.photos
            .iter()
            .find(|p| p.id == *id)
            .map(|p| self.overlay.position_for(p))
    }

    pub fn dragging_photo(&self) -> Option<&PhotoId> {
        match &self.gesture {
            GestureState::DraggingPhoto(session) => Some(&session.photo_id),
            _ => None,
        }
    }

    /// One-shot initial fit. Runs the first time a loaded snapshot holds a
    /// drawable photo and the viewport has a size; never again afterwards.
    pub fn try_auto_fit(&mut self) -> bool {
        if self.camera.fitted || !self.loaded {
            return false;
        }
        match self.compute_fit() {
            Some(t) => {
                self.camera.set_transform(t);
                self.camera.fitted = true;
                clog(&format!(
                    "auto-fit: offset=({:.1}, {:.1}) scale={:.3}",
                    t.offset_x, t.offset_y, t.scale
                ));
                true
            }
            None => false,
        }
    }

    /// Explicit "fit" request from the viewer; ignores the one-shot flag.
    pub fn refit(&mut self) -> bool {
        match self.compute_fit() {
            Some(t) => {
                self.camera.set_transform(t);
                self.camera.fitted = true;
                self.rebase_gesture();
                true
            }
            None => false,
        }
    }

    fn compute_fit(&self) -> Option<ViewportTransform> {
        let positions: Vec<LogicalPosition> =
            self.visible_photos().iter().map(|p| p.position).collect();
        fit_transform(&positions, &self.geometry)
    }

    /// Button zoom about the viewport center.
    pub fn zoom_step(&mut self, zoom_in: bool) -> bool {
        if !self.geometry.is_measured() {
            return false;
        }
        let center = ScreenPoint::new(
            self.geometry.viewport_width / 2.0,
            self.geometry.viewport_height / 2.0,
        );
        let factor = if zoom_in { BUTTON_ZOOM_IN } else { BUTTON_ZOOM_OUT };
        self.camera.zoom_by(center, factor);
        self.camera.fitted = true;
        self.rebase_gesture();
        true
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.camera.pan(dx, dy);
        self.camera.fitted = true;
        self.rebase_gesture();
    }

    /// Reports the outcome of a persisted move. Failures are not retried;
    /// the next snapshot from the store decides what is shown.
    pub fn resolve_commit(&mut self, id: &PhotoId, ticket: u64, ok: bool) {
        if ok {
            clog(&format!("move of {} persisted", id));
        } else {
            cwarn(&format!("move of {} was not persisted", id));
        }
        self.overlay.resolve(id, ticket);
    }
}
