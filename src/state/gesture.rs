// Gesture classification for the board.
//
// Every pointer-down picks exactly one gesture: dragging a photo (owner
// only, pointer on a card), pinching (a second pointer is already down),
// or panning. Moves feed the active gesture only, and releasing its pointer
// finishes it and returns to `Idle`. Wheel zoom sits outside this state
// machine and is accepted at any time.

use super::board::BoardEngine;
use super::coords::ScreenPoint;
use super::drag::DragSession;
use super::touch::{PointerInput, PointerKind};
use crate::model::MoveRequest;
use crate::util::clog;

/// Two fingers closer than this cannot define a zoom ratio.
pub const MIN_PINCH_DISTANCE_PX: f64 = 1.0;

#[derive(Clone, Debug, PartialEq)]
pub enum GestureState {
    Idle,
    Panning {
        pointer_id: i32,
        start_pointer: ScreenPoint,
        start_offset: (f64, f64),
    },
    Pinching {
        pointers: (i32, i32),
        start_distance: f64,
        start_scale: f64,
        last_midpoint: ScreenPoint,
    },
    DraggingPhoto(DragSession),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureKind {
    Idle,
    Panning,
    Pinching,
    DraggingPhoto,
}

impl GestureState {
    pub fn kind(&self) -> GestureKind {
        match self {
            GestureState::Idle => GestureKind::Idle,
            GestureState::Panning { .. } => GestureKind::Panning,
            GestureState::Pinching { .. } => GestureKind::Pinching,
            GestureState::DraggingPhoto(_) => GestureKind::DraggingPhoto,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }
}

/// Whether a gesture of kind `to` may start while `from` is active. A pan is
/// the only gesture another one may take over: a second finger turns it into
/// a pinch.
pub fn can_enter(from: GestureKind, to: GestureKind) -> bool {
    match (from, to) {
        (_, GestureKind::Idle) => true,
        (GestureKind::Idle, _) => true,
        (a, b) if a == b => true,
        (GestureKind::Panning, GestureKind::Pinching) => true,
        _ => false,
    }
}

/// A released drag waiting to be written to the store.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingMove {
    pub request: MoveRequest,
    /// Passed back to `BoardEngine::resolve_commit` once the write settles.
    pub ticket: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GestureOutcome {
    /// Nothing changed.
    Ignored,
    /// View or gesture state changed; re-render.
    Redraw,
    /// A drag finished; re-render and persist the move.
    Commit(PendingMove),
}

impl BoardEngine {
    fn enter(&mut self, next: GestureState) {
        debug_assert!(can_enter(self.gesture.kind(), next.kind()));
        self.gesture = next;
    }

    pub fn on_pointer_down(&mut self, input: PointerInput) -> GestureOutcome {
        if !input.point.is_finite() || !self.geometry.is_measured() {
            clog("pointerdown ignored: no usable coordinates");
            return GestureOutcome::Ignored;
        }
        if input.kind == PointerKind::Mouse && input.button != 0 {
            return GestureOutcome::Ignored;
        }
        self.pointers.insert(input.id, input.point);

        match &self.gesture {
            GestureState::Idle => {
                if self.can_edit() {
                    if let Some(photo_id) = self.find_photo_at(input.point) {
                        if let Some(start_position) = self.displayed_position(&photo_id) {
                            self.overlay.set_active(photo_id.clone(), start_position);
                            self.enter(GestureState::DraggingPhoto(DragSession::start(
                                photo_id,
                                input.id,
                                input.point,
                                start_position,
                            )));
                            return GestureOutcome::Redraw;
                        }
                    }
                }
                if let Some(other) = self.pointers.other_than(input.id) {
                    if self.start_pinch(other, input.id) {
                        return GestureOutcome::Redraw;
                    }
                }
                self.enter(GestureState::Panning {
                    pointer_id: input.id,
                    start_pointer: input.point,
                    start_offset: (self.camera.offset_x, self.camera.offset_y),
                });
                GestureOutcome::Redraw
            }
            GestureState::Panning { pointer_id, .. } => {
                let first = *pointer_id;
                if first != input.id && self.start_pinch(first, input.id) {
                    GestureOutcome::Redraw
                } else {
                    GestureOutcome::Ignored
                }
            }
            GestureState::Pinching { .. } | GestureState::DraggingPhoto(_) => {
                GestureOutcome::Ignored
            }
        }
    }

    fn start_pinch(&mut self, a: i32, b: i32) -> bool {
        let Some((midpoint, distance)) = self.pointers.pair_geometry(a, b) else {
            return false;
        };
        if !distance.is_finite() || distance < MIN_PINCH_DISTANCE_PX {
            return false;
        }
        self.enter(GestureState::Pinching {
            pointers: (a, b),
            start_distance: distance,
            start_scale: self.camera.scale,
            last_midpoint: midpoint,
        });
        true
    }

    pub fn on_pointer_move(&mut self, input: PointerInput) -> GestureOutcome {
        if !input.point.is_finite() {
            return GestureOutcome::Ignored;
        }
        if !self.pointers.update(input.id, input.point) {
            return GestureOutcome::Ignored;
        }
        let scale = self.camera.scale;
        let geometry = self.geometry;
        match &mut self.gesture {
            GestureState::Idle => GestureOutcome::Ignored,
            GestureState::Panning {
                pointer_id,
                start_pointer,
                start_offset,
            } => {
                if *pointer_id != input.id {
                    return GestureOutcome::Ignored;
                }
                let target_x = start_offset.0 + (input.point.x - start_pointer.x);
                let target_y = start_offset.1 + (input.point.y - start_pointer.y);
                let (dx, dy) = (target_x - self.camera.offset_x, target_y - self.camera.offset_y);
                self.camera.pan(dx, dy);
                self.camera.fitted = true;
                GestureOutcome::Redraw
            }
            GestureState::Pinching {
                pointers: (a, b),
                start_distance,
                start_scale,
                last_midpoint,
            } => {
                if input.id != *a && input.id != *b {
                    return GestureOutcome::Ignored;
                }
                let Some((midpoint, distance)) = self.pointers.pair_geometry(*a, *b) else {
                    return GestureOutcome::Ignored;
                };
                if !distance.is_finite() || distance < MIN_PINCH_DISTANCE_PX {
                    return GestureOutcome::Ignored;
                }
                let target = *start_scale * (distance / *start_distance);
                self.camera.pan(midpoint.x - last_midpoint.x, midpoint.y - last_midpoint.y);
                self.camera.zoom_to(midpoint, target);
                self.camera.fitted = true;
                *last_midpoint = midpoint;
                GestureOutcome::Redraw
            }
            GestureState::DraggingPhoto(session) => {
                if session.pointer_id != input.id {
                    return GestureOutcome::Ignored;
                }
                session.update(input.point, &geometry, scale);
                self.overlay
                    .set_active(session.photo_id.clone(), session.candidate);
                GestureOutcome::Redraw
            }
        }
    }

    pub fn on_pointer_up(&mut self, input: PointerInput) -> GestureOutcome {
        let tracked = self.pointers.remove(input.id);
        let outcome = match &self.gesture {
            GestureState::Idle => GestureOutcome::Ignored,
            GestureState::Panning { pointer_id, .. } => {
                if *pointer_id == input.id {
                    self.enter(GestureState::Idle);
                    GestureOutcome::Redraw
                } else {
                    GestureOutcome::Ignored
                }
            }
            GestureState::Pinching { pointers: (a, b), .. } => {
                if *a == input.id || *b == input.id {
                    self.enter(GestureState::Idle);
                    GestureOutcome::Redraw
                } else {
                    GestureOutcome::Ignored
                }
            }
            GestureState::DraggingPhoto(session) => {
                if session.pointer_id == input.id {
                    self.finish_drag()
                } else {
                    GestureOutcome::Ignored
                }
            }
        };
        if self.pointers.is_empty() && !self.gesture.is_idle() {
            // The owning pointer vanished without an up event of its own.
            return match &self.gesture {
                GestureState::DraggingPhoto(_) => self.finish_drag(),
                _ => {
                    self.enter(GestureState::Idle);
                    GestureOutcome::Redraw
                }
            };
        }
        if !tracked && outcome == GestureOutcome::Ignored {
            clog("pointerup ignored: pointer was not pressed on the board");
        }
        outcome
    }

    /// `pointercancel` ends a gesture like a release does; a cancelled drag
    /// is still persisted.
    pub fn on_pointer_cancel(&mut self, input: PointerInput) -> GestureOutcome {
        self.on_pointer_up(input)
    }

    fn finish_drag(&mut self) -> GestureOutcome {
        let GestureState::DraggingPhoto(session) =
            std::mem::replace(&mut self.gesture, GestureState::Idle)
        else {
            return GestureOutcome::Ignored;
        };
        let request = session.finish();
        let ticket = self
            .overlay
            .commit(request.photo_id.clone(), request.position);
        clog(&format!(
            "drag released: {} -> ({:.2}, {:.2})",
            request.photo_id, request.position.x, request.position.y
        ));
        GestureOutcome::Commit(PendingMove { request, ticket })
    }

    /// Wheel zoom about the cursor; independent of the pointer gestures.
    pub fn on_wheel(&mut self, cursor: ScreenPoint, delta_y: f64) -> GestureOutcome {
        if !cursor.is_finite() || !delta_y.is_finite() || delta_y == 0.0 {
            return GestureOutcome::Ignored;
        }
        self.camera.wheel_zoom(cursor, delta_y);
        self.camera.fitted = true;
        self.rebase_gesture();
        GestureOutcome::Redraw
    }

    /// Re-anchors an in-progress pan or pinch after the view changed under
    /// it, so the next move does not undo the wheel, button or fit change.
    pub(crate) fn rebase_gesture(&mut self) {
        let offset = (self.camera.offset_x, self.camera.offset_y);
        let scale = self.camera.scale;
        match &mut self.gesture {
            GestureState::Panning {
                pointer_id,
                start_pointer,
                start_offset,
            } => {
                if let Some(current) = self.pointers.get(*pointer_id) {
                    *start_pointer = current;
                    *start_offset = offset;
                }
            }
            GestureState::Pinching {
                pointers: (a, b),
                start_distance,
                start_scale,
                last_midpoint,
            } => {
                if let Some((midpoint, distance)) = self.pointers.pair_geometry(*a, *b) {
                    if distance.is_finite() && distance >= MIN_PINCH_DISTANCE_PX {
                        *start_distance = distance;
                        *start_scale = scale;
                        *last_midpoint = midpoint;
                    }
                }
            }
            GestureState::Idle | GestureState::DraggingPhoto(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LogicalPosition, Photo, PhotoId};
    use crate::state::camera::{MAX_SCALE, MIN_SCALE};

    fn photo(id: &str, x: f64, y: f64) -> Photo {
        Photo {
            id: PhotoId::new(id),
            display_name: "Ana".into(),
            timestamp: 0.0,
            position: LogicalPosition::new(x, y),
            rotation: 0.0,
            url: Some(format!("https://img.example/{id}.jpg")),
        }
    }

    /// 800x600 viewport, identity view, one photo whose card covers
    /// screen x 400..580, y 420..660.
    fn engine(owner: bool) -> BoardEngine {
        let mut e = BoardEngine::new();
        e.set_viewport_size(800.0, 600.0);
        e.camera.fitted = true;
        e.set_can_edit(owner);
        e.replace_photos(vec![photo("a", 50.0, 50.0)]);
        e
    }

    #[test]
    fn transition_rules() {
        use GestureKind::*;
        assert!(can_enter(Idle, DraggingPhoto));
        assert!(can_enter(Panning, Pinching));
        assert!(can_enter(Pinching, Pinching));
        assert!(can_enter(DraggingPhoto, Idle));
        assert!(!can_enter(DraggingPhoto, Pinching));
        assert!(!can_enter(Pinching, Panning));
        assert!(!can_enter(Panning, DraggingPhoto));
    }

    #[test]
    fn owner_drags_photo_and_commits_once() {
        let mut e = engine(true);
        let down = e.on_pointer_down(PointerInput::mouse(450.0, 500.0));
        assert_eq!(down, GestureOutcome::Redraw);
        assert_eq!(e.gesture.kind(), GestureKind::DraggingPhoto);

        e.on_pointer_move(PointerInput::mouse(530.0, 584.0));
        let shown = e.visible_photos()[0].position;
        assert!((shown.x - 60.0).abs() < 1e-9 && (shown.y - 60.0).abs() < 1e-9);
        // The view itself did not move.
        assert_eq!(e.camera.transform().offset_x, 0.0);

        match e.on_pointer_up(PointerInput::mouse(530.0, 584.0)) {
            GestureOutcome::Commit(pending) => {
                assert_eq!(pending.request.photo_id, PhotoId::new("a"));
                assert!((pending.request.position.x - 60.0).abs() < 1e-9);
                assert!((pending.request.position.y - 60.0).abs() < 1e-9);
            }
            other => panic!("expected commit, got {other:?}"),
        }
        assert!(e.gesture.is_idle());
        // A second up for the same pointer does nothing.
        assert_eq!(e.on_pointer_up(PointerInput::mouse(530.0, 584.0)), GestureOutcome::Ignored);
    }

    #[test]
    fn non_owner_pans_instead_of_dragging() {
        let mut e = engine(false);
        e.on_pointer_down(PointerInput::mouse(450.0, 500.0));
        assert_eq!(e.gesture.kind(), GestureKind::Panning);
        e.on_pointer_move(PointerInput::mouse(470.0, 480.0));
        assert_eq!((e.camera.offset_x, e.camera.offset_y), (20.0, -20.0));
        assert_eq!(e.visible_photos()[0].position, LogicalPosition::new(50.0, 50.0));
        assert_eq!(e.on_pointer_up(PointerInput::mouse(470.0, 480.0)), GestureOutcome::Redraw);
        assert!(e.gesture.is_idle());
    }

    #[test]
    fn owner_pans_on_empty_board() {
        let mut e = engine(true);
        e.on_pointer_down(PointerInput::mouse(10.0, 10.0));
        assert_eq!(e.gesture.kind(), GestureKind::Panning);
    }

    #[test]
    fn moves_without_press_are_ignored() {
        let mut e = engine(true);
        assert_eq!(e.on_pointer_move(PointerInput::mouse(10.0, 10.0)), GestureOutcome::Ignored);
        assert_eq!(e.camera.transform(), crate::model::ViewportTransform::default());
    }

    #[test]
    fn secondary_mouse_button_is_ignored() {
        let mut e = engine(true);
        let mut input = PointerInput::mouse(450.0, 500.0);
        input.button = 2;
        assert_eq!(e.on_pointer_down(input), GestureOutcome::Ignored);
        assert!(e.gesture.is_idle());
    }

    #[test]
    fn non_finite_input_is_ignored() {
        let mut e = engine(true);
        assert_eq!(
            e.on_pointer_down(PointerInput::touch(1, f64::NAN, 3.0)),
            GestureOutcome::Ignored
        );
        assert_eq!(e.on_wheel(ScreenPoint::new(1.0, f64::INFINITY), 10.0), GestureOutcome::Ignored);
    }

    #[test]
    fn unmeasured_viewport_ignores_presses() {
        let mut e = BoardEngine::new();
        assert_eq!(e.on_pointer_down(PointerInput::mouse(1.0, 1.0)), GestureOutcome::Ignored);
    }

    #[test]
    fn pinch_doubles_scale_when_distance_doubles() {
        let mut e = engine(false);
        e.on_pointer_down(PointerInput::touch(1, 100.0, 100.0));
        e.on_pointer_down(PointerInput::touch(2, 200.0, 100.0));
        assert_eq!(e.gesture.kind(), GestureKind::Pinching);
        e.on_pointer_move(PointerInput::touch(1, 50.0, 100.0));
        e.on_pointer_move(PointerInput::touch(2, 250.0, 100.0));
        assert!((e.camera.scale - 2.0).abs() < 1e-9);
    }

    #[test]
    fn pinch_is_clamped() {
        let mut e = engine(false);
        e.on_pointer_down(PointerInput::touch(1, 300.0, 300.0));
        e.on_pointer_down(PointerInput::touch(2, 310.0, 300.0));
        e.on_pointer_move(PointerInput::touch(2, 500.0, 300.0));
        assert_eq!(e.camera.scale, MAX_SCALE);
        e.on_pointer_move(PointerInput::touch(2, 301.0, 300.0));
        assert_eq!(e.camera.scale, MIN_SCALE);
    }

    #[test]
    fn pinch_keeps_midpoint_content_under_fingers() {
        let mut e = engine(false);
        e.on_pointer_down(PointerInput::touch(1, 300.0, 200.0));
        e.on_pointer_down(PointerInput::touch(2, 400.0, 200.0));
        let mid = ScreenPoint::new(350.0, 200.0);
        let logical = e.geometry.to_logical(&e.camera.transform(), mid);
        e.on_pointer_move(PointerInput::touch(1, 275.0, 200.0));
        e.on_pointer_move(PointerInput::touch(2, 425.0, 200.0));
        let after = e.geometry.to_screen(&e.camera.transform(), logical);
        assert!((after.x - mid.x).abs() < 1e-9 && (after.y - mid.y).abs() < 1e-9);
    }

    #[test]
    fn second_finger_turns_pan_into_pinch() {
        let mut e = engine(true);
        e.on_pointer_down(PointerInput::touch(1, 10.0, 10.0));
        assert_eq!(e.gesture.kind(), GestureKind::Panning);
        // Lands on the photo, but pinch wins over both pan and drag here.
        e.on_pointer_down(PointerInput::touch(2, 450.0, 500.0));
        assert_eq!(e.gesture.kind(), GestureKind::Pinching);
        e.on_pointer_up(PointerInput::touch(2, 450.0, 500.0));
        assert!(e.gesture.is_idle());
        // The remaining finger does not resume panning on its own.
        assert_eq!(e.on_pointer_move(PointerInput::touch(1, 90.0, 10.0)), GestureOutcome::Ignored);
    }

    #[test]
    fn drag_is_not_interrupted_by_second_pointer() {
        let mut e = engine(true);
        e.on_pointer_down(PointerInput::touch(1, 450.0, 500.0));
        assert_eq!(e.on_pointer_down(PointerInput::touch(2, 10.0, 10.0)), GestureOutcome::Ignored);
        assert_eq!(e.gesture.kind(), GestureKind::DraggingPhoto);
        assert_eq!(e.on_pointer_move(PointerInput::touch(2, 60.0, 60.0)), GestureOutcome::Ignored);
        assert_eq!(e.on_pointer_up(PointerInput::touch(2, 60.0, 60.0)), GestureOutcome::Ignored);
        assert!(matches!(
            e.on_pointer_up(PointerInput::touch(1, 450.0, 500.0)),
            GestureOutcome::Commit(_)
        ));
    }

    #[test]
    fn cancelled_drag_is_still_committed() {
        let mut e = engine(true);
        e.on_pointer_down(PointerInput::touch(4, 450.0, 500.0));
        e.on_pointer_move(PointerInput::touch(4, 460.0, 500.0));
        assert!(matches!(
            e.on_pointer_cancel(PointerInput::touch(4, 460.0, 500.0)),
            GestureOutcome::Commit(_)
        ));
    }

    #[test]
    fn wheel_zooms_about_cursor_without_pointer_down() {
        let mut e = engine(false);
        let cursor = ScreenPoint::new(200.0, 150.0);
        let logical = e.geometry.to_logical(&e.camera.transform(), cursor);
        assert_eq!(e.on_wheel(cursor, -200.0), GestureOutcome::Redraw);
        assert!((e.camera.scale - 1.2).abs() < 1e-9);
        let after = e.geometry.to_screen(&e.camera.transform(), logical);
        assert!((after.x - cursor.x).abs() < 1e-9 && (after.y - cursor.y).abs() < 1e-9);
        assert!(e.gesture.is_idle());
        assert_eq!(e.on_wheel(cursor, 0.0), GestureOutcome::Ignored);
    }

    #[test]
    fn wheel_during_pan_keeps_its_offset_correction() {
        let mut e = engine(false);
        e.on_pointer_down(PointerInput::mouse(100.0, 100.0));
        e.on_pointer_move(PointerInput::mouse(110.0, 100.0));
        e.on_wheel(ScreenPoint::new(110.0, 100.0), -500.0);
        let after_zoom = (e.camera.offset_x, e.camera.offset_y);
        e.on_pointer_move(PointerInput::mouse(115.0, 100.0));
        assert!((e.camera.offset_x - (after_zoom.0 + 5.0)).abs() < 1e-9);
        assert!((e.camera.offset_y - after_zoom.1).abs() < 1e-9);
    }

    #[test]
    fn wheel_during_pinch_is_kept_by_later_pinch_moves() {
        let mut e = engine(false);
        e.on_pointer_down(PointerInput::touch(1, 100.0, 100.0));
        e.on_pointer_down(PointerInput::touch(2, 200.0, 100.0));
        e.on_pointer_move(PointerInput::touch(2, 300.0, 100.0));
        assert!((e.camera.scale - 2.0).abs() < 1e-9);

        e.on_wheel(ScreenPoint::new(200.0, 100.0), -500.0);
        assert!((e.camera.scale - 2.5).abs() < 1e-9);

        // Fingers 200px apart now grow to 210px: 5% more than the wheel left.
        e.on_pointer_move(PointerInput::touch(2, 310.0, 100.0));
        assert!((e.camera.scale - 2.625).abs() < 1e-9);
    }
}
