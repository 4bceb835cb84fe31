// Active pointer table shared by the gesture classifier.

use std::collections::BTreeMap;

use super::coords::ScreenPoint;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

impl PointerKind {
    pub fn from_pointer_type(value: &str) -> Self {
        match value {
            "touch" => PointerKind::Touch,
            "pen" => PointerKind::Pen,
            _ => PointerKind::Mouse,
        }
    }
}

/// One pointer event, already translated into viewport-relative pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    pub id: i32,
    pub kind: PointerKind,
    pub point: ScreenPoint,
    /// DOM `button` on pointerdown; 0 is the primary button.
    pub button: i16,
}

impl PointerInput {
    pub fn new(id: i32, kind: PointerKind, x: f64, y: f64) -> Self {
        Self {
            id,
            kind,
            point: ScreenPoint::new(x, y),
            button: 0,
        }
    }

    #[cfg(test)]
    pub fn mouse(x: f64, y: f64) -> Self {
        Self::new(1, PointerKind::Mouse, x, y)
    }

    #[cfg(test)]
    pub fn touch(id: i32, x: f64, y: f64) -> Self {
        Self::new(id, PointerKind::Touch, x, y)
    }
}

/// Pointers currently pressed on the board, keyed by pointer id.
#[derive(Clone, Debug, Default)]
pub struct ActivePointers {
    points: BTreeMap<i32, ScreenPoint>,
}

impl ActivePointers {
    pub fn insert(&mut self, id: i32, point: ScreenPoint) {
        self.points.insert(id, point);
    }

    /// Updates a tracked pointer; returns false for pointers that were never
    /// pressed on the board (hover moves).
    pub fn update(&mut self, id: i32, point: ScreenPoint) -> bool {
        match self.points.get_mut(&id) {
            Some(p) => {
                *p = point;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: i32) -> bool {
        self.points.remove(&id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, id: i32) -> Option<ScreenPoint> {
        self.points.get(&id).copied()
    }

    /// Lowest pointer id other than `id`.
    pub fn other_than(&self, id: i32) -> Option<i32> {
        self.points.keys().copied().find(|k| *k != id)
    }

    /// Midpoint and distance of the two given pointers.
    pub fn pair_geometry(&self, a: i32, b: i32) -> Option<(ScreenPoint, f64)> {
        let pa = self.get(a)?;
        let pb = self.get(b)?;
        Some((pa.midpoint(pb), pa.distance(pb)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_type_mapping() {
        assert_eq!(PointerKind::from_pointer_type("touch"), PointerKind::Touch);
        assert_eq!(PointerKind::from_pointer_type("pen"), PointerKind::Pen);
        assert_eq!(PointerKind::from_pointer_type("mouse"), PointerKind::Mouse);
        assert_eq!(PointerKind::from_pointer_type(""), PointerKind::Mouse);
    }

    #[test]
    fn hover_moves_are_not_tracked() {
        let mut p = ActivePointers::default();
        assert!(!p.update(7, ScreenPoint::new(1.0, 1.0)));
        assert!(p.is_empty());
        p.insert(7, ScreenPoint::new(0.0, 0.0));
        assert!(p.update(7, ScreenPoint::new(3.0, 4.0)));
        assert_eq!(p.get(7), Some(ScreenPoint::new(3.0, 4.0)));
    }

    #[test]
    fn pair_geometry_uses_both_points() {
        let mut p = ActivePointers::default();
        p.insert(1, ScreenPoint::new(0.0, 0.0));
        p.insert(2, ScreenPoint::new(6.0, 8.0));
        let (mid, dist) = p.pair_geometry(1, 2).unwrap();
        assert_eq!(mid, ScreenPoint::new(3.0, 4.0));
        assert_eq!(dist, 10.0);
        assert_eq!(p.other_than(1), Some(2));
        assert!(p.remove(2));
        assert_eq!(p.other_than(1), None);
        assert!(p.pair_geometry(1, 2).is_none());
    }
}
