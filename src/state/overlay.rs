// Optimistic position overrides layered over the live photo snapshot.
//
// Merge rule: the photo under an active drag always shows its local
// candidate. A released drag keeps showing its committed position while the
// write is in flight, and after it resolves, until a snapshot arrives whose
// poll was issued after the resolution. Every other photo shows the
// snapshot value.

use std::collections::HashMap;

use crate::model::{LogicalPosition, Photo, PhotoId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Commit {
    InFlight,
    /// Resolved at this overlay clock reading.
    Resolved { at: u64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Pending {
    position: LogicalPosition,
    state: Commit,
    /// Distinguishes successive drags of the same photo.
    seq: u64,
}

#[derive(Clone, Debug, Default)]
pub struct PositionOverlay {
    active: Option<(PhotoId, LogicalPosition)>,
    pending: HashMap<PhotoId, Pending>,
    /// Orders commits, resolutions and poll issues against each other.
    clock: u64,
}

impl PositionOverlay {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    pub fn set_active(&mut self, id: PhotoId, position: LogicalPosition) {
        self.active = Some((id, position));
    }

    /// Moves the active override into the in-flight set and returns the
    /// ticket `resolve` expects.
    pub fn commit(&mut self, id: PhotoId, position: LogicalPosition) -> u64 {
        if self.active.as_ref().is_some_and(|(a, _)| *a == id) {
            self.active = None;
        }
        let seq = self.tick();
        self.pending.insert(
            id,
            Pending {
                position,
                state: Commit::InFlight,
                seq,
            },
        );
        seq
    }

    /// Marks a write as finished. A ticket from an older drag of the same
    /// photo is ignored so it cannot release a newer in-flight override.
    pub fn resolve(&mut self, id: &PhotoId, seq: u64) {
        let at = self.tick();
        if let Some(p) = self.pending.get_mut(id) {
            if p.seq == seq && p.state == Commit::InFlight {
                p.state = Commit::Resolved { at };
            }
        }
    }

    /// Stamp for a snapshot read that is about to be sent to the store.
    pub fn issue_poll(&mut self) -> u64 {
        self.tick()
    }

    /// Applies a store snapshot whose read was issued at `issued`. Resolved
    /// writes give way only to reads issued after they resolved; overrides
    /// for photos that no longer exist are forgotten.
    pub fn reconcile(&mut self, snapshot: &[Photo], issued: u64) {
        self.pending.retain(|id, p| {
            let superseded = match p.state {
                Commit::InFlight => false,
                Commit::Resolved { at } => issued > at,
            };
            !superseded && snapshot.iter().any(|photo| photo.id == *id)
        });
        if let Some((id, _)) = &self.active {
            if !snapshot.iter().any(|photo| photo.id == *id) {
                self.active = None;
            }
        }
    }

    pub fn position_for(&self, photo: &Photo) -> LogicalPosition {
        if let Some((id, pos)) = &self.active {
            if *id == photo.id {
                return *pos;
            }
        }
        match self.pending.get(&photo.id) {
            Some(p) => p.position,
            None => photo.position,
        }
    }

    #[cfg(test)]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
