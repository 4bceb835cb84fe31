// Live photo snapshots for one canvas, polled from the store.

use std::cell::Cell;
use std::rc::Rc;

use gloo::timers::callback::Interval;
use wasm_bindgen_futures::spawn_local;
use yew::Callback;

use crate::model::Photo;
use crate::store::PhotoStore;
use crate::util::{clog, cwarn};

/// One photo list read, stamped when its request went out.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub issued: u64,
    pub photos: Vec<Photo>,
}

/// Shared between the timer and in-flight polls.
#[derive(Debug, Default)]
struct PollGate {
    busy: Cell<bool>,
    stopped: Cell<bool>,
}

impl PollGate {
    /// False while a previous poll is still outstanding or after stop.
    fn try_begin(&self) -> bool {
        if self.busy.get() || self.stopped.get() {
            return false;
        }
        self.busy.set(true);
        true
    }

    /// Whether the finished poll's result may still be delivered.
    fn finish(&self) -> bool {
        self.busy.set(false);
        !self.stopped.get()
    }

    fn stop(&self) {
        self.stopped.set(true);
    }
}

/// Emits every snapshot of `canvas_id` to `on_snapshot` until dropped.
/// The first poll starts immediately.
pub struct PhotoFeed {
    gate: Rc<PollGate>,
    _interval: Interval,
}

impl PhotoFeed {
    pub fn start(
        store: Rc<dyn PhotoStore>,
        canvas_id: String,
        poll_interval_ms: u32,
        begin_poll: Callback<(), u64>,
        on_snapshot: Callback<Snapshot>,
    ) -> Self {
        let gate = Rc::new(PollGate::default());
        let poll = {
            let gate = gate.clone();
            move || {
                if !gate.try_begin() {
                    return;
                }
                let gate = gate.clone();
                let issued = begin_poll.emit(());
                let fut = store.list_photos(&canvas_id);
                let on_snapshot = on_snapshot.clone();
                spawn_local(async move {
                    let result = fut.await;
                    if !gate.finish() {
                        return;
                    }
                    match result {
                        Ok(photos) => {
                            clog(&format!("feed snapshot: {} photos", photos.len()));
                            on_snapshot.emit(Snapshot { issued, photos });
                        }
                        // The next tick retries; the board keeps its last snapshot.
                        Err(err) => cwarn(&format!("feed poll failed: {err}")),
                    }
                });
            }
        };
        poll();
        let interval = Interval::new(poll_interval_ms, poll);
        Self {
            gate,
            _interval: interval,
        }
    }
}

impl Drop for PhotoFeed {
    fn drop(&mut self) {
        self.gate.stop();
    }
}
