use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex};

use crate::foundation::core::Rect;
use crate::foundation::error::{TesseraError, TesseraResult};
use crate::image::buffer::SampleBuffer;

enum SlotState {
    Building,
    Ready(Arc<SampleBuffer>),
    Failed(String),
}

struct Slot {
    state: Mutex<SlotState>,
    done: Condvar,
}

/// Per-node tile memo, keyed by rectangle.
///
/// The first requester of a key owns the build slot and runs the kernel
/// exactly once; concurrent requesters for the same key block until the
/// build completes and share the resulting buffer. This per-tile lock is
/// the only mutual exclusion in the engine. Failed builds wake all waiters
/// with the error and the slot is dropped, so failures are never cached.
pub(crate) struct TileCache {
    slots: Mutex<HashMap<Rect, Arc<Slot>>>,
}

impl TileCache {
    pub(crate) fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn get_or_build(
        &self,
        rect: Rect,
        build: impl FnOnce() -> TesseraResult<SampleBuffer>,
    ) -> TesseraResult<Arc<SampleBuffer>> {
        let (slot, owner) = {
            let mut slots = self.slots.lock().map_err(poisoned)?;
            match slots.get(&rect) {
                Some(slot) => (Arc::clone(slot), false),
                None => {
                    let slot = Arc::new(Slot {
                        state: Mutex::new(SlotState::Building),
                        done: Condvar::new(),
                    });
                    slots.insert(rect, Arc::clone(&slot));
                    (slot, true)
                }
            }
        };

        if owner {
            let result = build();
            let mut state = slot.state.lock().map_err(poisoned)?;
            match result {
                Ok(buffer) => {
                    let shared = Arc::new(buffer);
                    *state = SlotState::Ready(Arc::clone(&shared));
                    drop(state);
                    slot.done.notify_all();
                    Ok(shared)
                }
                Err(err) => {
                    *state = SlotState::Failed(err.to_string());
                    drop(state);
                    slot.done.notify_all();
                    self.slots.lock().map_err(poisoned)?.remove(&rect);
                    Err(err)
                }
            }
        } else {
            tracing::trace!(?rect, "waiting on in-flight tile build");
            let mut state = slot.state.lock().map_err(poisoned)?;
            loop {
                match &*state {
                    SlotState::Building => {
                        state = slot.done.wait(state).map_err(poisoned)?;
                    }
                    SlotState::Ready(buffer) => return Ok(Arc::clone(buffer)),
                    SlotState::Failed(msg) => {
                        return Err(TesseraError::codec(format!(
                            "shared tile build failed: {msg}"
                        )));
                    }
                }
            }
        }
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> TesseraError {
    TesseraError::invariant("tile cache lock poisoned by a panicked builder")
}
