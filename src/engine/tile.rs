use std::sync::Arc;

use crate::foundation::core::Rect;
use crate::image::buffer::SampleBuffer;

/// Materialized rectangular buffer of pixel samples.
///
/// A tile always has exactly its rectangle's dimensions, in the owning
/// node's finalized format and band count, and is immutable once produced.
/// The buffer is shared: cached tiles hand the same allocation to every
/// requester.
#[derive(Clone, Debug)]
pub struct Tile {
    /// Rectangle the samples cover.
    pub rect: Rect,
    /// Row-major samples for `rect`.
    pub buffer: Arc<SampleBuffer>,
}

impl Tile {
    /// Wrap a freshly computed buffer.
    pub fn new(rect: Rect, buffer: SampleBuffer) -> Self {
        Self {
            rect,
            buffer: Arc::new(buffer),
        }
    }
}
