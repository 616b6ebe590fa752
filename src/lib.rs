//! Tessera is a lazy, tile-based pixel-processing engine.
//!
//! Images are nodes in a demand-driven computation graph: building an
//! operation finalizes the output node's header (size, bands, format)
//! synchronously, and pixel data materializes only when a consumer pulls a
//! rectangular region.
//!
//! # Pipeline overview
//!
//! 1. **Build**: `operation(inputs) -> Image` — reconcile sizes and band
//!    counts, promote formats through the operation's table, finalize the
//!    header. A malformed pipeline fails here, before any pixel work.
//! 2. **Pull**: `Image::pull(Rect) -> SampleBuffer` — the scheduler splits
//!    the request to the node's declared granularity, recursively pulls
//!    upstream rectangles, and invokes the node's kernel per tile.
//! 3. **Cache** (optional): [`Image::cached`] memoizes tiles with
//!    at-most-once kernel execution per rectangle key, shared across
//!    concurrent requesters.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Finalized headers**: a node's format/size/bands never change after
//!   construction and are computed from upstream headers, never from pixels.
//! - **Immutable tiles**: a tile returned for rectangle `R` always has
//!   exactly `R`'s dimensions and is never mutated after it is produced.
//! - **Explicit registries**: operations and format handlers live in
//!   registries built at startup and passed by reference, never in ambient
//!   global state.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod engine;
mod foundation;
mod image;
mod legacy;
mod ops;

pub use engine::tile::Tile;
pub use foundation::core::Rect;
pub use foundation::error::{TesseraError, TesseraResult};
pub use image::buffer::SampleBuffer;
pub use image::format::{BandFormat, FORMAT_COUNT, FormatTable};
pub use image::header::{DemandStyle, ImageHeader};
pub use image::node::{Image, Recipe};
pub use legacy::adapter::{
    AccessIntent, AccessMode, MaterializeStrategy, open_header, open_legacy, resolve_strategy,
};
pub use legacy::filename::{LegacyOptions, parse_options, split_options};
#[cfg(feature = "image-codec")]
pub use legacy::image_codec::ImageCrateHandler;
pub use legacy::registry::{FormatFlags, FormatHandler, FormatRegistry};
pub use ops::conversion::{cast, embed_zero, replicate_bands};
pub use ops::divide::divide;
pub use ops::recomb::{matrix_from_rows, recomb};
pub use ops::{OperationBuilder, OperationRegistry, OptionList};
