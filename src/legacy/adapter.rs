//! Bridge from the legacy direct-access image contract to the pull-based
//! engine.
//!
//! The old API promised random access to any loaded image. Strip-organized
//! containers read lazily cannot honor that promise, so the adapter decides
//! once, at open time, whether to force the handler's node into a fully
//! buffered memory leaf before handing it to the caller.

use std::path::Path;

use crate::foundation::error::TesseraResult;
use crate::image::header::ImageHeader;
use crate::image::node::Image;
use crate::legacy::filename::{parse_options, split_options};
use crate::legacy::registry::{FormatFlags, FormatRegistry};

/// What the caller intends to do with the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessIntent {
    /// Header-only probe; no pixels will be pulled.
    Header,
    /// Full pixel read.
    Pixels,
}

/// How the caller will access pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessMode {
    /// Legacy random access: any rectangle, any order.
    Random,
    /// Top-to-bottom sequential access (the `seq` option).
    Sequential,
}

/// Materialization strategy, resolved once at open time and never
/// re-evaluated per pull.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterializeStrategy {
    /// Header probe only; never force a pixel read.
    HeaderOnly,
    /// Hand the handler's (possibly lazy) node to the caller as-is.
    Lazy,
    /// Fully materialize into a buffered memory node before returning, to
    /// preserve the legacy random-access contract over a strip-organized
    /// container.
    ForceBuffered,
}

/// Choose the materialization strategy from access mode, container
/// organization, and probe-vs-read intent.
///
/// Header probes never materialize. Sequential readers and tile-organized
/// containers keep the handler's node lazy; a strip-organized container
/// accessed in the legacy random-access mode is forced into a buffer.
pub fn resolve_strategy(
    intent: AccessIntent,
    mode: AccessMode,
    flags: FormatFlags,
) -> MaterializeStrategy {
    match intent {
        AccessIntent::Header => MaterializeStrategy::HeaderOnly,
        AccessIntent::Pixels => {
            if mode == AccessMode::Sequential || flags.contains(FormatFlags::TILED) {
                MaterializeStrategy::Lazy
            } else {
                MaterializeStrategy::ForceBuffered
            }
        }
    }
}

/// Read only the header of a legacy `path[:options]` spec.
pub fn open_header(spec: &str, registry: &FormatRegistry) -> TesseraResult<ImageHeader> {
    let (path, _options) = split_options(spec);
    let handler = registry.find(Path::new(&path))?;
    handler.read_header(Path::new(&path))
}

/// Open a legacy `path[:options]` spec for pixel access.
///
/// Recognized options: a decimal page index and the literal `seq` enabling
/// sequential-access mode. The returned node is buffered or lazy per
/// [`resolve_strategy`].
#[tracing::instrument(skip(registry))]
pub fn open_legacy(spec: &str, registry: &FormatRegistry) -> TesseraResult<Image> {
    let (path, options) = split_options(spec);
    let options = parse_options(&options);
    let path = Path::new(&path);
    let handler = registry.find(path)?;

    let mode = if options.sequential {
        AccessMode::Sequential
    } else {
        AccessMode::Random
    };
    let strategy = resolve_strategy(AccessIntent::Pixels, mode, handler.flags(path));
    tracing::debug!(?strategy, page = options.page, "opening legacy image");

    let image = handler.read_pixels(path, options.page)?;
    match strategy {
        MaterializeStrategy::ForceBuffered if !image.is_materialized() => image.materialize(),
        _ => Ok(image),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_matrix_matches_the_legacy_contract() {
        // Header probes never force a buffer.
        assert_eq!(
            resolve_strategy(AccessIntent::Header, AccessMode::Random, FormatFlags::NONE),
            MaterializeStrategy::HeaderOnly
        );
        // Strip container + legacy random access: forced materialization.
        assert_eq!(
            resolve_strategy(AccessIntent::Pixels, AccessMode::Random, FormatFlags::NONE),
            MaterializeStrategy::ForceBuffered
        );
        // Sequential mode opts out of the old contract.
        assert_eq!(
            resolve_strategy(
                AccessIntent::Pixels,
                AccessMode::Sequential,
                FormatFlags::NONE
            ),
            MaterializeStrategy::Lazy
        );
        // Tiled containers satisfy random access lazily.
        assert_eq!(
            resolve_strategy(AccessIntent::Pixels, AccessMode::Random, FormatFlags::TILED),
            MaterializeStrategy::Lazy
        );
    }
}
