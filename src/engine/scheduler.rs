use std::sync::Arc;

use rayon::prelude::*;

use crate::engine::tile::Tile;
use crate::foundation::core::Rect;
use crate::foundation::error::{TesseraError, TesseraResult};
use crate::image::buffer::{SampleBuffer, copy_overlap};
use crate::image::header::{DemandStyle, ImageHeader};
use crate::image::node::{Image, Source};

/// Demand-driven pull: resolve `rect` on `image`, recursing through the
/// node's recipe into upstream pulls.
///
/// The request is split to satisfy the node's declared granularity; strips
/// beyond the first are serviced by rayon workers. An upstream failure
/// aborts the whole request: no partial buffer is returned and no further
/// tile builds are issued once a failure is observed.
#[tracing::instrument(
    level = "debug",
    skip(image, rect),
    fields(
        op = image.op_name(),
        left = rect.left,
        top = rect.top,
        width = rect.width,
        height = rect.height,
    )
)]
pub(crate) fn pull(image: &Image, rect: Rect) -> TesseraResult<SampleBuffer> {
    let header = *image.header();
    if rect.is_empty() {
        return Err(TesseraError::configuration("pull rectangle is empty"));
    }
    if !header.extent().contains(rect) {
        return Err(TesseraError::configuration(format!(
            "pull rectangle {rect:?} outside image extent {:?}",
            header.extent()
        )));
    }

    let tiles = tile_layout(&header, rect);
    if tiles.len() == 1 && tiles[0] == rect {
        return Ok(unshare(produce_tile(image, rect)?.buffer));
    }

    let produced: Vec<Tile> = if tiles.len() > 1 {
        tiles
            .into_par_iter()
            .map(|t| produce_tile(image, t))
            .collect::<TesseraResult<Vec<_>>>()?
    } else {
        tiles
            .into_iter()
            .map(|t| produce_tile(image, t))
            .collect::<TesseraResult<Vec<_>>>()?
    };

    let spp = header.scalars_per_pixel();
    let mut out = SampleBuffer::zeros(header.format, header.scalars_for(rect));
    for tile in &produced {
        copy_overlap(&mut out, rect, &tile.buffer, tile.rect, spp)?;
    }
    Ok(out)
}

/// Split a requested rectangle into pulls that satisfy the node's
/// granularity.
///
/// `Any` nodes take the rectangle as a single tile. `ThinStrip` nodes take
/// full-width strips aligned to multiples of the strip height, clipped at
/// the image bottom; the caller crops the assembly back to the request.
fn tile_layout(header: &ImageHeader, rect: Rect) -> Vec<Rect> {
    match header.demand {
        DemandStyle::Any => vec![rect],
        DemandStyle::ThinStrip { rows } => {
            let mut strips = Vec::new();
            let mut top = (rect.top / rows) * rows;
            while top < rect.bottom() {
                let height = rows.min(header.height - top);
                strips.push(Rect::new(0, top, header.width, height));
                top += rows;
            }
            strips
        }
    }
}

fn produce_tile(image: &Image, rect: Rect) -> TesseraResult<Tile> {
    let buffer = match image.tile_cache() {
        Some(cache) => cache.get_or_build(rect, || compute_tile(image, rect))?,
        None => Arc::new(compute_tile(image, rect)?),
    };
    Ok(Tile { rect, buffer })
}

fn compute_tile(image: &Image, rect: Rect) -> TesseraResult<SampleBuffer> {
    let header = image.header();
    tracing::trace!(op = image.op_name(), ?rect, "computing tile");
    match image.source() {
        Source::Memory(buffer) => {
            if rect == header.extent() {
                return Ok(buffer.clone());
            }
            let spp = header.scalars_per_pixel();
            let mut out = SampleBuffer::zeros(header.format, header.scalars_for(rect));
            copy_overlap(&mut out, rect, buffer, header.extent(), spp)?;
            Ok(out)
        }
        Source::Derived(recipe) => {
            let buffer = recipe.compute(rect)?;
            if buffer.format() != header.format {
                return Err(TesseraError::invariant(format!(
                    "{}: tile format {:?} does not match header format {:?}",
                    recipe.name(),
                    buffer.format(),
                    header.format
                )));
            }
            if buffer.len() != header.scalars_for(rect) {
                return Err(TesseraError::invariant(format!(
                    "{}: tile holds {} scalars for a {}x{} rect of {} bands",
                    recipe.name(),
                    buffer.len(),
                    rect.width,
                    rect.height,
                    header.bands
                )));
            }
            Ok(buffer)
        }
    }
}

fn unshare(buffer: Arc<SampleBuffer>) -> SampleBuffer {
    Arc::try_unwrap(buffer).unwrap_or_else(|shared| (*shared).clone())
}
