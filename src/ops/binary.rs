//! Binary elementwise operation framework.
//!
//! Every binary operation goes through the same build sequence: band
//! reconciliation, size reconciliation, a cast of both sides to the smallest
//! common format, and a promoted output header from the operation's format
//! table. The kernel therefore never observes mismatched band counts, sizes,
//! or formats. All of this happens eagerly at node construction; a malformed
//! pipeline never begins tile computation.

use crate::foundation::core::Rect;
use crate::foundation::error::TesseraResult;
use crate::image::buffer::SampleBuffer;
use crate::image::format::{BandFormat, FormatTable};
use crate::image::header::{DemandStyle, ImageHeader};
use crate::image::node::{Image, Recipe};
use crate::ops::conversion::{band_reconcile, cast, size_reconcile};

/// Per-format kernel entry: inputs are already reconciled and cast to the
/// common format, the output buffer is pre-sized in the promoted format.
pub(crate) type ProcessFn =
    fn(BandFormat, &SampleBuffer, &SampleBuffer, &mut SampleBuffer) -> TesseraResult<()>;

/// Static descriptor of a binary elementwise operation.
pub(crate) struct BinaryOp {
    pub(crate) name: &'static str,
    /// Output format indexed by common input format.
    pub(crate) table: FormatTable,
    pub(crate) process: ProcessFn,
}

struct BinaryRecipe {
    op: &'static BinaryOp,
    left: Image,
    right: Image,
    common: BandFormat,
    out_format: BandFormat,
}

impl Recipe for BinaryRecipe {
    fn name(&self) -> &'static str {
        self.op.name
    }

    fn compute(&self, rect: Rect) -> TesseraResult<SampleBuffer> {
        // Identity demand mapping: an elementwise output rect needs exactly
        // the same rect from each upstream.
        let left = self.left.pull(rect)?;
        let right = self.right.pull(rect)?;
        let scalars =
            rect.pixels() * self.left.bands() as usize * self.out_format.components();
        let mut out = SampleBuffer::zeros(self.out_format, scalars);
        (self.op.process)(self.common, &left, &right, &mut out)?;
        Ok(out)
    }
}

/// Build a binary elementwise node over two arbitrary inputs.
pub(crate) fn build_binary(
    op: &'static BinaryOp,
    left: &Image,
    right: &Image,
) -> TesseraResult<Image> {
    let (left, right) = band_reconcile(left, right)?;
    let (left, right) = size_reconcile(&left, &right)?;
    let common = BandFormat::common(left.format(), right.format());
    let left = cast(&left, common)?;
    let right = cast(&right, common)?;
    let out_format = op.table.resolve(common);
    let header = ImageHeader::new(
        left.width(),
        left.height(),
        left.bands(),
        out_format,
        DemandStyle::Any,
    )?;
    Ok(Image::from_recipe(
        header,
        BinaryRecipe {
            op,
            left,
            right,
            common,
            out_format,
        },
    ))
}
