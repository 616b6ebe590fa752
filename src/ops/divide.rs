//! Image division.
//!
//! A zero divisor yields a zero output sample, uniformly across all formats
//! and including `0 / 0`. IEEE division-by-zero semantics do not apply:
//! dividing by an all-zero image produces an all-zero image, never NaN or
//! infinity.

use crate::foundation::error::{TesseraError, TesseraResult};
use crate::image::buffer::SampleBuffer;
use crate::image::format::{BandFormat, FormatTable};
use crate::image::node::Image;
use crate::ops::binary::{BinaryOp, build_binary};

use BandFormat::{Complex, Double, DpComplex, Float};

/// Division promotes every real format up to `Float` except `Double`, which
/// stays `Double`; complex formats keep their precision. The output is just
/// large enough to hold the whole range of possible quotients.
static DIVIDE: BinaryOp = BinaryOp {
    name: "divide",
    // Indexed: UC C US S UI I F X D DX.
    table: FormatTable::new([
        Float, Float, Float, Float, Float, Float, Float, Complex, Double, DpComplex,
    ]),
    process: divide_process,
};

/// Divide `left` by `right`, pixel by pixel.
///
/// Inputs of differing size or band count are reconciled first (zero-pad
/// and one-band replication), then cast up to their smallest common format.
/// Pixels with a zero divisor produce zero.
pub fn divide(left: &Image, right: &Image) -> TesseraResult<Image> {
    build_binary(&DIVIDE, left, right)
}

/// Real division, casting both operands to the output type first so integer
/// quotients below one survive.
macro_rules! rloop {
    ($left:expr, $right:expr, $out:expr, $zero:expr, $O:ty) => {
        for ((q, &l), &r) in $out.iter_mut().zip($left.iter()).zip($right.iter()) {
            *q = if r == $zero { 0.0 } else { l as $O / r as $O };
        }
    };
}

/// Complex division, pivoting on the larger-magnitude divisor component so
/// the intermediate ratio stays small for large dynamic ranges.
macro_rules! cloop {
    ($left:expr, $right:expr, $out:expr, $T:ty) => {
        for ((q, l), r) in $out
            .chunks_exact_mut(2)
            .zip($left.chunks_exact(2))
            .zip($right.chunks_exact(2))
        {
            let (lre, lim) = (l[0] as f64, l[1] as f64);
            let (rre, rim) = (r[0] as f64, r[1] as f64);
            if rre == 0.0 && rim == 0.0 {
                q[0] = 0.0;
                q[1] = 0.0;
            } else if rre.abs() > rim.abs() {
                let a = rim / rre;
                let b = rre + rim * a;
                q[0] = ((lre + lim * a) / b) as $T;
                q[1] = ((lim - lre * a) / b) as $T;
            } else {
                let a = rre / rim;
                let b = rim + rre * a;
                q[0] = ((lre * a + lim) / b) as $T;
                q[1] = ((lim * a - lre) / b) as $T;
            }
        }
    };
}

// Keep the arms here in sync with DIVIDE's format table above.
fn divide_process(
    common: BandFormat,
    left: &SampleBuffer,
    right: &SampleBuffer,
    out: &mut SampleBuffer,
) -> TesseraResult<()> {
    use SampleBuffer as B;
    match (common, left, right, out) {
        (BandFormat::UChar, B::UChar(l), B::UChar(r), B::Float(q)) => rloop!(l, r, q, 0, f32),
        (BandFormat::Char, B::Char(l), B::Char(r), B::Float(q)) => rloop!(l, r, q, 0, f32),
        (BandFormat::UShort, B::UShort(l), B::UShort(r), B::Float(q)) => rloop!(l, r, q, 0, f32),
        (BandFormat::Short, B::Short(l), B::Short(r), B::Float(q)) => rloop!(l, r, q, 0, f32),
        (BandFormat::UInt, B::UInt(l), B::UInt(r), B::Float(q)) => rloop!(l, r, q, 0, f32),
        (BandFormat::Int, B::Int(l), B::Int(r), B::Float(q)) => rloop!(l, r, q, 0, f32),
        (BandFormat::Float, B::Float(l), B::Float(r), B::Float(q)) => rloop!(l, r, q, 0.0, f32),
        (BandFormat::Double, B::Double(l), B::Double(r), B::Double(q)) => {
            rloop!(l, r, q, 0.0, f64)
        }
        (BandFormat::Complex, B::Complex(l), B::Complex(r), B::Complex(q)) => {
            cloop!(l, r, q, f32)
        }
        (BandFormat::DpComplex, B::DpComplex(l), B::DpComplex(r), B::DpComplex(q)) => {
            cloop!(l, r, q, f64)
        }
        (common, ..) => {
            return Err(TesseraError::invariant(format!(
                "divide: no kernel for common format {common:?}"
            )));
        }
    }
    Ok(())
}
