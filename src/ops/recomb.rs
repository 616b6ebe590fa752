//! Linear band recombination.
//!
//! Each pixel of a K-band input is treated as a K-element vector and
//! multiplied by an M x K coefficient matrix to produce an M-band output
//! pixel. Useful for colour space conversions and other per-pixel linear
//! maps.

use crate::foundation::core::Rect;
use crate::foundation::error::{TesseraError, TesseraResult};
use crate::image::buffer::SampleBuffer;
use crate::image::format::{BandFormat, check_noncomplex};
use crate::image::header::{DemandStyle, ImageHeader};
use crate::image::node::{Image, Recipe};
use crate::ops::conversion::real_to_f64;

/// Strip height for recombination pulls; the kernel walks whole rows, so the
/// node asks for full-width strips.
const STRIP_ROWS: u32 = 16;

struct RecombRecipe {
    input: Image,
    /// Row-major M x K coefficients.
    coeff: Vec<f64>,
    k: usize,
    m: usize,
    out_format: BandFormat,
}

macro_rules! recomb_loop {
    ($pixels:expr, $out:expr, $coeff:expr, $k:expr, $m:expr, $O:ty) => {
        for (pin, qout) in $pixels.chunks_exact($k).zip($out.chunks_exact_mut($m)) {
            for (v, qv) in qout.iter_mut().enumerate() {
                let row = &$coeff[v * $k..(v + 1) * $k];
                let mut t = 0.0f64;
                for (&c, &s) in row.iter().zip(pin.iter()) {
                    t += c * (s as f64);
                }
                *qv = t as $O;
            }
        }
    };
}

impl Recipe for RecombRecipe {
    fn name(&self) -> &'static str {
        "recomb"
    }

    fn compute(&self, rect: Rect) -> TesseraResult<SampleBuffer> {
        // Row-preserving demand: the same rows are pulled upstream; only the
        // band axis changes width, and that is the matrix's concern.
        let pixels = self.input.pull(rect)?;
        let mut out = SampleBuffer::zeros(self.out_format, rect.pixels() * self.m);
        use SampleBuffer as B;
        match (&pixels, &mut out) {
            (B::UChar(p), B::Float(q)) => recomb_loop!(p, q, self.coeff, self.k, self.m, f32),
            (B::Char(p), B::Float(q)) => recomb_loop!(p, q, self.coeff, self.k, self.m, f32),
            (B::UShort(p), B::Float(q)) => recomb_loop!(p, q, self.coeff, self.k, self.m, f32),
            (B::Short(p), B::Float(q)) => recomb_loop!(p, q, self.coeff, self.k, self.m, f32),
            (B::UInt(p), B::Float(q)) => recomb_loop!(p, q, self.coeff, self.k, self.m, f32),
            (B::Int(p), B::Float(q)) => recomb_loop!(p, q, self.coeff, self.k, self.m, f32),
            (B::Float(p), B::Float(q)) => recomb_loop!(p, q, self.coeff, self.k, self.m, f32),
            (B::Double(p), B::Double(q)) => recomb_loop!(p, q, self.coeff, self.k, self.m, f64),
            (pixels, _) => {
                return Err(TesseraError::invariant(format!(
                    "recomb: no kernel for input format {:?}",
                    pixels.format()
                )));
            }
        }
        Ok(out)
    }
}

/// Recombine `input`'s bands through the matrix image `matrix`.
///
/// `matrix` must be a one-band, non-complex image whose width equals the
/// input's band count; its height becomes the output band count. The output
/// is `Float` unless the input is `Double`, in which case it stays
/// `Double`. Complex input is rejected. The coefficients are materialized
/// to `f64` once, when the node is built.
pub fn recomb(input: &Image, matrix: &Image) -> TesseraResult<Image> {
    check_noncomplex("recomb", input.format())?;
    check_noncomplex("recomb matrix", matrix.format())?;
    if matrix.bands() != 1 {
        return Err(TesseraError::configuration(
            "recomb: matrix must have exactly one band",
        ));
    }
    if input.bands() != matrix.width() {
        return Err(TesseraError::configuration(format!(
            "recomb: input has {} bands but the matrix is {} wide",
            input.bands(),
            matrix.width()
        )));
    }

    let coeff_buffer = matrix.pull(matrix.header().extent())?;
    let coeff = real_to_f64(&coeff_buffer).ok_or_else(|| {
        TesseraError::invariant("recomb: complex matrix survived the noncomplex check")
    })?;

    let out_format = if input.format() == BandFormat::Double {
        BandFormat::Double
    } else {
        BandFormat::Float
    };
    let header = ImageHeader::new(
        input.width(),
        input.height(),
        matrix.height(),
        out_format,
        DemandStyle::ThinStrip { rows: STRIP_ROWS },
    )?;
    Ok(Image::from_recipe(
        header,
        RecombRecipe {
            input: input.clone(),
            coeff,
            k: matrix.width() as usize,
            m: matrix.height() as usize,
            out_format,
        },
    ))
}

/// Build a one-band `Double` matrix image from row slices, for use with
/// [`recomb`].
pub fn matrix_from_rows(rows: &[Vec<f64>]) -> TesseraResult<Image> {
    let m = rows.len();
    let k = rows.first().map_or(0, Vec::len);
    if m == 0 || k == 0 {
        return Err(TesseraError::configuration("matrix must be non-empty"));
    }
    if rows.iter().any(|r| r.len() != k) {
        return Err(TesseraError::configuration(
            "matrix rows must all have the same length",
        ));
    }
    let mut data = Vec::with_capacity(m * k);
    for row in rows {
        data.extend_from_slice(row);
    }
    let header = ImageHeader::new(
        k as u32,
        m as u32,
        1,
        BandFormat::Double,
        DemandStyle::Any,
    )?;
    Image::from_buffer(header, SampleBuffer::Double(data))
}
