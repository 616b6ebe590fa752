use crate::foundation::core::Rect;
use crate::foundation::error::{TesseraError, TesseraResult};
use crate::image::format::BandFormat;

/// Flat, row-major pixel sample storage typed by band format.
///
/// Samples are laid out `row * width * bands + column * bands + band`, with
/// complex samples stored as interleaved `(re, im)` scalar pairs, so a
/// complex buffer holds `2 * pixels * bands` scalars.
#[derive(Clone, Debug, PartialEq)]
pub enum SampleBuffer {
    /// Unsigned 8-bit samples.
    UChar(Vec<u8>),
    /// Signed 8-bit samples.
    Char(Vec<i8>),
    /// Unsigned 16-bit samples.
    UShort(Vec<u16>),
    /// Signed 16-bit samples.
    Short(Vec<i16>),
    /// Unsigned 32-bit samples.
    UInt(Vec<u32>),
    /// Signed 32-bit samples.
    Int(Vec<i32>),
    /// 32-bit float samples.
    Float(Vec<f32>),
    /// Interleaved `(re, im)` pairs of 32-bit floats.
    Complex(Vec<f32>),
    /// 64-bit float samples.
    Double(Vec<f64>),
    /// Interleaved `(re, im)` pairs of 64-bit floats.
    DpComplex(Vec<f64>),
}

impl SampleBuffer {
    /// Zero-filled buffer holding `scalars` scalar slots of `format`.
    pub fn zeros(format: BandFormat, scalars: usize) -> Self {
        match format {
            BandFormat::UChar => Self::UChar(vec![0; scalars]),
            BandFormat::Char => Self::Char(vec![0; scalars]),
            BandFormat::UShort => Self::UShort(vec![0; scalars]),
            BandFormat::Short => Self::Short(vec![0; scalars]),
            BandFormat::UInt => Self::UInt(vec![0; scalars]),
            BandFormat::Int => Self::Int(vec![0; scalars]),
            BandFormat::Float => Self::Float(vec![0.0; scalars]),
            BandFormat::Complex => Self::Complex(vec![0.0; scalars]),
            BandFormat::Double => Self::Double(vec![0.0; scalars]),
            BandFormat::DpComplex => Self::DpComplex(vec![0.0; scalars]),
        }
    }

    /// Band format of the stored samples.
    pub fn format(&self) -> BandFormat {
        match self {
            Self::UChar(_) => BandFormat::UChar,
            Self::Char(_) => BandFormat::Char,
            Self::UShort(_) => BandFormat::UShort,
            Self::Short(_) => BandFormat::Short,
            Self::UInt(_) => BandFormat::UInt,
            Self::Int(_) => BandFormat::Int,
            Self::Float(_) => BandFormat::Float,
            Self::Complex(_) => BandFormat::Complex,
            Self::Double(_) => BandFormat::Double,
            Self::DpComplex(_) => BandFormat::DpComplex,
        }
    }

    /// Number of scalar slots (not pixels; complex formats use two per
    /// sample).
    pub fn len(&self) -> usize {
        match self {
            Self::UChar(v) => v.len(),
            Self::Char(v) => v.len(),
            Self::UShort(v) => v.len(),
            Self::Short(v) => v.len(),
            Self::UInt(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Float(v) | Self::Complex(v) => v.len(),
            Self::Double(v) | Self::DpComplex(v) => v.len(),
        }
    }

    /// Return `true` when the buffer holds no scalars.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// View unsigned 8-bit samples, if that is the stored type.
    pub fn as_u8(&self) -> Option<&[u8]> {
        match self {
            Self::UChar(v) => Some(v),
            _ => None,
        }
    }

    /// View signed 8-bit samples, if that is the stored type.
    pub fn as_i8(&self) -> Option<&[i8]> {
        match self {
            Self::Char(v) => Some(v),
            _ => None,
        }
    }

    /// View unsigned 16-bit samples, if that is the stored type.
    pub fn as_u16(&self) -> Option<&[u16]> {
        match self {
            Self::UShort(v) => Some(v),
            _ => None,
        }
    }

    /// View signed 16-bit samples, if that is the stored type.
    pub fn as_i16(&self) -> Option<&[i16]> {
        match self {
            Self::Short(v) => Some(v),
            _ => None,
        }
    }

    /// View unsigned 32-bit samples, if that is the stored type.
    pub fn as_u32(&self) -> Option<&[u32]> {
        match self {
            Self::UInt(v) => Some(v),
            _ => None,
        }
    }

    /// View signed 32-bit samples, if that is the stored type.
    pub fn as_i32(&self) -> Option<&[i32]> {
        match self {
            Self::Int(v) => Some(v),
            _ => None,
        }
    }

    /// View 32-bit float scalars (real samples or interleaved complex pairs).
    pub fn as_f32(&self) -> Option<&[f32]> {
        match self {
            Self::Float(v) | Self::Complex(v) => Some(v),
            _ => None,
        }
    }

    /// View 64-bit float scalars (real samples or interleaved complex pairs).
    pub fn as_f64(&self) -> Option<&[f64]> {
        match self {
            Self::Double(v) | Self::DpComplex(v) => Some(v),
            _ => None,
        }
    }
}

fn copy_rows<T: Copy>(
    dst: &mut [T],
    dst_rect: Rect,
    src: &[T],
    src_rect: Rect,
    overlap: Rect,
    spp: usize,
) {
    let dw = dst_rect.width as usize * spp;
    let sw = src_rect.width as usize * spp;
    let span = overlap.width as usize * spp;
    for y in overlap.top..overlap.bottom() {
        let d0 = (y - dst_rect.top) as usize * dw + (overlap.left - dst_rect.left) as usize * spp;
        let s0 = (y - src_rect.top) as usize * sw + (overlap.left - src_rect.left) as usize * spp;
        dst[d0..d0 + span].copy_from_slice(&src[s0..s0 + span]);
    }
}

/// Copy the overlap of two row-major buffers addressed in a shared coordinate
/// space.
///
/// `spp` is the scalar count per pixel (`bands * format.components()`). Both
/// buffers must hold the same format; non-overlapping rectangles are a no-op.
pub(crate) fn copy_overlap(
    dst: &mut SampleBuffer,
    dst_rect: Rect,
    src: &SampleBuffer,
    src_rect: Rect,
    spp: usize,
) -> TesseraResult<()> {
    let Some(overlap) = dst_rect.intersect(src_rect) else {
        return Ok(());
    };
    match (dst, src) {
        (SampleBuffer::UChar(d), SampleBuffer::UChar(s)) => {
            copy_rows(d, dst_rect, s, src_rect, overlap, spp)
        }
        (SampleBuffer::Char(d), SampleBuffer::Char(s)) => {
            copy_rows(d, dst_rect, s, src_rect, overlap, spp)
        }
        (SampleBuffer::UShort(d), SampleBuffer::UShort(s)) => {
            copy_rows(d, dst_rect, s, src_rect, overlap, spp)
        }
        (SampleBuffer::Short(d), SampleBuffer::Short(s)) => {
            copy_rows(d, dst_rect, s, src_rect, overlap, spp)
        }
        (SampleBuffer::UInt(d), SampleBuffer::UInt(s)) => {
            copy_rows(d, dst_rect, s, src_rect, overlap, spp)
        }
        (SampleBuffer::Int(d), SampleBuffer::Int(s)) => {
            copy_rows(d, dst_rect, s, src_rect, overlap, spp)
        }
        (SampleBuffer::Float(d), SampleBuffer::Float(s)) => {
            copy_rows(d, dst_rect, s, src_rect, overlap, spp)
        }
        (SampleBuffer::Complex(d), SampleBuffer::Complex(s)) => {
            copy_rows(d, dst_rect, s, src_rect, overlap, spp)
        }
        (SampleBuffer::Double(d), SampleBuffer::Double(s)) => {
            copy_rows(d, dst_rect, s, src_rect, overlap, spp)
        }
        (SampleBuffer::DpComplex(d), SampleBuffer::DpComplex(s)) => {
            copy_rows(d, dst_rect, s, src_rect, overlap, spp)
        }
        (d, s) => {
            return Err(TesseraError::invariant(format!(
                "copy between mismatched formats {:?} and {:?}",
                d.format(),
                s.format()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_matches_format_and_len() {
        let b = SampleBuffer::zeros(BandFormat::Complex, 8);
        assert_eq!(b.format(), BandFormat::Complex);
        assert_eq!(b.len(), 8);
        assert_eq!(b.as_f32().map(<[f32]>::len), Some(8));
    }

    #[test]
    fn copy_overlap_copies_only_the_intersection() {
        // 4x4 source of ones at the origin, 2x2 destination at (3, 3):
        // only the (3, 3) pixel overlaps.
        let src = SampleBuffer::UChar(vec![1; 16]);
        let mut dst = SampleBuffer::zeros(BandFormat::UChar, 4);
        copy_overlap(
            &mut dst,
            Rect::new(3, 3, 2, 2),
            &src,
            Rect::sized(4, 4),
            1,
        )
        .unwrap();
        assert_eq!(dst.as_u8().unwrap(), &[1, 0, 0, 0]);
    }

    #[test]
    fn copy_overlap_rejects_format_mismatch() {
        let src = SampleBuffer::Float(vec![0.0; 4]);
        let mut dst = SampleBuffer::zeros(BandFormat::UChar, 4);
        let err = copy_overlap(&mut dst, Rect::sized(2, 2), &src, Rect::sized(2, 2), 1);
        assert!(err.is_err());
    }
}
