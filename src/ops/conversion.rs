//! Reconciliation nodes: format casts, zero-pad embedding, and band
//! replication.
//!
//! These are the virtual nodes the binary framework inserts so that a kernel
//! never observes mismatched sizes, band counts, or formats. Broadcasting
//! never interpolates or resamples: size mismatches pad with zero samples at
//! the bottom and right, band mismatches replicate a single band.

use crate::foundation::core::Rect;
use crate::foundation::error::{TesseraError, TesseraResult};
use crate::image::buffer::{SampleBuffer, copy_overlap};
use crate::image::format::BandFormat;
use crate::image::header::{DemandStyle, ImageHeader};
use crate::image::node::{Image, Recipe};

/// Scalars of a real-format buffer widened to `f64`.
pub(crate) fn real_to_f64(buffer: &SampleBuffer) -> Option<Vec<f64>> {
    match buffer {
        SampleBuffer::UChar(v) => Some(v.iter().map(|&x| f64::from(x)).collect()),
        SampleBuffer::Char(v) => Some(v.iter().map(|&x| f64::from(x)).collect()),
        SampleBuffer::UShort(v) => Some(v.iter().map(|&x| f64::from(x)).collect()),
        SampleBuffer::Short(v) => Some(v.iter().map(|&x| f64::from(x)).collect()),
        SampleBuffer::UInt(v) => Some(v.iter().map(|&x| f64::from(x)).collect()),
        SampleBuffer::Int(v) => Some(v.iter().map(|&x| f64::from(x)).collect()),
        SampleBuffer::Float(v) => Some(v.iter().map(|&x| f64::from(x)).collect()),
        SampleBuffer::Double(v) => Some(v.clone()),
        SampleBuffer::Complex(_) | SampleBuffer::DpComplex(_) => None,
    }
}

fn real_from_f64(scalars: Vec<f64>, to: BandFormat) -> Option<SampleBuffer> {
    Some(match to {
        BandFormat::UChar => SampleBuffer::UChar(scalars.iter().map(|&x| x as u8).collect()),
        BandFormat::Char => SampleBuffer::Char(scalars.iter().map(|&x| x as i8).collect()),
        BandFormat::UShort => SampleBuffer::UShort(scalars.iter().map(|&x| x as u16).collect()),
        BandFormat::Short => SampleBuffer::Short(scalars.iter().map(|&x| x as i16).collect()),
        BandFormat::UInt => SampleBuffer::UInt(scalars.iter().map(|&x| x as u32).collect()),
        BandFormat::Int => SampleBuffer::Int(scalars.iter().map(|&x| x as i32).collect()),
        BandFormat::Float => SampleBuffer::Float(scalars.iter().map(|&x| x as f32).collect()),
        BandFormat::Double => SampleBuffer::Double(scalars),
        BandFormat::Complex | BandFormat::DpComplex => return None,
    })
}

/// Promote a buffer's samples to a wider format.
///
/// Real samples cast numerically, real-to-complex fills a zero imaginary
/// component, and complex widens component-wise. The target must be able to
/// represent the source range.
pub(crate) fn cast_buffer(src: &SampleBuffer, to: BandFormat) -> TesseraResult<SampleBuffer> {
    let from = src.format();
    if from == to {
        return Ok(src.clone());
    }
    if !to.can_represent(from) {
        return Err(TesseraError::configuration(format!(
            "cast from {from:?} to {to:?} would lose range"
        )));
    }

    if let SampleBuffer::Complex(v) = src {
        // Only complex-to-complex widening survives can_represent.
        return Ok(SampleBuffer::DpComplex(
            v.iter().map(|&x| f64::from(x)).collect(),
        ));
    }

    let scalars = real_to_f64(src).ok_or_else(|| {
        TesseraError::invariant(format!("cast from {from:?} to {to:?} reached no kernel"))
    })?;

    if to.is_complex() {
        let mut out = Vec::with_capacity(scalars.len() * 2);
        for x in scalars {
            out.push(x);
            out.push(0.0);
        }
        return Ok(match to {
            BandFormat::Complex => SampleBuffer::Complex(out.iter().map(|&x| x as f32).collect()),
            _ => SampleBuffer::DpComplex(out),
        });
    }

    real_from_f64(scalars, to).ok_or_else(|| {
        TesseraError::invariant(format!("cast from {from:?} to {to:?} reached no kernel"))
    })
}

struct CastRecipe {
    input: Image,
    to: BandFormat,
}

impl Recipe for CastRecipe {
    fn name(&self) -> &'static str {
        "cast"
    }

    fn compute(&self, rect: Rect) -> TesseraResult<SampleBuffer> {
        cast_buffer(&self.input.pull(rect)?, self.to)
    }
}

/// Lazy node that promotes `image` to a wider sample format.
///
/// Identity casts return the input handle unchanged.
pub fn cast(image: &Image, to: BandFormat) -> TesseraResult<Image> {
    if image.format() == to {
        return Ok(image.clone());
    }
    if !to.can_represent(image.format()) {
        return Err(TesseraError::configuration(format!(
            "cast from {:?} to {to:?} would lose range",
            image.format()
        )));
    }
    let header = ImageHeader::new(
        image.width(),
        image.height(),
        image.bands(),
        to,
        image.header().demand,
    )?;
    Ok(Image::from_recipe(
        header,
        CastRecipe {
            input: image.clone(),
            to,
        },
    ))
}

struct EmbedRecipe {
    input: Image,
}

impl Recipe for EmbedRecipe {
    fn name(&self) -> &'static str {
        "embed"
    }

    fn compute(&self, rect: Rect) -> TesseraResult<SampleBuffer> {
        let header = self.input.header();
        let spp = header.scalars_per_pixel();
        let mut out = SampleBuffer::zeros(header.format, rect.pixels() * spp);
        if let Some(overlap) = rect.intersect(header.extent()) {
            let pulled = self.input.pull(overlap)?;
            copy_overlap(&mut out, rect, &pulled, overlap, spp)?;
        }
        Ok(out)
    }
}

/// Logically zero-pad `image` at the bottom and right to `width x height`.
///
/// Samples outside the original extent read as zero; no scaling or
/// resampling occurs. The target extent must not be smaller than the input.
pub fn embed_zero(image: &Image, width: u32, height: u32) -> TesseraResult<Image> {
    if width == image.width() && height == image.height() {
        return Ok(image.clone());
    }
    if width < image.width() || height < image.height() {
        return Err(TesseraError::configuration(format!(
            "embed target {width}x{height} is smaller than input {}x{}",
            image.width(),
            image.height()
        )));
    }
    let header = ImageHeader::new(
        width,
        height,
        image.bands(),
        image.format(),
        DemandStyle::Any,
    )?;
    Ok(Image::from_recipe(
        header,
        EmbedRecipe {
            input: image.clone(),
        },
    ))
}

fn replicate<T: Copy>(src: &[T], comps: usize, n: usize) -> Vec<T> {
    let mut out = Vec::with_capacity(src.len() * n);
    for sample in src.chunks_exact(comps) {
        for _ in 0..n {
            out.extend_from_slice(sample);
        }
    }
    out
}

struct ReplicateRecipe {
    input: Image,
    bands: u32,
}

impl Recipe for ReplicateRecipe {
    fn name(&self) -> &'static str {
        "replicate-bands"
    }

    fn compute(&self, rect: Rect) -> TesseraResult<SampleBuffer> {
        let comps = self.input.format().components();
        let n = self.bands as usize;
        Ok(match self.input.pull(rect)? {
            SampleBuffer::UChar(v) => SampleBuffer::UChar(replicate(&v, comps, n)),
            SampleBuffer::Char(v) => SampleBuffer::Char(replicate(&v, comps, n)),
            SampleBuffer::UShort(v) => SampleBuffer::UShort(replicate(&v, comps, n)),
            SampleBuffer::Short(v) => SampleBuffer::Short(replicate(&v, comps, n)),
            SampleBuffer::UInt(v) => SampleBuffer::UInt(replicate(&v, comps, n)),
            SampleBuffer::Int(v) => SampleBuffer::Int(replicate(&v, comps, n)),
            SampleBuffer::Float(v) => SampleBuffer::Float(replicate(&v, comps, n)),
            SampleBuffer::Complex(v) => SampleBuffer::Complex(replicate(&v, comps, n)),
            SampleBuffer::Double(v) => SampleBuffer::Double(replicate(&v, comps, n)),
            SampleBuffer::DpComplex(v) => SampleBuffer::DpComplex(replicate(&v, comps, n)),
        })
    }
}

/// Replicate a one-band image to `bands` identical bands.
pub fn replicate_bands(image: &Image, bands: u32) -> TesseraResult<Image> {
    if image.bands() == bands {
        return Ok(image.clone());
    }
    if image.bands() != 1 {
        return Err(TesseraError::configuration(format!(
            "band replication needs a one-band input, not {} bands",
            image.bands()
        )));
    }
    let header = ImageHeader::new(
        image.width(),
        image.height(),
        bands,
        image.format(),
        image.header().demand,
    )?;
    Ok(Image::from_recipe(
        header,
        ReplicateRecipe {
            input: image.clone(),
            bands,
        },
    ))
}

/// Equalize two images' sizes by zero-padding the smaller to the bounding
/// rectangle.
pub(crate) fn size_reconcile(a: &Image, b: &Image) -> TesseraResult<(Image, Image)> {
    let width = a.width().max(b.width());
    let height = a.height().max(b.height());
    Ok((embed_zero(a, width, height)?, embed_zero(b, width, height)?))
}

/// Equalize two images' band counts by replicating a single band.
///
/// When the counts differ, exactly one side must have a single band.
pub(crate) fn band_reconcile(a: &Image, b: &Image) -> TesseraResult<(Image, Image)> {
    if a.bands() == b.bands() {
        return Ok((a.clone(), b.clone()));
    }
    if a.bands() == 1 {
        return Ok((replicate_bands(a, b.bands())?, b.clone()));
    }
    if b.bands() == 1 {
        return Ok((a.clone(), replicate_bands(b, a.bands())?));
    }
    Err(TesseraError::configuration(format!(
        "band counts {} and {} do not match and neither side has one band",
        a.bands(),
        b.bands()
    )))
}
