//! Built-in format handler backed by the `image` crate.
//!
//! Compiled in through the `image-codec` feature; without it the registry
//! holds no handler for these suffixes and opens fail with
//! `UnsupportedFormat`. The `image` crate always decodes whole files, so
//! this handler reports no partial-read capability and its containers count
//! as strip-organized.

use std::io::Read;
use std::path::Path;

use crate::foundation::error::{TesseraError, TesseraResult};
use crate::image::buffer::SampleBuffer;
use crate::image::format::BandFormat;
use crate::image::header::{DemandStyle, ImageHeader};
use crate::image::node::Image;
use crate::legacy::registry::{FormatFlags, FormatHandler};

/// PNG/JPEG handler decoding through the `image` crate.
pub struct ImageCrateHandler;

fn codec_err(err: image::ImageError) -> TesseraError {
    TesseraError::codec(err.to_string())
}

fn decode(path: &Path) -> TesseraResult<(u32, u32, u32, SampleBuffer)> {
    let decoded = image::open(path).map_err(codec_err)?;
    let (width, height) = (decoded.width(), decoded.height());
    let (bands, buffer) = match decoded.color() {
        image::ColorType::L8 => (1, SampleBuffer::UChar(decoded.into_luma8().into_raw())),
        image::ColorType::La8 => (2, SampleBuffer::UChar(decoded.into_luma_alpha8().into_raw())),
        image::ColorType::Rgb8 => (3, SampleBuffer::UChar(decoded.into_rgb8().into_raw())),
        image::ColorType::Rgba8 => (4, SampleBuffer::UChar(decoded.into_rgba8().into_raw())),
        image::ColorType::L16 => (1, SampleBuffer::UShort(decoded.into_luma16().into_raw())),
        image::ColorType::La16 => (
            2,
            SampleBuffer::UShort(decoded.into_luma_alpha16().into_raw()),
        ),
        image::ColorType::Rgb16 => (3, SampleBuffer::UShort(decoded.into_rgb16().into_raw())),
        image::ColorType::Rgba16 => (4, SampleBuffer::UShort(decoded.into_rgba16().into_raw())),
        image::ColorType::Rgb32F => (3, SampleBuffer::Float(decoded.into_rgb32f().into_raw())),
        image::ColorType::Rgba32F => (4, SampleBuffer::Float(decoded.into_rgba32f().into_raw())),
        other => {
            return Err(TesseraError::codec(format!(
                "unsupported sample layout {other:?}"
            )));
        }
    };
    Ok((width, height, bands, buffer))
}

impl FormatHandler for ImageCrateHandler {
    fn probe(&self, path: &Path) -> bool {
        let Ok(mut file) = std::fs::File::open(path) else {
            return false;
        };
        let mut magic = [0u8; 64];
        let Ok(n) = file.read(&mut magic) else {
            return false;
        };
        image::guess_format(&magic[..n]).is_ok()
    }

    fn read_header(&self, path: &Path) -> TesseraResult<ImageHeader> {
        let (width, height, bands, buffer) = decode(path)?;
        ImageHeader::new(width, height, bands, buffer.format(), DemandStyle::Any)
    }

    fn read_pixels(&self, path: &Path, page: u32) -> TesseraResult<Image> {
        if page != 0 {
            return Err(TesseraError::codec(format!(
                "this handler holds a single page, page {page} requested"
            )));
        }
        let (width, height, bands, buffer) = decode(path)?;
        let header = ImageHeader::new(width, height, bands, buffer.format(), DemandStyle::Any)?;
        Image::from_buffer(header, buffer)
    }

    fn write_pixels(&self, image: &Image, path: &Path) -> TesseraResult<()> {
        let materialized = image.materialize()?;
        let buffer = materialized.pull(materialized.header().extent())?;
        let Some(bytes) = buffer.as_u8() else {
            return Err(TesseraError::codec(format!(
                "writer supports 8-bit images only, not {:?}",
                buffer.format()
            )));
        };
        let color = match materialized.bands() {
            1 => image::ExtendedColorType::L8,
            2 => image::ExtendedColorType::La8,
            3 => image::ExtendedColorType::Rgb8,
            4 => image::ExtendedColorType::Rgba8,
            bands => {
                return Err(TesseraError::codec(format!(
                    "no sample layout for {bands} bands"
                )));
            }
        };
        image::save_buffer(
            path,
            bytes,
            materialized.width(),
            materialized.height(),
            color,
        )
        .map_err(codec_err)
    }

    fn flags(&self, _path: &Path) -> FormatFlags {
        // Whole-file decode: neither partial reads nor a tiled container.
        FormatFlags::NONE
    }
}
