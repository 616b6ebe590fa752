use std::path::Path;

use tessera::{
    AccessIntent, AccessMode, BandFormat, DemandStyle, FormatFlags, FormatHandler,
    FormatRegistry, Image, ImageHeader, MaterializeStrategy, Recipe, Rect, SampleBuffer,
    TesseraError, TesseraResult, open_header, open_legacy, resolve_strategy,
};

struct ConstRecipe {
    value: u8,
}

impl Recipe for ConstRecipe {
    fn compute(&self, rect: Rect) -> TesseraResult<SampleBuffer> {
        Ok(SampleBuffer::UChar(vec![self.value; rect.pixels()]))
    }
}

/// Test double for a pluggable codec: serves a lazy 4x4 node and reports
/// the given capability flags.
struct FakeHandler {
    flags: FormatFlags,
    value: u8,
    probe_ok: bool,
}

impl FormatHandler for FakeHandler {
    fn probe(&self, _path: &Path) -> bool {
        self.probe_ok
    }

    fn read_header(&self, _path: &Path) -> TesseraResult<ImageHeader> {
        ImageHeader::new(4, 4, 1, BandFormat::UChar, DemandStyle::Any)
    }

    fn read_pixels(&self, path: &Path, _page: u32) -> TesseraResult<Image> {
        let header = self.read_header(path)?;
        Ok(Image::from_recipe(header, ConstRecipe { value: self.value }))
    }

    fn write_pixels(&self, _image: &Image, _path: &Path) -> TesseraResult<()> {
        Err(TesseraError::codec("fake handler is read-only"))
    }

    fn flags(&self, _path: &Path) -> FormatFlags {
        self.flags
    }
}

fn registry_with(suffix: &str, handler: FakeHandler) -> FormatRegistry {
    let mut registry = FormatRegistry::new();
    registry.register("fake", &[suffix], handler);
    registry
}

#[test]
fn strip_container_in_random_access_mode_is_force_buffered() {
    let registry = registry_with(
        ".strip",
        FakeHandler {
            flags: FormatFlags::NONE,
            value: 7,
            probe_ok: true,
        },
    );
    let image = open_legacy("scan.strip", &registry).unwrap();
    assert!(image.is_materialized());
    let pixels = image.pull(Rect::sized(4, 4)).unwrap();
    assert_eq!(pixels.as_u8().unwrap(), &[7; 16]);
}

#[test]
fn seq_option_keeps_the_node_lazy() {
    let registry = registry_with(
        ".strip",
        FakeHandler {
            flags: FormatFlags::NONE,
            value: 7,
            probe_ok: true,
        },
    );
    let image = open_legacy("scan.strip:seq", &registry).unwrap();
    assert!(!image.is_materialized());
}

#[test]
fn tiled_containers_skip_forced_materialization() {
    let registry = registry_with(
        ".tiled",
        FakeHandler {
            flags: FormatFlags::TILED | FormatFlags::PARTIAL,
            value: 9,
            probe_ok: true,
        },
    );
    let image = open_legacy("scan.tiled", &registry).unwrap();
    assert!(!image.is_materialized());
    let pixels = image.pull(Rect::sized(2, 2)).unwrap();
    assert_eq!(pixels.as_u8().unwrap(), &[9; 4]);
}

#[test]
fn header_probe_never_reads_pixels() {
    let registry = registry_with(
        ".strip",
        FakeHandler {
            flags: FormatFlags::NONE,
            value: 7,
            probe_ok: true,
        },
    );
    let header = open_header("scan.strip:3", &registry).unwrap();
    assert_eq!((header.width, header.height, header.bands), (4, 4, 1));
    assert_eq!(
        resolve_strategy(AccessIntent::Header, AccessMode::Random, FormatFlags::NONE),
        MaterializeStrategy::HeaderOnly
    );
}

#[test]
fn missing_codec_fails_with_the_format_name() {
    let registry = FormatRegistry::new();
    let err = open_legacy("scan.tif", &registry).unwrap_err();
    match err {
        TesseraError::UnsupportedFormat(name) => assert_eq!(name, "tif"),
        other => panic!("expected UnsupportedFormat, got {other}"),
    }
}

#[test]
fn lookup_is_suffix_first_then_probe() {
    let mut registry = FormatRegistry::new();
    registry.register(
        "deaf",
        &[".x"],
        FakeHandler {
            flags: FormatFlags::NONE,
            value: 1,
            probe_ok: false,
        },
    );
    registry.register(
        "alive",
        &[".x"],
        FakeHandler {
            flags: FormatFlags::NONE,
            value: 2,
            probe_ok: true,
        },
    );

    let image = open_legacy("file.x", &registry).unwrap();
    let pixels = image.pull(Rect::sized(1, 1)).unwrap();
    assert_eq!(pixels.as_u8().unwrap(), &[2]);
}

#[cfg(feature = "image-codec")]
mod image_codec {
    use super::*;
    use tessera::ImageCrateHandler;

    #[test]
    fn png_round_trips_through_the_builtin_handler() {
        let path = std::env::temp_dir().join(format!("tessera-codec-{}.png", std::process::id()));

        let header = ImageHeader::new(2, 2, 3, BandFormat::UChar, DemandStyle::Any).unwrap();
        let image = Image::from_buffer(
            header,
            SampleBuffer::UChar(vec![
                255, 0, 0, //
                0, 255, 0, //
                0, 0, 255, //
                10, 20, 30,
            ]),
        )
        .unwrap();
        ImageCrateHandler.write_pixels(&image, &path).unwrap();

        let registry = FormatRegistry::with_builtins();
        let loaded = open_legacy(&path.to_string_lossy(), &registry).unwrap();
        assert!(loaded.is_materialized());
        assert_eq!((loaded.width(), loaded.height(), loaded.bands()), (2, 2, 3));
        let pixels = loaded.pull(Rect::sized(2, 2)).unwrap();
        assert_eq!(
            pixels.as_u8().unwrap(),
            &[255, 0, 0, 0, 255, 0, 0, 0, 255, 10, 20, 30]
        );

        let _ = std::fs::remove_file(&path);
    }
}
