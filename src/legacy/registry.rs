//! Format-handler registration: the shape every pluggable codec must expose.

use std::path::Path;
use std::sync::Arc;

use crate::foundation::error::{TesseraError, TesseraResult};
use crate::image::header::ImageHeader;
use crate::image::node::Image;

/// Capability bitmask reported by a format handler for a particular file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FormatFlags(u32);

impl FormatFlags {
    /// No capabilities.
    pub const NONE: FormatFlags = FormatFlags(0);
    /// The handler can serve partial/sequential reads without decoding the
    /// whole file.
    pub const PARTIAL: FormatFlags = FormatFlags(1);
    /// The container is tile-organized rather than strip-organized.
    pub const TILED: FormatFlags = FormatFlags(1 << 1);

    /// Return `true` when every bit of `other` is set in `self`.
    pub fn contains(self, other: FormatFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for FormatFlags {
    type Output = FormatFlags;

    fn bitor(self, rhs: FormatFlags) -> FormatFlags {
        FormatFlags(self.0 | rhs.0)
    }
}

/// The five operations every pluggable codec must implement.
///
/// Handlers are looked up by file suffix first, then confirmed via
/// [`FormatHandler::probe`]. Errors from these calls propagate verbatim as
/// [`TesseraError::Codec`].
pub trait FormatHandler: Send + Sync {
    /// Cheap content sniff: does this file belong to the handler?
    fn probe(&self, path: &Path) -> bool;

    /// Read geometry/format metadata without materializing pixels.
    fn read_header(&self, path: &Path) -> TesseraResult<ImageHeader>;

    /// Produce a node serving the file's pixels. The node may be lazy; the
    /// adapter decides whether to force materialization.
    fn read_pixels(&self, path: &Path, page: u32) -> TesseraResult<Image>;

    /// Write a node's pixels to `path`.
    fn write_pixels(&self, image: &Image, path: &Path) -> TesseraResult<()>;

    /// Capability bitmask for this particular file.
    fn flags(&self, path: &Path) -> FormatFlags;
}

struct RegistryEntry {
    name: String,
    suffixes: Vec<String>,
    handler: Arc<dyn FormatHandler>,
}

/// Explicit capability registry of format handlers.
///
/// Constructed once at process start and passed by reference into the
/// legacy adapter; codec availability is never consulted through hidden
/// global state. A suffix with no registered handler fails with
/// [`TesseraError::UnsupportedFormat`] naming the format.
pub struct FormatRegistry {
    entries: Vec<RegistryEntry>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl FormatRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registry holding the handlers compiled into this build.
    pub fn with_builtins() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();
        #[cfg(feature = "image-codec")]
        registry.register(
            "image",
            &[".png", ".jpg", ".jpeg"],
            crate::legacy::image_codec::ImageCrateHandler,
        );
        registry
    }

    /// Register a handler under a human-readable name and its recognized
    /// file suffixes.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        suffixes: &[&str],
        handler: impl FormatHandler + 'static,
    ) {
        self.entries.push(RegistryEntry {
            name: name.into(),
            suffixes: suffixes.iter().map(|s| s.to_ascii_lowercase()).collect(),
            handler: Arc::new(handler),
        });
    }

    /// Find the handler for `path`: suffix match first, confirmed via
    /// `probe`.
    pub fn find(&self, path: &Path) -> TesseraResult<Arc<dyn FormatHandler>> {
        let name = path.to_string_lossy().to_ascii_lowercase();
        let candidates: Vec<&RegistryEntry> = self
            .entries
            .iter()
            .filter(|e| e.suffixes.iter().any(|s| name.ends_with(s.as_str())))
            .collect();

        for entry in &candidates {
            if entry.handler.probe(path) {
                tracing::debug!(handler = %entry.name, ?path, "format handler matched");
                return Ok(Arc::clone(&entry.handler));
            }
        }

        let format = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_else(|| "unknown".into());
        Err(TesseraError::unsupported_format(format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_handler_names_the_format() {
        let registry = FormatRegistry::new();
        let Err(err) = registry.find(Path::new("scan.tiff")) else {
            panic!("expected UnsupportedFormat error");
        };
        match err {
            TesseraError::UnsupportedFormat(name) => assert_eq!(name, "tiff"),
            other => panic!("expected UnsupportedFormat, got {other}"),
        }
    }

    #[test]
    fn flags_bitmask_combines() {
        let flags = FormatFlags::PARTIAL | FormatFlags::TILED;
        assert!(flags.contains(FormatFlags::PARTIAL));
        assert!(flags.contains(FormatFlags::TILED));
        assert!(!FormatFlags::NONE.contains(FormatFlags::PARTIAL));
    }
}
