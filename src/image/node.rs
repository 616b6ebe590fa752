use std::sync::Arc;

use crate::engine::cache::TileCache;
use crate::engine::scheduler;
use crate::foundation::core::Rect;
use crate::foundation::error::{TesseraError, TesseraResult};
use crate::image::buffer::SampleBuffer;
use crate::image::format::BandFormat;
use crate::image::header::{DemandStyle, ImageHeader};

/// How a derived node computes one output rectangle.
///
/// A recipe captures its upstream [`Image`] handles and pulls them from
/// inside [`Recipe::compute`]; the engine recurses through those pulls. The
/// returned buffer must cover exactly the requested rectangle in the owning
/// node's finalized format and band count.
pub trait Recipe: Send + Sync {
    /// Short operation name used in trace output.
    fn name(&self) -> &'static str {
        "derived"
    }

    /// Produce the samples for `rect`.
    fn compute(&self, rect: Rect) -> TesseraResult<SampleBuffer>;
}

pub(crate) enum Source {
    /// Leaf node backed by a materialized buffer.
    Memory(SampleBuffer),
    /// Derived node computed on demand.
    Derived(Box<dyn Recipe>),
}

pub(crate) struct Node {
    pub(crate) header: ImageHeader,
    pub(crate) source: Source,
    pub(crate) cache: Option<TileCache>,
}

/// Handle to a node of the lazy computation graph.
///
/// Cloning is cheap (`Arc`); upstream references inside recipes are shared
/// the same way, so a node is only dropped once every downstream consumer
/// has released it. The header is finalized at construction, before any
/// pixel pull; pixels materialize only when [`Image::pull`] is called.
#[derive(Clone)]
pub struct Image {
    node: Arc<Node>,
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("header", &self.node.header)
            .field("op", &self.op_name())
            .field("cached", &self.node.cache.is_some())
            .finish()
    }
}

impl Image {
    /// Leaf node over an existing buffer; the buffer length and format must
    /// match the header.
    pub fn from_buffer(header: ImageHeader, buffer: SampleBuffer) -> TesseraResult<Self> {
        if buffer.format() != header.format {
            return Err(TesseraError::configuration(format!(
                "buffer format {:?} does not match header format {:?}",
                buffer.format(),
                header.format
            )));
        }
        let want = header.scalars_for(header.extent());
        if buffer.len() != want {
            return Err(TesseraError::configuration(format!(
                "buffer holds {} scalars, header needs {want}",
                buffer.len()
            )));
        }
        Ok(Self {
            node: Arc::new(Node {
                header,
                source: Source::Memory(buffer),
                cache: None,
            }),
        })
    }

    /// All-zero leaf node of the given shape.
    pub fn zeros(width: u32, height: u32, bands: u32, format: BandFormat) -> TesseraResult<Self> {
        let header = ImageHeader::new(width, height, bands, format, DemandStyle::Any)?;
        let buffer = SampleBuffer::zeros(format, header.scalars_for(header.extent()));
        Self::from_buffer(header, buffer)
    }

    /// Derived node computed on demand by `recipe`.
    ///
    /// This is the extensibility seam pluggable operations and codecs hang
    /// off: the header is fixed here, and `recipe` is invoked lazily per
    /// tile.
    pub fn from_recipe(header: ImageHeader, recipe: impl Recipe + 'static) -> Self {
        Self {
            node: Arc::new(Node {
                header,
                source: Source::Derived(Box::new(recipe)),
                cache: None,
            }),
        }
    }

    /// Finalized header of this node.
    pub fn header(&self) -> &ImageHeader {
        &self.node.header
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.node.header.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.node.header.height
    }

    /// Band count.
    pub fn bands(&self) -> u32 {
        self.node.header.bands
    }

    /// Sample format.
    pub fn format(&self) -> BandFormat {
        self.node.header.format
    }

    /// Return `true` when this node is a fully materialized memory leaf.
    pub fn is_materialized(&self) -> bool {
        matches!(self.node.source, Source::Memory(_))
    }

    /// Wrap this node in a tile-caching node.
    ///
    /// Tiles of the wrapped node are built at most once per rectangle key
    /// and retained until the node is released; concurrent pulls for the
    /// same tile wait on the first build and share its result.
    pub fn cached(&self) -> Self {
        let inner = self.clone();
        Self {
            node: Arc::new(Node {
                header: self.node.header,
                source: Source::Derived(Box::new(CacheRecipe { inner })),
                cache: Some(TileCache::new()),
            }),
        }
    }

    /// Pull a rectangle of pixels, recursively resolving upstream regions.
    ///
    /// The rectangle must be non-empty and inside the node's extent. The
    /// returned buffer covers exactly `rect` in the node's finalized format.
    pub fn pull(&self, rect: Rect) -> TesseraResult<SampleBuffer> {
        scheduler::pull(self, rect)
    }

    /// Pull the full extent into a new memory leaf.
    pub fn materialize(&self) -> TesseraResult<Image> {
        let header = ImageHeader {
            demand: DemandStyle::Any,
            ..self.node.header
        };
        let buffer = self.pull(self.node.header.extent())?;
        Image::from_buffer(header, buffer)
    }

    pub(crate) fn op_name(&self) -> &'static str {
        match &self.node.source {
            Source::Memory(_) => "memory",
            Source::Derived(r) => r.name(),
        }
    }

    pub(crate) fn source(&self) -> &Source {
        &self.node.source
    }

    pub(crate) fn tile_cache(&self) -> Option<&TileCache> {
        self.node.cache.as_ref()
    }
}

struct CacheRecipe {
    inner: Image,
}

impl Recipe for CacheRecipe {
    fn name(&self) -> &'static str {
        "cache"
    }

    fn compute(&self, rect: Rect) -> TesseraResult<SampleBuffer> {
        self.inner.pull(rect)
    }
}
