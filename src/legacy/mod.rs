pub(crate) mod adapter;
pub(crate) mod filename;
#[cfg(feature = "image-codec")]
pub(crate) mod image_codec;
pub(crate) mod registry;
