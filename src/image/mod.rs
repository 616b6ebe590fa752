pub(crate) mod buffer;
pub(crate) mod format;
pub(crate) mod header;
pub(crate) mod node;
