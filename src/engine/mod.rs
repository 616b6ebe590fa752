pub(crate) mod cache;
pub(crate) mod scheduler;
pub(crate) mod tile;
