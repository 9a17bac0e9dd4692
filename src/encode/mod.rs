pub(crate) mod cache_path;
pub(crate) mod mime;
pub(crate) mod packer;
