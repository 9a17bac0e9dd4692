pub(crate) mod color;
pub(crate) mod descriptor;
pub(crate) mod resolve;
pub(crate) mod shadow;
