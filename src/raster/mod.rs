pub(crate) mod blend;
pub(crate) mod encode;
pub(crate) mod geometry;
pub(crate) mod mask;
pub(crate) mod source;
pub(crate) mod store;
