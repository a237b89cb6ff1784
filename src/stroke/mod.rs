pub(crate) mod brush;
pub(crate) mod engine;
pub(crate) mod segment;
