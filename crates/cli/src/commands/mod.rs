pub(crate) mod batch;
pub(crate) mod eval;
pub(crate) mod validate;
