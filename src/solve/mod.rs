pub(crate) mod constraints;
pub(crate) mod spacing;
