pub(crate) mod effect;
pub(crate) mod group;
pub(crate) mod intent;
pub(crate) mod roofline;
