pub(crate) mod intent;
pub(crate) mod merge;
pub(crate) mod template;
