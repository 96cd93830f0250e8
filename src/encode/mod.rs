pub(crate) mod payload;
