pub(crate) mod design;
