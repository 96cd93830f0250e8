pub(crate) mod command;
pub(crate) mod retry;
pub(crate) mod store;
