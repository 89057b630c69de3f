pub(crate) mod backend;
pub(crate) mod bus;
pub(crate) mod coordinator;
