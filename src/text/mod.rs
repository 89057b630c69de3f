pub(crate) mod arbitrator;
pub(crate) mod state;
