pub(crate) mod region;
