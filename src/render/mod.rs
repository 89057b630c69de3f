pub(crate) mod boundary;
