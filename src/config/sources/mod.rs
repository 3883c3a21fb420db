pub(crate) mod environment;
pub(crate) mod file;
