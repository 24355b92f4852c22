pub(crate) mod dataset;
pub(crate) mod problem;
pub(crate) mod tree;
