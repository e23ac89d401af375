//! CLI command implementations

pub(crate) mod common;
pub(crate) mod compare;
pub(crate) mod load;
pub(crate) mod query;
pub(crate) mod render;
