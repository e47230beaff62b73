//! Output naming and directory helpers.

pub mod paths;
