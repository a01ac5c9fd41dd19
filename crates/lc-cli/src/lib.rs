//! Library side of the `lc-checker` binary.

pub mod config;
pub mod logging;
