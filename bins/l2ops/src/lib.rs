//! The `l2ops` command line.

pub mod cmd;
pub mod logging;
