//! Process-level concerns shared by the binary and the domain layer:
//! command line / environment configuration and logger setup.

pub mod config;
pub mod logging;
