//! CLI commands

pub mod audit;
pub mod init;
pub mod validate;
