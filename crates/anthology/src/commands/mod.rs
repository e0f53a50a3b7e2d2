//! CLI commands.

pub mod build;
pub mod init;
pub mod publish;
pub mod serve;
