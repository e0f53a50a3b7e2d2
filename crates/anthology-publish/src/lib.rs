//! Publisher for anthology.
//!
//! Turns a built output directory into a fresh git repository, commits it and
//! force-pushes it to the hosting branch. Publishing is gated: it only runs
//! inside the automation environment and only for the canonical branch.

pub mod env;
pub mod error;
pub mod gate;
pub mod git;
pub mod publisher;

pub use env::{EnvVars, PublishEnv};
pub use error::PublishError;
pub use gate::{Gate, GateOutcome, SkipReason};
pub use git::{GitCli, Vcs};
pub use publisher::{PublishConfig, PublishOutcome, Publisher};
