//! Ordered publish preconditions.

use crate::env::PublishEnv;
use crate::error::PublishError;
use crate::publisher::PublishConfig;

/// What the gate decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Every precondition holds.
    Proceed,

    /// Nothing to do; not an error.
    Skip(SkipReason),
}

/// Why a publish was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotCanonicalBranch {
        branch: Option<String>,
        canonical: String,
    },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NotCanonicalBranch { branch, canonical } => write!(
                f,
                "branch {} is not {}",
                branch.as_deref().unwrap_or("(unset)"),
                canonical
            ),
        }
    }
}

/// Publish precondition checks.
pub struct Gate;

impl Gate {
    /// Evaluate the preconditions in order, stopping at the first that fails:
    ///
    /// 1. the automation marker is set, otherwise an error;
    /// 2. the triggering branch is the canonical branch, otherwise a skip;
    /// 3. the build output exists and does not contain the source checkout,
    ///    otherwise an error.
    pub fn evaluate(config: &PublishConfig, env: &PublishEnv) -> Result<GateOutcome, PublishError> {
        if !env.in_automation {
            return Err(PublishError::NotInAutomation {
                marker: config.vars.marker.clone(),
            });
        }

        if env.branch.as_deref() != Some(config.canonical_branch.as_str()) {
            return Ok(GateOutcome::Skip(SkipReason::NotCanonicalBranch {
                branch: env.branch.clone(),
                canonical: config.canonical_branch.clone(),
            }));
        }

        if !config.output_dir.is_dir() {
            return Err(PublishError::OutputMissing(config.output_dir.clone()));
        }

        // The publisher re-initializes the output directory's repository.
        if let (Ok(output), Ok(checkout)) = (
            config.output_dir.canonicalize(),
            config.source_dir.canonicalize(),
        ) {
            if checkout.starts_with(&output) {
                return Err(PublishError::OutputContainsSource { output, checkout });
            }
        }

        Ok(GateOutcome::Proceed)
    }
}
