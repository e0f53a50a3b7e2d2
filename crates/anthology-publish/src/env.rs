//! Snapshot of the environment a publish runs in.

use serde::{Deserialize, Serialize};

/// Names of the environment variables the publisher reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EnvVars {
    /// Set when running inside the automation environment
    pub marker: String,
    /// Branch that triggered the run
    pub branch: String,
    /// Credential interpolated into the remote URL
    pub token: String,
    /// `owner/name` of the source repository
    pub slug: String,
}

impl Default for EnvVars {
    fn default() -> Self {
        Self {
            marker: "TRAVIS".to_string(),
            branch: "TRAVIS_BRANCH".to_string(),
            token: "GH_TOKEN".to_string(),
            slug: "TRAVIS_REPO_SLUG".to_string(),
        }
    }
}

/// Values read from the environment. Empty values count as unset.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PublishEnv {
    pub in_automation: bool,
    pub branch: Option<String>,
    pub token: Option<String>,
    pub slug: Option<String>,
}

impl PublishEnv {
    /// Read from the process environment.
    pub fn from_process(vars: &EnvVars) -> Self {
        Self::from_lookup(vars, |name| std::env::var(name).ok())
    }

    /// Read through an arbitrary lookup function.
    pub fn from_lookup<F>(vars: &EnvVars, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        Self {
            in_automation: get(&vars.marker).is_some(),
            branch: get(&vars.branch),
            token: get(&vars.token),
            slug: get(&vars.slug),
        }
    }
}

// Keeps the credential out of debug logs.
impl std::fmt::Debug for PublishEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublishEnv")
            .field("in_automation", &self.in_automation)
            .field("branch", &self.branch)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("slug", &self.slug)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn reads_default_variable_names() {
        let env = PublishEnv::from_lookup(
            &EnvVars::default(),
            lookup(&[
                ("TRAVIS", "true"),
                ("TRAVIS_BRANCH", "master"),
                ("GH_TOKEN", "s3cret"),
                ("TRAVIS_REPO_SLUG", "owner/book"),
            ]),
        );

        assert!(env.in_automation);
        assert_eq!(env.branch.as_deref(), Some("master"));
        assert_eq!(env.token.as_deref(), Some("s3cret"));
        assert_eq!(env.slug.as_deref(), Some("owner/book"));
    }

    #[test]
    fn empty_values_are_unset() {
        let env = PublishEnv::from_lookup(
            &EnvVars::default(),
            lookup(&[("TRAVIS", ""), ("TRAVIS_BRANCH", "")]),
        );

        assert!(!env.in_automation);
        assert!(env.branch.is_none());
    }

    #[test]
    fn honours_custom_names() {
        let vars = EnvVars {
            marker: "CI".to_string(),
            ..Default::default()
        };

        let env = PublishEnv::from_lookup(&vars, lookup(&[("CI", "1")]));

        assert!(env.in_automation);
    }

    #[test]
    fn debug_hides_token() {
        let env = PublishEnv {
            token: Some("s3cret".to_string()),
            ..Default::default()
        };

        let shown = format!("{env:?}");

        assert!(!shown.contains("s3cret"));
        assert!(shown.contains("***"));
    }
}
