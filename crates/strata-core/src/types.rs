//! Common type definitions and newtypes for Strata.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the tokens of an environment name.
pub const ENVIRONMENT_SEPARATOR: char = '/';

/// Logical configuration location.
///
/// An environment names *where* configuration lives independently of how a
/// source lays it out physically (branch, directory, key prefix). Resolvers
/// translate it to a concrete location.
///
/// The name is normalized on construction: surrounding whitespace and
/// trailing separators are removed, so `""`, `"/"` and `"  "` all denote the
/// root environment. A leading separator is kept because it is meaningful to
/// token-based resolvers (`"/sub/dir"` has an empty first token).
///
/// # Example
///
/// ```
/// use strata_core::Environment;
///
/// let env = Environment::new("testEnvBranch/");
/// assert_eq!(env.as_str(), "testEnvBranch");
/// assert_eq!(env, Environment::new("testEnvBranch"));
/// assert!(Environment::new("/").is_root());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Environment(String);

impl Environment {
    /// Creates a new environment from a path-like name.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(normalize(name.as_ref()))
    }

    /// Returns the root (default) environment.
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Returns the normalized name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for the root environment.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Splits the name into its `/`-separated tokens.
    ///
    /// The root environment has a single empty token.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.0.split(ENVIRONMENT_SEPARATOR)
    }

    /// Returns the token at `index`, or `""` if there is none.
    pub fn token(&self, index: usize) -> &str {
        self.tokens().nth(index).unwrap_or("")
    }
}

fn normalize(name: &str) -> String {
    name.trim()
        .trim_end_matches(ENVIRONMENT_SEPARATOR)
        .to_string()
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            write!(f, "<root>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<&str> for Environment {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<Environment> for String {
    fn from(env: Environment) -> Self {
        env.0
    }
}
