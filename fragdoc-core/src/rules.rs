//! Rule parameters
//!
//! [`RuleConfig`] holds every marker the rule stages look for. The defaults
//! describe reStructuredText: `..` comments, the `::` literal block shorthand,
//! `.. highlight::` to change the block kind and `.. code-block::` as the
//! explicit directive.

use serde::{Deserialize, Serialize};

/// Text placed between the comment prefix and the fragment path in a header line.
pub const HEADER_MARKER: &str = "Source defined in";

/// What to do with an override directive that names no block kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MalformedOverridePolicy {
    /// Stop the run with `AssembleError::MalformedOverride`.
    #[default]
    Error,
    /// Drop the line and keep the current block kind.
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Comment prefix used for header lines and to recognise directives.
    pub comment_prefix: String,
    /// Block kind used at the start of every fragment.
    pub default_kind: String,
    /// Directive that changes the block kind for the rest of a fragment.
    pub override_directive: String,
    /// Directive written in place of the shorthand.
    pub block_directive: String,
    /// Trailing marker that introduces a literal block.
    pub shorthand_terminator: String,
    /// Lines starting with any of these are removed from the output.
    pub skip_prefixes: Vec<String>,
    pub malformed_override: MalformedOverridePolicy,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            comment_prefix: "..".to_string(),
            default_kind: "python".to_string(),
            override_directive: ".. highlight::".to_string(),
            block_directive: ".. code-block::".to_string(),
            shorthand_terminator: "::".to_string(),
            skip_prefixes: vec![":orphan:".to_string()],
            malformed_override: MalformedOverridePolicy::Error,
        }
    }
}

impl RuleConfig {
    /// Leading text shared by every header line, e.g. `.. Source defined in`
    pub fn header_prefix(&self) -> String {
        format!("{} {}", self.comment_prefix, HEADER_MARKER)
    }

    /// Full header line for a fragment whose provenance is `path`
    pub fn header_line(&self, path: &str) -> String {
        format!("{} {}\n\n", self.header_prefix(), path)
    }

    /// Explicit directive line for a block of `kind`
    pub fn block_directive_line(&self, kind: &str) -> String {
        format!("{} {}\n", self.block_directive, kind)
    }
}
