//! Fragment inclusion stage
//!
//! The producer at the head of every document pipeline. It ignores its input
//! and yields the concatenated fragments, each introduced by its header line.

use crate::concat::concatenate;
use crate::rules::RuleConfig;
use crate::source::{read_fragment, Fragment};
use crate::transforms::{LineStream, Runnable};
use std::path::PathBuf;

/// Fragment inclusion stage
///
/// # Input
/// - ignored
///
/// # Output
/// - `LineStream` - every fragment in order, separated by blank lines
pub struct Include {
    fragments: Vec<Fragment>,
    project_root: PathBuf,
    rules: RuleConfig,
}

impl Include {
    pub fn new(
        fragments: Vec<Fragment>,
        project_root: impl Into<PathBuf>,
        rules: RuleConfig,
    ) -> Self {
        Include {
            fragments,
            project_root: project_root.into(),
            rules,
        }
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }
}

impl Runnable for Include {
    fn name(&self) -> &str {
        "include"
    }

    fn run(&self, _input: LineStream) -> LineStream {
        let project_root = self.project_root.clone();
        let rules = self.rules.clone();
        concatenate(
            self.fragments
                .clone()
                .into_iter()
                .map(move |fragment| read_fragment(fragment, &project_root, &rules)),
        )
    }
}
