//! Directive stripping stage
//!
//! Removes lines that only make sense when a fragment is rendered on its own,
//! such as `:orphan:`.

use crate::classification::is_skip_directive;
use crate::rules::RuleConfig;
use crate::transforms::{LineStream, Runnable};

/// Directive stripping stage
///
/// Drops every line starting with one of the configured skip prefixes,
/// whatever else the line looks like. All other lines pass through in order.
/// Stateless.
pub struct StripDirectives {
    rules: RuleConfig,
}

impl StripDirectives {
    pub fn new(rules: RuleConfig) -> Self {
        StripDirectives { rules }
    }
}

impl Default for StripDirectives {
    fn default() -> Self {
        Self::new(RuleConfig::default())
    }
}

impl Runnable for StripDirectives {
    fn name(&self) -> &str {
        "strip-directives"
    }

    fn run(&self, input: LineStream) -> LineStream {
        let rules = self.rules.clone();
        Box::new(input.filter(move |line| match line {
            Ok(line) => !is_skip_directive(line, &rules),
            Err(_) => true,
        }))
    }
}
