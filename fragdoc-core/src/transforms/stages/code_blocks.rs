//! Code block expansion stage
//!
//! Rewrites the literal block shorthand (`Example::`) into an explicit
//! `code-block` directive carrying the current block kind.

use crate::classification::{classify_line, strip_shorthand, LineType};
use crate::error::AssembleError;
use crate::rules::{MalformedOverridePolicy, RuleConfig};
use crate::transforms::{LineResult, LineStream, Runnable};
use log::{debug, warn};
use std::collections::VecDeque;

/// Code block expansion stage
///
/// Per line:
/// - a fragment header resets the block kind to the default
/// - an override directive sets the block kind and is removed
/// - a shorthand line becomes the line without the terminator, a blank line and
///   the block directive for the current kind
/// - anything else passes through
///
/// # Input
/// - `LineStream` - concatenated fragments with header lines
///
/// # Output
/// - `LineStream` - same lines with shorthands expanded and overrides removed
pub struct ExpandCodeBlocks {
    rules: RuleConfig,
}

impl ExpandCodeBlocks {
    pub fn new(rules: RuleConfig) -> Self {
        ExpandCodeBlocks { rules }
    }
}

impl Default for ExpandCodeBlocks {
    fn default() -> Self {
        Self::new(RuleConfig::default())
    }
}

impl Runnable for ExpandCodeBlocks {
    fn name(&self) -> &str {
        "expand-code-blocks"
    }

    fn run(&self, input: LineStream) -> LineStream {
        Box::new(CodeBlocks {
            input,
            current_kind: self.rules.default_kind.clone(),
            rules: self.rules.clone(),
            pending: VecDeque::new(),
        })
    }
}

/// Iterator state for one run of the stage
struct CodeBlocks {
    input: LineStream,
    rules: RuleConfig,
    current_kind: String,
    /// Lines produced by an expansion that were not handed out yet
    pending: VecDeque<String>,
}

impl CodeBlocks {
    fn reset_kind(&mut self) {
        if self.current_kind != self.rules.default_kind {
            debug!(
                "new fragment, block kind {} -> {}",
                self.current_kind, self.rules.default_kind
            );
            self.current_kind.clone_from(&self.rules.default_kind);
        }
    }
}

impl Iterator for CodeBlocks {
    type Item = LineResult;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(line) = self.pending.pop_front() {
            return Some(Ok(line));
        }

        loop {
            let line = match self.input.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err)),
            };
            let class = classify_line(&line, &self.rules);

            if class.starts_fragment {
                self.reset_kind();
            }

            match class.kind {
                LineType::Override(Some(kind)) => {
                    debug!("block kind {} -> {}", self.current_kind, kind);
                    self.current_kind = kind;
                }
                LineType::Override(None) => match self.rules.malformed_override {
                    MalformedOverridePolicy::Error => {
                        return Some(Err(AssembleError::MalformedOverride { line }));
                    }
                    MalformedOverridePolicy::Ignore => {
                        warn!("ignoring override without a block kind: {}", line.trim_end());
                    }
                },
                LineType::Shorthand => {
                    self.pending.push_back("\n".to_string());
                    self.pending
                        .push_back(self.rules.block_directive_line(&self.current_kind));
                    return Some(Ok(strip_shorthand(&line, &self.rules)));
                }
                LineType::Plain => return Some(Ok(line)),
            }
        }
    }
}
