//! Standard pipeline definitions
//!
//! Pre-built stage chains. They take a [`RuleConfig`] because every marker the
//! stages look for is configurable.

use crate::document::Manifest;
use crate::rules::RuleConfig;
use crate::transforms::stages::{ExpandCodeBlocks, Include, StripDirectives};
use crate::transforms::Pipeline;

/// Rule chain applied to the concatenated fragments: LineStream → LineStream
///
/// 1. Code block expansion
/// 2. Directive stripping
pub fn sanitize(rules: &RuleConfig) -> Pipeline {
    Pipeline::new()
        .then(ExpandCodeBlocks::new(rules.clone()))
        .then(StripDirectives::new(rules.clone()))
}

/// Full document pipeline: () → LineStream
///
/// Fragment inclusion followed by [`sanitize`]. Run it with no input.
pub fn document(manifest: &Manifest, rules: &RuleConfig) -> Pipeline {
    Pipeline::new()
        .then(Include::new(
            manifest.all_fragments(rules),
            manifest.project_root.clone(),
            rules.clone(),
        ))
        .then_pipeline(sanitize(rules))
}
