//! Document manifests
//!
//! A [`Manifest`] lists what goes into one output document: the fragments in
//! order, an optional generated preamble, and the paths used for headers and
//! output.

use crate::rules::RuleConfig;
use crate::source::Fragment;
use crate::transforms::{standard, LineStream};
use chrono::{DateTime, TimeZone};
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// File name text fragments are attributed to when nothing else is set
pub const DEFAULT_ORIGIN: &str = "fragdoc.toml";

/// Date format used in the generated-by banner, e.g. `Friday, December 11, 2015`
pub const BANNER_DATE_FORMAT: &str = "%A, %B %d, %Y";

/// Generated text placed before the configured fragments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preamble {
    /// Name of whatever produced the document, shown in the banner
    pub generator: String,
    /// Already formatted generation date
    pub date: String,
    /// Roles declared as `.. role:: <name>(literal)`
    pub literal_roles: Vec<String>,
}

impl Preamble {
    pub fn new<Tz>(generator: impl Into<String>, now: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Preamble {
            generator: generator.into(),
            date: now.format(BANNER_DATE_FORMAT).to_string(),
            literal_roles: Vec::new(),
        }
    }

    pub fn with_literal_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.literal_roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// `.. This document was procedurally generated by <generator> on <date>`
    pub fn banner(&self, rules: &RuleConfig) -> String {
        format!(
            "{} This document was procedurally generated by {} on {}",
            rules.comment_prefix, self.generator, self.date
        )
    }

    /// Role declarations, one per line; empty when no roles are configured
    pub fn roles(&self, rules: &RuleConfig) -> String {
        self.literal_roles
            .iter()
            .map(|role| format!("{} role:: {}(literal)\n", rules.comment_prefix, role))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    /// Header paths are relative to this directory
    pub project_root: PathBuf,
    /// Where the finished document is written
    pub output: PathBuf,
    /// File that text fragments and the preamble are attributed to
    pub origin: PathBuf,
    pub fragments: Vec<Fragment>,
    pub preamble: Option<Preamble>,
}

impl Manifest {
    pub fn new(project_root: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        Manifest {
            origin: project_root.join(DEFAULT_ORIGIN),
            project_root,
            output: output.into(),
            fragments: Vec::new(),
            preamble: None,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<PathBuf>) -> Self {
        self.origin = origin.into();
        self
    }

    pub fn with_fragment(mut self, fragment: Fragment) -> Self {
        self.fragments.push(fragment);
        self
    }

    pub fn with_fragments(mut self, fragments: impl IntoIterator<Item = Fragment>) -> Self {
        self.fragments.extend(fragments);
        self
    }

    pub fn with_preamble(mut self, preamble: Preamble) -> Self {
        self.preamble = Some(preamble);
        self
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Preamble fragments followed by the configured fragments
    pub fn all_fragments(&self, rules: &RuleConfig) -> Vec<Fragment> {
        let mut fragments = Vec::with_capacity(self.fragments.len() + 2);
        if let Some(preamble) = &self.preamble {
            fragments.push(Fragment::text(preamble.banner(rules), &self.origin));
            if !preamble.literal_roles.is_empty() {
                fragments.push(Fragment::text(preamble.roles(rules), &self.origin));
            }
        }
        fragments.extend(self.fragments.iter().cloned());
        fragments
    }
}

/// Build the lazy stream of the finished document.
///
/// No fragment is read until the returned stream is pulled.
pub fn assemble(manifest: &Manifest, rules: &RuleConfig) -> LineStream {
    standard::document(manifest, rules).run(None)
}
