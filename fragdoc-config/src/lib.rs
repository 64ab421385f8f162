//! Shared configuration loader for fragdoc.
//!
//! `defaults/fragdoc.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`FragdocConfig`].
//! [`FragdocConfig::manifest`] then turns the `[document]` section into the
//! [`Manifest`] the pipeline runs on.

use chrono::{DateTime, TimeZone};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use fragdoc_core::{Fragment, Manifest, Preamble, RuleConfig};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_TOML: &str = include_str!("../defaults/fragdoc.default.toml");

/// File name looked up in the working directory when no config is given.
pub const CONFIG_FILE_NAME: &str = "fragdoc.toml";

/// Top-level configuration consumed by fragdoc applications.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FragdocConfig {
    pub document: DocumentConfig,
    pub rules: RuleConfig,
    pub progress: ProgressConfig,
}

/// What goes into the output document and where it ends up.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DocumentConfig {
    pub project_root: PathBuf,
    pub source_root: PathBuf,
    pub output: PathBuf,
    pub preamble: bool,
    pub generator: String,
    pub literal_roles: Vec<String>,
    pub fragments: Vec<FragmentSpec>,
}

/// One `[[document.fragments]]` entry; exactly one of `file` and `text` is set.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FragmentSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProgressConfig {
    pub enabled: bool,
    pub tick_interval: usize,
    pub display: ProgressDisplay,
}

/// How `fragdoc build` reports progress
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProgressDisplay {
    #[default]
    Spinner,
    Dots,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManifestError {
    #[error("fragment #{index} sets neither `file` nor `text`")]
    EmptyFragment { index: usize },
    #[error("fragment #{index} sets both `file` and `text`")]
    AmbiguousFragment { index: usize },
}

impl FragdocConfig {
    /// Build the manifest described by the `[document]` section.
    ///
    /// Relative paths are resolved against `base_dir`. Text fragments and the
    /// preamble are attributed to `origin`, normally the configuration file.
    pub fn manifest<Tz>(
        &self,
        base_dir: &Path,
        origin: &Path,
        now: &DateTime<Tz>,
    ) -> Result<Manifest, ManifestError>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let document = &self.document;
        let project_root = base_dir.join(&document.project_root);
        let source_root = base_dir.join(&document.source_root);

        let fragments = document
            .fragments
            .iter()
            .enumerate()
            .map(|(index, spec)| spec.to_fragment(index, &source_root, origin))
            .collect::<Result<Vec<_>, _>>()?;

        let mut manifest = Manifest::new(project_root, base_dir.join(&document.output))
            .with_origin(origin)
            .with_fragments(fragments);

        if document.preamble {
            manifest = manifest.with_preamble(
                Preamble::new(document.generator.clone(), now)
                    .with_literal_roles(document.literal_roles.iter().cloned()),
            );
        }

        Ok(manifest)
    }
}

impl FragmentSpec {
    fn to_fragment(
        &self,
        index: usize,
        source_root: &Path,
        origin: &Path,
    ) -> Result<Fragment, ManifestError> {
        match (&self.file, &self.text) {
            (Some(file), None) => Ok(Fragment::file(source_root.join(file))),
            (None, Some(text)) => Ok(Fragment::text(text.clone(), origin)),
            (None, None) => Err(ManifestError::EmptyFragment { index }),
            (Some(_), Some(_)) => Err(ManifestError::AmbiguousFragment { index }),
        }
    }
}

/// Builds a [`FragdocConfig`] out of layered sources.
///
/// Later layers win. The embedded defaults always sit at the bottom, so every
/// key has a value even when no `fragdoc.toml` exists.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a `fragdoc.toml` the user pointed at; building fails if it is absent.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.with_toml_file(path.as_ref(), true)
    }

    /// Layer a `fragdoc.toml` that may or may not exist.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.with_toml_file(path.as_ref(), false)
    }

    fn with_toml_file(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path)
            .format(FileFormat::Toml)
            .required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer TOML text, such as a manifest embedded in another file.
    pub fn with_toml_str(mut self, toml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(toml, FileFormat::Toml));
        self
    }

    /// Set one dotted key, e.g. `rules.default_kind`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Apply a `KEY=VALUE` assignment as given on the command line.
    ///
    /// The value stays a string; deserialization converts it to the key's type.
    pub fn with_assignment(self, assignment: &str) -> Result<Self, ConfigError> {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            ConfigError::Message(format!("invalid setting '{}', expected KEY=VALUE", assignment))
        })?;
        self.set_override(key.trim(), value.trim().to_string())
    }

    pub fn build(self) -> Result<FragdocConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// The configuration used when no file and no overrides are given
pub fn load_defaults() -> Result<FragdocConfig, ConfigError> {
    Loader::new().build()
}
