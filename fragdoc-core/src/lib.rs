//! # fragdoc-core
//!
//! Assembles one reStructuredText document out of an ordered list of fragment
//! files, rewriting it on the way through a lazy line pipeline.
//!
//! Data flow:
//!
//! ```text
//! fragments ──► Include ──► ExpandCodeBlocks ──► StripDirectives ──► notify ──► sink
//!               (source + concat)   (transforms::stages)                (sink)
//! ```
//!
//! Every arrow is an iterator adapter. Nothing is read before the sink pulls the
//! first line, and each line travels through all stages before the next one is
//! read.
//!
//! Modules:
//! - [`source`]: one fragment to a line stream with a header line
//! - [`concat`]: many fragment streams to one, separated by blank lines
//! - [`classification`]: what a single line means to the rules
//! - [`transforms`]: the `Runnable` stage trait, `Pipeline`, and the stages
//! - [`document`]: manifests and the generated preamble
//! - [`sink`]: progress observation and writers

pub mod classification;
pub mod concat;
pub mod document;
pub mod error;
pub mod rules;
pub mod sink;
pub mod source;
pub mod transforms;

pub use document::{assemble, Manifest, Preamble};
pub use error::AssembleError;
pub use rules::{MalformedOverridePolicy, RuleConfig};
pub use source::Fragment;
pub use transforms::{LineResult, LineStream, Pipeline, Runnable};
