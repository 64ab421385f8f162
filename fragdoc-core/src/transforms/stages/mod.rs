//! Individual transformation stages
//!
//! This module contains the individual stages that can be composed into pipelines.
//! Each stage implements the `Runnable` trait.

pub mod code_blocks;
pub mod directives;
pub mod include;

pub use code_blocks::ExpandCodeBlocks;
pub use directives::StripDirectives;
pub use include::Include;
