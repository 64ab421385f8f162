//! Transform pipeline infrastructure
//!
//! Every processing step in fragdoc is a function from a lazy line stream to
//! another lazy line stream. This module provides the pieces that let those
//! steps be composed:
//!
//! ## 1. The `Runnable` Trait
//!
//! The interface for all stages. A stage receives the upstream [`LineStream`]
//! and returns a new one that wraps it:
//!
//! ```rust,ignore
//! pub trait Runnable {
//!     fn name(&self) -> &str;
//!     fn run(&self, input: LineStream) -> LineStream;
//! }
//! ```
//!
//! `run` must not pull from `input`. It only builds the adapter; lines move when
//! the final consumer asks for them.
//!
//! ## 2. The `Pipeline` Type
//!
//! An ordered list of stages, built with `.then()`:
//!
//! ```rust,ignore
//! let pipeline = Pipeline::new()
//!     .then(Include::new(fragments, project_root, rules.clone()))
//!     .then(ExpandCodeBlocks::new(rules.clone()))
//!     .then(StripDirectives::new(rules.clone()));
//!
//! for line in pipeline.run(None) {
//!     print!("{}", line?);
//! }
//! ```
//!
//! `Pipeline::run` folds the stages left to right over the initial input using
//! [`compose`]. A `None` input means "no input": the first stage is expected to
//! be a producer that ignores what it receives.
//!
//! See the [`standard`] module for the pre-built rule chain.
//!
//! # Module Organization
//!
//! - [`stages`]: Individual stages (fragment inclusion, code blocks, directives)
//! - [`standard`]: Pre-built stage combinations

pub mod stages;
pub mod standard;

use crate::error::AssembleError;

/// One item of a line stream: a line with its terminator, or the error that ended the run.
pub type LineResult = Result<String, AssembleError>;

/// Lazy, forward-only, single-pass sequence of lines.
pub type LineStream = Box<dyn Iterator<Item = LineResult>>;

/// Trait for anything that can turn one line stream into another
///
/// This is implemented by individual stages. The [`Pipeline`] struct composes
/// multiple `Runnable` implementations.
pub trait Runnable {
    /// Short identifier used in listings and logs
    fn name(&self) -> &str;

    /// Wrap `input` in this stage's transformation
    ///
    /// Implementations must stay lazy: no line may be pulled from `input` here.
    fn run(&self, input: LineStream) -> LineStream;
}

/// Chain results from a list of steps, feeding each output into the next step.
///
/// This is an inverted reduce: `compose([f, g, h], x)` is `h(g(f(x)))`.
pub fn compose<T, F, I>(steps: I, initial: T) -> T
where
    I: IntoIterator<Item = F>,
    F: FnOnce(T) -> T,
{
    steps.into_iter().fold(initial, |result, step| step(result))
}

/// A stream that yields nothing
pub fn empty_stream() -> LineStream {
    Box::new(std::iter::empty())
}

/// Build a stream out of already known lines
pub fn stream_from_lines<I, S>(lines: I) -> LineStream
where
    I: IntoIterator<Item = S>,
    I::IntoIter: 'static,
    S: Into<String>,
{
    Box::new(lines.into_iter().map(|line| Ok(line.into())))
}

/// A stage built from a closure
pub struct FnStage<F> {
    name: String,
    run_fn: F,
}

/// Create a stage from a function
pub fn from_fn<F>(name: impl Into<String>, run_fn: F) -> FnStage<F>
where
    F: Fn(LineStream) -> LineStream,
{
    FnStage {
        name: name.into(),
        run_fn,
    }
}

impl<F> Runnable for FnStage<F>
where
    F: Fn(LineStream) -> LineStream,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, input: LineStream) -> LineStream {
        (self.run_fn)(input)
    }
}

/// An ordered chain of stages
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn Runnable>>,
}

impl Pipeline {
    /// Create a pipeline with no stages
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage to the end of the chain
    pub fn then<S>(mut self, stage: S) -> Self
    where
        S: Runnable + 'static,
    {
        self.stages.push(Box::new(stage));
        self
    }

    /// Append every stage of another pipeline, keeping their order
    pub fn then_pipeline(mut self, next: Pipeline) -> Self {
        self.stages.extend(next.stages);
        self
    }

    /// Names of the stages, in execution order
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Build the composed stream
    ///
    /// Nothing is evaluated here; lines flow only when the returned stream is pulled.
    pub fn run(&self, initial: Option<LineStream>) -> LineStream {
        let initial = initial.unwrap_or_else(empty_stream);
        compose(
            self.stages
                .iter()
                .map(|stage| move |lines: LineStream| stage.run(lines)),
            initial,
        )
    }
}

impl Runnable for Pipeline {
    fn name(&self) -> &str {
        "pipeline"
    }

    fn run(&self, input: LineStream) -> LineStream {
        Pipeline::run(self, Some(input))
    }
}
