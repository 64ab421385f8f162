//! Fragment concatenation
//!
//! Joins fragment streams into one stream with a single blank line between
//! consecutive fragments. Fragment `k + 1` is not touched before fragment `k`
//! is exhausted, and nothing is touched before the first pull.

use crate::transforms::{LineResult, LineStream};

/// Separator emitted between two fragments
pub const SEPARATOR: &str = "\n";

/// Concatenate fragment streams.
///
/// N fragments produce N - 1 separators; no fragments produce an empty stream.
/// When a fragment ends without a line terminator, the separator also ends that
/// line, so exactly one blank line always sits between fragments.
pub fn concatenate<I>(fragments: I) -> LineStream
where
    I: IntoIterator<Item = LineStream>,
    I::IntoIter: 'static,
{
    Box::new(Concatenate {
        fragments: fragments.into_iter(),
        current: None,
        started: false,
        line_open: false,
    })
}

struct Concatenate<I> {
    fragments: I,
    current: Option<LineStream>,
    /// At least one fragment has been started
    started: bool,
    /// Last emitted line had no terminator
    line_open: bool,
}

impl<I> Iterator for Concatenate<I>
where
    I: Iterator<Item = LineStream>,
{
    type Item = LineResult;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(current) = self.current.as_mut() {
                match current.next() {
                    Some(Ok(line)) => {
                        self.line_open = !line.ends_with('\n');
                        return Some(Ok(line));
                    }
                    Some(Err(err)) => return Some(Err(err)),
                    None => self.current = None,
                }
            }

            let next = self.fragments.next()?;
            self.current = Some(next);

            if self.started {
                let separator = if self.line_open {
                    format!("\n{}", SEPARATOR)
                } else {
                    SEPARATOR.to_string()
                };
                self.line_open = false;
                return Some(Ok(separator));
            }
            self.started = true;
        }
    }
}
