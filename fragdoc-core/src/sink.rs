//! Stream consumers
//!
//! The end of every pipeline: progress observation through [`notify`], and
//! writers that drain a stream into a file, any `Write`, or a `String`.
//!
//! [`write_atomic`] writes into a temporary file next to the target and only
//! replaces the target once the whole stream was consumed without error. A run
//! that fails halfway leaves the previous output untouched.

use crate::error::AssembleError;
use crate::transforms::LineResult;
use log::info;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Default number of lines between two progress ticks
pub const DEFAULT_TICK_INTERVAL: usize = 5;

/// Receives progress events from [`Notify`]
///
/// All methods default to doing nothing.
pub trait ProgressObserver {
    /// Called before the first line is pulled
    fn start(&mut self) {}

    /// Called for every line whose zero-based index is a multiple of the interval
    fn tick(&mut self, _line_index: usize) {}

    /// Called once the stream is exhausted, with the number of lines seen
    fn finish(&mut self, _lines: usize) {}
}

impl<T: ProgressObserver + ?Sized> ProgressObserver for &mut T {
    fn start(&mut self) {
        (**self).start()
    }

    fn tick(&mut self, line_index: usize) {
        (**self).tick(line_index)
    }

    fn finish(&mut self, lines: usize) {
        (**self).finish(lines)
    }
}

impl<T: ProgressObserver + ?Sized> ProgressObserver for Box<T> {
    fn start(&mut self) {
        (**self).start()
    }

    fn tick(&mut self, line_index: usize) {
        (**self).tick(line_index)
    }

    fn finish(&mut self, lines: usize) {
        (**self).finish(lines)
    }
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// Prints `Writing <name>`, one dot per tick, then `Done!`
pub struct DotProgress<W: Write> {
    name: String,
    out: W,
}

impl<W: Write> DotProgress<W> {
    pub fn new(name: impl Into<String>, out: W) -> Self {
        DotProgress {
            name: name.into(),
            out,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

// Console output is best effort; a failing terminal must not fail the run.
impl<W: Write> ProgressObserver for DotProgress<W> {
    fn start(&mut self) {
        let _ = write!(self.out, "Writing {}", self.name);
        let _ = self.out.flush();
    }

    fn tick(&mut self, _line_index: usize) {
        let _ = write!(self.out, ".");
        let _ = self.out.flush();
    }

    fn finish(&mut self, _lines: usize) {
        let _ = writeln!(self.out, "Done!");
    }
}

/// Wrap a stream so `observer` sees its progress. Lines pass through unchanged.
///
/// An `interval` of zero disables ticks.
pub fn notify<I, O>(input: I, observer: O, interval: usize) -> Notify<I, O>
where
    I: Iterator<Item = LineResult>,
    O: ProgressObserver,
{
    Notify {
        input,
        observer,
        interval,
        seen: 0,
        started: false,
        finished: false,
    }
}

pub struct Notify<I, O> {
    input: I,
    observer: O,
    interval: usize,
    seen: usize,
    started: bool,
    finished: bool,
}

impl<I, O> Iterator for Notify<I, O>
where
    I: Iterator<Item = LineResult>,
    O: ProgressObserver,
{
    type Item = LineResult;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.started {
            self.started = true;
            self.observer.start();
        }

        match self.input.next() {
            Some(Ok(line)) => {
                if self.interval != 0 && self.seen % self.interval == 0 {
                    self.observer.tick(self.seen);
                }
                self.seen += 1;
                Some(Ok(line))
            }
            Some(Err(err)) => Some(Err(err)),
            None => {
                if !self.finished {
                    self.finished = true;
                    self.observer.finish(self.seen);
                }
                None
            }
        }
    }
}

/// Drain `lines` into `out`, returning the number of lines written
pub fn write_lines<W, I>(out: W, lines: I) -> Result<usize, AssembleError>
where
    W: Write,
    I: IntoIterator<Item = LineResult>,
{
    let mut writer = BufWriter::new(out);
    let mut count = 0;
    for line in lines {
        writer.write_all(line?.as_bytes())?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

/// Drain `lines` into `path`, replacing it only if every line was produced.
pub fn write_atomic<I>(path: &Path, lines: I) -> Result<usize, AssembleError>
where
    I: IntoIterator<Item = LineResult>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir)?;
    let count = write_lines(staged.as_file_mut(), lines)?;

    keep_permissions(path, staged.path())?;
    staged.persist(path).map_err(|err| err.error)?;
    info!("wrote {} lines to {}", count, path.display());
    Ok(count)
}

/// Give the staged file the target's permissions, or the usual ones for a new file.
fn keep_permissions(target: &Path, staged: &Path) -> Result<(), AssembleError> {
    match fs::metadata(target) {
        Ok(meta) => fs::set_permissions(staged, meta.permissions())?,
        Err(_) => {
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(staged, fs::Permissions::from_mode(0o644))?;
            }
        }
    }
    Ok(())
}

/// Collect a stream into a single string
pub fn collect_document<I>(lines: I) -> Result<String, AssembleError>
where
    I: IntoIterator<Item = LineResult>,
{
    lines.into_iter().collect()
}
