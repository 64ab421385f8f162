//! Fragment sources
//!
//! This module turns one [`Fragment`] into a lazy line stream. The stream starts
//! with a header line naming where the fragment came from, relative to the
//! project root, and then yields every line of the fragment in order.
//!
//! # Example
//!
//! ```rust,ignore
//! use fragdoc_core::rules::RuleConfig;
//! use fragdoc_core::source::{read_fragment, Fragment};
//!
//! let rules = RuleConfig::default();
//! let lines = read_fragment(Fragment::file("docs/source/usage.rst"), "/repo".as_ref(), &rules);
//! ```
//!
//! Line terminators are normalised: `\r\n` comes out as `\n`, so the rule
//! stages only ever see one terminator.
//!
//! Files are opened on the first pull, not when the stream is built. The handle
//! lives inside the iterator and is closed when the last line was read, when an
//! error was reported, or when the iterator is dropped.

use crate::error::AssembleError;
use crate::rules::RuleConfig;
use crate::transforms::{LineResult, LineStream};
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// One unit of source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// A text file on disk
    File(PathBuf),
    /// Literal text; `origin` is the file that defined it, used for the header line
    Text { text: String, origin: PathBuf },
}

impl Fragment {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Fragment::File(path.into())
    }

    pub fn text(text: impl Into<String>, origin: impl Into<PathBuf>) -> Self {
        Fragment::Text {
            text: text.into(),
            origin: origin.into(),
        }
    }

    /// Path shown in the header line
    pub fn origin(&self) -> &Path {
        match self {
            Fragment::File(path) => path,
            Fragment::Text { origin, .. } => origin,
        }
    }
}

/// Express `path` relative to `root`.
///
/// Falls back to the path as given when no relative form exists (for instance a
/// relative path against an absolute root).
pub fn relative_path(path: &Path, root: &Path) -> String {
    pathdiff::diff_paths(path, root)
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

/// Build the lazy line stream for one fragment
pub fn read_fragment(fragment: Fragment, project_root: &Path, rules: &RuleConfig) -> LineStream {
    let header = rules.header_line(&relative_path(fragment.origin(), project_root));
    let state = match fragment {
        Fragment::File(path) => ReadState::Pending(path),
        Fragment::Text { text, .. } => ReadState::Text { text, pos: 0 },
    };

    Box::new(FragmentLines {
        header: Some(header),
        state,
    })
}

enum ReadState {
    /// File not opened yet
    Pending(PathBuf),
    Open(BufReader<File>),
    Text { text: String, pos: usize },
    Done,
}

/// Iterator over a header line followed by the lines of one fragment
struct FragmentLines {
    header: Option<String>,
    state: ReadState,
}

impl FragmentLines {
    fn open(&mut self, path: PathBuf) -> Option<AssembleError> {
        match File::open(&path) {
            Ok(file) => {
                debug!("reading fragment {}", path.display());
                self.state = ReadState::Open(BufReader::new(file));
                None
            }
            Err(err) => Some(AssembleError::from_open(path, err)),
        }
    }
}

impl Iterator for FragmentLines {
    type Item = LineResult;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.state, ReadState::Pending(_)) {
            if let ReadState::Pending(path) = std::mem::replace(&mut self.state, ReadState::Done) {
                if let Some(err) = self.open(path) {
                    self.header = None;
                    return Some(Err(err));
                }
            }
        }

        if let Some(header) = self.header.take() {
            return Some(Ok(header));
        }

        match &mut self.state {
            ReadState::Open(reader) => {
                let mut line = String::new();
                match reader.read_line(&mut line) {
                    Ok(0) => {
                        self.state = ReadState::Done;
                        None
                    }
                    Ok(_) => Some(Ok(fold_crlf(line))),
                    Err(err) => {
                        self.state = ReadState::Done;
                        Some(Err(err.into()))
                    }
                }
            }
            ReadState::Text { text, pos } => {
                let rest = &text[*pos..];
                if rest.is_empty() {
                    self.state = ReadState::Done;
                    return None;
                }
                let end = rest.find('\n').map_or(rest.len(), |i| i + 1);
                let line = rest[..end].to_string();
                *pos += end;
                Some(Ok(fold_crlf(line)))
            }
            ReadState::Pending(_) | ReadState::Done => None,
        }
    }
}

fn fold_crlf(mut line: String) -> String {
    if line.ends_with("\r\n") {
        line.truncate(line.len() - 2);
        line.push('\n');
    }
    line
}
