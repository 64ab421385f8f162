//! Line Classification
//!
//! Pure classification of single lines for the rule stages. Stages call
//! [`classify_line`] and dispatch on the result instead of testing prefixes
//! and suffixes inline.
//!
//! Whether a line starts a fragment, and whether it is a skip directive, are
//! reported separately from its [`LineType`]. Each is matched on its own
//! prefix, so one line can carry any combination of them.
//!
//! Lines are expected with `\n` terminators; the fragment reader folds `\r\n`
//! before lines get here.

use crate::rules::RuleConfig;

/// What a line means to the rule stages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineType {
    /// Block kind override directive; `None` when no kind follows the directive
    Override(Option<String>),
    /// Ends with the shorthand terminator and is not itself a directive or comment
    Shorthand,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// The line is a fragment header
    pub starts_fragment: bool,
    /// The line starts with one of the skip prefixes and is dropped from the output
    pub skip: bool,
    pub kind: LineType,
}

/// Classify one line (terminator included).
///
/// The kind follows this order:
/// 1. Override directive
/// 2. Literal block shorthand
/// 3. Default to plain
pub fn classify_line(line: &str, rules: &RuleConfig) -> Classification {
    let starts_fragment = is_fragment_start(line, rules);
    let skip = is_skip_directive(line, rules);

    let kind = if let Some(kind) = parse_override(line, rules) {
        LineType::Override(kind)
    } else if is_shorthand(line, rules) {
        LineType::Shorthand
    } else {
        LineType::Plain
    };

    Classification {
        starts_fragment,
        skip,
        kind,
    }
}

/// Check if line is a fragment header
pub fn is_fragment_start(line: &str, rules: &RuleConfig) -> bool {
    line.starts_with(&rules.header_prefix())
}

/// Parse an override directive.
///
/// Returns `None` if the line is not an override at all, `Some(None)` if it is an
/// override without a kind, and `Some(Some(kind))` otherwise. The kind is the last
/// whitespace separated token on the line.
fn parse_override(line: &str, rules: &RuleConfig) -> Option<Option<String>> {
    let rest = line.strip_prefix(rules.override_directive.as_str())?;

    // `.. highlight::rust` or `.. highlighted` are not the directive
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }

    Some(rest.split_whitespace().last().map(str::to_string))
}

/// Check if line ends with the shorthand terminator followed by a newline
fn is_shorthand(line: &str, rules: &RuleConfig) -> bool {
    let ends_with_terminator = line
        .strip_suffix('\n')
        .is_some_and(|body| body.ends_with(rules.shorthand_terminator.as_str()));

    ends_with_terminator && !line.trim().starts_with(rules.comment_prefix.as_str())
}

/// Check if line starts with one of the skip prefixes
pub fn is_skip_directive(line: &str, rules: &RuleConfig) -> bool {
    rules
        .skip_prefixes
        .iter()
        .any(|prefix| line.starts_with(prefix.as_str()))
}

/// Remove the shorthand terminator from a shorthand line, keeping the newline.
///
/// `"Example::\n"` becomes `"Example\n"`.
pub fn strip_shorthand(line: &str, rules: &RuleConfig) -> String {
    match line
        .strip_suffix('\n')
        .and_then(|body| body.strip_suffix(rules.shorthand_terminator.as_str()))
    {
        Some(body) => format!("{}\n", body),
        None => line.to_string(),
    }
}
