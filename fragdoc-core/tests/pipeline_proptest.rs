//! Property-based tests for the line pipeline
//!
//! These check the stream invariants over generated fragments rather than
//! hand-picked documents.

use fragdoc_core::concat::concatenate;
use fragdoc_core::sink::{notify, ProgressObserver};
use fragdoc_core::transforms::stages::StripDirectives;
use fragdoc_core::transforms::{standard, stream_from_lines, LineStream, Runnable};
use fragdoc_core::{assemble, Fragment, Manifest, MalformedOverridePolicy, RuleConfig};
use proptest::prelude::*;

/// A line of plain text, never a directive, shorthand or header
fn plain_line() -> impl Strategy<Value = String> {
    "[a-zA-Z][a-zA-Z ]{0,20}".prop_map(|text| format!("{}\n", text))
}

/// Any line the rules care about, mixed with plain text
fn rst_line() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => plain_line(),
        1 => Just(":orphan:\n".to_string()),
        1 => Just("\n".to_string()),
        1 => "[a-z]{1,8}".prop_map(|word| format!("{}::\n", word)),
        1 => "[a-z]{1,8}".prop_map(|kind| format!(".. highlight:: {}\n", kind)),
        1 => Just(".. note::\n".to_string()),
        1 => "[a-z]{1,8}".prop_map(|word| format!(":orphan: {}::\n", word)),
        1 => "[a-z]{1,8}".prop_map(|word| format!("{}::::\n", word)),
        1 => "[a-z]{1,8}".prop_map(|word| format!(".. Source defined in {}::\n", word)),
    ]
}

/// Between `fragments` fragments, each made of `lines` lines drawn from `line`
fn fragment_bodies(
    line: impl Strategy<Value = String>,
    lines: std::ops::Range<usize>,
    fragments: std::ops::Range<usize>,
) -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(prop::collection::vec(line, lines), fragments)
}

fn collect(stream: LineStream) -> Vec<String> {
    stream.collect::<Result<_, _>>().unwrap()
}

#[derive(Default)]
struct Counter {
    ticks: usize,
    finished: Option<usize>,
}

impl ProgressObserver for Counter {
    fn tick(&mut self, _line_index: usize) {
        self.ticks += 1;
    }

    fn finish(&mut self, lines: usize) {
        self.finished = Some(lines);
    }
}

proptest! {
    #[test]
    fn separators_between_fragments(fragments in fragment_bodies(plain_line(), 1..5, 0..6)) {
        let total: usize = fragments.iter().map(Vec::len).sum();
        let count = fragments.len();
        let streams: Vec<LineStream> = fragments.into_iter().map(stream_from_lines).collect();
        let out = collect(concatenate(streams));

        let separators = out.iter().filter(|line| line.as_str() == "\n").count();
        prop_assert_eq!(separators, count.saturating_sub(1));
        prop_assert_eq!(out.len(), total + count.saturating_sub(1));
    }

    #[test]
    fn stripping_preserves_other_lines(lines in prop::collection::vec(rst_line(), 0..40)) {
        let expected: Vec<String> = lines
            .iter()
            .filter(|line| !line.starts_with(":orphan:"))
            .cloned()
            .collect();
        let out = collect(StripDirectives::default().run(stream_from_lines(lines)));
        prop_assert_eq!(out, expected);
    }

    #[test]
    fn sanitized_output_is_expanded(lines in prop::collection::vec(rst_line(), 0..40)) {
        let rules = RuleConfig::default();
        let shorthands = lines
            .iter()
            .filter(|line| line.ends_with("::\n") && !line.trim().starts_with(".."))
            .count();
        let out = collect(standard::sanitize(&rules).run(Some(stream_from_lines(lines))));

        for line in &out {
            prop_assert!(!line.starts_with(".. highlight::"));
            prop_assert!(!line.starts_with(":orphan:"));
        }
        let blocks = out.iter().filter(|line| line.starts_with(".. code-block:: ")).count();
        prop_assert_eq!(blocks, shorthands);
    }

    #[test]
    fn every_fragment_gets_one_header(bodies in fragment_bodies(rst_line(), 0..8, 0..5)) {
        let count = bodies.len();
        let fragments = bodies
            .into_iter()
            .enumerate()
            .map(|(i, body)| Fragment::text(body.concat(), format!("/repo/docs/{}.rst", i)));
        let manifest = Manifest::new("/repo", "/repo/README.rst").with_fragments(fragments);
        let rules = RuleConfig {
            malformed_override: MalformedOverridePolicy::Ignore,
            ..RuleConfig::default()
        };

        let out = collect(assemble(&manifest, &rules));
        let headers: Vec<String> = out
            .into_iter()
            .filter(|line| line.starts_with(".. Source defined in") && line.ends_with("\n\n"))
            .collect();
        let expected: Vec<String> = (0..count)
            .map(|i| format!(".. Source defined in docs/{}.rst\n\n", i))
            .collect();
        prop_assert_eq!(headers, expected);
    }

    #[test]
    fn progress_does_not_alter_lines(lines in prop::collection::vec(plain_line(), 0..60)) {
        let mut counter = Counter::default();
        let out: Vec<String> = notify(stream_from_lines(lines.clone()), &mut counter, 5)
            .collect::<Result<_, _>>()
            .unwrap();

        prop_assert_eq!(&out, &lines);
        prop_assert_eq!(counter.ticks, lines.len().div_ceil(5));
        prop_assert_eq!(counter.finished, Some(lines.len()));
    }
}
