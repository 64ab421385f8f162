//! End-to-end assembly tests
//!
//! Build real fragment files in a temporary project and run the standard
//! document pipeline over them.

use fragdoc_core::sink::{collect_document, notify, write_atomic, DotProgress};
use fragdoc_core::{assemble, AssembleError, Fragment, Manifest, RuleConfig};
use rstest::rstest;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("docs/source")).expect("source dir");
        Project { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn source(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root().join("docs/source").join(name);
        fs::write(&path, content).expect("write fragment");
        path
    }

    fn manifest(&self) -> Manifest {
        Manifest::new(self.root(), self.root().join("README.rst"))
    }
}

fn run(manifest: &Manifest) -> String {
    collect_document(assemble(manifest, &RuleConfig::default())).expect("assembly")
}

#[test]
fn test_readme_from_fragments() {
    let project = Project::new();
    let title = project.source("readme_title.rst", ":orphan:\n\nfragdoc\n=======\n");
    let usage = project.source(
        "usage.rst",
        "Usage\n-----\n\nBuild the readme::\n\n    fragdoc build\n\n.. highlight:: toml\n\nConfigure it::\n\n    [document]\n",
    );
    let credits = project.source(
        "readme_credits.rst",
        "Credits\n-------\n\nExample::\n\n    pass\n",
    );

    let manifest = project.manifest().with_fragments([
        Fragment::file(title),
        Fragment::file(usage),
        Fragment::file(credits),
    ]);

    insta::assert_snapshot!(run(&manifest), @r###"
    .. Source defined in docs/source/readme_title.rst


    fragdoc
    =======

    .. Source defined in docs/source/usage.rst

    Usage
    -----

    Build the readme

    .. code-block:: python

        fragdoc build


    Configure it

    .. code-block:: toml

        [document]

    .. Source defined in docs/source/readme_credits.rst

    Credits
    -------

    Example

    .. code-block:: python

        pass
    "###);
}

#[test]
fn test_every_fragment_starts_with_its_header() {
    let project = Project::new();
    let names = ["a.rst", "b.rst", "c.rst"];
    let fragments: Vec<Fragment> = names
        .iter()
        .map(|name| Fragment::file(project.source(name, "body\n")))
        .collect();
    let manifest = project.manifest().with_fragments(fragments);

    let lines: Vec<String> = assemble(&manifest, &RuleConfig::default())
        .collect::<Result<_, _>>()
        .unwrap();

    let headers: Vec<&String> = lines
        .iter()
        .filter(|line| line.starts_with(".. Source defined in"))
        .collect();
    assert_eq!(
        headers,
        vec![
            ".. Source defined in docs/source/a.rst\n\n",
            ".. Source defined in docs/source/b.rst\n\n",
            ".. Source defined in docs/source/c.rst\n\n",
        ]
    );
    assert_eq!(lines[0], *headers[0]);
}

#[test]
fn test_override_does_not_leak_into_next_fragment() {
    let project = Project::new();
    let first = project.source("first.rst", ".. highlight:: rust\n\nFirst::\n");
    let second = project.source("second.rst", "Second::\n");
    let manifest = project
        .manifest()
        .with_fragments([Fragment::file(first), Fragment::file(second)]);

    let document = run(&manifest);
    assert!(document.contains("First\n\n.. code-block:: rust\n"));
    assert!(document.contains("Second\n\n.. code-block:: python\n"));
    assert!(!document.contains(".. highlight::"));
}

#[rstest]
#[case(0, "")]
#[case(1, ".. Source defined in fragdoc.toml\n\n0\n")]
#[case(
    2,
    ".. Source defined in fragdoc.toml\n\n0\n\n.. Source defined in fragdoc.toml\n\n1\n"
)]
fn test_text_fragments(#[case] count: usize, #[case] expected: &str) {
    let fragments = (0..count).map(|i| Fragment::text(format!("{}\n", i), "/repo/fragdoc.toml"));
    let manifest = Manifest::new("/repo", "/repo/README.rst").with_fragments(fragments);
    assert_eq!(run(&manifest), expected);
}

#[test]
fn test_crlf_fragment_is_expanded() {
    let project = Project::new();
    let win = project.source("win.rst", "Example::\r\n\r\n    pass\r\n");
    let manifest = project.manifest().with_fragment(Fragment::file(win));

    assert_eq!(
        run(&manifest),
        ".. Source defined in docs/source/win.rst\n\n\
         Example\n\
         \n\
         .. code-block:: python\n\
         \n\
         \x20   pass\n"
    );
}

#[test]
fn test_missing_fragment_aborts_the_run() {
    let project = Project::new();
    let present = project.source("present.rst", "here\n");
    let missing = project.root().join("docs/source/missing.rst");
    let manifest = project
        .manifest()
        .with_fragments([Fragment::file(present), Fragment::file(&missing)]);

    match collect_document(assemble(&manifest, &RuleConfig::default())) {
        Err(AssembleError::NotFound { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_building_the_stream_reads_nothing() {
    let project = Project::new();
    let late = project.root().join("docs/source/late.rst");
    let manifest = project.manifest().with_fragment(Fragment::file(&late));

    // The fragment does not exist yet while the pipeline is being composed.
    let stream = assemble(&manifest, &RuleConfig::default());
    fs::write(&late, "Late::\n").unwrap();

    let document = collect_document(stream).unwrap();
    assert!(document.ends_with("Late\n\n.. code-block:: python\n"));
}

#[test]
fn test_write_with_progress() {
    let project = Project::new();
    let usage = project.source("usage.rst", "one\ntwo\nthree\nfour\n");
    let manifest = project.manifest().with_fragment(Fragment::file(usage));

    let mut dots = DotProgress::new("README.rst", Vec::new());
    let stream = notify(assemble(&manifest, &RuleConfig::default()), &mut dots, 5);
    let written = write_atomic(manifest.output(), stream).unwrap();

    assert_eq!(written, 5);
    assert_eq!(
        fs::read_to_string(manifest.output()).unwrap(),
        ".. Source defined in docs/source/usage.rst\n\none\ntwo\nthree\nfour\n"
    );
    assert_eq!(
        String::from_utf8(dots.into_inner()).unwrap(),
        "Writing README.rst.Done!\n"
    );
}

#[test]
fn test_failed_run_keeps_previous_readme() {
    let project = Project::new();
    let broken = project.source("broken.rst", "Intro\n.. highlight::\nBody::\n");
    let manifest = project.manifest().with_fragment(Fragment::file(broken));
    fs::write(manifest.output(), "old readme\n").unwrap();

    let result = write_atomic(manifest.output(), assemble(&manifest, &RuleConfig::default()));

    assert!(matches!(result, Err(AssembleError::MalformedOverride { .. })));
    assert_eq!(fs::read_to_string(manifest.output()).unwrap(), "old readme\n");
}
