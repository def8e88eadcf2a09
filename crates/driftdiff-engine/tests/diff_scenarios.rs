//! End-to-end fragment-stream scenarios and engine invariants.

use driftdiff_engine::{
    diff, project_new, project_old, DiffEngine, DiffOptions, Fragment, FragmentKind,
};
use pretty_assertions::assert_eq;

/// Flatten a stream to `(marker, text, color)` for readable assertions.
fn units(fragments: &[Fragment]) -> Vec<(&'static str, String, Option<usize>)> {
    fragments
        .iter()
        .map(|f| (f.kind.marker(), f.text.clone(), f.color))
        .collect()
}

fn unit(marker: &'static str, text: &str) -> (&'static str, String, Option<usize>) {
    (marker, text.to_string(), None)
}

fn colored(
    marker: &'static str,
    text: &str,
    color: usize,
) -> (&'static str, String, Option<usize>) {
    (marker, text.to_string(), Some(color))
}

#[test]
fn unchanged_text_yields_single_same_fragment() {
    let result = diff("hello world", "hello world").unwrap();
    assert_eq!(
        units(&result.fragments),
        vec![
            unit("{", ""),
            unit("[", ""),
            unit("=", "hello world"),
            unit("]", ""),
            unit("}", ""),
        ]
    );
    assert!(!result.error);
}

#[test]
fn pure_insertion() {
    let result = diff("", "abc").unwrap();
    assert_eq!(
        units(&result.fragments),
        vec![
            unit("{", ""),
            unit("[", ""),
            unit("+", "abc"),
            unit("]", ""),
            unit("}", ""),
        ]
    );
}

#[test]
fn pure_deletion() {
    let result = diff("abc", "").unwrap();
    assert_eq!(
        units(&result.fragments),
        vec![
            unit("{", ""),
            unit("[", ""),
            unit("-", "abc"),
            unit("]", ""),
            unit("}", ""),
        ]
    );
}

#[test]
fn word_replacement_is_word_granular() {
    let result = diff("the quick brown fox", "the quick red fox").unwrap();
    assert_eq!(
        units(&result.fragments),
        vec![
            unit("{", ""),
            unit("[", ""),
            unit("=", "the quick "),
            unit("-", "brown"),
            unit("+", "red"),
            unit("=", " fox"),
            unit("]", ""),
            unit("}", ""),
        ]
    );
}

#[test]
fn block_move_marks_and_colors() {
    // Two equal-word-count groups; exactly one becomes fixed, the other is
    // wrapped as a moved block with a mark at its original position.
    let result = diff("A B C D", "C D A B").unwrap();
    let fragments = &result.fragments;
    assert_eq!(project_new(fragments), "C D A B");
    assert_eq!(project_old(fragments), "A B C D");

    let openers: Vec<&Fragment> = fragments
        .iter()
        .filter(|f| {
            matches!(
                f.kind,
                FragmentKind::BlockStartLeft | FragmentKind::BlockStartRight
            )
        })
        .collect();
    let marks: Vec<&Fragment> = fragments
        .iter()
        .filter(|f| matches!(f.kind, FragmentKind::MarkLeft | FragmentKind::MarkRight))
        .collect();
    assert_eq!(openers.len(), 1, "exactly one moved group: {fragments:?}");
    assert_eq!(marks.len(), 1);
    assert_eq!(marks[0].text, "A B");
    assert_eq!(marks[0].color, openers[0].color);
    assert!(openers[0].color.is_some());
}

#[test]
fn word_split_refines_to_characters() {
    let result = diff("word", "w ord").unwrap();
    assert_eq!(
        units(&result.fragments),
        vec![
            unit("{", ""),
            unit("[", ""),
            unit("=", "w"),
            unit("+", " "),
            unit("=", "ord"),
            unit("]", ""),
            unit("}", ""),
        ]
    );
}

#[test]
fn moved_paragraph_full_stream() {
    let old = "Alpha para one.\n\nBeta para two.\n\nGamma para three.";
    let new = "Beta para two.\n\nAlpha para one.\n\nGamma para three.";
    let result = diff(old, new).unwrap();
    assert_eq!(
        units(&result.fragments),
        vec![
            unit("{", ""),
            unit("[", ""),
            colored("(>", "", 1),
            colored("=", "Beta para two.", 1),
            colored(")", "", 1),
            unit("+", "\n\n"),
            unit("=", "Alpha para one."),
            unit("-", "\n\n"),
            colored("<", "Beta para two.", 1),
            unit("=", "\n\nGamma para three."),
            unit("]", ""),
            unit("}", ""),
        ]
    );
    assert_eq!(project_new(&result.fragments), new);
    assert_eq!(project_old(&result.fragments), old);
}

#[test]
fn completely_different_texts_become_delete_then_insert() {
    let result = diff("aaa bbb ccc", "xxx yyy zzz").unwrap();
    assert_eq!(
        units(&result.fragments),
        vec![
            unit("{", ""),
            unit("[", ""),
            unit("-", "aaa bbb ccc"),
            unit("+", "xxx yyy zzz"),
            unit("]", ""),
            unit("}", ""),
        ]
    );
}

#[test]
fn idempotence_over_corpus() {
    for text in [
        "",
        "x",
        "hello world",
        "line one\nline two\n\npara two",
        "[[Link|label]] and {{template|arg}} text",
        "汉字 and émojis ✓ mixed",
    ] {
        let result = diff(text, text).unwrap();
        let same: Vec<&Fragment> = result
            .fragments
            .iter()
            .filter(|f| f.kind.is_text())
            .collect();
        assert_eq!(same.len(), 1, "one text fragment for {text:?}");
        assert_eq!(same[0].kind, FragmentKind::Same);
        assert_eq!(same[0].text, text);
        assert!(!result.error);
    }
}

#[test]
fn projections_reproduce_inputs_across_corpus() {
    let options = DiffOptions {
        full_diff: true,
        unit_testing: true,
        ..DiffOptions::default()
    };
    let engine = DiffEngine::new(options).unwrap();
    let cases = [
        (
            "The first sentence stays. The second one goes away.",
            "The first sentence stays. A brand new second one appears!",
        ),
        (
            "== Heading ==\nSome wiki text with a [[link]] here.\n\nSecond paragraph.",
            "== Heading ==\nSecond paragraph.\n\nSome wiki text with a [[link]] there.",
        ),
        (
            "shared start aaa bbb ccc shared end",
            "shared start ccc bbb aaa shared end",
        ),
        ("word", "w ord"),
        ("w ord", "word"),
        ("über straße çğı", "über neue straße çğı"),
        ("a\r\nb\rc", "a\nb\nd"),
        ("", "something from nothing"),
        ("everything removed", ""),
        (
            "common one two three common four",
            "four common one two three common",
        ),
    ];
    for &(a, b) in &cases {
        for (old, new) in [(a, b), (b, a)] {
            let result = engine.diff(old, new).unwrap();
            let old_norm = old.replace("\r\n", "\n").replace('\r', "\n");
            let new_norm = new.replace("\r\n", "\n").replace('\r', "\n");
            assert_eq!(
                project_new(&result.fragments),
                new_norm,
                "NEW projection for {old:?} → {new:?}"
            );
            assert_eq!(
                project_old(&result.fragments),
                old_norm,
                "OLD projection for {old:?} → {new:?}"
            );
            assert!(!result.error, "self-check failed for {old:?} → {new:?}");
        }
    }
}

#[test]
fn clipping_only_affects_unchanged_interiors() {
    // Long unchanged middle between two small edits: clipping must keep
    // every changed fragment identical and only shorten `=` text.
    let middle: String = (0..200)
        .map(|i| format!("filler line number {i} with several words\n"))
        .collect();
    let old = format!("old start\n{middle}old end");
    let new = format!("new start\n{middle}new end");

    let full_engine = DiffEngine::new(DiffOptions {
        full_diff: true,
        ..DiffOptions::default()
    })
    .unwrap();
    let clip_engine = DiffEngine::with_defaults();

    let full = full_engine.diff(&old, &new).unwrap();
    let clipped = clip_engine.diff(&old, &new).unwrap();

    let changed = |result: &driftdiff_engine::DiffResult| -> Vec<(FragmentKind, String)> {
        result
            .fragments
            .iter()
            .filter(|f| matches!(f.kind, FragmentKind::Delete | FragmentKind::Insert))
            .map(|f| (f.kind, f.text.clone()))
            .collect()
    };
    assert_eq!(changed(&full), changed(&clipped));

    let same_len = |result: &driftdiff_engine::DiffResult| -> usize {
        result
            .fragments
            .iter()
            .filter(|f| f.kind == FragmentKind::Same)
            .map(|f| f.text.chars().count())
            .sum()
    };
    assert!(
        same_len(&clipped) < same_len(&full),
        "clipping should drop unchanged interior text"
    );
    // Clipping introduces at least one fragment separator.
    assert!(
        clipped
            .fragments
            .iter()
            .any(|f| f.kind == FragmentKind::Separator)
    );
}

#[test]
fn invalid_configuration_is_refused() {
    let options = DiffOptions {
        block_min_length: 0,
        ..DiffOptions::default()
    };
    let err = DiffEngine::new(options).unwrap_err();
    assert!(matches!(
        err,
        driftdiff_engine::DiffError::InvalidConfig(_)
    ));
}

#[test]
fn line_endings_are_normalized() {
    let result = diff("one\r\ntwo\rthree", "one\ntwo\nthree").unwrap();
    let text: Vec<&Fragment> = result
        .fragments
        .iter()
        .filter(|f| f.kind.is_text())
        .collect();
    assert_eq!(text.len(), 1);
    assert_eq!(text[0].kind, FragmentKind::Same);
}

#[test]
fn strip_trailing_newline_option() {
    let engine = DiffEngine::new(DiffOptions {
        strip_trailing_newline: true,
        ..DiffOptions::default()
    })
    .unwrap();
    let result = engine.diff("same text\n", "same text").unwrap();
    let text: Vec<&Fragment> = result
        .fragments
        .iter()
        .filter(|f| f.kind.is_text())
        .collect();
    assert_eq!(text.len(), 1);
    assert_eq!(text[0].text, "same text");
}
