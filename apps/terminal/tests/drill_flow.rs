//! End-to-end drill tests over real unit files and a JSON ledger.

mod common;

use common::fixtures;
use common::TestContext;
use pretty_assertions::assert_eq;
use vocab_core::{ContentFilter, EntryKey, LedgerStore, QuestionMode, Settings};

fn cloze() -> Settings {
    Settings {
        mode: QuestionMode::Cloze,
        ..Settings::default()
    }
}

#[test]
fn test_loader_lists_books_and_units() {
    let ctx = TestContext::new(
        "fruit",
        &[("unit2.csv", fixtures::ROUGH_UNIT), ("unit1.csv", fixtures::FRUIT_UNIT), ("notes.txt", "x")],
    );
    let loader = ctx.loader();
    assert_eq!(loader.books().unwrap(), vec!["fruit".to_string()]);
    assert_eq!(loader.units("fruit").unwrap(), vec!["unit1.csv".to_string(), "unit2.csv".to_string()]);
    assert!(loader.units("missing").unwrap().is_empty());

    let records = loader
        .load("fruit", &["unit1.csv".to_string(), "gone.csv".to_string()])
        .unwrap();
    assert_eq!(records.len(), 3);
}

#[test]
fn test_correct_cloze_answers_leave_ledger_empty() {
    let ctx = TestContext::new("fruit", &[("unit1.csv", fixtures::FRUIT_UNIT)]);
    let session = ctx.session("fruit", Settings { seed: Some(1), ..cloze() });
    let (output, summary, wrong) = ctx.drill(session, &["apples", "pear", "gave up"]);

    assert!(output.contains("(1/3) Fill in the blank:"), "{}", output);
    assert!(output.contains("I ate an ___(苹果) today."), "{}", output);
    assert!(output.contains("--- Round complete! ---"));
    assert_eq!(summary.answered, 3);
    assert_eq!(summary.correct, 3);
    assert_eq!(wrong, 0);
    assert!(!ctx.ledger_store.path().exists());
}

#[test]
fn test_miss_is_persisted_and_reviewed() {
    let ctx = TestContext::new("fruit", &[("unit1.csv", fixtures::FRUIT_UNIT)]);
    let session = ctx.session("fruit", Settings { content: ContentFilter::Word, ..cloze() });
    let (output, summary, wrong) = ctx.drill(session, &["banana", "pear"]);

    assert!(output.contains("You typed: banana"));
    assert!(output.contains("Answer: apple"));
    assert_eq!(summary.correct, 1);
    assert_eq!(wrong, 1);
    let saved = ctx.ledger_store.load().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].key, EntryKey::new("apple", "n. 苹果"));

    // A new run picks the ledger back up and clears it on a correct review.
    let session = ctx.session("fruit", Settings::default());
    assert_eq!(session.wrong_count(), 1);
    let (output, _, wrong) = ctx.drill(session, &["/review", "apple"]);
    assert!(output.contains("--- Review: 1 words ---"), "{}", output);
    assert!(output.contains("苹果 (first letter: a)"), "{}", output);
    assert_eq!(wrong, 0);
    assert!(ctx.ledger_store.load().unwrap().is_empty());
}

#[test]
fn test_skip_and_clear_commands() {
    let ctx = TestContext::new("fruit", &[("unit1.csv", fixtures::FRUIT_UNIT)]);
    let session = ctx.session("fruit", Settings::default());
    let (output, summary, wrong) = ctx.drill(session, &["a", "wrong", "/clc", "/review"]);

    assert!(output.contains("Skipped: apple"));
    assert_eq!(summary.skipped, 1);
    assert!(output.contains("Wrong words cleared."));
    assert!(output.contains("No wrong words to review."));
    assert_eq!(wrong, 0);
    assert!(ctx.ledger_store.load().unwrap().is_empty());
}

#[test]
fn test_rough_examples_are_skipped_or_shown_whole() {
    let ctx = TestContext::new("rough", &[("unit.csv", fixtures::ROUGH_UNIT)]);
    let session = ctx.session("rough", cloze());
    let (output, summary, _) = ctx.drill(session, &["fig"]);

    assert!(output.contains("(1/1) Type the word:"), "{}", output);
    assert!(output.contains("A fig tree."), "{}", output);
    assert!(output.contains("malformed"), "{}", output);
    assert_eq!(summary.correct, 1);
}

#[test]
fn test_corrupt_ledger_starts_empty() {
    let ctx = TestContext::new("fruit", &[("unit1.csv", fixtures::FRUIT_UNIT)]);
    let path = ctx.ledger_store.path().to_path_buf();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ definitely not a ledger").unwrap();

    let session = ctx.session("fruit", Settings::default());
    assert_eq!(session.wrong_count(), 0);
    let (_, _, wrong) = ctx.drill(session, &["banana"]);
    assert_eq!(wrong, 1);

    assert_eq!(ctx.ledger_store.load().unwrap().len(), 1);
    assert_eq!(
        std::fs::read_to_string(ctx.ledger_store.corrupt_path()).unwrap(),
        "{ definitely not a ledger"
    );
}

#[test]
fn test_random_order_covers_every_entry() {
    let unit = fixtures::numbered_unit(12);
    let ctx = TestContext::new("numbers", &[("unit.csv", unit.as_str())]);
    let session = ctx.session(
        "numbers",
        Settings {
            order: vocab_core::Order::Random,
            seed: Some(9),
            ..cloze()
        },
    );
    let script: Vec<&str> = std::iter::repeat("/skip").take(12).collect();
    let (output, summary, wrong) = ctx.drill(session, &script);
    assert_eq!(summary.skipped, 12);
    assert_eq!(wrong, 0);
    for i in 0..12 {
        assert!(output.contains(&format!("Skipped: word{i}\n")), "word{} missing", i);
    }
}

#[test]
fn test_empty_review_keeps_the_round_going() {
    let ctx = TestContext::new("fruit", &[("unit1.csv", fixtures::FRUIT_UNIT)]);
    let session = ctx.session("fruit", Settings::default());
    let (output, summary, wrong) = ctx.drill(session, &["/review", "apple", "pear", "give up"]);

    assert!(output.contains("No wrong words to review."), "{}", output);
    assert!(output.contains("(3/3) Type the word:"), "{}", output);
    assert!(output.contains("--- Round complete! ---"), "{}", output);
    assert_eq!(summary.answered, 3);
    assert_eq!(summary.correct, 3);
    assert_eq!(wrong, 0);
}
