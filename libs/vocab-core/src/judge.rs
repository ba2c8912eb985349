//! Answer judging for translate and cloze prompts.

use crate::cloze::BlankTemplate;
use crate::normalize::{fold, fold_stemmed, fold_whitespace, inflection_match};
use crate::types::{QuestionMode, Tolerance};
use serde::{Deserialize, Serialize};

/// Separators accepted between answers for a multi-blank sentence.
const ANSWER_SEPARATORS: [char; 5] = [',', ';', '/', '，', '；'];

/// Overall verdict on one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Correct,
    /// Some blanks right, some wrong.
    Partial,
    Incorrect,
}

/// Verdict for a single blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlankVerdict {
    pub index: usize,
    pub expected: String,
    pub given: String,
    pub correct: bool,
}

/// Result of judging a candidate answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judgment {
    pub correct: bool,
    pub outcome: Outcome,
    pub normalized_expected: String,
    pub normalized_candidate: String,
    /// Per-blank verdicts; empty in translate mode.
    pub blanks: Vec<BlankVerdict>,
}

impl Judgment {
    /// Indices of the blanks that were answered wrong.
    pub fn failed_blanks(&self) -> Vec<usize> {
        self.blanks
            .iter()
            .filter(|verdict| !verdict.correct)
            .map(|verdict| verdict.index)
            .collect()
    }

    fn single(correct: bool, normalized_expected: String, normalized_candidate: String) -> Self {
        Self {
            correct,
            outcome: if correct { Outcome::Correct } else { Outcome::Incorrect },
            normalized_expected,
            normalized_candidate,
            blanks: Vec::new(),
        }
    }
}

/// Judge one candidate against one expected string.
///
/// Translate mode is an exact comparison after case and whitespace folding.
/// Cloze mode additionally strips surrounding punctuation and folds inflections.
pub fn judge(expected: &str, candidate: &str, mode: QuestionMode) -> Judgment {
    judge_with(expected, candidate, mode, Tolerance::Inflected)
}

pub fn judge_with(expected: &str, candidate: &str, mode: QuestionMode, tolerance: Tolerance) -> Judgment {
    match mode {
        QuestionMode::Translate => {
            let normalized_expected = fold_whitespace(expected).to_lowercase();
            let normalized_candidate = fold_whitespace(candidate).to_lowercase();
            let correct = !normalized_expected.is_empty() && normalized_expected == normalized_candidate;
            Judgment::single(correct, normalized_expected, normalized_candidate)
        }
        QuestionMode::Cloze => {
            let (correct, normalized_expected, normalized_candidate) =
                match_token(expected, candidate, tolerance);
            Judgment::single(correct, normalized_expected, normalized_candidate)
        }
    }
}

/// Judge an answer against every blank of a template.
///
/// With more than one blank the candidate is split on `,` `;` `/`; a
/// missing answer counts as wrong for its blank. A blank whose own text
/// contains separators takes as many parts as that text splits into.
pub fn judge_template(template: &BlankTemplate, candidate: &str, tolerance: Tolerance) -> Judgment {
    let answers: Vec<&str> = if template.blanks.len() == 1 {
        vec![candidate]
    } else {
        candidate.split(ANSWER_SEPARATORS).map(str::trim).collect()
    };

    let mut expected_parts = Vec::with_capacity(template.blanks.len());
    let mut candidate_parts = Vec::with_capacity(template.blanks.len());
    let mut next = 0;
    let blanks: Vec<BlankVerdict> = template
        .blanks
        .iter()
        .enumerate()
        .map(|(index, blank)| {
            let given = if template.blanks.len() == 1 {
                candidate.to_string()
            } else {
                let width = blank.literal.split(ANSWER_SEPARATORS).count();
                let end = (next + width).min(answers.len());
                let parts = answers.get(next..end).unwrap_or_default();
                next = end;
                parts.join(", ")
            };
            let (correct, expected, normalized) = match_token(&blank.literal, &given, tolerance);
            expected_parts.push(expected);
            candidate_parts.push(normalized);
            BlankVerdict {
                index,
                expected: blank.literal.clone(),
                given,
                correct,
            }
        })
        .collect();

    let right = blanks.iter().filter(|verdict| verdict.correct).count();
    let outcome = if right == blanks.len() && !blanks.is_empty() {
        Outcome::Correct
    } else if right > 0 {
        Outcome::Partial
    } else {
        Outcome::Incorrect
    };

    Judgment {
        correct: outcome == Outcome::Correct,
        outcome,
        normalized_expected: expected_parts.join(", "),
        normalized_candidate: candidate_parts.join(", "),
        blanks,
    }
}

fn match_token(expected: &str, candidate: &str, tolerance: Tolerance) -> (bool, String, String) {
    match tolerance {
        Tolerance::Exact => {
            let expected = fold(expected);
            let candidate = fold(candidate);
            (!expected.is_empty() && expected == candidate, expected, candidate)
        }
        Tolerance::Inflected => (
            inflection_match(expected, candidate),
            fold_stemmed(expected),
            fold_stemmed(candidate),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloze::extract;

    #[test]
    fn cloze_folds_inflections() {
        assert!(judge("Running", "run", QuestionMode::Cloze).correct);
        assert!(judge("eats", "eat", QuestionMode::Cloze).correct);
        assert!(!judge("ran", "eat", QuestionMode::Cloze).correct);
        assert!(judge("apple", "apples", QuestionMode::Cloze).correct);
    }

    #[test]
    fn cloze_exact_tolerance_keeps_suffixes() {
        assert!(!judge_with("run", "running", QuestionMode::Cloze, Tolerance::Exact).correct);
        assert!(judge_with("Apple", " apple. ", QuestionMode::Cloze, Tolerance::Exact).correct);
    }

    #[test]
    fn translate_is_exact_after_folding() {
        let judgment = judge("Give  Up", " give up ", QuestionMode::Translate);
        assert!(judgment.correct);
        assert_eq!(judgment.normalized_expected, "give up");
        assert!(!judge("run", "running", QuestionMode::Translate).correct);
        assert!(!judge("run", "", QuestionMode::Translate).correct);
    }

    #[test]
    fn template_single_blank_takes_whole_answer() {
        let template = extract("She [[gave up]] smoking.").unwrap().unwrap();
        let judgment = judge_template(&template, "gave up", Tolerance::Inflected);
        assert!(judgment.correct);
        assert_eq!(judgment.outcome, Outcome::Correct);
        assert!(judgment.failed_blanks().is_empty());
    }

    #[test]
    fn template_reports_failed_blanks() {
        let template = extract("[[Look]] before you [[leap]].").unwrap().unwrap();
        let judgment = judge_template(&template, "look, jump", Tolerance::Inflected);
        assert!(!judgment.correct);
        assert_eq!(judgment.outcome, Outcome::Partial);
        assert_eq!(judgment.failed_blanks(), vec![1]);
        assert_eq!(judgment.blanks[1].given, "jump");
    }

    #[test]
    fn template_missing_answers_are_wrong() {
        let template = extract("[[Look]] before you [[leap]].").unwrap().unwrap();
        let judgment = judge_template(&template, "looking", Tolerance::Inflected);
        assert_eq!(judgment.outcome, Outcome::Partial);
        assert_eq!(judgment.failed_blanks(), vec![1]);

        let judgment = judge_template(&template, "", Tolerance::Inflected);
        assert_eq!(judgment.outcome, Outcome::Incorrect);
        assert_eq!(judgment.failed_blanks(), vec![0, 1]);
    }

    #[test]
    fn template_blank_with_separator_takes_several_parts() {
        let template = extract("She said [[yes, sir]] and [[left]].").unwrap().unwrap();
        let judgment = judge_template(&template, "yes, sir, left", Tolerance::Inflected);
        assert!(judgment.correct, "{:?}", judgment);
        assert_eq!(judgment.blanks[0].given, "yes, sir");
        assert_eq!(judgment.blanks[1].given, "left");

        let judgment = judge_template(&template, "yes sir; leaving", Tolerance::Inflected);
        assert_eq!(judgment.failed_blanks(), vec![0, 1]);

        let judgment = judge_template(&template, "yes, sir", Tolerance::Inflected);
        assert_eq!(judgment.outcome, Outcome::Partial);
        assert_eq!(judgment.failed_blanks(), vec![1]);
    }
}
