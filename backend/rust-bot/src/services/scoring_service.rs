use crate::models::{Mistake, ScoreReport};

use super::answer_key_service::AnswerKey;

/// Strips every whitespace character and lowercases, so "A" and " a " compare equal.
pub fn normalize(answer: &str) -> String {
    answer
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Splits a message into one answer per character.
pub fn split_submission(text: &str) -> Vec<String> {
    text.trim().chars().map(String::from).collect()
}

/// Compares a submission position by position. The caller guarantees
/// `submission.len() == key.len()`.
pub fn score(submission: &[String], key: &AnswerKey) -> (usize, Vec<Mistake>) {
    debug_assert_eq!(submission.len(), key.len());

    let mut correct = 0;
    let mut mistakes = Vec::new();

    for (i, (given, expected)) in submission.iter().zip(key.answers()).enumerate() {
        if normalize(given) == normalize(expected) {
            correct += 1;
        } else {
            mistakes.push(Mistake {
                position: i + 1,
                submitted: given.clone(),
            });
        }
    }

    (correct, mistakes)
}

/// Share of correct answers, rounded half to even; 0 for an empty test.
pub fn percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round_ties_even() as u32
}

/// Scores a full submission, or returns `None` when its length does not match the key.
pub fn evaluate(submission: &[String], key: &AnswerKey) -> Option<ScoreReport> {
    if submission.len() != key.len() {
        return None;
    }

    let (correct, mistakes) = score(submission, key);
    Some(ScoreReport {
        correct,
        total: key.len(),
        percentage: percentage(correct, key.len()),
        mistakes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(answers: &[&str]) -> AnswerKey {
        AnswerKey::new(answers.iter().map(|a| a.to_string()).collect())
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("A"), "a");
        assert_eq!(normalize("a "), "a");
        assert_eq!(normalize(" B \t c\n"), "bc");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn normalize_is_idempotent() {
        for input in ["", "A b", "  X\tY  ", "Ёж Ü", "abc"] {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input {:?}", input);
        }
    }

    #[test]
    fn submission_is_trimmed_and_split_into_chars() {
        assert_eq!(split_submission("  abd \n"), vec!["a", "b", "d"]);
        assert!(split_submission("   ").is_empty());
    }

    #[test]
    fn scores_with_one_based_mistakes() {
        let submission = split_submission("abd");
        let report = evaluate(&submission, &key(&["a", "b", "c"])).unwrap();

        assert_eq!(report.correct, 2);
        assert_eq!(report.total, 3);
        assert_eq!(report.percentage, 67);
        assert_eq!(
            report.mistakes,
            vec![Mistake {
                position: 3,
                submitted: "d".to_string()
            }]
        );
    }

    #[test]
    fn comparison_ignores_case() {
        let submission = split_submission("ABC");
        let (correct, mistakes) = score(&submission, &key(&["a", "b ", " c"]));
        assert_eq!(correct, 3);
        assert!(mistakes.is_empty());
    }

    #[test]
    fn empty_key_and_empty_submission() {
        let report = evaluate(&split_submission(""), &AnswerKey::default()).unwrap();
        assert_eq!(report.correct, 0);
        assert_eq!(report.percentage, 0);
    }

    #[test]
    fn length_mismatch_is_not_scored() {
        assert!(evaluate(&split_submission("ab"), &key(&["a", "b", "c"])).is_none());
        assert!(evaluate(&split_submission("abcd"), &key(&["a", "b", "c"])).is_none());
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(5, 0), 0);
        assert_eq!(percentage(0, 3), 0);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(3, 3), 100);
        // halves round to even
        assert_eq!(percentage(1, 8), 12);
        assert_eq!(percentage(3, 8), 38);
    }
}
