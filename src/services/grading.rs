use std::collections::HashSet;

use crate::db::types::QuestionKind;

/// Grades one answer against the stored correct answer. MCQ answers must
/// match exactly after trimming and lowercasing. Short answers are graded by
/// keyword overlap: at least half of the correct answer's words must appear
/// in the user's answer.
pub(crate) fn is_answer_correct(
    kind: QuestionKind,
    user_answer: &str,
    correct_answer: &str,
) -> bool {
    let user_clean = user_answer.trim().to_lowercase();
    let correct_clean = correct_answer.trim().to_lowercase();

    match kind {
        QuestionKind::Mcq => user_clean == correct_clean,
        QuestionKind::ShortAnswer => {
            let user_words: HashSet<&str> = user_clean.split_whitespace().collect();
            let correct_words: HashSet<&str> = correct_clean.split_whitespace().collect();

            if correct_words.is_empty() {
                return user_clean == correct_clean;
            }

            let matched = user_words.intersection(&correct_words).count();
            matched as f64 / correct_words.len() as f64 >= 0.5
        }
    }
}

pub(crate) fn percentage(total_score: i64, max_score: i64) -> f64 {
    if max_score > 0 {
        total_score as f64 / max_score as f64 * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mcq_ignores_case_and_surrounding_whitespace() {
        assert!(is_answer_correct(QuestionKind::Mcq, "  Paris  ", "Paris"));
        assert!(is_answer_correct(QuestionKind::Mcq, "paris", "Paris"));
        assert!(!is_answer_correct(QuestionKind::Mcq, "London", "Paris"));
    }

    #[test]
    fn mcq_requires_exact_option_text() {
        assert!(!is_answer_correct(QuestionKind::Mcq, "Paris France", "Paris"));
    }

    #[test]
    fn short_answer_requires_half_keyword_overlap() {
        let correct = "the cat sat on the mat";
        // 2 of the 5 distinct words is below the 0.5 threshold.
        assert!(!is_answer_correct(QuestionKind::ShortAnswer, "cat mat", correct));
        // "the cat sat" covers 3 of the 5 distinct words.
        assert!(is_answer_correct(QuestionKind::ShortAnswer, "the cat sat", correct));
    }

    #[test]
    fn short_answer_with_empty_correct_answer_compares_exactly() {
        assert!(is_answer_correct(QuestionKind::ShortAnswer, "   ", ""));
        assert!(!is_answer_correct(QuestionKind::ShortAnswer, "something", ""));
    }

    #[test]
    fn short_answer_is_case_insensitive() {
        assert!(is_answer_correct(
            QuestionKind::ShortAnswer,
            "OWNERSHIP AND BORROWING",
            "ownership and borrowing rules"
        ));
    }

    #[test]
    fn percentage_handles_zero_max_score() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(5, 0), 0.0);
    }

    #[test]
    fn percentage_scales_to_hundred() {
        assert_eq!(percentage(3, 4), 75.0);
        assert_eq!(percentage(4, 4), 100.0);
    }
}
