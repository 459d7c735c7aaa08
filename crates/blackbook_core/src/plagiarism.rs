//! Offline originality estimate.
//!
//! This is a word-frequency heuristic, not similarity detection. It stands in
//! for a remote plagiarism service and returns the same report shape.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::document::DocumentModel;

pub const LOW_LEXICAL_DIVERSITY: &str = "Low lexical diversity";

const MIN_TOKEN_CHARS: usize = 4;
const REPEAT_THRESHOLD: usize = 8;
const PENALTY_PER_REPEAT: usize = 2;
const MIN_ORIGINALITY: u8 = 40;
const FLAG_MIN_CHARS: usize = 180;
const FLAG_MAX_WORDS: usize = 35;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlaggedSection {
    pub section_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlagiarismReport {
    pub originality_percentage: u8,
    pub flagged_sections: Vec<FlaggedSection>,
}

/// Number of distinct tokens (4+ characters, case-folded) appearing more
/// than eight times in `text`.
pub fn repeated_token_count(text: &str) -> usize {
    let lowered = text.to_lowercase();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for word in lowered.split_whitespace() {
        if word.chars().count() < MIN_TOKEN_CHARS {
            continue;
        }
        *counts.entry(word).or_insert(0) += 1;
    }
    counts
        .values()
        .filter(|count| **count > REPEAT_THRESHOLD)
        .count()
}

/// `clamp(100 - 2 * repeated, 40, 100)`.
pub fn originality_score(repeated: usize) -> u8 {
    let penalty = repeated.saturating_mul(PENALTY_PER_REPEAT);
    let score = 100usize.saturating_sub(penalty);
    score.max(MIN_ORIGINALITY as usize).min(100) as u8
}

/// Long text with few words suggests padding.
pub fn is_low_diversity(content: &str) -> bool {
    content.chars().count() > FLAG_MIN_CHARS && content.split_whitespace().count() < FLAG_MAX_WORDS
}

pub fn estimate_originality(doc: &DocumentModel) -> PlagiarismReport {
    let joined = doc
        .sections
        .iter()
        .map(|section| section.content.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let flagged_sections = doc
        .sections
        .iter()
        .filter(|section| is_low_diversity(&section.content))
        .map(|section| FlaggedSection {
            section_id: section.id.clone(),
            reason: LOW_LEXICAL_DIVERSITY.to_string(),
        })
        .collect();

    PlagiarismReport {
        originality_percentage: originality_score(repeated_token_count(&joined)),
        flagged_sections,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_tokens_never_count() {
        let text = "the cat sat ".repeat(20);
        assert_eq!(repeated_token_count(&text), 0);
    }

    #[test]
    fn exactly_eight_repeats_is_not_repeated() {
        let eight = "rust ".repeat(8);
        assert_eq!(repeated_token_count(&eight), 0);
        let nine = "rust ".repeat(9);
        assert_eq!(repeated_token_count(&nine), 1);
    }

    #[test]
    fn counting_is_case_insensitive() {
        let text = "Data DATA data ".repeat(3);
        assert_eq!(repeated_token_count(&text), 1);
    }

    #[test]
    fn score_is_clamped() {
        assert_eq!(originality_score(0), 100);
        assert_eq!(originality_score(5), 90);
        assert_eq!(originality_score(30), 40);
        assert_eq!(originality_score(usize::MAX), 40);
    }
}
