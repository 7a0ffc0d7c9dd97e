//! Review helpfulness scoring.
//!
//! The scorer rates a review on six dimensions (descriptiveness, sentiment,
//! actionability, uniqueness, specificity, length adequacy) and folds them
//! into a single [`HelpfulnessScore`] in `1..=100`.
//!
//! Scoring is total and deterministic: integer arithmetic only, and an empty
//! or malformed review yields [`MIN_HELPFULNESS_SCORE`] instead of an error.
//! Payouts are derived from this score, so identical input must always give
//! an identical result.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::review::Review;

/// Lowest score a review can get; also the fallback for empty input.
pub const MIN_HELPFULNESS_SCORE: u8 = 1;

/// Highest score a review can get.
pub const MAX_HELPFULNESS_SCORE: u8 = 100;

/// Dimension weights, in percent.
const WEIGHT_DESCRIPTIVENESS: u32 = 20;
const WEIGHT_SENTIMENT: u32 = 10;
const WEIGHT_ACTIONABILITY: u32 = 20;
const WEIGHT_UNIQUENESS: u32 = 15;
const WEIGHT_SPECIFICITY: u32 = 20;
const WEIGHT_LENGTH: u32 = 15;

/// Word count range considered an adequate length.
const ADEQUATE_LENGTH: (usize, usize) = (50, 300);

/// Words of at least this many characters count as specific.
const SPECIFIC_WORD_LEN: usize = 9;

const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
    "one", "our", "out", "has", "him", "his", "how", "its", "may", "new", "now", "old", "see",
    "two", "way", "who", "did", "get", "got", "let", "say", "she", "too", "use", "this", "that",
    "with", "have", "from", "they", "will", "would", "there", "their", "what", "about", "which",
    "when", "were", "been", "than", "them", "then", "these", "some", "into", "very", "just",
    "also", "your", "it's", "i'm",
];

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "amazing", "love", "loved", "like", "liked", "helpful",
    "friendly", "fast", "easy", "clean", "awesome", "fantastic", "perfect", "nice", "happy",
    "satisfied", "reliable", "recommend", "pleasant", "impressive", "smooth",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "poor", "terrible", "awful", "hate", "hated", "dislike", "slow", "rude", "dirty",
    "broken", "expensive", "confusing", "difficult", "disappointed", "disappointing", "worst",
    "unhelpful", "buggy", "crash", "crashes", "late", "unreliable", "annoying",
];

const SUGGESTION_MARKERS: &[&str] = &[
    "should", "could", "recommend", "suggest", "improve", "consider", "fix", "add", "wish",
    "please", "better",
];

/// A helpfulness score, always within `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct HelpfulnessScore(u8);

impl HelpfulnessScore {
    pub const MIN: Self = Self(MIN_HELPFULNESS_SCORE);
    pub const MAX: Self = Self(MAX_HELPFULNESS_SCORE);

    /// Clamp any integer into the valid range.
    pub fn from_raw(raw: i64) -> Self {
        Self(raw.clamp(MIN_HELPFULNESS_SCORE as i64, MAX_HELPFULNESS_SCORE as i64) as u8)
    }

    /// Round and clamp a float. NaN maps to the minimum.
    pub fn from_f64(raw: f64) -> Self {
        if raw.is_nan() {
            return Self::MIN;
        }
        let clamped = raw
            .round()
            .clamp(MIN_HELPFULNESS_SCORE as f64, MAX_HELPFULNESS_SCORE as f64);
        Self(clamped as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl From<i64> for HelpfulnessScore {
    fn from(raw: i64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<HelpfulnessScore> for u8 {
    fn from(score: HelpfulnessScore) -> Self {
        score.0
    }
}

impl fmt::Display for HelpfulnessScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-dimension scores, each in `0..=100`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionScores {
    pub descriptiveness: u8,
    pub sentiment: u8,
    pub actionability: u8,
    pub uniqueness: u8,
    pub specificity: u8,
    pub length_adequacy: u8,
}

impl DimensionScores {
    fn weighted_total(&self) -> u32 {
        self.descriptiveness as u32 * WEIGHT_DESCRIPTIVENESS
            + self.sentiment as u32 * WEIGHT_SENTIMENT
            + self.actionability as u32 * WEIGHT_ACTIONABILITY
            + self.uniqueness as u32 * WEIGHT_UNIQUENESS
            + self.specificity as u32 * WEIGHT_SPECIFICITY
            + self.length_adequacy as u32 * WEIGHT_LENGTH
    }
}

/// Result of scoring one review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpfulnessReport {
    pub score: HelpfulnessScore,
    pub breakdown: DimensionScores,
    pub word_count: usize,
    /// Set when the review had no usable content.
    pub fallback: bool,
}

impl HelpfulnessReport {
    fn fallback() -> Self {
        Self {
            score: HelpfulnessScore::MIN,
            breakdown: DimensionScores::default(),
            word_count: 0,
            fallback: true,
        }
    }
}

/// Score a review.
pub fn score_review(review: &Review) -> HelpfulnessReport {
    let answers: Vec<String> = review.non_blank_answers().map(str::to_lowercase).collect();
    let tokens: Vec<&str> = answers.iter().flat_map(|a| tokenize(a)).collect();

    if tokens.is_empty() {
        return HelpfulnessReport::fallback();
    }

    let breakdown = DimensionScores {
        descriptiveness: descriptiveness(&tokens),
        sentiment: sentiment(&tokens),
        actionability: actionability(&tokens),
        uniqueness: uniqueness(&tokens, &answers),
        specificity: specificity(&tokens),
        length_adequacy: length_adequacy(tokens.len()),
    };

    // Weights sum to 100, so the total is in 0..=10_000; round half up.
    let score = HelpfulnessScore::from_raw(((breakdown.weighted_total() + 50) / 100) as i64);

    HelpfulnessReport {
        score,
        breakdown,
        word_count: tokens.len(),
        fallback: false,
    }
}

/// Convenience wrapper over [`Review::parse`] + [`score_review`].
pub fn score_text(input: &str) -> HelpfulnessReport {
    score_review(&Review::parse(input))
}

fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
}

fn capped(points: usize) -> u8 {
    points.min(100) as u8
}

fn descriptiveness(tokens: &[&str]) -> u8 {
    let content: BTreeSet<&str> = tokens
        .iter()
        .copied()
        .filter(|t| t.chars().count() >= 3 && !STOP_WORDS.contains(t))
        .collect();
    capped(content.len() * 5)
}

fn sentiment(tokens: &[&str]) -> u8 {
    let opinions = tokens
        .iter()
        .filter(|t| POSITIVE_WORDS.contains(t) || NEGATIVE_WORDS.contains(t))
        .count();
    if opinions == 0 {
        30
    } else {
        capped(50 + 10 * opinions.min(5))
    }
}

fn actionability(tokens: &[&str]) -> u8 {
    let hits = tokens
        .iter()
        .filter(|t| SUGGESTION_MARKERS.contains(t))
        .count();
    capped(hits * 25)
}

fn uniqueness(tokens: &[&str], answers: &[String]) -> u8 {
    let distinct: BTreeSet<&str> = tokens.iter().copied().collect();
    let ratio = distinct.len() * 100 / tokens.len();

    let mut seen = BTreeSet::new();
    let duplicates = answers
        .iter()
        .filter(|a| !seen.insert(a.split_whitespace().collect::<Vec<_>>().join(" ")))
        .count();

    capped(ratio.saturating_sub(duplicates * 20))
}

fn specificity(tokens: &[&str]) -> u8 {
    let specific = tokens
        .iter()
        .filter(|t| t.chars().any(|c| c.is_ascii_digit()) || t.chars().count() >= SPECIFIC_WORD_LEN)
        .count();
    capped(specific * 12)
}

fn length_adequacy(words: usize) -> u8 {
    let (low, high) = ADEQUATE_LENGTH;
    if words < low {
        capped(words * 2)
    } else if words <= high {
        100
    } else {
        capped(100usize.saturating_sub((words - high) / 10).max(60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_review_falls_back() {
        let report = score_review(&Review::new());
        assert_eq!(report.score, HelpfulnessScore::MIN);
        assert!(report.fallback);
        assert_eq!(report.breakdown, DimensionScores::default());
    }

    #[test]
    fn test_punctuation_only_falls_back() {
        let report = score_text("?!... ---");
        assert!(report.fallback);
        assert_eq!(report.score.value(), MIN_HELPFULNESS_SCORE);
    }

    #[test]
    fn test_single_word() {
        let report = score_text("good");
        // 5*20 + 60*10 + 0 + 100*15 + 0 + 2*15 = 2230
        assert_eq!(report.score.value(), 22);
        assert_eq!(report.word_count, 1);
        assert!(!report.fallback);
    }

    #[test]
    fn test_length_adequacy_bands() {
        assert_eq!(length_adequacy(10), 20);
        assert_eq!(length_adequacy(50), 100);
        assert_eq!(length_adequacy(300), 100);
        assert_eq!(length_adequacy(500), 80);
        assert_eq!(length_adequacy(5_000), 60);
    }

    #[test]
    fn test_duplicate_answers_penalized() {
        let unique = Review::new()
            .with_answer("Q1", "quick checkout")
            .with_answer("Q2", "friendly staff");
        let duplicated = Review::new()
            .with_answer("Q1", "quick checkout")
            .with_answer("Q2", "Quick   checkout");
        assert!(
            score_review(&duplicated).breakdown.uniqueness
                < score_review(&unique).breakdown.uniqueness
        );
    }

    #[test]
    fn test_actionable_review_scores_higher() {
        let vague = score_text("It was fine I guess");
        let actionable = score_text(
            "The checkout page took 45 seconds to load on mobile. You should add a guest \
             checkout option and consider caching the product images; that would improve \
             conversion considerably.",
        );
        assert!(actionable.score > vague.score);
        assert!(actionable.breakdown.actionability >= 75);
        assert!(actionable.breakdown.specificity > 0);
    }

    #[test]
    fn test_score_from_f64() {
        assert_eq!(HelpfulnessScore::from_f64(f64::NAN), HelpfulnessScore::MIN);
        assert_eq!(HelpfulnessScore::from_f64(-3.0), HelpfulnessScore::MIN);
        assert_eq!(HelpfulnessScore::from_f64(250.0), HelpfulnessScore::MAX);
        assert_eq!(HelpfulnessScore::from_f64(41.5).value(), 42);
    }

    #[test]
    fn test_score_deserialize_clamps() {
        let score: HelpfulnessScore = serde_json::from_str("1000").unwrap();
        assert_eq!(score, HelpfulnessScore::MAX);
        assert_eq!(serde_json::to_string(&score).unwrap(), "100");
    }
}
