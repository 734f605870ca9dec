//! Lexicon-based sentiment fallback for entries with no category signal.
//!
//! Scoring follows the VADER rules: per-word valence, booster and dampener
//! words, negation, "but" contrast, all-caps emphasis and punctuation
//! amplification, normalized into a compound score in `[-1, 1]`.

use crate::engine::{AdviceReport, Outcome};
use crate::lexicon::{self, CAPS_INCREMENT, NEGATION_SCALAR};
use mindnote_core::normalize_label;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

/// Compound score at or below which text is negative.
pub const NEGATIVE_THRESHOLD: f32 = -0.05;

/// Compound score at or above which text is positive.
pub const POSITIVE_THRESHOLD: f32 = 0.2;

/// Reply for negative entries.
pub const NEGATIVE_RESPONSE: &str =
    "It sounds like something is weighing on you. Would you like to share more about what's been on your mind?";

/// Reply for positive and neutral entries.
pub const SUPPORTIVE_RESPONSE: &str =
    "Thank you for sharing. Writing things down is a great way to process your day. Keep it up!";

/// Normalization constant for the compound score.
const NORMALIZATION_ALPHA: f32 = 15.0;

const EXCLAMATION_INCREMENT: f32 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const QUESTION_INCREMENT: f32 = 0.18;
const MAX_QUESTIONS: usize = 3;

/// How many preceding words a booster or negation reaches.
const LOOKBACK: usize = 3;

/// Booster damping by distance (1, 2, 3 words back).
const BOOSTER_DAMPING: [f32; LOOKBACK] = [1.0, 0.95, 0.9];

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z']+").expect("invalid regex"));

/// Polarity scores for a piece of text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentScores {
    /// Normalized overall score in `[-1, 1]`.
    pub compound: f32,
    /// Share of positive sentiment.
    pub positive: f32,
    /// Share of negative sentiment.
    pub negative: f32,
    /// Share of neutral words.
    pub neutral: f32,
}

/// Coarse sentiment bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentBucket {
    Negative,
    Neutral,
    Positive,
}

impl SentimentBucket {
    /// Bucket a compound score.
    pub fn for_compound(compound: f32) -> Self {
        if compound <= NEGATIVE_THRESHOLD {
            Self::Negative
        } else if compound >= POSITIVE_THRESHOLD {
            Self::Positive
        } else {
            Self::Neutral
        }
    }

    /// Canned reply for this bucket.
    ///
    /// Positive and neutral share the same text.
    pub fn response(self) -> &'static str {
        match self {
            Self::Negative => NEGATIVE_RESPONSE,
            Self::Neutral | Self::Positive => SUPPORTIVE_RESPONSE,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Positive => "positive",
        }
    }
}

impl std::fmt::Display for SentimentBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deterministic responder for no-signal entries. Makes no external calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentimentFallbackHandler;

impl SentimentFallbackHandler {
    pub fn new() -> Self {
        Self
    }

    /// Score the polarity of `text`.
    pub fn polarity(&self, text: &str) -> SentimentScores {
        let words: Vec<&str> = WORD_RE
            .find_iter(text)
            .map(|m| m.as_str().trim_matches('\''))
            .filter(|w| !w.is_empty())
            .collect();

        if words.is_empty() {
            return SentimentScores {
                compound: 0.0,
                positive: 0.0,
                negative: 0.0,
                neutral: 0.0,
            };
        }

        let lowered: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
        let caps_differential = has_caps_differential(&words);

        let mut sentiments: Vec<f32> = (0..words.len())
            .map(|i| word_valence(&words, &lowered, i, caps_differential))
            .collect();

        apply_but_contrast(&lowered, &mut sentiments);

        let emphasis = punctuation_emphasis(text);
        let mut sum: f32 = sentiments.iter().sum();
        if sum > 0.0 {
            sum += emphasis;
        } else if sum < 0.0 {
            sum -= emphasis;
        }

        let compound = normalize(sum);
        let (positive, negative, neutral) = proportions(&sentiments, emphasis);

        SentimentScores {
            compound,
            positive,
            negative,
            neutral,
        }
    }

    /// Bucket `text` by its compound score.
    pub fn classify(&self, text: &str) -> SentimentBucket {
        SentimentBucket::for_compound(self.polarity(text).compound)
    }

    /// Reply to `text` with the canned response for its bucket.
    pub fn handle(&self, text: &str) -> &'static str {
        let scores = self.polarity(text);
        let bucket = SentimentBucket::for_compound(scores.compound);
        debug!(compound = scores.compound, bucket = %bucket, "Sentiment fallback");
        bucket.response()
    }

    /// Answer a no-signal entry as a report without touching any backend.
    pub fn report(&self, label: &str, diary_text: &str) -> AdviceReport {
        self.report_for(Uuid::new_v4(), normalize_label(label), diary_text)
    }

    pub(crate) fn report_for(&self, request_id: Uuid, label: String, diary_text: &str) -> AdviceReport {
        AdviceReport::new(
            request_id,
            label,
            self.handle(diary_text),
            Outcome::SentimentFallback,
        )
    }
}

/// True when some, but not all, words are written in capitals.
fn has_caps_differential(words: &[&str]) -> bool {
    let candidates: Vec<&&str> = words.iter().filter(|w| w.len() > 1).collect();
    let caps = candidates.iter().filter(|w| is_all_caps(w)).count();
    caps > 0 && caps < candidates.len()
}

fn is_all_caps(word: &str) -> bool {
    word.len() > 1
        && word.chars().any(|c| c.is_ascii_alphabetic())
        && word
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .all(|c| c.is_ascii_uppercase())
}

fn word_valence(words: &[&str], lowered: &[String], i: usize, caps_differential: bool) -> f32 {
    let word = lowered[i].as_str();
    if lexicon::booster(word).is_some() {
        return 0.0;
    }
    let Some(mut valence) = lexicon::valence(word) else {
        return 0.0;
    };

    if caps_differential && is_all_caps(words[i]) {
        valence += CAPS_INCREMENT.copysign(valence);
    }

    let mut negated = false;
    for distance in 1..=LOOKBACK {
        let Some(j) = i.checked_sub(distance) else {
            break;
        };
        let prior = lowered[j].as_str();
        if lexicon::valence(prior).is_none() {
            if let Some(mut scalar) = lexicon::booster(prior) {
                if valence < 0.0 {
                    scalar = -scalar;
                }
                if caps_differential && is_all_caps(words[j]) {
                    scalar += CAPS_INCREMENT.copysign(valence);
                }
                valence += scalar * BOOSTER_DAMPING[distance - 1];
            }
        }
        if lexicon::is_negation(prior) {
            negated = true;
        }
    }

    if negated {
        valence *= NEGATION_SCALAR;
    }
    valence
}

/// Soften sentiment before "but" and strengthen it after.
fn apply_but_contrast(lowered: &[String], sentiments: &mut [f32]) {
    let Some(pivot) = lowered.iter().position(|w| w == "but") else {
        return;
    };
    for (i, s) in sentiments.iter_mut().enumerate() {
        if i < pivot {
            *s *= 0.5;
        } else if i > pivot {
            *s *= 1.5;
        }
    }
}

fn punctuation_emphasis(text: &str) -> f32 {
    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
    let questions = text.matches('?').count();
    let question_emphasis = if questions > 1 {
        questions.min(MAX_QUESTIONS) as f32 * QUESTION_INCREMENT
    } else {
        0.0
    };
    exclamations as f32 * EXCLAMATION_INCREMENT + question_emphasis
}

fn normalize(sum: f32) -> f32 {
    let score = sum / (sum * sum + NORMALIZATION_ALPHA).sqrt();
    score.clamp(-1.0, 1.0)
}

fn proportions(sentiments: &[f32], emphasis: f32) -> (f32, f32, f32) {
    let mut pos_sum = 0.0f32;
    let mut neg_sum = 0.0f32;
    let mut neutral_count = 0.0f32;

    for &s in sentiments {
        if s > 0.0 {
            pos_sum += s + 1.0;
        } else if s < 0.0 {
            neg_sum += s - 1.0;
        } else {
            neutral_count += 1.0;
        }
    }

    if pos_sum > neg_sum.abs() {
        pos_sum += emphasis;
    } else if pos_sum < neg_sum.abs() {
        neg_sum -= emphasis;
    }

    let total = pos_sum + neg_sum.abs() + neutral_count;
    if total == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    (
        (pos_sum / total).abs(),
        (neg_sum / total).abs(),
        (neutral_count / total).abs(),
    )
}
