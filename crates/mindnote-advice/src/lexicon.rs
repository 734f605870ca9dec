//! Valence lexicon and modifier word lists for sentiment scoring.
//!
//! Valences use the -4..=4 scale of the VADER lexicon and are loaded from
//! `data/lexicon.tsv`, which accepts the VADER file layout.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Increment applied by booster words.
pub(crate) const BOOSTER_INCREMENT: f32 = 0.293;

/// Multiplier applied to a valence preceded by a negation.
pub(crate) const NEGATION_SCALAR: f32 = -0.74;

/// Increment applied to an all-caps word when the text is mixed case.
pub(crate) const CAPS_INCREMENT: f32 = 0.733;

/// Tab-separated `token<TAB>valence` lines. Extra columns, such as the
/// standard deviation and raw ratings of the VADER distribution, are ignored.
const LEXICON: &str = include_str!("../data/lexicon.tsv");

const BOOSTERS: &[&str] = &[
    "absolutely",
    "completely",
    "deeply",
    "especially",
    "extremely",
    "hugely",
    "incredibly",
    "really",
    "so",
    "terribly",
    "totally",
    "truly",
    "very",
];

const DAMPENERS: &[&str] = &[
    "barely",
    "hardly",
    "kinda",
    "less",
    "marginally",
    "slightly",
    "somewhat",
    "sorta",
];

const NEGATIONS: &[&str] = &[
    "aint", "cannot", "cant", "dont", "doesnt", "didnt", "isnt", "wasnt", "never", "no",
    "nobody", "none", "nor", "not", "nothing", "nowhere", "neither", "without", "wont",
    "wouldnt", "couldnt", "shouldnt",
];

static VALENCE_MAP: Lazy<HashMap<&'static str, f32>> = Lazy::new(|| parse_lexicon(LEXICON));

static BOOSTER_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| BOOSTERS.iter().copied().collect());

static DAMPENER_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| DAMPENERS.iter().copied().collect());

static NEGATION_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| NEGATIONS.iter().copied().collect());

fn parse_lexicon(source: &'static str) -> HashMap<&'static str, f32> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let mut fields = line.split('\t');
            let token = fields.next()?.trim();
            let valence = fields.next()?.trim().parse::<f32>().ok()?;
            Some((token, valence))
        })
        .collect()
}

/// Valence of a lower-cased word, if it carries one.
pub(crate) fn valence(word: &str) -> Option<f32> {
    VALENCE_MAP.get(word).copied()
}

/// Booster (+) or dampener (-) increment for a lower-cased word.
pub(crate) fn booster(word: &str) -> Option<f32> {
    if BOOSTER_SET.contains(word) {
        Some(BOOSTER_INCREMENT)
    } else if DAMPENER_SET.contains(word) {
        Some(-BOOSTER_INCREMENT)
    } else {
        None
    }
}

/// Whether a lower-cased word negates what follows.
pub(crate) fn is_negation(word: &str) -> bool {
    let bare: String = word.chars().filter(|c| *c != '\'').collect();
    NEGATION_SET.contains(bare.as_str()) || word.ends_with("n't")
}
