//! Polarity scoring
//!
//! A [`PolarityScorer`] maps text to a polarity in [-1, 1]. The aggregation
//! stage only relies on that range contract, so any analyzer can be plugged in.
//! [`LexiconScorer`] is the built-in valence-lexicon analyzer:
//! - word valences in [-4, 4]
//! - negation and booster handling over the three preceding tokens
//! - contrastive "but" weighting
//! - ALL-CAPS and exclamation emphasis
//! - `x / sqrt(x² + alpha)` normalization

use std::collections::HashMap;

use thiserror::Error;
use tracing::warn;

/// Normalization constant for summed valences
const NORMALIZATION_ALPHA: f64 = 15.0;

/// Scale applied to a valence preceded by a negator
const NEGATION_SCALAR: f64 = -0.74;

/// Increment applied by booster words
const BOOSTER_INCREMENT: f64 = 0.293;

/// Increment applied to an ALL-CAPS word in mixed-case text
const CAPS_INCREMENT: f64 = 0.733;

/// Increment per exclamation mark
const EXCLAMATION_INCREMENT: f64 = 0.292;

/// Maximum number of exclamation marks that add emphasis
const MAX_EXCLAMATIONS: usize = 4;

/// How many preceding tokens are inspected for negators and boosters
const LOOKBACK: usize = 3;

/// Reasons a scorer could not produce a polarity
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringFailure {
    #[error("text is empty")]
    EmptyText,

    #[error("scorer backend failed: {0}")]
    Backend(String),
}

/// Text → polarity capability
pub trait PolarityScorer {
    /// Score a text. Implementations should return a value in [-1, 1].
    fn score(&self, text: &str) -> Result<f64, ScoringFailure>;
}

impl<F> PolarityScorer for F
where
    F: Fn(&str) -> Result<f64, ScoringFailure>,
{
    fn score(&self, text: &str) -> Result<f64, ScoringFailure> {
        self(text)
    }
}

/// Score a text, degrading any failure to neutral polarity.
///
/// Non-finite results count as failures; finite results are clamped into [-1, 1].
pub fn score_or_neutral(scorer: &dyn PolarityScorer, text: &str) -> f64 {
    match scorer.score(text) {
        Ok(polarity) if polarity.is_finite() => polarity.clamp(-1.0, 1.0),
        Ok(polarity) => {
            warn!(polarity, "scorer returned a non-finite polarity; using 0.0");
            0.0
        }
        Err(e) => {
            warn!(error = %e, "scoring failed; using neutral polarity");
            0.0
        }
    }
}

/// Valence-lexicon sentiment analyzer
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    lexicon: HashMap<String, f64>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconScorer {
    /// Create a scorer with the built-in lexicon
    pub fn new() -> Self {
        let lexicon = BUILTIN_LEXICON
            .iter()
            .map(|(word, valence)| (word.to_string(), *valence))
            .collect();
        Self { lexicon }
    }

    /// Add or override a lexicon entry. Valences are clamped into [-4, 4].
    pub fn with_entry(mut self, word: &str, valence: f64) -> Self {
        self.lexicon
            .insert(word.to_lowercase(), valence.clamp(-4.0, 4.0));
        self
    }

    pub fn lexicon_size(&self) -> usize {
        self.lexicon.len()
    }

    fn valence_of(&self, token: &str) -> Option<f64> {
        self.lexicon.get(token).copied()
    }
}

impl PolarityScorer for LexiconScorer {
    fn score(&self, text: &str) -> Result<f64, ScoringFailure> {
        if text.trim().is_empty() {
            return Err(ScoringFailure::EmptyText);
        }

        let tokens = tokenize(text);
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
        let mixed_case = is_mixed_case(text);
        let but_index = lowered.iter().position(|t| t == "but");

        let mut sentiments = Vec::with_capacity(tokens.len());
        for (i, token) in lowered.iter().enumerate() {
            let Some(mut valence) = self.valence_of(token) else {
                sentiments.push(0.0);
                continue;
            };

            if mixed_case && is_all_caps(&tokens[i]) {
                valence += CAPS_INCREMENT * valence.signum();
            }

            let window_start = i.saturating_sub(LOOKBACK);
            let preceding = &lowered[window_start..i];

            for (distance, prev) in preceding.iter().rev().enumerate() {
                if let Some(scalar) = booster_scalar(prev) {
                    // Boosters lose strength with distance: 1.0, 0.95, 0.9.
                    let damping = 1.0 - 0.05 * distance as f64;
                    valence += scalar * damping * valence.signum();
                }
            }

            if preceding.iter().any(|prev| is_negator(prev)) {
                valence *= NEGATION_SCALAR;
            }

            sentiments.push(valence);
        }

        if let Some(pivot) = but_index {
            for (i, s) in sentiments.iter_mut().enumerate() {
                if i < pivot {
                    *s *= 0.5;
                } else if i > pivot {
                    *s *= 1.5;
                }
            }
        }

        let mut sum: f64 = sentiments.iter().sum();
        if sum == 0.0 {
            return Ok(0.0);
        }

        let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
        sum += EXCLAMATION_INCREMENT * exclamations as f64 * sum.signum();

        Ok(normalize(sum))
    }
}

fn normalize(sum: f64) -> f64 {
    (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

/// Split on whitespace and strip surrounding punctuation, keeping inner apostrophes.
/// Typographic quotes count as apostrophes.
fn tokenize(text: &str) -> Vec<String> {
    text.replace(['\u{2019}', '\u{2018}'], "'")
        .split_whitespace()
        .map(|raw| raw.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_mixed_case(text: &str) -> bool {
    let has_upper = text.chars().any(char::is_uppercase);
    let has_lower = text.chars().any(char::is_lowercase);
    has_upper && has_lower
}

fn is_all_caps(token: &str) -> bool {
    token.chars().count() > 1
        && token.chars().any(char::is_alphabetic)
        && !token.chars().any(char::is_lowercase)
}

fn is_negator(token: &str) -> bool {
    NEGATORS.contains(&token) || token.ends_with("n't")
}

fn booster_scalar(token: &str) -> Option<f64> {
    if BOOSTERS_UP.contains(&token) {
        Some(BOOSTER_INCREMENT)
    } else if BOOSTERS_DOWN.contains(&token) {
        Some(-BOOSTER_INCREMENT)
    } else {
        None
    }
}

const NEGATORS: &[&str] = &[
    "not", "no", "never", "none", "nobody", "nothing", "neither", "nor", "nowhere", "cannot",
    "without", "dont", "doesnt", "didnt", "isnt", "wasnt", "arent", "werent", "cant", "wont",
    "shouldnt", "wouldnt", "couldnt", "aint", "hardly", "rarely",
];

const BOOSTERS_UP: &[&str] = &[
    "absolutely", "amazingly", "completely", "deeply", "especially", "extremely", "fully",
    "highly", "hugely", "incredibly", "insanely", "really", "so", "super", "too", "totally",
    "truly", "very", "most", "more", "utterly", "seriously",
];

const BOOSTERS_DOWN: &[&str] = &[
    "barely", "slightly", "somewhat", "kinda", "kind", "sorta", "partly", "marginally", "little",
    "less", "occasionally",
];

const BUILTIN_LEXICON: &[(&str, f64)] = &[
    // positive
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("beautiful", 2.9),
    ("best", 3.2),
    ("better", 1.9),
    ("brilliant", 2.8),
    ("clear", 1.6),
    ("cool", 1.3),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("excellent", 3.2),
    ("excited", 1.4),
    ("exciting", 2.2),
    ("fantastic", 2.6),
    ("favorite", 2.0),
    ("fine", 0.8),
    ("fun", 2.3),
    ("funny", 1.9),
    ("glad", 2.0),
    ("good", 1.9),
    ("great", 3.1),
    ("happy", 2.7),
    ("helpful", 1.8),
    ("impressive", 2.3),
    ("informative", 1.4),
    ("inspiring", 2.2),
    ("interesting", 1.7),
    ("like", 1.5),
    ("liked", 1.8),
    ("love", 3.2),
    ("loved", 2.9),
    ("lovely", 2.8),
    ("masterpiece", 3.0),
    ("nice", 1.8),
    ("perfect", 2.7),
    ("pleasant", 2.3),
    ("recommend", 1.5),
    ("respect", 2.1),
    ("solid", 1.2),
    ("super", 2.9),
    ("thank", 1.5),
    ("thanks", 1.9),
    ("useful", 1.9),
    ("well", 1.1),
    ("win", 2.8),
    ("wonderful", 2.7),
    ("wow", 2.8),
    ("yes", 1.7),
    ("agree", 1.5),
    ("appreciate", 1.7),
    ("beautifully", 2.7),
    ("calm", 1.3),
    ("champion", 2.9),
    ("cute", 2.0),
    ("genius", 1.9),
    ("hilarious", 1.7),
    ("hope", 1.9),
    ("incredible", 2.8),
    ("legend", 2.0),
    ("legendary", 2.5),
    ("peaceful", 2.2),
    ("proud", 2.1),
    ("smart", 1.7),
    ("success", 2.7),
    ("support", 1.7),
    ("sweet", 2.0),
    ("top", 0.8),
    ("underrated", 1.2),
    ("valuable", 2.1),
    ("worth", 0.9),
    // negative
    ("annoying", -1.7),
    ("angry", -2.3),
    ("awful", -2.0),
    ("bad", -2.5),
    ("boring", -1.3),
    ("broken", -2.0),
    ("confusing", -1.3),
    ("cringe", -2.0),
    ("crap", -1.6),
    ("dead", -3.3),
    ("disappointed", -1.9),
    ("disappointing", -2.2),
    ("dislike", -1.6),
    ("dumb", -2.3),
    ("fail", -2.5),
    ("fake", -2.1),
    ("garbage", -2.1),
    ("hard", -0.4),
    ("hate", -2.7),
    ("hated", -3.2),
    ("horrible", -2.5),
    ("hurt", -2.4),
    ("lame", -1.8),
    ("lie", -1.6),
    ("lies", -1.8),
    ("mess", -1.5),
    ("misleading", -1.7),
    ("no", -1.2),
    ("pathetic", -2.2),
    ("poor", -2.1),
    ("problem", -1.7),
    ("sad", -2.1),
    ("scam", -2.6),
    ("stupid", -2.4),
    ("sucks", -1.5),
    ("terrible", -2.1),
    ("trash", -2.7),
    ("ugly", -2.3),
    ("unfortunately", -1.5),
    ("useless", -1.8),
    ("waste", -1.8),
    ("worse", -2.1),
    ("worst", -3.1),
    ("wrong", -2.1),
    ("afraid", -2.2),
    ("clickbait", -1.8),
    ("cry", -2.1),
    ("disgusting", -2.4),
    ("fear", -2.2),
    ("kill", -3.7),
    ("miss", -0.6),
    ("pain", -2.3),
    ("ruined", -2.4),
    ("scary", -2.2),
    ("sorry", -0.3),
    ("toxic", -2.4),
    ("unfair", -2.1),
    ("upset", -1.6),
    ("weak", -1.9),
    ("worried", -1.2),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn score(text: &str) -> f64 {
        LexiconScorer::new().score(text).unwrap()
    }

    #[test]
    fn test_empty_text_fails() {
        let scorer = LexiconScorer::new();
        assert_eq!(scorer.score(""), Err(ScoringFailure::EmptyText));
        assert_eq!(scorer.score("   \n"), Err(ScoringFailure::EmptyText));
    }

    #[test]
    fn test_no_lexicon_hits_is_neutral() {
        assert_eq!(score("the video was uploaded on tuesday"), 0.0);
    }

    #[test]
    fn test_polarity_direction() {
        assert!(score("This video is great, I love it") > 0.5);
        assert!(score("This is the worst, terrible content") < -0.5);
    }

    #[test]
    fn test_output_in_range() {
        let text = "BEST BEST BEST amazing AMAZING love love love great great!!!!!!!";
        let p = score(text);
        assert!(p <= 1.0 && p > 0.9);

        let p = score("worst worst worst hate hate trash garbage awful!!!");
        assert!(p >= -1.0 && p < -0.9);
    }

    #[test]
    fn test_negation_flips_sign() {
        assert!(score("good") > 0.0);
        assert!(score("not good") < 0.0);
        assert!(score("this isn't good") < 0.0);
        assert!(score("never really good") < 0.0);
    }

    #[test]
    fn test_typographic_apostrophe_negates() {
        assert!(score("this isn\u{2019}t good") < 0.0);
        assert_eq!(score("this isn\u{2019}t good"), score("this isn't good"));
        assert_eq!(score("don\u{2018}t love it"), score("don't love it"));
    }

    #[test]
    fn test_booster_increases_intensity() {
        assert!(score("very good") > score("good"));
        assert!(score("slightly good") < score("good"));
        assert!(score("extremely bad") < score("bad"));
    }

    #[test]
    fn test_caps_and_exclamation_emphasis() {
        assert!(score("this is GREAT") > score("this is great"));
        assert!(score("great!!") > score("great"));
    }

    #[test]
    fn test_but_shifts_weight_to_second_clause() {
        assert!(score("the intro was good but the ending was terrible") < 0.0);
        assert!(score("the intro was bad but the ending was great") > 0.0);
    }

    #[test]
    fn test_custom_entry() {
        let scorer = LexiconScorer::new().with_entry("poggers", 3.0);
        assert!(scorer.score("poggers").unwrap() > 0.5);
        assert!(scorer.lexicon_size() > 100);
    }

    #[test]
    fn test_deterministic() {
        let scorer = LexiconScorer::new();
        let text = "Honestly not bad, but kinda boring in the middle!";
        assert_eq!(scorer.score(text), scorer.score(text));
    }

    #[test]
    fn test_score_or_neutral_degrades_failures() {
        let failing = |_: &str| -> Result<f64, ScoringFailure> {
            Err(ScoringFailure::Backend("unsupported encoding".to_string()))
        };
        assert_eq!(score_or_neutral(&failing, "anything"), 0.0);

        let nan = |_: &str| -> Result<f64, ScoringFailure> { Ok(f64::NAN) };
        assert_eq!(score_or_neutral(&nan, "anything"), 0.0);

        let overshoot = |_: &str| -> Result<f64, ScoringFailure> { Ok(1.7) };
        assert_eq!(score_or_neutral(&overshoot, "anything"), 1.0);

        assert_eq!(score_or_neutral(&LexiconScorer::new(), ""), 0.0);
    }
}
