//! Local polarity scoring.
//!
//! [`PatternPolarity`] is a word-lexicon analyzer: matched words contribute
//! their polarity, scaled by a preceding intensifier and flipped (at half
//! strength) by a preceding negation. The text's polarity is the mean of the
//! contributions, clamped to `[-1.0, 1.0]`, and `0.0` when nothing matches.

use std::sync::LazyLock;

use regex::Regex;
use tweetsent_core::PolarityClass;

/// Produces a continuous signed polarity for a text.
pub trait PolarityScorer: Send + Sync {
    fn polarity(&self, text: &str) -> f64;

    /// Discretized sign of [`Self::polarity`]; see [`PolarityClass::from_polarity`].
    fn classify(&self, text: &str) -> PolarityClass {
        PolarityClass::from_polarity(self.polarity(text))
    }
}

/// Word polarities. Keys are lowercase single words; values lie in `[-1.0, 1.0]`.
pub(crate) const LEXICON: &[(&str, f64)] = &[
    // Positive
    ("admire", 0.6),
    ("amazing", 0.6),
    ("applaud", 0.6),
    ("appreciate", 0.5),
    ("awesome", 1.0),
    ("beautiful", 0.85),
    ("best", 1.0),
    ("better", 0.5),
    ("blessed", 0.6),
    ("bold", 0.3),
    ("brave", 0.8),
    ("bright", 0.5),
    ("brilliant", 0.9),
    ("celebrate", 0.6),
    ("champion", 0.5),
    ("cheer", 0.5),
    ("clean", 0.4),
    ("committed", 0.3),
    ("congrats", 0.6),
    ("congratulations", 0.6),
    ("courage", 0.6),
    ("delighted", 0.8),
    ("deserve", 0.3),
    ("effective", 0.5),
    ("empower", 0.5),
    ("energized", 0.5),
    ("enjoy", 0.6),
    ("excellent", 1.0),
    ("excited", 0.7),
    ("exciting", 0.6),
    ("fair", 0.7),
    ("fantastic", 0.4),
    ("fighter", 0.3),
    ("fix", 0.2),
    ("fixed", 0.3),
    ("free", 0.4),
    ("freedom", 0.5),
    ("fun", 0.5),
    ("generous", 0.6),
    ("glad", 0.5),
    ("good", 0.7),
    ("grateful", 0.7),
    ("great", 0.8),
    ("happy", 0.8),
    ("healthy", 0.5),
    ("hero", 0.6),
    ("heroes", 0.6),
    ("honest", 0.6),
    ("honor", 0.5),
    ("honored", 0.4),
    ("hope", 0.2),
    ("hopeful", 0.5),
    ("humbled", 0.4),
    ("improve", 0.4),
    ("improved", 0.4),
    ("incredible", 0.9),
    ("inspiring", 0.7),
    ("integrity", 0.6),
    ("joy", 0.8),
    ("kind", 0.6),
    ("leader", 0.3),
    ("leadership", 0.3),
    ("love", 0.5),
    ("loved", 0.6),
    ("loving", 0.6),
    ("lucky", 0.5),
    ("nice", 0.6),
    ("optimistic", 0.6),
    ("outstanding", 0.9),
    ("perfect", 1.0),
    ("pleased", 0.6),
    ("positive", 0.5),
    ("powerful", 0.4),
    ("progress", 0.4),
    ("prosper", 0.5),
    ("prosperity", 0.5),
    ("protect", 0.4),
    ("proud", 0.8),
    ("recovery", 0.3),
    ("reform", 0.2),
    ("respect", 0.5),
    ("safe", 0.5),
    ("secure", 0.4),
    ("smart", 0.5),
    ("solid", 0.4),
    ("strong", 0.4),
    ("stronger", 0.5),
    ("succeed", 0.5),
    ("success", 0.3),
    ("successful", 0.6),
    ("superb", 0.9),
    ("support", 0.2),
    ("terrific", 0.8),
    ("thank", 0.2),
    ("thankful", 0.6),
    ("thanks", 0.2),
    ("thrilled", 0.8),
    ("together", 0.2),
    ("tremendous", 0.7),
    ("triumph", 0.7),
    ("trust", 0.4),
    ("unite", 0.4),
    ("united", 0.3),
    ("victory", 0.5),
    ("welcome", 0.4),
    ("win", 0.8),
    ("winner", 0.6),
    ("winning", 0.6),
    ("wins", 0.7),
    ("wonderful", 1.0),
    ("yes", 0.3),
    // Negative
    ("abuse", -0.8),
    ("afraid", -0.5),
    ("angry", -0.5),
    ("attack", -0.5),
    ("attacks", -0.5),
    ("awful", -1.0),
    ("bad", -0.7),
    ("betray", -0.8),
    ("betrayed", -0.8),
    ("biased", -0.5),
    ("bitter", -0.5),
    ("blame", -0.4),
    ("broke", -0.4),
    ("broken", -0.4),
    ("chaos", -0.6),
    ("cheat", -0.7),
    ("cheated", -0.7),
    ("collapse", -0.6),
    ("corrupt", -0.5),
    ("corruption", -0.7),
    ("coward", -0.8),
    ("crime", -0.5),
    ("crisis", -0.3),
    ("crooked", -0.7),
    ("cruel", -0.9),
    ("cut", -0.2),
    ("cuts", -0.3),
    ("damage", -0.5),
    ("danger", -0.5),
    ("dangerous", -0.6),
    ("dead", -0.6),
    ("death", -0.6),
    ("destroy", -0.7),
    ("destroyed", -0.7),
    ("disappointed", -0.6),
    ("disappointing", -0.6),
    ("disaster", -0.8),
    ("disgrace", -0.8),
    ("disgraceful", -0.7),
    ("dishonest", -0.7),
    ("dumb", -0.6),
    ("evil", -0.9),
    ("fail", -0.5),
    ("failed", -0.5),
    ("failing", -0.5),
    ("failure", -0.6),
    ("fake", -0.5),
    ("fear", -0.5),
    ("fraud", -0.8),
    ("hate", -0.8),
    ("horrible", -1.0),
    ("hurt", -0.5),
    ("illegal", -0.5),
    ("incompetent", -0.8),
    ("injustice", -0.7),
    ("kill", -0.7),
    ("killed", -0.7),
    ("lazy", -0.5),
    ("liar", -0.9),
    ("lie", -0.5),
    ("lied", -0.6),
    ("lies", -0.5),
    ("lose", -0.4),
    ("loser", -0.7),
    ("losing", -0.4),
    ("loss", -0.4),
    ("lost", -0.3),
    ("mess", -0.5),
    ("nasty", -0.7),
    ("outrage", -0.6),
    ("outrageous", -0.7),
    ("pathetic", -0.8),
    ("poor", -0.4),
    ("problem", -0.3),
    ("problems", -0.3),
    ("radical", -0.3),
    ("rigged", -0.8),
    ("sad", -0.5),
    ("scam", -0.8),
    ("scandal", -0.5),
    ("scared", -0.5),
    ("shame", -0.6),
    ("shameful", -0.8),
    ("shameless", -0.7),
    ("shocking", -0.5),
    ("sick", -0.5),
    ("stupid", -0.8),
    ("suffer", -0.6),
    ("suffering", -0.6),
    ("terrible", -1.0),
    ("terror", -0.7),
    ("threat", -0.4),
    ("threaten", -0.5),
    ("tragedy", -0.7),
    ("tragic", -0.7),
    ("ugly", -0.7),
    ("unacceptable", -0.7),
    ("unfair", -0.6),
    ("upset", -0.5),
    ("violence", -0.7),
    ("violent", -0.7),
    ("waste", -0.5),
    ("weak", -0.5),
    ("worried", -0.4),
    ("worry", -0.4),
    ("worse", -0.4),
    ("worst", -1.0),
    ("wrong", -0.5),
];

/// Multipliers applied to the next lexicon word.
const INTENSIFIERS: &[(&str, f64)] = &[
    ("absolutely", 1.3),
    ("extremely", 1.5),
    ("incredibly", 1.4),
    ("really", 1.3),
    ("so", 1.2),
    ("too", 1.2),
    ("truly", 1.3),
    ("very", 1.3),
];

/// Words that flip the next lexicon word at half strength.
const NEGATIONS: &[&str] = &["never", "no", "not", "n't", "nor"];

static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-z]+(?:'[a-z]+)?|n't").expect("valid word regex"));

/// Built-in lexicon polarity analyzer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternPolarity;

impl PatternPolarity {
    fn lookup(table: &[(&str, f64)], word: &str) -> Option<f64> {
        table.iter().find(|(w, _)| *w == word).map(|&(_, v)| v)
    }
}

impl PolarityScorer for PatternPolarity {
    fn polarity(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let mut contributions: Vec<f64> = Vec::new();
        let mut intensity = 1.0_f64;
        let mut negated = false;

        for m in WORD_RE.find_iter(&lowered) {
            let token = m.as_str();
            // "don't" → negation; "isn't" etc. share the suffix.
            let word = token.strip_suffix("n't").unwrap_or(token);

            if let Some(weight) = Self::lookup(LEXICON, word) {
                let mut value = (weight * intensity).clamp(-1.0, 1.0);
                if negated {
                    value *= -0.5;
                }
                contributions.push(value);
                intensity = 1.0;
                negated = false;
            } else if let Some(multiplier) = Self::lookup(INTENSIFIERS, word) {
                intensity *= multiplier;
            } else if NEGATIONS.contains(&word) || token.ends_with("n't") {
                negated = true;
            }
        }

        if contributions.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let denom = contributions.len() as f64;
        (contributions.iter().sum::<f64>() / denom).clamp(-1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polarity(text: &str) -> f64 {
        PatternPolarity.polarity(text)
    }

    #[test]
    fn empty_string_returns_zero() {
        assert!(polarity("").abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_text_returns_zero() {
        assert!(polarity("the quick brown fox").abs() < f64::EPSILON);
        assert_eq!(PatternPolarity.classify("ok"), PolarityClass::Neutral);
    }

    #[test]
    fn positive_word_is_positive() {
        assert!(polarity("great win tonight") > 0.0);
        assert_eq!(PatternPolarity.classify("great"), PolarityClass::Positive);
    }

    #[test]
    fn negative_word_is_negative() {
        assert!(polarity("a bad day") < 0.0);
        assert_eq!(PatternPolarity.classify("bad"), PolarityClass::Negative);
    }

    #[test]
    fn matching_ignores_case_and_punctuation() {
        assert!(polarity("GREAT!!!") > 0.0);
    }

    #[test]
    fn negation_flips_at_half_strength() {
        let plain = polarity("good");
        let negated = polarity("not good");
        assert!(negated < 0.0, "expected negative, got {negated}");
        assert!((negated + plain * 0.5).abs() < 1e-9);
    }

    #[test]
    fn contraction_negates() {
        assert!(polarity("this isn't good") < 0.0);
        assert!(polarity("don't hate") > 0.0);
    }

    #[test]
    fn intensifier_scales_next_word() {
        assert!(polarity("very bad") < polarity("bad"));
    }

    #[test]
    fn intensity_is_clamped() {
        assert!((polarity("extremely extremely awesome") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn mixed_text_averages() {
        // great (0.8) + terrible (-1.0) → -0.1
        let score = polarity("great speech, terrible policy");
        assert!((score + 0.1).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn balanced_text_is_neutral() {
        // good (0.7) + bad (-0.7) → 0.0
        assert_eq!(PatternPolarity.classify("good and bad"), PolarityClass::Neutral);
    }

    #[test]
    fn lexicon_entries_are_unique_and_in_range() {
        let mut seen = std::collections::HashSet::new();
        for &(word, weight) in LEXICON {
            assert!(seen.insert(word), "duplicate lexicon word {word}");
            assert!(weight != 0.0 && (-1.0..=1.0).contains(&weight), "{word}: {weight}");
            assert_eq!(word, word.to_lowercase());
            assert!(!NEGATIONS.contains(&word) && PatternPolarity::lookup(INTENSIFIERS, word).is_none(), "{word} shadows an intensifier or negation");
        }
    }

    #[test]
    fn typical_campaign_posts_get_a_sign() {
        let positive = [
            "Thrilled to welcome so many volunteers tonight. Thank you!",
            "Congratulations to our brave firefighters, true heroes",
            "Proud to support this bill for our veterans",
            "What an inspiring crowd in Pittsburgh!",
        ];
        let negative = [
            "This tax plan is a disaster for working families",
            "My opponent lied again. Shameful.",
            "The corruption in Washington is outrageous",
            "Another tragic shooting. Enough violence.",
        ];
        for text in positive {
            assert_eq!(PatternPolarity.classify(text), PolarityClass::Positive, "{text}");
        }
        for text in negative {
            assert_eq!(PatternPolarity.classify(text), PolarityClass::Negative, "{text}");
        }
    }
}
