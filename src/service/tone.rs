//! Lexicon-driven tone labeling for headlines.

use crate::model::{Tone, ToneVerdict};
use crate::service::lexicon::Lexicons;
use std::sync::Arc;

const POSITIVE_WEIGHT: f64 = 1.0;
const NEGATIVE_WEIGHT: f64 = 1.2;
const NEUTRAL_WEIGHT: f64 = 0.8;

/// Weighted-count window inside which neutral evidence wins
const NEUTRAL_MARGIN: f64 = 2.0;

pub struct ToneAnalyzer {
    lexicons: Arc<Lexicons>,
}

impl ToneAnalyzer {
    pub fn new(lexicons: Arc<Lexicons>) -> Self {
        Self { lexicons }
    }

    /// Label the tone of a headline plus optional content.
    ///
    /// Negative hits are weighted above positive ones, so mixed coverage
    /// leans negative. A label only wins with a strictly greatest
    /// weighted count; text without any hits is neutral at low confidence.
    pub fn analyze(&self, title: &str, content: &str) -> ToneVerdict {
        let text = format!("{} {}", title, content);
        let counts = self.lexicons.tone_counts(&text);

        let weighted_positive = counts.positive as f64 * POSITIVE_WEIGHT;
        let weighted_negative = counts.negative as f64 * NEGATIVE_WEIGHT;
        let weighted_neutral = counts.neutral as f64 * NEUTRAL_WEIGHT;

        let verdict = if weighted_positive > weighted_negative && weighted_positive > weighted_neutral
        {
            ToneVerdict {
                tone: Tone::Positive,
                confidence: scaled_confidence(counts.positive),
            }
        } else if weighted_negative > weighted_positive && weighted_negative > weighted_neutral {
            ToneVerdict {
                tone: Tone::Negative,
                confidence: scaled_confidence(counts.negative),
            }
        } else if weighted_neutral > 0.0
            && (weighted_positive - weighted_negative).abs() < NEUTRAL_MARGIN
        {
            ToneVerdict {
                tone: Tone::Neutral,
                confidence: (0.4 + 0.1 * counts.neutral as f64).min(0.8),
            }
        } else {
            ToneVerdict {
                tone: Tone::Neutral,
                confidence: 0.3,
            }
        };

        tracing::debug!(
            positive = counts.positive,
            negative = counts.negative,
            neutral = counts.neutral,
            tone = %verdict.tone,
            confidence = verdict.confidence,
            "Scored tone"
        );
        verdict
    }
}

fn scaled_confidence(hit_count: usize) -> f64 {
    (0.6 + 0.08 * hit_count as f64).min(0.95)
}
