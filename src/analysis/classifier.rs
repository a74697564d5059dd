// Classifier - drum type classification from feature vectors
//
// This module defines the classification capability used by the pipeline and
// its two implementations:
//
// - RuleBasedClassifier: fixed first-match-wins decision list over the
//   centroid, ZCR and band percentages (the default)
// - TrainedClassifier: wraps an externally fitted model that maps a feature
//   vector to a label string
//
// The pipeline only sees `Arc<dyn DrumClassifier>`, injected once at
// construction.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::analysis::features::FeatureVector;
use crate::config::RuleThresholds;

/// Drum category assigned to a sample
///
/// The rule-based path only produces the three canonical labels. A trained
/// model may use its own vocabulary, which is carried as `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DrumLabel {
    /// Kick drum (energy concentrated in the bass band)
    Kick,
    /// Snare drum (noisy, mid band)
    Snare,
    /// Hi-hat (everything else, typically bright)
    HiHat,
    /// Label outside the canonical set, produced by a trained model
    Custom(String),
}

impl DrumLabel {
    /// Canonical label names, in decision-list order
    pub const CANONICAL: [&'static str; 3] = ["Kick", "Snare", "Hi-Hat"];

    /// Map a label string to a variant; unknown names become `Custom`
    pub fn from_label(label: &str) -> Self {
        match label {
            "Kick" => DrumLabel::Kick,
            "Snare" => DrumLabel::Snare,
            "Hi-Hat" => DrumLabel::HiHat,
            other => DrumLabel::Custom(other.to_string()),
        }
    }

    /// Label as printed in reports
    pub fn as_str(&self) -> &str {
        match self {
            DrumLabel::Kick => "Kick",
            DrumLabel::Snare => "Snare",
            DrumLabel::HiHat => "Hi-Hat",
            DrumLabel::Custom(label) => label,
        }
    }

    /// True for labels outside the canonical vocabulary
    pub fn is_custom(&self) -> bool {
        matches!(self, DrumLabel::Custom(_))
    }
}

impl fmt::Display for DrumLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DrumLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Capability: map one feature vector to a drum label
///
/// Implementations must be pure with respect to the input so that batch
/// analysis can run them from several threads.
pub trait DrumClassifier: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> DrumLabel;
}

/// Decision-list classifier over fixed thresholds
///
/// Rules, first match wins:
/// 1. centroid < kick_centroid_max_hz AND bass_pct > kick_bass_min_pct → Kick
/// 2. zcr > snare_zcr_min AND mid_pct > snare_mid_min_pct → Snare
/// 3. otherwise → Hi-Hat
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedClassifier {
    thresholds: RuleThresholds,
}

impl RuleBasedClassifier {
    pub fn new(thresholds: RuleThresholds) -> Self {
        Self { thresholds }
    }

    fn is_kick(&self, features: &FeatureVector) -> bool {
        features.spectral_centroid() < self.thresholds.kick_centroid_max_hz
            && features.bass_pct() > self.thresholds.kick_bass_min_pct
    }

    fn is_snare(&self, features: &FeatureVector) -> bool {
        features.zero_crossing_rate() > self.thresholds.snare_zcr_min
            && features.mid_pct() > self.thresholds.snare_mid_min_pct
    }
}

impl DrumClassifier for RuleBasedClassifier {
    fn predict(&self, features: &FeatureVector) -> DrumLabel {
        if self.is_kick(features) {
            DrumLabel::Kick
        } else if self.is_snare(features) {
            DrumLabel::Snare
        } else {
            DrumLabel::HiHat
        }
    }
}

/// Externally fitted model consuming rows of feature vectors
///
/// Column order of each row is the [`FeatureVector`] order. The model returns
/// one label per row.
pub trait FittedModel: Send + Sync {
    fn predict(&self, rows: &[FeatureVector]) -> Vec<String>;
}

impl<F> FittedModel for F
where
    F: Fn(&[FeatureVector]) -> Vec<String> + Send + Sync,
{
    fn predict(&self, rows: &[FeatureVector]) -> Vec<String> {
        self(rows)
    }
}

/// Classifier backed by a fitted model
///
/// Falls back to the rule-based decision list when the model returns no
/// label for the row.
pub struct TrainedClassifier<M: FittedModel> {
    model: M,
    fallback: RuleBasedClassifier,
}

impl<M: FittedModel> TrainedClassifier<M> {
    pub fn new(model: M) -> Self {
        Self::with_fallback(model, RuleBasedClassifier::default())
    }

    pub fn with_fallback(model: M, fallback: RuleBasedClassifier) -> Self {
        Self { model, fallback }
    }
}

impl<M: FittedModel> DrumClassifier for TrainedClassifier<M> {
    fn predict(&self, features: &FeatureVector) -> DrumLabel {
        let labels = self.model.predict(std::slice::from_ref(features));

        let Some(first) = labels.into_iter().next() else {
            tracing::warn!("[Classifier] Model returned no label, using rule-based fallback");
            return self.fallback.predict(features);
        };

        let label = DrumLabel::from_label(&first);
        if label.is_custom() {
            tracing::warn!(
                "[Classifier] Model label '{}' is outside the canonical set {:?}",
                first,
                DrumLabel::CANONICAL
            );
        }
        label
    }
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
