use super::*;
use crate::analysis::features::BandPercentages;

/// Helper to create a FeatureVector with only the fields the rules read
fn create_features(centroid: f64, zcr: f64, bass: f64, mid: f64) -> FeatureVector {
    let high = (100.0 - bass - mid).max(0.0);
    FeatureVector::new(
        centroid,
        0.0, // rolloff is not used by the rules
        zcr,
        0.1,
        BandPercentages {
            bass_pct: bass,
            mid_pct: mid,
            high_pct: high,
        },
    )
}

#[test]
fn test_rules_kick() {
    let classifier = RuleBasedClassifier::default();

    // Low centroid (< 800 Hz) AND dominant bass (> 40%) = KICK
    let features = create_features(120.0, 0.01, 90.0, 8.0);
    assert_eq!(
        classifier.predict(&features),
        DrumLabel::Kick,
        "Expected Kick for centroid {} Hz and bass {}%",
        features.spectral_centroid(),
        features.bass_pct()
    );
}

#[test]
fn test_rules_snare() {
    let classifier = RuleBasedClassifier::default();

    // Noisy (ZCR > 0.1) AND mid-heavy (> 35%) = SNARE
    let features = create_features(1800.0, 0.2, 5.0, 80.0);
    assert_eq!(classifier.predict(&features), DrumLabel::Snare);
}

#[test]
fn test_rules_hihat_is_default() {
    let classifier = RuleBasedClassifier::default();

    let bright = create_features(7000.0, 0.5, 1.0, 10.0);
    assert_eq!(classifier.predict(&bright), DrumLabel::HiHat);

    // Nothing matches: tonal mid sound still ends up Hi-Hat
    let tonal_mid = create_features(1500.0, 0.05, 10.0, 85.0);
    assert_eq!(classifier.predict(&tonal_mid), DrumLabel::HiHat);
}

#[test]
fn test_rules_first_match_wins() {
    let classifier = RuleBasedClassifier::default();

    // Satisfies both the kick rule and the snare rule
    let features = create_features(500.0, 0.2, 45.0, 40.0);
    assert_eq!(classifier.predict(&features), DrumLabel::Kick);
}

#[test]
fn test_rules_thresholds_are_strict() {
    let classifier = RuleBasedClassifier::default();

    // Exactly on the kick centroid boundary is not a kick
    let on_boundary = create_features(800.0, 0.01, 90.0, 5.0);
    assert_eq!(classifier.predict(&on_boundary), DrumLabel::HiHat);

    // Exactly 40% bass is not a kick either
    let bass_boundary = create_features(100.0, 0.01, 40.0, 30.0);
    assert_eq!(classifier.predict(&bass_boundary), DrumLabel::HiHat);
}

#[test]
fn test_rules_custom_thresholds() {
    let thresholds = RuleThresholds {
        kick_centroid_max_hz: 2000.0,
        ..RuleThresholds::default()
    };
    let classifier = RuleBasedClassifier::new(thresholds);

    let features = create_features(1500.0, 0.01, 60.0, 30.0);
    assert_eq!(classifier.predict(&features), DrumLabel::Kick);
    assert_eq!(
        RuleBasedClassifier::default().predict(&features),
        DrumLabel::HiHat
    );
}

#[test]
fn test_label_names_round_trip() {
    for name in DrumLabel::CANONICAL {
        let label = DrumLabel::from_label(name);
        assert!(!label.is_custom(), "{} should be canonical", name);
        assert_eq!(label.to_string(), name);
    }
    assert_eq!(DrumLabel::from_label("hihat"), DrumLabel::Custom("hihat".into()));
}

#[test]
fn test_label_serializes_as_string() {
    assert_eq!(serde_json::to_string(&DrumLabel::HiHat).unwrap(), "\"Hi-Hat\"");
    assert_eq!(
        serde_json::to_string(&DrumLabel::Custom("Tom".into())).unwrap(),
        "\"Tom\""
    );
}

#[test]
fn test_trained_classifier_uses_first_label() {
    let model = |rows: &[FeatureVector]| -> Vec<String> {
        assert_eq!(rows.len(), 1);
        vec!["Snare".to_string(), "Kick".to_string()]
    };
    let classifier = TrainedClassifier::new(model);

    let features = create_features(120.0, 0.01, 90.0, 8.0);
    assert_eq!(classifier.predict(&features), DrumLabel::Snare);
}

#[test]
fn test_trained_classifier_custom_label() {
    let classifier = TrainedClassifier::new(|_: &[FeatureVector]| vec!["Custom".to_string()]);

    let label = classifier.predict(&create_features(120.0, 0.01, 90.0, 8.0));
    assert_eq!(label, DrumLabel::Custom("Custom".to_string()));
    assert_eq!(label.to_string(), "Custom");
}

#[test]
fn test_trained_classifier_receives_feature_row() {
    let classifier = TrainedClassifier::new(|rows: &[FeatureVector]| {
        vec![format!("{:.0}", rows[0].spectral_centroid())]
    });

    let label = classifier.predict(&create_features(321.0, 0.01, 90.0, 8.0));
    assert_eq!(label, DrumLabel::Custom("321".to_string()));
}

#[test]
fn test_trained_classifier_empty_output_falls_back_to_rules() {
    let classifier = TrainedClassifier::new(|_: &[FeatureVector]| Vec::new());

    let kick = create_features(120.0, 0.01, 90.0, 8.0);
    assert_eq!(classifier.predict(&kick), DrumLabel::Kick);
}

#[test]
fn test_classifier_is_object_safe() {
    let classifiers: Vec<std::sync::Arc<dyn DrumClassifier>> = vec![
        std::sync::Arc::new(RuleBasedClassifier::default()),
        std::sync::Arc::new(TrainedClassifier::new(|_: &[FeatureVector]| {
            vec!["Kick".to_string()]
        })),
    ];
    let features = create_features(120.0, 0.01, 90.0, 8.0);
    for classifier in classifiers {
        assert_eq!(classifier.predict(&features), DrumLabel::Kick);
    }
}
