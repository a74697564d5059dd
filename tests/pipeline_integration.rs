use std::sync::Arc;

use drum_analyzer::testing::signals;
use drum_analyzer::{
    analyze_many, analyze_one, AnalysisError, AppConfig, BatchEntry, DrumClassifier, DrumLabel,
    ErrorCode, FeatureVector, RuleBasedClassifier, SampleAnalyzer, TrainedClassifier,
    TARGET_SAMPLE_RATE,
};
use tempfile::TempDir;

fn kit() -> TempDir {
    let dir = TempDir::new().expect("temp dir");
    let hits = [
        ("hat.wav", signals::hihat_hit(TARGET_SAMPLE_RATE, 21)),
        ("kick.wav", signals::kick_hit(TARGET_SAMPLE_RATE)),
        ("snare.wav", signals::snare_hit(TARGET_SAMPLE_RATE, 22)),
    ];
    for (name, samples) in hits {
        signals::write_wav(&dir.path().join(name), &samples, TARGET_SAMPLE_RATE)
            .expect("write sample");
    }
    dir
}

#[test]
fn kit_folder_is_classified_in_name_order() {
    let dir = kit();
    let entries = analyze_many(dir.path(), None).expect("batch analysis");

    let labels: Vec<(String, String)> = entries
        .iter()
        .map(|entry| match entry {
            BatchEntry::Analyzed(result) => (result.file.clone(), result.drum_type.to_string()),
            BatchEntry::Failed(record) => panic!("{} failed: {}", record.file, record.error),
        })
        .collect();

    assert_eq!(
        labels,
        vec![
            ("hat.wav".to_string(), "Hi-Hat".to_string()),
            ("kick.wav".to_string(), "Kick".to_string()),
            ("snare.wav".to_string(), "Snare".to_string()),
        ]
    );
}

#[test]
fn band_percentages_always_sum_to_100() {
    let dir = kit();
    for entry in analyze_many(dir.path(), None).expect("batch analysis") {
        if let BatchEntry::Analyzed(result) = entry {
            let bands = result.bands;
            for pct in [bands.bass_pct, bands.mid_pct, bands.high_pct] {
                assert!((0.0..=100.0).contains(&pct));
            }
            assert!((bands.total() - 100.0).abs() < 1e-6, "{}", result.file);
            assert_eq!(result.features.bass_pct(), bands.bass_pct);
            assert_eq!(result.features.high_pct(), bands.high_pct);
        }
    }
}

#[test]
fn injected_model_replaces_rules() {
    let dir = kit();
    let model = TrainedClassifier::new(|rows: &[FeatureVector]| {
        rows.iter()
            .map(|row| {
                if row.high_pct() > 50.0 {
                    "Cymbal".to_string()
                } else {
                    "Drum".to_string()
                }
            })
            .collect()
    });
    let classifier: Arc<dyn DrumClassifier> = Arc::new(model);

    let analyzer = SampleAnalyzer::with_classifier(AppConfig::default(), classifier)
        .expect("default config is valid");
    let entries = analyzer.analyze_many(dir.path()).expect("batch analysis");

    let labels: Vec<DrumLabel> = entries
        .into_iter()
        .filter_map(|entry| match entry {
            BatchEntry::Analyzed(result) => Some(result.drum_type),
            BatchEntry::Failed(_) => None,
        })
        .collect();
    assert_eq!(
        labels,
        vec![
            DrumLabel::Custom("Cymbal".into()),
            DrumLabel::Custom("Drum".into()),
            DrumLabel::Custom("Drum".into()),
        ]
    );
}

#[test]
fn custom_thresholds_change_decisions() {
    let dir = kit();
    let mut config = AppConfig::default();
    // No sample can satisfy the kick rule any more
    config.rules.kick_bass_min_pct = 100.0;

    let result = SampleAnalyzer::new(config)
        .expect("valid config")
        .analyze_one(&dir.path().join("kick.wav"))
        .expect("analysis");
    assert_ne!(result.drum_type, DrumLabel::Kick);

    let rules = RuleBasedClassifier::default();
    assert_eq!(rules.predict(&result.features), DrumLabel::Kick);
}

#[test]
fn error_codes_are_stable() {
    let dir = TempDir::new().expect("temp dir");

    let err = analyze_one(&dir.path().join("missing.wav"), None).unwrap_err();
    assert!(matches!(err, AnalysisError::FileNotFound { .. }));
    assert_eq!(err.code(), 3001);

    let err = analyze_many(&dir.path().join("missing"), None).unwrap_err();
    assert_eq!(err.code(), 3002);

    let broken = dir.path().join("broken.flac");
    std::fs::write(&broken, b"nope").expect("write broken");
    let err = analyze_one(&broken, None).unwrap_err();
    assert_eq!(err.code(), 3003);
    assert!(err.to_string().starts_with("Failed to decode"));
}
