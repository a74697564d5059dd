// Analysis module - drum sample analysis pipeline
//
// This module orchestrates the complete analysis of one sample file or a
// folder of samples:
//
// - Decoder: file → mono waveform at 22050 Hz (crate::audio)
// - FeatureExtractor: waveform → spectrogram → band percentages + descriptors
// - DrumClassifier: feature vector → drum label
//
// Batch mode never fails for a single file: per-file errors become
// ErrorRecord entries and processing continues with the next file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rayon::prelude::*;
use serde::Serialize;

use crate::audio::{self, Waveform};
use crate::config::AppConfig;
use crate::error::{log_analysis_error, AnalysisError};

pub mod classifier;
pub mod features;

use classifier::{DrumClassifier, DrumLabel, RuleBasedClassifier};
use features::{BandPercentages, FeatureExtractor, FeatureVector};

/// Separator between the drum label and the band shares in text output (em dash)
pub const SUMMARY_SEPARATOR: &str = " \u{2014} ";

/// Analysis outcome of one sample file
///
/// JSON form: `{"drum_type", "BASS", "MID", "HIGH", "features", "file"}` with
/// band percentages rendered as `"NN.N%"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub drum_type: DrumLabel,
    #[serde(flatten)]
    pub bands: BandPercentages,
    pub features: FeatureVector,
    pub file: String,
}

impl AnalysisResult {
    /// One-line text summary: `<drum_type>`, [`SUMMARY_SEPARATOR`], `BASS <B> MID <M> HIGH <H>`
    pub fn summary(&self) -> String {
        format!(
            "{}{}BASS {} MID {} HIGH {}",
            self.drum_type,
            SUMMARY_SEPARATOR,
            features::format_percent(self.bands.bass_pct),
            features::format_percent(self.bands.mid_pct),
            features::format_percent(self.bands.high_pct)
        )
    }
}

/// Per-file failure recorded during batch analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    pub file: String,
    pub error: String,
}

/// One entry of a batch result, in input order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchEntry {
    Analyzed(AnalysisResult),
    Failed(ErrorRecord),
}

impl BatchEntry {
    pub fn file(&self) -> &str {
        match self {
            BatchEntry::Analyzed(result) => &result.file,
            BatchEntry::Failed(record) => &record.file,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, BatchEntry::Failed(_))
    }

    /// Text line used by the CLI batch listing
    pub fn summary(&self) -> String {
        match self {
            BatchEntry::Analyzed(result) => format!("{}: {}", result.file, result.summary()),
            BatchEntry::Failed(record) => format!("{}: ERROR {}", record.file, record.error),
        }
    }
}

/// Sample analyzer: configuration, feature extractor and injected classifier
///
/// Stateless across calls; a single instance can be shared between threads
/// (batch workers, HTTP handlers).
pub struct SampleAnalyzer {
    config: AppConfig,
    extractor: FeatureExtractor,
    classifier: Arc<dyn DrumClassifier>,
}

impl SampleAnalyzer {
    /// Analyzer using the rule-based classifier with the configured thresholds
    ///
    /// # Errors
    /// * `InvalidConfig` when `config` fails [`AppConfig::validate`]
    pub fn new(config: AppConfig) -> Result<Self, AnalysisError> {
        let classifier = Arc::new(RuleBasedClassifier::new(config.rules));
        Self::with_classifier(config, classifier)
    }

    /// Analyzer using an injected classifier
    ///
    /// # Errors
    /// * `InvalidConfig` when `config` fails [`AppConfig::validate`]
    pub fn with_classifier(
        config: AppConfig,
        classifier: Arc<dyn DrumClassifier>,
    ) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self::build(config, classifier))
    }

    // Callers must have validated `config`
    fn build(config: AppConfig, classifier: Arc<dyn DrumClassifier>) -> Self {
        let extractor = FeatureExtractor::new(&config.spectral);
        Self {
            config,
            extractor,
            classifier,
        }
    }

    /// Analyze one decoded waveform
    pub fn analyze_waveform(
        &self,
        waveform: &Waveform,
        file: impl Into<String>,
    ) -> AnalysisResult {
        let (bands, features) = self.extractor.analyze(waveform);
        let drum_type = self.classifier.predict(&features);

        AnalysisResult {
            drum_type,
            bands,
            features,
            file: file.into(),
        }
    }

    /// Analyze one sample file
    ///
    /// # Errors
    /// * `FileNotFound` when `path` is not an existing regular file
    /// * `DecodeFailed` when the file cannot be decoded
    pub fn analyze_one(&self, path: &Path) -> Result<AnalysisResult, AnalysisError> {
        if !path.is_file() {
            return Err(AnalysisError::file_not_found(path));
        }

        let waveform = audio::load_for_analysis(path)?;
        let result = self.analyze_waveform(&waveform, file_name(path));

        tracing::info!(
            "[Pipeline] {} → {} (BASS {:.1}%, MID {:.1}%, HIGH {:.1}%)",
            result.file,
            result.drum_type,
            result.bands.bass_pct,
            result.bands.mid_pct,
            result.bands.high_pct
        );
        Ok(result)
    }

    /// Sample files in `folder` with a recognized extension, sorted by name
    ///
    /// # Errors
    /// * `NotADirectory` when `folder` is not an existing directory
    /// * `Io` when the directory cannot be listed
    pub fn list_samples(&self, folder: &Path) -> Result<Vec<PathBuf>, AnalysisError> {
        if !folder.is_dir() {
            return Err(AnalysisError::not_a_directory(folder));
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(folder)? {
            let path = entry?.path();
            if path.is_file() && self.config.batch.accepts(&path) {
                files.push(path);
            }
        }
        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// Analyze every recognized sample in `folder`
    ///
    /// Per-file failures are returned as [`BatchEntry::Failed`]; only a
    /// missing or unreadable folder fails the whole call.
    pub fn analyze_many(&self, folder: &Path) -> Result<Vec<BatchEntry>, AnalysisError> {
        let files = self.list_samples(folder)?;
        let jobs = self.config.batch.jobs.max(1);

        tracing::info!(
            "[Pipeline] Batch analysis of {} files in {} (jobs: {})",
            files.len(),
            folder.display(),
            jobs
        );

        let entries: Vec<BatchEntry> = if jobs > 1 && files.len() > 1 {
            self.analyze_parallel(&files, jobs)
        } else {
            files.iter().map(|path| self.batch_entry(path)).collect()
        };

        let failures = entries.iter().filter(|entry| entry.is_error()).count();
        if failures > 0 {
            tracing::warn!(
                "[Pipeline] Batch finished with {} of {} files failed",
                failures,
                entries.len()
            );
        }
        Ok(entries)
    }

    fn analyze_parallel(&self, files: &[PathBuf], jobs: usize) -> Vec<BatchEntry> {
        match rayon::ThreadPoolBuilder::new().num_threads(jobs).build() {
            Ok(pool) => pool.install(|| {
                files
                    .par_iter()
                    .map(|path| self.batch_entry(path))
                    .collect()
            }),
            Err(err) => {
                tracing::warn!(
                    "[Pipeline] Could not start {} worker threads ({}), running sequentially",
                    jobs,
                    err
                );
                files.iter().map(|path| self.batch_entry(path)).collect()
            }
        }
    }

    fn batch_entry(&self, path: &Path) -> BatchEntry {
        match self.analyze_one(path) {
            Ok(result) => BatchEntry::Analyzed(result),
            Err(err) => {
                log_analysis_error(&err, "batch");
                BatchEntry::Failed(ErrorRecord {
                    file: file_name(path),
                    error: err.to_string(),
                })
            }
        }
    }
}

impl Default for SampleAnalyzer {
    fn default() -> Self {
        let config = AppConfig::default();
        let classifier = Arc::new(RuleBasedClassifier::new(config.rules));
        Self::build(config, classifier)
    }
}

/// Analyze one file with default configuration
///
/// `classifier` replaces the rule-based default when supplied.
pub fn analyze_one(
    path: &Path,
    classifier: Option<Arc<dyn DrumClassifier>>,
) -> Result<AnalysisResult, AnalysisError> {
    analyzer_for(classifier)?.analyze_one(path)
}

/// Analyze every recognized sample in a folder with default configuration
pub fn analyze_many(
    folder: &Path,
    classifier: Option<Arc<dyn DrumClassifier>>,
) -> Result<Vec<BatchEntry>, AnalysisError> {
    analyzer_for(classifier)?.analyze_many(folder)
}

fn analyzer_for(
    classifier: Option<Arc<dyn DrumClassifier>>,
) -> Result<SampleAnalyzer, AnalysisError> {
    match classifier {
        Some(classifier) => SampleAnalyzer::with_classifier(AppConfig::default(), classifier),
        None => Ok(SampleAnalyzer::default()),
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
