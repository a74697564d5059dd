// Drum Analyzer Core - drum sample analysis library
// Decodes sample files, extracts spectral and temporal descriptors and
// classifies them as kick, snare or hi-hat.

// Module declarations
pub mod analysis;
pub mod audio;
pub mod config;
pub mod error;
#[cfg(feature = "http")]
pub mod http;
pub mod testing;

// Re-exports for convenience
pub use analysis::classifier::{
    DrumClassifier, DrumLabel, FittedModel, RuleBasedClassifier, TrainedClassifier,
};
pub use analysis::features::{BandPercentages, FeatureExtractor, FeatureVector};
pub use analysis::{
    analyze_many, analyze_one, AnalysisResult, BatchEntry, ErrorRecord, SampleAnalyzer,
};
pub use audio::{load_for_analysis, Waveform, TARGET_SAMPLE_RATE};
pub use config::AppConfig;
pub use error::{AnalysisError, ErrorCode};

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is not set
const DEFAULT_LOG_FILTER: &str = "info";

/// Initialize logging for the binaries
///
/// Installs a `tracing-subscriber` formatter on stderr, filtered by
/// `RUST_LOG`. `log` records from the library are bridged through tracing.
/// Calling this more than once is harmless.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init();
}
