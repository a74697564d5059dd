//! Test harness utilities.
//!
//! Deterministic synthetic drum hits and WAV writers shared by the unit
//! tests, the integration tests under `tests/` and the CLI/HTTP smoke tests.
//! Nothing here touches the filesystem unless a caller passes a path.

pub mod signals;

pub use signals::{hihat_hit, kick_hit, sine, snare_hit, white_noise, write_wav};
