//! Speech synthesis engines.
//!
//! This module contains implementations of the [`AcousticModel`](crate::AcousticModel)
//! capability.
//!
//! # Available Engines
//!
//! Enable engines via Cargo features:
//! - `silero` - Silero TTS (ONNX format, pretrained `v3_indic` speaker set)

#[cfg(feature = "silero")]
pub mod silero;
