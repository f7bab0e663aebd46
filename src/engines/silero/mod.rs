//! Silero text-to-speech engine implementation.
//!
//! Wraps the pretrained Silero `v3_indic` model exported to ONNX. The model
//! takes romanized (ISO 15919) text — it was trained on transliterated
//! input, not on Bengali script — plus a speaker embedding, and emits a raw
//! waveform. Artifacts are fetched from the model repository on first use
//! and cached under the synthesizer's save location; see [`hub`].
//!
//! # Artifact Layout
//!
//! Either let [`hub::fetch`] download everything, or drop the files into the
//! save location yourself:
//!
//! ```text
//! ~/bangla_tts/
//! ├── v3_indic.onnx            # acoustic model
//! ├── v3_indic_speakers.bin    # speaker embedding archive (.npz format)
//! └── v3_indic_config.json     # optional: tokenizer vocabulary
//! ```
//!
//! # Speakers
//!
//! The `v3_indic` set ships one Bangla speaker per voice:
//! `bengali_female` and `bengali_male`.

pub mod hub;
pub mod model;
pub mod speakers;
pub mod vocab;

pub use hub::SileroArtifacts;
pub use model::{Device, SileroError, SileroModel, SileroModelParams};
