//! # bangla-tts
//!
//! A Rust library for offline Bangla (Bengali) text-to-speech synthesis.
//!
//! The pipeline is deliberately small: Bengali script is transliterated into
//! the Roman (ISO 15919) phonetic form the acoustic model was trained on, the
//! model turns that into raw audio samples, and the samples are either
//! returned in memory or written out as a WAV file.
//!
//! ## Features
//!
//! - **Silero TTS**: pretrained `v3_indic` Silero model with Bangla female
//!   and male voices (cargo feature `silero`)
//! - **Built-in romanization**: Bengali → ISO 15919 rule table, no external
//!   tools required
//! - **Pluggable collaborators**: the acoustic model and the transliterator
//!   are traits, so deterministic fakes can stand in under test
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! bangla-tts = { version = "0.1", features = ["silero"] }
//! ```
//!
//! ```ignore
//! use bangla_tts::{BanglaTts, BanglaTtsOptions};
//!
//! let mut tts = BanglaTts::new(BanglaTtsOptions::default())?;
//! let path = tts.convert_to_file("তোর নাম কি ।", None, 44100)?;
//! println!("wrote {}", path.display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod engines;
pub mod synth;
pub mod translit;

use std::path::Path;

pub use synth::{
    BanglaTts, ConvertOptions, ConvertOptionsBuilder, InvalidMode, Synthesized, TextInput,
};

#[cfg(feature = "silero")]
pub use synth::{BanglaTtsOptions, BanglaTtsOptionsBuilder};

/// Speaker identity passed to the acoustic model.
///
/// Resolved from a free-form preference string: anything starting with `f`
/// (case-insensitive) is [`Voice::Female`], everything else — including the
/// empty string — is [`Voice::Male`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Voice {
    Female,
    Male,
}

impl Voice {
    /// Resolve a user preference string to a voice.
    pub fn resolve(preference: &str) -> Self {
        match preference.chars().next() {
            Some(c) if c.eq_ignore_ascii_case(&'f') => Voice::Female,
            _ => Voice::Male,
        }
    }

    /// The Silero `v3_indic` speaker id for this voice.
    pub fn speaker_id(&self) -> &'static str {
        match self {
            Voice::Female => "bengali_female",
            Voice::Male => "bengali_male",
        }
    }
}

/// In-memory audio: an ordered sequence of f32 samples.
///
/// Carries no sample-rate metadata of its own; the rate is supplied by the
/// caller at write time and is not checked against the model's actual output
/// rate.
#[derive(Debug, Clone, Default)]
pub struct AudioBuffer {
    /// Raw audio samples as f32 values
    pub samples: Vec<f32>,
}

impl AudioBuffer {
    /// Write the audio to a 32-bit float mono WAV file at the given rate.
    ///
    /// The parent directory must already exist; an existing file at `path`
    /// is overwritten.
    pub fn write_wav(&self, path: &Path, sample_rate: u32) -> Result<(), Box<dyn std::error::Error>> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(path, spec)?;
        for &sample in &self.samples {
            writer.write_sample(sample)?;
        }
        writer.finalize()?;
        Ok(())
    }

    /// Number of samples in the buffer.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the buffer holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl From<Vec<f32>> for AudioBuffer {
    fn from(samples: Vec<f32>) -> Self {
        Self { samples }
    }
}

/// A loaded inference model that turns romanized text into audio samples.
///
/// The crate's own Silero engine implements this; tests substitute
/// deterministic fakes. Implementations receive text that has already been
/// romanized — they never see Bengali script.
pub trait AcousticModel {
    /// Synthesize raw samples for the given romanized text and voice.
    fn synthesize(
        &mut self,
        romanized: &str,
        voice: Voice,
    ) -> Result<Vec<f32>, Box<dyn std::error::Error>>;
}

/// Converts Bengali-script text into the Roman phonetic form the model expects.
///
/// No validation of the input script is performed; what a given
/// implementation does with non-Bengali input is its own business.
pub trait Transliterator {
    /// Transliterate `text` into its Roman form.
    fn transform(&self, text: &str) -> Result<String, Box<dyn std::error::Error>>;
}
