//! The text-to-audio synthesizer and its request surface.
//!
//! [`BanglaTts`] owns one loaded acoustic model and one transliterator for
//! its whole lifetime and sequences the three steps of every conversion:
//! romanize, infer, encode. Everything here is synchronous and blocking;
//! mutating operations take `&mut self`, so the borrow checker rules out
//! concurrent use of a single instance.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use derive_builder::Builder;

use crate::{AcousticModel, AudioBuffer, Transliterator, Voice};

#[cfg(feature = "silero")]
use crate::engines::silero::{hub, Device, SileroModel, SileroModelParams};
#[cfg(feature = "silero")]
use crate::translit::IsoTransliterator;

/// Default sample rate written into WAV headers when the caller gives none.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Raised when the `mode` string of a [`ConvertOptions`] is neither
/// `"file"` nor `"numpy"`.
#[derive(Debug, thiserror::Error)]
#[error("convert mode must be either 'file' or 'numpy', got {0:?}")]
pub struct InvalidMode(pub String);

/// How [`BanglaTts::convert`] should deliver its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    File,
    Buffer,
}

impl std::str::FromStr for OutputMode {
    type Err = InvalidMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(OutputMode::File),
            "numpy" => Ok(OutputMode::Buffer),
            _ => Err(InvalidMode(s.to_string())),
        }
    }
}

/// One text or an ordered batch of texts to convert.
#[derive(Debug, Clone)]
pub enum TextInput {
    Single(String),
    Batch(Vec<String>),
}

impl From<&str> for TextInput {
    fn from(text: &str) -> Self {
        TextInput::Single(text.to_string())
    }
}

impl From<String> for TextInput {
    fn from(text: String) -> Self {
        TextInput::Single(text)
    }
}

impl From<Vec<String>> for TextInput {
    fn from(texts: Vec<String>) -> Self {
        TextInput::Batch(texts)
    }
}

impl From<Vec<&str>> for TextInput {
    fn from(texts: Vec<&str>) -> Self {
        TextInput::Batch(texts.into_iter().map(str::to_string).collect())
    }
}

/// Result of a [`BanglaTts::convert`] call, shaped like its input and mode.
#[derive(Debug)]
pub enum Synthesized {
    /// File mode: the path the WAV was written to.
    Path(PathBuf),
    /// Buffer mode: the raw samples.
    Samples(AudioBuffer),
    /// Batch input: one entry per input text, in order.
    Batch(Vec<Synthesized>),
}

impl Synthesized {
    /// The written path, if this is a file-mode result.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Synthesized::Path(p) => Some(p),
            _ => None,
        }
    }

    /// The sample buffer, if this is a buffer-mode result.
    pub fn as_samples(&self) -> Option<&AudioBuffer> {
        match self {
            Synthesized::Samples(b) => Some(b),
            _ => None,
        }
    }
}

/// Per-call options for [`BanglaTts::convert`].
///
/// `Default` matches the package's historical behavior: write a WAV file at
/// 44100 Hz under a clock-derived name, keeping the currently selected voice.
///
/// ```
/// use bangla_tts::ConvertOptions;
///
/// let opts = ConvertOptions::builder()
///     .sample_rate(48000)
///     .mode("numpy")
///     .build()
///     .unwrap();
/// assert_eq!(opts.sample_rate, 48000);
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(default)]
pub struct ConvertOptions {
    /// Target file path. `None` derives a name from the current local time.
    #[builder(setter(into, strip_option))]
    pub filename: Option<PathBuf>,
    /// Sample rate written into the WAV header. Taken on trust: it is not
    /// checked against the rate the model actually produced.
    pub sample_rate: u32,
    /// Voice preference override. When set, the instance's voice is updated
    /// and the new voice remains selected for later calls too.
    #[builder(setter(into, strip_option))]
    pub voice: Option<String>,
    /// `"file"` writes a WAV and yields its path; `"numpy"` yields the raw
    /// sample buffer. Case-insensitive; anything else is an error.
    #[builder(setter(into))]
    pub mode: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            filename: None,
            sample_rate: DEFAULT_SAMPLE_RATE,
            voice: None,
            mode: "file".to_string(),
        }
    }
}

impl ConvertOptions {
    /// Start building a set of options.
    pub fn builder() -> ConvertOptionsBuilder {
        ConvertOptionsBuilder::default()
    }
}

/// Construction options for [`BanglaTts::new`].
#[cfg(feature = "silero")]
#[derive(Debug, Clone, Builder)]
#[builder(default)]
pub struct BanglaTtsOptions {
    /// Voice preference, resolved with [`Voice::resolve`].
    #[builder(setter(into))]
    pub voice: String,
    /// Where model artifacts are cached. Defaults to `~/bangla_tts`.
    #[builder(setter(into, strip_option))]
    pub save_location: Option<PathBuf>,
    /// Compute device for inference.
    pub device: Device,
    /// Forwarded verbatim to the Silero model loader.
    pub model: SileroModelParams,
}

#[cfg(feature = "silero")]
impl Default for BanglaTtsOptions {
    fn default() -> Self {
        Self {
            voice: "female".to_string(),
            save_location: None,
            device: Device::Auto,
            model: SileroModelParams::default(),
        }
    }
}

#[cfg(feature = "silero")]
impl BanglaTtsOptions {
    /// Start building a set of options.
    pub fn builder() -> BanglaTtsOptionsBuilder {
        BanglaTtsOptionsBuilder::default()
    }
}

/// Bangla text-to-speech synthesizer.
///
/// Holds the selected [`Voice`] and exclusive ownership of a loaded acoustic
/// model. Each conversion is stateless apart from the voice override quirk
/// documented on [`ConvertOptions::voice`].
pub struct BanglaTts {
    voice: Voice,
    save_location: PathBuf,
    model: Box<dyn AcousticModel>,
    transliterator: Box<dyn Transliterator>,
}

impl BanglaTts {
    /// Load the pretrained Silero `v3_indic` model and build a synthesizer.
    ///
    /// Artifacts are fetched into the save location on first use, which may
    /// take a while on a cold cache; the call blocks until the model is in
    /// memory. Loader failures propagate unmodified.
    #[cfg(feature = "silero")]
    pub fn new(options: BanglaTtsOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let save_location = options
            .save_location
            .unwrap_or_else(default_save_location);
        let artifacts = hub::fetch(&save_location)?;
        let model = SileroModel::load(&artifacts, options.device, options.model)?;

        Ok(Self {
            voice: Voice::resolve(&options.voice),
            save_location,
            model: Box::new(model),
            transliterator: Box::new(IsoTransliterator),
        })
    }

    /// Build a synthesizer from explicit collaborators.
    ///
    /// This is the seam for tests and for callers bringing their own model
    /// or transliteration scheme.
    pub fn from_parts(
        model: Box<dyn AcousticModel>,
        transliterator: Box<dyn Transliterator>,
        voice: &str,
    ) -> Self {
        Self {
            voice: Voice::resolve(voice),
            save_location: default_save_location(),
            model,
            transliterator,
        }
    }

    /// The currently selected voice.
    pub fn voice(&self) -> Voice {
        self.voice
    }

    /// Re-resolve the voice from a preference string.
    pub fn set_voice(&mut self, preference: &str) {
        self.voice = Voice::resolve(preference);
    }

    /// The directory model artifacts are cached under.
    pub fn save_location(&self) -> &Path {
        &self.save_location
    }

    /// Transliterate Bengali script into its Roman (ISO 15919) form.
    pub fn romanize(&self, text: &str) -> Result<String, Box<dyn std::error::Error>> {
        self.transliterator.transform(text)
    }

    /// Convert text to audio and return the raw samples.
    pub fn convert_to_buffer(
        &mut self,
        text: &str,
    ) -> Result<AudioBuffer, Box<dyn std::error::Error>> {
        let text = text.trim();
        let romanized = self.transliterator.transform(text)?;
        log::debug!("romanized {text:?} -> {romanized:?}");
        let samples = self.model.synthesize(&romanized, self.voice)?;
        Ok(AudioBuffer { samples })
    }

    /// Convert text to audio and write it to a WAV file.
    ///
    /// With `filename` omitted, the name is derived from the local clock as
    /// `%d_%m_%Y_%H_%M_%S.wav` — two calls within the same second collide.
    /// The parent directory is not created.
    pub fn convert_to_file(
        &mut self,
        text: &str,
        filename: Option<&Path>,
        sample_rate: u32,
    ) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = match filename {
            Some(p) => p.to_path_buf(),
            None => PathBuf::from(timestamp_filename(Local::now())),
        };
        let audio = self.convert_to_buffer(text)?;
        audio.write_wav(&path, sample_rate)?;
        log::info!(
            "wrote {} samples at {sample_rate} Hz to {}",
            audio.len(),
            path.display()
        );
        Ok(path)
    }

    /// The catch-all entry point: scalar or batch text, file or buffer mode.
    ///
    /// A voice override in `options` is applied before anything else and
    /// persists on the instance afterwards. Batches run sequentially and are
    /// all-or-nothing: the first failing element aborts the rest and any
    /// results produced so far are discarded.
    pub fn convert(
        &mut self,
        text: impl Into<TextInput>,
        options: &ConvertOptions,
    ) -> Result<Synthesized, Box<dyn std::error::Error>> {
        if let Some(preference) = &options.voice {
            self.voice = Voice::resolve(preference);
        }
        let mode: OutputMode = options.mode.parse()?;

        match text.into() {
            TextInput::Single(text) => self.convert_one(&text, options, mode),
            TextInput::Batch(texts) => {
                let mut results = Vec::with_capacity(texts.len());
                for text in &texts {
                    results.push(self.convert_one(text, options, mode)?);
                }
                Ok(Synthesized::Batch(results))
            }
        }
    }

    fn convert_one(
        &mut self,
        text: &str,
        options: &ConvertOptions,
        mode: OutputMode,
    ) -> Result<Synthesized, Box<dyn std::error::Error>> {
        match mode {
            OutputMode::File => {
                let path =
                    self.convert_to_file(text, options.filename.as_deref(), options.sample_rate)?;
                Ok(Synthesized::Path(path))
            }
            OutputMode::Buffer => Ok(Synthesized::Samples(self.convert_to_buffer(text)?)),
        }
    }
}

/// Default artifact cache directory: `~/bangla_tts`.
fn default_save_location() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bangla_tts")
}

/// Clock-derived WAV filename: `%d_%m_%Y_%H_%M_%S.wav`.
///
/// Second-resolution only, so callers converting twice within one second
/// without an explicit filename get the same name back.
fn timestamp_filename(now: DateTime<Local>) -> String {
    format!("{}.wav", now.format("%d_%m_%Y_%H_%M_%S"))
}

#[cfg(test)]
mod tests {
    use super::{timestamp_filename, OutputMode};
    use crate::Voice;
    use chrono::{Local, TimeZone};

    #[test]
    fn voice_resolution_first_letter_wins() {
        assert_eq!(Voice::resolve("female"), Voice::Female);
        assert_eq!(Voice::resolve("FEMALE"), Voice::Female);
        assert_eq!(Voice::resolve("Female123"), Voice::Female);
        assert_eq!(Voice::resolve("f"), Voice::Female);
        assert_eq!(Voice::resolve("male"), Voice::Male);
        assert_eq!(Voice::resolve("M"), Voice::Male);
        assert_eq!(Voice::resolve("whatever"), Voice::Male);
        assert_eq!(Voice::resolve(""), Voice::Male);
    }

    #[test]
    fn speaker_ids_match_silero_naming() {
        assert_eq!(Voice::Female.speaker_id(), "bengali_female");
        assert_eq!(Voice::Male.speaker_id(), "bengali_male");
    }

    #[test]
    fn mode_parsing_accepts_file_and_numpy() {
        assert_eq!("file".parse::<OutputMode>().unwrap(), OutputMode::File);
        assert_eq!("File".parse::<OutputMode>().unwrap(), OutputMode::File);
        assert_eq!("numpy".parse::<OutputMode>().unwrap(), OutputMode::Buffer);
        assert_eq!("NUMPY".parse::<OutputMode>().unwrap(), OutputMode::Buffer);
    }

    #[test]
    fn mode_parsing_rejects_anything_else() {
        let err = "xyz".parse::<OutputMode>().unwrap_err();
        assert_eq!(err.0, "xyz");
    }

    #[test]
    fn timestamp_filename_uses_day_month_year_order() {
        let t = Local.with_ymd_and_hms(2024, 3, 7, 9, 5, 1).unwrap();
        assert_eq!(timestamp_filename(t), "07_03_2024_09_05_01.wav");
    }

    #[test]
    fn timestamp_filenames_collide_within_one_second() {
        // Known limitation of the clock-derived default name, frozen clock
        // makes it reproducible.
        let t = Local.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap();
        assert_eq!(timestamp_filename(t), timestamp_filename(t));
    }
}
