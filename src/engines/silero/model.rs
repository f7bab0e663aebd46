use std::collections::HashMap;
use std::path::PathBuf;

use ndarray::Array2;
use ort::execution_providers::{CPUExecutionProvider, ExecutionProviderDispatch};
use ort::inputs;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::TensorRef;

use crate::{AcousticModel, Voice};

use super::hub::SileroArtifacts;
use super::speakers::SpeakerStore;

#[derive(thiserror::Error, Debug)]
pub enum SileroError {
    #[error("ONNX runtime error: {0}")]
    Ort(#[from] ort::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
    #[error("Model download failed: {0}")]
    Hub(#[from] hf_hub::api::sync::ApiError),
    #[error("Invalid config.json: {0}")]
    Config(String),
    #[error("Failed to parse speaker archive: {0}")]
    SpeakerParse(String),
    #[error("Speaker '{0}' not found in the loaded speaker set")]
    SpeakerNotFound(String),
}

/// Compute device used for inference.
///
/// `Auto` prefers CUDA when the crate was built with the `cuda` feature and
/// the provider reports itself available, and falls back to CPU otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Device {
    #[default]
    Auto,
    Cpu,
    Cuda,
}

/// Parameters forwarded verbatim to the model loader.
#[derive(Debug, Clone, Default)]
pub struct SileroModelParams {
    /// Number of CPU threads to use for inference.
    /// `None` uses the ORT default (typically all available cores).
    pub num_threads: Option<usize>,
    /// Path for caching the Level3-optimized ONNX graph.
    ///
    /// - First load: ORT runs Level3 optimization and serialises the result here.
    /// - Subsequent loads: the pre-built graph is loaded at `Disable` optimization,
    ///   skipping the expensive re-optimization step entirely.
    ///
    /// Always write to a writable location; the artifact cache may be
    /// read-only in some deployments.
    pub optimized_model_cache_path: Option<PathBuf>,
}

/// Internal Silero ONNX model state.
pub struct SileroModel {
    session: Session,
    speakers: SpeakerStore,
    vocab: HashMap<char, i64>,
    /// Detected input name: "input_ids" or "tokens"
    tokens_input_name: String,
}

impl SileroModel {
    /// Load the Silero model from resolved artifact paths.
    pub fn load(
        artifacts: &SileroArtifacts,
        device: Device,
        params: SileroModelParams,
    ) -> Result<Self, SileroError> {
        log::info!("Loading Silero model from {}", artifacts.onnx.display());
        let session = init_session(artifacts, device, &params)?;
        let tokens_input_name = detect_tokens_input(&session);
        log::info!("Detected tokens input '{tokens_input_name}'");

        let speakers = SpeakerStore::load(&artifacts.speakers)?;

        let vocab = match &artifacts.config {
            Some(config_path) => {
                log::info!("Loading vocab from {}", config_path.display());
                super::vocab::load_vocab(config_path)?
            }
            None => {
                log::warn!("No config.json among artifacts, using hardcoded vocab");
                super::vocab::hardcoded_vocab()
            }
        };

        Ok(Self {
            session,
            speakers,
            vocab,
            tokens_input_name,
        })
    }

    /// Synthesize audio from romanized text with the given speaker.
    pub fn synthesize_text(
        &mut self,
        text: &str,
        speaker: &str,
    ) -> Result<Vec<f32>, SileroError> {
        let ids = super::vocab::tokenize(text, &self.vocab);
        if ids.is_empty() {
            log::warn!("No tokens produced for text: {text:?}");
            return Ok(vec![]);
        }

        let embedding = self.speakers.get(speaker)?;

        let tokens_arr = Array2::from_shape_vec((1, ids.len()), ids)?;
        let speaker_view =
            ndarray::ArrayView2::from_shape((1, embedding.len()), embedding)?;

        let inputs = inputs![
            self.tokens_input_name.as_str() => TensorRef::from_array_view(tokens_arr.view())?,
            "speaker" => TensorRef::from_array_view(speaker_view)?,
        ];
        let output = self.session.run(inputs)?;

        // First output is the waveform
        let first_output = output
            .iter()
            .next()
            .ok_or_else(|| SileroError::Ort(ort::Error::new("No output from model")))?;
        let waveform = first_output.1.try_extract_array::<f32>()?;

        Ok(waveform.as_slice().unwrap_or(&[]).to_vec())
    }

    /// List all speaker ids available in the loaded speaker set.
    pub fn list_speakers(&self) -> Vec<&str> {
        self.speakers.list()
    }
}

impl AcousticModel for SileroModel {
    fn synthesize(
        &mut self,
        romanized: &str,
        voice: Voice,
    ) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
        Ok(self.synthesize_text(romanized, voice.speaker_id())?)
    }
}

/// Initialize an ONNX session with optional on-disk graph caching.
///
/// With a cache path set, the first load runs Level3 optimization and
/// serialises the optimized graph; later loads read it back at `Disable`
/// level, cutting cold-start time. Without one, every load optimizes from
/// scratch.
fn init_session(
    artifacts: &SileroArtifacts,
    device: Device,
    params: &SileroModelParams,
) -> Result<Session, SileroError> {
    let providers = execution_providers(device);

    let (load_path, opt_level, write_cache) = match params.optimized_model_cache_path.as_deref() {
        Some(cache) if cache.exists() => {
            log::info!(
                "Loading pre-optimized Silero graph from {} — skipping Level3",
                cache.display()
            );
            (cache, GraphOptimizationLevel::Disable, false)
        }
        Some(cache) => {
            log::info!(
                "First load: running Level3 optimization; saving graph to {}",
                cache.display()
            );
            (artifacts.onnx.as_path(), GraphOptimizationLevel::Level3, true)
        }
        None => (artifacts.onnx.as_path(), GraphOptimizationLevel::Level3, false),
    };

    let mut builder = Session::builder()?
        .with_optimization_level(opt_level)?
        .with_execution_providers(providers)?
        .with_parallel_execution(true)?;

    if write_cache {
        if let Some(cache) = params.optimized_model_cache_path.as_deref() {
            builder = builder.with_optimized_model_path(cache)?;
        }
    }

    if let Some(threads) = params.num_threads {
        builder = builder
            .with_intra_threads(threads)?
            .with_inter_threads(threads)?;
    }

    Ok(builder.commit_from_file(load_path)?)
}

/// Build the execution-provider list for the requested device.
fn execution_providers(device: Device) -> Vec<ExecutionProviderDispatch> {
    let mut providers = Vec::new();

    if matches!(device, Device::Auto | Device::Cuda) {
        #[cfg(feature = "cuda")]
        {
            use ort::execution_providers::{CUDAExecutionProvider, ExecutionProvider};

            let cuda = CUDAExecutionProvider::default();
            if matches!(cuda.is_available(), Ok(true)) {
                log::info!("Using CUDA execution provider");
                providers.push(cuda.build());
            } else if device == Device::Cuda {
                log::warn!("CUDA requested but not available, falling back to CPU");
            }
        }
        #[cfg(not(feature = "cuda"))]
        if device == Device::Cuda {
            log::warn!("CUDA requested but this build lacks the `cuda` feature, using CPU");
        }
    }

    providers.push(CPUExecutionProvider::default().build());
    providers
}

/// Detect the token input name ("input_ids" or "tokens") from session inputs.
fn detect_tokens_input(session: &Session) -> String {
    for input in session.inputs() {
        if input.name() == "input_ids" || input.name() == "tokens" {
            return input.name().to_string();
        }
    }
    // Default to "input_ids" if neither is found
    "input_ids".to_string()
}
