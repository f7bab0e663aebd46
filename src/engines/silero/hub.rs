//! Model artifact resolution.
//!
//! Artifacts come from the fixed upstream repository and are cached under
//! the synthesizer's save location. Files placed there by hand take
//! precedence, so fully offline setups work without ever touching the
//! network.

use std::fs;
use std::path::{Path, PathBuf};

use hf_hub::api::sync::ApiBuilder;

use super::model::SileroError;

/// Upstream repository holding the pretrained models.
pub const MODEL_REPO: &str = "snakers4/silero-models";
/// Model family within the repository.
pub const MODEL_NAME: &str = "silero_tts";
/// Language tag of the pretrained model.
pub const LANGUAGE: &str = "indic";
/// Speaker set identifier; `v3_indic` carries the Bangla speakers.
pub const SPEAKER_SET: &str = "v3_indic";

/// Resolved on-disk paths of everything the engine needs to load.
#[derive(Debug, Clone)]
pub struct SileroArtifacts {
    /// The ONNX acoustic model.
    pub onnx: PathBuf,
    /// The `.npz` speaker embedding archive.
    pub speakers: PathBuf,
    /// Optional tokenizer vocabulary.
    pub config: Option<PathBuf>,
}

impl SileroArtifacts {
    /// Look for manually placed artifacts in `dir`.
    ///
    /// The canonical ONNX filename is preferred, with a fallback scan for
    /// any `.onnx` file. Returns `Ok(None)` when the directory does not
    /// exist or lacks the required files.
    pub fn from_dir(dir: &Path) -> Result<Option<Self>, SileroError> {
        if !dir.is_dir() {
            return Ok(None);
        }

        let onnx = {
            let preferred = dir.join(format!("{SPEAKER_SET}.onnx"));
            if preferred.exists() {
                Some(preferred)
            } else {
                first_onnx_file(dir)?
            }
        };
        let Some(onnx) = onnx else {
            return Ok(None);
        };

        let speakers = dir.join(format!("{SPEAKER_SET}_speakers.bin"));
        if !speakers.exists() {
            return Ok(None);
        }

        let config = Some(dir.join(format!("{SPEAKER_SET}_config.json"))).filter(|p| p.exists());

        log::info!("Using local model artifacts from {}", dir.display());
        Ok(Some(Self {
            onnx,
            speakers,
            config,
        }))
    }
}

/// Resolve artifacts, downloading them into `save_location` if needed.
///
/// Downloads are blocking with no retry or timeout of their own; a cold
/// cache needs network access and failures propagate to the caller.
pub fn fetch(save_location: &Path) -> Result<SileroArtifacts, SileroError> {
    if let Some(artifacts) = SileroArtifacts::from_dir(save_location)? {
        return Ok(artifacts);
    }

    fs::create_dir_all(save_location)?;
    log::info!(
        "Fetching {MODEL_NAME}/{LANGUAGE}/{SPEAKER_SET} from {MODEL_REPO} into {}",
        save_location.display()
    );

    let api = ApiBuilder::new()
        .with_cache_dir(save_location.to_path_buf())
        .build()?;
    let repo = api.model(MODEL_REPO.to_string());

    let onnx = repo.get(&remote_path(&format!("{SPEAKER_SET}.onnx")))?;
    let speakers = repo.get(&remote_path(&format!("{SPEAKER_SET}_speakers.bin")))?;
    // The vocabulary config is optional upstream; the hardcoded fallback
    // covers its absence.
    let config = match repo.get(&remote_path(&format!("{SPEAKER_SET}_config.json"))) {
        Ok(path) => Some(path),
        Err(e) => {
            log::debug!("No config.json in the model repository: {e}");
            None
        }
    };

    Ok(SileroArtifacts {
        onnx,
        speakers,
        config,
    })
}

fn remote_path(file: &str) -> String {
    format!("{MODEL_NAME}/{LANGUAGE}/{file}")
}

/// First `.onnx` file in `dir`, if any.
fn first_onnx_file(dir: &Path) -> Result<Option<PathBuf>, SileroError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) == Some("onnx") {
            log::info!("Using ONNX file: {}", path.display());
            return Ok(Some(path));
        }
    }
    Ok(None)
}
