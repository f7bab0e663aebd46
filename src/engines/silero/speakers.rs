use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::model::SileroError;

/// Storage for the loaded speaker embeddings.
///
/// Each speaker is a flat f32 vector; the dimension is whatever the archive
/// carries and is fed to the model as-is.
pub struct SpeakerStore {
    speakers: HashMap<String, Vec<f32>>,
}

impl SpeakerStore {
    /// Load all speakers from a .npz (numpy zip) archive.
    ///
    /// Each entry is a .npy file named after the speaker
    /// (e.g., `bengali_female.npy`).
    pub fn load(path: &Path) -> Result<Self, SileroError> {
        let file = File::open(path)?;
        let mut zip = zip::ZipArchive::new(file)
            .map_err(|e| SileroError::SpeakerParse(format!("Failed to open zip archive: {e}")))?;

        let mut speakers = HashMap::new();

        for i in 0..zip.len() {
            let mut entry = zip.by_index(i).map_err(|e| {
                SileroError::SpeakerParse(format!("Failed to read zip entry {i}: {e}"))
            })?;

            let raw_name = entry.name().to_string();
            // Speaker id is the entry name without the .npy extension
            let speaker_id = raw_name
                .trim_end_matches('/')
                .trim_end_matches(".npy")
                .to_string();

            if speaker_id.is_empty() || raw_name.ends_with('/') {
                continue;
            }

            let mut data = Vec::new();
            entry
                .read_to_end(&mut data)
                .map_err(|e| SileroError::SpeakerParse(format!("Failed to read {raw_name}: {e}")))?;

            let embedding = parse_npy(&data, &raw_name)?;
            speakers.insert(speaker_id, embedding);
        }

        log::info!("Loaded {} speakers", speakers.len());
        Ok(Self { speakers })
    }

    /// Get the embedding for a speaker id.
    pub fn get(&self, speaker: &str) -> Result<&[f32], SileroError> {
        self.speakers
            .get(speaker)
            .map(Vec::as_slice)
            .ok_or_else(|| SileroError::SpeakerNotFound(speaker.to_string()))
    }

    /// List all speaker ids in sorted order.
    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.speakers.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

/// Parse a numpy .npy file into a flat embedding vector.
///
/// Expects a 1D float32 array in little-endian format.
fn parse_npy(data: &[u8], name: &str) -> Result<Vec<f32>, SileroError> {
    // Verify numpy magic bytes: \x93NUMPY
    if data.len() < 10 {
        return Err(SileroError::SpeakerParse(format!(
            "{name}: file too short ({} bytes)",
            data.len()
        )));
    }

    if &data[0..6] != b"\x93NUMPY" {
        return Err(SileroError::SpeakerParse(format!(
            "{name}: invalid numpy magic bytes"
        )));
    }

    // major version at [6], minor at [7], header_len at [8..10] (little-endian u16)
    let header_len = u16::from_le_bytes([data[8], data[9]]) as usize;
    let data_offset = 10 + header_len;

    if data.len() < data_offset {
        return Err(SileroError::SpeakerParse(format!(
            "{name}: header truncated (need {data_offset} bytes, got {})",
            data.len()
        )));
    }

    let float_data = &data[data_offset..];
    if float_data.len() % 4 != 0 {
        return Err(SileroError::SpeakerParse(format!(
            "{name}: float data length {} is not a multiple of 4",
            float_data.len()
        )));
    }

    if float_data.is_empty() {
        return Err(SileroError::SpeakerParse(format!("{name}: empty embedding")));
    }

    let embedding = float_data
        .chunks_exact(4)
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    Ok(embedding)
}

#[cfg(test)]
mod tests {
    use super::parse_npy;

    fn npy_bytes(floats: &[f32]) -> Vec<u8> {
        let header = b"{'descr': '<f4', 'fortran_order': False, 'shape': (4,), }\n";
        let mut data = Vec::new();
        data.extend_from_slice(b"\x93NUMPY\x01\x00");
        data.extend_from_slice(&(header.len() as u16).to_le_bytes());
        data.extend_from_slice(header);
        for f in floats {
            data.extend_from_slice(&f.to_le_bytes());
        }
        data
    }

    #[test]
    fn parses_little_endian_floats() {
        let parsed = parse_npy(&npy_bytes(&[0.0, 1.0, -2.5, 42.0]), "test.npy").unwrap();
        assert_eq!(parsed, vec![0.0, 1.0, -2.5, 42.0]);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut data = npy_bytes(&[1.0]);
        data[0] = b'X';
        assert!(parse_npy(&data, "test.npy").is_err());
    }

    #[test]
    fn rejects_truncated_payload() {
        let mut data = npy_bytes(&[1.0, 2.0]);
        data.pop();
        assert!(parse_npy(&data, "test.npy").is_err());
    }
}
