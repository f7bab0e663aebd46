use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::model::SileroError;

/// The slice of `config.json` this engine cares about.
#[derive(Debug, Deserialize)]
struct ModelConfig {
    /// Single-character strings mapped to token ids.
    vocab: HashMap<String, i64>,
}

/// Load the tokenizer vocabulary from a config.json file.
pub fn load_vocab(config_path: &Path) -> Result<HashMap<char, i64>, SileroError> {
    let content = std::fs::read_to_string(config_path)?;
    let config: ModelConfig = serde_json::from_str(&content)
        .map_err(|e| SileroError::Config(format!("Failed to parse JSON: {e}")))?;

    let mut map = HashMap::new();
    for (k, id) in config.vocab {
        let ch = k
            .chars()
            .next()
            .ok_or_else(|| SileroError::Config("Empty key in vocab".to_string()))?;
        map.insert(ch, id);
    }

    Ok(map)
}

/// Hardcoded tokenizer vocabulary for the `v3_indic` model.
///
/// Covers lowercase Latin, the ISO 15919 diacritics the romanizer emits, and
/// basic punctuation. Only used as a fallback when no config.json is among
/// the artifacts.
pub fn hardcoded_vocab() -> HashMap<char, i64> {
    let entries: &[(char, i64)] = &[
        (' ', 1),
        ('.', 2),
        (',', 3),
        ('!', 4),
        ('?', 5),
        ('-', 6),
        (':', 7),
        (';', 8),
        ('a', 10),
        ('b', 11),
        ('c', 12),
        ('d', 13),
        ('e', 14),
        ('f', 15),
        ('g', 16),
        ('h', 17),
        ('i', 18),
        ('j', 19),
        ('k', 20),
        ('l', 21),
        ('m', 22),
        ('n', 23),
        ('o', 24),
        ('p', 25),
        ('q', 26),
        ('r', 27),
        ('s', 28),
        ('t', 29),
        ('u', 30),
        ('v', 31),
        ('w', 32),
        ('x', 33),
        ('y', 34),
        ('z', 35),
        ('ā', 36),
        ('ī', 37),
        ('ū', 38),
        ('ē', 39),
        ('ō', 40),
        ('ṁ', 41),
        ('ḥ', 42),
        ('ñ', 43),
        ('ṅ', 44),
        ('ṇ', 45),
        ('ṭ', 46),
        ('ḍ', 47),
        ('ś', 48),
        ('ṣ', 49),
        ('ṛ', 50),
        ('ẏ', 51),
        ('\u{0325}', 52), // combining ring below, the r̥ diacritic
        ('\u{0310}', 53), // combining candrabindu
    ];

    entries.iter().copied().collect()
}

/// Map romanized text to token ids.
///
/// Uppercase Latin is folded to lowercase first; characters absent from the
/// vocabulary are silently dropped.
pub fn tokenize(text: &str, vocab: &HashMap<char, i64>) -> Vec<i64> {
    let mut ids = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let ch = ch.to_ascii_lowercase();
        if let Some(&id) = vocab.get(&ch) {
            ids.push(id);
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::{hardcoded_vocab, tokenize};

    #[test]
    fn tokenize_folds_case_and_drops_unknown() {
        let vocab = hardcoded_vocab();
        let ids = tokenize("Ki", &vocab);
        assert_eq!(ids, vec![vocab[&'k'], vocab[&'i']]);

        // '№' is not in the vocab and must vanish without shifting neighbours
        assert_eq!(tokenize("a№b", &vocab), vec![vocab[&'a'], vocab[&'b']]);
    }

    #[test]
    fn iso_diacritics_are_covered() {
        let vocab = hardcoded_vocab();
        for ch in "āīūēōṁḥñṅṇṭḍśṣṛẏ".chars() {
            assert!(vocab.contains_key(&ch), "missing {ch:?}");
        }
    }

    #[test]
    fn romanized_sentence_round_trips_through_vocab() {
        let vocab = hardcoded_vocab();
        let ids = tokenize("tōra nāma ki .", &vocab);
        // every character of the romanizer's output for this sentence is known
        assert_eq!(ids.len(), "tōra nāma ki .".chars().count());
    }
}
