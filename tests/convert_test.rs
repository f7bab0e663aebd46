//! Contract tests for the synthesizer, run against deterministic fakes.
//!
//! The acoustic model and the transliterator are both substituted so every
//! property here is reproducible without model artifacts on disk.

use std::cell::RefCell;
use std::rc::Rc;

use bangla_tts::{AcousticModel, BanglaTts, ConvertOptions, InvalidMode, Synthesized, Transliterator, Voice};

/// Shared record of every (romanized text, voice) pair the model saw.
type CallLog = Rc<RefCell<Vec<(String, Voice)>>>;

/// Fake model: logs its inputs and derives samples from the text bytes, so
/// distinct inputs yield distinct, predictable buffers.
struct FakeModel {
    log: CallLog,
}

impl AcousticModel for FakeModel {
    fn synthesize(
        &mut self,
        romanized: &str,
        voice: Voice,
    ) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
        self.log.borrow_mut().push((romanized.to_string(), voice));
        Ok(romanized.bytes().map(|b| b as f32 / 255.0).collect())
    }
}

/// Fake transliterator: wraps the input so tests can tell it ran.
struct FakeTranslit;

impl Transliterator for FakeTranslit {
    fn transform(&self, text: &str) -> Result<String, Box<dyn std::error::Error>> {
        Ok(format!("roman({text})"))
    }
}

fn fake_tts(voice: &str) -> (BanglaTts, CallLog) {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let tts = BanglaTts::from_parts(
        Box::new(FakeModel { log: Rc::clone(&log) }),
        Box::new(FakeTranslit),
        voice,
    );
    (tts, log)
}

#[test]
fn file_is_written_at_the_requested_sample_rate() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("out.wav");
    let (mut tts, _log) = fake_tts("female");

    let written = tts.convert_to_file("কি", Some(&target), 22050).unwrap();
    assert_eq!(written, target);

    let reader = hound::WavReader::open(&target).unwrap();
    let spec = reader.spec();
    assert_eq!(spec.sample_rate, 22050);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.sample_format, hound::SampleFormat::Float);
    assert_eq!(reader.len() as usize, "roman(কি)".len());
}

#[test]
fn default_options_write_at_44100() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("default.wav");
    let (mut tts, _log) = fake_tts("female");

    let opts = ConvertOptions::builder().filename(target.clone()).build().unwrap();
    let result = tts.convert("কি", &opts).unwrap();
    assert_eq!(result.as_path(), Some(target.as_path()));

    let spec = hound::WavReader::open(&target).unwrap().spec();
    assert_eq!(spec.sample_rate, 44100);
}

#[test]
fn input_is_trimmed_before_transliteration() {
    let (mut tts, log) = fake_tts("female");
    tts.convert_to_buffer("  কি  ").unwrap();
    assert_eq!(log.borrow()[0].0, "roman(কি)");
}

#[test]
fn voice_override_persists_into_later_calls() {
    let (mut tts, log) = fake_tts("female");
    assert_eq!(tts.voice(), Voice::Female);

    let opts = ConvertOptions::builder().voice("male").mode("numpy").build().unwrap();
    tts.convert("এক", &opts).unwrap();

    // No override here, yet the earlier override must still be in effect.
    tts.convert_to_buffer("দুই").unwrap();

    let calls = log.borrow();
    assert_eq!(calls[0].1, Voice::Male);
    assert_eq!(calls[1].1, Voice::Male);
    assert_eq!(tts.voice(), Voice::Male);
}

#[test]
fn batch_keeps_order_and_shape() {
    let (mut tts, log) = fake_tts("female");

    let opts = ConvertOptions::builder().mode("numpy").build().unwrap();
    let texts = vec!["এক", "দুই", "তিন"];
    let result = tts.convert(texts.clone(), &opts).unwrap();

    let Synthesized::Batch(items) = result else {
        panic!("batch input must yield a batch result");
    };
    assert_eq!(items.len(), texts.len());

    for (i, item) in items.iter().enumerate() {
        let expected: Vec<f32> = format!("roman({})", texts[i])
            .bytes()
            .map(|b| b as f32 / 255.0)
            .collect();
        assert_eq!(item.as_samples().unwrap().samples, expected);
    }

    let calls = log.borrow();
    let seen: Vec<&str> = calls.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(seen, vec!["roman(এক)", "roman(দুই)", "roman(তিন)"]);
}

#[test]
fn batch_with_explicit_filename_reuses_the_path() {
    // Historical behavior: one filename fans out to every batch element, so
    // later elements overwrite earlier ones.
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("batch.wav");
    let (mut tts, _log) = fake_tts("female");

    let opts = ConvertOptions::builder().filename(target.clone()).build().unwrap();
    let result = tts.convert(vec!["এক", "দুই"], &opts).unwrap();

    let Synthesized::Batch(items) = result else {
        panic!("batch input must yield a batch result");
    };
    assert_eq!(items.len(), 2);
    for item in &items {
        assert_eq!(item.as_path(), Some(target.as_path()));
    }
    assert!(target.exists());
}

#[test]
fn invalid_mode_fails_without_producing_anything() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("never.wav");
    let (mut tts, log) = fake_tts("female");

    let opts = ConvertOptions::builder()
        .filename(target.clone())
        .mode("xyz")
        .build()
        .unwrap();
    let err = tts.convert("কি", &opts).unwrap_err();

    let invalid = err.downcast_ref::<InvalidMode>().expect("InvalidMode error");
    assert_eq!(invalid.0, "xyz");
    assert!(!target.exists(), "no file may be written on invalid mode");
    assert!(log.borrow().is_empty(), "the model must not be invoked");
}

#[test]
fn writing_into_a_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("no_such_dir").join("out.wav");
    let (mut tts, _log) = fake_tts("female");

    assert!(tts.convert_to_file("কি", Some(&target), 44100).is_err());
}

#[test]
fn romanize_delegates_to_the_transliterator() {
    let (tts, _log) = fake_tts("female");
    assert_eq!(tts.romanize("নাম").unwrap(), "roman(নাম)");
}
