use std::time::Instant;

use bangla_tts::{BanglaTts, BanglaTtsOptions, ConvertOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let load_start = Instant::now();
    let mut tts = BanglaTts::new(BanglaTtsOptions::default())?;
    println!("Model loaded in {:.2?}", load_start.elapsed());

    let text = "তোর নাম কি ।";
    println!("Romanized: {}", tts.romanize(text)?);

    let synth_start = Instant::now();
    let path = tts.convert_to_file(text, None, 44100)?;
    println!("Saved to {} in {:.2?}", path.display(), synth_start.elapsed());

    // Same sentence in the male voice, straight to a buffer
    let result = tts.convert(
        text,
        &ConvertOptions::builder()
            .voice("male")
            .mode("numpy")
            .build()?,
    )?;
    if let Some(buffer) = result.as_samples() {
        println!("Male voice produced {} samples", buffer.len());
    }

    Ok(())
}
