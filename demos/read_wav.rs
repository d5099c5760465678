//! Print the header and the first analysis windows of an 8-bit mono WAV file.
//!
//! cargo run --example read_wav -- note.wav [sample_rate]

use monowave::{Config, SampleReader, WaveError};
use std::{env, fs};

fn main() -> anyhow::Result<()> {
    let mut args = env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "note.wav".to_string());
    let mut config = Config::default();
    if let Some(rate) = args.next() {
        config = config.with_sample_rate(rate.parse()?);
    }

    let wav = fs::read(&path)?;
    let mut reader = SampleReader::new(&wav[..], &config)?;
    println!("{path}: {:?}", reader.header());
    println!("{} ms", reader.header().duration_ms());

    let skipped = reader.skip_lead_in()?;
    println!("skipped {skipped} lead-in samples");

    let mut window = vec![0i8; config.window_size];
    for i in 0..3 {
        match reader.read_window(&mut window) {
            Ok(len) => println!("window {i}: {:?}", &window[..len]),
            Err(WaveError::FinishedReading) => break,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
