use std::io::{self, Read};
use std::process::ExitCode;

use clap::Parser;

use font_metrics::{Font, TextSink, MAX_FONT_SIZE};

/// Reads an OpenType/TrueType font on standard input and prints its glyph
/// metrics, kerning pairs and layout features.
#[derive(Parser, Debug)]
#[clap(author, about, version)]
struct Options {
    /// Device resolution in dots per inch.
    #[clap(short, long, default_value_t = 720)]
    resolution: u32,
}

fn read_input() -> io::Result<Vec<u8>> {
    let mut data = Vec::new();
    io::stdin()
        .lock()
        .take(MAX_FONT_SIZE as u64)
        .read_to_end(&mut data)?;
    Ok(data)
}

fn main() -> ExitCode {
    env_logger::init();
    let options = Options::parse();

    let data = match read_input() {
        Ok(data) => data,
        Err(error) => {
            eprintln!("mkfont: {}", error);
            return ExitCode::FAILURE;
        }
    };

    let mut font = match Font::new(&data) {
        Ok(font) => font,
        Err(error) => {
            eprintln!("mkfont: {}", error);
            return ExitCode::FAILURE;
        }
    };
    log::debug!(
        "{} glyphs at {} units per em",
        font.glyph_count(),
        font.units_per_em()
    );

    let stdout = io::stdout().lock();
    let mut sink = TextSink::new(stdout);
    font.metrics(&mut sink);
    font.features(options.resolution, &mut sink);
    ExitCode::SUCCESS
}
