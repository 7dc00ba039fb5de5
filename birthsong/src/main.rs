// Birthsong CLI entry point.
//
// Composes a short melody for a birthday and writes it as text and MIDI.
// The pipeline: load corpus -> count bigrams -> derive start/length from the
// birthday -> random walk -> write output files.
//
// Usage:
//   compose [BIRTHDAY] [--seed N] [--config FILE] [--text-corpus FILE]
//     [--midi-dir DIR] [--output-dir DIR] [--model-out FILE]
//
// BIRTHDAY is YYYY-MM-DD or YYYY/MM/DD; if omitted it is read from stdin.
// Output lands in <output-dir>/<YYYY-MM-DD>/<YYYY-MM-DD>melody.{txt,mid}.
// Log verbosity follows RUST_LOG (default: info).

use birthsong::config::ComposerConfig;
use birthsong::corpus::{Corpus, save_melody};
use birthsong::midi::write_melody_midi;
use birthsong::{Birthday, MelodyRng, TransitionModel, compose_for_birthday};
use clap::{Parser, crate_version};
use std::error::Error;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    version = crate_version!(),
    about = "Composes a short melody from a birthday, using note statistics learned from a corpus."
)]
struct Cli {
    /// Birthday as YYYY-MM-DD or YYYY/MM/DD. Prompted for when omitted.
    birthday: Option<String>,

    /// Seed for the random walk. Defaults to one taken from the clock.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON configuration file. Missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Text corpus, one melody per line (overrides the config).
    #[arg(long)]
    text_corpus: Option<PathBuf>,

    /// Folder of MIDI files to learn from (overrides the config).
    #[arg(long)]
    midi_dir: Option<PathBuf>,

    /// Root output directory (overrides the config).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Also write the learned transition model as JSON.
    #[arg(long)]
    model_out: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => ComposerConfig::load(path)?,
        None => ComposerConfig::default(),
    };
    if let Some(path) = cli.text_corpus {
        config.text_corpus = path;
    }
    if let Some(dir) = cli.midi_dir {
        config.midi_corpus_dir = dir;
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    let corpus = Corpus::load(&config.text_corpus, &config.midi_corpus_dir);
    let model = TransitionModel::build(corpus.sequences());
    tracing::info!(
        melodies = corpus.len(),
        tokens = model.len(),
        transitions = model.total_transitions(),
        "built transition model"
    );
    if let Some(path) = &cli.model_out {
        model.save(path)?;
        tracing::info!(path = %path.display(), "saved transition model");
    }

    let birthday: Birthday = match cli.birthday {
        Some(text) => text.parse()?,
        None => prompt_birthday()?.parse()?,
    };

    let seed = cli.seed.unwrap_or_else(clock_seed);
    tracing::info!(seed, "seeding random walk (pass --seed to reproduce)");
    let mut rng = MelodyRng::new(seed);

    let (params, melody) = compose_for_birthday(&model, &birthday, &mut rng)?;
    println!();
    println!("Start: {}  |  Length: {}", params.start, params.length);
    println!();
    println!("Generated Melody:");
    println!("{melody}");

    let stem = birthday.to_string();
    let out_dir = config.output_dir.join(&stem);
    save_melody(&out_dir.join(format!("{stem}melody.txt")), &melody)?;
    write_melody_midi(&melody, &config.render, &out_dir.join(format!("{stem}melody.mid")))?;
    Ok(())
}

fn prompt_birthday() -> std::io::Result<String> {
    print!("Enter birthday (YYYY-MM-DD): ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
