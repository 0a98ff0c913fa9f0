use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

use lyric_align::align_with_report;
use lyric_align::lrc::write_atomic;
use lyric_align::output::OutputFormat;
use lyric_align::progress::{format_duration, init_tracing};
use lyric_align::safety::validate_output_path;
use lyric_align::transcript::{extract_words, validate, words_from_response};

#[derive(Parser)]
#[command(name = "lyric-align")]
#[command(about = "Align unsynced lyric lines to a word-timed speech-to-text transcript")]
struct Args {
    /// Plain-text lyrics, one line per lyric line
    lyrics: PathBuf,

    /// Transcript: JSON array of {word, startTime, endTime}, or a raw model
    /// response containing one
    transcript: PathBuf,

    /// Write here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Print alignment statistics to stderr
    #[arg(long)]
    stats: bool,

    /// Write how every line was resolved (rule, matched word) as JSON
    #[arg(long)]
    report: Option<PathBuf>,

    /// Fail on an unparseable transcript or timing violations instead of
    /// aligning anyway
    #[arg(long)]
    strict: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let start = Instant::now();

    let lyrics = std::fs::read_to_string(&args.lyrics)
        .with_context(|| format!("Failed to read lyrics: {}", args.lyrics.display()))?;
    let transcript_text = std::fs::read_to_string(&args.transcript)
        .with_context(|| format!("Failed to read transcript: {}", args.transcript.display()))?;

    let words = if args.strict {
        extract_words(&transcript_text)
            .with_context(|| format!("Unusable transcript: {}", args.transcript.display()))?
    } else {
        words_from_response(&transcript_text)
    };

    let issues = validate(&words);
    if args.strict && !issues.is_empty() {
        bail!(
            "Transcript has {} timing violation(s); first: {}",
            issues.len(),
            issues[0]
        );
    }
    if words.is_empty() {
        warn!("transcript is empty; every line will be spaced one second apart");
    }

    let report = align_with_report(&lyrics, &words);
    let rendered = args.format.render(&report.lines)?;

    match &args.output {
        Some(output) => {
            validate_output_path(
                output,
                args.format.extension(),
                &[args.lyrics.as_path(), args.transcript.as_path()],
            )?;
            write_atomic(output, &rendered)?;
            info!(
                lines = report.lines.len(),
                output = %output.display(),
                "wrote aligned lyrics in {}",
                format_duration(start.elapsed())
            );
        }
        None => print!("{}", rendered),
    }

    if args.stats {
        report.stats.log_phase("align");
    }
    if let Some(path) = &args.report {
        validate_output_path(path, "json", &[args.lyrics.as_path(), args.transcript.as_path()])?;
        report
            .write_to_file(path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
    }

    Ok(())
}
