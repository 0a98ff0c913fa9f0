//! Align a directory of songs in parallel.
//!
//! Each song is a `<stem>.txt` lyric file with a `<stem>.json` transcript next
//! to it. Songs are independent, so they are spread across the rayon pool; the
//! lines within one song are always aligned sequentially.
//!
//! Usage: align-batch <input_dir> <output_dir> [--format json|lrc] [--workers N]

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{error, warn};

use lyric_align::align_with_report;
use lyric_align::lrc::write_atomic;
use lyric_align::models::AlignmentStats;
use lyric_align::output::OutputFormat;
use lyric_align::progress::{
    create_progress_bar, create_spinner, format_duration, init_tracing, log_progress, set_log_only,
};
use lyric_align::safety::validate_output_dir;
use lyric_align::transcript::{validate, words_from_response};

#[derive(Parser)]
#[command(name = "align-batch")]
#[command(about = "Align every <stem>.txt / <stem>.json pair in a directory")]
struct Args {
    input_dir: PathBuf,

    output_dir: PathBuf,

    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Worker threads (0 = one per core)
    #[arg(long, default_value = "0")]
    workers: usize,

    /// Hide progress bars and log progress lines instead
    #[arg(long)]
    log_only: bool,

    /// Write aggregate statistics as JSON
    #[arg(long)]
    stats_file: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

const LOG_INTERVAL: u64 = 100;

/// One song to align.
#[derive(Debug, Clone)]
struct Job {
    stem: String,
    lyrics: PathBuf,
    transcript: PathBuf,
}

/// Pair every `<stem>.txt` with its `<stem>.json`, sorted by stem.
fn find_jobs(input_dir: &Path) -> Result<Vec<Job>> {
    let entries = fs::read_dir(input_dir)
        .with_context(|| format!("Failed to read input directory: {}", input_dir.display()))?;

    let mut jobs = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("txt") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
            warn!(path = %path.display(), "skipping lyrics file with non-UTF-8 name");
            continue;
        };
        let transcript = path.with_extension("json");
        if !transcript.is_file() {
            warn!(song = %stem, "no transcript next to lyrics, skipping");
            continue;
        }
        jobs.push(Job {
            stem,
            lyrics: path,
            transcript,
        });
    }

    jobs.sort_by(|a, b| a.stem.cmp(&b.stem));
    Ok(jobs)
}

fn process_job(job: &Job, output_dir: &Path, format: OutputFormat) -> Result<AlignmentStats> {
    let lyrics = fs::read_to_string(&job.lyrics)
        .with_context(|| format!("Failed to read {}", job.lyrics.display()))?;
    let transcript_text = fs::read_to_string(&job.transcript)
        .with_context(|| format!("Failed to read {}", job.transcript.display()))?;

    let words = words_from_response(&transcript_text);
    let issues = validate(&words);
    if !issues.is_empty() {
        warn!(song = %job.stem, issues = issues.len(), "transcript timing violations");
    }

    let report = align_with_report(&lyrics, &words);
    let rendered = format.render(&report.lines)?;
    write_atomic(&output_dir.join(format.file_name(&job.stem)), &rendered)?;

    Ok(report.stats)
}

fn main() -> Result<()> {
    let args = Args::parse();
    set_log_only(args.log_only);
    init_tracing(args.verbose);

    if args.workers > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.workers)
            .build_global()
            .context("Failed to set thread pool size")?;
    }

    let start = Instant::now();

    validate_output_dir(&args.output_dir, &args.input_dir)?;
    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("Failed to create {}", args.output_dir.display()))?;

    let spinner = create_spinner("Phase 1: Scanning input");
    let jobs = find_jobs(&args.input_dir)?;
    spinner.finish_with_message(format!("Phase 1: Found {} songs", jobs.len()));

    let total = jobs.len() as u64;
    let pb = create_progress_bar(total, "Phase 2: Aligning");
    let done = AtomicU64::new(0);

    let results: Vec<(String, Result<AlignmentStats>)> = jobs
        .par_iter()
        .map(|job| {
            let result = process_job(job, &args.output_dir, args.format);
            pb.inc(1);
            let current = done.fetch_add(1, Ordering::Relaxed) + 1;
            log_progress("align", current, total, LOG_INTERVAL);
            (job.stem.clone(), result)
        })
        .collect();

    pb.finish_with_message("Phase 2: Alignment done");

    let mut stats = AlignmentStats::default();
    let mut failures = 0usize;
    for (stem, result) in &results {
        match result {
            Ok(song_stats) => stats.merge(song_stats),
            Err(e) => {
                failures += 1;
                error!(song = %stem, "alignment failed: {:#}", e);
            }
        }
    }

    stats.log_phase("batch");
    if let Some(path) = &args.stats_file {
        stats
            .write_to_file(path)
            .with_context(|| format!("Failed to write stats to {}", path.display()))?;
    }

    println!("\n{:=<60}", "");
    println!("Batch alignment complete!");
    println!("  Songs aligned: {}", stats.songs);
    println!("  Songs failed: {}", failures);
    println!("  Lines: {} ({:.1}% matched)", stats.total_lines, stats.match_rate());
    println!("  Elapsed: {}", format_duration(start.elapsed()));
    println!("{:=<60}", "");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn test_find_jobs_pairs_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.txt", "second song");
        write(dir.path(), "b.json", "[]");
        write(dir.path(), "a.txt", "first song");
        write(dir.path(), "a.json", "[]");
        write(dir.path(), "orphan.txt", "no transcript");
        write(dir.path(), "notes.md", "ignored");

        let jobs = find_jobs(dir.path()).unwrap();
        let stems: Vec<&str> = jobs.iter().map(|j| j.stem.as_str()).collect();
        assert_eq!(stems, vec!["a", "b"]);
        assert_eq!(jobs[0].transcript, dir.path().join("a.json"));
    }

    #[test]
    fn test_process_job_writes_output() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(input.path(), "song.txt", "hello world\n\nthis is a test\n");
        write(
            input.path(),
            "song.json",
            r#"[{"word":"hello","startTime":0,"endTime":0.5},
                {"word":"world","startTime":0.5,"endTime":1.0},
                {"word":"this","startTime":1.2,"endTime":1.5},
                {"word":"is","startTime":1.5,"endTime":1.7},
                {"word":"a","startTime":1.7,"endTime":1.8},
                {"word":"test","startTime":1.8,"endTime":2.2}]"#,
        );

        let jobs = find_jobs(input.path()).unwrap();
        let stats = process_job(&jobs[0], output.path(), OutputFormat::Lrc).unwrap();
        assert_eq!(stats.total_lines, 2);
        assert_eq!(stats.matched_lines(), 2);

        let lrc = fs::read_to_string(output.path().join("song.lrc")).unwrap();
        assert_eq!(lrc, "[00:00.00]hello world\n[00:01.20]this is a test\n");
    }

    #[test]
    fn test_process_job_with_garbage_transcript() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        write(input.path(), "song.txt", "one\ntwo");
        write(input.path(), "song.json", "the model refused");

        let jobs = find_jobs(input.path()).unwrap();
        let stats = process_job(&jobs[0], output.path(), OutputFormat::Json).unwrap();
        assert_eq!(stats.no_evidence_lines, 2);

        let json = fs::read_to_string(output.path().join("song.timed.json")).unwrap();
        let lines: Vec<lyric_align::LyricLine> = serde_json::from_str(&json).unwrap();
        assert_eq!(lines.iter().map(|l| l.timestamp).collect::<Vec<_>>(), vec![1.0, 2.0]);
    }
}
