//! Batch processing: progress display, per-image timing lines, and the optional report.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Duration;

use animegan_core::{BatchEvent, BatchSummary, DiscoveredFile, ProcessedImage, ReportWriter};
use indicatif::ProgressBar;

use super::types::RunStatus;
use super::{ProcessArgs, ProcessContext};

/// Stylize every discovered file into the output directory.
pub(crate) async fn process_batch(
    ctx: ProcessContext,
    args: &ProcessArgs,
    files: Vec<DiscoveredFile>,
) -> anyhow::Result<RunStatus> {
    let progress = create_progress_bar(files.len() as u64);
    let start_time = std::time::Instant::now();
    let mut done: u64 = 0;

    let outcome = ctx
        .driver
        .run(&files, &args.output, |event| match event {
            BatchEvent::Started { total } => {
                tracing::debug!("Processing {total} image(s) into {:?}", args.output);
            }
            BatchEvent::Processed(image) => {
                progress.suspend(|| println!("{}", progress_line(image)));
                done += 1;
                advance(&progress, done, start_time.elapsed());
            }
            BatchEvent::Failed(failed) => {
                progress.suspend(|| eprintln!("Skipped image: {:?} ({})", failed.path, failed.message));
                done += 1;
                advance(&progress, done, start_time.elapsed());
            }
        })
        .await;

    progress.finish_and_clear();
    let outcome = outcome?;
    let summary = &outcome.summary;

    if let Some(mean) = summary.mean_elapsed() {
        println!("Average time per image: {:.3}s", mean.as_secs_f64());
    }
    print_summary(summary, files.len());

    if let Some(report_path) = &args.report {
        write_report(report_path, summary, args)?;
    }

    tracing::debug!(
        "Batch finished with {} image(s) at {} quality",
        summary.succeeded(),
        ctx.config.output.jpeg_quality
    );

    let status = if outcome.aborted {
        eprintln!("Error: stopped after the first failure (--fail-fast)");
        RunStatus::Aborted
    } else if summary.failed_count() > 0 {
        RunStatus::PartialFailure
    } else {
        RunStatus::Completed
    };
    Ok(status)
}

/// The per-image line shown as each image completes.
fn progress_line(image: &ProcessedImage) -> String {
    format!(
        "Processed image: \"{}\" ({}) time: {:.3}s",
        image.input_path.display(),
        image.dimensions,
        image.elapsed.as_secs_f64()
    )
}

fn advance(progress: &ProgressBar, done: u64, elapsed: Duration) {
    progress.inc(1);
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 {
        progress.set_message(format!("{:.2} img/sec", done as f64 / secs));
    }
}

fn write_report(path: &Path, summary: &BatchSummary, args: &ProcessArgs) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let mut writer = ReportWriter::new(BufWriter::new(file), args.report_format.into(), true);
    writer.write_summary(summary)?;
    writer.flush()?;
    tracing::info!(
        "Report written to {:?} ({} record(s))",
        path,
        writer.items_written()
    );
    Ok(())
}

/// Create a progress bar for batch processing.
fn create_progress_bar(total: u64) -> ProgressBar {
    use indicatif::ProgressStyle;

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pb.set_message("loading...");
    pb
}

/// Print a formatted summary table after batch processing.
fn print_summary(summary: &BatchSummary, discovered: usize) {
    let elapsed = summary.total_elapsed;
    let not_attempted = discovered.saturating_sub(summary.total());

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Succeeded:    {:>8}", summary.succeeded());
    if summary.failed_count() > 0 {
        eprintln!("    Failed:       {:>8}", summary.failed_count());
    }
    if not_attempted > 0 {
        eprintln!("    Not run:      {:>8}", not_attempted);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", discovered);
    eprintln!("    Duration:     {:>7.1}s", elapsed.as_secs_f64());
    eprintln!("    Rate:         {:>7.2} img/sec", summary.rate());
    eprintln!("  ====================================");
}
