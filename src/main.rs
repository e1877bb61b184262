use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::Result;
use photolog_config::Settings;
use photolog_core::{ReportGenerator, ReportJob, Scanner};
use photolog_models::{FolderRecord, ReportSummary};
use photolog_utils::path::reveal_in_folder;
use photolog_utils::{Progress, format_gib};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod cli;
use cli::Cli;

const TICK_RATE: Duration = Duration::from_millis(100);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    setup_logging(&cli)?;

    if let Err(e) = run(cli).await {
        error!("Report failed: {}", e);
        return Err(e);
    }

    Ok(())
}

fn setup_logging(cli: &Cli) -> Result<()> {
    let default_filter = if cli.verbose {
        "photolog=debug,info"
    } else {
        "photolog=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    if let Some(log_path) = &cli.log_file {
        if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_ansi(false)
            .with_env_filter(filter)
            .with_target(true)
            .with_line_number(true)
            .with_thread_ids(false)
            .init();

        info!("Log file: {}", log_path.display());
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let settings = match &cli.config {
        Some(path) => Settings::load_from(path).await?,
        None => Settings::load().await?,
    };

    let mut layout = settings.layout.clone();
    cli.apply_layout_overrides(&mut layout);
    let folder_order = cli.folder_order.unwrap_or(settings.folder_order);
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let metadata = cli.metadata(&settings.operator, &today)?;

    if cli.save_config {
        let updated = cli.settings_to_save(&settings, &layout, folder_order, &metadata);
        match &cli.config {
            Some(path) => updated.save_to(path)?,
            None => updated.save()?,
        }
    }

    let progress = Arc::new(RwLock::new(Progress::new()));
    let ticker = spawn_ticker(progress.clone());

    if cli.dry_run {
        let scan = Scanner::new(folder_order)
            .scan(&cli.input, &metadata.processor, progress.clone())
            .await;
        stop_ticker(ticker, &progress).await;
        let scan = scan?;

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&scan)?);
        } else {
            print_records(&scan.records);
            for skipped in &scan.skipped {
                println!("skipped {}: {}", skipped.name, skipped.reason);
            }
        }
        return Ok(());
    }

    let template = cli.template_path(&settings.operator)?;
    let job = ReportJob {
        input_dir: cli.input.clone(),
        output: cli.output_path(&template),
        template,
        metadata,
        layout,
        folder_order,
    };

    let result = ReportGenerator::generate(job, progress.clone()).await;
    stop_ticker(ticker, &progress).await;
    let summary = result?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    if cli.open {
        if let Err(e) = reveal_in_folder(&summary.output) {
            warn!("Could not open the output folder: {}", e);
        }
    }

    Ok(())
}

/// Redraws the scan status on stderr until the scan completes.
fn spawn_ticker(progress: Arc<RwLock<Progress>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(TICK_RATE);
        loop {
            interval.tick().await;
            let progress = progress.read().await;
            if progress.total > 0 {
                eprint!("\r{}", progress.status_line());
            }
            if progress.is_complete {
                break;
            }
        }
    })
}

async fn stop_ticker(ticker: JoinHandle<()>, progress: &RwLock<Progress>) {
    ticker.abort();
    let progress = progress.read().await;
    if progress.total > 0 {
        eprintln!("\r{}", progress.status_line());
    }
    info!("Scanned {} folders in {:.2?}", progress.current, progress.elapsed());
}

fn print_records(records: &[FolderRecord]) {
    for record in records {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            record.folder_name,
            record.first_file_stem,
            record.range_label,
            record.file_count,
            format_gib(record.total_size_gib),
            record.processor_name
        );
    }
}

fn print_summary(summary: &ReportSummary) {
    print_records(&summary.scan.records);
    println!(
        "Wrote {} rows to {} ({} folders skipped)",
        summary.fill.rows_written,
        summary.output.display(),
        summary.scan.skipped.len()
    );
    for warning in &summary.fill.formatting_warnings {
        println!("warning: {warning}");
    }
}
