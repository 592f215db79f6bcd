//! wavkey CLI entry point

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use wavkey::config::{Cli, Settings};
use wavkey::pipeline;
use wavkey::FileReport;

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(&cli);

    let settings = Settings::from_cli(&cli);

    match pipeline::run(&settings) {
        Ok(result) => {
            for report in &result.reports {
                print_report(report);
            }

            if result.total_files > 1 {
                println!();
                println!(
                    "Summary: {} estimated, {} without pitch data, {} skipped, {} failed (of {} total)",
                    result.successful,
                    result.no_pitch_data,
                    result.skipped,
                    result.failed,
                    result.total_files
                );
            }

            if result.failed > 0 || result.skipped > 0 {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Fatal error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_report(file: &FileReport) {
    let name = file.path.display();
    match (&file.report, &file.error) {
        (Some(report), _) => println!(
            "{}: Estimated Key: {} (Avg tuning offset: {:.2} cents)",
            name, report.key_name, report.average_cents_offset
        ),
        (None, Some(error)) => println!("{}: {}", name, error),
        (None, None) => println!("{}: no result", name),
    }
}
