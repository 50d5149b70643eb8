pub mod clock;
pub mod config;
pub mod demos;
pub mod error;
pub mod harness;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use sysinfo::System;

use crate::core::config::HarnessConfig;
use crate::core::demos::{Demo, DemoReport};
use crate::core::error::{HarnessError, Result};
use crate::core::harness::Harness;
use crate::ui::plot::{plot_samples, PlotConfig};
use crate::ui::report::print_report;
use crate::utils::export::{export_samples_csv, export_statistics_json};

// ============================================================================
// HOST INFORMATION
// ============================================================================

fn print_host_info() {
    println!("{}", "System Information".bold().yellow());
    println!("━━━━━━━━━━━━━━━━━━━");

    let os = os_info::get();
    println!("   OS: {}", os);

    let sys = System::new_all();
    let brand = sys
        .cpus()
        .first()
        .map(|cpu| cpu.brand().trim().to_string())
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());
    println!("   CPU: {} ({} logical cores)", brand, sys.cpus().len());
    println!("   Memory: {:.1} GiB", sys.total_memory() as f64 / (1024.0 * 1024.0 * 1024.0));
    println!();
}

// ============================================================================
// ARTEFACTS
// ============================================================================

fn save_report(report: &DemoReport, output_dir: &Path) -> Result<()> {
    let demo_dir = output_dir.join(report.name);
    fs::create_dir_all(&demo_dir)?;

    for m in &report.measurements {
        let slug = m.slug();
        export_samples_csv(&m.raw_samples, &m.statistics, demo_dir.join(format!("{slug}.csv")))?;

        let plot_config = PlotConfig {
            title: format!("{}: {}", report.title, m.label),
            ..PlotConfig::default()
        };
        // Plotting needs system fonts; a missing font should not cost the numbers.
        if let Err(e) = plot_samples(&m.raw_samples, &m.statistics, demo_dir.join(format!("{slug}.svg")), Some(&plot_config)) {
            tracing::warn!(demo = report.name, label = %m.label, error = %e, "plot skipped");
        }
    }

    let entries: Vec<(&str, _)> = report
        .measurements
        .iter()
        .map(|m| (m.label.as_str(), &m.statistics))
        .collect();
    export_statistics_json(&entries, demo_dir.join("statistics.json"))?;
    Ok(())
}

// ============================================================================
// RUNNER
// ============================================================================

async fn run_demo(demo: Demo, config: HarnessConfig) -> Result<DemoReport> {
    tokio::task::spawn_blocking(move || demo.execute(&Harness::new(), &config))
        .await
        .map_err(|e| HarnessError::Io(io::Error::new(io::ErrorKind::Other, e)))?
}

/// Run the selected demos (all of them when `only` is empty) and write their artefacts.
pub async fn run_demos(config_path: impl AsRef<Path>, output_dir: impl Into<PathBuf>, only: &[String]) -> Result<Vec<DemoReport>> {
    let separator = "=".repeat(60);
    println!("\n{}", separator);
    println!("{:^60}", "Timing Lab".bold().cyan());
    println!("{}\n", separator);

    print_host_info();

    let config = HarnessConfig::load_or_default(config_path.as_ref())?;
    println!("{}", "Harness Parameters".bold().yellow());
    println!("━━━━━━━━━━━━━━━━━━━");
    println!("▸ Warmup iterations: {}", config.warmup_iterations());
    println!("▸ Measured iterations: {}\n", config.measured_iterations());

    let selected: Vec<Demo> = if only.is_empty() {
        demos::all()
    } else {
        let mut picked = Vec::with_capacity(only.len());
        for name in only {
            let demo = demos::find(name)
                .ok_or_else(|| HarnessError::invalid(format!("unknown demo '{name}'")))?;
            picked.push(demo);
        }
        picked
    };

    let output_dir: PathBuf = output_dir.into();
    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(selected.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );

    let mut reports = Vec::with_capacity(selected.len());
    for demo in selected {
        pb.set_message(demo.title);
        tracing::info!(demo = demo.name, "running demo");
        let report = match run_demo(demo, config).await {
            Ok(r) => r,
            Err(e) => {
                pb.abandon_with_message(format!("{} failed", demo.title));
                eprintln!("{} {}", "❌ Error:".bold().red(), e);
                return Err(e);
            }
        };
        save_report(&report, &output_dir)?;
        reports.push(report);
        pb.inc(1);
    }
    pb.finish_with_message("all demos completed");

    for report in &reports {
        print_report(report);
    }

    println!("\n✅ Results written to {}", output_dir.display());
    Ok(reports)
}
