mod config;
mod renderer;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use okuma_seyri_core::parsers::parse_trace_auto;
use okuma_seyri_core::report::to_json_pretty;
use okuma_seyri_core::svg::render_svg;
use okuma_seyri_core::views::render_reading_map;
use okuma_seyri_core::{ReadingSummary, StaticLayout, map_blocks, parse_report, replay_trace};
use okuma_seyri_protocol::{REPORT_FILE_NAME, SessionReport, Viewport};

#[derive(Parser)]
#[command(name = "okuma-seyri", about = "Reading path replay and reports")]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded gaze trace against a layout fixture and write a report.
    Replay {
        /// Layout fixture (JSON).
        #[arg(long)]
        layout: PathBuf,
        /// Gaze trace: CSV, JSON estimate array, or an earlier report.
        #[arg(long)]
        trace: PathBuf,
        /// Tracker settings (TOML).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Overrides the configured container id.
        #[arg(long)]
        container: Option<String>,
        #[arg(long, short, default_value = REPORT_FILE_NAME)]
        out: PathBuf,
    },
    /// Recompute counters and per-block dwell from a report.
    Summary { report: PathBuf },
    /// Export the reading map of a report as SVG.
    Svg {
        report: PathBuf,
        #[arg(long, short, default_value = "reading-map.svg")]
        out: PathBuf,
        #[arg(long, default_value_t = 800.0)]
        width: f64,
        #[arg(long, default_value_t = 600.0)]
        height: f64,
        #[arg(long)]
        dark: bool,
    },
    /// Browse the reading map of a report in the terminal.
    View { report: PathBuf },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.cmd {
        Commands::Replay {
            layout,
            trace,
            config,
            container,
            out,
        } => {
            let mut config = config::load_config(config.as_deref())?;
            if let Some(container) = container {
                config.container_id = container;
            }
            let layout = StaticLayout::from_json(&read(&layout)?)?;
            let blocks = map_blocks(&layout, &config.container_id)?;
            let trace = parse_trace_auto(&read(&trace)?)?;

            let session = replay_trace(config, blocks, &trace)?;
            // Replay already stopped the session, so the clock argument is unused.
            let report = session.report(Utc::now(), 0);
            std::fs::write(&out, to_json_pretty(&report)?)
                .with_context(|| format!("writing {}", out.display()))?;
            log::info!("wrote {} samples to {}", report.samples.len(), out.display());
            print_summary(&mut io::stdout().lock(), &report)?;
        }
        Commands::Summary { report } => {
            let report = load_report(&report)?;
            print_summary(&mut io::stdout().lock(), &report)?;
        }
        Commands::Svg {
            report,
            out,
            width,
            height,
            dark,
        } => {
            let report = load_report(&report)?;
            if report.blocks.is_empty() {
                log::warn!("report carries no block layout; only the gaze path is drawn");
            }
            let viewport = Viewport::sized(width, height);
            let commands = render_reading_map(
                &report.blocks,
                &report.samples,
                report.reading.counters,
                &viewport,
            );
            std::fs::write(&out, render_svg(&commands, width, height, dark))
                .with_context(|| format!("writing {}", out.display()))?;
            log::info!("wrote {}", out.display());
        }
        Commands::View { report } => {
            let report = load_report(&report)?;
            renderer::render_tui(&report)?;
        }
    }
    Ok(())
}

fn read(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("reading {}", path.display()))
}

fn load_report(path: &Path) -> Result<SessionReport> {
    let data = read(path)?;
    parse_report(&data).with_context(|| format!("parsing {}", path.display()))
}

fn print_summary(out: &mut impl Write, report: &SessionReport) -> Result<()> {
    let summary = ReadingSummary::from_report(report);
    let reading = &report.reading;
    writeln!(out, "created:      {}", report.meta.created_at.to_rfc3339())?;
    match reading.duration_sec {
        Some(sec) => writeln!(out, "duration:     {sec:.1} s")?,
        None => writeln!(out, "duration:     -")?,
    }
    writeln!(
        out,
        "samples:      {} ({} off-text, {:.0}%)",
        summary.sample_count,
        summary.unknown_samples,
        summary.unknown_ratio() * 100.0
    )?;
    writeln!(
        out,
        "line changes: {}  back: {}  skip: {}",
        reading.counters.line_changes, reading.counters.line_back, reading.counters.line_skip
    )?;
    if !summary.matches(report) {
        writeln!(
            out,
            "recomputed:   {}  back: {}  skip: {} (early samples were evicted)",
            summary.counters.line_changes, summary.counters.line_back, summary.counters.line_skip
        )?;
    }
    for dwell in &summary.dwell {
        let secs = (dwell.last_t - dwell.first_t) as f64 / 1000.0;
        writeln!(
            out,
            "  block {:>3}: {:>5} samples over {secs:.1} s",
            dwell.block_id, dwell.samples
        )?;
    }
    Ok(())
}
