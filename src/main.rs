use std::sync::Arc;
use std::sync::mpsc::channel;

use anyhow::{Context, Result, bail};
use clap::Parser;

use cpr_breakout::analysis::SymbolOutcome;
use cpr_breakout::config::ScreenerConfig;
use cpr_breakout::data::{BarSource, CsvBarSource, export_rows, load_symbols};
use cpr_breakout::engine::{ScreenEvent, ScreenJob, spawn_screen_worker};
use cpr_breakout::utils::time_utils::local_clock;
use cpr_breakout::{Cli, Command, ScreenReport, SymbolAnalysis, analyse_symbol};

fn main() -> Result<()> {
    // A. Init Logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::debug!("Parsed arguments: {:?}", args);

    match args.command {
        Command::Screen {
            symbols,
            export,
            parallel,
            any_trend,
            common,
        } => {
            let mut config = common.resolve(ScreenerConfig::default())?;
            config.parallel |= parallel;
            if any_trend {
                config.require_ascending_trend = false;
            }
            let symbols = load_symbols(&symbols)?;
            let source: Arc<dyn BarSource> = Arc::new(CsvBarSource::new(&common.data_dir));
            let report = run_screen(symbols, config, source)?;
            print_report(&report);
            let qualified = report.qualified();
            export_rows(&export, &qualified)?;
            log::info!("📥 Wrote {} rows to {}", qualified.len(), export.display());
        }
        Command::Analyse {
            symbol,
            green_first_candle,
            common,
        } => {
            let mut config = common.resolve(ScreenerConfig::single_symbol())?;
            config.require_green_first_candle |= green_first_candle;
            let source = CsvBarSource::new(&common.data_dir);
            let daily = source.daily_bars(&symbol)?;
            let session = source.intraday_session(&symbol, config.interval)?;
            // Insufficient data ends a single-symbol run.
            let analysis = analyse_symbol(&daily, &session, &config)
                .with_context(|| format!("Cannot analyse {}", symbol))?;
            print_analysis(&analysis);
        }
    }
    Ok(())
}

fn run_screen(
    symbols: Vec<String>,
    config: ScreenerConfig,
    source: Arc<dyn BarSource>,
) -> Result<ScreenReport> {
    log::info!(
        "Screening {} symbols from {} ({} strategy, volume filter {})",
        symbols.len(),
        source.signature(),
        config.strategy,
        if config.volume_filter { "on" } else { "off" }
    );
    let (tx, rx) = channel();
    let handle = spawn_screen_worker(
        ScreenJob {
            symbols,
            config,
            source,
        },
        tx,
    );

    let mut finished = None;
    for event in rx {
        match event {
            ScreenEvent::Progress(p) => {
                log::info!("[{:>3.0}%] {}/{} {}", p.fraction() * 100.0, p.processed, p.total, p.symbol);
            }
            ScreenEvent::Finished { report, duration_ms } => {
                log::info!("Screen finished in {} ms", duration_ms);
                finished = Some(report);
            }
        }
    }
    if handle.join().is_err() {
        bail!("Screen worker panicked");
    }
    finished.context("Screen worker exited without a report")
}

fn print_report(report: &ScreenReport) {
    let qualified = report.qualified();
    if qualified.is_empty() {
        println!("❌ No stocks satisfied the conditions today.");
    } else {
        println!("✅ Stocks satisfying conditions:");
        println!(
            "{:<16} {:>12} {:>12} {:>14} {:>14} {:>8}",
            "Symbol", "Trigger Open", "Trigger Close", "Yesterday High", "CPR Trend", "Width"
        );
        for row in qualified {
            println!(
                "{:<16} {:>12.2} {:>12.2} {:>14.2} {:>14} {:>8}",
                row.symbol,
                row.trigger_open,
                row.trigger_close,
                row.yesterday_high,
                row.trend.to_string(),
                row.width.to_string()
            );
        }
    }

    for entry in &report.symbols {
        match &entry.outcome {
            SymbolOutcome::Skipped { .. } | SymbolOutcome::Failed { .. } => {
                println!("   skipped {:<16} {}", entry.symbol, entry.reason());
            }
            SymbolOutcome::Screened { row: None, .. } => {
                log::debug!("{} not qualified: {}", entry.symbol, entry.reason());
            }
            SymbolOutcome::Screened { .. } => {}
        }
    }
}

fn print_analysis(analysis: &SymbolAnalysis) {
    let breakout = &analysis.breakout;
    println!("{}", analysis.symbol);
    println!("Yesterday CPR: {}", analysis.yesterday);
    match analysis.trend {
        Some(trend) => println!("CPR Trend: {}", trend),
        None => println!("CPR Trend: n/a (needs three daily bars)"),
    }
    println!(
        "CPR Width: {} ({:.3}%)",
        analysis.width, analysis.width_pct
    );

    let tz = analysis.overlay.tz;
    match (&breakout.trigger, breakout.qualifies) {
        (Some(t), true) => println!(
            "✅ {} breakout at {} (candle {}): close {:.2} above yesterday's high {:.2}",
            breakout.strategy,
            local_clock(t.timestamp, tz),
            t.index + 1,
            t.close,
            analysis.yesterday_high
        ),
        (Some(t), false) => println!(
            "No breakout: {} (candle {} close {:.2}, yesterday's high {:.2})",
            breakout.reason,
            t.index + 1,
            t.close,
            analysis.yesterday_high
        ),
        (None, _) => println!("No breakout: {}", breakout.reason),
    }
    if breakout.reason.is_volume_rejection() {
        if let Some(threshold) = breakout.volume_threshold {
            println!("⚠️ Volume not sufficient for breakout (needed > {:.0})", threshold);
        }
    }
}
