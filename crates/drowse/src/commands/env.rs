//! `env` -- read environment sensors once, or stream updates.

use std::fmt::Write;

use drowse_core::{Bed, EnvironmentSample};

use crate::cli::{EnvArgs, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

pub async fn handle(bed: &Bed, args: EnvArgs, global: &GlobalOpts) -> Result<(), CliError> {
    if args.watch {
        return watch(bed, global).await;
    }
    let sample = bed.environment().await?;
    let out = output::render_single(&global.output, &sample, detail, oneline);
    output::print_output(&out, global.quiet);
    Ok(())
}

async fn watch(bed: &Bed, global: &GlobalOpts) -> Result<(), CliError> {
    let mut rx = bed.watch_environment().await?;
    if !global.quiet {
        eprintln!("Watching environment sensors; press Ctrl-C to stop.");
    }

    // The monitor may have polled before we subscribed; show what it has.
    if let Some(sample) = rx.borrow_and_update().clone() {
        print_watch_line(&sample, global);
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let sample = rx.borrow_and_update().clone();
                if let Some(sample) = sample {
                    print_watch_line(&sample, global);
                }
            }
        }
    }

    bed.shutdown().await;
    Ok(())
}

fn print_watch_line(sample: &EnvironmentSample, global: &GlobalOpts) {
    let line = match global.output {
        OutputFormat::Table | OutputFormat::Plain => format!(
            "{}  {}",
            chrono::Local::now().format("%H:%M:%S"),
            oneline(sample)
        ),
        _ => output::render_single(&global.output, sample, detail, oneline),
    };
    output::print_output(&line, global.quiet);
}

fn detail(sample: &EnvironmentSample) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Temperature: {}", metric(sample.temperature(), " °C"));
    let _ = writeln!(out, "Humidity:    {}", metric(sample.humidity(), " %"));
    let _ = writeln!(out, "CO2:         {}", metric(sample.co2(), " ppm"));
    let _ = writeln!(out, "VOC:         {}", metric(sample.voc(), " ppb"));
    let _ = writeln!(out, "IAQ index:   {}", metric(sample.iaq_index(), ""));
    out.trim_end().to_string()
}

fn oneline(sample: &EnvironmentSample) -> String {
    format!(
        "temp={} rh={} co2={}",
        metric(sample.temperature(), "°C"),
        metric(sample.humidity(), "%"),
        metric(sample.co2(), "ppm"),
    )
}

fn metric(value: Option<f64>, unit: &str) -> String {
    value.map_or_else(|| "-".into(), |v| format!("{v:.1}{unit}"))
}
