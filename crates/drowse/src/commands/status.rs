//! `status` -- report the bed's most recent status snapshot.

use std::fmt::Write;

use drowse_core::{Bed, StatusSnapshot};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(bed: &Bed, global: &GlobalOpts) -> Result<(), CliError> {
    let snapshot = bed.status().await?;
    let out = output::render_single(&global.output, &snapshot, detail, short);
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(snapshot: &Option<StatusSnapshot>) -> String {
    let Some(snap) = snapshot else {
        return "(no status snapshot reported)".into();
    };

    let mut out = String::new();
    let side = snap.side.map_or_else(|| "-".into(), |s| s.to_string());
    let _ = writeln!(out, "Side:         {side}");
    let _ = writeln!(
        out,
        "Safety light: {}",
        if snap.safety_light_is_on() { "on" } else { "off" }
    );
    // Firmware-specific fields ride along untyped; print them sorted.
    let mut keys: Vec<_> = snap.extra.keys().collect();
    keys.sort();
    for key in keys {
        let _ = writeln!(out, "{key}: {}", snap.extra[key]);
    }
    out.trim_end().to_string()
}

fn short(snapshot: &Option<StatusSnapshot>) -> String {
    match snapshot {
        Some(snap) => format!(
            "side={} light={}",
            snap.side.map_or_else(|| "-".into(), |s| s.to_string()),
            if snap.safety_light_is_on() { "on" } else { "off" },
        ),
        None => "no-snapshot".into(),
    }
}
