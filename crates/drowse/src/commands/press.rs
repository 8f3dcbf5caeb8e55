//! `press` / `commands` -- fire momentary commands and list the roster.

use tabled::Tabled;

use drowse_core::{Bed, MomentaryCommandSpec};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct CommandRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Code")]
    code: i64,
    #[tabled(rename = "Massage")]
    massage: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&MomentaryCommandSpec> for CommandRow {
    fn from(spec: &MomentaryCommandSpec) -> Self {
        Self {
            name: spec.name.clone(),
            code: spec.command,
            massage: spec
                .massage_adjustment
                .map_or_else(|| "-".into(), |m| m.to_string()),
            status: match spec.request_status {
                Some(true) => "yes".into(),
                Some(false) => "no".into(),
                None => "-".into(),
            },
        }
    }
}

pub async fn handle_press(bed: &Bed, target: &str, global: &GlobalOpts) -> Result<(), CliError> {
    bed.press(target).await?;
    if !global.quiet {
        eprintln!("✓ Pressed '{target}'");
    }
    Ok(())
}

pub fn handle_list(bed: &Bed, global: &GlobalOpts) -> Result<(), CliError> {
    let specs = bed.commands();
    if specs.is_empty() && matches!(global.output, OutputFormat::Table) {
        eprintln!("No commands configured for this profile.");
        eprintln!("Add [[profiles.<name>.commands]] entries, or press a raw numeric code.");
        return Ok(());
    }
    let out = output::render_list(&global.output, specs, |s| CommandRow::from(s), |s| s.name.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}
