//! `processor` -- show the active Sleeptracker processor id.

use drowse_core::Bed;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

pub async fn handle(bed: &Bed, global: &GlobalOpts) -> Result<(), CliError> {
    let id = bed.processor_id().await?;
    let out = output::render_single(
        &global.output,
        &id,
        |id| format!("Processor: {id}"),
        ToString::to_string,
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
