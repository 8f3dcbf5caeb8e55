//! Command handlers.

pub mod config_cmd;
pub mod env;
pub mod light;
pub mod press;
pub mod processor;
pub mod status;

use drowse_core::Bed;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a parsed command to its handler.
pub async fn dispatch(command: Command, bed: &Bed, global: &GlobalOpts) -> Result<(), CliError> {
    match command {
        Command::Status => status::handle(bed, global).await,
        Command::Light(args) => light::handle(bed, args, global).await,
        Command::Press { target } => press::handle_press(bed, &target, global).await,
        Command::Commands => press::handle_list(bed, global),
        Command::Env(args) => env::handle(bed, args, global).await,
        Command::Processor => processor::handle(bed, global).await,
        Command::Config(_) | Command::Completions(_) => {
            unreachable!("handled before the bed is built")
        }
    }
}
