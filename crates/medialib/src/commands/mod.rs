//! Command dispatch: bridges CLI args -> `MediaLibrary` -> output formatting.

pub mod config_cmd;
pub mod docs;
pub mod duplicate;
pub mod folders;
pub mod upload;
pub mod widgets;

mod rows;

use medialib_core::MediaLibrary;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a session-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    library: &MediaLibrary,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Docs(args) => docs::handle(library, args, global).await,
        Command::Folders(args) => folders::handle(library, args, global).await,
        Command::Upload(args) => upload::handle(library, args, global).await,
        Command::Duplicate(args) => duplicate::handle(library, args, global).await,
        Command::Widgets(args) => widgets::handle(library, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "command does not need a portal session".into(),
        )),
    }
}
