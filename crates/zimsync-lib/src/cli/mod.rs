mod args;
mod console;
mod params;
mod resolved_command;
mod sync;

pub use args::{Args, Command, SyncArgs, parse_args};
pub use console::ConsoleReporter;
pub use params::SyncParams;
pub use resolved_command::{ResolvedCommand, resolve_command};
pub use sync::{run_download, run_sync, run_verify};
