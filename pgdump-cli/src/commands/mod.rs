mod daemon;
mod dumps;
mod run;
mod targets;

// Run commands
pub use run::{print_report, run_once};

// Daemon commands
pub use daemon::run_daemon;

// Target discovery commands
pub use targets::show_targets;

// Remote dump commands
pub use dumps::list_dumps;
