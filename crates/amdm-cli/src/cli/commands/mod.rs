//! CLI command handlers, one file per subcommand.

mod add;
mod classify;
mod completions;
mod settings;
mod setup;

pub use add::run_add;
pub use classify::run_classify;
pub use completions::run_completions;
pub use settings::{run_settings_move, run_settings_reset, run_settings_set, run_settings_show};
pub use setup::run_setup;
