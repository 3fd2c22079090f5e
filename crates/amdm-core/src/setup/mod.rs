//! First-run setup: step sequence and wizard state machine.

mod step;
mod wizard;

pub use step::SetupStep;
pub use wizard::SetupWizard;
