//! CLI command handlers, one per file.

mod check;
mod fetch;
mod run;

pub use check::run_check;
pub use fetch::run_fetch;
pub use run::run_stress;
