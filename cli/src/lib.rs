pub mod args;
pub mod commands;
pub mod logging;
pub mod output;

pub use args::Args;
pub use output::{OutputFormat, Report};
