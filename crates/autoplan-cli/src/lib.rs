pub mod cli;

pub use cli::{Cli, Commands, InputArgs, OutputFormat};
