pub mod cli;
pub mod reporter;
pub mod runner;

pub use cli::{Cli, Command, PolicyArgs};
pub use runner::{translate_all, translate_file, write_outputs, Outcome};
