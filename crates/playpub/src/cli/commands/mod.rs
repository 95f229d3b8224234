//! CLI commands

mod args;
mod check;
mod publish;

pub use check::CheckCommand;
pub use publish::PublishCommand;
