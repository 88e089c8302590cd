pub mod config;
pub mod command;
pub mod repl;
