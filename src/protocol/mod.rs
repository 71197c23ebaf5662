//! Text protocol front end: command parser plus the stdin/stdout loop

pub mod engine;
pub mod parser;

pub use engine::{run_loop, Engine};
pub use parser::{parse_command, Command, COMMANDS};
