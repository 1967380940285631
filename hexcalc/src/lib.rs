//! Interactive front end of the hexcalc register calculator.

extern crate alloc;

pub mod cli;
pub mod command;
pub mod help;
pub mod render;
pub mod repl;

pub use cli::HexcalcCli;
pub use command::{Command, CommandError};
pub use repl::{Outcome, Session, SessionError};
