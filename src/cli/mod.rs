pub mod catalog;
pub mod commands;
pub mod import;
pub mod session;
pub mod tasks;

pub use commands::*;

use crate::error::ReachaiError;
use crate::output;

/// Print `err` in the requested format and return the error exit code.
pub fn report_error(err: &ReachaiError, json_output: bool) -> i32 {
    if json_output {
        println!("{:#}", output::json::error(err));
    } else {
        eprintln!("Error: {}", err.message);
    }
    1
}
