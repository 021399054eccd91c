pub mod config;
pub mod errors;
pub mod ops;
mod runner;
pub mod seq;

use crate::errors::FastaError;

pub fn run() -> Result<(), FastaError> {
    runner::run()
}
