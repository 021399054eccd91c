// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Thomas Junier

use std::process::ExitCode;

fn main() -> ExitCode {
    match fastakit::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("fastakit: {}", e);
            ExitCode::FAILURE
        }
    }
}
