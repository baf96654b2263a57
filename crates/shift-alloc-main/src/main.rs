// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use shift_alloc_model::judge::JudgeChannel;
use shift_alloc_solver::engine::{config::SolverConfig, session::Session};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Diagnostics go to stderr only; stdout belongs to the judge. Logging
/// is off unless `RUST_LOG` says otherwise.
fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    enable_tracing();

    let stdin = std::io::stdin().lock();
    let stdout = std::io::stdout().lock();
    let channel = JudgeChannel::new(stdin, stdout);
    let mut session = Session::new(channel, SolverConfig::default());

    match session.run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("shift-alloc: {}", e);
            ExitCode::FAILURE
        }
    }
}
