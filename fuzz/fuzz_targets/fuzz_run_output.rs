//! Fuzz target: runner response parsing.
//!
//! Whatever the runner sends back, parsing must return either output or a
//! `Malformed` error, and converting that into an outcome must not panic.
#![no_main]

use libfuzzer_sys::fuzz_target;
use snipbox_runner::{parse_run_output, ExecutionOutcome, RunnerError};

fuzz_target!(|data: &[u8]| {
    let outcome = match parse_run_output(data) {
        Ok(output) => ExecutionOutcome::from(output),
        Err(e) => {
            assert!(matches!(e, RunnerError::Malformed(_)), "unexpected error: {e}");
            ExecutionOutcome::from(e)
        }
    };
    let _ = serde_json::to_string(&outcome);
});
