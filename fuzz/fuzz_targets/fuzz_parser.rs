//! Fuzz the proplog parser
//!
//! Exercises the lexer and parser in both grammar modes, plus the batch runner
//! that segments and dispatches arbitrary text.

#![no_main]

use libfuzzer_sys::fuzz_target;
use proplog::{Grammar, TermClasses};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Malformed input is an error value, never a panic
        let _ = proplog::parse(input, Grammar::Propositional);
        let _ = proplog::parse(input, Grammar::FirstOrder);
        let _ = proplog::batch::run(input, &TermClasses::default());
    }
});
