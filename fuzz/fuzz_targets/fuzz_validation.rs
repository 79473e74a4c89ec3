//! Fuzz testing for validation rules.
//!
//! Every rule must return a verdict for any UTF-8 input without panicking,
//! and the [`Validator`] must report at most one error per field.
//!
//! # Running the Fuzz Tests
//!
//! ```bash
//! # Install cargo-fuzz (requires nightly)
//! cargo +nightly install cargo-fuzz
//!
//! # Run the validation fuzz target
//! cargo +nightly fuzz run fuzz_validation
//!
//! # Run with a time limit (e.g., 60 seconds)
//! cargo +nightly fuzz run fuzz_validation -- -max_total_time=60
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use relay_api::validation::{
    Email, HttpUrl, MaxLength, MinLength, Password, Phone, Required, Rule, Username, Validator,
};

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    let rules: [&dyn Rule; 8] = [
        &Required,
        &Email,
        &MinLength(6),
        &MaxLength(20),
        &Password,
        &Phone,
        &Username,
        &HttpUrl,
    ];

    for rule in rules {
        let _ = rule.check(s);
        let _ = rule.message("field");
    }

    let mut validator = Validator::new();
    validator.field("field", s, &rules);
    assert!(validator.errors().len() <= 1);
});
