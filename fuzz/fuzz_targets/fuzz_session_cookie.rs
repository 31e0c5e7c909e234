//! Fuzz target: session cookie verification.
//!
//! Arbitrary cookie values must never verify unless they were signed with the
//! server secret.
#![no_main]

use libfuzzer_sys::fuzz_target;
use snipbox_core::SecretString;
use snipbox_gateway::CookieSettings;

fuzz_target!(|data: &[u8]| {
    let Ok(value) = std::str::from_utf8(data) else {
        return;
    };
    let settings = CookieSettings::new(SecretString::new("f".repeat(32)), false);
    if let Some(token) = settings.verify(value) {
        assert_eq!(settings.sign(&token), value);
    }
});
