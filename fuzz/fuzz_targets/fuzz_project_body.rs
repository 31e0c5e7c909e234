//! Fuzz target: project request body parsing and draft validation.
//!
//! Arbitrary bytes go through the same path as a create/update request. A
//! draft that validates must hold a non-blank trimmed name and non-blank code.

#![no_main]

use libfuzzer_sys::fuzz_target;
use snipbox_core::project::{MAX_CODE_BYTES, MAX_NAME_CHARS};
use snipbox_core::ProjectDraft;
use snipbox_gateway::projects::ProjectBody;

fuzz_target!(|data: &[u8]| {
    let Ok(body) = serde_json::from_slice::<ProjectBody>(data) else {
        return;
    };
    if let Ok(draft) = ProjectDraft::new(&body.name, &body.code) {
        assert!(!draft.name().is_empty());
        assert_eq!(draft.name(), draft.name().trim());
        assert!(draft.name().chars().count() <= MAX_NAME_CHARS);
        assert!(!draft.code().trim().is_empty());
        assert!(draft.code().len() <= MAX_CODE_BYTES);
    }
});
