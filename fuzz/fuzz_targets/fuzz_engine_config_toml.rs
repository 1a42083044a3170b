#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Engine config parsing and unknown-key detection must never panic
        let _ = stratus::config::parse_with_warnings(content, Path::new("stratus.toml"));
    }
});
