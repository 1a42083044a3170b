#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        if let Ok(manifest) = stratus::Manifest::from_yaml_str(content) {
            let _ = manifest.validate_references();
            let _ = manifest.binding_tags();
        }
    }
});
