#![no_main]

use keyboard_inset::config::InsetConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parsing and validating arbitrary bytes must never panic
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(config) = serde_json::from_str::<InsetConfig>(s) {
            let _ = config.validate();
        }
    }
});
