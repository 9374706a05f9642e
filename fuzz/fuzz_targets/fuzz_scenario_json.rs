#![no_main]

use keyboard_inset::utils::ScriptedEvent;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Scenario files are user-supplied; parsing must never panic
    if let Ok(s) = std::str::from_utf8(data) {
        let _result: Result<Vec<ScriptedEvent>, _> = serde_json::from_str(s);
    }
});
