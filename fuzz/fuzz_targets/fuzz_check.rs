#![no_main]
use libfuzzer_sys::fuzz_target;
use satlab_core::config::ClarifyConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        let _ = satlab_core::schema::check(&value, "fuzz.json", true, &ClarifyConfig::default());
    }
});
