#![no_main]

use libfuzzer_sys::fuzz_target;
use snowpit_core::ProfileConfig;
use snowpit_layout::Profile;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Parsing may fail but must never panic; a config that loads must
    // build a profile.
    let Ok(config) = ProfileConfig::from_toml_str(text) else {
        return;
    };
    let profile = Profile::new(config).expect("validated config builds a profile");
    assert!(!profile.is_empty());
});
