#![no_main]

use libfuzzer_sys::fuzz_target;
use pyshim::CodegenConfig;

fuzz_target!(|data: &[u8]| {
    // Any document the loader accepts must generate or fail with an error, never panic
    if let Ok(program) = pyshim::load::from_slice(data) {
        let _ = pyshim::generate(&program, CodegenConfig::new().with_keep_going(true));
    }
});
