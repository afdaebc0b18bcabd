#![no_main]
use libfuzzer_sys::fuzz_target;
use satlab_engine::interview::{Interview, Step};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let mut iv = Interview::default();
    iv.start();
    // Every non-blank line is one submission; the machine must never panic
    // and must finish within 12 submissions.
    let mut submitted = 0;
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        match iv.submit(line) {
            Ok(Step::Complete(_)) => {
                assert!(iv.answers().is_complete());
                break;
            }
            Ok(_) => submitted += 1,
            Err(e) => panic!("unexpected interview error: {e}"),
        }
        assert!(submitted < 12);
    }
});
