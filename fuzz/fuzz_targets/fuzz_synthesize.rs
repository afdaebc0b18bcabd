#![no_main]
use libfuzzer_sys::fuzz_target;
use satlab_core::types::{BuildAnswers, Field};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let mut answers = BuildAnswers::default();
    for (field, part) in Field::ALL.iter().zip(text.split('\u{1f}')) {
        answers.set(*field, part);
    }
    let doc = satlab_core::synth::synthesize(&answers);
    assert_eq!(doc.text(), satlab_core::synth::synthesize(&answers).text());
});
