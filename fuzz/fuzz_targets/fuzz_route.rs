#![no_main]
use libfuzzer_sys::fuzz_target;
use satlab_core::types::{BuildAnswers, Field, ModelId};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let mut answers = BuildAnswers::default();
    for (field, part) in Field::ALL.iter().zip(text.split('\u{1f}')) {
        answers.set(*field, part);
    }
    let id = satlab_core::router::select_model(&answers);
    assert!(ModelId::ALL.contains(&id));
    let _ = satlab_core::router::describe_model(&text);
});
