#![no_main]
use libfuzzer_sys::fuzz_target;
use satlab_engine::stream::DeltaStream;

fuzz_target!(|data: &[u8]| {
    // Feed the same bytes whole and in 7-byte chunks; the text must agree.
    let whole = DeltaStream::new(vec![data.to_vec()]).collect_text();
    let chunked = DeltaStream::new(data.chunks(7)).collect_text();
    assert_eq!(whole, chunked);
});
