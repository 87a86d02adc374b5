#![no_main]
use hlse::SaveFile;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(save) = SaveFile::from_slice(data) else {
        return;
    };

    // Reinserting the same blob reproduces the input
    let out = save.reassemble(save.blob()).unwrap();
    assert_eq!(out, data);

    // Any replacement must parse back with consistent size fields
    let replacement = &data[..data.len() / 2];
    let out = save.reassemble(replacement).unwrap();
    let reparsed = SaveFile::from_slice(&out).unwrap();
    assert_eq!(reparsed.offsets().blob_len(), replacement.len());
    assert_eq!(
        &out[reparsed.offsets().tail_start()..],
        &data[save.offsets().tail_start()..]
    );
});
