#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    let compiled = compact_json::build(&input);
    let root = compiled.document().root();
    assert!(root == input);
    if let serde_json::Value::Object(map) = &input {
        for key in map.keys() {
            assert!(root.contains(key));
        }
    }
    let plain = compact_json::options().deduplicate(false).build(&input);
    assert!(plain.document().root() == root);
});
