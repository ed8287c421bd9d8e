#![no_main]
use libfuzzer_sys::fuzz_target;

use binvec::{decode, Column, Utf8View};

fuzz_target!(|data: &[u8]| {
    // Feed arbitrary bytes through every typed parse path. Err results are
    // expected and fine; what we verify is no panics.
    let _ = decode::<bool>(data);
    let _ = decode::<i32>(data);
    let _ = decode::<f64>(data);

    // When a parse succeeds, element reads must stay total too.
    if let Ok(col) = decode::<i64>(data) {
        for i in 0..col.len().min(64) {
            let _ = col.get_safe(i);
        }
        let _ = col.iter().take(64).count();
    }
    if let Ok(col) = decode::<Utf8View>(data) {
        for i in 0..col.len().min(64) {
            if let Some(v) = col.get_safe(i) {
                let _ = v.hash64();
            }
        }
    }
    let _ = decode::<String>(data).map(|col: Column<String>| col.iter_opt().take(16).count());
});
