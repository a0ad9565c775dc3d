#![no_main]

use libfuzzer_sys::fuzz_target;
use prime_share::{FileShareStore, ShareStore, read_share_file};
use std::fs::File;
use std::io::Write;
use tempfile::tempdir;

// Fuzzing target for FileShareStore::load_share and read_share_file
//
// Writes arbitrary bytes into share files and loads them back. Files may be
// empty, shorter than an index, carry an index that disagrees with their
// name, or hold values wider than any real share. Loading must return a
// Result and never panic.
fuzz_target!(|data: &[u8]| {
    let temp_dir = match tempdir() {
        Ok(dir) => dir,
        Err(_) => return,
    };

    let store = match FileShareStore::new(temp_dir.path()) {
        Ok(store) => store,
        Err(_) => return,
    };

    for &index in &[1u32, 2, 255, 256, u32::MAX] {
        let share_path = store.share_path(index);

        if let Ok(mut file) = File::create(&share_path) {
            let _ = file.write_all(data);
            let _ = file.sync_all();
        }

        let _result = store.load_share(index);
        let _result = read_share_file(&share_path);

        let _ = std::fs::remove_file(&share_path);
    }

    let _result = store.list_shares();
});
