// tests/scan_properties.rs

use std::path::PathBuf;

use proptest::prelude::*;

use ifchanged::fs::mock::{mtime, MockFileSystem};
use ifchanged::watch::{scan, Change, Timestamp, WatchState};

// A file is (directory index, mtime seconds); directories nest as d0/d1/...
fn tree_strategy() -> impl Strategy<Value = Vec<(usize, u64)>> {
    proptest::collection::vec((0..4usize, 1..1_000_000u64), 1..20)
}

fn file_path(depth: usize, idx: usize) -> PathBuf {
    let mut p = PathBuf::from("root");
    for d in 0..depth {
        p.push(format!("d{d}"));
    }
    p.push(format!("f{idx}.txt"));
    p
}

proptest! {
    #[test]
    fn scan_is_the_maximum_mtime(files in tree_strategy()) {
        let fs = MockFileSystem::new();
        for (idx, (depth, secs)) in files.iter().enumerate() {
            fs.add_file(file_path(*depth, idx), *secs);
        }

        let expected = files.iter().map(|(_, s)| *s).max().unwrap();
        prop_assert_eq!(
            scan(&fs, &[PathBuf::from("root")]),
            Timestamp::from_system_time(mtime(expected)).unwrap()
        );
    }

    #[test]
    fn triggers_equal_distinct_consecutive_scans(scans in proptest::collection::vec(0..5u128, 1..40)) {
        let mut state = WatchState::new(vec![PathBuf::from("w")], "echo");
        let mut triggers = 0;
        for value in &scans {
            if let Change::Changed { current, .. } = state.observe(Timestamp::from_nanos(*value)) {
                triggers += 1;
                state.commit(current);
            }
        }

        let mut expected = 0;
        let mut prev = 0u128;
        for value in &scans {
            if *value != prev {
                expected += 1;
                prev = *value;
            }
        }
        prop_assert_eq!(triggers, expected);
    }
}
