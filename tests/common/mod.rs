#![allow(dead_code)]

pub use ifchanged_test_utils::fake_runner::FakeRunner;
pub use ifchanged_test_utils::mock_tree::{watch_set, MockTree};
pub use ifchanged_test_utils::{init_tracing, with_timeout, SharedBuffer};
