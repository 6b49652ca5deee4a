//! Integration Test: Gesture Purity
//!
//! **Policy**: The gesture state machine and the animation primitives it is
//! built on are pure functions of their inputs. They run on the rendering
//! side, once per frame, and must never touch the network, the filesystem,
//! or the async runtime.
//!
//! Marshalling a commit to the coordinator is `slot.rs`'s job, not the
//! tracker's.

use architectural_enforcement::{assert_clean, core_src, scan};

const FORBIDDEN: &[&str] = &[
    "tokio",
    "reqwest",
    "std::fs",
    "std::net",
    "std::thread",
    "async fn",
    ".await",
    "crate::backend",
    "crate::coordinator",
    "crate::submitter",
];

#[test]
fn test_gesture_module_is_pure() {
    let violations = scan(&core_src().join("gesture.rs"), FORBIDDEN);
    assert_clean("gesture.rs must not perform I/O or async work", &violations);
}

#[test]
fn test_animation_module_is_pure() {
    let violations = scan(&core_src().join("animation"), FORBIDDEN);
    assert_clean("animation/ must not perform I/O or async work", &violations);
}

#[test]
fn test_scanned_files_exist() {
    assert!(core_src().join("gesture.rs").exists());
    assert!(core_src().join("animation").join("mod.rs").exists());
}
