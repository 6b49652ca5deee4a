//! Integration Test: Blocking Call Prohibition
//!
//! **Policy**: Production code never blocks a runtime thread.
//! Waiting happens with `.await` on a channel or a remote call, never with a
//! thread sleep, a nested runtime, or a blocking HTTP client.
//!
//! Reading the config file with `std::fs` is allowed: it happens once,
//! before the coordinator starts.

use architectural_enforcement::{assert_clean, core_src, scan};

#[test]
fn test_no_blocking_sleep() {
    let violations = scan(&core_src(), &["std::thread::sleep", "thread::sleep("]);
    assert_clean("production code must not call thread::sleep", &violations);
}

#[test]
fn test_no_blocking_http() {
    let violations = scan(&core_src(), &["reqwest::blocking"]);
    assert_clean("production code must use the async reqwest client", &violations);
}

#[test]
fn test_no_nested_runtime() {
    let violations = scan(&core_src(), &["block_on(", "Runtime::new("]);
    assert_clean("production code must not start or block on a runtime", &violations);
}

#[test]
fn test_no_unwrap_in_production() {
    let violations = scan(&core_src(), &[".unwrap()", ".expect("]);
    assert_clean("production code must propagate errors", &violations);
}
