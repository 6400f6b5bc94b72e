//! A tour of lumbermill's capture modes.
//!
//! Simulates a small test suite: two "tests" run with buffered capture (one
//! passes silently, one fails and replays its logs), one runs in immediate
//! mode, and one raises the priority threshold with full decorations.
//!
//! Run with:
//!
//! ```bash
//! cargo run --example noisy_suite
//! ```

use lumbermill::{LifecycleController, Priority, Rules, TestContext, emit, install_bridge};

fn main() {
    install_bridge();

    banner("1. buffered capture, test passes: nothing is printed");
    run_test(Rules::default(), &TestContext::passed());

    banner("2. buffered capture, test fails: the full log stream replays");
    run_test(
        Rules::default(),
        &TestContext::failed_with("expected 200, got 503"),
    );

    banner("3. immediate mode: lines appear as the test runs, pass or fail");
    run_test(
        Rules {
            log_only_when_test_fails: false,
            ..Rules::default()
        },
        &TestContext::passed(),
    );

    banner("4. ERROR threshold with thread + timestamp decorations");
    run_test(
        Rules {
            min_priority: Priority::Error,
            show_thread: true,
            show_timestamp: true,
            log_only_when_test_fails: true,
        },
        &TestContext::failed(),
    );
}

fn banner(title: &str) {
    println!();
    println!("=== {title} ===");
}

/// Drive one simulated test through the lifecycle hooks.
fn run_test(rules: Rules, outcome: &TestContext) {
    let mut controller = LifecycleController::new(rules);
    controller.before_each();
    chatty_workload();
    controller.after_each(outcome);

    match outcome.execution_error() {
        Some(message) => println!("--- test failed: {message}"),
        None if outcome.has_failure() => println!("--- test failed"),
        None => println!("--- test passed"),
    }
}

/// The kind of logging a busy test body produces, from more than one thread.
fn chatty_workload() {
    log::trace!(target: "setup", "seeding fixture data");
    log::debug!(target: "setup", "fixture ready in 12ms");
    log::info!(target: "request", "GET /health");
    log::warn!(target: "request", "retrying after timeout");

    let worker = std::thread::Builder::new()
        .name("bg-poller".to_string())
        .spawn(|| {
            log::info!(target: "poller", "tick");
            let err = std::io::Error::other("connection reset by peer");
            emit(
                Priority::Error,
                Some("poller"),
                "health check failed",
                Some(&err),
            );
        })
        .expect("spawn worker");
    let _ = worker.join();
}
