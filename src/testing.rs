//! TAP (Test Anything Protocol) harness for on-device tests.
//!
//! `cargo test` cannot run on the chip, so device tests are registered with
//! `#[tap_test]` and executed by the `device-tests` binary, which prints TAP
//! version 14 over the serial console. The same binary runs on the host.
//!
//! Only compiled with the `tap-tests` feature, so production images never
//! carry test code.
//!
//! ```ignore
//! #[cfg(feature = "tap-tests")]
//! mod tap_tests {
//!     use super::*;
//!     use esp32_lowpower_macros::tap_test;
//!
//!     #[tap_test]
//!     fn dwell_is_two_seconds() {
//!         assert_eq!(PM_DWELL.as_secs(), 2);
//!     }
//! }
//! ```

use std::any::Any;
use std::io::Write;
use std::panic::{catch_unwind, AssertUnwindSafe, UnwindSafe};

// Re-export inventory for use by the proc-macro
pub use inventory;

/// Result type for fallible test functions.
pub type TestResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Registration hook generated by `#[tap_test]`.
pub type TestRegisterFn = fn(&mut TestRunner);

/// A test collected through `inventory`.
pub struct TapTestEntry {
    pub name: &'static str,
    pub register: TestRegisterFn,
}

impl TapTestEntry {
    pub const fn new(name: &'static str, register: TestRegisterFn) -> Self {
        Self { name, register }
    }
}

inventory::collect!(TapTestEntry);

/// Number of registered tests.
pub fn test_count() -> usize {
    inventory::iter::<TapTestEntry>.into_iter().count()
}

/// Run every registered test. Returns `true` if all passed and every
/// planned test reported exactly once.
pub fn run_all_tests() -> bool {
    let mut runner = TestRunner::new();
    runner.print_header(test_count());

    for entry in inventory::iter::<TapTestEntry> {
        (entry.register)(&mut runner);
    }

    runner.finish()
}

/// Outcome of a single test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed(String),
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Runs tests and writes one TAP line per test.
///
/// Output goes to stdout by default. Runners created inside a test must be
/// [`quiet`](TestRunner::quiet), otherwise their lines land in the real TAP
/// stream.
pub struct TestRunner {
    out: Box<dyn Write>,
    planned: Option<usize>,
    results: Vec<(String, Outcome)>,
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRunner {
    /// Runner writing to stdout (the serial console on the chip).
    pub fn new() -> Self {
        Self::with_output(std::io::stdout())
    }

    /// Runner that only records outcomes.
    pub fn quiet() -> Self {
        Self::with_output(std::io::sink())
    }

    pub fn with_output<W: Write + 'static>(out: W) -> Self {
        Self {
            out: Box::new(out),
            planned: None,
            results: Vec::new(),
        }
    }

    /// Run a fallible test. `Err` and panics are failures.
    pub fn run<F>(&mut self, name: &str, test_fn: F)
    where
        F: FnOnce() -> TestResult + UnwindSafe,
    {
        let outcome = match catch_unwind(AssertUnwindSafe(test_fn)) {
            Ok(Ok(())) => Outcome::Passed,
            Ok(Err(e)) => Outcome::Failed(format!("Error: {}", e)),
            Err(payload) => Outcome::Failed(format!("Panic: {}", panic_message(&*payload))),
        };
        self.record(name, outcome);
    }

    /// Run a test that signals failure by panicking.
    pub fn run_assert<F>(&mut self, name: &str, test_fn: F)
    where
        F: FnOnce() + UnwindSafe,
    {
        self.run(name, || {
            test_fn();
            Ok(())
        });
    }

    /// Run a test that must panic, optionally with a message containing `expected`.
    pub fn run_should_panic<F>(&mut self, name: &str, test_fn: F, expected: Option<&str>)
    where
        F: FnOnce() + UnwindSafe,
    {
        let outcome = match catch_unwind(AssertUnwindSafe(test_fn)) {
            Ok(()) => Outcome::Failed("Expected panic but test completed normally".to_string()),
            Err(payload) => {
                let msg = panic_message(&*payload);
                match expected {
                    Some(expected) if !msg.contains(expected) => Outcome::Failed(format!(
                        "Expected panic containing '{}', got '{}'",
                        expected, msg
                    )),
                    _ => Outcome::Passed,
                }
            }
        };
        self.record(name, outcome);
    }

    fn record(&mut self, name: &str, outcome: Outcome) {
        let number = self.tests_run() + 1;
        match &outcome {
            Outcome::Passed => {
                let _ = writeln!(self.out, "ok {} - {}", number, name);
            }
            Outcome::Failed(reason) => {
                let _ = writeln!(self.out, "not ok {} - {}", number, name);
                self.comment(reason);
            }
        }
        self.results.push((name.to_string(), outcome));
    }

    /// Write the TAP version line and plan.
    pub fn print_header(&mut self, planned_tests: usize) {
        self.planned = Some(planned_tests);
        let _ = writeln!(self.out, "TAP version 14");
        let _ = writeln!(self.out, "1..{}", planned_tests);
    }

    /// Write a diagnostic line.
    pub fn comment(&mut self, msg: &str) {
        let _ = writeln!(self.out, "# {}", msg);
    }

    /// Write the summary. Returns `true` if nothing failed and the plan,
    /// when one was printed, matches the number of results.
    pub fn finish(&mut self) -> bool {
        let run = self.tests_run();
        let (passed, failed) = (self.tests_passed(), self.tests_failed());

        self.comment(&format!("Tests run: {}", run));
        self.comment(&format!("Passed: {}", passed));
        self.comment(&format!("Failed: {}", failed));

        let plan_kept = match self.planned {
            Some(planned) if planned != run => {
                self.comment(&format!("Planned {} tests but ran {}", planned, run));
                false
            }
            _ => true,
        };

        let success = failed == 0 && plan_kept;
        self.comment(if success { "Result: PASS" } else { "Result: FAIL" });
        let _ = self.out.flush();
        success
    }

    /// Recorded outcomes, in run order.
    pub fn outcomes(&self) -> &[(String, Outcome)] {
        &self.results
    }

    pub fn tests_run(&self) -> usize {
        self.results.len()
    }

    pub fn tests_passed(&self) -> usize {
        self.results
            .iter()
            .filter(|(_, outcome)| *outcome == Outcome::Passed)
            .count()
    }

    pub fn tests_failed(&self) -> usize {
        self.tests_run() - self.tests_passed()
    }
}

mod tap_tests {
    use super::*;
    use esp32_lowpower_macros::tap_test;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn lines(&self) -> Vec<String> {
            String::from_utf8_lossy(&self.0.borrow())
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    fn is_result_line(line: &str) -> bool {
        line.starts_with("ok ") || line.starts_with("not ok ")
    }

    #[tap_test]
    fn runner_counts_pass_and_fail() {
        let mut runner = TestRunner::quiet();
        runner.run("pass", || Ok(()));
        runner.run("fail", || Err("boom".into()));

        assert_eq!(runner.tests_run(), 2);
        assert_eq!(runner.tests_passed(), 1);
        assert_eq!(runner.tests_failed(), 1);
        assert_eq!(
            runner.outcomes()[1],
            ("fail".to_string(), Outcome::Failed("Error: boom".to_string()))
        );
    }

    #[tap_test]
    fn runner_turns_panic_into_failure() {
        let mut runner = TestRunner::quiet();
        runner.run_assert("panics", || panic!("intentional"));
        assert_eq!(
            runner.outcomes()[0].1,
            Outcome::Failed("Panic: intentional".to_string())
        );
    }

    #[tap_test]
    fn runner_checks_expected_panic_message() {
        let mut runner = TestRunner::quiet();
        runner.run_should_panic("right", || panic!("wake window"), Some("window"));
        runner.run_should_panic("wrong", || panic!("interval"), Some("window"));
        runner.run_should_panic("none", || {}, None);
        assert_eq!(runner.tests_passed(), 1);
        assert_eq!(runner.tests_failed(), 2);
    }

    #[tap_test]
    fn stream_has_one_numbered_line_per_test() {
        let buf = SharedBuf::default();
        let mut runner = TestRunner::with_output(buf.clone());
        runner.print_header(3);
        runner.run("a", || Ok(()));
        runner.run("b", || Err("nope".into()));
        runner.run_assert("c", || {});
        assert!(!runner.finish());

        let lines = buf.lines();
        assert_eq!(&lines[..2], &["TAP version 14", "1..3"]);
        let results: Vec<&String> = lines.iter().filter(|l| is_result_line(l)).collect();
        assert_eq!(results, vec!["ok 1 - a", "not ok 2 - b", "ok 3 - c"]);

        let failure = lines.iter().position(|l| l == "not ok 2 - b").unwrap();
        assert_eq!(lines[failure + 1], "# Error: nope");
        assert!(!lines.iter().any(|l| l.starts_with("# Planned")));
    }

    #[tap_test]
    fn quiet_runner_writes_nothing_to_outer_stream() {
        let buf = SharedBuf::default();
        let mut outer = TestRunner::with_output(buf.clone());
        outer.print_header(1);
        outer.run_assert("outer", || {
            let mut inner = TestRunner::quiet();
            inner.run("inner_fail", || Err("hidden".into()));
            assert_eq!(inner.tests_failed(), 1);
        });
        assert!(outer.finish());

        let results: Vec<String> = buf.lines().into_iter().filter(|l| is_result_line(l)).collect();
        assert_eq!(results, vec!["ok 1 - outer".to_string()]);
    }

    #[tap_test]
    fn plan_mismatch_fails_the_run() {
        let mut runner = TestRunner::quiet();
        runner.print_header(2);
        runner.run("only", || Ok(()));
        assert!(!runner.finish());
    }

    #[tap_test]
    fn registered_tests_are_all_counted() {
        let names: Vec<&str> = inventory::iter::<TapTestEntry>
            .into_iter()
            .map(|entry| entry.name)
            .collect();
        assert_eq!(names.len(), test_count());
        assert!(names.contains(&"registered_tests_are_all_counted"));
    }
}
