#[macro_use]
mod support;

use glconform::config::{RunOptions, TestConfig};
use glconform::harness::Harness;
use glconform::report::{self, Reporter};
use glconform::requirements::Requirements;
use glconform::runner;
use glconform::suite::{self, ConformanceTest};
use glconform::TestResult;

use support::SharedOutput;

struct MissingExtension;

impl ConformanceTest for MissingExtension {
    fn name(&self) -> &'static str {
        "missing-extension"
    }

    fn config(&self) -> TestConfig {
        TestConfig::compat(3, 0)
    }

    fn requirements(&self) -> Requirements {
        Requirements::new().extension("GL_GLCONFORM_not_an_extension")
    }

    fn run(&self, _: &mut Harness) -> TestResult {
        panic!("a test with unmet requirements must not run");
    }
}

struct WithSubtests;

impl ConformanceTest for WithSubtests {
    fn name(&self) -> &'static str {
        "with-subtests"
    }

    fn config(&self) -> TestConfig {
        TestConfig::compat(3, 0).with_window_size(32, 16)
    }

    fn requirements(&self) -> Requirements {
        Requirements::new()
    }

    fn run(&self, harness: &mut Harness) -> TestResult {
        assert_eq!((harness.width(), harness.height()), (32, 16));

        assert_eq!(harness.subtest("first", |_| TestResult::Pass), Some(TestResult::Pass));
        harness.subtest("second", |_| false);
        assert_eq!(harness.subtest("nothing to check", |_| None::<bool>), None);
        TestResult::Pass
    }
}

fn run_captured(test: &dyn ConformanceTest, subtests: &[&str]) -> (TestResult, Vec<String>) {
    let output = SharedOutput::default();
    let options = RunOptions {
        subtests: subtests.iter().map(|s| s.to_string()).collect(),
        .. Default::default()
    };
    let reporter = Reporter::with_output(options.subtests.clone(), Box::new(output.clone()));

    let result = runner::run_with_reporter(test, &options, reporter);
    (result, output.lines())
}

#[test]
fn unmet_requirements_skip() {
    let (result, lines) = run_captured(&MissingExtension, &[]);

    assert_eq!(result, TestResult::Skip);
    assert_eq!(lines, vec![report::result_line(TestResult::Skip)]);
}

#[test]
fn failed_subtest_fails_the_test() {
    // "nothing to check" reports no line at all
    let _context = context_or_return!();

    let (result, lines) = run_captured(&WithSubtests, &[]);

    assert_eq!(result, TestResult::Fail);
    assert_eq!(lines, vec![
        report::subtest_line("first", TestResult::Pass),
        report::subtest_line("second", TestResult::Fail),
        report::result_line(TestResult::Fail),
    ]);
}

#[test]
fn filtered_subtests_dont_run() {
    let _context = context_or_return!();

    let (result, lines) = run_captured(&WithSubtests, &["first"]);

    assert_eq!(result, TestResult::Pass);
    assert_eq!(lines, vec![
        report::subtest_line("first", TestResult::Pass),
        report::result_line(TestResult::Pass),
    ]);
}

#[test]
fn registered_tests_never_crash() {
    let _context = context_or_return!();

    for test in suite::all() {
        let (_, lines) = run_captured(test, &[]);
        let last = lines.last().expect("a result line is always printed");
        assert!(last.starts_with("PIGLIT: {\"result\":"), "{}: {}", test.name(), last);
    }
}
