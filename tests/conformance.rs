#[macro_use]
mod support;

use std::io;

use glconform::config::RunOptions;
use glconform::report::Reporter;
use glconform::runner;
use glconform::suite;
use glconform::TestResult;

/// Runs a registered test and returns its final result. A missing extension skips, an
/// implementation that gets the test wrong fails.
fn run_test(name: &str, args: &[&str]) -> TestResult {
    let test = suite::find(name).expect("the test is registered");
    let options = RunOptions {
        automatic: true,
        args: args.iter().map(|arg| arg.to_string()).collect(),
        .. Default::default()
    };
    let reporter = Reporter::with_output(Vec::new(), Box::new(io::sink()));

    runner::run_with_reporter(test, &options, reporter)
}

#[test]
fn fp64_std140_ssbo_keeps_every_bit() {
    let _context = context_or_return!();
    assert_ne!(run_test("arb_gpu_shader_fp64-layout-std140-fp64-shader", &[]),
               TestResult::Fail);
}

#[test]
fn fp64_uniform_survives_transform_feedback() {
    let _context = context_or_return!();
    assert_ne!(run_test("arb_gpu_shader_fp64-using-transform-feedback-uniform", &[]),
               TestResult::Fail);
}

#[test]
fn double_attributes_survive_transform_feedback() {
    let _context = context_or_return!();
    assert_ne!(run_test("arb_vertex_attrib_64bit-using-transform-feedback", &[]),
               TestResult::Fail);
}

#[test]
fn double_attributes_with_more_samples() {
    let _context = context_or_return!();
    assert_ne!(run_test("arb_vertex_attrib_64bit-using-transform-feedback", &["17"]),
               TestResult::Fail);
}

#[test]
fn oversized_sample_count_falls_back() {
    let _context = context_or_return!();
    assert_ne!(run_test("arb_vertex_attrib_64bit-using-transform-feedback", &["3000000000"]),
               TestResult::Fail);
}

#[test]
fn dmat3_columns_survive_transform_feedback() {
    let _context = context_or_return!();
    assert_ne!(run_test("arb_vertex_attrib_64bit-using-transform-feedback-with-dmat3x3", &[]),
               TestResult::Fail);
}

#[test]
fn cube_map_array_view_samples_the_right_layer() {
    let _context = context_or_return!();
    assert_ne!(run_test("arb_texture_view-sampling-2d-array-as-cubemap-array", &[]),
               TestResult::Fail);
}

#[test]
fn clearbuffer_depth_only_touches_depth() {
    let _context = context_or_return!();
    assert_ne!(run_test("gl-3.0-clearbuffer-depth", &[]), TestResult::Fail);
}

#[test]
fn performance_query_tests_dont_fail() {
    let _context = context_or_return!();

    for name in &["intel_performance_query-api", "intel_performance_query-measure",
                  "intel_performance_query-minmax"] {
        assert_ne!(run_test(name, &[]), TestResult::Fail, "{}", name);
    }
}
