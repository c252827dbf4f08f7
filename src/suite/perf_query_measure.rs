//! Measures the first `GL_INTEL_performance_query` query around a draw and checks that the
//! result and the counter layout are consistent.

use tracing::warn;

use crate::config::TestConfig;
use crate::draw;
use crate::error::GlError;
use crate::gl;
use crate::harness::Harness;
use crate::perf_query::{self, PerfQuery};
use crate::requirements::Requirements;
use crate::result::TestResult;

use super::ConformanceTest;

/// Extra room given to the driver in case it writes more than the size it reported.
const SLACK: usize = 32;

/// Fails the current subtest and stops the measurement if the condition is false.
macro_rules! verify {
    ($harness:expr, $subtest:expr, $cond:expr) => {
        if !$cond {
            warn!("{}: {} is false", $subtest, stringify!($cond));
            report($harness, $subtest, TestResult::Fail);
            return;
        }
    };
}

fn report(harness: &mut Harness, subtest: &str, result: TestResult) {
    // the stages depend on each other, so they always run but only selected ones report
    if harness.should_run(subtest) {
        harness.report_subtest(subtest, result);
    }
}

/// Begins and ends a query object around a draw, reads the result back and checks the
/// counter layout against it.
fn basic_measurement(harness: &mut Harness, query: u32) {
    let subtest = "initialization";

    let counters = perf_query::counter_ids(&*harness, query);
    verify!(harness, subtest, !counters.is_empty());
    verify!(harness, subtest, harness.check_error(GlError::NoError));

    let perf = match PerfQuery::create(&*harness, query) {
        Ok(perf) => perf,
        Err(err) => {
            warn!("{}: creating a query object raised {}", subtest, err);
            report(harness, subtest, TestResult::Fail);
            return;
        },
    };

    perf.begin();
    verify!(harness, subtest, harness.check_error(GlError::NoError));

    draw::draw_triangle(&*harness, 0.0, 0.0, 1.0, 1.0, 0.5, 0.5);

    perf.end();
    verify!(harness, subtest, harness.check_error(GlError::NoError));

    report(harness, subtest, TestResult::Pass);

    let subtest = "result retrieval";

    let result_size = perf_query::query_info(&*harness, query).data_size;
    verify!(harness, subtest, harness.check_error(GlError::NoError));

    // waits until the results are available
    let (data, bytes_written) = perf.data(gl::PERFQUERY_WAIT_INTEL,
                                          result_size as usize + SLACK);
    verify!(harness, subtest, harness.check_error(GlError::NoError));
    verify!(harness, subtest, bytes_written == result_size);

    report(harness, subtest, TestResult::Pass);

    let subtest = "data";

    // counters may alias and leave gaps, so only the granularity of the size is known
    verify!(harness, subtest, result_size >= 4);
    verify!(harness, subtest, result_size % 4 == 0);

    for (i, &counter) in counters.iter().enumerate() {
        let info = perf_query::counter_info(&*harness, query, counter);
        verify!(harness, subtest, harness.check_error(GlError::NoError));
        verify!(harness, subtest, info.offset as u64 + info.data_size as u64 <= result_size as u64);

        let value_size = perf_query::value_size(info.data_type);
        verify!(harness, subtest, value_size != 0);
        // a counter may hold several values of its type
        verify!(harness, subtest, info.data_size >= value_size);
        verify!(harness, subtest, info.data_size % value_size == 0);

        if !harness.automatic() {
            let value = info.data_type()
                            .and_then(|ty| ty.format_value(&data[info.offset as usize ..]));
            harness.inform(format_args!("{} [{}]: {}", i, info.name,
                                        value.as_deref().unwrap_or("?")));
        }
    }

    report(harness, subtest, TestResult::Pass);
}

/// `intel_performance_query-measure`
pub struct PerfQueryMeasure;

impl ConformanceTest for PerfQueryMeasure {
    fn name(&self) -> &'static str {
        "intel_performance_query-measure"
    }

    fn config(&self) -> TestConfig {
        TestConfig::compat(3, 0)
    }

    fn requirements(&self) -> Requirements {
        Requirements::new().extension("GL_INTEL_performance_query")
    }

    fn run(&self, harness: &mut Harness) -> TestResult {
        let queries = perf_query::query_ids(&*harness);

        match queries.first() {
            Some(&query) => basic_measurement(harness, query),
            None => harness.inform(format_args!("No performance queries, nothing to measure")),
        }

        harness.merged_result()
    }
}
