//! Minimum values of the `GL_INTEL_performance_query` name length limits.

use crate::backend::Facade;
use crate::config::TestConfig;
use crate::error::GlError;
use crate::gl;
use crate::harness::Harness;
use crate::minmax::MinMax;
use crate::requirements::Requirements;
use crate::result::TestResult;

use super::ConformanceTest;

/// `intel_performance_query-minmax`
pub struct PerfQueryMinMax;

impl ConformanceTest for PerfQueryMinMax {
    fn name(&self) -> &'static str {
        "intel_performance_query-minmax"
    }

    fn config(&self) -> TestConfig {
        TestConfig::compat(3, 0)
    }

    fn requirements(&self) -> Requirements {
        Requirements::new().extension("GL_INTEL_performance_query")
    }

    fn run(&self, harness: &mut Harness) -> TestResult {
        let mut minmax = MinMax::new();
        minmax.print_header();

        minmax.test_min_int(&*harness, gl::PERFQUERY_QUERY_NAME_LENGTH_MAX_INTEL,
                            "GL_PERFQUERY_QUERY_NAME_LENGTH_MAX_INTEL", 256);
        minmax.test_min_int(&*harness, gl::PERFQUERY_COUNTER_NAME_LENGTH_MAX_INTEL,
                            "GL_PERFQUERY_COUNTER_NAME_LENGTH_MAX_INTEL", 256);
        minmax.test_min_int(&*harness, gl::PERFQUERY_COUNTER_DESC_LENGTH_MAX_INTEL,
                            "GL_PERFQUERY_COUNTER_DESC_LENGTH_MAX_INTEL", 1024);

        // only needs to be queryable
        let mut extended: gl::types::GLboolean = 0;
        {
            let ctxt = harness.get_context().make_current();
            unsafe {
                ctxt.gl.GetBooleanv(gl::PERFQUERY_GPA_EXTENDED_COUNTERS_INTEL, &mut extended);
            }
        }
        harness.inform(format_args!("GL_PERFQUERY_GPA_EXTENDED_COUNTERS_INTEL: {}",
                                    extended != 0));

        if !harness.check_error(GlError::NoError) {
            return TestResult::Fail;
        }

        TestResult::from_bool(minmax.pass())
    }
}
