/*!
The conformance tests.

Every test is a unit struct implementing `ConformanceTest` and registered in `all()`. Names
are the ones result databases already know them by.

*/
use lazy_static::lazy_static;
use tracing::warn;

use crate::backend::Facade;
use crate::config::TestConfig;
use crate::gl;
use crate::harness::Harness;
use crate::program::{Program, ProgramCreationError};
use crate::requirements::Requirements;
use crate::result::TestResult;

pub use self::attrib64_tf::TransformFeedbackAttrib;
pub use self::attrib64_tf_dmat3::TransformFeedbackDmat3;
pub use self::clearbuffer_depth::ClearBufferDepth;
pub use self::fp64_ssbo_std140::LayoutStd140Fp64Shader;
pub use self::fp64_tf_uniform::TransformFeedbackUniform;
pub use self::perf_query_api::PerfQueryApi;
pub use self::perf_query_measure::PerfQueryMeasure;
pub use self::perf_query_minmax::PerfQueryMinMax;
pub use self::texture_view_cube_array::SamplingArrayAsCubeArray;

mod attrib64_tf;
mod attrib64_tf_dmat3;
mod clearbuffer_depth;
mod fp64_ssbo_std140;
mod fp64_tf_uniform;
mod perf_query_api;
mod perf_query_measure;
mod perf_query_minmax;
mod texture_view_cube_array;

/// A single conformance test.
pub trait ConformanceTest: Sync {
    /// Name of the test, as given on the command line.
    fn name(&self) -> &'static str;

    /// Context and window the test runs with.
    fn config(&self) -> TestConfig;

    /// What the context must support. The test is skipped otherwise.
    fn requirements(&self) -> Requirements;

    /// Runs the test. The window framebuffer is bound and the context is current.
    fn run(&self, harness: &mut Harness) -> TestResult;
}

lazy_static! {
    static ref REGISTRY: Vec<Box<dyn ConformanceTest>> = vec![
        Box::new(LayoutStd140Fp64Shader),
        Box::new(TransformFeedbackUniform),
        Box::new(TransformFeedbackAttrib),
        Box::new(TransformFeedbackDmat3),
        Box::new(SamplingArrayAsCubeArray),
        Box::new(ClearBufferDepth),
        Box::new(PerfQueryApi),
        Box::new(PerfQueryMeasure),
        Box::new(PerfQueryMinMax),
    ];
}

/// Every registered test, in a stable order.
pub fn all() -> impl Iterator<Item = &'static dyn ConformanceTest> {
    REGISTRY.iter().map(|test| &**test)
}

/// Looks a test up by name.
pub fn find(name: &str) -> Option<&'static dyn ConformanceTest> {
    all().find(|test| test.name() == name)
}

/// Logs why a program didn't build. A test with a broken program fails.
fn program_or_log(result: Result<Program, ProgramCreationError>) -> Option<Program> {
    match result {
        Ok(program) => Some(program),
        Err(err) => {
            warn!("{}", err);
            None
        },
    }
}

/// Draws `count` points with rasterization disabled, capturing the outputs of the vertex
/// shader into the buffer bound to transform feedback binding 0.
fn capture_points<F: ?Sized>(facade: &F, count: usize) where F: Facade {
    let ctxt = facade.get_context().make_current();
    unsafe {
        ctxt.gl.Enable(gl::RASTERIZER_DISCARD);

        ctxt.gl.BeginTransformFeedback(gl::POINTS);
        ctxt.gl.DrawArrays(gl::POINTS, 0, count as gl::types::GLsizei);
        ctxt.gl.EndTransformFeedback();

        ctxt.gl.Disable(gl::RASTERIZER_DISCARD);
        ctxt.gl.Flush();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn names_are_unique() {
        let names = all().map(|t| t.name()).collect::<HashSet<_>>();
        assert_eq!(names.len(), all().count());
        assert_eq!(all().count(), 9);
    }

    #[test]
    fn lookup() {
        let test = find("gl-3.0-clearbuffer-depth").unwrap();
        assert_eq!(test.name(), "gl-3.0-clearbuffer-depth");
        assert!(find("no-such-test").is_none());
    }

    #[test]
    fn every_test_asks_for_a_context() {
        for test in all() {
            assert!(!test.config().context_attempts().is_empty(), "{}", test.name());
        }
    }

    #[test]
    fn fp64_window_size() {
        let config = find("arb_gpu_shader_fp64-layout-std140-fp64-shader").unwrap().config();
        assert_eq!((config.window_width, config.window_height), (100, 100));

        let config = find("arb_texture_view-sampling-2d-array-as-cubemap-array").unwrap()
                                                                                .config();
        assert_eq!((config.window_width, config.window_height), (160, 160));
    }
}
