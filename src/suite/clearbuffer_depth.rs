//! `glClearBufferfv(GL_DEPTH, ...)` on framebuffers with every combination of color, depth and
//! stencil buffers. Only the depth buffer may change, and clearing a framebuffer without one
//! is not an error.
//!
//! Each framebuffer is cleared twice with different values, so that a depth buffer that
//! already held the first value can't pass by accident.

use tracing::warn;

use crate::backend::Facade;
use crate::config::TestConfig;
use crate::error::GlError;
use crate::framebuffer::{Attachments, SimpleFramebuffer};
use crate::gl;
use crate::harness::Harness;
use crate::requirements::Requirements;
use crate::result::TestResult;

use super::ConformanceTest;

/// `(color, stencil, depth, packed)`
const TEST_VECTORS: [Attachments; 7] = [
    Attachments::new(true, false, false, false),
    Attachments::new(false, false, true, false),
    Attachments::new(true, false, true, false),
    Attachments::new(false, true, true, false),
    Attachments::new(true, true, true, false),
    Attachments::new(false, true, true, true),
    Attachments::new(true, true, true, true),
];

const FIRST: [f32; 4] = [0.5, 1.0, 1.0, 1.0];
const SECOND: [f32; 4] = [0.8, 0.0, 0.0, 0.0];

/// `gl-3.0-clearbuffer-depth`
pub struct ClearBufferDepth;

impl ConformanceTest for ClearBufferDepth {
    fn name(&self) -> &'static str {
        "gl-3.0-clearbuffer-depth"
    }

    fn config(&self) -> TestConfig {
        TestConfig::default()
    }

    fn requirements(&self) -> Requirements {
        Requirements::new().gl_version(3, 0)
    }

    fn run(&self, harness: &mut Harness) -> TestResult {
        let (width, height) = (harness.width(), harness.height());
        let mut pass = true;

        for attachments in TEST_VECTORS.iter().copied() {
            let framebuffer = match SimpleFramebuffer::new(&*harness, width, height,
                                                           attachments) {
                Some(framebuffer) => framebuffer,
                None => {
                    harness.inform(format_args!("Skipping framebuffer {}.", attachments));
                    continue;
                },
            };

            harness.inform(format_args!("Trying framebuffer {}...", attachments));

            for (call, value) in [("First", FIRST), ("Second", SECOND)] {
                {
                    let ctxt = harness.get_context().make_current();
                    unsafe { ctxt.gl.ClearBufferfv(gl::DEPTH, 0, value.as_ptr()) };
                }

                // clearing a buffer that doesn't exist is not an error, like glClear
                let err = harness.get_error();
                if err != GlError::NoError {
                    warn!("{} call to glClearBufferfv erroneously generated a GL error ({})",
                          call, err);
                    pass = false;
                }

                pass = framebuffer.probe(&*harness, value[0]) && pass;
            }

            drop(framebuffer);

            if !harness.check_error(GlError::NoError) {
                return TestResult::Fail;
            }
        }

        TestResult::from_bool(pass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_vectors_have_depth_and_stencil() {
        for vector in TEST_VECTORS.iter().filter(|v| v.packed) {
            assert!(vector.depth && vector.stencil);
        }
    }

    #[test]
    fn clear_values_differ() {
        assert!(FIRST[0] != SECOND[0]);
    }
}
