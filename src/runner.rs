/*!
Runs a test from start to finish.

For every test a fresh context is created following its `TestConfig`, the requirements are
checked, the offscreen window is built and bound, then the test runs and its result is
reported. Anything that prevents the test from starting makes it skip.

*/
use std::error::Error;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::backend::egl::{BackendCreationError, HeadlessBuilder};
use crate::config::{RunOptions, TestConfig};
use crate::context::{Context, ContextCreationError};
use crate::framebuffer::{Framebuffer, FramebufferError};
use crate::harness::Harness;
use crate::report::Reporter;
use crate::result::TestResult;
use crate::suite::ConformanceTest;

/// Error that prevents a test from starting.
#[derive(Debug)]
pub enum RunnerError {
    /// No context could be created.
    Backend(BackendCreationError),

    /// A context was created but the functions or the version couldn't be loaded.
    Context(ContextCreationError),

    /// The offscreen window couldn't be built.
    Window(FramebufferError),
}

impl fmt::Display for RunnerError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunnerError::Backend(err) => write!(fmt, "Couldn't create a context: {}", err),
            RunnerError::Context(err) => write!(fmt, "Couldn't load the context: {}", err),
            RunnerError::Window(err) => write!(fmt, "Couldn't build the window: {}", err),
        }
    }
}

impl Error for RunnerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RunnerError::Backend(err) => Some(err),
            RunnerError::Context(err) => Some(err),
            RunnerError::Window(err) => Some(err),
        }
    }
}

impl From<BackendCreationError> for RunnerError {
    #[inline]
    fn from(err: BackendCreationError) -> RunnerError {
        RunnerError::Backend(err)
    }
}

impl From<ContextCreationError> for RunnerError {
    #[inline]
    fn from(err: ContextCreationError) -> RunnerError {
        RunnerError::Context(err)
    }
}

impl From<FramebufferError> for RunnerError {
    #[inline]
    fn from(err: FramebufferError) -> RunnerError {
        RunnerError::Window(err)
    }
}

/// Creates a context following `config`, trying each profile and version in turn. The error
/// of the last attempt is returned if none succeeds.
pub fn create_context(config: &TestConfig) -> Result<Rc<Context>, RunnerError> {
    let mut last_error = None;

    for (profile, version) in config.context_attempts() {
        let backend = HeadlessBuilder::new(profile, version)
            .with_dimensions(config.window_width, config.window_height)
            .build();

        match backend {
            Ok(backend) => {
                debug!("created a {:?} {}.{} context", profile, version.0, version.1);
                return Ok(unsafe { Context::new(backend) }?);
            },
            Err(err) => {
                debug!("{:?} {}.{} context: {}", profile, version.0, version.1, err);
                last_error = Some(err);
            },
        }
    }

    Err(last_error.unwrap_or(BackendCreationError::NoConfig).into())
}

/// Runs a test, printing results on stdout.
pub fn run(test: &dyn ConformanceTest, options: &RunOptions) -> TestResult {
    run_with_reporter(test, options, Reporter::new(options.subtests.clone()))
}

/// Runs a test with the given reporter.
pub fn run_with_reporter(test: &dyn ConformanceTest, options: &RunOptions,
                         mut reporter: Reporter) -> TestResult
{
    info!("running {}", test.name());

    let config = test.config();
    let context = match create_context(&config) {
        Ok(context) => context,
        Err(err) => {
            warn!("{}: {}", test.name(), err);
            return reporter.finish(TestResult::Skip);
        },
    };

    if let Err(unmet) = test.requirements().check(&context) {
        info!("{}: {}", test.name(), unmet);
        return reporter.finish(TestResult::Skip);
    }

    let window = match Framebuffer::window(&context, &config) {
        Ok(window) => window,
        Err(err) => {
            warn!("{}: {}", test.name(), RunnerError::from(err));
            return reporter.finish(TestResult::Skip);
        },
    };

    let mut harness = Harness::new(context, window, options.clone(), reporter);
    let result = test.run(&mut harness);
    harness.finish(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_have_a_source() {
        let err = RunnerError::from(BackendCreationError::NoDevice);
        assert!(err.source().is_some());
        assert!(err.to_string().contains("No EGL device"));
    }
}
