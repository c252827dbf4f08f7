/*!
What a test gets to work with.

A `Harness` wraps the context created for one test, the offscreen window it draws to, the
reporter collecting its subtest results and the options it was started with. It implements
`Facade`, so every GL object wrapper can be built directly from it.

*/
use std::fmt;
use std::rc::Rc;

use tracing::{debug, info};

use crate::backend::Facade;
use crate::config::RunOptions;
use crate::context::Context;
use crate::error::GlError;
use crate::framebuffer::Framebuffer;
use crate::report::Reporter;
use crate::result::TestResult;

/// Value returned by the body of a subtest.
pub trait SubtestOutcome {
    /// The result to report, `None` to report nothing.
    fn into_result(self) -> Option<TestResult>;
}

impl SubtestOutcome for TestResult {
    #[inline]
    fn into_result(self) -> Option<TestResult> {
        Some(self)
    }
}

impl SubtestOutcome for bool {
    #[inline]
    fn into_result(self) -> Option<TestResult> {
        Some(TestResult::from_bool(self))
    }
}

impl<T> SubtestOutcome for Option<T> where T: SubtestOutcome {
    #[inline]
    fn into_result(self) -> Option<TestResult> {
        self.and_then(SubtestOutcome::into_result)
    }
}

/// State handed to a running test.
pub struct Harness {
    context: Rc<Context>,
    window: Framebuffer,
    reporter: Reporter,
    options: RunOptions,
}

impl Facade for Harness {
    #[inline]
    fn get_context(&self) -> &Rc<Context> {
        &self.context
    }
}

impl Harness {
    /// Wraps a context and its window framebuffer, built with `Framebuffer::window`.
    pub fn new(context: Rc<Context>, window: Framebuffer, options: RunOptions,
               reporter: Reporter) -> Harness
    {
        window.bind();

        Harness {
            context,
            window,
            reporter,
            options,
        }
    }

    /// Width of the window in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.window.get_dimensions().0
    }

    /// Height of the window in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.window.get_dimensions().1
    }

    /// Binds the window framebuffer again, after a test rendered somewhere else.
    #[inline]
    pub fn bind_window(&self) {
        self.window.bind();
    }

    /// The options the test was started with.
    #[inline]
    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    /// Arguments given to the test on the command line.
    #[inline]
    pub fn args(&self) -> &[String] {
        &self.options.args
    }

    /// True when running unattended.
    #[inline]
    pub fn automatic(&self) -> bool {
        self.options.automatic
    }

    /// Logs informational output, which is only for humans and demoted when running
    /// unattended.
    pub fn inform(&self, message: fmt::Arguments<'_>) {
        if self.options.automatic {
            debug!("{}", message);
        } else {
            info!("{}", message);
        }
    }

    /// Returns true if the subtest was selected on the command line, or if no subtest was.
    #[inline]
    pub fn should_run(&self, name: &str) -> bool {
        self.reporter.should_run(name)
    }

    /// Records the result of a subtest.
    #[inline]
    pub fn report_subtest(&mut self, name: &str, result: TestResult) {
        self.reporter.report_subtest(name, result);
    }

    /// Runs a subtest if it is selected and records its result.
    ///
    /// The body may return a `TestResult` or a `bool`. Wrapped in an `Option`, `None` means
    /// the subtest found nothing to check and nothing is reported. Returns the recorded result.
    pub fn subtest<F, R>(&mut self, name: &str, body: F) -> Option<TestResult>
        where F: FnOnce(&mut Harness) -> R, R: SubtestOutcome
    {
        if !self.should_run(name) {
            debug!("subtest {} is filtered out", name);
            return None;
        }

        match body(self).into_result() {
            Some(result) => {
                self.report_subtest(name, result);
                Some(result)
            },
            None => {
                debug!("subtest {} has nothing to report", name);
                None
            },
        }
    }

    /// Subtests reported so far merged together, `Skip` if there are none.
    pub fn merged_result(&self) -> TestResult {
        self.reporter.merged().unwrap_or(TestResult::Skip)
    }

    /// Returns true if the pending GL error is `expected`. Consumes one error.
    #[inline]
    pub fn check_error(&self, expected: GlError) -> bool {
        self.context.check_error(expected)
    }

    /// Returns and clears the pending GL error.
    #[inline]
    pub fn get_error(&self) -> GlError {
        self.context.get_error()
    }

    /// Prints the final result line and returns the final result.
    pub fn finish(mut self, result: TestResult) -> TestResult {
        self.reporter.finish(result)
    }
}

#[cfg(test)]
mod tests {
    use super::SubtestOutcome;
    use crate::result::TestResult;

    #[test]
    fn outcomes() {
        assert_eq!(TestResult::Skip.into_result(), Some(TestResult::Skip));
        assert_eq!(true.into_result(), Some(TestResult::Pass));
        assert_eq!(false.into_result(), Some(TestResult::Fail));
        assert_eq!(Some(false).into_result(), Some(TestResult::Fail));
        assert_eq!(None::<bool>.into_result(), None);
        assert_eq!(None::<TestResult>.into_result(), None);
    }
}
