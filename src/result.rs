//! The outcome of a test or subtest.

use std::fmt;

/// Enum representing the possible results of a test.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum TestResult {
    /// The implementation behaved as expected.
    Pass,
    /// The implementation returned a wrong value or error.
    Fail,
    /// The test could not run, usually because of a missing requirement.
    Skip,
}

impl TestResult {
    /// Returns `Pass` for `true` and `Fail` for `false`.
    #[inline]
    pub fn from_bool(pass: bool) -> TestResult {
        if pass { TestResult::Pass } else { TestResult::Fail }
    }

    /// Merge this result with another one. If either test is skipped
    /// then the value of the other result is returned. Otherwise if
    /// either of the tests failed then the global result is a
    /// failure. Finally if both tests passed then the global result
    /// is a pass.
    pub fn merge(self, other: TestResult) -> TestResult {
        match self {
            TestResult::Pass => {
                if other == TestResult::Skip {
                    self
                } else {
                    other
                }
            },
            TestResult::Fail => TestResult::Fail,
            TestResult::Skip => other,
        }
    }

    /// Return either `"fail"`, `"skip"` or `"pass"` to describe the result.
    pub fn name(self) -> &'static str {
        match self {
            TestResult::Fail => "fail",
            TestResult::Skip => "skip",
            TestResult::Pass => "pass",
        }
    }

    /// Process exit status for this result. Skipping is not an error.
    pub fn exit_code(self) -> u8 {
        match self {
            TestResult::Pass | TestResult::Skip => 0,
            TestResult::Fail => 1,
        }
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge() {
        assert_eq!(TestResult::Fail.merge(TestResult::Fail), TestResult::Fail);
        assert_eq!(TestResult::Fail.merge(TestResult::Skip), TestResult::Fail);
        assert_eq!(TestResult::Fail.merge(TestResult::Pass), TestResult::Fail);
        assert_eq!(TestResult::Skip.merge(TestResult::Fail), TestResult::Fail);
        assert_eq!(TestResult::Skip.merge(TestResult::Skip), TestResult::Skip);
        assert_eq!(TestResult::Skip.merge(TestResult::Pass), TestResult::Pass);
        assert_eq!(TestResult::Pass.merge(TestResult::Fail), TestResult::Fail);
        assert_eq!(TestResult::Pass.merge(TestResult::Skip), TestResult::Pass);
        assert_eq!(TestResult::Pass.merge(TestResult::Pass), TestResult::Pass);
    }

    #[test]
    fn names() {
        for res in [TestResult::Fail, TestResult::Skip, TestResult::Pass] {
            assert_eq!(&res.to_string(), res.name());
        }
        assert_eq!(TestResult::from_bool(true), TestResult::Pass);
        assert_eq!(TestResult::from_bool(false), TestResult::Fail);
    }

    #[test]
    fn exit_codes() {
        assert_eq!(TestResult::Pass.exit_code(), 0);
        assert_eq!(TestResult::Skip.exit_code(), 0);
        assert_eq!(TestResult::Fail.exit_code(), 1);
    }
}
