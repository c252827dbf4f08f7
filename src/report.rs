/*!
Result reporting.

Results are printed on stdout as one JSON object per line, prefixed with `PIGLIT: ` so that
existing result parsers can read them:

```text
PIGLIT: {"subtest":{"initialization":"pass"}}
PIGLIT: {"result":"pass"}
```

*/
use std::io::{self, Write};

use serde_json::{Map, Value};
use tracing::info;

use crate::result::TestResult;

/// Formats the line reporting a subtest.
pub fn subtest_line(name: &str, result: TestResult) -> String {
    let mut inner = Map::new();
    inner.insert(name.to_owned(), Value::from(result.name()));

    let mut outer = Map::new();
    outer.insert("subtest".to_owned(), Value::Object(inner));

    format!("PIGLIT: {}", Value::Object(outer))
}

/// Formats the line reporting the result of the whole test.
pub fn result_line(result: TestResult) -> String {
    let mut outer = Map::new();
    outer.insert("result".to_owned(), Value::from(result.name()));

    format!("PIGLIT: {}", Value::Object(outer))
}

/// Collects subtest results of one test and prints them as they come.
pub struct Reporter {
    filter: Vec<String>,
    subtests: Vec<(String, TestResult)>,
    output: Box<dyn Write>,
}

impl Reporter {
    /// Builds a reporter printing on stdout. If `filter` is not empty, only the subtests it
    /// names should run.
    pub fn new(filter: Vec<String>) -> Reporter {
        Reporter::with_output(filter, Box::new(io::stdout()))
    }

    /// Builds a reporter printing somewhere else than stdout.
    pub fn with_output(filter: Vec<String>, output: Box<dyn Write>) -> Reporter {
        Reporter {
            filter,
            subtests: Vec::new(),
            output,
        }
    }

    /// Returns true if the subtest is selected.
    pub fn should_run(&self, name: &str) -> bool {
        self.filter.is_empty() || self.filter.iter().any(|f| f == name)
    }

    /// Records and prints the result of a subtest.
    pub fn report_subtest(&mut self, name: &str, result: TestResult) {
        info!("subtest {}: {}", name, result);
        self.emit(&subtest_line(name, result));
        self.subtests.push((name.to_owned(), result));
    }

    /// Subtest results reported so far, in order.
    #[inline]
    pub fn subtests(&self) -> &[(String, TestResult)] {
        &self.subtests
    }

    /// All the subtest results merged together, `None` if there are none.
    pub fn merged(&self) -> Option<TestResult> {
        self.subtests.iter().map(|&(_, r)| r).reduce(TestResult::merge)
    }

    /// Prints the final result and returns it.
    ///
    /// A failed subtest always fails the test, even if the test itself returned `Pass`.
    pub fn finish(&mut self, result: TestResult) -> TestResult {
        let result = match self.merged() {
            Some(TestResult::Fail) => TestResult::Fail,
            _ => result,
        };

        self.emit(&result_line(result));
        result
    }

    fn emit(&mut self, line: &str) {
        // the result can't be reported anywhere else, a closed stdout is ignored
        let _ = writeln!(self.output, "{}", line);
        let _ = self.output.flush();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io::{self, Write};
    use std::rc::Rc;

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    #[test]
    fn lines_are_json() {
        assert_eq!(result_line(TestResult::Pass), r#"PIGLIT: {"result":"pass"}"#);
        assert_eq!(subtest_line("result retrieval", TestResult::Fail),
                   r#"PIGLIT: {"subtest":{"result retrieval":"fail"}}"#);
    }

    #[test]
    fn subtest_names_are_escaped() {
        assert_eq!(subtest_line("a \"quoted\" name", TestResult::Skip),
                   r#"PIGLIT: {"subtest":{"a \"quoted\" name":"skip"}}"#);
    }

    #[test]
    fn failed_subtest_fails_the_test() {
        let buffer = SharedBuffer::default();
        let mut reporter = Reporter::with_output(Vec::new(), Box::new(buffer.clone()));

        reporter.report_subtest("first", TestResult::Pass);
        reporter.report_subtest("second", TestResult::Fail);
        assert_eq!(reporter.merged(), Some(TestResult::Fail));
        assert_eq!(reporter.finish(TestResult::Pass), TestResult::Fail);

        assert_eq!(buffer.contents(),
                   "PIGLIT: {\"subtest\":{\"first\":\"pass\"}}\n\
                    PIGLIT: {\"subtest\":{\"second\":\"fail\"}}\n\
                    PIGLIT: {\"result\":\"fail\"}\n");
    }

    #[test]
    fn no_subtests() {
        let mut reporter = Reporter::with_output(Vec::new(), Box::new(io::sink()));
        assert_eq!(reporter.merged(), None);
        assert_eq!(reporter.finish(TestResult::Skip), TestResult::Skip);
    }

    #[test]
    fn filter() {
        let reporter = Reporter::with_output(vec!["data".to_owned()], Box::new(io::sink()));
        assert!(reporter.should_run("data"));
        assert!(!reporter.should_run("initialization"));

        let reporter = Reporter::with_output(Vec::new(), Box::new(io::sink()));
        assert!(reporter.should_run("initialization"));
    }
}
