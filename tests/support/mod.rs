/*!
Test supports module.

Every integration test needs a GL device. When none is available the context builders return
`None` and the test returns early.

*/

#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use glconform::config::TestConfig;
use glconform::runner;
use glconform::Context;

/// Builds a compatibility context suitable for most tests.
pub fn build_context() -> Option<Rc<Context>> {
    build_context_with(&TestConfig::compat(3, 0))
}

/// Builds a context following `config`, `None` if there is no usable GL device.
pub fn build_context_with(config: &TestConfig) -> Option<Rc<Context>> {
    match runner::create_context(config) {
        Ok(context) => Some(context),
        Err(err) => {
            eprintln!("no GL context, skipping: {}", err);
            None
        },
    }
}

/// Returns from the test if there is no GL device.
macro_rules! context_or_return {
    () => {
        match support::build_context() {
            Some(context) => context,
            None => return,
        }
    };
}

/// An output shared between a `Reporter` and the test reading what it printed.
#[derive(Clone, Default)]
pub struct SharedOutput(Rc<RefCell<Vec<u8>>>);

impl SharedOutput {
    /// Everything written so far, split into lines.
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.borrow()).lines().map(str::to_owned).collect()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
