/*!
Checks of implementation-dependent limits against their required minimums.

```no_run
# use glconform::backend::Facade;
# fn example<F: Facade>(facade: &F) -> bool {
let mut minmax = glconform::minmax::MinMax::new();
minmax.print_header();
minmax.test_min_int(facade, glconform::gl::MAX_VERTEX_ATTRIBS,
                    "GL_MAX_VERTEX_ATTRIBS", 16);
minmax.pass()
# }
```

*/
use tracing::{info, warn};

use crate::backend::Facade;
use crate::gl;

/// Accumulates the result of several limit checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinMax {
    pass: bool,
}

impl Default for MinMax {
    fn default() -> MinMax {
        MinMax { pass: true }
    }
}

impl MinMax {
    /// Starts with every check passing.
    #[inline]
    pub fn new() -> MinMax {
        Default::default()
    }

    /// Logs the header of the value table.
    pub fn print_header(&self) {
        info!("    {:<50} {:>8} {:>8}", "token", "minimum", "value");
    }

    /// Reads an integer limit with `glGetIntegerv` and checks that it is at least `min`.
    pub fn test_min_int<F: ?Sized>(&mut self, facade: &F, pname: gl::types::GLenum,
                                   name: &str, min: i32) -> bool where F: Facade
    {
        let mut value: gl::types::GLint = 0;
        let ctxt = facade.get_context().make_current();
        unsafe { ctxt.gl.GetIntegerv(pname, &mut value) };

        self.check_min(name, min, value)
    }

    /// Records the check of an already read value.
    pub fn check_min(&mut self, name: &str, min: i32, value: i32) -> bool {
        info!("    {:<50} {:>8} {:>8}", name, min, value);

        if value < min {
            warn!("{} value {} is less than the minimum {}", name, value, min);
            self.pass = false;
            return false;
        }

        true
    }

    /// Returns true if every check so far passed.
    #[inline]
    pub fn pass(&self) -> bool {
        self.pass
    }
}

#[cfg(test)]
mod tests {
    use super::MinMax;

    #[test]
    fn failure_is_sticky() {
        let mut minmax = MinMax::new();
        assert!(minmax.pass());

        assert!(minmax.check_min("GL_PERFQUERY_QUERY_NAME_LENGTH_MAX_INTEL", 256, 256));
        assert!(minmax.pass());

        assert!(!minmax.check_min("GL_PERFQUERY_COUNTER_DESC_LENGTH_MAX_INTEL", 1024, 1023));
        assert!(minmax.check_min("GL_PERFQUERY_COUNTER_NAME_LENGTH_MAX_INTEL", 256, 512));
        assert!(!minmax.pass());
    }
}
