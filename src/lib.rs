/*!
OpenGL conformance tests.

Each test exercises one narrow piece of GL or GLSL functionality on a headless context and
reports `pass`, `fail` or `skip`, with optional named subtests.

# Running a test

```no_run
use glconform::config::RunOptions;

let test = glconform::suite::find("gl-3.0-clearbuffer-depth").unwrap();
let result = glconform::runner::run(test, &RunOptions::default());
std::process::exit(result.exit_code() as i32);
```

The runner creates a fresh context for every test, following its `TestConfig`. Tests that
the implementation can't run (missing extension, too old GL or GLSL version, no GL device at
all) are skipped instead of failing.

# Writing a test

Tests implement `suite::ConformanceTest`. They receive a `Harness`, which implements `Facade`:
every GL object wrapper of this crate (`Buffer`, `Texture`, `Program`, `Framebuffer`...) is
built from a facade, keeps the context alive and deletes its GL object when dropped.

```no_run
# use glconform::harness::Harness;
# use glconform::result::TestResult;
# fn run(harness: &mut Harness) -> TestResult {
use glconform::probe;

let (width, height) = (harness.width(), harness.height());
let pass = probe::probe_rect_rgba(&*harness, 0, 0, width, height, [0.0, 1.0, 0.0, 1.0]);
TestResult::from_bool(pass)
# }
```

Results are printed on stdout as `PIGLIT: {...}` lines. Everything else goes through
`tracing`.

*/
#![warn(missing_docs)]

pub use crate::backend::Facade;
pub use crate::context::Context;
pub use crate::error::GlError;
pub use crate::harness::Harness;
pub use crate::result::TestResult;
pub use crate::version::{Api, Version};

pub mod backend;
pub mod buffer;
pub mod config;
pub mod context;
pub mod draw;
pub mod error;
pub mod fp64;
pub mod framebuffer;
pub mod harness;
pub mod minmax;
pub mod perf_query;
pub mod probe;
pub mod program;
pub mod report;
pub mod requirements;
pub mod result;
pub mod runner;
pub mod suite;
pub mod texture;
pub mod version;

/// Raw OpenGL bindings.
#[allow(missing_docs, non_camel_case_types, non_snake_case, non_upper_case_globals)]
#[allow(clippy::all)]
pub mod gl {
    include!(concat!(env!("OUT_DIR"), "/gl_bindings.rs"));
}

/// Trait for objects that are OpenGL objects.
pub trait GlObject {
    /// The type of identifier for this object.
    type Id;

    /// Returns the id of the object.
    fn get_id(&self) -> Self::Id;
}
