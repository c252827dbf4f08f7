/*!
The GL context every object is created from.

`Context` loads the GL entry points through a `Backend`, then reads the version, the extension
list and the implementation limits once. Every GL call goes through `make_current()`, which
returns a `CommandContext` holding the loaded functions in its `gl` field.

Error checking mirrors what tests need: `get_error` pops one error, `check_error` compares it
against the expected one and `drain_errors` empties the queue.

*/
use std::error::Error;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::backend::Backend;
use crate::error::GlError;
use crate::gl;
use crate::version::{self, Version};

pub use self::capabilities::Capabilities;
pub use self::extensions::ExtensionsList;

mod capabilities;
mod extensions;

/// Stores the state and information required for the tests to use an OpenGL context.
pub struct Context {
    gl: gl::Gl,
    version: Version,
    extensions: ExtensionsList,
    capabilities: Capabilities,
    backend: Box<dyn Backend>,
}

/// Gives access to the loaded functions. Returned by `Context::make_current`.
pub struct CommandContext<'a> {
    /// Loaded OpenGL functions.
    pub gl: &'a gl::Gl,
    /// Version of the context.
    pub version: &'a Version,
    /// Extensions advertised by the context.
    pub extensions: &'a ExtensionsList,
    /// Limits and GLSL version of the context.
    pub capabilities: &'a Capabilities,
}

/// Error that can happen while loading an OpenGL context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextCreationError {
    /// `glGetString(GL_VERSION)` returned something that isn't a version.
    UnknownVersion,
}

impl fmt::Display for ContextCreationError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextCreationError::UnknownVersion =>
                fmt.write_str("The context did not report a valid GL_VERSION string"),
        }
    }
}

impl Error for ContextCreationError {}

impl Context {
    /// Builds a new context on top of a backend.
    ///
    /// Loads every function pointer and queries the version, extensions and capabilities.
    ///
    /// # Safety
    ///
    /// The backend must stay the only owner of its OpenGL context.
    pub unsafe fn new<B>(backend: B) -> Result<Rc<Context>, ContextCreationError>
        where B: Backend + 'static
    {
        backend.make_current();

        let gl = gl::Gl::load_with(|symbol| backend.get_proc_address(symbol));

        let version = version::get_gl_version(&gl).ok_or(ContextCreationError::UnknownVersion)?;
        let extensions = extensions::get_extensions(&gl, &version);
        let capabilities = capabilities::get_capabilities(&gl, &version, &extensions);

        debug!("loaded GL {} ({} extensions, GLSL {:?})", version, extensions.len(),
               capabilities.glsl_version.map(|v| v.glsl_number()));

        Ok(Rc::new(Context {
            gl,
            version,
            extensions,
            capabilities,
            backend: Box::new(backend),
        }))
    }

    /// Makes sure that the context is current and returns access to the functions.
    #[inline]
    pub fn make_current(&self) -> CommandContext<'_> {
        if !self.backend.is_current() {
            unsafe { self.backend.make_current() };
        }

        CommandContext {
            gl: &self.gl,
            version: &self.version,
            extensions: &self.extensions,
            capabilities: &self.capabilities,
        }
    }

    /// Returns the OpenGL version of the context.
    #[inline]
    pub fn get_version(&self) -> &Version {
        &self.version
    }

    /// Returns the list of extensions supported by the context.
    #[inline]
    pub fn get_extensions(&self) -> &ExtensionsList {
        &self.extensions
    }

    /// Returns the capabilities of the context.
    #[inline]
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Returns the dimensions reported by the backend.
    #[inline]
    pub fn get_framebuffer_dimensions(&self) -> (u32, u32) {
        self.backend.get_framebuffer_dimensions()
    }

    /// Returns and clears the oldest pending error.
    pub fn get_error(&self) -> GlError {
        let ctxt = self.make_current();
        GlError::from_glenum(unsafe { ctxt.gl.GetError() })
    }

    /// Returns true if the pending error is `expected`.
    ///
    /// A different error is logged with both names. Only one error is consumed, like the
    /// drivers do when `glGetError` is called once.
    pub fn check_error(&self, expected: GlError) -> bool {
        let actual = self.get_error();
        if actual == expected {
            return true;
        }

        warn!("unexpected GL error: {}, expected {}", actual, expected);
        false
    }

    /// Clears every pending error and returns them.
    pub fn drain_errors(&self) -> Vec<GlError> {
        let mut errors = Vec::new();

        // a lost context keeps reporting errors forever
        for _ in 0 .. 64 {
            match self.get_error() {
                GlError::NoError => break,
                err => errors.push(err),
            }
        }

        errors
    }

    /// Asserts that there are no OpenGL errors pending.
    ///
    /// This function should be used in tests.
    pub fn assert_no_error(&self, user_msg: Option<&str>) {
        let errors = self.drain_errors();
        if errors.is_empty() {
            return;
        }

        match user_msg {
            Some(msg) => panic!("{}: GL errors {:?}", msg, errors),
            None => panic!("GL errors {:?}", errors),
        }
    }

    /// Calls `glFlush`.
    #[inline]
    pub fn flush(&self) {
        let ctxt = self.make_current();
        unsafe { ctxt.gl.Flush() };
    }

    /// Calls `glFinish`, waiting until all the previous commands have been executed.
    #[inline]
    pub fn finish(&self) {
        let ctxt = self.make_current();
        unsafe { ctxt.gl.Finish() };
    }
}
