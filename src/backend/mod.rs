/*!

The `backend` module allows one to link between the tests and the OpenGL context.

There are three concepts in play:

 - The `Backend` trait describes the glue between the tests and the OpenGL context provider.
 - The `Context` struct is the main brick of the harness. It manages the loaded GL functions,
   the version, the extensions and the capabilities of the driver under test.
 - The `Facade` trait. Calling `get_context` returns the `Rc<Context>` that GL objects keep
   alive until they are destroyed.

The only backend shipped is the headless EGL device backend in the `egl` module.

*/
use std::os::raw::c_void;
use std::ops::Deref;
use std::rc::Rc;

pub use crate::context::Context;

pub mod egl;

/// Trait for types that can be used as a backend for a test context.
///
/// # Safety
///
/// The implementation must report correctly whether its context is current, and the function
/// pointers it returns must belong to that context.
pub unsafe trait Backend {
    /// Returns the address of an OpenGL function.
    ///
    /// Supposes that the context has been made current before this function is called.
    unsafe fn get_proc_address(&self, symbol: &str) -> *const c_void;

    /// Returns the dimensions of the surface the tests draw on.
    fn get_framebuffer_dimensions(&self) -> (u32, u32);

    /// Returns true if the OpenGL context is the current one in the thread.
    fn is_current(&self) -> bool;

    /// Makes the OpenGL context the current context in the current thread.
    unsafe fn make_current(&self);
}

unsafe impl<T> Backend for Rc<T> where T: Backend {
    unsafe fn get_proc_address(&self, symbol: &str) -> *const c_void {
        self.deref().get_proc_address(symbol)
    }

    fn get_framebuffer_dimensions(&self) -> (u32, u32) {
        self.deref().get_framebuffer_dimensions()
    }

    fn is_current(&self) -> bool {
        self.deref().is_current()
    }

    unsafe fn make_current(&self) {
        self.deref().make_current();
    }
}

/// Trait for types that provide a safe access for OpenGL functions.
pub trait Facade {
    /// Returns an opaque type that contains the OpenGL state, extensions, version, etc.
    fn get_context(&self) -> &Rc<Context>;
}

impl Facade for Rc<Context> {
    #[inline]
    fn get_context(&self) -> &Rc<Context> {
        self
    }
}
