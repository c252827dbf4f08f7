/*!
Framebuffer objects.

Tests never render to a real window. Instead the runner builds a `Framebuffer::window` with
the size and visual requested by the test and binds it before the test starts, so that
drawing to framebuffer 0 in the test's mind ends up in an offscreen surface that can be
probed.

*/
use std::error::Error;
use std::fmt;
use std::rc::Rc;

use smallvec::SmallVec;
use tracing::{debug, info};

use crate::backend::Facade;
use crate::config::TestConfig;
use crate::context::Context;
use crate::gl;
use crate::probe;
use crate::GlObject;

/// Clear color of the framebuffers built by `SimpleFramebuffer`.
pub const DEFAULT_COLOR: [f32; 4] = [0.2, 0.4, 0.6, 0.8];

/// Clear depth of the framebuffers built by `SimpleFramebuffer`.
pub const DEFAULT_DEPTH: f32 = 0.25;

/// Clear stencil value of the framebuffers built by `SimpleFramebuffer`.
pub const DEFAULT_STENCIL: u8 = 0x7e;

/// Error returned when a framebuffer can't be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FramebufferError {
    /// `glCheckFramebufferStatus` returned something else than `GL_FRAMEBUFFER_COMPLETE`.
    Incomplete(gl::types::GLenum),
}

impl fmt::Display for FramebufferError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FramebufferError::Incomplete(status) =>
                write!(fmt, "Framebuffer is incomplete (status 0x{:04x})", status),
        }
    }
}

impl Error for FramebufferError {}

/// A renderbuffer.
pub struct Renderbuffer {
    context: Rc<Context>,
    id: gl::types::GLuint,
}

impl GlObject for Renderbuffer {
    type Id = gl::types::GLuint;

    #[inline]
    fn get_id(&self) -> gl::types::GLuint {
        self.id
    }
}

impl Drop for Renderbuffer {
    fn drop(&mut self) {
        let ctxt = self.context.make_current();
        unsafe { ctxt.gl.DeleteRenderbuffers(1, &self.id) };
    }
}

impl Renderbuffer {
    /// Allocates a renderbuffer of the given internal format.
    pub fn new<F: ?Sized>(facade: &F, internal_format: gl::types::GLenum, width: u32,
                          height: u32) -> Renderbuffer where F: Facade
    {
        let ctxt = facade.get_context().make_current();

        let mut id = 0;
        unsafe {
            ctxt.gl.GenRenderbuffers(1, &mut id);
            ctxt.gl.BindRenderbuffer(gl::RENDERBUFFER, id);
            ctxt.gl.RenderbufferStorage(gl::RENDERBUFFER, internal_format,
                                        width as gl::types::GLsizei,
                                        height as gl::types::GLsizei);
        }

        Renderbuffer { context: facade.get_context().clone(), id }
    }
}

/// A framebuffer object together with the renderbuffers attached to it.
pub struct Framebuffer {
    context: Rc<Context>,
    id: gl::types::GLuint,
    attachments: SmallVec<[Renderbuffer; 3]>,
    dimensions: (u32, u32),
}

impl GlObject for Framebuffer {
    type Id = gl::types::GLuint;

    #[inline]
    fn get_id(&self) -> gl::types::GLuint {
        self.id
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        let ctxt = self.context.make_current();
        // deleting a bound framebuffer rebinds 0
        unsafe { ctxt.gl.DeleteFramebuffers(1, &self.id) };
        debug!("deleted framebuffer {}", self.id);
    }
}

impl Framebuffer {
    /// Generates a framebuffer and binds it for drawing and reading.
    pub fn new<F: ?Sized>(facade: &F, width: u32, height: u32) -> Framebuffer where F: Facade {
        let ctxt = facade.get_context().make_current();

        let mut id = 0;
        unsafe {
            ctxt.gl.GenFramebuffers(1, &mut id);
            ctxt.gl.BindFramebuffer(gl::FRAMEBUFFER, id);
        }

        Framebuffer {
            context: facade.get_context().clone(),
            id,
            attachments: SmallVec::new(),
            dimensions: (width, height),
        }
    }

    /// Builds the offscreen surface standing in for the test window and binds it.
    ///
    /// It has an RGBA8 color buffer and, depending on the visual, a packed depth/stencil
    /// buffer. The viewport is set to cover it.
    pub fn window<F: ?Sized>(facade: &F, config: &TestConfig)
                             -> Result<Framebuffer, FramebufferError> where F: Facade
    {
        let (width, height) = (config.window_width, config.window_height);
        let mut framebuffer = Framebuffer::new(facade, width, height);

        framebuffer.attach(gl::COLOR_ATTACHMENT0,
                           Renderbuffer::new(facade, gl::RGBA8, width, height));

        if config.visual.depth || config.visual.stencil {
            framebuffer.attach(gl::DEPTH_STENCIL_ATTACHMENT,
                               Renderbuffer::new(facade, gl::DEPTH24_STENCIL8, width, height));
        }

        framebuffer.check_status()?;

        let ctxt = facade.get_context().make_current();
        unsafe {
            ctxt.gl.DrawBuffer(gl::COLOR_ATTACHMENT0);
            ctxt.gl.ReadBuffer(gl::COLOR_ATTACHMENT0);
            ctxt.gl.Viewport(0, 0, width as gl::types::GLsizei, height as gl::types::GLsizei);
        }

        debug!("window framebuffer {} is {}x{}", framebuffer.id, width, height);
        Ok(framebuffer)
    }

    /// Attaches a renderbuffer, which is then owned by the framebuffer.
    pub fn attach(&mut self, attachment: gl::types::GLenum, renderbuffer: Renderbuffer) {
        let ctxt = self.context.make_current();
        unsafe {
            ctxt.gl.BindFramebuffer(gl::FRAMEBUFFER, self.id);
            ctxt.gl.FramebufferRenderbuffer(gl::FRAMEBUFFER, attachment, gl::RENDERBUFFER,
                                            renderbuffer.get_id());
        }

        self.attachments.push(renderbuffer);
    }

    /// Binds the framebuffer for drawing and reading.
    #[inline]
    pub fn bind(&self) {
        let ctxt = self.context.make_current();
        unsafe { ctxt.gl.BindFramebuffer(gl::FRAMEBUFFER, self.id) };
    }

    /// Returns the result of `glCheckFramebufferStatus` for this framebuffer.
    pub fn status(&self) -> gl::types::GLenum {
        let ctxt = self.context.make_current();
        unsafe {
            ctxt.gl.BindFramebuffer(gl::FRAMEBUFFER, self.id);
            ctxt.gl.CheckFramebufferStatus(gl::FRAMEBUFFER)
        }
    }

    /// Returns an error unless the framebuffer is complete.
    pub fn check_status(&self) -> Result<(), FramebufferError> {
        match self.status() {
            gl::FRAMEBUFFER_COMPLETE => Ok(()),
            status => Err(FramebufferError::Incomplete(status)),
        }
    }

    /// Returns the dimensions given at creation.
    #[inline]
    pub fn get_dimensions(&self) -> (u32, u32) {
        self.dimensions
    }
}

/// Which buffers a `SimpleFramebuffer` has.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Attachments {
    /// RGBA8 color buffer.
    pub color: bool,
    /// Stencil buffer.
    pub stencil: bool,
    /// Depth buffer.
    pub depth: bool,
    /// Depth and stencil share a single `GL_DEPTH24_STENCIL8` buffer.
    pub packed: bool,
}

impl Attachments {
    /// Shorthand for the struct literal, in the `(color, stencil, depth, packed)` order.
    #[inline]
    pub const fn new(color: bool, stencil: bool, depth: bool, packed: bool) -> Attachments {
        Attachments { color, stencil, depth, packed }
    }
}

impl fmt::Display for Attachments {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let with = |b: bool| if b { "with" } else { "without" };
        write!(fmt, "{} color, {} depth and {} stencil ({})", with(self.color),
               with(self.depth), with(self.stencil),
               if self.packed { "packed" } else { "separate" })
    }
}

/// A framebuffer with any combination of color, depth and stencil, cleared to
/// `DEFAULT_COLOR`, `DEFAULT_DEPTH` and `DEFAULT_STENCIL`.
pub struct SimpleFramebuffer {
    framebuffer: Framebuffer,
    attachments: Attachments,
}

impl SimpleFramebuffer {
    /// Builds the framebuffer, binds it and clears every buffer it has.
    ///
    /// Returns `None` if the combination is incomplete on this implementation, in which case
    /// the previous framebuffer binding is lost.
    pub fn new<F: ?Sized>(facade: &F, width: u32, height: u32, attachments: Attachments)
                          -> Option<SimpleFramebuffer> where F: Facade
    {
        let mut framebuffer = Framebuffer::new(facade, width, height);

        if attachments.color {
            framebuffer.attach(gl::COLOR_ATTACHMENT0,
                               Renderbuffer::new(facade, gl::RGBA8, width, height));
        }

        if attachments.packed && attachments.depth && attachments.stencil {
            framebuffer.attach(gl::DEPTH_STENCIL_ATTACHMENT,
                               Renderbuffer::new(facade, gl::DEPTH24_STENCIL8, width, height));
        } else {
            if attachments.depth {
                framebuffer.attach(gl::DEPTH_ATTACHMENT,
                                   Renderbuffer::new(facade, gl::DEPTH_COMPONENT24, width,
                                                     height));
            }
            if attachments.stencil {
                framebuffer.attach(gl::STENCIL_ATTACHMENT,
                                   Renderbuffer::new(facade, gl::STENCIL_INDEX8, width,
                                                     height));
            }
        }

        let ctxt = facade.get_context().make_current();
        unsafe {
            let buffer = if attachments.color { gl::COLOR_ATTACHMENT0 } else { gl::NONE };
            ctxt.gl.DrawBuffer(buffer);
            ctxt.gl.ReadBuffer(buffer);
        }

        if let Err(err) = framebuffer.check_status() {
            info!("{} framebuffer: {}", attachments, err);
            return None;
        }

        unsafe {
            ctxt.gl.Viewport(0, 0, width as gl::types::GLsizei, height as gl::types::GLsizei);
            ctxt.gl.ClearColor(DEFAULT_COLOR[0], DEFAULT_COLOR[1], DEFAULT_COLOR[2],
                               DEFAULT_COLOR[3]);
            ctxt.gl.ClearDepth(DEFAULT_DEPTH as f64);
            ctxt.gl.ClearStencil(DEFAULT_STENCIL as gl::types::GLint);
            ctxt.gl.Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT | gl::STENCIL_BUFFER_BIT);
        }

        Some(SimpleFramebuffer { framebuffer, attachments })
    }

    /// Returns the buffers of the framebuffer.
    #[inline]
    pub fn attachments(&self) -> Attachments {
        self.attachments
    }

    /// Binds the framebuffer.
    #[inline]
    pub fn bind(&self) {
        self.framebuffer.bind();
    }

    /// Probes every buffer of the framebuffer: color and stencil must still hold their
    /// default values and depth must be `depth`.
    pub fn probe<F: ?Sized>(&self, facade: &F, depth: f32) -> bool where F: Facade {
        let (width, height) = self.framebuffer.get_dimensions();
        self.framebuffer.bind();

        let mut pass = true;

        if self.attachments.color {
            pass = probe::probe_rect_rgba(facade, 0, 0, width, height, DEFAULT_COLOR) && pass;
        }

        if self.attachments.stencil {
            pass = probe::probe_rect_stencil(facade, 0, 0, width, height, DEFAULT_STENCIL)
                   && pass;
        }

        if self.attachments.depth {
            pass = probe::probe_rect_depth(facade, 0, 0, width, height, depth) && pass;
        }

        pass
    }
}

impl GlObject for SimpleFramebuffer {
    type Id = gl::types::GLuint;

    #[inline]
    fn get_id(&self) -> gl::types::GLuint {
        self.framebuffer.get_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_descriptions() {
        assert_eq!(Attachments::new(true, false, false, false).to_string(),
                   "with color, without depth and without stencil (separate)");
        assert_eq!(Attachments::new(false, true, true, true).to_string(),
                   "without color, with depth and with stencil (packed)");
    }

    #[test]
    fn defaults_differ_from_depth_clears() {
        // the depth test clears to 0.5 and then 0.8
        assert!((DEFAULT_DEPTH - 0.5).abs() > 0.01);
        assert!((DEFAULT_DEPTH - 0.8).abs() > 0.01);
    }
}
