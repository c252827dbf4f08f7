#[macro_use]
mod support;

use glconform::config::{TestConfig, Visual};
use glconform::framebuffer::{self, Attachments, Framebuffer, SimpleFramebuffer};
use glconform::{gl, probe, GlError};

#[test]
fn window_is_complete() {
    let context = context_or_return!();

    let config = TestConfig::default().with_window_size(64, 32)
                                      .with_visual(Visual { depth: true, stencil: true });
    let window = Framebuffer::window(&context, &config).unwrap();

    assert_eq!(window.get_dimensions(), (64, 32));
    assert_eq!(window.status(), gl::FRAMEBUFFER_COMPLETE);

    context.assert_no_error(None);
}

#[test]
fn simple_framebuffer_starts_with_default_values() {
    let context = context_or_return!();

    let attachments = Attachments::new(true, true, true, true);
    let framebuffer = match SimpleFramebuffer::new(&context, 16, 16, attachments) {
        Some(framebuffer) => framebuffer,
        None => return,
    };

    assert!(framebuffer.probe(&context, framebuffer::DEFAULT_DEPTH));
    context.assert_no_error(None);
}

#[test]
fn depth_clear_only_touches_depth() {
    let context = context_or_return!();

    let attachments = Attachments::new(true, false, true, false);
    let framebuffer = match SimpleFramebuffer::new(&context, 16, 16, attachments) {
        Some(framebuffer) => framebuffer,
        None => return,
    };

    framebuffer.bind();
    {
        let ctxt = context.make_current();
        unsafe {
            ctxt.gl.ClearDepth(0.75);
            ctxt.gl.Clear(gl::DEPTH_BUFFER_BIT);
        }
    }

    assert!(framebuffer.probe(&context, 0.75));
    assert!(!probe::probe_rect_depth(&context, 0, 0, 16, 16, framebuffer::DEFAULT_DEPTH));
    assert!(context.check_error(GlError::NoError));
}
