/*!

Backend implementation creating surfaceless contexts on an EGL device.

No window system is involved: the first EGL device reported by the driver is opened, a context
is created with the requested profile and version and made current without a surface. Tests
draw into the framebuffer object built by `Framebuffer::window`.

*/
use std::error::Error;
use std::ffi::CString;
use std::fmt;
use std::os::raw::c_void;

use glutin::api::egl::context::PossiblyCurrentContext;
use glutin::api::egl::device::Device;
use glutin::api::egl::display::Display;
use glutin::config::{ConfigSurfaceTypes, ConfigTemplateBuilder};
use glutin::context::{ContextApi, ContextAttributesBuilder, GlProfile, Version as GlutinVersion};
use glutin::prelude::*;
use takeable_option::Takeable;
use tracing::{debug, warn};

use crate::backend::Backend;
use crate::config::Profile;

/// Error that can happen while creating a headless backend.
#[derive(Debug)]
pub enum BackendCreationError {
    /// The driver doesn't expose any EGL device.
    NoDevice,

    /// None of the EGL configs can be used without a surface.
    NoConfig,

    /// An error has happened while talking to EGL.
    Glutin(glutin::error::Error),
}

impl fmt::Display for BackendCreationError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendCreationError::NoDevice => fmt.write_str("No EGL device is available"),
            BackendCreationError::NoConfig => fmt.write_str("No EGL config supports \
                                                             surfaceless rendering"),
            BackendCreationError::Glutin(err) => write!(fmt, "EGL error: {}", err),
        }
    }
}

impl Error for BackendCreationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BackendCreationError::Glutin(err) => Some(err),
            _ => None,
        }
    }
}

impl From<glutin::error::Error> for BackendCreationError {
    #[inline]
    fn from(err: glutin::error::Error) -> BackendCreationError {
        BackendCreationError::Glutin(err)
    }
}

/// Builds a `HeadlessBackend`.
#[derive(Debug, Clone)]
pub struct HeadlessBuilder {
    profile: Profile,
    version: (u8, u8),
    debug: bool,
    dimensions: (u32, u32),
}

impl HeadlessBuilder {
    /// Requests a context of the given profile and version.
    pub fn new(profile: Profile, version: (u8, u8)) -> HeadlessBuilder {
        HeadlessBuilder {
            profile,
            version,
            debug: false,
            dimensions: (160, 160),
        }
    }

    /// Requests a debug context.
    #[inline]
    pub fn with_debug(mut self, debug: bool) -> HeadlessBuilder {
        self.debug = debug;
        self
    }

    /// Sets the dimensions reported by `get_framebuffer_dimensions`.
    #[inline]
    pub fn with_dimensions(mut self, width: u32, height: u32) -> HeadlessBuilder {
        self.dimensions = (width, height);
        self
    }

    /// Opens the first EGL device and creates a context that is current on this thread.
    pub fn build(self) -> Result<HeadlessBackend, BackendCreationError> {
        let device = Device::query_devices()?.next().ok_or(BackendCreationError::NoDevice)?;
        debug!("opened the first EGL device");

        let display = unsafe { Display::with_device(&device, None) }?;

        let template = ConfigTemplateBuilder::new()
            .with_surface_type(ConfigSurfaceTypes::empty())
            .build();
        let config = unsafe { display.find_configs(template) }?
            .next()
            .ok_or(BackendCreationError::NoConfig)?;

        let profile = match self.profile {
            Profile::Core => GlProfile::Core,
            Profile::Compatibility => GlProfile::Compatibility,
        };

        let attributes = ContextAttributesBuilder::new()
            .with_debug(self.debug)
            .with_profile(profile)
            .with_context_api(ContextApi::OpenGl(Some(GlutinVersion::new(self.version.0,
                                                                         self.version.1))))
            .build(None);

        let context = unsafe { display.create_context(&config, &attributes) }?;
        let context = context.make_current_surfaceless()?;

        Ok(HeadlessBackend {
            display,
            context: Takeable::new(context),
            dimensions: self.dimensions,
        })
    }
}

/// A surfaceless EGL context.
pub struct HeadlessBackend {
    display: Display,
    context: Takeable<PossiblyCurrentContext>,
    dimensions: (u32, u32),
}

unsafe impl Backend for HeadlessBackend {
    unsafe fn get_proc_address(&self, symbol: &str) -> *const c_void {
        match CString::new(symbol) {
            Ok(symbol) => self.display.get_proc_address(&symbol),
            Err(_) => std::ptr::null(),
        }
    }

    #[inline]
    fn get_framebuffer_dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    #[inline]
    fn is_current(&self) -> bool {
        self.context.is_current()
    }

    unsafe fn make_current(&self) {
        if let Err(err) = self.context.make_current_surfaceless() {
            warn!("failed to make the EGL context current: {}", err);
        }
    }
}

impl Drop for HeadlessBackend {
    fn drop(&mut self) {
        let context = Takeable::take(&mut self.context);
        if let Err(err) = context.make_not_current() {
            warn!("failed to release the EGL context: {}", err);
        }
    }
}
