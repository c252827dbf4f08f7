/*!
Requirements a context must meet before a test can run.

A test that can't run on the current implementation is not a failure: the runner reports it
as skipped with a message naming the missing piece.

*/
use std::error::Error;
use std::fmt;

use smallvec::SmallVec;

use crate::context::Context;
use crate::version::{Api, Version};

/// List of things a test needs from the implementation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Requirements {
    gl_version: Option<(u8, u8)>,
    glsl_version: Option<u32>,
    extensions: SmallVec<[&'static str; 4]>,
}

/// The first requirement that the implementation doesn't meet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unmet {
    /// The context version is lower than requested.
    GlVersion {
        /// Version that was requested, for example `(3, 0)`.
        required: (u8, u8),
        /// Version of the context.
        actual: Version,
    },

    /// The GLSL version is lower than requested, or there is no compiler.
    GlslVersion {
        /// Version that was requested, for example `150`.
        required: u32,
        /// Version reported by the context.
        actual: Option<u32>,
    },

    /// An extension is not advertised.
    Extension(&'static str),
}

impl fmt::Display for Unmet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unmet::GlVersion { required, actual } =>
                write!(f, "Test requires GL version {}.{}, but the context is {}",
                       required.0, required.1, actual),
            Unmet::GlslVersion { required, actual: Some(actual) } =>
                write!(f, "Test requires GLSL version {}.{:02}, but only {}.{:02} is supported",
                       required / 100, required % 100, actual / 100, actual % 100),
            Unmet::GlslVersion { required, actual: None } =>
                write!(f, "Test requires GLSL version {}.{:02}, but there is no compiler",
                       required / 100, required % 100),
            Unmet::Extension(name) => write!(f, "Test requires {}", name),
        }
    }
}

impl Error for Unmet {}

impl Requirements {
    /// No requirement.
    #[inline]
    pub fn new() -> Requirements {
        Default::default()
    }

    /// Requires at least this desktop GL version.
    #[inline]
    pub fn gl_version(mut self, major: u8, minor: u8) -> Requirements {
        self.gl_version = Some((major, minor));
        self
    }

    /// Requires at least this GLSL version, spelled like `#version` (`150`).
    #[inline]
    pub fn glsl_version(mut self, version: u32) -> Requirements {
        self.glsl_version = Some(version);
        self
    }

    /// Requires an extension.
    #[inline]
    pub fn extension(mut self, name: &'static str) -> Requirements {
        self.extensions.push(name);
        self
    }

    /// Checks everything against the context.
    pub fn check(&self, context: &Context) -> Result<(), Unmet> {
        let glsl = context.capabilities().glsl_version.map(|v| v.glsl_number());
        self.check_against(context.get_version(), glsl,
                           |name| context.get_extensions().supports(name))
    }

    /// Checks everything against explicit values.
    pub fn check_against<F>(&self, version: &Version, glsl_version: Option<u32>,
                            has_extension: F) -> Result<(), Unmet>
        where F: Fn(&str) -> bool
    {
        if let Some(required) = self.gl_version {
            if !(version >= &Version(Api::Gl, required.0, required.1)) {
                return Err(Unmet::GlVersion { required, actual: *version });
            }
        }

        if let Some(required) = self.glsl_version {
            match glsl_version {
                Some(actual) if actual >= required => (),
                actual => return Err(Unmet::GlslVersion { required, actual }),
            }
        }

        for &name in self.extensions.iter() {
            if !has_extension(name) {
                return Err(Unmet::Extension(name));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn none(_: &str) -> bool {
        false
    }

    #[test]
    fn empty_requirements_always_pass() {
        let req = Requirements::new();
        assert_eq!(req.check_against(&Version(Api::GlEs, 2, 0), None, none), Ok(()));
    }

    #[test]
    fn gl_version() {
        let req = Requirements::new().gl_version(3, 0);
        assert_eq!(req.check_against(&Version(Api::Gl, 4, 6), None, none), Ok(()));
        assert_eq!(req.check_against(&Version(Api::Gl, 2, 1), None, none),
                   Err(Unmet::GlVersion { required: (3, 0), actual: Version(Api::Gl, 2, 1) }));
        assert!(req.check_against(&Version(Api::GlEs, 3, 2), None, none).is_err());
    }

    #[test]
    fn glsl_version() {
        let req = Requirements::new().glsl_version(150);
        assert_eq!(req.check_against(&Version(Api::Gl, 3, 3), Some(330), none), Ok(()));
        assert_eq!(req.check_against(&Version(Api::Gl, 3, 0), Some(130), none),
                   Err(Unmet::GlslVersion { required: 150, actual: Some(130) }));
        assert_eq!(req.check_against(&Version(Api::Gl, 3, 0), None, none),
                   Err(Unmet::GlslVersion { required: 150, actual: None }));
    }

    #[test]
    fn first_missing_extension_is_reported() {
        let req = Requirements::new()
            .extension("GL_ARB_gpu_shader_fp64")
            .extension("GL_ARB_transform_feedback3");

        let result = req.check_against(&Version(Api::Gl, 4, 6), Some(460),
                                       |name| name == "GL_ARB_gpu_shader_fp64");
        assert_eq!(result, Err(Unmet::Extension("GL_ARB_transform_feedback3")));
    }

    #[test]
    fn messages() {
        assert_eq!(Unmet::Extension("GL_ARB_texture_view").to_string(),
                   "Test requires GL_ARB_texture_view");
        assert_eq!(Unmet::GlslVersion { required: 150, actual: Some(130) }.to_string(),
                   "Test requires GLSL version 1.50, but only 1.30 is supported");
    }
}
