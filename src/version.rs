//! GL and GLSL versions, and parsing of the strings the implementation reports them with.

use std::cmp::Ordering;
use std::ffi::CStr;
use std::fmt;

use crate::gl;

/// Describes a version.
///
/// For GLSL versions the minor number holds the two digits after the dot, so GLSL `1.50` is
/// `Version(Api::Gl, 1, 50)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Version(pub Api, pub u8, pub u8);

/// Describes the corresponding API.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Api {
    /// Regular OpenGL.
    Gl,
    /// OpenGL embedded system.
    GlEs,
}

impl Version {
    /// Returns the GLSL version number the way `#version` directives spell it, ie. `150`
    /// for GLSL `1.50` or `430` for GLSL `4.30`.
    #[inline]
    pub fn glsl_number(&self) -> u32 {
        self.1 as u32 * 100 + self.2 as u32
    }
}

impl PartialOrd for Version {
    #[inline]
    fn partial_cmp(&self, other: &Version) -> Option<Ordering> {
        if self.0 != other.0 {
            return None;
        }

        match self.1.cmp(&other.1) {
            Ordering::Equal => Some(self.2.cmp(&other.2)),
            a => Some(a)
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Api::Gl => write!(f, "{}.{}", self.1, self.2),
            Api::GlEs => write!(f, "ES {}.{}", self.1, self.2),
        }
    }
}

/// Parses the string returned by `glGetString(GL_VERSION)`.
///
/// Vendor information after the version number is ignored.
pub fn parse_gl_version(version: &str) -> Option<Version> {
    let (version, api) = match version.strip_prefix("OpenGL ES ") {
        Some(rest) => (rest, Api::GlEs),
        None => (version, Api::Gl),
    };

    let version = version.split_whitespace().next()?;
    let mut iter = version.split('.');
    let major = iter.next()?.parse().ok()?;
    let minor = iter.next()?.parse().ok()?;

    Some(Version(api, major, minor))
}

/// Parses the string returned by `glGetString(GL_SHADING_LANGUAGE_VERSION)`.
pub fn parse_glsl_version(version: &str) -> Option<Version> {
    let (version, api) = match version.strip_prefix("OpenGL ES GLSL ES ") {
        Some(rest) => (rest, Api::GlEs),
        None => (version, Api::Gl),
    };

    let version = version.split_whitespace().next()?;
    let mut iter = version.split('.');
    let major = iter.next()?.parse().ok()?;

    // "4.6" is occasionally seen instead of "4.60"
    let minor = match iter.next()? {
        m if m.len() == 1 => m.parse::<u8>().ok()? * 10,
        m => m.get(..2)?.parse().ok()?,
    };

    Some(Version(api, major, minor))
}

/// Returns the version of the backend.
///
/// *Safety*: the OpenGL context corresponding to `gl` must be current in the thread.
pub unsafe fn get_gl_version(gl: &gl::Gl) -> Option<Version> {
    let version = read_string(gl, gl::VERSION)?;
    parse_gl_version(&version)
}

/// Returns the version of GLSL supported by the backend, or `None` if the backend has no
/// compiler or reports a string we can't parse.
///
/// *Safety*: the OpenGL context corresponding to `gl` must be current in the thread.
pub unsafe fn get_glsl_version(gl: &gl::Gl) -> Option<Version> {
    let version = read_string(gl, gl::SHADING_LANGUAGE_VERSION)?;
    parse_glsl_version(&version)
}

unsafe fn read_string(gl: &gl::Gl, name: gl::types::GLenum) -> Option<String> {
    let ptr = gl.GetString(name);
    if ptr.is_null() {
        return None;
    }

    Some(CStr::from_ptr(ptr as *const _).to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desktop_version_strings() {
        assert_eq!(parse_gl_version("4.6 (Compatibility Profile) Mesa 23.1.4"),
                   Some(Version(Api::Gl, 4, 6)));
        assert_eq!(parse_gl_version("3.3.0 NVIDIA 535.54.03"), Some(Version(Api::Gl, 3, 3)));
        assert_eq!(parse_gl_version("2.1"), Some(Version(Api::Gl, 2, 1)));
    }

    #[test]
    fn es_version_strings() {
        assert_eq!(parse_gl_version("OpenGL ES 3.2 Mesa 23.1.4"),
                   Some(Version(Api::GlEs, 3, 2)));
    }

    #[test]
    fn garbage_version_strings() {
        assert_eq!(parse_gl_version(""), None);
        assert_eq!(parse_gl_version("four point six"), None);
        assert_eq!(parse_gl_version("4"), None);
    }

    #[test]
    fn glsl_version_strings() {
        assert_eq!(parse_glsl_version("4.60"), Some(Version(Api::Gl, 4, 60)));
        assert_eq!(parse_glsl_version("1.50 NVIDIA via Cg compiler"),
                   Some(Version(Api::Gl, 1, 50)));
        assert_eq!(parse_glsl_version("4.6"), Some(Version(Api::Gl, 4, 60)));
        assert_eq!(parse_glsl_version("OpenGL ES GLSL ES 3.20"),
                   Some(Version(Api::GlEs, 3, 20)));
        assert_eq!(parse_glsl_version("1.50").map(|v| v.glsl_number()), Some(150));
    }

    #[test]
    fn ordering_is_per_api() {
        assert!(Version(Api::Gl, 3, 3) > Version(Api::Gl, 3, 2));
        assert!(Version(Api::Gl, 4, 0) > Version(Api::Gl, 3, 3));
        assert!(Version(Api::Gl, 3, 0) >= Version(Api::Gl, 3, 0));
        assert_eq!(Version(Api::Gl, 3, 0).partial_cmp(&Version(Api::GlEs, 3, 0)), None);
        assert!(!(Version(Api::GlEs, 3, 2) >= Version(Api::Gl, 3, 0)));
    }
}
