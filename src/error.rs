/*!
GL error codes.

Tests assert the exact error produced by a call, so errors are kept as plain values that can
be compared and printed with the name the GL specification gives them.

*/
use std::fmt;

use crate::gl;

/// A value returned by `glGetError`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GlError {
    /// `GL_NO_ERROR`
    NoError,
    /// `GL_INVALID_ENUM`
    InvalidEnum,
    /// `GL_INVALID_VALUE`
    InvalidValue,
    /// `GL_INVALID_OPERATION`
    InvalidOperation,
    /// `GL_INVALID_FRAMEBUFFER_OPERATION`
    InvalidFramebufferOperation,
    /// `GL_OUT_OF_MEMORY`
    OutOfMemory,
    /// `GL_STACK_UNDERFLOW`
    StackUnderflow,
    /// `GL_STACK_OVERFLOW`
    StackOverflow,
    /// Any other value.
    Unknown(gl::types::GLenum),
}

impl GlError {
    /// Converts the value returned by `glGetError`.
    pub fn from_glenum(value: gl::types::GLenum) -> GlError {
        match value {
            gl::NO_ERROR => GlError::NoError,
            gl::INVALID_ENUM => GlError::InvalidEnum,
            gl::INVALID_VALUE => GlError::InvalidValue,
            gl::INVALID_OPERATION => GlError::InvalidOperation,
            gl::INVALID_FRAMEBUFFER_OPERATION => GlError::InvalidFramebufferOperation,
            gl::OUT_OF_MEMORY => GlError::OutOfMemory,
            gl::STACK_UNDERFLOW => GlError::StackUnderflow,
            gl::STACK_OVERFLOW => GlError::StackOverflow,
            other => GlError::Unknown(other),
        }
    }

    /// Returns the `GLenum` value.
    pub fn to_glenum(self) -> gl::types::GLenum {
        match self {
            GlError::NoError => gl::NO_ERROR,
            GlError::InvalidEnum => gl::INVALID_ENUM,
            GlError::InvalidValue => gl::INVALID_VALUE,
            GlError::InvalidOperation => gl::INVALID_OPERATION,
            GlError::InvalidFramebufferOperation => gl::INVALID_FRAMEBUFFER_OPERATION,
            GlError::OutOfMemory => gl::OUT_OF_MEMORY,
            GlError::StackUnderflow => gl::STACK_UNDERFLOW,
            GlError::StackOverflow => gl::STACK_OVERFLOW,
            GlError::Unknown(value) => value,
        }
    }

    /// Returns the name of the enum, for example `"GL_INVALID_VALUE"`.
    pub fn name(self) -> &'static str {
        match self {
            GlError::NoError => "GL_NO_ERROR",
            GlError::InvalidEnum => "GL_INVALID_ENUM",
            GlError::InvalidValue => "GL_INVALID_VALUE",
            GlError::InvalidOperation => "GL_INVALID_OPERATION",
            GlError::InvalidFramebufferOperation => "GL_INVALID_FRAMEBUFFER_OPERATION",
            GlError::OutOfMemory => "GL_OUT_OF_MEMORY",
            GlError::StackUnderflow => "GL_STACK_UNDERFLOW",
            GlError::StackOverflow => "GL_STACK_OVERFLOW",
            GlError::Unknown(_) => "(unrecognized error)",
        }
    }
}

impl fmt::Display for GlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:04x})", self.name(), self.to_glenum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values() {
        assert_eq!(GlError::from_glenum(0), GlError::NoError);
        assert_eq!(GlError::from_glenum(0x0501), GlError::InvalidValue);
        assert_eq!(GlError::from_glenum(0x0502), GlError::InvalidOperation);
        assert_eq!(GlError::InvalidOperation.to_glenum(), 0x0502);
    }

    #[test]
    fn unknown_values_survive() {
        let err = GlError::from_glenum(0xdead);
        assert_eq!(err, GlError::Unknown(0xdead));
        assert_eq!(err.to_glenum(), 0xdead);
    }

    #[test]
    fn display_shows_name_and_value() {
        assert_eq!(GlError::InvalidValue.to_string(), "GL_INVALID_VALUE (0x0501)");
        assert_eq!(GlError::NoError.to_string(), "GL_NO_ERROR (0x0000)");
    }
}
