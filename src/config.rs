/*!
Per-test GL configuration and run-time options.

Each test describes the kind of context and surface it needs with a `TestConfig`. The runner
turns that description into one or more context creation attempts: when a core version is
given it is tried first, then the compatibility version.

*/
use smallvec::SmallVec;

/// OpenGL profile of a context.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Profile {
    /// Core profile, no deprecated functionality.
    Core,
    /// Compatibility profile.
    Compatibility,
}

/// Buffers the offscreen window needs besides its color buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Visual {
    /// Attaches a depth buffer.
    pub depth: bool,
    /// Attaches a stencil buffer.
    pub stencil: bool,
}

/// Describes the context and the window a test runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestConfig {
    /// Width of the offscreen window.
    pub window_width: u32,
    /// Height of the offscreen window.
    pub window_height: u32,
    /// Minimum compatibility profile version the test runs with.
    pub compat_version: Option<(u8, u8)>,
    /// Minimum core profile version the test runs with.
    pub core_version: Option<(u8, u8)>,
    /// Extra buffers of the window.
    pub visual: Visual,
}

impl Default for TestConfig {
    fn default() -> TestConfig {
        TestConfig {
            window_width: 160,
            window_height: 160,
            compat_version: None,
            core_version: None,
            visual: Visual::default(),
        }
    }
}

impl TestConfig {
    /// Configuration for a test that needs at least this compatibility version.
    #[inline]
    pub fn compat(major: u8, minor: u8) -> TestConfig {
        TestConfig { compat_version: Some((major, minor)), .. Default::default() }
    }

    /// Configuration for a test that needs at least this core version.
    #[inline]
    pub fn core(major: u8, minor: u8) -> TestConfig {
        TestConfig { core_version: Some((major, minor)), .. Default::default() }
    }

    /// Also accepts a compatibility context of this version.
    #[inline]
    pub fn or_compat(mut self, major: u8, minor: u8) -> TestConfig {
        self.compat_version = Some((major, minor));
        self
    }

    /// Changes the size of the offscreen window.
    #[inline]
    pub fn with_window_size(mut self, width: u32, height: u32) -> TestConfig {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Changes the buffers of the offscreen window.
    #[inline]
    pub fn with_visual(mut self, visual: Visual) -> TestConfig {
        self.visual = visual;
        self
    }

    /// Returns the context creation attempts, in order.
    ///
    /// A test that names no version at all gets a compatibility context of version 1.0,
    /// which drivers promote to the highest version they support.
    pub fn context_attempts(&self) -> SmallVec<[(Profile, (u8, u8)); 2]> {
        let mut attempts = SmallVec::new();

        if let Some(version) = self.core_version {
            attempts.push((Profile::Core, version));
        }

        if let Some(version) = self.compat_version {
            attempts.push((Profile::Compatibility, version));
        }

        if attempts.is_empty() {
            attempts.push((Profile::Compatibility, (1, 0)));
        }

        attempts
    }
}

/// Options given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Running unattended: informational dumps are demoted to debug logs.
    pub automatic: bool,
    /// If not empty, only these subtests run.
    pub subtests: Vec<String>,
    /// Arguments that belong to the test itself.
    pub args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_is_tried_before_compat() {
        let config = TestConfig::core(3, 3).or_compat(3, 2);
        let attempts = config.context_attempts();
        assert_eq!(&attempts[..], &[(Profile::Core, (3, 3)), (Profile::Compatibility, (3, 2))]);
    }

    #[test]
    fn compat_only() {
        let attempts = TestConfig::compat(3, 0).context_attempts();
        assert_eq!(&attempts[..], &[(Profile::Compatibility, (3, 0))]);
    }

    #[test]
    fn no_version_falls_back_to_any_compat_context() {
        let attempts = TestConfig::default().context_attempts();
        assert_eq!(&attempts[..], &[(Profile::Compatibility, (1, 0))]);
    }

    #[test]
    fn default_window_is_160_square() {
        let config = TestConfig::default();
        assert_eq!((config.window_width, config.window_height), (160, 160));

        let config = config.with_window_size(100, 100);
        assert_eq!((config.window_width, config.window_height), (100, 100));
    }
}
