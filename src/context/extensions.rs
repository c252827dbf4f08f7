use std::ffi::CStr;

use fnv::FnvHashSet;

use crate::gl;
use crate::version::{Api, Version};

/// Contains data about the list of extensions.
#[derive(Debug, Clone)]
pub struct ExtensionsList {
    /// GL_ARB_compatibility
    pub gl_arb_compatibility: bool,
    /// GL_ARB_gpu_shader_fp64
    pub gl_arb_gpu_shader_fp64: bool,
    /// GL_ARB_shader_storage_buffer_object
    pub gl_arb_shader_storage_buffer_object: bool,
    /// GL_ARB_texture_cube_map_array
    pub gl_arb_texture_cube_map_array: bool,
    /// GL_ARB_texture_storage
    pub gl_arb_texture_storage: bool,
    /// GL_ARB_texture_view
    pub gl_arb_texture_view: bool,
    /// GL_ARB_transform_feedback3
    pub gl_arb_transform_feedback3: bool,
    /// GL_ARB_vertex_attrib_64bit
    pub gl_arb_vertex_attrib_64bit: bool,
    /// GL_INTEL_performance_query
    pub gl_intel_performance_query: bool,
    /// GL_KHR_debug
    pub gl_khr_debug: bool,

    all: FnvHashSet<String>,
}

impl ExtensionsList {
    /// Builds the list from extension names.
    pub fn from_names<I, S>(names: I) -> ExtensionsList
        where I: IntoIterator<Item = S>, S: Into<String>
    {
        let all: FnvHashSet<String> = names.into_iter()
                                           .map(Into::into)
                                           .filter(|name: &String| !name.is_empty())
                                           .collect();

        ExtensionsList {
            gl_arb_compatibility: all.contains("GL_ARB_compatibility"),
            gl_arb_gpu_shader_fp64: all.contains("GL_ARB_gpu_shader_fp64"),
            gl_arb_shader_storage_buffer_object:
                all.contains("GL_ARB_shader_storage_buffer_object"),
            gl_arb_texture_cube_map_array: all.contains("GL_ARB_texture_cube_map_array"),
            gl_arb_texture_storage: all.contains("GL_ARB_texture_storage"),
            gl_arb_texture_view: all.contains("GL_ARB_texture_view"),
            gl_arb_transform_feedback3: all.contains("GL_ARB_transform_feedback3"),
            gl_arb_vertex_attrib_64bit: all.contains("GL_ARB_vertex_attrib_64bit"),
            gl_intel_performance_query: all.contains("GL_INTEL_performance_query"),
            gl_khr_debug: all.contains("GL_KHR_debug"),
            all,
        }
    }

    /// Returns true if the implementation advertises this extension.
    #[inline]
    pub fn supports(&self, name: &str) -> bool {
        self.all.contains(name)
    }

    /// Number of advertised extensions.
    #[inline]
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Returns true if no extension is advertised.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }
}

/// Returns the list of extensions supported by the backend.
///
/// The version must match the one of the backend.
///
/// *Safety*: the OpenGL context corresponding to `gl` must be current in the thread.
pub unsafe fn get_extensions(gl: &gl::Gl, version: &Version) -> ExtensionsList {
    ExtensionsList::from_names(get_extensions_strings(gl, version))
}

/// Returns the list of all extension names supported by the OpenGL implementation.
///
/// *Safety*: the OpenGL context corresponding to `gl` must be current in the thread.
unsafe fn get_extensions_strings(gl: &gl::Gl, version: &Version) -> Vec<String> {
    if version >= &Version(Api::Gl, 3, 0) || version >= &Version(Api::GlEs, 3, 0) {
        let mut num_extensions = 0;
        gl.GetIntegerv(gl::NUM_EXTENSIONS, &mut num_extensions);

        (0 .. num_extensions).filter_map(|num| {
            let ext = gl.GetStringi(gl::EXTENSIONS, num as gl::types::GLuint);
            if ext.is_null() {
                None
            } else {
                Some(CStr::from_ptr(ext as *const _).to_string_lossy().into_owned())
            }
        }).collect()

    } else {
        let list = gl.GetString(gl::EXTENSIONS);
        if list.is_null() {
            return Vec::new();
        }

        let list = CStr::from_ptr(list as *const _).to_string_lossy();
        list.split(' ').map(|e| e.to_owned()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::ExtensionsList;

    #[test]
    fn known_flags_are_set() {
        let list = ExtensionsList::from_names(vec!["GL_ARB_texture_view",
                                                   "GL_INTEL_performance_query"]);
        assert!(list.gl_arb_texture_view);
        assert!(list.gl_intel_performance_query);
        assert!(!list.gl_arb_gpu_shader_fp64);
    }

    #[test]
    fn unknown_extensions_are_kept() {
        let list = ExtensionsList::from_names("GL_EXT_foo GL_MESA_bar ".split(' '));
        assert!(list.supports("GL_EXT_foo"));
        assert!(list.supports("GL_MESA_bar"));
        assert!(!list.supports("GL_EXT_baz"));
        assert_eq!(list.len(), 2);
    }
}
