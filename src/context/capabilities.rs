use crate::context::ExtensionsList;
use crate::gl;
use crate::version::{self, Api, Version};

/// Represents the capabilities of the context.
#[derive(Debug, Clone)]
pub struct Capabilities {
    /// Version of GLSL supported by the compiler.
    ///
    /// `None` means that the backend doesn't have a compiler.
    pub glsl_version: Option<Version>,

    /// Maximum number of vertex attributes.
    pub max_vertex_attribs: gl::types::GLint,

    /// Maximum number of layers of an array texture.
    pub max_array_texture_layers: gl::types::GLint,

    /// Maximum number of shader storage blocks a vertex shader can access. `None` if storage
    /// buffers are not supported.
    pub max_vertex_shader_storage_blocks: Option<gl::types::GLint>,
}

/// Loads the capabilities.
///
/// *Safety*: the OpenGL context corresponding to `gl` must be current in the thread.
pub unsafe fn get_capabilities(gl: &gl::Gl, version: &Version, extensions: &ExtensionsList)
                               -> Capabilities
{
    Capabilities {
        glsl_version: version::get_glsl_version(gl),

        max_vertex_attribs: {
            let mut val = 0;
            gl.GetIntegerv(gl::MAX_VERTEX_ATTRIBS, &mut val);
            val
        },

        max_array_texture_layers: {
            let mut val = 0;
            if version >= &Version(Api::Gl, 3, 0) {
                gl.GetIntegerv(gl::MAX_ARRAY_TEXTURE_LAYERS, &mut val);
            }
            val
        },

        max_vertex_shader_storage_blocks: {
            if version >= &Version(Api::Gl, 4, 3) ||
               extensions.gl_arb_shader_storage_buffer_object
            {
                let mut val = 0;
                gl.GetIntegerv(gl::MAX_VERTEX_SHADER_STORAGE_BLOCKS, &mut val);
                Some(val)
            } else {
                None
            }
        },
    }
}
