/*!
Textures with immutable storage and texture views.

```no_run
# use glconform::backend::Facade;
# fn example<F: Facade>(facade: &F) {
use glconform::texture::{Texture, TextureTarget};

let array = Texture::new(facade, TextureTarget::Texture2dArray);
array.storage_3d(1, glconform::gl::RGBA8, 1, 1, 12);
let cube = array.view(TextureTarget::CubeMapArray, glconform::gl::RGBA8, 0, 1, 0, 12);
cube.set_nearest_filtering();
# }
```

*/
use std::os::raw::c_void;
use std::rc::Rc;

use tracing::debug;

use crate::backend::Facade;
use crate::context::Context;
use crate::gl;
use crate::GlObject;

/// Binding target of a texture.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TextureTarget {
    /// `GL_TEXTURE_2D`
    Texture2d,
    /// `GL_TEXTURE_2D_ARRAY`
    Texture2dArray,
    /// `GL_TEXTURE_CUBE_MAP`
    CubeMap,
    /// `GL_TEXTURE_CUBE_MAP_ARRAY`
    CubeMapArray,
}

impl TextureTarget {
    /// Returns the GLenum of the target.
    #[inline]
    pub fn to_glenum(self) -> gl::types::GLenum {
        match self {
            TextureTarget::Texture2d => gl::TEXTURE_2D,
            TextureTarget::Texture2dArray => gl::TEXTURE_2D_ARRAY,
            TextureTarget::CubeMap => gl::TEXTURE_CUBE_MAP,
            TextureTarget::CubeMapArray => gl::TEXTURE_CUBE_MAP_ARRAY,
        }
    }
}

/// A texture object.
pub struct Texture {
    context: Rc<Context>,
    id: gl::types::GLuint,
    target: TextureTarget,
}

impl GlObject for Texture {
    type Id = gl::types::GLuint;

    #[inline]
    fn get_id(&self) -> gl::types::GLuint {
        self.id
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        let ctxt = self.context.make_current();
        unsafe { ctxt.gl.DeleteTextures(1, &self.id) };
    }
}

impl Texture {
    /// Generates a texture name and binds it to `target`.
    pub fn new<F: ?Sized>(facade: &F, target: TextureTarget) -> Texture where F: Facade {
        let ctxt = facade.get_context().make_current();

        let mut id = 0;
        unsafe {
            ctxt.gl.GenTextures(1, &mut id);
            ctxt.gl.BindTexture(target.to_glenum(), id);
        }

        Texture { context: facade.get_context().clone(), id, target }
    }

    /// Returns the target the texture was created for.
    #[inline]
    pub fn get_target(&self) -> TextureTarget {
        self.target
    }

    /// Binds the texture to its target on the active texture unit.
    #[inline]
    pub fn bind(&self) {
        let ctxt = self.context.make_current();
        unsafe { ctxt.gl.BindTexture(self.target.to_glenum(), self.id) };
    }

    /// Allocates immutable storage with `glTexStorage3D`.
    pub fn storage_3d(&self, levels: u32, internal_format: gl::types::GLenum, width: u32,
                      height: u32, depth: u32)
    {
        let ctxt = self.context.make_current();
        unsafe {
            ctxt.gl.BindTexture(self.target.to_glenum(), self.id);
            ctxt.gl.TexStorage3D(self.target.to_glenum(), levels as gl::types::GLsizei,
                                 internal_format, width as gl::types::GLsizei,
                                 height as gl::types::GLsizei, depth as gl::types::GLsizei);
        }
    }

    /// Fills one layer of level 0 with a single color, given as `GL_RGBA` / `GL_FLOAT`.
    ///
    /// The layer is 1×1; larger layers only get their first texel written.
    pub fn sub_image_3d_rgba_f32(&self, layer: u32, color: [f32; 4]) {
        let ctxt = self.context.make_current();
        unsafe {
            ctxt.gl.BindTexture(self.target.to_glenum(), self.id);
            ctxt.gl.TexSubImage3D(self.target.to_glenum(), 0, 0, 0,
                                  layer as gl::types::GLint, 1, 1, 1, gl::RGBA, gl::FLOAT,
                                  color.as_ptr() as *const c_void);
        }
    }

    /// Builds a view of this texture with `glTextureView`, sharing its storage.
    ///
    /// The view is not bound afterwards.
    pub fn view(&self, target: TextureTarget, internal_format: gl::types::GLenum,
                min_level: u32, num_levels: u32, min_layer: u32, num_layers: u32) -> Texture
    {
        let ctxt = self.context.make_current();

        let mut id = 0;
        unsafe {
            ctxt.gl.GenTextures(1, &mut id);
            ctxt.gl.TextureView(id, target.to_glenum(), self.id, internal_format, min_level,
                                num_levels, min_layer, num_layers);
        }

        debug!("texture {} is a {:?} view of texture {} (layers {}..{})", id, target, self.id,
               min_layer, min_layer + num_layers);

        Texture { context: self.context.clone(), id, target }
    }

    /// Binds the texture and sets both filters to `GL_NEAREST`.
    pub fn set_nearest_filtering(&self) {
        let ctxt = self.context.make_current();
        unsafe {
            ctxt.gl.BindTexture(self.target.to_glenum(), self.id);
            ctxt.gl.TexParameteri(self.target.to_glenum(), gl::TEXTURE_MAG_FILTER,
                                  gl::NEAREST as gl::types::GLint);
            ctxt.gl.TexParameteri(self.target.to_glenum(), gl::TEXTURE_MIN_FILTER,
                                  gl::NEAREST as gl::types::GLint);
        }
    }
}
