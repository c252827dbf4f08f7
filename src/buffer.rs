/*!
Buffer objects and vertex array objects.

Buffers are created from slices of plain data types (anything implementing `bytemuck::Pod`)
and can be read back either with `glGetBufferSubData` or by mapping them.

*/
use std::mem;
use std::os::raw::c_void;
use std::ptr;
use std::rc::Rc;
use std::slice;

use bytemuck::Pod;
use tracing::debug;

use crate::backend::Facade;
use crate::context::Context;
use crate::gl;
use crate::GlObject;

/// Binding point of a buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BufferType {
    /// `GL_ARRAY_BUFFER`
    ArrayBuffer,
    /// `GL_SHADER_STORAGE_BUFFER`
    ShaderStorageBuffer,
    /// `GL_TRANSFORM_FEEDBACK_BUFFER`
    TransformFeedbackBuffer,
}

impl BufferType {
    #[inline]
    fn to_glenum(self) -> gl::types::GLenum {
        match self {
            BufferType::ArrayBuffer => gl::ARRAY_BUFFER,
            BufferType::ShaderStorageBuffer => gl::SHADER_STORAGE_BUFFER,
            BufferType::TransformFeedbackBuffer => gl::TRANSFORM_FEEDBACK_BUFFER,
        }
    }
}

/// Usage hint given to `glBufferData`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BufferUsage {
    /// `GL_STATIC_DRAW`
    StaticDraw,
    /// `GL_STATIC_READ`
    StaticRead,
    /// `GL_DYNAMIC_DRAW`
    DynamicDraw,
}

impl BufferUsage {
    #[inline]
    fn to_glenum(self) -> gl::types::GLenum {
        match self {
            BufferUsage::StaticDraw => gl::STATIC_DRAW,
            BufferUsage::StaticRead => gl::STATIC_READ,
            BufferUsage::DynamicDraw => gl::DYNAMIC_DRAW,
        }
    }
}

/// A buffer in the graphics card's memory.
pub struct Buffer {
    context: Rc<Context>,
    id: gl::types::GLuint,
    ty: BufferType,
    size: usize,
}

impl GlObject for Buffer {
    type Id = gl::types::GLuint;

    #[inline]
    fn get_id(&self) -> gl::types::GLuint {
        self.id
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        let ctxt = self.context.make_current();
        unsafe { ctxt.gl.DeleteBuffers(1, &self.id) };
    }
}

impl Buffer {
    /// Builds a buffer containing `data`. The buffer stays bound to its target.
    pub fn new<F: ?Sized, T>(facade: &F, ty: BufferType, data: &[T], usage: BufferUsage)
                             -> Buffer where F: Facade, T: Pod
    {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        Buffer::new_impl(facade, ty, bytes.len(), bytes.as_ptr() as *const c_void, usage)
    }

    /// Builds a buffer of `size` bytes with undefined content.
    pub fn empty<F: ?Sized>(facade: &F, ty: BufferType, size: usize, usage: BufferUsage)
                            -> Buffer where F: Facade
    {
        Buffer::new_impl(facade, ty, size, ptr::null(), usage)
    }

    fn new_impl<F: ?Sized>(facade: &F, ty: BufferType, size: usize, data: *const c_void,
                           usage: BufferUsage) -> Buffer where F: Facade
    {
        let ctxt = facade.get_context().make_current();

        let mut id = 0;
        unsafe {
            ctxt.gl.GenBuffers(1, &mut id);
            ctxt.gl.BindBuffer(ty.to_glenum(), id);
            ctxt.gl.BufferData(ty.to_glenum(), size as gl::types::GLsizeiptr, data,
                               usage.to_glenum());
        }

        debug!("created buffer {} ({} bytes, {:?})", id, size, ty);

        Buffer {
            context: facade.get_context().clone(),
            id,
            ty,
            size,
        }
    }

    /// Size of the buffer in bytes.
    #[inline]
    pub fn get_size(&self) -> usize {
        self.size
    }

    /// Binds the buffer to its target.
    #[inline]
    pub fn bind(&self) {
        let ctxt = self.context.make_current();
        unsafe { ctxt.gl.BindBuffer(self.ty.to_glenum(), self.id) };
    }

    /// Binds the buffer to an indexed binding point of its target.
    #[inline]
    pub fn bind_base(&self, index: u32) {
        let ctxt = self.context.make_current();
        unsafe { ctxt.gl.BindBufferBase(self.ty.to_glenum(), index, self.id) };
    }

    /// Binds the buffer to an indexed binding point of another target, for example a buffer
    /// created as an array buffer used for transform feedback.
    #[inline]
    pub fn bind_base_as(&self, ty: BufferType, index: u32) {
        let ctxt = self.context.make_current();
        unsafe { ctxt.gl.BindBufferBase(ty.to_glenum(), index, self.id) };
    }

    /// Reads the first `count` elements with `glGetBufferSubData`.
    ///
    /// ## Panic
    ///
    /// Panics if the buffer is smaller than `count` elements.
    pub fn read_sub_data<T>(&self, count: usize) -> Vec<T> where T: Pod {
        let bytes = count * mem::size_of::<T>();
        assert!(bytes <= self.size, "reading {} bytes from a buffer of {}", bytes, self.size);

        let mut data = vec![T::zeroed(); count];
        let ctxt = self.context.make_current();
        unsafe {
            ctxt.gl.BindBuffer(self.ty.to_glenum(), self.id);
            ctxt.gl.GetBufferSubData(self.ty.to_glenum(), 0, bytes as gl::types::GLsizeiptr,
                                     data.as_mut_ptr() as *mut c_void);
        }

        data
    }

    /// Maps the buffer read-only and copies out the first `count` elements.
    ///
    /// Returns `None` if the implementation refused to map the buffer.
    ///
    /// ## Panic
    ///
    /// Panics if the buffer is smaller than `count` elements.
    pub fn map_read<T>(&self, count: usize) -> Option<Vec<T>> where T: Pod {
        let bytes = count * mem::size_of::<T>();
        assert!(bytes <= self.size, "mapping {} bytes of a buffer of {}", bytes, self.size);

        let mut data = vec![T::zeroed(); count];
        let ctxt = self.context.make_current();
        unsafe {
            ctxt.gl.BindBuffer(self.ty.to_glenum(), self.id);
            let mapping = ctxt.gl.MapBuffer(self.ty.to_glenum(), gl::READ_ONLY);
            if mapping.is_null() {
                return None;
            }

            let source = slice::from_raw_parts(mapping as *const u8, bytes);
            bytemuck::cast_slice_mut::<T, u8>(&mut data).copy_from_slice(source);

            ctxt.gl.UnmapBuffer(self.ty.to_glenum());
        }

        Some(data)
    }
}

/// A vertex array object.
pub struct VertexArray {
    context: Rc<Context>,
    id: gl::types::GLuint,
}

impl GlObject for VertexArray {
    type Id = gl::types::GLuint;

    #[inline]
    fn get_id(&self) -> gl::types::GLuint {
        self.id
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        let ctxt = self.context.make_current();
        unsafe { ctxt.gl.DeleteVertexArrays(1, &self.id) };
    }
}

impl VertexArray {
    /// Builds a vertex array object and binds it.
    pub fn new<F: ?Sized>(facade: &F) -> VertexArray where F: Facade {
        let ctxt = facade.get_context().make_current();

        let mut id = 0;
        unsafe {
            ctxt.gl.GenVertexArrays(1, &mut id);
            ctxt.gl.BindVertexArray(id);
        }

        VertexArray { context: facade.get_context().clone(), id }
    }

    /// Binds the vertex array object.
    #[inline]
    pub fn bind(&self) {
        let ctxt = self.context.make_current();
        unsafe { ctxt.gl.BindVertexArray(self.id) };
    }

    /// Sources a `float` attribute from `buffer` with `glVertexAttribPointer` and enables it.
    ///
    /// `stride` and `offset` are in bytes.
    pub fn attrib_f32(&self, buffer: &Buffer, location: u32, components: i32, stride: usize,
                      offset: usize)
    {
        let ctxt = self.context.make_current();
        unsafe {
            ctxt.gl.BindVertexArray(self.id);
            ctxt.gl.BindBuffer(gl::ARRAY_BUFFER, buffer.get_id());
            ctxt.gl.VertexAttribPointer(location, components, gl::FLOAT, gl::FALSE,
                                        stride as gl::types::GLsizei,
                                        offset as *const c_void);
            ctxt.gl.EnableVertexAttribArray(location);
        }
    }

    /// Sources a `double` attribute from `buffer` with `glVertexAttribLPointer` and enables
    /// it, so that the values reach the shader without conversion.
    ///
    /// `stride` and `offset` are in bytes.
    pub fn attrib_f64(&self, buffer: &Buffer, location: u32, components: i32, stride: usize,
                      offset: usize)
    {
        let ctxt = self.context.make_current();
        unsafe {
            ctxt.gl.BindVertexArray(self.id);
            ctxt.gl.BindBuffer(gl::ARRAY_BUFFER, buffer.get_id());
            ctxt.gl.VertexAttribLPointer(location, components, gl::DOUBLE,
                                         stride as gl::types::GLsizei,
                                         offset as *const c_void);
            ctxt.gl.EnableVertexAttribArray(location);
        }
    }
}
