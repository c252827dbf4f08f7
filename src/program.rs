/*!
Shaders and programs.

```no_run
# use glconform::backend::Facade;
# fn example<F: Facade>(facade: &F) -> Result<(), glconform::program::ProgramCreationError> {
let program = glconform::program::Program::from_source(facade,
    "#version 130\n in vec4 piglit_vertex; void main() { gl_Position = piglit_vertex; }",
    "#version 130\n out vec4 color; void main() { color = vec4(0.0, 1.0, 0.0, 1.0); }")?;
program.use_program();
# Ok(())
# }
```

*/
use std::error::Error;
use std::ffi::CString;
use std::fmt;
use std::ptr;
use std::rc::Rc;

use smallvec::SmallVec;
use tracing::debug;

use crate::backend::Facade;
use crate::context::Context;
use crate::gl;
use crate::GlObject;

/// Error that can be triggered when creating a `Program`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgramCreationError {
    /// Error while compiling one of the shaders.
    CompilationError(String, ShaderType),

    /// Error while linking the program.
    LinkingError(String),

    /// The OpenGL implementation refused to create the object.
    ShaderTypeNotSupported,

    /// A source string or a varying name contains a nul byte.
    InvalidSource,
}

impl fmt::Display for ProgramCreationError {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgramCreationError::CompilationError(s, ty) =>
                write!(fmt, "Compilation error in the {:?} shader: {}", ty, s),
            ProgramCreationError::LinkingError(s) =>
                write!(fmt, "Error while linking shaders together: {}", s),
            ProgramCreationError::ShaderTypeNotSupported =>
                fmt.write_str("One of the request shader type is not supported by the backend"),
            ProgramCreationError::InvalidSource =>
                fmt.write_str("A shader source or varying name contains a nul byte"),
        }
    }
}

impl Error for ProgramCreationError {}

/// Type of a shader stage.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShaderType {
    /// Vertex shader.
    Vertex,
    /// Fragment shader.
    Fragment,
}

impl ShaderType {
    #[inline]
    fn to_glenum(self) -> gl::types::GLenum {
        match self {
            ShaderType::Vertex => gl::VERTEX_SHADER,
            ShaderType::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

/// A single, compiled but unlinked, shader.
pub struct Shader {
    context: Rc<Context>,
    id: gl::types::GLuint,
}

impl GlObject for Shader {
    type Id = gl::types::GLuint;

    #[inline]
    fn get_id(&self) -> gl::types::GLuint {
        self.id
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        let ctxt = self.context.make_current();
        unsafe { ctxt.gl.DeleteShader(self.id) };
    }
}

impl Shader {
    /// Compiles a shader. The info log is returned on failure.
    pub fn compile<F: ?Sized>(facade: &F, ty: ShaderType, source: &str)
                              -> Result<Shader, ProgramCreationError> where F: Facade
    {
        let source = CString::new(source).map_err(|_| ProgramCreationError::InvalidSource)?;
        let ctxt = facade.get_context().make_current();

        unsafe {
            let id = ctxt.gl.CreateShader(ty.to_glenum());
            if id == 0 {
                return Err(ProgramCreationError::ShaderTypeNotSupported);
            }

            // owned from here on, so that errors below delete it
            let shader = Shader { context: facade.get_context().clone(), id };

            ctxt.gl.ShaderSource(id, 1, [source.as_ptr()].as_ptr(), ptr::null());
            ctxt.gl.CompileShader(id);

            let mut compilation_success: gl::types::GLint = 0;
            ctxt.gl.GetShaderiv(id, gl::COMPILE_STATUS, &mut compilation_success);

            if compilation_success == gl::TRUE as gl::types::GLint {
                Ok(shader)
            } else {
                let mut error_log_size: gl::types::GLint = 0;
                ctxt.gl.GetShaderiv(id, gl::INFO_LOG_LENGTH, &mut error_log_size);

                let mut error_log = vec![0u8; error_log_size.max(1) as usize];
                let mut written: gl::types::GLsizei = 0;
                ctxt.gl.GetShaderInfoLog(id, error_log.len() as gl::types::GLsizei, &mut written,
                                         error_log.as_mut_ptr() as *mut gl::types::GLchar);
                error_log.truncate(written.max(0) as usize);

                Err(ProgramCreationError::CompilationError(
                    String::from_utf8_lossy(&error_log).into_owned(), ty))
            }
        }
    }
}

/// Collects the shaders and the transform feedback varyings of a program before linking.
pub struct ProgramBuilder<'a> {
    vertex: &'a str,
    fragment: Option<&'a str>,
    varyings: SmallVec<[&'a str; 2]>,
}

impl<'a> ProgramBuilder<'a> {
    /// Starts a program made of a vertex shader.
    #[inline]
    pub fn new(vertex: &'a str) -> ProgramBuilder<'a> {
        ProgramBuilder { vertex, fragment: None, varyings: SmallVec::new() }
    }

    /// Adds a fragment shader.
    #[inline]
    pub fn fragment(mut self, source: &'a str) -> ProgramBuilder<'a> {
        self.fragment = Some(source);
        self
    }

    /// Captures this vertex output with transform feedback. Varyings are interleaved in the
    /// order they are added.
    #[inline]
    pub fn varying(mut self, name: &'a str) -> ProgramBuilder<'a> {
        self.varyings.push(name);
        self
    }

    /// Compiles every shader and links the program.
    pub fn build<F: ?Sized>(self, facade: &F) -> Result<Program, ProgramCreationError>
        where F: Facade
    {
        let mut shaders: SmallVec<[Shader; 2]> = SmallVec::new();
        shaders.push(Shader::compile(facade, ShaderType::Vertex, self.vertex)?);
        if let Some(fragment) = self.fragment {
            shaders.push(Shader::compile(facade, ShaderType::Fragment, fragment)?);
        }

        let varyings = self.varyings.iter()
                                    .map(|v| CString::new(*v))
                                    .collect::<Result<Vec<_>, _>>()
                                    .map_err(|_| ProgramCreationError::InvalidSource)?;

        let ctxt = facade.get_context().make_current();

        unsafe {
            let id = ctxt.gl.CreateProgram();
            if id == 0 {
                return Err(ProgramCreationError::ShaderTypeNotSupported);
            }

            let program = Program { context: facade.get_context().clone(), id };

            for shader in shaders.iter() {
                ctxt.gl.AttachShader(id, shader.get_id());
            }

            if !varyings.is_empty() {
                let pointers = varyings.iter().map(|v| v.as_ptr()).collect::<Vec<_>>();
                ctxt.gl.TransformFeedbackVaryings(id, pointers.len() as gl::types::GLsizei,
                                                  pointers.as_ptr(), gl::INTERLEAVED_ATTRIBS);
            }

            ctxt.gl.LinkProgram(id);

            let mut link_success: gl::types::GLint = 0;
            ctxt.gl.GetProgramiv(id, gl::LINK_STATUS, &mut link_success);

            if link_success != gl::TRUE as gl::types::GLint {
                let mut error_log_size: gl::types::GLint = 0;
                ctxt.gl.GetProgramiv(id, gl::INFO_LOG_LENGTH, &mut error_log_size);

                let mut error_log = vec![0u8; error_log_size.max(1) as usize];
                let mut written: gl::types::GLsizei = 0;
                ctxt.gl.GetProgramInfoLog(id, error_log.len() as gl::types::GLsizei,
                                          &mut written,
                                          error_log.as_mut_ptr() as *mut gl::types::GLchar);
                error_log.truncate(written.max(0) as usize);

                return Err(ProgramCreationError::LinkingError(
                    String::from_utf8_lossy(&error_log).into_owned()));
            }

            // the program keeps the compiled code, the shader objects can go
            for shader in shaders.iter() {
                ctxt.gl.DetachShader(id, shader.get_id());
            }

            debug!("linked program {}", id);
            Ok(program)
        }
    }
}

/// A linked program.
pub struct Program {
    context: Rc<Context>,
    id: gl::types::GLuint,
}

impl GlObject for Program {
    type Id = gl::types::GLuint;

    #[inline]
    fn get_id(&self) -> gl::types::GLuint {
        self.id
    }
}

impl Drop for Program {
    fn drop(&mut self) {
        let ctxt = self.context.make_current();
        unsafe { ctxt.gl.DeleteProgram(self.id) };
    }
}

impl Program {
    /// Builds a program from a vertex and a fragment shader.
    #[inline]
    pub fn from_source<F: ?Sized>(facade: &F, vertex: &str, fragment: &str)
                                  -> Result<Program, ProgramCreationError> where F: Facade
    {
        ProgramBuilder::new(vertex).fragment(fragment).build(facade)
    }

    /// Calls `glUseProgram`.
    #[inline]
    pub fn use_program(&self) {
        let ctxt = self.context.make_current();
        unsafe { ctxt.gl.UseProgram(self.id) };
    }

    /// Returns the location of a vertex attribute, `None` if it is not active.
    pub fn attrib_location(&self, name: &str) -> Option<gl::types::GLuint> {
        let name = CString::new(name).ok()?;
        let ctxt = self.context.make_current();
        let location = unsafe { ctxt.gl.GetAttribLocation(self.id, name.as_ptr()) };

        if location < 0 { None } else { Some(location as gl::types::GLuint) }
    }

    /// Returns the location of a uniform, `None` if it is not active.
    pub fn uniform_location(&self, name: &str) -> Option<gl::types::GLint> {
        let name = CString::new(name).ok()?;
        let ctxt = self.context.make_current();
        let location = unsafe { ctxt.gl.GetUniformLocation(self.id, name.as_ptr()) };

        if location < 0 { None } else { Some(location) }
    }
}
