#[macro_use]
mod support;

use glconform::program::{Program, ProgramBuilder, ProgramCreationError, ShaderType};

const VERTEX: &str = "
    #version 130

    in vec4 piglit_vertex;
    out float outValue;

    void main() {
        outValue = piglit_vertex.x;
        gl_Position = piglit_vertex;
    }
";

const FRAGMENT: &str = "
    #version 130

    void main() {
        gl_FragColor = vec4(0.0, 1.0, 0.0, 1.0);
    }
";

#[test]
fn program_creation() {
    let context = context_or_return!();

    let program = Program::from_source(&context, VERTEX, FRAGMENT).unwrap();
    assert!(program.attrib_location("piglit_vertex").is_some());
    assert!(program.uniform_location("doesnt_exist").is_none());

    context.assert_no_error(None);
}

#[test]
fn program_with_varyings() {
    let context = context_or_return!();

    ProgramBuilder::new(VERTEX).varying("outValue").build(&context).unwrap();

    context.assert_no_error(None);
}

#[test]
fn program_compilation_error() {
    let context = context_or_return!();

    let source = "
        #version 130

        void main() {
            gl_Position = undefined_variable;
        }
    ";

    match Program::from_source(&context, source, FRAGMENT) {
        Err(ProgramCreationError::CompilationError(_, ShaderType::Vertex)) => (),
        Err(err) => panic!("unexpected error: {}", err),
        Ok(_) => panic!("the vertex shader compiled"),
    }

    context.assert_no_error(None);
}

#[test]
fn nul_byte_in_source() {
    let context = context_or_return!();

    match Program::from_source(&context, "void main() {}\0", FRAGMENT) {
        Err(ProgramCreationError::InvalidSource) => (),
        Err(err) => panic!("unexpected error: {}", err),
        Ok(_) => panic!("a source with a nul byte was accepted"),
    }
}
