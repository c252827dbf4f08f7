//! A double vertex attribute written by the vertex shader into a `std140, row_major` shader
//! storage block must land at offset 0 with every bit intact.

use tracing::warn;

use crate::backend::Facade;
use crate::buffer::{Buffer, BufferType, BufferUsage, VertexArray};
use crate::config::TestConfig;
use crate::error::GlError;
use crate::fp64;
use crate::gl;
use crate::harness::Harness;
use crate::program::Program;
use crate::requirements::Requirements;
use crate::result::TestResult;

use super::{program_or_log, ConformanceTest};

/// Number of doubles in the storage buffer.
const SSBO_SIZE: usize = 24;

/// `0x4075E00000003202`
const VALUE: f64 = 3.50000000000727684579260312603E2;

const VERTEX_SHADER: &str = "\
#version 150
#extension GL_ARB_shader_storage_buffer_object : require
#extension GL_ARB_gpu_shader_fp64 : require
#extension GL_ARB_vertex_attrib_64bit : require

layout(std140, row_major, binding=2) buffer ssbo {
    double u[6];
};
in vec4 vertex;
in double value;
void main() {
    gl_Position = vec4(vertex);
    u[0] = value;
}
";

const FRAGMENT_SHADER: &str = "\
#version 150
#extension GL_ARB_shader_storage_buffer_object : require
#extension GL_ARB_gpu_shader_fp64 : require
#extension GL_ARB_vertex_attrib_64bit : require
out vec4 color;
void main() {
    color = vec4(0.0, 1.0, 0.0, 1.0);
}
";

const VERTICES: [f32; 8] = [
    6.776277770192E-21, 0.0, 0.0, 0.0,
    0.0, 0.0, 0.0, 0.0,
];

/// `arb_gpu_shader_fp64-layout-std140-fp64-shader`
pub struct LayoutStd140Fp64Shader;

impl ConformanceTest for LayoutStd140Fp64Shader {
    fn name(&self) -> &'static str {
        "arb_gpu_shader_fp64-layout-std140-fp64-shader"
    }

    fn config(&self) -> TestConfig {
        TestConfig::core(3, 2).or_compat(3, 2).with_window_size(100, 100)
    }

    fn requirements(&self) -> Requirements {
        Requirements::new()
            .gl_version(3, 2)
            .glsl_version(150)
            .extension("GL_ARB_shader_storage_buffer_object")
            .extension("GL_ARB_gpu_shader_fp64")
            .extension("GL_ARB_vertex_attrib_64bit")
    }

    fn run(&self, harness: &mut Harness) -> TestResult {
        let blocks = harness.get_context().capabilities().max_vertex_shader_storage_blocks;
        if blocks.unwrap_or(0) <= 0 {
            harness.inform(format_args!("Vertex shaders have no shader storage blocks"));
            return TestResult::Skip;
        }

        let program = match program_or_log(Program::from_source(&*harness, VERTEX_SHADER,
                                                                FRAGMENT_SHADER)) {
            Some(program) => program,
            None => return TestResult::Fail,
        };
        program.use_program();

        let (value_location, vertex_location) = match (program.attrib_location("value"),
                                                       program.attrib_location("vertex")) {
            (Some(value), Some(vertex)) => (value, vertex),
            _ => {
                warn!("The vertex inputs of the program are not active");
                return TestResult::Fail;
            },
        };

        let ssbo = Buffer::new(&*harness, BufferType::ShaderStorageBuffer, &[0.0f64; SSBO_SIZE],
                               BufferUsage::DynamicDraw);
        ssbo.bind_base(2);

        {
            let ctxt = harness.get_context().make_current();
            unsafe {
                ctxt.gl.ClearColor(0.0, 0.0, 0.0, 0.0);
                ctxt.gl.Viewport(0, 0, harness.width() as gl::types::GLsizei,
                                 harness.height() as gl::types::GLsizei);
            }
        }

        if !harness.check_error(GlError::NoError) {
            return TestResult::Fail;
        }

        let vao = VertexArray::new(&*harness);
        let vbo = Buffer::new(&*harness, BufferType::ArrayBuffer, &VERTICES,
                              BufferUsage::StaticDraw);

        {
            let ctxt = harness.get_context().make_current();
            unsafe {
                ctxt.gl.Clear(gl::COLOR_BUFFER_BIT);
                ctxt.gl.VertexAttribL1d(value_location, VALUE);
            }
        }

        vao.attrib_f32(&vbo, vertex_location, 4, 0, 0);

        {
            let ctxt = harness.get_context().make_current();
            unsafe { ctxt.gl.DrawArrays(gl::LINES, 0, 2) };
        }

        let values = match ssbo.map_read::<f64>(SSBO_SIZE) {
            Some(values) => values,
            None => {
                warn!("The shader storage buffer could not be mapped");
                return TestResult::Fail;
            },
        };

        for row in fp64::dump_rows(&values) {
            harness.inform(format_args!("{}", row));
        }

        let mut pass = true;

        if !fp64::bits_equal(values[0], VALUE) {
            warn!("u[0] is {} [{}], expected {} [{}]", fp64::format_g14(values[0]),
                  fp64::double_to_hex(values[0]), fp64::format_g14(VALUE),
                  fp64::double_to_hex(VALUE));
            pass = false;
        }

        for (index, &value) in values.iter().enumerate().skip(1) {
            if !fp64::bits_equal(value, 0.0) {
                warn!("read[{}] was overwritten with {} [{}]", index, fp64::format_g14(value),
                      fp64::double_to_hex(value));
                pass = false;
            }
        }

        TestResult::from_bool(pass)
    }
}
