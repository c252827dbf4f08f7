//! A `double` uniform must read back unchanged both through `glGetUniformdv` and through a
//! vertex output captured with transform feedback.

use tracing::warn;

use crate::backend::Facade;
use crate::buffer::{Buffer, BufferType, BufferUsage, VertexArray};
use crate::config::TestConfig;
use crate::fp64;
use crate::harness::Harness;
use crate::program::ProgramBuilder;
use crate::requirements::Requirements;
use crate::result::TestResult;
use crate::GlObject;

use super::{capture_points, program_or_log, ConformanceTest};

/// `0x4014000000000212`
const UNIFORM_VALUE: f64 = 5.00000000000047073456244106637E0;

const VERTEX_DATA: [f32; 5] = [1.0, 2.0, 3.0, 4.0, 5.0];

const VERTEX_SHADER: &str = "\
#version 150
#extension GL_ARB_gpu_shader_fp64: require
uniform double uniformValue;
in float inValue;
out double outValue;
void main()
{
    outValue = uniformValue;
    gl_Position = vec4(inValue);
}
";

/// `arb_gpu_shader_fp64-using-transform-feedback-uniform`
pub struct TransformFeedbackUniform;

impl ConformanceTest for TransformFeedbackUniform {
    fn name(&self) -> &'static str {
        "arb_gpu_shader_fp64-using-transform-feedback-uniform"
    }

    fn config(&self) -> TestConfig {
        TestConfig::core(3, 3)
    }

    fn requirements(&self) -> Requirements {
        Requirements::new()
            .glsl_version(150)
            .extension("GL_ARB_gpu_shader_fp64")
            .extension("GL_ARB_transform_feedback3")
    }

    fn run(&self, harness: &mut Harness) -> TestResult {
        let program = ProgramBuilder::new(VERTEX_SHADER).varying("outValue").build(&*harness);
        let program = match program_or_log(program) {
            Some(program) => program,
            None => return TestResult::Fail,
        };
        program.use_program();

        let (input_location, uniform_location) = match (program.attrib_location("inValue"),
                                                        program.uniform_location("uniformValue"))
        {
            (Some(input), Some(uniform)) => (input, uniform),
            _ => {
                warn!("inValue or uniformValue is not active");
                return TestResult::Fail;
            },
        };

        let vao = VertexArray::new(&*harness);
        let vbo = Buffer::new(&*harness, BufferType::ArrayBuffer, &VERTEX_DATA,
                              BufferUsage::StaticDraw);
        vao.attrib_f32(&vbo, input_location, 1, 0, 0);

        {
            let ctxt = harness.get_context().make_current();
            unsafe { ctxt.gl.Uniform1d(uniform_location, UNIFORM_VALUE) };
        }

        let tbo = Buffer::empty(&*harness, BufferType::ArrayBuffer,
                                VERTEX_DATA.len() * std::mem::size_of::<f64>(),
                                BufferUsage::StaticRead);
        tbo.bind_base_as(BufferType::TransformFeedbackBuffer, 0);

        capture_points(&*harness, VERTEX_DATA.len());

        let feedback = tbo.read_sub_data::<f64>(VERTEX_DATA.len());

        let mut fetched = 0.0f64;
        {
            let ctxt = harness.get_context().make_current();
            unsafe { ctxt.gl.GetUniformdv(program.get_id(), uniform_location, &mut fetched) };
        }

        harness.inform(format_args!("Original value: {}[{}]", fp64::format_g14(UNIFORM_VALUE),
                                    fp64::double_to_hex(UNIFORM_VALUE)));
        harness.inform(format_args!("Value fetched using GetUniformdv: {}[{}]",
                                    fp64::format_g14(fetched), fp64::double_to_hex(fetched)));

        let mut pass = fp64::bits_equal(UNIFORM_VALUE, fetched);

        for (i, &value) in feedback.iter().enumerate() {
            harness.inform(format_args!("Fetched element {} data {}[{}]", i,
                                        fp64::format_g14(value), fp64::double_to_hex(value)));
            pass = pass && fp64::bits_equal(UNIFORM_VALUE, value);
        }

        if !pass {
            warn!("The uniform did not read back as {}", fp64::double_to_hex(UNIFORM_VALUE));
        }

        TestResult::from_bool(pass)
    }
}
