//! `double` vertex attributes sourced with `glVertexAttribLPointer` must reach the vertex
//! shader without losing precision. They are copied to an output and captured with transform
//! feedback.

use std::mem;

use tracing::warn;

use crate::buffer::{Buffer, BufferType, BufferUsage, VertexArray};
use crate::config::TestConfig;
use crate::fp64;
use crate::harness::Harness;
use crate::program::ProgramBuilder;
use crate::requirements::Requirements;
use crate::result::TestResult;

use super::{capture_points, program_or_log, ConformanceTest};

/// Number of samples when the command line doesn't say.
pub const DEFAULT_NUM_SAMPLES: usize = 5;

const VERTEX_SHADER: &str = "\
#version 150
#extension GL_ARB_vertex_attrib_64bit: require
#extension GL_ARB_gpu_shader_fp64: require
in double inValue;
out double outValue;
void main()
{
    outValue = inValue;
}
";

/// Reads the optional `num_samples` argument. Anything that isn't a positive `GLsizei` falls
/// back to the default with a warning.
pub fn parse_num_samples(args: &[String]) -> usize {
    let arg = match args.first() {
        Some(arg) => arg,
        None => return DEFAULT_NUM_SAMPLES,
    };

    match arg.trim().parse::<i32>() {
        Ok(num) if num > 0 => num as usize,
        _ => {
            warn!("Wrong value for samples: {}", arg);
            DEFAULT_NUM_SAMPLES
        },
    }
}

/// `arb_vertex_attrib_64bit-using-transform-feedback [num_samples]`
pub struct TransformFeedbackAttrib;

impl ConformanceTest for TransformFeedbackAttrib {
    fn name(&self) -> &'static str {
        "arb_vertex_attrib_64bit-using-transform-feedback"
    }

    fn config(&self) -> TestConfig {
        TestConfig::core(3, 3)
    }

    fn requirements(&self) -> Requirements {
        Requirements::new()
            .glsl_version(150)
            .extension("GL_ARB_transform_feedback3")
            .extension("GL_ARB_vertex_attrib_64bit")
            .extension("GL_ARB_gpu_shader_fp64")
    }

    fn run(&self, harness: &mut Harness) -> TestResult {
        harness.inform(format_args!("{} <num_samples>", self.name()));
        harness.inform(format_args!("\t<num_samples> is optional"));

        let num_samples = parse_num_samples(harness.args());
        harness.inform(format_args!("Using {} samples", num_samples));

        let program = ProgramBuilder::new(VERTEX_SHADER).varying("outValue").build(&*harness);
        let program = match program_or_log(program) {
            Some(program) => program,
            None => return TestResult::Fail,
        };
        program.use_program();

        let input_location = match program.attrib_location("inValue") {
            Some(location) => location,
            None => {
                warn!("inValue is not active");
                return TestResult::Fail;
            },
        };

        let data = fp64::lsb_samples(num_samples);

        let vao = VertexArray::new(&*harness);
        let vbo = Buffer::new(&*harness, BufferType::ArrayBuffer, &data, BufferUsage::StaticDraw);
        vao.attrib_f64(&vbo, input_location, 1, 0, 0);

        let tbo = Buffer::empty(&*harness, BufferType::ArrayBuffer,
                                num_samples * mem::size_of::<f64>(), BufferUsage::StaticRead);
        tbo.bind_base_as(BufferType::TransformFeedbackBuffer, 0);

        capture_points(&*harness, num_samples);

        let feedback = tbo.read_sub_data::<f64>(num_samples);

        for (i, (&original, &fetched)) in data.iter().zip(feedback.iter()).enumerate() {
            harness.inform(format_args!("{}", fp64::comparison_line(i + 1, original, fetched)));
        }

        let mismatches = fp64::mismatches(&data, &feedback);
        for &index in mismatches.iter() {
            warn!("sample {} lost precision: {}", index + 1,
                  fp64::comparison_line(index + 1, data[index], feedback[index]));
        }

        TestResult::from_bool(mismatches.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn default_sample_count() {
        assert_eq!(parse_num_samples(&[]), DEFAULT_NUM_SAMPLES);
    }

    #[test]
    fn explicit_sample_count() {
        assert_eq!(parse_num_samples(&args(&["12"])), 12);
        assert_eq!(parse_num_samples(&args(&["1", "ignored"])), 1);
    }

    #[test]
    fn bad_sample_counts_fall_back() {
        assert_eq!(parse_num_samples(&args(&["0"])), DEFAULT_NUM_SAMPLES);
        assert_eq!(parse_num_samples(&args(&["-3"])), DEFAULT_NUM_SAMPLES);
        assert_eq!(parse_num_samples(&args(&["many"])), DEFAULT_NUM_SAMPLES);
    }

    #[test]
    fn sample_counts_beyond_glsizei_fall_back() {
        assert_eq!(parse_num_samples(&args(&["2147483647"])), i32::MAX as usize);
        assert_eq!(parse_num_samples(&args(&["2147483648"])), DEFAULT_NUM_SAMPLES);
        assert_eq!(parse_num_samples(&args(&["3000000000"])), DEFAULT_NUM_SAMPLES);
        assert_eq!(parse_num_samples(&args(&["9223372036854775807"])), DEFAULT_NUM_SAMPLES);
    }
}
