//! A `dmat3x3` vertex attribute is sourced as three `dvec3` columns and captured back with
//! transform feedback. Every element must come back bit for bit.

use std::mem;

use bytemuck::{Pod, Zeroable};
use memoffset::offset_of;
use tracing::warn;

use crate::buffer::{Buffer, BufferType, BufferUsage, VertexArray};
use crate::config::TestConfig;
use crate::fp64;
use crate::harness::Harness;
use crate::program::ProgramBuilder;
use crate::requirements::Requirements;
use crate::result::TestResult;

use super::{capture_points, program_or_log, ConformanceTest};

const NUM_ROWS: usize = 3;
const NUM_COLUMNS: usize = 3;
const NUM_SAMPLES: usize = 1;

const VERTEX_SHADER: &str = "\
#version 150
#extension GL_ARB_vertex_attrib_64bit: require
#extension GL_ARB_gpu_shader_fp64: require
in dmat3x3 inValue;
out dmat3x3 outValue;
void main()
{
    outValue = inValue;
}
";

/// One vertex: a column-major `dmat3`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct Dmat3Vertex {
    column0: [f64; NUM_ROWS],
    column1: [f64; NUM_ROWS],
    column2: [f64; NUM_ROWS],
}

impl Dmat3Vertex {
    fn from_column_major(data: &[f64; NUM_ROWS * NUM_COLUMNS]) -> Dmat3Vertex {
        Dmat3Vertex {
            column0: [data[0], data[1], data[2]],
            column1: [data[3], data[4], data[5]],
            column2: [data[6], data[7], data[8]],
        }
    }

    /// Byte offsets of the columns, in order.
    fn column_offsets() -> [usize; NUM_COLUMNS] {
        [
            offset_of!(Dmat3Vertex, column0),
            offset_of!(Dmat3Vertex, column1),
            offset_of!(Dmat3Vertex, column2),
        ]
    }
}

/// `arb_vertex_attrib_64bit-using-transform-feedback-with-dmat3x3`
pub struct TransformFeedbackDmat3;

impl ConformanceTest for TransformFeedbackDmat3 {
    fn name(&self) -> &'static str {
        "arb_vertex_attrib_64bit-using-transform-feedback-with-dmat3x3"
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
        let program = ProgramBuilder::new(VERTEX_SHADER).varying("outValue").build(&*harness);
        let program = match program_or_log(program) {
            Some(program) => program,
            None => return TestResult::Fail,
        };
        program.use_program();

        // a matrix attribute takes one location per column
        let input_location = match program.attrib_location("inValue") {
            Some(location) => location,
            None => {
                warn!("inValue is not active");
                return TestResult::Fail;
            },
        };

        let data = fp64::dmat3_samples();
        let vertices = [Dmat3Vertex::from_column_major(&data); NUM_SAMPLES];

        let vao = VertexArray::new(&*harness);
        let vbo = Buffer::new(&*harness, BufferType::ArrayBuffer, &vertices,
                              BufferUsage::StaticDraw);

        let stride = mem::size_of::<Dmat3Vertex>();
        for (column, &offset) in Dmat3Vertex::column_offsets().iter().enumerate() {
            vao.attrib_f64(&vbo, input_location + column as u32, NUM_ROWS as i32, stride,
                           offset);
        }

        let tbo = Buffer::empty(&*harness, BufferType::ArrayBuffer, stride * NUM_SAMPLES,
                                BufferUsage::StaticRead);
        tbo.bind_base_as(BufferType::TransformFeedbackBuffer, 0);

        capture_points(&*harness, NUM_SAMPLES);

        let feedback = tbo.read_sub_data::<f64>(NUM_ROWS * NUM_COLUMNS * NUM_SAMPLES);

        let mut pass = true;
        for (i, (&original, &fetched)) in data.iter().zip(feedback.iter()).enumerate() {
            let equal = fp64::bits_equal(original, fetched);
            let line = fp64::comparison_line(i + 1, original, fetched);

            if equal {
                harness.inform(format_args!("{}\tequal", line));
            } else {
                warn!("{}\tWRONG", line);
            }

            pass = pass && equal;
        }

        TestResult::from_bool(pass)
    }
}

#[cfg(test)]
mod tests {
    use std::mem;

    use super::Dmat3Vertex;

    #[test]
    fn layout() {
        assert_eq!(mem::size_of::<Dmat3Vertex>(), 72);
        assert_eq!(Dmat3Vertex::column_offsets(), [0, 24, 48]);
    }

    #[test]
    fn columns_keep_the_column_major_order() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
        let vertex = Dmat3Vertex::from_column_major(&data);
        assert_eq!(bytemuck::cast::<Dmat3Vertex, [f64; 9]>(vertex), data);
        assert_eq!(vertex.column1, [4.0, 5.0, 6.0]);
    }
}
