//! A 2D array texture viewed as a cube map array must sample the right layer: the view starts
//! at layer 2, so face 1 (-X) of cube 1 is layer 9 of the array.

use crate::backend::Facade;
use crate::config::TestConfig;
use crate::draw;
use crate::gl;
use crate::harness::Harness;
use crate::probe;
use crate::program::Program;
use crate::requirements::Requirements;
use crate::result::TestResult;
use crate::texture::{Texture, TextureTarget};

use super::{program_or_log, ConformanceTest};

const GREEN: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

const ARRAY_LAYERS: u32 = 16;
const GREEN_LAYER: u32 = 9;
const VIEW_MIN_LAYER: u32 = 2;
const VIEW_NUM_LAYERS: u32 = 12;

const VERTEX_SHADER: &str = "\
void main()
{
    gl_Position = gl_Vertex;
}
";

const FRAGMENT_SHADER: &str = "\
#extension GL_ARB_texture_cube_map_array: require
uniform samplerCubeArray tex;
void main()
{
    vec4 color = texture(tex, vec4(-1, 0, 0, 1));
    gl_FragColor = vec4(color.xyz, 1.0);
}
";

/// `arb_texture_view-sampling-2d-array-as-cubemap-array`
pub struct SamplingArrayAsCubeArray;

impl ConformanceTest for SamplingArrayAsCubeArray {
    fn name(&self) -> &'static str {
        "arb_texture_view-sampling-2d-array-as-cubemap-array"
    }

    fn config(&self) -> TestConfig {
        TestConfig::compat(3, 0)
    }

    fn requirements(&self) -> Requirements {
        Requirements::new()
            .gl_version(3, 0)
            .extension("GL_ARB_texture_view")
            .extension("GL_ARB_texture_cube_map_array")
    }

    fn run(&self, harness: &mut Harness) -> TestResult {
        let program = match program_or_log(Program::from_source(&*harness, VERTEX_SHADER,
                                                                FRAGMENT_SHADER)) {
            Some(program) => program,
            None => return TestResult::Fail,
        };

        let array = Texture::new(&*harness, TextureTarget::Texture2dArray);
        array.storage_3d(1, gl::RGBA8, 1, 1, ARRAY_LAYERS);
        for layer in 0 .. ARRAY_LAYERS {
            array.sub_image_3d_rgba_f32(layer, RED);
        }
        array.sub_image_3d_rgba_f32(GREEN_LAYER, GREEN);

        let cube = array.view(TextureTarget::CubeMapArray, gl::RGBA8, 0, 1, VIEW_MIN_LAYER,
                              VIEW_NUM_LAYERS);
        cube.set_nearest_filtering();

        program.use_program();
        if let Some(location) = program.uniform_location("tex") {
            let ctxt = harness.get_context().make_current();
            unsafe { ctxt.gl.Uniform1i(location, 0) };
        }

        let (width, height) = (harness.width(), harness.height());
        {
            let ctxt = harness.get_context().make_current();
            unsafe {
                ctxt.gl.Viewport(0, 0, width as gl::types::GLsizei,
                                 height as gl::types::GLsizei);
                ctxt.gl.ClearColor(0.5, 0.5, 0.5, 0.5);
                ctxt.gl.Clear(gl::COLOR_BUFFER_BIT);
            }
        }

        draw::draw_rect(&*harness, -1.0, -1.0, 2.0, 2.0);

        let pass = probe::probe_rect_rgba(&*harness, 0, 0, width, height, GREEN);
        TestResult::from_bool(pass)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn green_layer_is_minus_x_of_the_second_cube() {
        // six faces per cube, -X is face 1
        let cube = 1;
        let face = 1;
        assert_eq!(VIEW_MIN_LAYER + cube * 6 + face, GREEN_LAYER);
        assert!(VIEW_MIN_LAYER + VIEW_NUM_LAYERS <= ARRAY_LAYERS);
        assert_eq!(VIEW_NUM_LAYERS % 6, 0);
    }
}
