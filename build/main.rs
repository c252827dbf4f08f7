use std::env;
use std::fs::File;
use std::path::Path;

use gl_generator::{Api, Fallbacks, Profile, Registry, StructGenerator};

fn main() {
    let dest = env::var("OUT_DIR").unwrap();
    let mut file = File::create(&Path::new(&dest).join("gl_bindings.rs")).unwrap();

    // the compatibility registry also brings the core entry points, so a single set of
    // bindings works for both kinds of context
    Registry::new(Api::Gl, (4, 6), Profile::Compatibility, Fallbacks::All, [
        "GL_ARB_gpu_shader_fp64",
        "GL_ARB_shader_storage_buffer_object",
        "GL_ARB_texture_cube_map_array",
        "GL_ARB_texture_view",
        "GL_ARB_transform_feedback3",
        "GL_ARB_vertex_attrib_64bit",
        "GL_INTEL_performance_query",
        "GL_KHR_debug",
    ])
    .write_bindings(StructGenerator, &mut file)
    .unwrap();

    println!("cargo:rerun-if-changed=build/main.rs");
}
