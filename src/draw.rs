/*!
Immediate drawing helpers.

Vertices are `vec4` positions sourced from generic attribute 0, which aliases `gl_Vertex` in
the compatibility profile and is the location of `piglit_vertex` in shaders that declare it
first. A temporary buffer and vertex array are created for each call, so the helpers work in
both profiles.

*/
use crate::backend::Facade;
use crate::buffer::{Buffer, BufferType, BufferUsage, VertexArray};
use crate::gl;

/// Returns the triangle strip covering the rectangle.
pub fn rect_vertices(x: f32, y: f32, w: f32, h: f32) -> [[f32; 4]; 4] {
    [
        [x, y, 0.0, 1.0],
        [x + w, y, 0.0, 1.0],
        [x, y + h, 0.0, 1.0],
        [x + w, y + h, 0.0, 1.0],
    ]
}

fn draw_vertices<F: ?Sized>(facade: &F, mode: gl::types::GLenum, vertices: &[[f32; 4]])
    where F: Facade
{
    let vao = VertexArray::new(facade);
    let vbo = Buffer::new(facade, BufferType::ArrayBuffer, vertices, BufferUsage::StaticDraw);
    vao.attrib_f32(&vbo, 0, 4, 0, 0);

    let ctxt = facade.get_context().make_current();
    unsafe { ctxt.gl.DrawArrays(mode, 0, vertices.len() as gl::types::GLsizei) };
}

/// Draws a rectangle in normalized device coordinates.
pub fn draw_rect<F: ?Sized>(facade: &F, x: f32, y: f32, w: f32, h: f32) where F: Facade {
    draw_vertices(facade, gl::TRIANGLE_STRIP, &rect_vertices(x, y, w, h));
}

/// Draws a triangle in normalized device coordinates.
pub fn draw_triangle<F: ?Sized>(facade: &F, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32,
                                y3: f32) where F: Facade
{
    let vertices = [
        [x1, y1, 0.0, 1.0],
        [x2, y2, 0.0, 1.0],
        [x3, y3, 0.0, 1.0],
    ];

    draw_vertices(facade, gl::TRIANGLES, &vertices);
}

#[cfg(test)]
mod tests {
    use super::rect_vertices;

    #[test]
    fn full_window_rect() {
        let vertices = rect_vertices(-1.0, -1.0, 2.0, 2.0);
        assert_eq!(vertices[0], [-1.0, -1.0, 0.0, 1.0]);
        assert_eq!(vertices[3], [1.0, 1.0, 0.0, 1.0]);
        // strip order: the second and third vertices are the opposite corners
        assert_eq!(vertices[1][..2], [1.0, -1.0]);
        assert_eq!(vertices[2][..2], [-1.0, 1.0]);
    }
}
