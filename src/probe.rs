/*!
Reading back the framebuffer and comparing it against expected values.

Every probe reads a rectangle of the currently bound read framebuffer with `glReadPixels`,
compares each pixel and logs the first one that doesn't match. Coordinates are in pixels with
the origin at the bottom-left corner, like `glReadPixels`.

*/
use std::os::raw::c_void;

use tracing::warn;

use crate::backend::Facade;
use crate::gl;

/// Allowed difference between an expected and an observed component.
#[derive(Debug, Clone, PartialEq)]
pub struct Tolerance {
    value: [f64; 4],
    is_percent: bool,
}

impl Tolerance {
    /// Builds a tolerance. With `is_percent`, each value is a percentage of the expected value.
    pub fn new(value: [f64; 4], is_percent: bool) -> Tolerance {
        Tolerance { value, is_percent }
    }

    /// The same absolute tolerance for every component.
    pub fn uniform(value: f64) -> Tolerance {
        Tolerance { value: [value; 4], is_percent: false }
    }

    /// Returns true if `a` is close enough to `b` for this component.
    pub fn equal(&self, component: usize, a: f64, b: f64) -> bool {
        if self.is_percent {
            (a - b).abs() <= (self.value[component] / 100.0 * b).abs()
        } else {
            (a - b).abs() <= self.value[component]
        }
    }
}

impl Default for Tolerance {
    fn default() -> Tolerance {
        Tolerance {
            value: [0.01; 4],
            is_percent: false,
        }
    }
}

/// First pixel of a rectangle that didn't match.
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch<T> {
    /// Column relative to the probed rectangle.
    pub x: u32,
    /// Row relative to the probed rectangle.
    pub y: u32,
    /// Components that were read.
    pub observed: Vec<T>,
}

/// Compares one color against another, component by component.
pub fn compare_rgba(observed: &[f32], expected: &[f32], tolerance: &Tolerance) -> bool {
    observed.iter()
            .zip(expected.iter())
            .enumerate()
            .all(|(i, (&o, &e))| tolerance.equal(i, o as f64, e as f64))
}

/// Walks `pixels`, a tightly packed rectangle `width` pixels wide with `components` values
/// per pixel, and returns the first one for which `matches` is false.
pub fn first_mismatch<T, F>(pixels: &[T], components: usize, width: u32, mut matches: F)
                            -> Option<Mismatch<T>>
    where T: Copy, F: FnMut(&[T]) -> bool
{
    if components == 0 || width == 0 {
        return None;
    }

    pixels.chunks_exact(components)
          .position(|pixel| !matches(pixel))
          .map(|index| {
              let start = index * components;
              Mismatch {
                  x: index as u32 % width,
                  y: index as u32 / width,
                  observed: pixels[start .. start + components].to_vec(),
              }
          })
}

unsafe fn read_pixels<F: ?Sized, T>(facade: &F, x: i32, y: i32, w: u32, h: u32,
                                    format: gl::types::GLenum, ty: gl::types::GLenum,
                                    components: usize) -> Vec<T>
    where F: Facade, T: bytemuck::Pod
{
    let mut data = vec![T::zeroed(); w as usize * h as usize * components];

    let ctxt = facade.get_context().make_current();
    ctxt.gl.PixelStorei(gl::PACK_ALIGNMENT, 1);
    ctxt.gl.ReadPixels(x, y, w as gl::types::GLsizei, h as gl::types::GLsizei, format, ty,
                       data.as_mut_ptr() as *mut c_void);

    data
}

/// Checks that every pixel of the rectangle has the expected color, with the default
/// tolerance.
pub fn probe_rect_rgba<F: ?Sized>(facade: &F, x: i32, y: i32, w: u32, h: u32,
                                  expected: [f32; 4]) -> bool where F: Facade
{
    probe_rect_rgba_with(facade, x, y, w, h, expected, &Tolerance::default())
}

/// Checks that every pixel of the rectangle has the expected color.
pub fn probe_rect_rgba_with<F: ?Sized>(facade: &F, x: i32, y: i32, w: u32, h: u32,
                                       expected: [f32; 4], tolerance: &Tolerance) -> bool
    where F: Facade
{
    let pixels: Vec<f32> = unsafe { read_pixels(facade, x, y, w, h, gl::RGBA, gl::FLOAT, 4) };

    match first_mismatch(&pixels, 4, w, |p| compare_rgba(p, &expected, tolerance)) {
        None => true,
        Some(m) => {
            warn!("Probe color at ({},{})", x + m.x as i32, y + m.y as i32);
            warn!("  Expected: {:?}", expected);
            warn!("  Observed: {:?}", m.observed);
            false
        },
    }
}

/// Checks that every pixel of the rectangle has the expected depth, within `0.01`.
pub fn probe_rect_depth<F: ?Sized>(facade: &F, x: i32, y: i32, w: u32, h: u32,
                                   expected: f32) -> bool where F: Facade
{
    let pixels: Vec<f32> = unsafe {
        read_pixels(facade, x, y, w, h, gl::DEPTH_COMPONENT, gl::FLOAT, 1)
    };
    let tolerance = Tolerance::default();

    match first_mismatch(&pixels, 1, w, |p| tolerance.equal(0, p[0] as f64, expected as f64)) {
        None => true,
        Some(m) => {
            warn!("Probe depth at ({},{})", x + m.x as i32, y + m.y as i32);
            warn!("  Expected: {}", expected);
            warn!("  Observed: {}", m.observed[0]);
            false
        },
    }
}

/// Checks that every pixel of the rectangle has the expected stencil value.
pub fn probe_rect_stencil<F: ?Sized>(facade: &F, x: i32, y: i32, w: u32, h: u32,
                                     expected: u8) -> bool where F: Facade
{
    let pixels: Vec<u8> = unsafe {
        read_pixels(facade, x, y, w, h, gl::STENCIL_INDEX, gl::UNSIGNED_BYTE, 1)
    };

    match first_mismatch(&pixels, 1, w, |p| p[0] == expected) {
        None => true,
        Some(m) => {
            warn!("Probe stencil at ({},{})", x + m.x as i32, y + m.y as i32);
            warn!("  Expected: 0x{:02x}", expected);
            warn!("  Observed: 0x{:02x}", m.observed[0]);
            false
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentage() {
        let tolerance = Tolerance::new([25.0, 50.0, 1.0, 1.0], true);

        assert!(tolerance.equal(0, 0.76, 1.0));
        assert!(!tolerance.equal(0, 0.74, 1.0));
        assert!(tolerance.equal(1, 41.0, 80.0));
        assert!(!tolerance.equal(1, 39.0, 1.0));
        assert!(tolerance.equal(2, 100.5, 100.0));
        assert!(!tolerance.equal(2, 101.5, 100.0));
    }

    #[test]
    fn absolute() {
        let tolerance = Tolerance::new([1.0, 2.0, 3.0, 4.0], false);

        assert!(tolerance.equal(0, 5.9, 5.0));
        assert!(!tolerance.equal(0, 6.1, 5.0));
        assert!(tolerance.equal(1, 3.1, 5.0));
        assert!(!tolerance.equal(1, 2.9, 5.0));
        assert!(tolerance.equal(3, 186.1, 190.0));
        assert!(!tolerance.equal(3, 185.9, 190.0));
    }

    #[test]
    fn rgba8_green_is_within_default_tolerance() {
        let green = [0.0, 1.0, 0.0, 1.0];
        assert!(compare_rgba(&[0.0, 255.0 / 255.0, 0.0, 1.0], &green, &Tolerance::default()));
        assert!(compare_rgba(&[0.004, 0.996, 0.0, 1.0], &green, &Tolerance::default()));
        assert!(!compare_rgba(&[1.0, 0.0, 0.0, 1.0], &green, &Tolerance::default()));
        assert!(!compare_rgba(&[0.5, 0.5, 0.5, 0.5], &green, &Tolerance::uniform(0.1)));
    }

    #[test]
    fn mismatch_position() {
        // 3×2 rectangle, the pixel at (1, 1) is wrong
        let pixels = [0u8, 0, 0, 0, 7, 0];
        let mismatch = first_mismatch(&pixels, 1, 3, |p| p[0] == 0).unwrap();

        assert_eq!(mismatch, Mismatch { x: 1, y: 1, observed: vec![7] });
    }

    #[test]
    fn first_of_several_mismatches() {
        let pixels = [
            1.0f32, 1.0, 1.0, 1.0,   0.0, 0.0, 0.0, 0.0,
            0.5, 0.5, 0.5, 0.5,      1.0, 1.0, 1.0, 1.0,
        ];
        let white = [1.0; 4];
        let mismatch = first_mismatch(&pixels, 4, 2,
                                      |p| compare_rgba(p, &white, &Tolerance::default()));

        assert_eq!(mismatch, Some(Mismatch { x: 1, y: 0, observed: vec![0.0; 4] }));
    }

    #[test]
    fn everything_matches() {
        let pixels = [0.5f32; 16];
        assert_eq!(first_mismatch(&pixels, 1, 4, |p| p[0] == 0.5), None);
        assert_eq!(first_mismatch::<f32, _>(&[], 4, 0, |_| false), None);
    }
}
