#[macro_use]
mod support;

use glconform::buffer::{Buffer, BufferType, BufferUsage};
use glconform::fp64;
use glconform::GlError;

#[test]
fn buffer_roundtrip_is_bit_exact() {
    let context = context_or_return!();

    let data = fp64::lsb_samples(8);
    let buffer = Buffer::new(&context, BufferType::ArrayBuffer, &data, BufferUsage::StaticDraw);
    assert_eq!(buffer.get_size(), 8 * 8);

    let read: Vec<f64> = buffer.read_sub_data(data.len());
    assert!(fp64::mismatches(&data, &read).is_empty());

    context.assert_no_error(None);
}

#[test]
fn buffer_map_read() {
    let context = context_or_return!();

    let data = fp64::dmat3_samples();
    let buffer = Buffer::new(&context, BufferType::ArrayBuffer, &data, BufferUsage::StaticRead);

    let mapped: Vec<f64> = match buffer.map_read(data.len()) {
        Some(mapped) => mapped,
        None => panic!("mapping the buffer failed"),
    };
    assert!(fp64::mismatches(&data, &mapped).is_empty());

    context.assert_no_error(None);
}

#[test]
fn buffer_empty_creation() {
    let context = context_or_return!();

    let buffer = Buffer::empty(&context, BufferType::ArrayBuffer, 24 * 8,
                               BufferUsage::DynamicDraw);
    assert_eq!(buffer.get_size(), 192);

    assert!(context.check_error(GlError::NoError));
}
