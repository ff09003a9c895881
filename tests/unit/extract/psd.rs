use super::*;

#[test]
fn blend_names_map_and_default_to_normal() {
    assert_eq!(blend_mode_from_name("Screen"), BlendMode::Screen);
    assert_eq!(blend_mode_from_name("ColorDodge"), BlendMode::ColorDodge);
    assert_eq!(blend_mode_from_name("PassThrough"), BlendMode::Normal);
    assert_eq!(blend_mode_from_name("LinearBurn"), BlendMode::Normal);
}

#[test]
fn canvas_sized_buffer_is_cropped_to_layer() {
    // 3x2 canvas, pixel value encodes its index.
    let canvas: Vec<u8> = (0..6u8).flat_map(|i| [i, i, i, 255]).collect();
    let out = layer_pixels(canvas, 3, 2, 1, 0, 2, 2).unwrap();
    let firsts: Vec<u8> = out.chunks_exact(4).map(|p| p[0]).collect();
    assert_eq!(firsts, vec![1, 2, 4, 5]);
}

#[test]
fn crop_outside_canvas_is_transparent() {
    let canvas = vec![255u8; 2 * 2 * 4];
    let out = layer_pixels(canvas, 2, 2, -1, 0, 2, 1).unwrap();
    assert_eq!(&out[0..4], &[0, 0, 0, 0]);
    assert_eq!(&out[4..8], &[255, 255, 255, 255]);
}

#[test]
fn layer_sized_buffer_passes_through_and_mismatch_is_none() {
    let buf = vec![7u8; 2 * 3 * 4];
    assert_eq!(layer_pixels(buf.clone(), 10, 10, 4, 4, 2, 3), Some(buf));
    assert_eq!(layer_pixels(vec![0; 5], 10, 10, 0, 0, 2, 2), None);
    assert_eq!(layer_pixels(vec![0; 400], 10, 10, 0, 0, 0, 2), None);
}

#[test]
fn garbage_bytes_are_a_decode_error() {
    let err = PsdDecoder.decode(b"not a psd at all").unwrap_err();
    assert!(matches!(err, HolocardError::Decode(_)));
}
