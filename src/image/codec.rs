//! Conversions between pixel buffers and channel-last float tensors, plus the
//! geometric transforms applied to captured frames.

use std::cmp::Ordering;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{rotate_about_center, Interpolation};
use ndarray::{Array3, Ix4};

use crate::error::{Error, Result};
use crate::tensor::{check_shape, Tensor};

use super::{ensure_area, NormalizationPolicy, PixelBuffer, RGB_CHANNELS};

/// Crop the longer axis symmetrically so the result is `min(w, h)` square.
///
/// The crop origin along the longer axis is `long / 2 - short / 2`, so for odd
/// differences the extra pixel is dropped from the trailing edge.
#[must_use]
pub fn crop_to_square(buffer: &PixelBuffer) -> PixelBuffer {
    let (width, height) = buffer.dimensions();

    match width.cmp(&height) {
        Ordering::Greater => {
            imageops::crop_imm(buffer, width / 2 - height / 2, 0, height, height).to_image()
        }
        Ordering::Less => {
            imageops::crop_imm(buffer, 0, height / 2 - width / 2, width, width).to_image()
        }
        Ordering::Equal => buffer.clone(),
    }
}

/// Bilinearly rescale to exactly `width` x `height`. Aspect ratio is not kept.
///
/// # Errors
///
/// Returns an error if the source or the target has zero area.
pub fn resize(buffer: &PixelBuffer, width: u32, height: u32) -> Result<PixelBuffer> {
    ensure_area(buffer.width(), buffer.height(), "source buffer")?;
    ensure_area(width, height, "resize target")?;

    if buffer.dimensions() == (width, height) {
        return Ok(buffer.clone());
    }

    Ok(imageops::resize(buffer, width, height, FilterType::Triangle))
}

/// Rotate clockwise by `degrees`.
///
/// Quarter turns are exact pixel permutations. Any other angle is resampled
/// bilinearly and the output is the bounding box of the rotated frame;
/// uncovered pixels are transparent.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn rotate(buffer: &PixelBuffer, degrees: f32) -> PixelBuffer {
    let turn = degrees.rem_euclid(360.0);

    if is_angle(turn, 0.0) || is_angle(turn, 360.0) {
        return buffer.clone();
    }
    if is_angle(turn, 90.0) {
        return imageops::rotate90(buffer);
    }
    if is_angle(turn, 180.0) {
        return imageops::rotate180(buffer);
    }
    if is_angle(turn, 270.0) {
        return imageops::rotate270(buffer);
    }

    let radians = turn.to_radians();
    let (sin, cos) = radians.sin_cos();
    let (width, height) = (buffer.width() as f32, buffer.height() as f32);

    // Safe: bounding box of a rotated rectangle, non-negative and finite
    let bound_w = width.mul_add(cos.abs(), height * sin.abs()).ceil() as u32;
    let bound_h = width.mul_add(sin.abs(), height * cos.abs()).ceil() as u32;

    // The canvas must hold the unrotated source too; it is cropped back to the
    // bounding box afterwards.
    let canvas_w = bound_w.max(buffer.width());
    let canvas_h = bound_h.max(buffer.height());

    let mut canvas = RgbaImage::new(canvas_w, canvas_h);
    imageops::overlay(
        &mut canvas,
        buffer,
        i64::from((canvas_w - buffer.width()) / 2),
        i64::from((canvas_h - buffer.height()) / 2),
    );

    let rotated =
        rotate_about_center(&canvas, radians, Interpolation::Bilinear, Rgba([0, 0, 0, 0]));
    if (canvas_w, canvas_h) == (bound_w, bound_h) {
        return rotated;
    }

    imageops::crop_imm(
        &rotated,
        (canvas_w - bound_w) / 2,
        (canvas_h - bound_h) / 2,
        bound_w,
        bound_h,
    )
    .to_image()
}

/// Mirror around the vertical axis.
#[must_use]
pub fn flip_horizontal(buffer: &PixelBuffer) -> PixelBuffer {
    imageops::flip_horizontal(buffer)
}

/// Resample to `width` x `height` (stretching, no letterbox) and emit a tensor of
/// shape `[height, width, 3]`.
///
/// Pixels are visited row-major, top to bottom, left to right. Channels are
/// always written R, G, B; alpha is dropped.
///
/// # Errors
///
/// Returns an error if the source or the target has zero area.
pub fn to_tensor(
    buffer: &PixelBuffer,
    width: u32,
    height: u32,
    normalization: NormalizationPolicy,
) -> Result<Tensor> {
    let resized = resize(buffer, width, height)?;

    let mut tensor = Array3::<f32>::zeros((height as usize, width as usize, RGB_CHANNELS));

    for (x, y, pixel) in resized.enumerate_pixels() {
        let Rgba([r, g, b, _]) = *pixel;
        let (row, col) = (y as usize, x as usize);
        tensor[[row, col, 0]] = normalization.apply(r);
        tensor[[row, col, 1]] = normalization.apply(g);
        tensor[[row, col, 2]] = normalization.apply(b);
    }

    Ok(tensor.into_dyn())
}

/// Decode a `[1, height, width, 3]` tensor with values in `[0, 1]` into pixels.
///
/// Tensor index `[0][x][y][c]` lands on the pixel at row `x`, column `y`, which
/// is `put_pixel(y, x, ..)` in `image` coordinates. Values are scaled by 255,
/// clamped and truncated. Alpha is opaque.
///
/// # Errors
///
/// Returns an error if the tensor shape does not match or the target has zero
/// area.
#[allow(clippy::cast_possible_truncation)]
pub fn from_tensor(tensor: &Tensor, width: u32, height: u32) -> Result<PixelBuffer> {
    ensure_area(width, height, "decoded image")?;
    check_shape(
        &[1, height as usize, width as usize, RGB_CHANNELS],
        tensor.shape(),
    )?;

    let view = tensor
        .view()
        .into_dimensionality::<Ix4>()
        .map_err(|_| Error::ShapeMismatch {
            expected: "4D tensor".to_string(),
            actual: format!("{}D tensor", tensor.ndim()),
        })?;

    let mut image = RgbaImage::new(width, height);

    for x in 0..height as usize {
        for y in 0..width as usize {
            let r = to_channel(view[[0, x, y, 0]]);
            let g = to_channel(view[[0, x, y, 1]]);
            let b = to_channel(view[[0, x, y, 2]]);

            // this y, x order is intentional: the second tensor axis is the row
            image.put_pixel(y as u32, x as u32, Rgba([r, g, b, u8::MAX]));
        }
    }

    Ok(image)
}

/// Scale a `[0, 1]` value to an 8-bit channel with clamping.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_channel(value: f32) -> u8 {
    // Safe: clamped to [0, 255] range before casting
    NormalizationPolicy::UNIT.invert(value).clamp(0.0, 255.0) as u8
}

#[inline]
fn is_angle(turn: f32, target: f32) -> bool {
    (turn - target).abs() < 1e-4
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array4, IxDyn};

    #[allow(clippy::cast_possible_truncation)]
    fn gradient(width: u32, height: u32) -> PixelBuffer {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 7, 255])
        })
    }

    #[test]
    fn test_crop_landscape() {
        let cropped = crop_to_square(&gradient(400, 300));
        assert_eq!(cropped.dimensions(), (300, 300));
        // origin is 400/2 - 300/2 = 50
        assert_eq!(cropped.get_pixel(0, 0)[0], 50);
        assert_eq!(cropped.get_pixel(0, 0)[1], 0);
    }

    #[test]
    fn test_crop_portrait_odd_difference() {
        let cropped = crop_to_square(&gradient(5, 10));
        assert_eq!(cropped.dimensions(), (5, 5));
        let top: u32 = 10 / 2 - 5 / 2;
        let bottom = 10 - 5 - top;
        assert_eq!(cropped.get_pixel(0, 0)[1], 3);
        assert!(top.abs_diff(bottom) <= 1);
    }

    #[test]
    fn test_crop_square_unchanged() {
        let source = gradient(17, 17);
        assert_eq!(crop_to_square(&source), source);
    }

    #[test]
    fn test_crop_never_empty() {
        for (w, h) in [(1, 9), (9, 1), (2, 3), (1000, 1)] {
            let cropped = crop_to_square(&gradient(w, h));
            assert_eq!(cropped.width(), w.min(h));
            assert_eq!(cropped.height(), w.min(h));
        }
    }

    #[test]
    fn test_resize_exact_dimensions() {
        let resized = resize(&gradient(400, 300), 256, 256).unwrap();
        assert_eq!(resized.dimensions(), (256, 256));

        let resized = resize(&gradient(3, 50), 64, 8).unwrap();
        assert_eq!(resized.dimensions(), (64, 8));
    }

    #[test]
    fn test_resize_rejects_zero_target() {
        assert!(matches!(
            resize(&gradient(4, 4), 0, 4),
            Err(Error::UnsupportedDimensions { .. })
        ));
        assert!(resize(&RgbaImage::new(0, 0), 4, 4).is_err());
    }

    #[test]
    fn test_to_tensor_shape() {
        for (w, h, tw, th) in [(400, 300, 384, 384), (10, 90, 256, 256), (7, 7, 5, 3)] {
            let tensor = to_tensor(&gradient(w, h), tw, th, NormalizationPolicy::UNIT).unwrap();
            assert_eq!(tensor.shape(), &[th as usize, tw as usize, 3]);
        }
    }

    #[test]
    fn test_to_tensor_square_keeps_size() {
        let tensor = to_tensor(&gradient(384, 384), 384, 384, NormalizationPolicy::UNIT).unwrap();
        assert_eq!(&tensor.shape()[..2], &[384, 384]);
    }

    #[test]
    fn test_to_tensor_channel_order_and_layout() {
        let mut buffer = RgbaImage::from_pixel(3, 2, Rgba([0, 0, 0, 255]));
        buffer.put_pixel(2, 1, Rgba([255, 0, 51, 0]));

        let tensor = to_tensor(&buffer, 3, 2, NormalizationPolicy::UNIT).unwrap();

        // row 1, column 2
        assert!((tensor[IxDyn(&[1, 2, 0])] - 1.0).abs() < f32::EPSILON);
        assert!(tensor[IxDyn(&[1, 2, 1])].abs() < f32::EPSILON);
        assert!((tensor[IxDyn(&[1, 2, 2])] - 0.2).abs() < 1e-6);
        assert!(tensor[IxDyn(&[0, 1, 0])].abs() < f32::EPSILON);
    }

    #[test]
    fn test_to_tensor_applies_policy() {
        let buffer = RgbaImage::from_pixel(2, 2, Rgba([0, 255, 255, 255]));
        let tensor = to_tensor(&buffer, 2, 2, NormalizationPolicy::SIGNED).unwrap();

        let min = tensor.iter().copied().fold(f32::INFINITY, f32::min);
        let max = tensor.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        assert!((min + 1.0).abs() < 1e-6);
        assert!((max - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_tensor_black_and_white() {
        let black = from_tensor(&Array4::<f32>::zeros((1, 384, 384, 3)).into_dyn(), 384, 384).unwrap();
        assert!(black.pixels().all(|p| *p == Rgba([0, 0, 0, 255])));

        let white = from_tensor(&Array4::<f32>::ones((1, 384, 384, 3)).into_dyn(), 384, 384).unwrap();
        assert!(white.pixels().all(|p| *p == Rgba([255, 255, 255, 255])));
    }

    #[test]
    fn test_from_tensor_clamps() {
        let mut tensor = Array4::<f32>::zeros((1, 2, 2, 3));
        tensor[[0, 0, 0, 0]] = 4.0;
        tensor[[0, 0, 0, 1]] = -3.0;
        tensor[[0, 0, 0, 2]] = 0.5;

        let image = from_tensor(&tensor.into_dyn(), 2, 2).unwrap();
        assert_eq!(*image.get_pixel(0, 0), Rgba([255, 0, 127, 255]));
    }

    /// Pins the index mapping: tensor `[0][x][y]` is row `x`, column `y`.
    /// Swapping the loop order mirrors the output across the diagonal.
    #[test]
    fn test_from_tensor_index_mapping() {
        let (width, height) = (4_u32, 2_u32);
        let mut tensor = Array4::<f32>::zeros((1, height as usize, width as usize, 3));
        // row 1, column 3: red
        tensor[[0, 1, 3, 0]] = 1.0;
        // row 0, column 1: green
        tensor[[0, 0, 1, 1]] = 1.0;

        let image = from_tensor(&tensor.into_dyn(), width, height).unwrap();

        assert_eq!(image.dimensions(), (4, 2));
        assert_eq!(*image.get_pixel(3, 1), Rgba([255, 0, 0, 255]));
        assert_eq!(*image.get_pixel(1, 0), Rgba([0, 255, 0, 255]));
        assert_eq!(*image.get_pixel(0, 1), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_from_tensor_rejects_wrong_shape() {
        let tensor = Array4::<f32>::zeros((1, 384, 384, 3)).into_dyn();
        let err = from_tensor(&tensor, 256, 256).unwrap_err();
        assert!(err.is_contract_violation());

        let flat = Tensor::zeros(IxDyn(&[384, 384, 3]));
        assert!(from_tensor(&flat, 384, 384).is_err());
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let source = gradient(4, 2);
        let rotated = rotate(&source, 90.0);
        assert_eq!(rotated.dimensions(), (2, 4));
        // clockwise: bottom-left corner moves to top-left
        assert_eq!(rotated.get_pixel(0, 0), source.get_pixel(0, 1));

        let back = rotate(&rotated, -90.0);
        assert_eq!(back, source);
    }

    #[test]
    fn test_rotate_full_turn_and_half_turn() {
        let source = gradient(5, 3);
        assert_eq!(rotate(&source, 360.0), source);
        assert_eq!(rotate(&rotate(&source, 180.0), 180.0), source);
    }

    #[test]
    fn test_rotate_elongated_fits_bounding_box() {
        let source = RgbaImage::from_pixel(100, 10, Rgba([9, 9, 9, 255]));

        let rotated = rotate(&source, 45.0);
        assert_eq!(rotated.dimensions(), (78, 78));
        assert_eq!(rotated.get_pixel(39, 39)[0], 9);
        // off-diagonal corners are uncovered
        assert_eq!(rotated.get_pixel(0, 77)[3], 0);
        assert_eq!(rotated.get_pixel(77, 0)[3], 0);
        // the strip reaches both ends of the box
        assert!((0..78).any(|y| rotated.get_pixel(2, y)[3] > 0));
        assert!((0..78).any(|y| rotated.get_pixel(75, y)[3] > 0));

        // 100 cos 30 + 10 sin 30 = 91.6, 100 sin 30 + 10 cos 30 = 58.7
        assert_eq!(rotate(&source, 30.0).dimensions(), (92, 59));
    }

    #[test]
    fn test_rotate_arbitrary_angle_grows_canvas() {
        let source = RgbaImage::from_pixel(10, 10, Rgba([9, 9, 9, 255]));
        let rotated = rotate(&source, 45.0);
        assert_eq!(rotated.dimensions(), (15, 15));
        // corners fall outside the rotated square
        assert_eq!(rotated.get_pixel(0, 0)[3], 0);
        assert_eq!(rotated.get_pixel(7, 7)[0], 9);
    }

    #[test]
    fn test_flip_horizontal() {
        let source = gradient(3, 1);
        let flipped = flip_horizontal(&source);
        assert_eq!(flipped.get_pixel(0, 0), source.get_pixel(2, 0));
        assert_eq!(flip_horizontal(&flipped), source);
    }
}
