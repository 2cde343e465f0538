use image::{Rgba, RgbaImage};

/// Horizontal red ramp, vertical green ramp, constant blue.
pub fn gradient(width: u32, height: u32) -> RgbaImage {
    assert!(width > 0 && height > 0, "image dimensions must be positive");

    let (x_span, y_span) = ((width - 1).max(1), (height - 1).max(1));
    RgbaImage::from_fn(width, height, |x, y| {
        let r = u8::try_from(x * 255 / x_span).unwrap_or(u8::MAX);
        let g = u8::try_from(y * 255 / y_span).unwrap_or(u8::MAX);
        Rgba([r, g, 96, 255])
    })
}

/// Checkerboard of two colors with square cells.
pub fn checkerboard(width: u32, height: u32, cell: u32, a: [u8; 3], b: [u8; 3]) -> RgbaImage {
    assert!(cell > 0, "cell size must be positive");

    RgbaImage::from_fn(width, height, |x, y| {
        let [r, g, bl] = if ((x / cell) + (y / cell)) % 2 == 0 { a } else { b };
        Rgba([r, g, bl, 255])
    })
}
