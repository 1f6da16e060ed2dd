use image::imageops::{self, FilterType};
use image::{Pixel, Rgba, RgbaImage};

/// Paints `image` with its top-left corner at `(x, y)`. Parts that fall off
/// the canvas are clipped; opaque source pixels replace what was there and
/// fully transparent ones leave it untouched.
pub(crate) fn paint_image(canvas: &mut RgbaImage, image: &RgbaImage, x: i64, y: i64) {
    let left = x.max(0);
    let top = y.max(0);
    let right = (x + i64::from(image.width())).min(i64::from(canvas.width()));
    let bottom = (y + i64::from(image.height())).min(i64::from(canvas.height()));
    for out_y in top..bottom {
        for out_x in left..right {
            // In range by construction: out - origin lies in [0, image size).
            let src = image.get_pixel((out_x - x) as u32, (out_y - y) as u32);
            blend_pixel(canvas, out_x, out_y, src.0);
        }
    }
}

/// Source-over blend of one pixel; out-of-canvas coordinates are ignored.
pub(crate) fn blend_pixel(canvas: &mut RgbaImage, x: i64, y: i64, color: [u8; 4]) {
    let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
        return;
    };
    if x >= canvas.width() || y >= canvas.height() {
        return;
    }
    let dst = canvas.get_pixel_mut(x, y);
    match color[3] {
        0 => {}
        255 => *dst = Rgba(color),
        _ => dst.blend(&Rgba(color)),
    }
}

pub(crate) fn fill_rect_blended(
    canvas: &mut RgbaImage,
    x: i64,
    y: i64,
    width: u32,
    height: u32,
    color: [u8; 4],
) {
    let start_x = x.max(0);
    let start_y = y.max(0);
    let end_x = (x + i64::from(width)).min(i64::from(canvas.width()));
    let end_y = (y + i64::from(height)).min(i64::from(canvas.height()));
    for py in start_y..end_y {
        for px in start_x..end_x {
            blend_pixel(canvas, px, py, color);
        }
    }
}

/// Integer upscale with nearest-neighbour sampling. `None` when the result
/// would not fit in `u32` dimensions.
pub(crate) fn scale_nearest(canvas: &RgbaImage, factor: u32) -> Option<RgbaImage> {
    let factor = factor.max(1);
    let width = canvas.width().checked_mul(factor)?;
    let height = canvas.height().checked_mul(factor)?;
    Some(imageops::resize(canvas, width, height, FilterType::Nearest))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    #[test]
    fn paint_image_clips_negative_origin() {
        let mut canvas = RgbaImage::from_pixel(4, 4, Rgba(BLUE));
        let sprite = RgbaImage::from_pixel(2, 2, Rgba(RED));
        paint_image(&mut canvas, &sprite, -1, -1);
        assert_eq!(canvas.get_pixel(0, 0).0, RED);
        assert_eq!(canvas.get_pixel(1, 1).0, BLUE);
    }

    #[test]
    fn transparent_source_pixels_keep_canvas() {
        let mut canvas = RgbaImage::from_pixel(2, 2, Rgba(BLUE));
        let sprite = RgbaImage::from_pixel(2, 2, Rgba([255, 0, 0, 0]));
        paint_image(&mut canvas, &sprite, 0, 0);
        assert!(canvas.pixels().all(|px| px.0 == BLUE));
    }

    #[test]
    fn half_alpha_fill_darkens_without_replacing() {
        let mut canvas = RgbaImage::from_pixel(4, 4, Rgba([200, 200, 200, 255]));
        fill_rect_blended(&mut canvas, 1, 1, 2, 2, [0, 0, 0, 128]);
        let inside = canvas.get_pixel(1, 1).0;
        assert!(inside[0] < 200 && inside[0] > 0);
        assert_eq!(canvas.get_pixel(0, 0).0, [200, 200, 200, 255]);
        assert_eq!(canvas.get_pixel(3, 3).0, [200, 200, 200, 255]);
    }

    #[test]
    fn out_of_canvas_writes_are_ignored() {
        let mut canvas = RgbaImage::from_pixel(2, 2, Rgba(BLUE));
        blend_pixel(&mut canvas, -1, 0, RED);
        blend_pixel(&mut canvas, 0, 5, RED);
        fill_rect_blended(&mut canvas, 10, 10, 4, 4, RED);
        assert!(canvas.pixels().all(|px| px.0 == BLUE));
    }

    #[test]
    fn scale_replicates_each_pixel() {
        let mut canvas = RgbaImage::from_pixel(2, 1, Rgba(BLUE));
        canvas.put_pixel(1, 0, Rgba(RED));
        let scaled = scale_nearest(&canvas, 3).expect("scale");
        assert_eq!(scaled.dimensions(), (6, 3));
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(scaled.get_pixel(x, y).0, BLUE);
                assert_eq!(scaled.get_pixel(x + 3, y).0, RED);
            }
        }
    }

    #[test]
    fn scale_factor_one_is_a_copy() {
        let mut canvas = RgbaImage::from_pixel(3, 2, Rgba(BLUE));
        canvas.put_pixel(2, 1, Rgba(RED));
        assert_eq!(scale_nearest(&canvas, 1).expect("scale"), canvas);
        assert_eq!(scale_nearest(&canvas, 0).expect("scale"), canvas);
    }

    #[test]
    fn scale_reports_overflow() {
        let canvas = RgbaImage::new(2, 2);
        assert!(scale_nearest(&canvas, u32::MAX).is_none());
    }
}
