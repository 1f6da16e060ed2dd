use image::RgbaImage;

use super::font::{FontFace, FontSource};
use super::raster::{fill_rect_blended, paint_image};
use super::RenderError;
use crate::assets::AssetSource;
use crate::config::RenderConfig;
use crate::grid::GridGeometry;
use crate::scene::TextLabel;

const DEBUG_CELL_SHADE: [u8; 4] = [0, 0, 0, 128];
const DEBUG_LABEL_COLOR: [u8; 4] = [255, 0, 21, 255];
const DEBUG_LABEL_INSET: i64 = 1;

/// Banner sprite plus the message text in the reserved region.
pub(crate) fn paint_notification(
    canvas: &mut RgbaImage,
    geometry: &GridGeometry,
    assets: &dyn AssetSource,
    fonts: &dyn FontSource,
    config: &RenderConfig,
    message: &str,
) -> Result<(), RenderError> {
    let banner = assets
        .load(&config.banner_asset_key)
        .map_err(RenderError::Banner)?;
    let face = fonts.face(config.notification_font_size)?;

    let (banner_x, banner_y) = geometry.cell_to_pixel(config.banner_cell.0, config.banner_cell.1);
    paint_image(canvas, &banner.raster, banner_x, banner_y);

    let (text_x, text_y) = geometry.cell_to_pixel(
        config.notification_text_cell.0,
        config.notification_text_cell.1,
    );
    face.draw(
        canvas,
        text_x,
        text_y,
        message,
        config.notification_color.rgba(),
    );
    Ok(())
}

/// Faces are resolved for every label before anything is painted, so a bad
/// size leaves the canvas as it was.
pub(crate) fn paint_text_labels(
    canvas: &mut RgbaImage,
    geometry: &GridGeometry,
    fonts: &dyn FontSource,
    labels: &[TextLabel],
) -> Result<(), RenderError> {
    let faces = labels
        .iter()
        .map(|label| fonts.face(label.size))
        .collect::<Result<Vec<_>, _>>()?;
    for (label, face) in labels.iter().zip(faces) {
        let (x, y) = geometry.cell_to_pixel(label.x, label.y);
        face.draw(canvas, x, y, &label.message, label.color.rgba());
    }
    Ok(())
}

/// Shades every cell and writes row indices down column 0 and column indices
/// across row 0.
pub(crate) fn paint_debug_grid(canvas: &mut RgbaImage, geometry: &GridGeometry) {
    let shade_size = geometry.cell_size().saturating_sub(1).max(1);
    for cell_y in 0..geometry.height_cells() {
        for cell_x in 0..geometry.width_cells() {
            let (x, y) = geometry.cell_to_pixel(cell_x, cell_y);
            fill_rect_blended(canvas, x, y, shade_size, shade_size, DEBUG_CELL_SHADE);
        }
    }

    let face = FontFace::with_scale(1);
    for cell_y in 0..geometry.height_cells() {
        let (x, y) = geometry.cell_to_pixel(0, cell_y);
        face.draw(
            canvas,
            x + DEBUG_LABEL_INSET,
            y + DEBUG_LABEL_INSET,
            &cell_y.to_string(),
            DEBUG_LABEL_COLOR,
        );
    }
    // (0, 0) already carries its row label.
    for cell_x in 1..geometry.width_cells() {
        let (x, y) = geometry.cell_to_pixel(cell_x, 0);
        face.draw(
            canvas,
            x + DEBUG_LABEL_INSET,
            y + DEBUG_LABEL_INSET,
            &cell_x.to_string(),
            DEBUG_LABEL_COLOR,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use crate::render::font::BuiltinFont;
    use crate::scene::TextColor;
    use image::Rgba;

    const WHITE: [u8; 4] = [255, 255, 255, 255];

    fn geometry() -> GridGeometry {
        GridGeometry::new(16, 160, 160).expect("geometry")
    }

    fn canvas() -> RgbaImage {
        RgbaImage::from_pixel(160, 160, Rgba(WHITE))
    }

    #[test]
    fn notification_paints_banner_at_reserved_cell() {
        let mut assets = MemoryAssets::new();
        assets
            .insert_rgba("gui", RgbaImage::from_pixel(32, 8, Rgba([0, 0, 200, 255])))
            .expect("banner");
        let mut canvas = canvas();
        paint_notification(
            &mut canvas,
            &geometry(),
            &assets,
            &BuiltinFont,
            &RenderConfig::default(),
            "hi",
        )
        .expect("paint");

        assert_eq!(canvas.get_pixel(0, 80).0, [0, 0, 200, 255]);
        assert_eq!(canvas.get_pixel(31, 87).0, [0, 0, 200, 255]);
        assert_eq!(canvas.get_pixel(0, 79).0, WHITE);
        // 'h' has its top-left pixel set; text starts at cell (2, 7).
        assert_eq!(canvas.get_pixel(32, 112).0, [0, 0, 0, 255]);
    }

    #[test]
    fn missing_banner_is_reported_and_canvas_untouched() {
        let assets = MemoryAssets::new();
        let mut canvas = canvas();
        let err = paint_notification(
            &mut canvas,
            &geometry(),
            &assets,
            &BuiltinFont,
            &RenderConfig::default(),
            "hi",
        )
        .expect_err("no banner");
        assert!(matches!(err, RenderError::Banner(_)));
        assert!(canvas.pixels().all(|px| px.0 == WHITE));
    }

    #[test]
    fn labels_paint_in_order_at_their_cells() {
        let labels = vec![
            TextLabel {
                message: "8".to_string(),
                x: 1,
                y: 1,
                size: 5,
                color: TextColor { r: 255, g: 0, b: 0 },
            },
            TextLabel {
                message: "8".to_string(),
                x: 1,
                y: 1,
                size: 5,
                color: TextColor { r: 0, g: 255, b: 0 },
            },
        ];
        let mut canvas = canvas();
        paint_text_labels(&mut canvas, &geometry(), &BuiltinFont, &labels).expect("labels");
        assert_eq!(canvas.get_pixel(16, 16).0, [0, 255, 0, 255]);
    }

    #[test]
    fn zero_size_label_fails_before_painting() {
        let labels = vec![
            TextLabel {
                message: "8".to_string(),
                x: 0,
                y: 0,
                size: 5,
                color: TextColor { r: 255, g: 0, b: 0 },
            },
            TextLabel {
                message: "x".to_string(),
                x: 2,
                y: 2,
                size: 0,
                color: TextColor { r: 255, g: 0, b: 0 },
            },
        ];
        let mut canvas = canvas();
        let err = paint_text_labels(&mut canvas, &geometry(), &BuiltinFont, &labels)
            .expect_err("size 0");
        assert!(matches!(err, RenderError::Font(_)));
        assert!(canvas.pixels().all(|px| px.0 == WHITE));
    }

    #[test]
    fn debug_grid_shades_cells_and_leaves_gutters() {
        let mut canvas = canvas();
        paint_debug_grid(&mut canvas, &geometry());

        let shaded = canvas.get_pixel(20, 20).0;
        assert!(shaded[0] < 255);
        assert_eq!(canvas.get_pixel(15, 40).0, WHITE);
        assert_eq!(canvas.get_pixel(40, 15).0, WHITE);
        // row label "1" on column 0, row 1; glyph '1' has its middle column set
        assert_eq!(canvas.get_pixel(2, 17).0, DEBUG_LABEL_COLOR);
    }
}
