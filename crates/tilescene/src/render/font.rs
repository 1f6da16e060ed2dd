use image::RgbaImage;
use thiserror::Error;

use super::raster::blend_pixel;

pub const GLYPH_WIDTH: u32 = 3;
pub const GLYPH_HEIGHT: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FontError {
    #[error("font size {size} cannot be rendered")]
    InvalidSize { size: u32 },
    #[error("font face unavailable: {reason}")]
    Unavailable { reason: String },
}

/// Supplies a face for a requested pixel size.
pub trait FontSource {
    fn face(&self, size: u32) -> Result<FontFace, FontError>;
}

/// The built-in 3x5 ASCII bitmap face, scaled in whole pixels.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFont;

impl FontSource for BuiltinFont {
    fn face(&self, size: u32) -> Result<FontFace, FontError> {
        if size == 0 {
            return Err(FontError::InvalidSize { size });
        }
        let scale = ((size + GLYPH_HEIGHT / 2) / GLYPH_HEIGHT).max(1);
        Ok(FontFace { scale })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontFace {
    scale: u32,
}

impl FontFace {
    pub fn with_scale(scale: u32) -> Self {
        Self {
            scale: scale.max(1),
        }
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn glyph_advance(&self) -> u32 {
        (GLYPH_WIDTH + 1) * self.scale
    }

    pub fn line_height(&self) -> u32 {
        GLYPH_HEIGHT * self.scale
    }

    /// Draws `text` with `(x, y)` as the top-left of the first glyph cell.
    /// Characters outside printable ASCII advance like a space.
    pub fn draw(&self, canvas: &mut RgbaImage, x: i64, y: i64, text: &str, color: [u8; 4]) {
        let scale = i64::from(self.scale);
        let mut pen_x = x;
        for ch in text.chars() {
            if let Some(rows) = glyph_rows(ch) {
                for (row_index, row_bits) in rows.iter().enumerate() {
                    for col in 0..GLYPH_WIDTH {
                        if row_bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                            continue;
                        }
                        let origin_x = pen_x + i64::from(col) * scale;
                        let origin_y = y + row_index as i64 * scale;
                        for sy in 0..scale {
                            for sx in 0..scale {
                                blend_pixel(canvas, origin_x + sx, origin_y + sy, color);
                            }
                        }
                    }
                }
            }
            pen_x += i64::from(self.glyph_advance());
        }
    }
}

fn glyph_rows(ch: char) -> Option<&'static [u8; GLYPH_HEIGHT as usize]> {
    match ch {
        ' '..='~' => ASCII_GLYPHS.get(ch as usize - ' ' as usize),
        _ => None,
    }
}

/// Rows top to bottom, most significant of the low three bits is the left column.
const ASCII_GLYPHS: [[u8; GLYPH_HEIGHT as usize]; 95] = [
    [0b000, 0b000, 0b000, 0b000, 0b000], // ' '
    [0b010, 0b010, 0b010, 0b000, 0b010], // '!'
    [0b101, 0b101, 0b000, 0b000, 0b000], // '"'
    [0b101, 0b111, 0b101, 0b111, 0b101], // '#'
    [0b111, 0b110, 0b111, 0b011, 0b111], // '$'
    [0b101, 0b001, 0b010, 0b100, 0b101], // '%'
    [0b010, 0b101, 0b010, 0b101, 0b011], // '&'
    [0b010, 0b010, 0b000, 0b000, 0b000], // "'"
    [0b001, 0b010, 0b010, 0b010, 0b001], // '('
    [0b100, 0b010, 0b010, 0b010, 0b100], // ')'
    [0b000, 0b101, 0b010, 0b101, 0b000], // '*'
    [0b000, 0b010, 0b111, 0b010, 0b000], // '+'
    [0b000, 0b000, 0b000, 0b010, 0b100], // ','
    [0b000, 0b000, 0b111, 0b000, 0b000], // '-'
    [0b000, 0b000, 0b000, 0b000, 0b010], // '.'
    [0b001, 0b001, 0b010, 0b100, 0b100], // '/'
    [0b111, 0b101, 0b101, 0b101, 0b111], // '0'
    [0b010, 0b110, 0b010, 0b010, 0b111], // '1'
    [0b111, 0b001, 0b111, 0b100, 0b111], // '2'
    [0b111, 0b001, 0b111, 0b001, 0b111], // '3'
    [0b101, 0b101, 0b111, 0b001, 0b001], // '4'
    [0b111, 0b100, 0b111, 0b001, 0b111], // '5'
    [0b111, 0b100, 0b111, 0b101, 0b111], // '6'
    [0b111, 0b001, 0b010, 0b010, 0b010], // '7'
    [0b111, 0b101, 0b111, 0b101, 0b111], // '8'
    [0b111, 0b101, 0b111, 0b001, 0b111], // '9'
    [0b000, 0b010, 0b000, 0b010, 0b000], // ':'
    [0b000, 0b010, 0b000, 0b010, 0b100], // ';'
    [0b001, 0b010, 0b100, 0b010, 0b001], // '<'
    [0b000, 0b111, 0b000, 0b111, 0b000], // '='
    [0b100, 0b010, 0b001, 0b010, 0b100], // '>'
    [0b111, 0b001, 0b011, 0b000, 0b010], // '?'
    [0b111, 0b101, 0b111, 0b100, 0b111], // '@'
    [0b010, 0b101, 0b111, 0b101, 0b101], // 'A'
    [0b110, 0b101, 0b110, 0b101, 0b110], // 'B'
    [0b111, 0b100, 0b100, 0b100, 0b111], // 'C'
    [0b110, 0b101, 0b101, 0b101, 0b110], // 'D'
    [0b111, 0b100, 0b110, 0b100, 0b111], // 'E'
    [0b111, 0b100, 0b110, 0b100, 0b100], // 'F'
    [0b111, 0b100, 0b101, 0b101, 0b111], // 'G'
    [0b101, 0b101, 0b111, 0b101, 0b101], // 'H'
    [0b111, 0b010, 0b010, 0b010, 0b111], // 'I'
    [0b111, 0b001, 0b001, 0b101, 0b111], // 'J'
    [0b101, 0b101, 0b110, 0b101, 0b101], // 'K'
    [0b100, 0b100, 0b100, 0b100, 0b111], // 'L'
    [0b101, 0b111, 0b111, 0b101, 0b101], // 'M'
    [0b101, 0b111, 0b111, 0b111, 0b101], // 'N'
    [0b111, 0b101, 0b101, 0b101, 0b111], // 'O'
    [0b110, 0b101, 0b110, 0b100, 0b100], // 'P'
    [0b111, 0b101, 0b101, 0b111, 0b001], // 'Q'
    [0b110, 0b101, 0b110, 0b101, 0b101], // 'R'
    [0b111, 0b100, 0b111, 0b001, 0b111], // 'S'
    [0b111, 0b010, 0b010, 0b010, 0b010], // 'T'
    [0b101, 0b101, 0b101, 0b101, 0b111], // 'U'
    [0b101, 0b101, 0b101, 0b101, 0b010], // 'V'
    [0b101, 0b101, 0b111, 0b111, 0b101], // 'W'
    [0b101, 0b101, 0b010, 0b101, 0b101], // 'X'
    [0b101, 0b101, 0b010, 0b010, 0b010], // 'Y'
    [0b111, 0b001, 0b010, 0b100, 0b111], // 'Z'
    [0b110, 0b100, 0b100, 0b100, 0b110], // '['
    [0b100, 0b100, 0b010, 0b001, 0b001], // '\\'
    [0b011, 0b001, 0b001, 0b001, 0b011], // ']'
    [0b010, 0b101, 0b000, 0b000, 0b000], // '^'
    [0b000, 0b000, 0b000, 0b000, 0b111], // '_'
    [0b100, 0b010, 0b000, 0b000, 0b000], // '`'
    [0b000, 0b111, 0b001, 0b111, 0b111], // 'a'
    [0b100, 0b100, 0b110, 0b101, 0b110], // 'b'
    [0b000, 0b111, 0b100, 0b100, 0b111], // 'c'
    [0b001, 0b001, 0b111, 0b101, 0b111], // 'd'
    [0b000, 0b111, 0b110, 0b100, 0b111], // 'e'
    [0b011, 0b100, 0b110, 0b100, 0b100], // 'f'
    [0b000, 0b111, 0b101, 0b111, 0b001], // 'g'
    [0b100, 0b100, 0b110, 0b101, 0b101], // 'h'
    [0b010, 0b000, 0b010, 0b010, 0b010], // 'i'
    [0b001, 0b000, 0b001, 0b101, 0b010], // 'j'
    [0b100, 0b101, 0b110, 0b101, 0b101], // 'k'
    [0b100, 0b100, 0b100, 0b100, 0b111], // 'l'
    [0b000, 0b110, 0b111, 0b101, 0b101], // 'm'
    [0b000, 0b110, 0b101, 0b101, 0b101], // 'n'
    [0b000, 0b111, 0b101, 0b101, 0b111], // 'o'
    [0b000, 0b110, 0b101, 0b110, 0b100], // 'p'
    [0b000, 0b111, 0b101, 0b111, 0b001], // 'q'
    [0b000, 0b110, 0b101, 0b100, 0b100], // 'r'
    [0b000, 0b111, 0b110, 0b001, 0b111], // 's'
    [0b010, 0b111, 0b010, 0b010, 0b011], // 't'
    [0b000, 0b101, 0b101, 0b101, 0b111], // 'u'
    [0b000, 0b101, 0b101, 0b101, 0b010], // 'v'
    [0b000, 0b101, 0b101, 0b111, 0b010], // 'w'
    [0b000, 0b101, 0b010, 0b010, 0b101], // 'x'
    [0b000, 0b101, 0b101, 0b111, 0b001], // 'y'
    [0b000, 0b111, 0b001, 0b010, 0b111], // 'z'
    [0b011, 0b010, 0b110, 0b010, 0b011], // '{'
    [0b010, 0b010, 0b010, 0b010, 0b010], // '|'
    [0b110, 0b010, 0b011, 0b010, 0b110], // '}'
    [0b000, 0b011, 0b110, 0b000, 0b000], // '~'
];

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const INK: [u8; 4] = [255, 0, 0, 255];

    fn inked(canvas: &RgbaImage) -> usize {
        canvas.pixels().filter(|px| px.0 == INK).count()
    }

    #[test]
    fn glyph_table_covers_printable_ascii() {
        for code in 32u8..=126 {
            assert!(glyph_rows(char::from(code)).is_some(), "code={code}");
        }
        assert!(glyph_rows('\u{7f}').is_none());
        assert!(glyph_rows('é').is_none());
    }

    #[test]
    fn builtin_face_scales_with_size() {
        assert_eq!(BuiltinFont.face(1).expect("face").scale(), 1);
        assert_eq!(BuiltinFont.face(5).expect("face").scale(), 1);
        assert_eq!(BuiltinFont.face(10).expect("face").scale(), 2);
        assert_eq!(BuiltinFont.face(15).expect("face").scale(), 3);
        assert_eq!(
            BuiltinFont.face(0),
            Err(FontError::InvalidSize { size: 0 })
        );
    }

    #[test]
    fn draws_glyph_bits_at_origin() {
        let mut canvas = RgbaImage::new(8, 8);
        FontFace::with_scale(1).draw(&mut canvas, 1, 1, "I", INK);
        // 'I' is a full top bar, a stem, and a full bottom bar.
        assert_eq!(canvas.get_pixel(1, 1).0, INK);
        assert_eq!(canvas.get_pixel(3, 1).0, INK);
        assert_eq!(canvas.get_pixel(2, 3).0, INK);
        assert_eq!(canvas.get_pixel(1, 3).0, [0, 0, 0, 0]);
        assert_eq!(inked(&canvas), 9);
    }

    #[test]
    fn scale_multiplies_inked_area() {
        let mut small = RgbaImage::new(16, 16);
        let mut large = RgbaImage::new(16, 16);
        FontFace::with_scale(1).draw(&mut small, 0, 0, "7", INK);
        FontFace::with_scale(2).draw(&mut large, 0, 0, "7", INK);
        assert_eq!(inked(&large), inked(&small) * 4);
    }

    #[test]
    fn unknown_characters_draw_nothing_but_advance() {
        let mut canvas = RgbaImage::from_pixel(16, 8, Rgba([0, 0, 0, 0]));
        FontFace::with_scale(1).draw(&mut canvas, 0, 0, "\u{1f642}.", INK);
        assert_eq!(canvas.get_pixel(1, 4).0, [0, 0, 0, 0]);
        assert_eq!(canvas.get_pixel(5, 4).0, INK);
    }

    #[test]
    fn clipped_text_is_safe() {
        let mut canvas = RgbaImage::new(4, 4);
        FontFace::with_scale(3).draw(&mut canvas, -5, -5, "FARM", INK);
        FontFace::with_scale(3).draw(&mut canvas, 64, 64, "FARM", INK);
        let mut empty = RgbaImage::new(0, 0);
        FontFace::with_scale(1).draw(&mut empty, 0, 0, "x", INK);
    }
}
