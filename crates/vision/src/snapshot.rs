//! Snapshot capture: annotate a frame with one detection and encode it.
//!
//! The capturer owns a single off-screen surface that is reused across
//! captures — never reallocated. Each capture blits the frame, draws the
//! stroke rectangle and the upper-cased label, encodes the surface into a
//! data URL, then clears the surface so nothing bleeds into the next call.
//! Exclusive access is enforced by `&mut self`; encoding always completes
//! before the surface is reset.

use std::io::Cursor;

use base64::Engine as _;
use image::imageops::FilterType;
use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use invigil_common::error::{InvigilError, InvigilResult};
use invigil_model::{AnnotationColor, BoundingBox, ImageEncoding};

use crate::frame::VideoFrame;

/// Stroke width of the annotation rectangle, in pixels.
const STROKE_WIDTH: i32 = 2;
/// Vertical gap between the label text and the region's top edge.
const LABEL_RAISE: i32 = 8;
/// Pixel scale applied to the 5x7 label font.
const LABEL_SCALE: i32 = 2;

/// Annotates frames onto a persistent reusable surface and encodes them.
pub struct SnapshotCapturer {
    surface: RgbImage,
    encoding: ImageEncoding,
    color: Rgb<u8>,
}

impl SnapshotCapturer {
    pub fn new(width: u32, height: u32, encoding: ImageEncoding, color: AnnotationColor) -> Self {
        Self {
            surface: RgbImage::new(width, height),
            encoding,
            color: Rgb(color.rgb()),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.surface.dimensions()
    }

    /// Render `frame` plus one annotation and return it as a data URL.
    pub fn capture(
        &mut self,
        frame: &VideoFrame,
        region: &BoundingBox,
        label: &str,
    ) -> InvigilResult<String> {
        self.blit(frame);
        self.draw_region(region);
        self.draw_label(label, region);
        let encoded = self.encode()?;
        // Reset for the next capture; the surface itself is kept.
        self.surface.fill(0);
        Ok(encoded)
    }

    fn blit(&mut self, frame: &VideoFrame) {
        let src = frame.pixels();
        if src.dimensions() == self.surface.dimensions() {
            self.surface.copy_from_slice(src.as_raw());
        } else {
            let (width, height) = self.surface.dimensions();
            let resized = image::imageops::resize(src, width, height, FilterType::Nearest);
            self.surface.copy_from_slice(resized.as_raw());
        }
    }

    fn draw_region(&mut self, region: &BoundingBox) {
        let rect = Rect::at(region.x as i32, region.y as i32).of_size(
            region.width.max(1.0) as u32,
            region.height.max(1.0) as u32,
        );
        for offset in 0..STROKE_WIDTH {
            let expanded = Rect::at(rect.left() - offset, rect.top() - offset).of_size(
                rect.width() + (offset * 2) as u32,
                rect.height() + (offset * 2) as u32,
            );
            draw_hollow_rect_mut(&mut self.surface, expanded, self.color);
        }
    }

    fn draw_label(&mut self, label: &str, region: &BoundingBox) {
        let text = label.to_uppercase();
        let x = region.x as i32;
        let y = region.y as i32 - LABEL_RAISE - 7 * LABEL_SCALE;
        draw_text(&mut self.surface, &text, x, y, LABEL_SCALE, self.color);
    }

    fn encode(&self) -> InvigilResult<String> {
        let format = match self.encoding {
            ImageEncoding::Jpeg => ImageFormat::Jpeg,
            ImageEncoding::Png => ImageFormat::Png,
        };
        let mut bytes = Vec::new();
        self.surface
            .write_to(&mut Cursor::new(&mut bytes), format)
            .map_err(|e| InvigilError::snapshot(format!("failed to encode snapshot: {e}")))?;
        let payload = base64::engine::general_purpose::STANDARD.encode(&bytes);
        Ok(format!("data:{};base64,{}", self.encoding.mime(), payload))
    }
}

/// Render `text` with the built-in 5x7 bitmap font. No font assets needed;
/// pixels outside the surface are clipped.
fn draw_text(img: &mut RgbImage, text: &str, x: i32, y: i32, scale: i32, color: Rgb<u8>) {
    let advance = 6 * scale; // 5 glyph columns + 1 spacing column
    for (index, ch) in text.chars().enumerate() {
        let pattern = glyph(ch);
        let origin_x = x + index as i32 * advance;
        for (row, bits) in pattern.iter().enumerate() {
            for col in 0..5i32 {
                if (bits >> (4 - col)) & 1 == 0 {
                    continue;
                }
                for dy in 0..scale {
                    for dx in 0..scale {
                        let px = origin_x + col * scale + dx;
                        let py = y + row as i32 * scale + dy;
                        if px >= 0
                            && py >= 0
                            && (px as u32) < img.width()
                            && (py as u32) < img.height()
                        {
                            img.put_pixel(px as u32, py as u32, color);
                        }
                    }
                }
            }
        }
    }
}

/// 5x7 bitmap for one character, one row per byte, bit 4 = leftmost column.
fn glyph(ch: char) -> [u8; 7] {
    match ch.to_ascii_uppercase() {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        ' ' => [0b00000; 7],
        // Box for unknown characters
        _ => [0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;

    fn decode_data_url(url: &str, mime: &str) -> RgbImage {
        let prefix = format!("data:{mime};base64,");
        let payload = url.strip_prefix(&prefix).expect("data URL prefix");
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .expect("valid base64");
        image::load_from_memory(&bytes).expect("decodable image").to_rgb8()
    }

    #[test]
    fn test_capture_returns_data_url() {
        let mut capturer = SnapshotCapturer::new(
            64,
            48,
            ImageEncoding::Jpeg,
            AnnotationColor::default(),
        );
        let frame = VideoFrame::solid(64, 48, [50, 50, 50]);
        let url = capturer
            .capture(&frame, &BoundingBox::new(10.0, 10.0, 20.0, 20.0), "person")
            .unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
    }

    #[test]
    fn test_region_stroke_uses_annotation_color() {
        let color: AnnotationColor = "red".parse().unwrap();
        let mut capturer = SnapshotCapturer::new(64, 48, ImageEncoding::Png, color);
        let frame = VideoFrame::solid(64, 48, [0, 0, 0]);
        let url = capturer
            .capture(&frame, &BoundingBox::new(10.0, 10.0, 20.0, 20.0), "book")
            .unwrap();

        let decoded = decode_data_url(&url, "image/png");
        // Top-left corner of the stroke rectangle.
        assert_eq!(decoded.get_pixel(10, 10), &Rgb([255, 0, 0]));
        // Well inside the rectangle, the frame shows through.
        assert_eq!(decoded.get_pixel(20, 20), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_no_bleed_between_captures() {
        let color: AnnotationColor = "red".parse().unwrap();
        let mut capturer = SnapshotCapturer::new(128, 96, ImageEncoding::Png, color);
        let frame = VideoFrame::solid(128, 96, [0, 0, 0]);

        capturer
            .capture(&frame, &BoundingBox::new(10.0, 30.0, 20.0, 20.0), "person")
            .unwrap();
        let second = capturer
            .capture(&frame, &BoundingBox::new(90.0, 60.0, 20.0, 20.0), "laptop")
            .unwrap();

        let decoded = decode_data_url(&second, "image/png");
        // The first capture's stroke location must be clean black again.
        assert_eq!(decoded.get_pixel(10, 30), &Rgb([0, 0, 0]));
        // The second capture's stroke is present.
        assert_eq!(decoded.get_pixel(90, 60), &Rgb([255, 0, 0]));
    }

    #[test]
    fn test_mismatched_frame_is_resized_onto_surface() {
        let mut capturer = SnapshotCapturer::new(
            64,
            48,
            ImageEncoding::Png,
            AnnotationColor::default(),
        );
        let frame = VideoFrame::solid(128, 96, [7, 8, 9]);
        let url = capturer
            .capture(&frame, &BoundingBox::new(2.0, 40.0, 4.0, 4.0), "person")
            .unwrap();
        let decoded = decode_data_url(&url, "image/png");
        assert_eq!(decoded.dimensions(), (64, 48));
        assert_eq!(decoded.get_pixel(40, 10), &Rgb([7, 8, 9]));
    }
}
