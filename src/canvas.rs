use anyhow::{Context, Result};
use pixels::Pixels;

use crate::color::Rgb;
use crate::grid::Cell;
use crate::render::{Font, FontStyle, Layer, Renderer};

pub const BACKGROUND: Rgb = Rgb::from_hex(0x1a1a1a);
const GLOW_ALPHA: u8 = 90;
const GLOW_SCALE: f64 = 1.1;
const GLYPH_COLS: i32 = 5;
const GLYPH_ROWS: i32 = 7;

/// RGBA8 frame with world-to-screen mapping: world origin at the centre,
/// `y` up; screen origin top-left, `y` down.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        assert_eq!(frame.len(), (width * height * 4) as usize, "frame size mismatch");
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn to_screen(&self, p: Cell) -> (i32, i32) {
        (p.x + (self.width / 2) as i32, (self.height / 2) as i32 - p.y)
    }

    pub fn clear(&mut self, color: Rgb) {
        for px in self.frame.chunks_exact_mut(4) {
            px[0] = color.0;
            px[1] = color.1;
            px[2] = color.2;
            px[3] = 255;
        }
    }

    #[cfg(test)]
    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        let idx = ((y * self.width + x) * 4) as usize;
        Rgb(self.frame[idx], self.frame[idx + 1], self.frame[idx + 2])
    }

    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgb, alpha: u8) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = ((y as u32 * self.width + x as u32) * 4) as usize;
        let a = alpha as u16;
        let ia = 255 - a;
        let px = &mut self.frame[idx..idx + 4];
        px[0] = ((color.0 as u16 * a + px[0] as u16 * ia) / 255) as u8;
        px[1] = ((color.1 as u16 * a + px[1] as u16 * ia) / 255) as u8;
        px[2] = ((color.2 as u16 * a + px[2] as u16 * ia) / 255) as u8;
        px[3] = 255;
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb, alpha: u8) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.width as i32);
        let y1 = (y + h).min(self.height as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_pixel(px, py, color, alpha);
            }
        }
    }

    /// Square of side `size` centred on a world position.
    pub fn fill_square(&mut self, center: Cell, size: u32, color: Rgb, alpha: u8) {
        let (cx, cy) = self.to_screen(center);
        let side = size as i32;
        self.fill_rect(cx - side / 2, cy - side / 2, side, side, color, alpha);
    }

    pub fn fill_circle(&mut self, center: Cell, diameter: u32, color: Rgb, alpha: u8) {
        let (cx, cy) = self.to_screen(center);
        let r = diameter as f64 / 2.0;
        let reach = r.ceil() as i32;
        for py in cy - reach..=cy + reach {
            for px in cx - reach..=cx + reach {
                let dx = px as f64 + 0.5 - cx as f64;
                let dy = py as f64 + 0.5 - cy as f64;
                if dx * dx + dy * dy <= r * r {
                    self.blend_pixel(px, py, color, alpha);
                }
            }
        }
    }

    /// Renders `text` centred on `anchor`, sitting on top of it.
    pub fn draw_text(&mut self, text: &str, anchor: Cell, font: Font, color: Rgb) {
        let scale = glyph_scale(font.size);
        let (ax, ay) = self.to_screen(anchor);
        let mut x = ax - text_width(text, font) / 2;
        let top = ay - GLYPH_ROWS * scale;
        for ch in text.chars() {
            self.draw_char(ch, x, top, scale, font.style, color);
            x += advance(scale);
        }
    }

    fn draw_char(&mut self, ch: char, x: i32, y: i32, scale: i32, style: FontStyle, color: Rgb) {
        let Some(rows) = glyph_5x7(ch) else {
            return;
        };
        for (ry, row) in rows.iter().enumerate() {
            let ry = ry as i32;
            let slant = match style {
                FontStyle::Italic => (GLYPH_ROWS - 1 - ry) * scale / 3,
                FontStyle::Normal | FontStyle::Bold => 0,
            };
            for rx in 0..GLYPH_COLS {
                if (row >> (GLYPH_COLS - 1 - rx)) & 1 == 0 {
                    continue;
                }
                let px = x + rx * scale + slant;
                let py = y + ry * scale;
                self.fill_rect(px, py, scale, scale, color, 255);
                if style == FontStyle::Bold {
                    self.fill_rect(px + 1, py, scale, scale, color, 255);
                }
            }
        }
    }
}

fn glyph_scale(size: u32) -> i32 {
    ((size as i32 + 2) / 8).max(1)
}

fn advance(scale: i32) -> i32 {
    (GLYPH_COLS + 1) * scale
}

pub fn text_width(text: &str, font: Font) -> i32 {
    text.chars().count() as i32 * advance(glyph_scale(font.size))
}

fn glyph_5x7(ch: char) -> Option<[u8; 7]> {
    let c = ch.to_ascii_uppercase();
    Some(match c {
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b11110, 0b10001, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'E' => [0b11111, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01110],
        'H' => [0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001, 0b10001],
        'I' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b11111],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b10010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b11011, 0b10001],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        ':' => [0b00000, 0b00100, 0b00000, 0b00000, 0b00100, 0b00000, 0b00000],
        '+' => [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '|' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '/' => [0b00001, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b10000],
        '(' => [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010],
        ')' => [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        ',' => [0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b00100, 0b01000],
        ' ' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00000],
        _ => return None,
    })
}

#[derive(Clone, Debug, PartialEq)]
enum Shape {
    Square {
        center: Cell,
        size: u32,
        color: Rgb,
        glow: bool,
    },
    Dot {
        center: Cell,
        diameter: u32,
        color: Rgb,
    },
    Text {
        text: String,
        anchor: Cell,
        font: Font,
        color: Rgb,
    },
}

/// Retained display list per layer, rasterized bottom to top on present.
#[derive(Debug, Default)]
pub struct LayerStack {
    layers: [Vec<Shape>; Layer::ALL.len()],
}

impl LayerStack {
    pub fn clear(&mut self, layer: Layer) {
        self.layers[layer.index()].clear();
    }

    fn push(&mut self, layer: Layer, shape: Shape) {
        self.layers[layer.index()].push(shape);
    }

    #[cfg(test)]
    pub fn len(&self, layer: Layer) -> usize {
        self.layers[layer.index()].len()
    }

    pub fn rasterize(&self, canvas: &mut Canvas<'_>) {
        canvas.clear(BACKGROUND);
        for shape in self.layers.iter().flatten() {
            match shape {
                Shape::Square {
                    center,
                    size,
                    color,
                    glow,
                } => {
                    if *glow {
                        let halo = (*size as f64 * GLOW_SCALE).round() as u32;
                        canvas.fill_square(*center, halo, *color, GLOW_ALPHA);
                    }
                    canvas.fill_square(*center, *size, *color, 255);
                }
                Shape::Dot {
                    center,
                    diameter,
                    color,
                } => canvas.fill_circle(*center, *diameter, *color, 255),
                Shape::Text {
                    text,
                    anchor,
                    font,
                    color,
                } => canvas.draw_text(text, *anchor, *font, *color),
            }
        }
    }
}

impl Renderer for LayerStack {
    fn clear_layer(&mut self, layer: Layer) {
        self.clear(layer);
    }

    fn draw_cell(&mut self, layer: Layer, cell: Cell, size: u32, color: Rgb, glow: bool) {
        self.push(
            layer,
            Shape::Square {
                center: cell,
                size,
                color,
                glow,
            },
        );
    }

    fn draw_dot(&mut self, layer: Layer, center: Cell, diameter: u32, color: Rgb) {
        self.push(
            layer,
            Shape::Dot {
                center,
                diameter,
                color,
            },
        );
    }

    fn draw_text(&mut self, layer: Layer, text: &str, position: Cell, font: Font, color: Rgb) {
        self.push(
            layer,
            Shape::Text {
                text: text.to_string(),
                anchor: position,
                font,
                color,
            },
        );
    }

    fn present(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Window renderer backed by a `pixels` surface.
pub struct PixelsRenderer {
    pixels: Pixels,
    width: u32,
    height: u32,
    stack: LayerStack,
}

impl PixelsRenderer {
    pub fn new(pixels: Pixels, width: u32, height: u32) -> Self {
        Self {
            pixels,
            width,
            height,
            stack: LayerStack::default(),
        }
    }
}

impl Renderer for PixelsRenderer {
    fn clear_layer(&mut self, layer: Layer) {
        self.stack.clear_layer(layer);
    }

    fn draw_cell(&mut self, layer: Layer, cell: Cell, size: u32, color: Rgb, glow: bool) {
        self.stack.draw_cell(layer, cell, size, color, glow);
    }

    fn draw_dot(&mut self, layer: Layer, center: Cell, diameter: u32, color: Rgb) {
        self.stack.draw_dot(layer, center, diameter, color);
    }

    fn draw_text(&mut self, layer: Layer, text: &str, position: Cell, font: Font, color: Rgb) {
        self.stack.draw_text(layer, text, position, font, color);
    }

    fn present(&mut self) -> Result<()> {
        let mut canvas = Canvas::new(self.pixels.frame_mut(), self.width, self.height);
        self.stack.rasterize(&mut canvas);
        self.pixels.render().context("presenting frame")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: u32 = 40;
    const H: u32 = 30;

    fn frame() -> Vec<u8> {
        vec![0; (W * H * 4) as usize]
    }

    #[test]
    fn world_origin_is_screen_centre() {
        let mut buf = frame();
        let canvas = Canvas::new(&mut buf, W, H);
        assert_eq!(canvas.to_screen(Cell::new(0, 0)), (20, 15));
        assert_eq!(canvas.to_screen(Cell::new(-20, 15)), (0, 0));
        assert_eq!(canvas.to_screen(Cell::new(5, -5)), (25, 20));
    }

    #[test]
    fn opaque_and_half_blend() {
        let mut buf = frame();
        let mut canvas = Canvas::new(&mut buf, W, H);
        canvas.clear(Rgb(0, 0, 0));
        canvas.blend_pixel(1, 1, Rgb(200, 100, 50), 255);
        assert_eq!(canvas.pixel(1, 1), Rgb(200, 100, 50));
        canvas.blend_pixel(2, 2, Rgb(255, 255, 255), 128);
        assert_eq!(canvas.pixel(2, 2), Rgb(128, 128, 128));
        // off-screen writes are dropped
        canvas.blend_pixel(-1, 0, Rgb(255, 0, 0), 255);
        canvas.blend_pixel(0, H as i32, Rgb(255, 0, 0), 255);
    }

    #[test]
    fn squares_are_clipped_at_the_edge() {
        let mut buf = frame();
        let mut canvas = Canvas::new(&mut buf, W, H);
        canvas.clear(BACKGROUND);
        canvas.fill_square(Cell::new(20, 0), 10, Rgb(0, 255, 0), 255);
        assert_eq!(canvas.pixel(W - 1, 15), Rgb(0, 255, 0));
        assert_eq!(canvas.pixel(34, 15), BACKGROUND);
    }

    #[test]
    fn circle_covers_its_centre_only() {
        let mut buf = frame();
        let mut canvas = Canvas::new(&mut buf, W, H);
        canvas.clear(BACKGROUND);
        canvas.fill_circle(Cell::new(0, 0), 6, Rgb(255, 0, 0), 255);
        assert_eq!(canvas.pixel(20, 15), Rgb(255, 0, 0));
        assert_eq!(canvas.pixel(17, 12), BACKGROUND);
        assert_eq!(canvas.pixel(26, 15), BACKGROUND);
    }

    #[test]
    fn text_is_centred() {
        let font = Font::new(12, FontStyle::Normal);
        assert_eq!(text_width("PAUSED", font), 36);
        assert_eq!(text_width("PAUSED", Font::new(24, FontStyle::Bold)), 108);

        let mut buf = frame();
        let mut canvas = Canvas::new(&mut buf, W, H);
        canvas.clear(BACKGROUND);
        canvas.draw_text("I", Cell::new(0, 0), font, Rgb(255, 255, 255));
        // 'I' starts 3 px left of centre; its top bar spans the full width
        assert_eq!(canvas.pixel(17, 8), Rgb(255, 255, 255));
        assert_eq!(canvas.pixel(21, 8), Rgb(255, 255, 255));
        assert_eq!(canvas.pixel(22, 8), BACKGROUND);
    }

    #[test]
    fn unknown_glyphs_are_blank() {
        assert!(glyph_5x7('#').is_none());
        assert_eq!(glyph_5x7('a'), glyph_5x7('A'));
    }

    #[test]
    fn layers_stack_in_order() {
        let mut stack = LayerStack::default();
        stack.draw_cell(Layer::Snake, Cell::new(0, 0), 4, Rgb(0, 0, 255), false);
        stack.draw_dot(Layer::Food, Cell::new(0, 0), 4, Rgb(255, 0, 0));
        assert_eq!(stack.len(Layer::Snake), 1);

        let mut buf = frame();
        let mut canvas = Canvas::new(&mut buf, W, H);
        stack.rasterize(&mut canvas);
        // the snake layer sits above the food layer
        assert_eq!(canvas.pixel(20, 15), Rgb(0, 0, 255));

        stack.clear_layer(Layer::Snake);
        stack.rasterize(&mut canvas);
        assert_eq!(canvas.pixel(20, 15), Rgb(255, 0, 0));
        assert_eq!(stack.len(Layer::Snake), 0);
        assert_eq!(stack.len(Layer::Food), 1);
    }

    #[test]
    fn glow_leaves_a_halo() {
        let mut stack = LayerStack::default();
        stack.draw_cell(Layer::Snake, Cell::new(0, 0), 20, Rgb(255, 255, 255), true);
        let mut buf = vec![0; (60 * 60 * 4) as usize];
        let mut canvas = Canvas::new(&mut buf, 60, 60);
        stack.rasterize(&mut canvas);
        assert_eq!(canvas.pixel(30, 30), Rgb(255, 255, 255));
        let halo = canvas.pixel(19, 30);
        assert!(halo != BACKGROUND && halo != Rgb(255, 255, 255));
        assert_eq!(canvas.pixel(18, 30), BACKGROUND);
    }
}
