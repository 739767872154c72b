use anyhow::Result;

use crate::color::Rgb;
use crate::grid::Cell;

/// Drawing layers, bottom to top. Clearing one layer leaves the others alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Background,
    Food,
    Snake,
    Effects,
    Hud,
    Message,
}

impl Layer {
    pub const ALL: [Layer; 6] = [
        Layer::Background,
        Layer::Food,
        Layer::Snake,
        Layer::Effects,
        Layer::Hud,
        Layer::Message,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Bold,
    Italic,
}

/// Point size and style. Text is always centred on its anchor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Font {
    pub size: u32,
    pub style: FontStyle,
}

impl Font {
    pub const fn new(size: u32, style: FontStyle) -> Self {
        Self { size, style }
    }
}

/// Anything that can show a frame. Positions are in world coordinates:
/// origin at the centre of the window, `y` up.
pub trait Renderer {
    fn clear_layer(&mut self, layer: Layer);

    /// Square of side `size` centred on `cell`. With `glow` a slightly
    /// larger translucent halo is drawn underneath.
    fn draw_cell(&mut self, layer: Layer, cell: Cell, size: u32, color: Rgb, glow: bool);

    /// Filled circle of the given diameter.
    fn draw_dot(&mut self, layer: Layer, center: Cell, diameter: u32, color: Rgb);

    fn draw_text(&mut self, layer: Layer, text: &str, position: Cell, font: Font, color: Rgb);

    /// Commits everything drawn so far to the screen.
    fn present(&mut self) -> Result<()>;
}
