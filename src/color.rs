use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn from_hex(hex: u32) -> Self {
        Self((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }
}

pub const DEFAULT_PALETTE: [Rgb; 4] = [
    Rgb(46, 204, 113),
    Rgb(52, 152, 219),
    Rgb(155, 89, 182),
    Rgb(52, 73, 94),
];

fn lerp_channel(from: u8, to: u8, frac: f64) -> u8 {
    (from as f64 + (to as f64 - from as f64) * frac) as u8
}

/// Colour of segment `index` out of `total`, spread piecewise-linearly over
/// the palette from tail (index 0) to head.
pub fn segment_color(index: usize, total: usize, palette: &[Rgb]) -> Rgb {
    assert!(!palette.is_empty(), "palette must have at least one colour");
    let last = palette.len() - 1;
    let position = index as f64 / total as f64 * last as f64;
    let lo = (position as usize).min(last);
    let hi = (lo + 1).min(last);
    let frac = position - lo as f64;

    let (a, b) = (palette[lo], palette[hi]);
    Rgb(
        lerp_channel(a.0, b.0, frac),
        lerp_channel(a.1, b.1, frac),
        lerp_channel(a.2, b.2, frac),
    )
}

/// HSV to RGB with every component in `[0, 1]`.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let to_byte = |c: f64| (c * 255.0) as u8;
    if s == 0.0 {
        return Rgb(to_byte(v), to_byte(v), to_byte(v));
    }
    let sector = (h * 6.0).floor();
    let f = h * 6.0 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    let (r, g, b) = match (sector as i64).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgb(to_byte(r), to_byte(g), to_byte(b))
}

const HUE_STEP: f64 = 0.01;

/// Hue of the animated food, advanced once per running tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FoodHue(f64);

impl FoodHue {
    pub fn advance(&mut self) {
        self.0 += HUE_STEP;
        if self.0 > 1.0 {
            self.0 = 0.0;
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn body(&self) -> Rgb {
        hsv_to_rgb(self.0, 1.0, 1.0)
    }

    pub fn glow(&self) -> Rgb {
        hsv_to_rgb(self.0, 0.3, 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn first_segment_uses_first_anchor() {
        assert_eq!(segment_color(0, 3, &DEFAULT_PALETTE), DEFAULT_PALETTE[0]);
    }

    #[test]
    fn midpoint_interpolates_between_anchors() {
        // 1/3 of the way is exactly the second anchor for a 4 colour palette
        assert_eq!(segment_color(1, 3, &DEFAULT_PALETTE), DEFAULT_PALETTE[1]);
        // 1/6 of the way is halfway between anchors 0 and 1, truncated
        assert_eq!(segment_color(1, 6, &DEFAULT_PALETTE), Rgb(49, 178, 166));
    }

    #[test]
    fn single_colour_palette() {
        let palette = [Rgb(1, 2, 3)];
        assert_eq!(segment_color(5, 9, &palette), Rgb(1, 2, 3));
    }

    #[test]
    fn hsv_primaries() {
        assert_eq!(hsv_to_rgb(0.0, 1.0, 1.0), Rgb(255, 0, 0));
        assert_eq!(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0), Rgb(0, 255, 0));
        assert_eq!(hsv_to_rgb(2.0 / 3.0, 1.0, 1.0), Rgb(0, 0, 255));
        assert_eq!(hsv_to_rgb(0.5, 0.0, 0.5), Rgb(127, 127, 127));
    }

    #[test]
    fn food_hue_wraps_after_one() {
        let mut hue = FoodHue(0.5);
        hue.advance();
        assert!((hue.value() - 0.51).abs() < 1e-9);

        let mut hue = FoodHue(0.995);
        hue.advance();
        assert_eq!(hue.value(), 0.0);

        let mut hue = FoodHue::default();
        for _ in 0..250 {
            hue.advance();
            assert!((0.0..=1.0).contains(&hue.value()));
        }
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(Rgb::from_hex(0xe74c3c), Rgb(0xe7, 0x4c, 0x3c));
    }

    proptest! {
        #[test]
        fn last_segment_approaches_last_anchor(total in 200usize..5000) {
            let color = segment_color(total - 1, total, &DEFAULT_PALETTE);
            let last = DEFAULT_PALETTE[3];
            prop_assert!((color.0 as i32 - last.0 as i32).abs() <= 2);
            prop_assert!((color.1 as i32 - last.1 as i32).abs() <= 2);
            prop_assert!((color.2 as i32 - last.2 as i32).abs() <= 2);
        }
    }
}
