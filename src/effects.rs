use std::time::Duration;

use crate::color::{FoodHue, Rgb, hsv_to_rgb};
use crate::config::FoodAnimation;
use crate::grid::Cell;

pub const PULSE_FRAME: Duration = Duration::from_millis(50);
const PULSE_GROWTH: u32 = 2;
const PULSE_FADE: f64 = 0.9;
const PULSE_MAX_SIZE: u32 = 30;

/// Expanding ring left behind where food was eaten.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pulse {
    pub center: Cell,
    pub size: u32,
    pub intensity: f64,
}

impl Pulse {
    pub fn new(center: Cell, food_size: u32) -> Self {
        Self {
            center,
            size: food_size,
            intensity: 1.0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.size > PULSE_MAX_SIZE
    }

    pub fn advance(&mut self) {
        self.size += PULSE_GROWTH;
        self.intensity *= PULSE_FADE;
    }

    pub fn color(&self, animation: FoodAnimation, hue: FoodHue) -> Rgb {
        match animation {
            FoodAnimation::HueCycle => hsv_to_rgb(hue.value(), self.intensity, 1.0),
            FoodAnimation::Static => Rgb((255.0 * self.intensity) as u8, 0, 0),
        }
    }
}

/// All live pulses. They share one animation timer owned by the session.
#[derive(Debug, Default)]
pub struct Pulses {
    active: Vec<Pulse>,
}

impl Pulses {
    pub fn spawn(&mut self, center: Cell, food_size: u32) {
        let pulse = Pulse::new(center, food_size);
        if !pulse.is_finished() {
            self.active.push(pulse);
        }
    }

    /// Grows every pulse by one frame and drops the ones that are done.
    pub fn advance(&mut self) {
        for pulse in &mut self.active {
            pulse.advance();
        }
        self.active.retain(|p| !p.is_finished());
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pulse> {
        self.active.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_runs_until_it_outgrows_the_limit() {
        let mut pulses = Pulses::default();
        pulses.spawn(Cell::new(0, 0), 12);
        let mut frames = 0;
        while !pulses.is_empty() {
            pulses.advance();
            frames += 1;
        }
        // 12, 14, ... 30 are drawn; 32 ends it
        assert_eq!(frames, 10);
    }

    #[test]
    fn pulse_fades() {
        let mut pulse = Pulse::new(Cell::new(20, 20), 12);
        pulse.advance();
        pulse.advance();
        assert_eq!(pulse.size, 16);
        assert!((pulse.intensity - 0.81).abs() < 1e-9);
        assert_eq!(
            pulse.color(FoodAnimation::Static, FoodHue::default()),
            Rgb(206, 0, 0)
        );
        assert_eq!(
            Pulse::new(Cell::new(0, 0), 12).color(FoodAnimation::HueCycle, FoodHue::default()),
            Rgb(255, 0, 0)
        );
    }

    #[test]
    fn independent_pulses_finish_separately() {
        let mut pulses = Pulses::default();
        pulses.spawn(Cell::new(0, 0), 12);
        for _ in 0..5 {
            pulses.advance();
        }
        pulses.spawn(Cell::new(40, 40), 12);
        for _ in 0..5 {
            pulses.advance();
        }
        let left: Vec<Cell> = pulses.iter().map(|p| p.center).collect();
        assert_eq!(left, vec![Cell::new(40, 40)]);
    }
}
