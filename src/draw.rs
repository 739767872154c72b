use crate::color::{Rgb, segment_color};
use crate::config::{Config, FoodAnimation};
use crate::game::Phase;
use crate::grid::Cell;
use crate::input::INSTRUCTIONS;
use crate::render::{Font, FontStyle, Layer, Renderer};
use crate::session::Session;

const GRID_DOT_SPACING: usize = 40;
const GRID_DOT_COLOR: Rgb = Rgb::from_hex(0x2c3e50);
const CREDITS_COLOR: Rgb = Rgb::from_hex(0x666666);
const TEXT_COLOR: Rgb = Rgb::from_hex(0xecf0f1);
const INSTRUCTIONS_COLOR: Rgb = Rgb::from_hex(0xbdc3c7);
const STATIC_FOOD_COLOR: Rgb = Rgb::from_hex(0xe74c3c);

struct Banner {
    text: &'static str,
    y: i32,
    size: u32,
    color: Rgb,
}

fn banner(phase: Phase) -> Option<Banner> {
    match phase {
        Phase::Running => None,
        Phase::NotStarted => Some(Banner {
            text: "Press SPACE to Start!",
            y: 50,
            size: 20,
            color: Rgb::from_hex(0x2ecc71),
        }),
        Phase::Paused => Some(Banner {
            text: "PAUSED",
            y: 50,
            size: 20,
            color: Rgb::from_hex(0xf1c40f),
        }),
        Phase::GameOver => Some(Banner {
            text: "GAME OVER!",
            y: 0,
            size: 24,
            color: STATIC_FOOD_COLOR,
        }),
    }
}

/// Static backdrop: a sparse dot grid and the optional credits line.
pub fn draw_background(config: &Config, renderer: &mut impl Renderer) {
    renderer.clear_layer(Layer::Background);
    let (half_w, half_h) = ((config.width / 2) as i32, (config.height / 2) as i32);
    for x in (-half_w..half_w).step_by(GRID_DOT_SPACING) {
        for y in (-half_h..half_h).step_by(GRID_DOT_SPACING) {
            renderer.draw_dot(Layer::Background, Cell::new(x, y), 2, GRID_DOT_COLOR);
        }
    }
    if let Some(credits) = &config.credits {
        renderer.draw_text(
            Layer::Background,
            credits,
            Cell::new(0, -half_h + 10),
            Font::new(10, FontStyle::Italic),
            CREDITS_COLOR,
        );
    }
}

pub fn score_line<R>(session: &Session<R>) -> String {
    let game = &session.game;
    format!(
        "Score: {}  |  High Score: {}  |  Speed: {}",
        game.score, game.high_score, game.speed
    )
}

/// Redraws every dynamic layer from the session state.
pub fn draw_frame<R>(session: &Session<R>, renderer: &mut impl Renderer) {
    let config = &session.config;
    let game = &session.game;
    let half_h = (config.height / 2) as i32;

    renderer.clear_layer(Layer::Food);
    match config.food_animation {
        FoodAnimation::HueCycle => {
            for ring in 0..3 {
                let diameter = config.food_size as f64 * (1.5 - ring as f64 * 0.2);
                renderer.draw_dot(Layer::Food, game.food, diameter as u32, game.food_hue.glow());
            }
            renderer.draw_dot(Layer::Food, game.food, config.food_size, game.food_hue.body());
        }
        FoodAnimation::Static => {
            renderer.draw_dot(Layer::Food, game.food, config.food_size, STATIC_FOOD_COLOR);
        }
    }

    renderer.clear_layer(Layer::Snake);
    let total = game.snake.len();
    for (i, &cell) in game.snake.iter().enumerate() {
        let color = segment_color(i, total, &config.palette);
        renderer.draw_cell(Layer::Snake, cell, game.step as u32, color, true);
    }

    renderer.clear_layer(Layer::Effects);
    for pulse in session.pulses.iter() {
        let color = pulse.color(config.food_animation, game.food_hue);
        renderer.draw_dot(Layer::Effects, pulse.center, pulse.size, color);
    }

    renderer.clear_layer(Layer::Hud);
    renderer.draw_text(
        Layer::Hud,
        &score_line(session),
        Cell::new(0, half_h - 40),
        Font::new(16, FontStyle::Bold),
        TEXT_COLOR,
    );
    renderer.draw_text(
        Layer::Hud,
        INSTRUCTIONS,
        Cell::new(0, -half_h + 30),
        Font::new(12, FontStyle::Normal),
        INSTRUCTIONS_COLOR,
    );

    renderer.clear_layer(Layer::Message);
    if let Some(banner) = banner(game.phase) {
        renderer.draw_text(
            Layer::Message,
            banner.text,
            Cell::new(0, banner.y),
            Font::new(banner.size, FontStyle::Bold),
            banner.color,
        );
    }
}
