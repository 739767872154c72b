mod canvas;
mod color;
mod config;
mod draw;
mod effects;
mod game;
mod grid;
mod input;
mod render;
mod scheduler;
mod session;

use anyhow::{Context, Result};
use log::{error, info};
use pixels::{Pixels, SurfaceTexture};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use simplelog::{ColorChoice, CombinedLogger, SharedLogger, TermLogger, TerminalMode, WriteLogger};
use std::fs::File;
use std::time::Instant;
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;
use winit_input_helper::WinitInputHelper;

use crate::canvas::PixelsRenderer;
use crate::config::Config;
use crate::input::KeyState;
use crate::render::Renderer;
use crate::session::Session;

fn init_logging(config: &Config) -> Result<()> {
    let level = config.log_level();
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(path) = &config.log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        loggers.push(WriteLogger::new(level, simplelog::Config::default(), file));
    }
    CombinedLogger::init(loggers).context("installing logger")
}

fn main() -> Result<()> {
    let config = Config::load()?;
    init_logging(&config)?;
    info!(
        "starting {} ({}x{}, {:?} food)",
        config.title, config.width, config.height, config.food_animation
    );

    let event_loop = EventLoop::new();
    let mut input = WinitInputHelper::new();

    let window = WindowBuilder::new()
        .with_title(&config.title)
        .with_inner_size(LogicalSize::new(config.width, config.height))
        .with_resizable(false)
        .build(&event_loop)
        .context("creating window")?;

    let pixels = {
        let window_size = window.inner_size();
        let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
        Pixels::new(config.width, config.height, surface_texture).context("creating pixel surface")?
    };

    let mut renderer = PixelsRenderer::new(pixels, config.width, config.height);
    draw::draw_background(&config, &mut renderer);

    let mut session = Session::new(config, SmallRng::from_entropy(), Instant::now());
    let mut keys = KeyState::default();
    let mut dirty = false;
    window.request_redraw();

    event_loop.run(move |event, _, control_flow| {
        // Key presses go to the session one by one, in the order they arrive.
        if let Event::WindowEvent {
            event: WindowEvent::KeyboardInput { input: key, .. },
            ..
        } = &event
        {
            if let Some(command) = keys.command_for(key) {
                dirty |= session.handle(command, Instant::now());
            }
        }

        if let Event::RedrawRequested(_) = event {
            draw::draw_frame(&session, &mut renderer);
            if let Err(err) = renderer.present() {
                error!("{err:#}");
                *control_flow = ControlFlow::Exit;
                return;
            }
        }

        if input.update(&event) {
            if input::quit_requested(&input) {
                info!("exiting, high score {}", session.game.high_score);
                *control_flow = ControlFlow::Exit;
                return;
            }

            dirty |= session.advance(Instant::now());
            if dirty {
                window.request_redraw();
                dirty = false;
            }

            *control_flow = match session.next_deadline() {
                Some(deadline) => ControlFlow::WaitUntil(deadline),
                None => ControlFlow::Wait,
            };
        }
    });
}
