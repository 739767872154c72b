use std::collections::HashSet;
use winit::event::{ElementState, KeyboardInput, VirtualKeyCode};
use winit_input_helper::WinitInputHelper;

use crate::game::{Direction, SpeedTier};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Direction(Direction),
    StartGame,
    TogglePause,
    SetSpeed(SpeedTier),
}

const BINDINGS: [(VirtualKeyCode, Command); 10] = [
    (VirtualKeyCode::Up, Command::Direction(Direction::Up)),
    (VirtualKeyCode::Down, Command::Direction(Direction::Down)),
    (VirtualKeyCode::Left, Command::Direction(Direction::Left)),
    (VirtualKeyCode::Right, Command::Direction(Direction::Right)),
    (VirtualKeyCode::Space, Command::StartGame),
    (VirtualKeyCode::P, Command::TogglePause),
    (VirtualKeyCode::Key1, Command::SetSpeed(SpeedTier::Slow)),
    (VirtualKeyCode::Key2, Command::SetSpeed(SpeedTier::Normal)),
    (VirtualKeyCode::Key3, Command::SetSpeed(SpeedTier::Fast)),
    (VirtualKeyCode::Key4, Command::SetSpeed(SpeedTier::Ultra)),
];

pub const INSTRUCTIONS: &str =
    "Arrow Keys: Move  |  P: Pause  |  Speed (1-4): Slow/Normal/Fast/Ultra  |  Press SPACE to Start";

fn command_for_key(key: VirtualKeyCode) -> Option<Command> {
    BINDINGS
        .iter()
        .find(|(bound, _)| *bound == key)
        .map(|&(_, command)| command)
}

/// Turns keyboard events into commands one event at a time, so commands keep
/// the order the keys were pressed in. Auto-repeat presses of a key that is
/// still held are dropped; press, release, press gives two commands.
#[derive(Debug, Default)]
pub struct KeyState {
    held: HashSet<VirtualKeyCode>,
}

impl KeyState {
    pub fn command_for(&mut self, input: &KeyboardInput) -> Option<Command> {
        let key = input.virtual_keycode?;
        match input.state {
            ElementState::Pressed if self.held.insert(key) => command_for_key(key),
            ElementState::Pressed => None,
            ElementState::Released => {
                self.held.remove(&key);
                None
            }
        }
    }
}

pub fn quit_requested(input: &WinitInputHelper) -> bool {
    input.key_pressed(VirtualKeyCode::Escape) || input.close_requested() || input.destroyed()
}
