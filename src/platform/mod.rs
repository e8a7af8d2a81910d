//! Platform abstraction layer
//!
//! The windowing/input backend implements [`Platform`] and the texture
//! backend implements [`TextureLoader`]. This module turns their raw output
//! into simulation input and level assets.

pub mod assets;
pub mod headless;

pub use assets::{FsTextureLoader, LoadedAssets, TextureInfo, TextureLoader, load_assets};
pub use headless::{HeadlessTextureLoader, ScriptedPlatform};

use crate::sim::TickInput;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    /// Mapped but intentionally inert
    Up,
    /// Mapped but intentionally inert
    Down,
    Space,
}

/// Discrete input events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Window closed or process asked to stop
    Quit,
    KeyDown(Key),
}

/// Event source and keyboard state provided by the windowing backend
pub trait Platform {
    /// Drain events received since the last call
    fn poll_events(&mut self) -> Vec<InputEvent>;
    /// Continuous key state, used for movement
    fn is_key_down(&self, key: Key) -> bool;
}

/// Input gathered for one rendered frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub tick: TickInput,
    pub quit: bool,
}

/// Poll the platform and translate keys into simulation input.
/// Left/right move while held, a space key-down fires once.
pub fn gather_input<P: Platform + ?Sized>(platform: &mut P, idle_mode: bool) -> FrameInput {
    let mut frame = FrameInput {
        tick: TickInput {
            idle_mode,
            ..Default::default()
        },
        quit: false,
    };

    for event in platform.poll_events() {
        match event {
            InputEvent::Quit => frame.quit = true,
            InputEvent::KeyDown(Key::Space) => frame.tick.fire = true,
            InputEvent::KeyDown(_) => {}
        }
    }

    if platform.is_key_down(Key::Right) {
        frame.tick.move_x += 1.0;
    }
    if platform.is_key_down(Key::Left) {
        frame.tick.move_x -= 1.0;
    }

    frame
}
