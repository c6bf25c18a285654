//! Per-tick input signals
//!
//! Whatever binds keys (or scripts, or AI) fills these in before the
//! allomancer advances. The engine only sees the resulting booleans.

use bevy::prelude::*;

use super::metals::Metal;

/// State of one metal's input this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelInput {
    /// Went down this tick
    pub just_pressed: bool,
    /// Is down this tick
    pub held: bool,
}

impl ChannelInput {
    /// Pressed this tick and still down.
    pub fn pressed() -> Self {
        Self {
            just_pressed: true,
            held: true,
        }
    }

    /// Down since an earlier tick.
    pub fn holding() -> Self {
        Self {
            just_pressed: false,
            held: true,
        }
    }
}

#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct InputSignals {
    channels: [ChannelInput; Metal::COUNT],
    /// The flare toggle went down this tick
    pub flare_pressed: bool,
    /// Where the burner is aiming, in world units
    pub aim_point: Vec2,
}

impl InputSignals {
    pub fn aimed_at(aim_point: Vec2) -> Self {
        Self {
            aim_point,
            ..Self::default()
        }
    }

    pub fn get(&self, metal: Metal) -> ChannelInput {
        self.channels[metal.index()]
    }

    pub fn set(&mut self, metal: Metal, input: ChannelInput) {
        self.channels[metal.index()] = input;
    }

    /// Builder form of [`InputSignals::set`].
    pub fn with(mut self, metal: Metal, input: ChannelInput) -> Self {
        self.set(metal, input);
        self
    }

    pub fn with_flare(mut self) -> Self {
        self.flare_pressed = true;
        self
    }

    /// Forget presses and aim; keeps nothing from the previous tick.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
