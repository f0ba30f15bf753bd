//! Input state (C10): the double-buffered 15-slot array a host writes into
//! from outside the frame step and the engine reads from inside it.
//!
//! Slot layout (SPEC_FULL.md §3, "Input state"):
//! - [0], [1]: controller-jack tags for player 0/1 (as `u8`, `ControllerKind as u8`)
//! - [2]: console-switch bitmask (`ConsoleSwitch` bits)
//! - [3..6]: per-player controller-action bitmask (up to 4 players)
//! - [7..10]: per-player paddle ohms (low byte) — ohms don't fit a byte, so
//!   paddle/light-gun slots are carried in a parallel `u32` array instead of
//!   packed into the byte slots; the byte array alone represents buttons and
//!   switches.

use crate::types::InputTag;

const NUM_PLAYERS: usize = 4;

#[derive(Clone, Copy, Debug, Default)]
struct PlayerAnalog {
    ohms: u16,
    light_gun: u32, // (scanline << 16) | hpos
}

/// Double-buffered input. Host code calls `raise_input`/`set_ohms`/
/// `set_light_gun`, which only ever touch `staging`; the engine calls
/// `capture` once per frame step to snapshot `staging` into `captured`,
/// and reads `captured` exclusively thereafter.
pub struct InputState {
    console_switches: u8,
    staging_actions: [u32; NUM_PLAYERS],
    captured_actions: [u32; NUM_PLAYERS],
    staging_analog: [PlayerAnalog; NUM_PLAYERS],
    captured_analog: [PlayerAnalog; NUM_PLAYERS],
    staging_console: u8,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            console_switches: 0,
            staging_actions: [0; NUM_PLAYERS],
            captured_actions: [0; NUM_PLAYERS],
            staging_analog: [PlayerAnalog::default(); NUM_PLAYERS],
            captured_analog: [PlayerAnalog::default(); NUM_PLAYERS],
            staging_console: 0,
        }
    }

    fn bit_for(tag: InputTag) -> u32 {
        1u32 << (tag as u32)
    }

    /// Console-switch tags get their own compact bit layout (0..=5) instead
    /// of reusing their `InputTag` discriminant directly — those run past
    /// 21 and would overflow the `u8` console-switch byte.
    fn console_bit_for(tag: InputTag) -> Option<u8> {
        Some(match tag {
            InputTag::Reset => 1 << 0,
            InputTag::Select => 1 << 1,
            InputTag::Color => 1 << 2,
            InputTag::LeftDifficulty => 1 << 3,
            InputTag::RightDifficulty => 1 << 4,
            InputTag::Pause => 1 << 5,
            _ => return None,
        })
    }

    /// Host-side: raise or clear a digital input for `player`. Writes only
    /// to the staging array.
    pub fn raise_input(&mut self, player: usize, tag: InputTag, down: bool) {
        if player >= NUM_PLAYERS {
            return;
        }
        if let Some(bit) = Self::console_bit_for(tag) {
            if down {
                self.staging_console |= bit;
            } else {
                self.staging_console &= !bit;
            }
            return;
        }
        let bit = Self::bit_for(tag);
        if down {
            self.staging_actions[player] |= bit;
        } else {
            self.staging_actions[player] &= !bit;
        }
    }

    pub fn set_ohms(&mut self, player: usize, ohms: u16) {
        if player < NUM_PLAYERS {
            self.staging_analog[player].ohms = ohms;
        }
    }

    pub fn set_light_gun(&mut self, player: usize, scanline: u16, hpos: u16) {
        if player < NUM_PLAYERS {
            self.staging_analog[player].light_gun = ((scanline as u32) << 16) | hpos as u32;
        }
    }

    /// Engine-side: atomically (from the engine's viewpoint — a single
    /// threaded bulk copy) snapshot staging into captured. Called exactly
    /// once, at the start of each frame step.
    pub fn capture(&mut self) {
        self.captured_actions = self.staging_actions;
        self.captured_analog = self.staging_analog;
        self.console_switches = self.staging_console;
    }

    pub fn captured_action(&self, player: usize, tag: InputTag) -> bool {
        if player >= NUM_PLAYERS {
            return false;
        }
        self.captured_actions[player] & Self::bit_for(tag) != 0
    }

    pub fn console_switches(&self) -> u8 {
        self.console_switches
    }

    pub fn captured_ohms(&self, player: usize) -> u16 {
        self.captured_analog.get(player).map(|a| a.ohms).unwrap_or(0)
    }

    pub fn captured_light_gun(&self, player: usize) -> (u16, u16) {
        let packed = self.captured_analog.get(player).map(|a| a.light_gun).unwrap_or(0);
        ((packed >> 16) as u16, packed as u16)
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_buffering_race_matches_scenario_6() {
        let mut input = InputState::new();
        input.raise_input(0, InputTag::Fire, true);
        input.capture();
        assert!(input.captured_action(0, InputTag::Fire));

        input.raise_input(0, InputTag::Fire, false);
        // Pre-capture: captured state must still reflect the old value.
        assert!(input.captured_action(0, InputTag::Fire));

        input.capture();
        assert!(!input.captured_action(0, InputTag::Fire));
    }

    #[test]
    fn console_switches_are_captured_separately_from_actions() {
        let mut input = InputState::new();
        input.raise_input(0, InputTag::Select, true);
        input.raise_input(0, InputTag::Fire, true);
        input.capture();
        assert_ne!(input.console_switches(), 0);
        assert!(input.captured_action(0, InputTag::Fire));
    }

    #[test]
    fn ohms_and_light_gun_are_staged_and_captured() {
        let mut input = InputState::new();
        input.set_ohms(1, 500_000);
        input.set_light_gun(0, 42, 100);
        input.capture();
        assert_eq!(input.captured_ohms(1), 500_000);
        assert_eq!(input.captured_light_gun(0), (42, 100));
    }
}
