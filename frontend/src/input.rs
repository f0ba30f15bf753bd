//! Text input scripts for headless runs. There's no interactive keyboard
//! loop here (the frontend is a CLI, not a windowed app) — `InputScript`
//! is the reproducible stand-in: one line per frame, whitespace-separated
//! button names held down that frame.

use phosphor_core::core::machine::Machine;
use phosphor_core::types::InputTag;

const ALL_TAGS: &[InputTag] = &[
    InputTag::Up,
    InputTag::Down,
    InputTag::Left,
    InputTag::Right,
    InputTag::Fire,
    InputTag::Fire2,
    InputTag::Keypad1,
    InputTag::Keypad2,
    InputTag::Keypad3,
    InputTag::Keypad4,
    InputTag::Keypad5,
    InputTag::Keypad6,
    InputTag::Keypad7,
    InputTag::Keypad8,
    InputTag::Keypad9,
    InputTag::KeypadStar,
    InputTag::Keypad0,
    InputTag::KeypadHash,
    InputTag::Driving0,
    InputTag::Driving1,
    InputTag::Driving2,
    InputTag::Driving3,
    InputTag::Reset,
    InputTag::Select,
    InputTag::Color,
    InputTag::LeftDifficulty,
    InputTag::RightDifficulty,
    InputTag::Pause,
];

/// Look up an [`InputTag`] by its script name.
pub fn tag_by_name(name: &str) -> Option<InputTag> {
    Some(match name {
        "up" => InputTag::Up,
        "down" => InputTag::Down,
        "left" => InputTag::Left,
        "right" => InputTag::Right,
        "fire" => InputTag::Fire,
        "fire2" => InputTag::Fire2,
        "reset" => InputTag::Reset,
        "select" => InputTag::Select,
        "color" => InputTag::Color,
        "left-difficulty" => InputTag::LeftDifficulty,
        "right-difficulty" => InputTag::RightDifficulty,
        "pause" => InputTag::Pause,
        "1" => InputTag::Keypad1,
        "2" => InputTag::Keypad2,
        "3" => InputTag::Keypad3,
        "4" => InputTag::Keypad4,
        "5" => InputTag::Keypad5,
        "6" => InputTag::Keypad6,
        "7" => InputTag::Keypad7,
        "8" => InputTag::Keypad8,
        "9" => InputTag::Keypad9,
        "0" => InputTag::Keypad0,
        "*" => InputTag::KeypadStar,
        "#" => InputTag::KeypadHash,
        "driving0" => InputTag::Driving0,
        "driving1" => InputTag::Driving1,
        "driving2" => InputTag::Driving2,
        "driving3" => InputTag::Driving3,
        _ => return None,
    })
}

/// Per-frame analog input: a paddle resistance and/or a light-gun aim
/// point, parsed from `ohms=<n>` / `lightgun=<scanline>,<hpos>` tokens.
#[derive(Default, Clone, Copy)]
struct FrameAnalog {
    ohms: Option<u16>,
    light_gun: Option<(u16, u16)>,
}

fn parse_analog_token(tok: &str) -> Option<FrameAnalog> {
    if let Some(rest) = tok.strip_prefix("ohms=") {
        return rest.parse().ok().map(|ohms| FrameAnalog { ohms: Some(ohms), light_gun: None });
    }
    if let Some(rest) = tok.strip_prefix("lightgun=") {
        let (sl, hpos) = rest.split_once(',')?;
        let scanline = sl.parse().ok()?;
        let hpos = hpos.parse().ok()?;
        return Some(FrameAnalog { ohms: None, light_gun: Some((scanline, hpos)) });
    }
    None
}

/// Per-frame button-hold list, parsed from a plain-text script.
pub struct InputScript {
    frames: Vec<Vec<InputTag>>,
    analog: Vec<FrameAnalog>,
}

impl InputScript {
    pub fn parse(text: &str) -> Self {
        let mut frames = Vec::new();
        let mut analog = Vec::new();
        for line in text.lines() {
            let mut tags = Vec::new();
            let mut frame_analog = FrameAnalog::default();
            for tok in line.split_whitespace() {
                if let Some(tag) = tag_by_name(tok) {
                    tags.push(tag);
                } else if let Some(a) = parse_analog_token(tok) {
                    if a.ohms.is_some() {
                        frame_analog.ohms = a.ohms;
                    }
                    if a.light_gun.is_some() {
                        frame_analog.light_gun = a.light_gun;
                    }
                } else {
                    log::warn!("unknown input name in script: {tok}");
                }
            }
            frames.push(tags);
            analog.push(frame_analog);
        }
        Self { frames, analog }
    }

    /// Apply this frame's held buttons to player 0, releasing everything
    /// else first so a script need only name what's currently down. Paddle
    /// resistance and light-gun aim persist until a later line overrides
    /// them — a script need only mention them when they change.
    pub fn apply(&self, machine: &mut dyn Machine, frame: usize) {
        for &tag in ALL_TAGS {
            machine.raise_input(0, tag, false);
        }
        if let Some(held) = self.frames.get(frame) {
            for &tag in held {
                machine.raise_input(0, tag, true);
            }
        }
        if let Some(analog) = self.analog.get(frame) {
            if let Some(ohms) = analog.ohms {
                machine.set_ohms(0, ohms);
            }
            if let Some((scanline, hpos)) = analog.light_gun {
                machine.set_light_gun(0, scanline, hpos);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_and_skips_unknown_names() {
        let script = InputScript::parse("up fire\nbogus down\n");
        assert_eq!(script.frames.len(), 2);
        assert_eq!(script.frames[0], vec![InputTag::Up, InputTag::Fire]);
        assert_eq!(script.frames[1], vec![InputTag::Down]);
    }

    #[test]
    fn parses_analog_tokens_alongside_digital_ones() {
        let script = InputScript::parse("up ohms=75000\nlightgun=12,40 fire\n");
        assert_eq!(script.frames[0], vec![InputTag::Up]);
        assert_eq!(script.analog[0].ohms, Some(75_000));
        assert_eq!(script.frames[1], vec![InputTag::Fire]);
        assert_eq!(script.analog[1].light_gun, Some((12, 40)));
    }
}
