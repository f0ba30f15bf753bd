//! System, cart, and controller tags (C1).
//!
//! Grounded in the original lineage's `MachineInput`/`Controller`/
//! `ConsoleSwitch`/`CartType` enumerations, renamed to the generic
//! System-A/System-B vocabulary this engine uses throughout. These are pure
//! data — no behavior lives here, only the tags other modules match on.

/// Which console a [`crate::core::Machine`] implementation models, and which
/// TV timing it runs. System-B's BIOS/high-score-cart variants differ only
/// in what's mapped at boot, not in core timing, so they're expressed as
/// the separate `bios: Option<Vec<u8>>` field on [`MachineConfig`] rather
/// than as enum variants here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SystemKind {
    SystemANtsc,
    SystemAPal,
    SystemBNtsc,
    SystemBPal,
}

impl SystemKind {
    pub fn is_system_a(self) -> bool {
        matches!(self, SystemKind::SystemANtsc | SystemKind::SystemAPal)
    }

    pub fn is_system_b(self) -> bool {
        !self.is_system_a()
    }

    pub fn is_pal(self) -> bool {
        matches!(self, SystemKind::SystemAPal | SystemKind::SystemBPal)
    }

    /// Visible scanlines per frame: 262 NTSC / 312 PAL, per SPEC_FULL.md §5/§6.
    pub fn total_scanlines(self) -> usize {
        if self.is_pal() {
            312
        } else {
            262
        }
    }
}

/// What's plugged into a controller jack. `request_snoop` on a cart and
/// `ProLine` overloading the console-switch bit both key off this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerKind {
    None,
    Joystick,
    Paddles,
    Keypad,
    Driving,
    BoosterGrip,
    ProLineJoystick,
    LightGun,
}

/// Empirically tuned light-gun timing adjustment: the XG-1's photocell
/// trips slightly later in a scanline than the target pixel's raw hpos,
/// so sensing compares against `hpos as f64 * LIGHT_GUN_ADJUST` rather
/// than hpos directly. Named rather than inlined so both composers share
/// one value.
pub const LIGHT_GUN_ADJUST: f64 = 2.135;

/// Construction-time machine configuration: TV standard / console variant
/// (via [`SystemKind`]), an optional BIOS image (System-B only), and what's
/// plugged into each of the two controller ports. A plain struct built
/// directly by the embedding crate; no config-file format is mandated here.
#[derive(Clone, Debug)]
pub struct MachineConfig {
    pub kind: SystemKind,
    pub bios: Option<Vec<u8>>,
    pub controllers: [ControllerKind; 2],
}

impl MachineConfig {
    pub fn new(kind: SystemKind) -> Self {
        Self { kind, bios: None, controllers: [ControllerKind::Joystick, ControllerKind::Joystick] }
    }

    pub fn with_bios(mut self, bios: Vec<u8>) -> Self {
        self.bios = Some(bios);
        self
    }

    pub fn with_controller(mut self, port: usize, kind: ControllerKind) -> Self {
        if port < self.controllers.len() {
            self.controllers[port] = kind;
        }
        self
    }
}

/// One input source, staged by [`crate::core::Machine::raise_input`] and
/// captured atomically at frame start. Digit names follow the numeric
/// keypad's physical layout, not a dialing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InputTag {
    Up,
    Down,
    Left,
    Right,
    Fire,
    Fire2,
    Keypad1,
    Keypad2,
    Keypad3,
    Keypad4,
    Keypad5,
    Keypad6,
    Keypad7,
    Keypad8,
    Keypad9,
    KeypadStar,
    Keypad0,
    KeypadHash,
    Driving0,
    Driving1,
    Driving2,
    Driving3,
    Reset,
    Select,
    Color,
    LeftDifficulty,
    RightDifficulty,
    Pause,
}

/// Console-panel switches, reported on the I/O timer chip's PORTB
/// (see SPEC_FULL.md §4.4). `Pause` aliases the BW/Color bit position on
/// System-B the same way the original source documents.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleSwitch {
    GameReset,
    GameSelect,
    Color,
    LeftDifficultyA,
    RightDifficultyA,
    Pause,
}

/// Cartridge bank-switching scheme tag (C8). Names follow the ROM size and
/// region/RAM/audio suffix convention the original cart-loader tables use;
/// this engine's loader never inspects header bytes itself (out of scope —
/// the tag always arrives pre-decided from an external collaborator).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CartType {
    // System-A families.
    A2K,
    A4K,
    A8K,
    A8KR,
    A16K,
    A16KR,
    A32K,
    A32KR,
    Dc8K,
    ParkerBros8K,
    Tigervision8K,
    Cbs12K,
    MNetwork16K,
    Dpc,
    M32N12K,
    // System-B families.
    B8K,
    B16K,
    B32K,
    B32KSuperGame,
    B32KSuperGamePoke,
    B32KSuperGameRam,
    B48K,
    B48KSuperGame,
    B52K,
    B52KSuperGame,
    B128K,
    B128KRam,
    B128KPoke,
    B128KRamPoke,
    BAbsolute64K,
    BActivision128K,
}

impl CartType {
    pub fn is_system_b(self) -> bool {
        matches!(
            self,
            CartType::B8K
                | CartType::B16K
                | CartType::B32K
                | CartType::B32KSuperGame
                | CartType::B32KSuperGamePoke
                | CartType::B32KSuperGameRam
                | CartType::B48K
                | CartType::B48KSuperGame
                | CartType::B52K
                | CartType::B52KSuperGame
                | CartType::B128K
                | CartType::B128KRam
                | CartType::B128KPoke
                | CartType::B128KRamPoke
                | CartType::BAbsolute64K
                | CartType::BActivision128K
        )
    }
}

/// Collision bits reported by VSC-A's CXCLR/CX* latches, one per graphics
/// object. Kept as a bitflags-shaped `u8` newtype rather than a `bitflags!`
/// macro since this engine's Cargo.toml does not carry that crate — see
/// DESIGN.md.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct CollisionMask(pub u8);

impl CollisionMask {
    pub const PLAYFIELD: u8 = 1 << 0;
    pub const BALL: u8 = 1 << 1;
    pub const MISSILE0: u8 = 1 << 2;
    pub const MISSILE1: u8 = 1 << 3;
    pub const PLAYER0: u8 = 1 << 4;
    pub const PLAYER1: u8 = 1 << 5;

    pub fn set(&mut self, bit: u8) {
        self.0 |= bit;
    }

    pub fn test(&self, bit: u8) -> bool {
        self.0 & bit != 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }
}

/// Paired-object collision latches (CXPPMM/CXM0P/CXM1P/CXP0FB/CXP1FB/CXM0FB/
/// CXM1FB/CXBLPF), each bit independently latched and cleared only by
/// CXCLR/new frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct CollisionPairMask(pub u16);

impl CollisionPairMask {
    pub const M0_P1: u16 = 1 << 0;
    pub const M0_P0: u16 = 1 << 1;
    pub const M1_P0: u16 = 1 << 2;
    pub const M1_P1: u16 = 1 << 3;
    pub const P0_PF: u16 = 1 << 4;
    pub const P0_BL: u16 = 1 << 5;
    pub const P1_PF: u16 = 1 << 6;
    pub const P1_BL: u16 = 1 << 7;
    pub const M0_PF: u16 = 1 << 8;
    pub const M0_BL: u16 = 1 << 9;
    pub const M1_PF: u16 = 1 << 10;
    pub const M1_BL: u16 = 1 << 11;
    pub const BL_PF: u16 = 1 << 12;
    pub const P0_P1: u16 = 1 << 13;
    pub const M0_M1: u16 = 1 << 14;

    pub fn set(&mut self, bit: u16) {
        self.0 |= bit;
    }

    pub fn test(&self, bit: u16) -> bool {
        self.0 & bit != 0
    }

    pub fn clear(&mut self) {
        self.0 = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_kind_scanline_counts() {
        assert_eq!(SystemKind::SystemANtsc.total_scanlines(), 262);
        assert_eq!(SystemKind::SystemBPal.total_scanlines(), 312);
    }

    #[test]
    fn system_kind_family_queries() {
        assert!(SystemKind::SystemAPal.is_system_a());
        assert!(!SystemKind::SystemAPal.is_system_b());
        assert!(SystemKind::SystemBNtsc.is_system_b());
    }

    #[test]
    fn collision_mask_set_test_clear() {
        let mut mask = CollisionMask::default();
        assert!(!mask.test(CollisionMask::PLAYER0));
        mask.set(CollisionMask::PLAYER0);
        assert!(mask.test(CollisionMask::PLAYER0));
        assert!(!mask.test(CollisionMask::PLAYER1));
        mask.clear();
        assert!(!mask.test(CollisionMask::PLAYER0));
    }

    #[test]
    fn cart_type_system_b_partition() {
        assert!(CartType::B128KRamPoke.is_system_b());
        assert!(!CartType::A8KR.is_system_b());
    }
}
