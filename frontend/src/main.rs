use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::info;
use phosphor_core::types::{CartType, ControllerKind, MachineConfig, SystemKind};

mod audio;
mod emulator;
mod input;
mod overlay;
mod rom_path;
mod video;

/// Headless runner for the cycle-approximate System-A/System-B emulator
/// core: loads a cartridge, runs a fixed number of frames, and optionally
/// dumps the resulting video/audio/snapshot to disk.
#[derive(Parser)]
#[command(name = "phosphor", version, about)]
struct Cli {
    /// Cartridge ROM image.
    rom: PathBuf,

    /// Console and TV timing to emulate.
    #[arg(long, value_enum, default_value_t = System::Atari2600Ntsc)]
    system: System,

    /// Bank-switching scheme; guessed from ROM size if omitted.
    #[arg(long, value_enum)]
    cart_type: Option<CartTypeArg>,

    /// BIOS image (System-B only).
    #[arg(long)]
    bios: Option<PathBuf>,

    /// What's plugged into controller port 0.
    #[arg(long, value_enum, default_value_t = Controller::Joystick)]
    controller0: Controller,

    /// What's plugged into controller port 1.
    #[arg(long, value_enum, default_value_t = Controller::Joystick)]
    controller1: Controller,

    /// Number of frames to run.
    #[arg(long, default_value_t = 60)]
    frames: u32,

    /// Plain-text input script (one line per frame); see `input::InputScript`.
    #[arg(long)]
    input_script: Option<PathBuf>,

    /// Write the final frame's video buffer here as a PGM image.
    #[arg(long)]
    video_out: Option<PathBuf>,

    /// Write the final frame's audio buffer here as raw 16-bit PCM.
    #[arg(long)]
    audio_out: Option<PathBuf>,

    /// Write a state snapshot here after the run completes.
    #[arg(long)]
    snapshot_out: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum System {
    Atari2600Ntsc,
    Atari2600Pal,
    Atari7800Ntsc,
    Atari7800Pal,
}

impl From<System> for SystemKind {
    fn from(s: System) -> Self {
        match s {
            System::Atari2600Ntsc => SystemKind::SystemANtsc,
            System::Atari2600Pal => SystemKind::SystemAPal,
            System::Atari7800Ntsc => SystemKind::SystemBNtsc,
            System::Atari7800Pal => SystemKind::SystemBPal,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Controller {
    None,
    Joystick,
    Paddles,
    Keypad,
    Driving,
    BoosterGrip,
    ProLineJoystick,
    LightGun,
}

impl From<Controller> for ControllerKind {
    fn from(c: Controller) -> Self {
        match c {
            Controller::None => ControllerKind::None,
            Controller::Joystick => ControllerKind::Joystick,
            Controller::Paddles => ControllerKind::Paddles,
            Controller::Keypad => ControllerKind::Keypad,
            Controller::Driving => ControllerKind::Driving,
            Controller::BoosterGrip => ControllerKind::BoosterGrip,
            Controller::ProLineJoystick => ControllerKind::ProLineJoystick,
            Controller::LightGun => ControllerKind::LightGun,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CartTypeArg {
    A2k,
    A4k,
    A8k,
    A8kR,
    A16k,
    A16kR,
    A32k,
    A32kR,
    Dc8k,
    ParkerBros8k,
    Tigervision8k,
    Cbs12k,
    MNetwork16k,
    Dpc,
    M32N12k,
    B8k,
    B16k,
    B32k,
    B32kSuperGame,
    B32kSuperGamePoke,
    B32kSuperGameRam,
    B48k,
    B48kSuperGame,
    B52k,
    B52kSuperGame,
    B128k,
    B128kRam,
    B128kPoke,
    B128kRamPoke,
    BAbsolute64k,
    BActivision128k,
}

impl From<CartTypeArg> for CartType {
    fn from(c: CartTypeArg) -> Self {
        match c {
            CartTypeArg::A2k => CartType::A2K,
            CartTypeArg::A4k => CartType::A4K,
            CartTypeArg::A8k => CartType::A8K,
            CartTypeArg::A8kR => CartType::A8KR,
            CartTypeArg::A16k => CartType::A16K,
            CartTypeArg::A16kR => CartType::A16KR,
            CartTypeArg::A32k => CartType::A32K,
            CartTypeArg::A32kR => CartType::A32KR,
            CartTypeArg::Dc8k => CartType::Dc8K,
            CartTypeArg::ParkerBros8k => CartType::ParkerBros8K,
            CartTypeArg::Tigervision8k => CartType::Tigervision8K,
            CartTypeArg::Cbs12k => CartType::Cbs12K,
            CartTypeArg::MNetwork16k => CartType::MNetwork16K,
            CartTypeArg::Dpc => CartType::Dpc,
            CartTypeArg::M32N12k => CartType::M32N12K,
            CartTypeArg::B8k => CartType::B8K,
            CartTypeArg::B16k => CartType::B16K,
            CartTypeArg::B32k => CartType::B32K,
            CartTypeArg::B32kSuperGame => CartType::B32KSuperGame,
            CartTypeArg::B32kSuperGamePoke => CartType::B32KSuperGamePoke,
            CartTypeArg::B32kSuperGameRam => CartType::B32KSuperGameRam,
            CartTypeArg::B48k => CartType::B48K,
            CartTypeArg::B48kSuperGame => CartType::B48KSuperGame,
            CartTypeArg::B52k => CartType::B52K,
            CartTypeArg::B52kSuperGame => CartType::B52KSuperGame,
            CartTypeArg::B128k => CartType::B128K,
            CartTypeArg::B128kRam => CartType::B128KRam,
            CartTypeArg::B128kPoke => CartType::B128KPoke,
            CartTypeArg::B128kRamPoke => CartType::B128KRamPoke,
            CartTypeArg::BAbsolute64k => CartType::BAbsolute64K,
            CartTypeArg::BActivision128k => CartType::BActivision128K,
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let system_kind: SystemKind = cli.system.into();

    let rom = rom_path::load_cart_rom(&cli.rom).unwrap_or_else(|e| {
        eprintln!("failed to load ROM {}: {e}", cli.rom.display());
        std::process::exit(1);
    });
    let cart_type =
        rom_path::resolve_cart_type(cli.cart_type.map(Into::into), system_kind.is_system_b(), rom.len());

    let bios = cli.bios.map(|path| {
        rom_path::load_bios(&path).unwrap_or_else(|e| {
            eprintln!("failed to load BIOS {}: {e}", path.display());
            std::process::exit(1);
        })
    });

    let mut config = MachineConfig::new(system_kind)
        .with_controller(0, cli.controller0.into())
        .with_controller(1, cli.controller1.into());
    if let Some(bios) = bios {
        config = config.with_bios(bios);
    }

    let mut machine = phosphor_carts::build_machine(config, cart_type, rom).unwrap_or_else(|e| {
        eprintln!("failed to build machine: {e}");
        std::process::exit(1);
    });
    machine.reset();

    let script = cli.input_script.map(|path| {
        let text = std::fs::read_to_string(&path).unwrap_or_else(|e| {
            eprintln!("failed to read input script {}: {e}", path.display());
            std::process::exit(1);
        });
        input::InputScript::parse(&text)
    });

    let stats = emulator::run_frames(machine.as_mut(), cli.frames, script.as_ref());
    info!(
        "ran {} of {} requested frames (jammed={}, halted={})",
        stats.frames_run, cli.frames, stats.jammed, stats.halted
    );

    if let Some(path) = cli.video_out {
        let pitch = machine.display_pitch();
        let mut frame = machine.video_buffer().to_vec();
        overlay::draw_label(&mut frame, pitch, &stats.frames_run.to_string());
        let rows = frame.len() / pitch;
        if let Err(e) = video::write_pgm(&path, &frame, pitch, rows) {
            eprintln!("failed to write video dump {}: {e}", path.display());
        }
    }

    if let Some(path) = cli.audio_out
        && let Err(e) = audio::write_pcm(&path, machine.audio_buffer())
    {
        eprintln!("failed to write audio dump {}: {e}", path.display());
    }

    if let Some(path) = cli.snapshot_out
        && let Err(e) = std::fs::write(&path, machine.snapshot())
    {
        eprintln!("failed to write snapshot {}: {e}", path.display());
    }
}
