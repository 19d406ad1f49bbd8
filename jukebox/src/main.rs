use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use sonos_api::Speaker;
use tracing::{error, info};

use rpi_jukebox::config::CONFIG_PATH;
use rpi_jukebox::jukebox::{self, LoopTiming};
use rpi_jukebox::lock::{InstanceLock, DEFAULT_LOCK_FILE};
use rpi_jukebox::logging;
use rpi_jukebox::reader::linux_i2c::{DEFAULT_DEVICE, PN532_ADDRESS};
use rpi_jukebox::reader::{CardReader, KeyboardReader, LinuxI2c, Pn532};
use rpi_jukebox::request::FAVORITE_PREFIX;
use rpi_jukebox::{JukeboxConfig, JukeboxTable, LockError, RequestProcessor, ShutdownFlag, PROG_NAME};

/// Play Sonos favorites and tracks by tapping RFID/NFC cards
#[derive(Parser, Debug)]
#[command(name = "rpi-jukebox", version, about)]
struct Cli {
    /// INI file with the [rpi_jukebox] section
    #[arg(short, long, default_value = CONFIG_PATH)]
    config_file: PathBuf,

    /// Card reader hardware
    #[arg(long, value_enum, default_value_t = ReaderKind::Pn532)]
    reader: ReaderKind,

    /// I2C adapter the PN532 is attached to
    #[arg(long, default_value = DEFAULT_DEVICE)]
    i2c_device: PathBuf,

    /// Lock file guarding against a second running instance
    #[arg(long, default_value = DEFAULT_LOCK_FILE)]
    lock_file: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Listen for cards and play them (default)
    Run,
    /// List the player's favorites with their card URIs
    Favorites,
    /// Show the track currently playing
    Track,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderKind {
    /// PN532 over I2C
    Pn532,
    /// USB reader that types UIDs like a keyboard
    Keyboard,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = JukeboxConfig::load(&cli.config_file)
        .with_context(|| format!("Failed to load configuration from {}", cli.config_file.display()))?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run(&cli, config),
        Command::Favorites => list_favorites(&config),
        Command::Track => show_track(&config),
    }
}

fn run(cli: &Cli, config: JukeboxConfig) -> Result<()> {
    let logger = logging::init_logging(config.syslog_target()).context("Failed to initialize logging")?;
    info!("Starting {}", PROG_NAME);

    let _lock = match InstanceLock::acquire(&cli.lock_file) {
        Err(e @ LockError::AlreadyRunning { .. }) => {
            error!("An instance of {} is already running", PROG_NAME);
            return Err(e.into());
        }
        other => other.context("Failed to take the instance lock")?,
    };

    let table = JukeboxTable::load(&config.jukebox_file).context("Failed to load the card table")?;
    info!("Loaded {} cards from {}", table.len(), config.jukebox_file.display());

    let shutdown = ShutdownFlag::install().context("Failed to install signal handler")?;
    let mut reader = open_reader(cli)?;
    let processor = RequestProcessor::new(config.playback()).with_logger(logger);

    info!("Waiting for jukebox requests...");
    let result = jukebox::run(reader.as_mut(), &table, &shutdown, LoopTiming::default(), |uri| {
        processor.process(uri)
    });
    info!("Cleaning up and exiting {}", PROG_NAME);

    result.context("Card reader failed")
}

fn open_reader(cli: &Cli) -> Result<Box<dyn CardReader>> {
    match cli.reader {
        ReaderKind::Pn532 => {
            let bus = LinuxI2c::open(&cli.i2c_device, PN532_ADDRESS)
                .with_context(|| format!("Failed to open {}", cli.i2c_device.display()))?;
            let mut pn532 = Pn532::new(bus);

            let firmware = pn532.firmware_version().context("PN532 did not answer")?;
            info!("Found PN532 with firmware version: {}.{}", firmware.version, firmware.revision);
            pn532.sam_configuration().context("Failed to configure PN532")?;

            Ok(Box::new(pn532))
        }
        ReaderKind::Keyboard => Ok(Box::new(KeyboardReader::stdin())),
    }
}

fn list_favorites(config: &JukeboxConfig) -> Result<()> {
    let speaker = Speaker::new(config.sonos_ip.clone());
    let favorites = speaker
        .favorites()
        .with_context(|| format!("Failed to fetch favorites from {}", config.sonos_ip))?;

    for favorite in favorites {
        let reference = favorite.reference;
        println!("{} -- {}", reference.title, reference.uri);
        println!("    {}::{}", FAVORITE_PREFIX, reference.title);
    }
    Ok(())
}

fn show_track(config: &JukeboxConfig) -> Result<()> {
    let speaker = Speaker::new(config.sonos_ip.clone());
    let track = speaker
        .current_track()
        .with_context(|| format!("Failed to fetch the current track from {}", config.sonos_ip))?;

    println!("{}: {} -- {}", track.artist, track.title, track.uri);
    Ok(())
}
