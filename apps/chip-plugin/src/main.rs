use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use std::convert::Infallible;
use std::io;
use std::time::Duration;
use tracing::{error, info};

use pmic_telemetry::adc::{ADC_ENABLE_1, ADC_ENABLE_2};
use pmic_telemetry::sampler as reg;
use pmic_telemetry::{enable_adc, Collector, AXP209_ADDRESS, DEFAULT_DEVICE};
use register_bus::{MockBus, PeripheralAddress, RegisterBus};

#[derive(Parser, Debug)]
#[command(
    name = "chip-plugin",
    version,
    about = "C.H.I.P. power and battery charts over the external plugin protocol"
)]
struct Cli {
    /// Seconds between collections (1-360)
    #[arg(value_parser = clap::value_parser!(u16).range(1..=360), default_value_t = 1)]
    update_every: u16,

    /// I2C bus device node
    #[arg(long, default_value = DEFAULT_DEVICE)]
    device: String,

    /// PMIC address on the bus (decimal or 0x-prefixed hex)
    #[arg(long, default_value_t = AXP209_ADDRESS)]
    address: PeripheralAddress,

    /// Collect from an in-memory PMIC instead of the bus
    #[arg(long, action = ArgAction::SetTrue)]
    mock: bool,
}

fn main() -> Result<()> {
    setup_tracing();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => exit_with_usage(err),
    };

    info!(
        update_every = cli.update_every,
        device = %cli.device,
        address = %cli.address,
        mock = cli.mock,
        "chip-plugin starting"
    );

    match run(cli) {
        Ok(never) => match never {},
        Err(e) => {
            error!("{e:#}");
            Err(e)
        }
    }
}

fn run(cli: Cli) -> Result<Infallible> {
    let period = Duration::from_secs(u64::from(cli.update_every));
    if cli.mock {
        let bus = demo_pmic().context("creating mock PMIC")?;
        return collect(bus, cli.address, period);
    }
    run_hardware(&cli.device, cli.address, period)
}

#[cfg(feature = "hardware")]
fn run_hardware(device: &str, address: PeripheralAddress, period: Duration) -> Result<Infallible> {
    let bus = register_bus::I2cBus::open(device)
        .with_context(|| format!("unable to open a handle to the I2C bus at {device}"))?;
    collect(bus, address, period)
}

#[cfg(not(feature = "hardware"))]
fn run_hardware(device: &str, _address: PeripheralAddress, _period: Duration) -> Result<Infallible> {
    Err(register_bus::BusError::Unsupported(
        "built without the `hardware` feature; use --mock",
    ))
    .with_context(|| format!("unable to open a handle to the I2C bus at {device}"))
}

fn collect<B: RegisterBus>(
    mut bus: B,
    address: PeripheralAddress,
    period: Duration,
) -> Result<Infallible> {
    enable_adc(&mut bus, address)
        .with_context(|| format!("unable to communicate with AXP209 at {address}"))?;
    Collector::new(bus, io::stdout(), period)
        .run()
        .context("collection stopped")
}

/// A PMIC on USB power with a battery attached and charging enabled.
fn demo_pmic() -> register_bus::Result<MockBus> {
    let mut bus = MockBus::open("mock-axp209")?;
    bus.set(ADC_ENABLE_1, 0x83);
    bus.set(ADC_ENABLE_2, 0x80);
    bus.set(reg::POWER_STATUS, 0xA0);
    bus.set(reg::CHARGE_CONTROL, 0xC8);
    bus.set(reg::VBUS_IPSOUT, 0x61);
    for ((high, low), raw) in [
        (reg::INTERNAL_TEMP, 0x6D0u16),
        (reg::BATTERY_CHARGE, 0x190),
        (reg::BATTERY_VOLTAGE, 0xD90),
        (reg::ACIN_VOLTAGE, 0xAD0),
        (reg::ACIN_CURRENT, 0x180),
        (reg::VBUS_VOLTAGE, 0xAD0),
        (reg::VBUS_CURRENT, 0x120),
    ] {
        bus.set(high, (raw >> 4) as u8);
        bus.set(low, (raw & 0x0F) as u8);
    }
    bus.set(reg::FUEL_GAUGE, 0x4B);
    Ok(bus)
}

/// Help and version exit cleanly; anything else is a usage error.
fn usage_exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

fn exit_with_usage(err: clap::Error) -> ! {
    let code = usage_exit_code(err.kind());
    if code != 0 {
        eprintln!("Usage: chip-plugin [update_every]");
    }
    let _ = err.print();
    std::process::exit(code)
}

fn setup_tracing() {
    // stdout carries the chart protocol; logs go to stderr only
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}
