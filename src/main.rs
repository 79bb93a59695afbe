#![deny(clippy::unwrap_used)]

use clap::builder::BoolishValueParser;
use clap::{arg, command, value_parser};
use env_logger::Env;
use std::io::ErrorKind;
use std::process::exit;
use std::{path::PathBuf, time::Duration};

use kel102ctrl::{
    Config, Device, Mode, ProtoError, ReadPolicy, Result, DEFAULT_BAUDRATE, DEFAULT_TTY,
};

const MODE_KEYWORDS: [&str; 4] = ["VOLT", "CURR", "RES", "POW"];

#[tokio::main]
async fn main() {
    let matches = command!() // requires `cargo` feature
        .arg(
            arg!(
                -p --device <PORT> "Serial port of the load"
            )
            .default_value(DEFAULT_TTY)
            .required(false)
            .value_parser(value_parser!(PathBuf)),
        )
        .arg(arg!(
            -d --debug ... "Turn debugging information on"
        ))
        .arg(
            arg!(
                -b --baudrate <BAUDRATE> "Baudrate"
            )
            .default_value(DEFAULT_BAUDRATE.to_string())
            .required(false)
            .value_parser(value_parser!(u32)),
        )
        .arg(
            arg!(
                -t --timeout <MS> "Serial read timeout in milliseconds"
            )
            .default_value("1000")
            .required(false)
            .value_parser(value_parser!(u64)),
        )
        .arg(
            arg!(
                --delay <MS> "Time to wait for an answer in milliseconds"
            )
            .default_value("100")
            .required(false)
            .value_parser(value_parser!(u64)),
        )
        .arg(
            arg!(
                --poll <MS> "Poll for the answer at this interval instead of waiting the full delay"
            )
            .required(false)
            .value_parser(value_parser!(u64)),
        )
        .subcommand(clap::Command::new("status").about("Mode and measured values"))
        .subcommand(
            clap::Command::new("measure")
                .about("Measure a single quantity")
                .arg(
                    arg!(<quantity> "Quantity to measure")
                        .value_parser(["voltage", "current", "power"]),
                ),
        )
        .subcommand(
            clap::Command::new("mode")
                .about("Operating mode")
                .arg(arg!([mode] "Set operating mode").value_parser(MODE_KEYWORDS)),
        )
        .subcommand(
            clap::Command::new("setting")
                .about("Setpoint of a mode")
                .arg(arg!(<mode> "Mode of the setpoint").value_parser(MODE_KEYWORDS))
                .arg(arg!([value] "Set new setpoint").value_parser(value_parser!(f64))),
        )
        .subcommand(
            clap::Command::new("limits")
                .about("Allowed setpoint range of a mode")
                .arg(arg!(<mode> "Mode of the setpoint").value_parser(MODE_KEYWORDS)),
        )
        .subcommand(
            clap::Command::new("input")
                .about("Load input")
                .arg(arg!(<enabled> "Switch input").value_parser(BoolishValueParser::new())),
        )
        .subcommand_required(true)
        .get_matches();

    let level = match matches.get_count("debug") {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = format!("kel102ctrl={}", level);
    env_logger::Builder::from_env(Env::default().default_filter_or(filter)).init();

    if let Err(e) = handle_args(&matches).await {
        let port = matches
            .get_one::<PathBuf>("device")
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        match e {
            ProtoError::Connection(err) => {
                if err.kind() == tokio_serial::ErrorKind::NoDevice
                    || matches!(err.kind(), tokio_serial::ErrorKind::Io(ErrorKind::NotFound))
                {
                    eprintln!("{}: File not found", port);
                } else {
                    eprintln!("Unable to open serial port: {} [device: {}]", err, port);
                }
            }
            ProtoError::Io(err) => {
                eprintln!("I/O Error: {} [device: {}]", err, port);
            }
            ProtoError::NoResponse => {
                eprintln!("No response from device, check cable and baudrate!");
            }
            ProtoError::UnknownMode(keyword) => {
                eprintln!("Device reported an unknown mode: {:?}", keyword);
            }
            ProtoError::MalformedNumber(text) => {
                eprintln!("Device sent a malformed value: {:?}", text);
            }
            ProtoError::InvalidValue(value) => {
                eprintln!("Refusing to send setpoint {}", value);
            }
            ProtoError::Decode(err) => {
                eprintln!("Device sent garbage: {}", err);
            }
        }
        exit(-1);
    }
}

fn config_from_args(matches: &clap::ArgMatches) -> Config {
    let mut config = Config::default();
    if let Some(baud_rate) = matches.get_one::<u32>("baudrate") {
        config = config.with_baud_rate(*baud_rate);
    }
    if let Some(ms) = matches.get_one::<u64>("timeout") {
        config = config.with_timeout(Duration::from_millis(*ms));
    }
    if let Some(ms) = matches.get_one::<u64>("delay") {
        config = config.with_receive_delay(Duration::from_millis(*ms));
    }
    if let Some(ms) = matches.get_one::<u64>("poll") {
        config = config.with_read_policy(ReadPolicy::Poll {
            interval: Duration::from_millis(*ms),
        });
    }
    config
}

fn mode_arg(args: &clap::ArgMatches) -> Result<Option<Mode>> {
    args.get_one::<String>("mode")
        .map(|keyword| keyword.parse::<Mode>())
        .transpose()
}

async fn handle_args(matches: &clap::ArgMatches) -> Result<()> {
    if let Some(port_path) = matches.get_one::<PathBuf>("device") {
        let config = config_from_args(matches);
        let mut device = Device::with_config(port_path.to_string_lossy(), config)?;

        eprintln!(
            "Connected to: {} ({} baud)\n",
            port_path.display(),
            device.config().baud_rate
        );

        match matches.subcommand() {
            Some(("status", _args)) => {
                let status = device.status().await?;
                println!("{}", status);
            }
            Some(("measure", args)) => {
                match args.get_one::<String>("quantity").map(String::as_str) {
                    Some("voltage") => println!("{} V", device.get_load_voltage().await?),
                    Some("current") => println!("{} A", device.get_load_current().await?),
                    Some("power") => println!("{} W", device.get_load_power().await?),
                    _ => eprintln!("Unknown quantity"),
                }
            }
            Some(("mode", args)) => {
                if let Some(mode) = mode_arg(args)? {
                    // Write value
                    device.set_current_mode(mode).await?;
                    println!("OK");
                } else {
                    // Read value
                    let mode = device.get_current_mode().await?;
                    println!("Mode: {} ({})", mode, mode.keyword());
                }
            }
            Some(("setting", args)) => {
                if let Some(mode) = mode_arg(args)? {
                    if let Some(value) = args.get_one::<f64>("value") {
                        device.set_mode_setting(mode, *value).await?;
                        println!("OK");
                    } else {
                        let value = device.get_mode_setting(mode).await?;
                        println!("{} setting: {} {}", mode, value, mode.unit());
                    }
                }
            }
            Some(("limits", args)) => {
                if let Some(mode) = mode_arg(args)? {
                    let min = device.get_mode_setting_min(mode).await?;
                    let max = device.get_mode_setting_max(mode).await?;
                    println!("{} range: {} .. {} {}", mode, min, max, mode.unit());
                }
            }
            Some(("input", args)) => {
                if let Some(enabled) = args.get_one::<bool>("enabled") {
                    device.enable_output(*enabled).await?;
                    println!("OK");
                }
            }
            _ => {
                eprintln!("Unknown command");
            }
        }
    }

    Ok(())
}
