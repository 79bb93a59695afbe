//!
//! This library provides communication with a KEL102 programmable electronic load.
//!
//! <br>
//!
//! # Details
//!
//! - The load is attached through its USB/RS232 serial interface.
//!
//! - Commands are ASCII lines in a SCPI-like dialect, answers are prefixed
//!   with a `>` prompt. The device gives no completion signal, so every
//!   exchange waits a fixed receive delay (100 ms by default) and then takes
//!   whatever has arrived. See [`config::ReadPolicy`] for a polling variant.
//!
//! - Basic setup and connection
//!
//!   ```no_run
//!   use kel102ctrl::{Device, Mode, DEFAULT_BAUDRATE};
//!   #[tokio::main]
//!   async fn main() -> kel102ctrl::Result<()> {
//!       let mut device = Device::new("/dev/ttyUSB0", DEFAULT_BAUDRATE)?;
//!       device.set_current_mode(Mode::ConstantCurrent).await?;
//!       device.set_mode_setting(Mode::ConstantCurrent, 0.5).await?;
//!       device.enable_output(true).await?;
//!       eprintln!("Load voltage: {} V", device.get_load_voltage().await?);
//!       Ok(())
//!   }
//!   ```
//!
//! # Supported devices
//!
//!  * Korad / RND KEL102
//!

use std::time::Duration;

pub mod config;
pub mod device;
pub mod proto;

pub use config::{Config, ReadPolicy};
pub use device::{Device, Status};
pub use proto::mode::Mode;
pub use proto::{ProtoError, Result};

#[cfg(unix)]
pub const DEFAULT_TTY: &str = "/dev/ttyUSB0";
#[cfg(windows)]
pub const DEFAULT_TTY: &str = "COM1";

/// Default Baudrate for KEL102.
pub const DEFAULT_BAUDRATE: u32 = 115200;

/// Default serial read timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// Default wait between sending a command and reading the answer.
pub const DEFAULT_RECEIVE_DELAY: Duration = Duration::from_millis(100);
