use futures::SinkExt;
use std::{fmt, io, time::Duration};
use tokio::io::AsyncReadExt;
use tokio::time::{sleep, timeout, Instant};
use tokio_serial::{SerialPortBuilderExt, SerialStream};
use tokio_util::codec::FramedWrite;

use crate::config::{Config, ReadPolicy};
use crate::proto::{
    codec::ProtocolCodec,
    command::Command,
    mode::Mode,
    observer::{LogObserver, Observer},
    port::Port,
    response::{normalize_response, strip_unit_and_parse},
    ProtoError, Result,
};

/// Snapshot of the load: active mode and the three measured quantities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Status {
    pub mode: Mode,
    pub voltage: f64,
    pub current: f64,
    pub power: f64,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mode: {}", self.mode)?;
        writeln!(f, "Voltage: {} V", self.voltage)?;
        writeln!(f, "Current: {} A", self.current)?;
        write!(f, "Power: {} W", self.power)
    }
}

/// An open connection to the electronic load.
///
/// The protocol is strictly request/response without any correlation of
/// answers to commands, so every exchange borrows the device mutably. Share
/// a device between tasks only behind a mutex held for the whole call.
pub struct Device<P: Port = SerialStream> {
    stream: FramedWrite<P, ProtocolCodec>,
    config: Config,
    observer: Box<dyn Observer>,
}

impl Device {
    pub fn new(com: impl AsRef<str>, baudrate: u32) -> Result<Self> {
        Self::with_config(com, Config::default().with_baud_rate(baudrate))
    }

    pub fn with_config(com: impl AsRef<str>, config: Config) -> Result<Self> {
        let com = com.as_ref();
        let port = open_port(com, &config).map_err(|err| {
            log::error!("Error connecting to {}: {}", com, err);
            ProtoError::Connection(err)
        })?;
        log::info!(
            "Successfully connected to {} at {} baud.",
            com,
            config.baud_rate
        );
        Ok(Self::from_port(port, config))
    }
}

fn open_port(com: &str, config: &Config) -> tokio_serial::Result<SerialStream> {
    #[allow(unused_mut)]
    let mut port = tokio_serial::new(com, config.baud_rate)
        .timeout(config.timeout)
        .open_native_async()?;

    #[cfg(unix)]
    port.set_exclusive(true)?;

    Ok(port)
}

#[cfg(test)]
impl Device<crate::proto::fake::FakePort> {
    pub(crate) fn new_faked(replies: &[&str]) -> Self {
        Self::from_port(
            crate::proto::fake::FakePort::new(replies),
            Config::default().with_receive_delay(Duration::ZERO),
        )
    }
}

impl<P: Port> Device<P> {
    /// Wrap an already opened transport.
    pub fn from_port(port: P, config: Config) -> Self {
        Self {
            stream: FramedWrite::new(port, ProtocolCodec),
            config,
            observer: Box::new(LogObserver),
        }
    }

    pub fn set_observer(&mut self, observer: impl Observer + 'static) {
        self.observer = Box::new(observer);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn port(&self) -> &P {
        self.stream.get_ref()
    }

    /// Write `command`, wait and drain whatever the device sent back.
    ///
    /// Returns `None` if no byte arrived in time. There is no retry, a
    /// missed answer is left to the caller.
    ///
    /// A read that exceeds the configured timeout fails with
    /// [`io::ErrorKind::TimedOut`]. Whatever part of that answer is still
    /// buffered in the port is discarded along with it.
    pub async fn exchange(
        &mut self,
        command: Command,
        receive_delay: Duration,
    ) -> Result<Option<String>> {
        self.observer.command_sent(&command);
        if let Err(err) = self.stream.send(command.clone()).await {
            // Unsent bytes must not go out with the next command.
            self.stream.write_buffer_mut().clear();
            return Err(err.into());
        }

        let waiting = self.wait_for_response(receive_delay).await?;
        if waiting == 0 {
            self.observer.no_response(&command);
            return Ok(None);
        }

        let mut buf = vec![0u8; waiting];
        let read_timeout = self.config.timeout;
        let read = timeout(read_timeout, self.stream.get_mut().read_exact(&mut buf)).await;
        match read {
            Ok(read) => {
                read?;
            }
            Err(_) => {
                self.stream.get_mut().discard_input()?;
                return Err(
                    io::Error::new(io::ErrorKind::TimedOut, "Timeout reading response").into(),
                );
            }
        }

        let response = normalize_response(&buf)?;
        if let Some(text) = &response {
            self.observer.response_received(&command, text);
        }
        Ok(response)
    }

    async fn wait_for_response(&mut self, receive_delay: Duration) -> Result<usize> {
        match self.config.read_policy {
            ReadPolicy::FixedDelay => {
                sleep(receive_delay).await;
                Ok(self.port().bytes_waiting()?)
            }
            ReadPolicy::Poll { interval } => {
                let deadline = Instant::now() + receive_delay;
                let mut waiting = self.port().bytes_waiting()?;
                while waiting == 0 && Instant::now() < deadline {
                    sleep(interval).await;
                    waiting = self.port().bytes_waiting()?;
                }

                // Wait until the line is complete.
                let deadline = Instant::now() + self.config.timeout;
                while waiting > 0 && Instant::now() < deadline {
                    sleep(interval).await;
                    let now = self.port().bytes_waiting()?;
                    if now == waiting {
                        break;
                    }
                    waiting = now;
                }
                Ok(waiting)
            }
        }
    }

    async fn query(&mut self, command: Command) -> Result<String> {
        debug_assert!(command.is_query(), "{} expects no answer", command);
        let receive_delay = self.config.receive_delay;
        self.exchange(command, receive_delay)
            .await?
            .ok_or(ProtoError::NoResponse)
    }

    async fn query_value(&mut self, command: Command, unit: &str, label: &str) -> Result<f64> {
        let response = self.query(command).await?;
        let value = strip_unit_and_parse(&response, unit)?;
        self.observer.value_decoded(label, &value);
        Ok(value)
    }

    async fn send(&mut self, command: Command) -> Result<()> {
        debug_assert!(!command.is_query(), "{} expects an answer", command);
        let receive_delay = self.config.receive_delay;
        self.exchange(command, receive_delay).await?;
        Ok(())
    }

    /// Switch the load input on or off.
    pub async fn enable_output(&mut self, enable: bool) -> Result<()> {
        self.send(Command::SetInput(enable)).await
    }

    /// Measured current in ampere.
    pub async fn get_load_current(&mut self) -> Result<f64> {
        self.query_value(Command::MeasureCurrent, "A", "Load current")
            .await
    }

    /// Measured voltage in volt.
    pub async fn get_load_voltage(&mut self) -> Result<f64> {
        self.query_value(Command::MeasureVoltage, "V", "Load voltage")
            .await
    }

    /// Measured power in watt.
    pub async fn get_load_power(&mut self) -> Result<f64> {
        self.query_value(Command::MeasurePower, "W", "Load power")
            .await
    }

    pub async fn get_current_mode(&mut self) -> Result<Mode> {
        let response = self.query(Command::GetFunction).await?;
        let mode = Mode::from_keyword(&response)?;
        self.observer.value_decoded("Current mode", &mode);
        Ok(mode)
    }

    pub async fn set_current_mode(&mut self, mode: Mode) -> Result<()> {
        self.send(Command::SetFunction(mode)).await
    }

    /// Setpoint of `mode`, in the unit of that mode.
    pub async fn get_mode_setting(&mut self, mode: Mode) -> Result<f64> {
        let label = format!("Current {} setting", mode);
        self.query_value(Command::GetSetting(mode), mode.unit(), &label)
            .await
    }

    /// Set the setpoint of `mode`. The value is sent in its shortest decimal
    /// form (`12.0` as `12V`); NaN and infinities are rejected without
    /// writing anything.
    pub async fn set_mode_setting(&mut self, mode: Mode, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(ProtoError::InvalidValue(value));
        }
        self.send(Command::SetSetting(mode, value)).await
    }

    /// Smallest setpoint the device accepts for `mode`.
    pub async fn get_mode_setting_min(&mut self, mode: Mode) -> Result<f64> {
        let label = format!("Minimal allowed {} value", mode);
        self.query_value(Command::GetSettingLower(mode), mode.unit(), &label)
            .await
    }

    /// Largest setpoint the device accepts for `mode`.
    pub async fn get_mode_setting_max(&mut self, mode: Mode) -> Result<f64> {
        let label = format!("Maximum allowed {} value", mode);
        self.query_value(Command::GetSettingUpper(mode), mode.unit(), &label)
            .await
    }

    /// Read mode, voltage, current and power, in this order.
    pub async fn status(&mut self) -> Result<Status> {
        let mode = self.get_current_mode().await?;
        let voltage = self.get_load_voltage().await?;
        let current = self.get_load_current().await?;
        let power = self.get_load_power().await?;
        Ok(Status {
            mode,
            voltage,
            current,
            power,
        })
    }
}
