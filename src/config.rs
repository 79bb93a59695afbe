use std::time::Duration;

use crate::{DEFAULT_BAUDRATE, DEFAULT_RECEIVE_DELAY, DEFAULT_TIMEOUT};

/// How a device waits for an answer after writing a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadPolicy {
    /// Sleep for the whole receive delay, then take whatever arrived.
    #[default]
    FixedDelay,
    /// Check for received bytes every `interval` and stop waiting as soon as
    /// the answer stops growing. The receive delay bounds how long to wait
    /// for the first byte.
    Poll { interval: Duration },
}

/// Connection and exchange parameters of a [`Device`](crate::Device).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub baud_rate: u32,
    /// Upper bound for reading bytes the port reported as available.
    pub timeout: Duration,
    /// Wait between writing a command and draining the answer.
    pub receive_delay: Duration,
    pub read_policy: ReadPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUDRATE,
            timeout: DEFAULT_TIMEOUT,
            receive_delay: DEFAULT_RECEIVE_DELAY,
            read_policy: ReadPolicy::FixedDelay,
        }
    }
}

impl Config {
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_receive_delay(mut self, receive_delay: Duration) -> Self {
        self.receive_delay = receive_delay;
        self
    }

    pub fn with_read_policy(mut self, read_policy: ReadPolicy) -> Self {
        self.read_policy = read_policy;
        self
    }
}
