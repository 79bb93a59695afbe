use std::fmt;

use super::command::Command;

/// Receives notifications about every exchange a device performs.
///
/// All methods default to doing nothing. Observers only watch, they cannot
/// influence results or errors.
pub trait Observer: Send + Sync {
    fn command_sent(&self, _command: &Command) {}

    fn response_received(&self, _command: &Command, _response: &str) {}

    fn no_response(&self, _command: &Command) {}

    fn value_decoded(&self, _label: &str, _value: &dyn fmt::Display) {}
}

/// Forwards exchange notifications to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn command_sent(&self, command: &Command) {
        log::debug!("Sending command {}", command);
    }

    fn response_received(&self, command: &Command, response: &str) {
        log::trace!("Received response {:?} for {}", response, command);
    }

    fn no_response(&self, command: &Command) {
        log::debug!("No response for {}", command);
    }

    fn value_decoded(&self, label: &str, value: &dyn fmt::Display) {
        log::debug!("{}: {}", label, value);
    }
}
