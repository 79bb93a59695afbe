pub mod codec;
pub mod command;
pub mod mode;
pub mod observer;
pub mod port;
pub mod response;

#[cfg(test)]
pub mod fake;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtoError {
    #[error("I/O error: {:?}", _0)]
    Io(#[from] std::io::Error),

    #[error("Unable to open serial port: {}", _0)]
    Connection(#[source] tokio_serial::Error),

    #[error("No response from device")]
    NoResponse,
    #[error("Unknown mode keyword: {:?}", _0)]
    UnknownMode(String),
    #[error("Malformed number in response: {:?}", _0)]
    MalformedNumber(String),
    #[error("Setpoint is not a finite number: {}", _0)]
    InvalidValue(f64),
    #[error("Response is not valid text: {}", _0)]
    Decode(#[from] std::str::Utf8Error),
}

pub type Result<T> = std::result::Result<T, ProtoError>;
