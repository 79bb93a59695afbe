use std::io;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio_serial::{ClearBuffer, SerialPort, SerialStream};

/// Byte transport underneath a [`Device`](crate::Device).
///
/// Besides plain reading and writing the device needs to know how many
/// received bytes are buffered, because answers carry no length and the
/// session drains exactly what has arrived.
pub trait Port: AsyncRead + AsyncWrite + Unpin + Send {
    fn bytes_waiting(&self) -> io::Result<usize>;

    /// Drop everything received but not read yet.
    fn discard_input(&mut self) -> io::Result<()>;
}

impl Port for SerialStream {
    fn bytes_waiting(&self) -> io::Result<usize> {
        Ok(self.bytes_to_read()? as usize)
    }

    fn discard_input(&mut self) -> io::Result<()> {
        Ok(self.clear(ClearBuffer::Input)?)
    }
}
