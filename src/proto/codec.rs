use bytes::BytesMut;
use std::{
    fmt::{self, Write},
    io,
};
use tokio_util::codec::Encoder;

use crate::proto::command::Command;

/// Command terminator. The device answers with its own line framing,
/// so no newline is sent.
const TERMINATOR: char = '\r';

#[derive(Debug, Default)]
pub struct ProtocolCodec;

fn write_fmt_guarded(dst: &mut BytesMut, args: fmt::Arguments<'_>) -> Result<(), io::Error> {
    dst.write_fmt(args)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
}

fn render_into(dst: &mut BytesMut, path: &str, argument: Option<&str>) -> Result<(), io::Error> {
    match argument {
        Some(argument) => write_fmt_guarded(
            dst,
            format_args!(":{} {}{}", path, argument, TERMINATOR),
        ),
        None => write_fmt_guarded(dst, format_args!(":{}{}", path, TERMINATOR)),
    }
}

/// Render a command path and its optional argument to wire bytes.
pub fn render(path: &str, argument: Option<&str>) -> Result<BytesMut, io::Error> {
    let mut dst = BytesMut::with_capacity(path.len() + argument.map_or(0, str::len) + 3);
    render_into(&mut dst, path, argument)?;
    Ok(dst)
}

impl Encoder<Command> for ProtocolCodec {
    type Error = io::Error;

    fn encode(&mut self, item: Command, dst: &mut BytesMut) -> Result<(), Self::Error> {
        render_into(dst, &item.path(), item.argument().as_deref())
    }
}
