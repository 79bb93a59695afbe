use std::{collections::VecDeque, io, pin::Pin};

use super::port::Port;

/// Scripted stand-in for the serial line.
///
/// Every command terminator written releases the next queued reply into the
/// receive buffer, the way the device answers after it has read a full
/// command. An empty reply models a device that stays silent.
pub(crate) struct FakePort {
    replies: VecDeque<Vec<u8>>,
    received: Vec<u8>,
    written: Vec<u8>,
    // Number of upcoming writes that fail.
    fail_writes: usize,
    stall_reads: bool,
}

impl FakePort {
    pub(crate) fn new<I, R>(replies: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[u8]>,
    {
        Self {
            replies: replies.into_iter().map(|r| r.as_ref().to_vec()).collect(),
            received: Vec::new(),
            written: Vec::new(),
            fail_writes: 0,
            stall_reads: false,
        }
    }

    pub(crate) fn silent() -> Self {
        Self::new(Vec::<Vec<u8>>::new())
    }

    pub(crate) fn broken() -> Self {
        Self {
            fail_writes: usize::MAX,
            ..Self::silent()
        }
    }

    /// Port whose first `count` writes fail before the line recovers.
    pub(crate) fn failing_writes<I, R>(count: usize, replies: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[u8]>,
    {
        Self {
            fail_writes: count,
            ..Self::new(replies)
        }
    }

    /// Replies are announced as waiting but never delivered to a reader.
    pub(crate) fn stalled<I, R>(replies: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[u8]>,
    {
        Self {
            stall_reads: true,
            ..Self::new(replies)
        }
    }

    /// All commands written so far, terminator included.
    pub(crate) fn writes(&self) -> Vec<Vec<u8>> {
        self.written
            .split_inclusive(|b| *b == b'\r')
            .map(<[u8]>::to_vec)
            .collect()
    }
}

impl Port for FakePort {
    fn bytes_waiting(&self) -> io::Result<usize> {
        Ok(self.received.len())
    }

    fn discard_input(&mut self) -> io::Result<()> {
        self.received.clear();
        Ok(())
    }
}

impl tokio::io::AsyncRead for FakePort {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
        buf: &mut tokio::io::ReadBuf<'_>,
    ) -> std::task::Poll<std::io::Result<()>> {
        if self.stall_reads {
            return std::task::Poll::Pending;
        }
        if !self.received.is_empty() {
            let c = buf.remaining().min(self.received.len());
            buf.put_slice(&self.received[0..c]);
            self.received.drain(0..c);
        }
        std::task::Poll::Ready(Ok(()))
    }
}

impl tokio::io::AsyncWrite for FakePort {
    fn poll_write(
        mut self: Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
        buf: &[u8],
    ) -> std::task::Poll<std::result::Result<usize, std::io::Error>> {
        if self.fail_writes > 0 {
            self.fail_writes -= 1;
            return std::task::Poll::Ready(Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "line disconnected",
            )));
        }
        self.written.extend_from_slice(buf);
        for _ in buf.iter().filter(|b| **b == b'\r') {
            if let Some(reply) = self.replies.pop_front() {
                self.received.extend_from_slice(&reply);
            }
        }
        std::task::Poll::Ready(Ok(buf.len()))
    }

    fn poll_flush(
        self: Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::result::Result<(), std::io::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn poll_shutdown(
        self: Pin<&mut Self>,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::result::Result<(), std::io::Error>> {
        std::task::Poll::Ready(Ok(()))
    }
}
