use std::io::{ErrorKind, Read, Write};
use std::net::TcpStream;

use crate::error::{Result, TransportError};
use crate::traits::Channel;

const READ_CHUNK_SIZE: usize = 1024;

/// Channel adapter for non-blocking byte streams (TCP, Unix sockets, serial
/// ports — anything `Read + Write`).
///
/// `receive` drains whatever is available without blocking and hands it back
/// as one frame; the sender is expected to pace frames so that at most one is
/// in flight per drain, which is the usual regime on a command/response
/// serial link.
pub struct StreamChannel<T> {
    inner: T,
}

impl<T: Read + Write> StreamChannel<T> {
    /// Wrap a stream. The stream must already be in non-blocking mode (or
    /// carry a short read timeout); see [`StreamChannel::tcp`].
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the channel and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl StreamChannel<TcpStream> {
    /// Wrap a TCP stream, switching it to non-blocking mode.
    pub fn tcp(stream: TcpStream) -> Result<Self> {
        stream.set_nonblocking(true)?;
        stream.set_nodelay(true)?;
        if let Ok(peer) = stream.peer_addr() {
            tracing::debug!(%peer, "tcp stream channel ready");
        }
        Ok(Self::new(stream))
    }
}

impl<T: Read + Write> Channel for StreamChannel<T> {
    fn receive(&mut self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        let mut chunk = [0u8; READ_CHUNK_SIZE];

        loop {
            match self.inner.read(&mut chunk) {
                Ok(0) => {
                    if out.is_empty() {
                        return Err(TransportError::ConnectionClosed);
                    }
                    return Ok(out);
                }
                Ok(n) => out.extend_from_slice(&chunk[..n]),
                Err(err)
                    if err.kind() == ErrorKind::WouldBlock
                        || err.kind() == ErrorKind::TimedOut =>
                {
                    return Ok(out);
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }

    fn send(&mut self, frame: &[u8]) -> Result<()> {
        let mut offset = 0usize;
        while offset < frame.len() {
            match self.inner.write(&frame[offset..]) {
                Ok(0) => return Err(TransportError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }

        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }
}
