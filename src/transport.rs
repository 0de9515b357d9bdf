// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Peer channel: ordered, line-oriented duplex transport to the simulator.

use std::io;
#[cfg(unix)]
use std::path::Path;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

/// One message per line in each direction, delivered in order.
#[async_trait]
pub trait PeerChannel: Send {
    /// Read the next line without its terminator. `Ok(None)` means the peer
    /// closed the channel.
    ///
    /// A line that is not UTF-8 is consumed whole and reported as
    /// [`io::ErrorKind::InvalidData`]; the channel stays usable.
    async fn recv_line(&mut self) -> io::Result<Option<String>>;

    /// Write `line` followed by a newline and flush.
    ///
    /// The line is written with a single `write_all`, so a caller that is
    /// cancelled between calls never leaves a partial message behind.
    async fn send_line(&mut self, line: &str) -> io::Result<()>;
}

/// [`PeerChannel`] over any async reader/writer pair.
pub struct LineChannel<R, W> {
    reader: BufReader<R>,
    writer: W,
    buf: Vec<u8>,
}

impl<R, W> LineChannel<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
            buf: Vec::new(),
        }
    }
}

#[async_trait]
impl<R, W> PeerChannel for LineChannel<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn recv_line(&mut self) -> io::Result<Option<String>> {
        self.buf.clear();
        let n = self.reader.read_until(b'\n', &mut self.buf).await?;
        if n == 0 {
            return Ok(None);
        }
        let line = String::from_utf8(std::mem::take(&mut self.buf))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    async fn send_line(&mut self, line: &str) -> io::Result<()> {
        let mut framed = String::with_capacity(line.len() + 1);
        framed.push_str(line.trim_end_matches('\n'));
        framed.push('\n');
        self.writer.write_all(framed.as_bytes()).await?;
        self.writer.flush().await
    }
}

/// Channel over the process's stdin/stdout.
pub type StdioChannel = LineChannel<tokio::io::Stdin, tokio::io::Stdout>;

/// Talk to the simulator over this process's standard streams.
pub fn stdio() -> StdioChannel {
    LineChannel::new(tokio::io::stdin(), tokio::io::stdout())
}

/// Channel over a Unix domain socket.
#[cfg(unix)]
pub type UnixChannel =
    LineChannel<tokio::net::unix::OwnedReadHalf, tokio::net::unix::OwnedWriteHalf>;

/// Connect to a simulator listening on a Unix domain socket.
#[cfg(unix)]
pub async fn connect_unix(path: &Path) -> io::Result<UnixChannel> {
    let stream = tokio::net::UnixStream::connect(path).await?;
    let (read_half, write_half) = stream.into_split();
    Ok(LineChannel::new(read_half, write_half))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_recv_lines_and_eof() {
        let (mut peer, local) = tokio::io::duplex(1024);
        let (read_half, write_half) = tokio::io::split(local);
        let mut channel = LineChannel::new(read_half, write_half);

        peer.write_all(b"{\"type\":\"ACK\"}\r\nsecond\n").await.unwrap();
        drop(peer);

        assert_eq!(channel.recv_line().await.unwrap().as_deref(), Some("{\"type\":\"ACK\"}"));
        assert_eq!(channel.recv_line().await.unwrap().as_deref(), Some("second"));
        assert_eq!(channel.recv_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_recv_final_line_without_newline() {
        let (mut peer, local) = tokio::io::duplex(64);
        let (read_half, write_half) = tokio::io::split(local);
        let mut channel = LineChannel::new(read_half, write_half);

        peer.write_all(b"tail").await.unwrap();
        drop(peer);

        assert_eq!(channel.recv_line().await.unwrap().as_deref(), Some("tail"));
        assert_eq!(channel.recv_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_recv_invalid_utf8_keeps_channel() {
        let (mut peer, local) = tokio::io::duplex(64);
        let (read_half, write_half) = tokio::io::split(local);
        let mut channel = LineChannel::new(read_half, write_half);

        peer.write_all(b"\xff\xfe garbage\nnext\n").await.unwrap();
        drop(peer);

        let err = channel.recv_line().await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert_eq!(channel.recv_line().await.unwrap().as_deref(), Some("next"));
        assert_eq!(channel.recv_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_send_line_terminates_once() {
        let (mut peer, local) = tokio::io::duplex(256);
        let (read_half, write_half) = tokio::io::split(local);
        let mut channel = LineChannel::new(read_half, write_half);

        channel.send_line("{\"type\":\"READY\"}").await.unwrap();
        channel.send_line("{\"type\":\"RESET\",\"episode_number\":2}\n").await.unwrap();
        drop(channel);

        let mut out = String::new();
        peer.read_to_string(&mut out).await.unwrap();
        assert_eq!(out, "{\"type\":\"READY\"}\n{\"type\":\"RESET\",\"episode_number\":2}\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unix_socket_roundtrip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let socket_path = temp_dir.path().join("sim.sock");
        let listener = tokio::net::UnixListener::bind(&socket_path).unwrap();

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (r, w) = stream.into_split();
            let mut sim = LineChannel::new(r, w);
            sim.send_line("{\"type\":\"EPISODE_END\"}").await.unwrap();
            sim.recv_line().await.unwrap()
        });

        let mut agent = connect_unix(&socket_path).await.unwrap();
        let line = agent.recv_line().await.unwrap();
        assert_eq!(line.as_deref(), Some("{\"type\":\"EPISODE_END\"}"));
        agent.send_line("{\"type\":\"RESET\",\"episode_number\":2}").await.unwrap();

        let echoed = server.await.unwrap();
        assert_eq!(echoed.as_deref(), Some("{\"type\":\"RESET\",\"episode_number\":2}"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_connect_unix_missing_socket() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = connect_unix(&temp_dir.path().join("absent.sock")).await;
        assert!(result.is_err());
    }
}
