use super::{BoxedConn, Dialer};
use async_trait::async_trait;
use ferrous_probe_domain::ProbeError;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{ready, Context, Poll};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::UdpSocket;
use tokio::time::Sleep;

/// Dialer that adds latency on top of another dialer, for tests and
/// slow-network emulation.
///
/// `connect_delay` is paid before every dial. `io_delay` is paid before
/// every read and write on the returned TCP stream; UDP sockets are only
/// delayed at connect.
pub struct ShapingDialer {
    inner: Arc<dyn Dialer>,
    connect_delay: Duration,
    io_delay: Duration,
}

impl ShapingDialer {
    pub fn new(inner: Arc<dyn Dialer>, connect_delay: Duration, io_delay: Duration) -> Self {
        Self {
            inner,
            connect_delay,
            io_delay,
        }
    }

    async fn pause(&self) {
        if !self.connect_delay.is_zero() {
            tokio::time::sleep(self.connect_delay).await;
        }
    }
}

#[async_trait]
impl Dialer for ShapingDialer {
    async fn connect(&self, address: &str) -> Result<BoxedConn, ProbeError> {
        self.pause().await;
        let conn = self.inner.connect(address).await?;
        if self.io_delay.is_zero() {
            return Ok(conn);
        }
        Ok(Box::new(ShapedStream::new(conn, self.io_delay)))
    }

    async fn connect_udp(&self, address: &str) -> Result<UdpSocket, ProbeError> {
        self.pause().await;
        self.inner.connect_udp(address).await
    }
}

/// Stream that sleeps `delay` before each read and each write reaches the
/// inner connection.
pub struct ShapedStream {
    inner: BoxedConn,
    delay: Duration,
    read_delay: Option<Pin<Box<Sleep>>>,
    write_delay: Option<Pin<Box<Sleep>>>,
}

impl ShapedStream {
    pub fn new(inner: BoxedConn, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            read_delay: None,
            write_delay: None,
        }
    }
}

fn poll_delay(slot: &mut Option<Pin<Box<Sleep>>>, delay: Duration, cx: &mut Context<'_>) -> Poll<()> {
    let sleep = slot.get_or_insert_with(|| Box::pin(tokio::time::sleep(delay)));
    sleep.as_mut().poll(cx)
}

impl AsyncRead for ShapedStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        ready!(poll_delay(&mut this.read_delay, this.delay, cx));
        let result = ready!(Pin::new(&mut this.inner).poll_read(cx, buf));
        this.read_delay = None;
        Poll::Ready(result)
    }
}

impl AsyncWrite for ShapedStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        ready!(poll_delay(&mut this.write_delay, this.delay, cx));
        let result = ready!(Pin::new(&mut this.inner).poll_write(cx, buf));
        this.write_delay = None;
        Poll::Ready(result)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}
