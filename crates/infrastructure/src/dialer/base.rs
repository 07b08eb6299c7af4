use super::{BoxedConn, Dialer, DEFAULT_CONNECT_TIMEOUT};
use crate::events::EventEmitter;
use async_trait::async_trait;
use ferrous_probe_application::ports::Resolver;
use ferrous_probe_domain::dns_protocol::split_host_port;
use ferrous_probe_domain::{ConnectEvent, DialPhase, FailureKind, NetworkEvent, ProbeError};
use std::future::Future;
use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::{TcpStream, UdpSocket};
use tracing::debug;

/// Dialer that times every connect attempt and reports it to the emitter.
///
/// Hostnames go through the injected resolver; each resolved address is
/// tried in order until one connects.
pub struct MeasuringDialer {
    resolver: Arc<dyn Resolver>,
    emitter: EventEmitter,
    connect_timeout: Duration,
}

impl MeasuringDialer {
    pub fn new(resolver: Arc<dyn Resolver>, emitter: EventEmitter) -> Self {
        Self {
            resolver,
            emitter,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    async fn resolve(&self, address: &str) -> Result<(Vec<IpAddr>, u16), ProbeError> {
        let (host, port) = split_host_port(address).ok_or_else(|| {
            ProbeError::InvalidEndpoint(format!("'{}' is not a host:port address", address))
        })?;

        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok((vec![ip], port));
        }

        let ips: Vec<IpAddr> = self
            .resolver
            .lookup_host(host)
            .await?
            .iter()
            .filter_map(|addr| addr.parse().ok())
            .collect();
        if ips.is_empty() {
            return Err(ProbeError::Resolution {
                hostname: host.to_string(),
                kind: FailureKind::DnsNoAnswer,
            });
        }
        Ok((ips, port))
    }

    async fn attempt<T, F, Fut>(
        &self,
        network: &'static str,
        addr: SocketAddr,
        op: F,
    ) -> Result<T, ProbeError>
    where
        F: FnOnce(SocketAddr) -> Fut,
        Fut: Future<Output = io::Result<T>>,
    {
        let started = Instant::now();
        let outcome = match tokio::time::timeout(self.connect_timeout, op(addr)).await {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => Err(FailureKind::from_io_error(&e)),
            Err(_) => Err(FailureKind::Timeout),
        };
        let duration = started.elapsed();

        let failure = outcome.as_ref().err().map(ToString::to_string);
        debug!(
            network = network,
            address = %addr,
            elapsed_ms = duration.as_millis() as u64,
            failure = ?failure,
            "Connect finished"
        );
        self.emitter.emit(NetworkEvent::Connect(ConnectEvent {
            network: network.to_string(),
            address: addr.to_string(),
            started: self.emitter.offset(started),
            duration,
            failure,
        }));

        outcome.map_err(|kind| ProbeError::Dial {
            phase: DialPhase::Connect,
            address: addr.to_string(),
            kind,
            elapsed: duration,
        })
    }

    async fn dial_each<T, F, Fut>(
        &self,
        network: &'static str,
        address: &str,
        op: F,
    ) -> Result<T, ProbeError>
    where
        F: Fn(SocketAddr) -> Fut,
        Fut: Future<Output = io::Result<T>>,
    {
        let (ips, port) = self.resolve(address).await?;

        let mut first_error = None;
        for ip in ips {
            match self.attempt(network, SocketAddr::new(ip, port), &op).await {
                Ok(conn) => return Ok(conn),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        Err(first_error.unwrap_or_else(|| {
            ProbeError::InvalidEndpoint(format!("no address to dial for '{}'", address))
        }))
    }
}

#[async_trait]
impl Dialer for MeasuringDialer {
    async fn connect(&self, address: &str) -> Result<BoxedConn, ProbeError> {
        let stream = self.dial_each("tcp", address, TcpStream::connect).await?;
        let _ = stream.set_nodelay(true);
        Ok(Box::new(stream))
    }

    async fn connect_udp(&self, address: &str) -> Result<UdpSocket, ProbeError> {
        self.dial_each("udp", address, |addr| async move {
            let local: SocketAddr = if addr.is_ipv4() {
                (Ipv4Addr::UNSPECIFIED, 0).into()
            } else {
                (Ipv6Addr::UNSPECIFIED, 0).into()
            };
            let socket = UdpSocket::bind(local).await?;
            socket.connect(addr).await?;
            Ok(socket)
        })
        .await
    }
}
