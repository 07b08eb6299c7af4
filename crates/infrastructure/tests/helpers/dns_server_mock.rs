#![allow(dead_code)]
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tokio::sync::oneshot;

pub const RCODE_SERVFAIL: u8 = 2;
pub const RCODE_NXDOMAIN: u8 = 3;
pub const RCODE_REFUSED: u8 = 5;

/// How the mock answers each query.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// NOERROR with these addresses for A and AAAA questions.
    Answer { v4: Vec<Ipv4Addr>, v6: Vec<Ipv6Addr> },
    /// Empty answer with this response code.
    Rcode(u8),
    /// Valid answer under a different message ID.
    WrongId,
    /// Bytes that are not a DNS message.
    Garbage,
    /// Never replies.
    Silent,
}

impl MockBehavior {
    pub fn example() -> Self {
        Self::Answer {
            v4: vec![Ipv4Addr::new(93, 184, 216, 34)],
            v6: vec!["2606:2800:220:1:248:1893:25c8:1946".parse().unwrap()],
        }
    }

    pub fn respond(&self, query: &[u8]) -> Option<Vec<u8>> {
        match self {
            Self::Answer { v4, v6 } => Some(build_response(query, 0, v4, v6)),
            Self::Rcode(rcode) => Some(build_response(query, *rcode, &[], &[])),
            Self::WrongId => {
                let mut response = build_response(query, 0, &[Ipv4Addr::LOCALHOST], &[]);
                response[0] ^= 0xFF;
                Some(response)
            }
            Self::Garbage => {
                let mut garbage = query.get(..2).unwrap_or(&[0, 0]).to_vec();
                garbage.push(0x81);
                Some(garbage)
            }
            Self::Silent => None,
        }
    }
}

/// Length of the header plus first question of `query`.
fn question_end(query: &[u8]) -> usize {
    let mut pos = 12;
    while pos < query.len() && query[pos] != 0 {
        pos += 1 + query[pos] as usize;
    }
    (pos + 5).min(query.len())
}

/// Builds a reply echoing the question of `query`, answering A questions
/// from `v4` and AAAA questions from `v6`. Any additional records of the
/// query (e.g. padding) are dropped.
pub fn build_response(query: &[u8], rcode: u8, v4: &[Ipv4Addr], v6: &[Ipv6Addr]) -> Vec<u8> {
    if query.len() < 12 {
        return vec![];
    }
    let end = question_end(query);
    let qtype = if end >= 4 {
        u16::from_be_bytes([query[end - 4], query[end - 3]])
    } else {
        0
    };

    let mut answers: Vec<(u16, Vec<u8>)> = Vec::new();
    if rcode == 0 {
        match qtype {
            1 => answers.extend(v4.iter().map(|ip| (1, ip.octets().to_vec()))),
            28 => answers.extend(v6.iter().map(|ip| (28, ip.octets().to_vec()))),
            _ => {}
        }
    }

    let mut response = Vec::with_capacity(512);
    response.extend_from_slice(&query[0..2]);
    response.push(0x81);
    response.push(0x80 | (rcode & 0x0F));
    response.extend_from_slice(&[0x00, 0x01]);
    response.extend_from_slice(&(answers.len() as u16).to_be_bytes());
    response.extend_from_slice(&[0x00, 0x00]);
    response.extend_from_slice(&[0x00, 0x00]);
    response.extend_from_slice(&query[12..end]);

    for (rtype, rdata) in answers {
        response.extend_from_slice(&[0xc0, 0x0c]);
        response.extend_from_slice(&rtype.to_be_bytes());
        response.extend_from_slice(&[0x00, 0x01]);
        response.extend_from_slice(&[0x00, 0x00, 0x00, 0x3c]);
        response.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
        response.extend_from_slice(&rdata);
    }
    response
}

/// Queries seen by a mock server, in arrival order.
pub type QueryLog = Arc<Mutex<Vec<Vec<u8>>>>;

pub struct MockDnsServer {
    addr: SocketAddr,
    queries: QueryLog,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start_udp(behavior: MockBehavior) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = socket.local_addr()?;
        let queries = QueryLog::default();
        let log = queries.clone();
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            log.lock().unwrap().push(buf[..len].to_vec());
                            if let Some(response) = behavior.respond(&buf[..len]) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub async fn start_tcp(behavior: MockBehavior) -> Result<Self, std::io::Error> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let queries = QueryLog::default();
        let log = queries.clone();
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = listener.accept() => {
                        if let Ok((stream, _)) = result {
                            tokio::spawn(serve_framed(stream, behavior.clone(), log.clone()));
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn queries(&self) -> Vec<Vec<u8>> {
        self.queries.lock().unwrap().clone()
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Answers length-prefixed queries on one stream until the peer hangs up.
pub async fn serve_framed<S>(mut stream: S, behavior: MockBehavior, log: QueryLog)
where
    S: tokio::io::AsyncRead + tokio::io::AsyncWrite + Unpin,
{
    loop {
        let mut len_buf = [0u8; 2];
        if stream.read_exact(&mut len_buf).await.is_err() {
            return;
        }
        let mut query = vec![0u8; u16::from_be_bytes(len_buf) as usize];
        if stream.read_exact(&mut query).await.is_err() {
            return;
        }
        log.lock().unwrap().push(query.clone());

        match behavior.respond(&query) {
            Some(response) => {
                let _ = stream.write_all(&(response.len() as u16).to_be_bytes()).await;
                let _ = stream.write_all(&response).await;
                let _ = stream.flush().await;
            }
            None => {
                // Hold the connection open without answering.
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Accepts TCP connections and never writes to them.
pub async fn start_mute_tcp() -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let mut held: Vec<TcpStream> = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    (addr, handle)
}

/// An address on which nothing listens.
pub async fn closed_tcp_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_server_responds() {
        let server = MockDnsServer::start_udp(MockBehavior::example()).await.unwrap();
        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();

        let query = vec![
            0x12, 0x34, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x01,
        ];
        client.send_to(&query, server.addr()).await.unwrap();

        let mut buf = vec![0u8; 512];
        let (len, _) = client.recv_from(&mut buf).await.unwrap();

        assert!(len > 12);
        assert_eq!(buf[0..2], query[0..2]);
        assert_eq!(buf[2] & 0x80, 0x80);
        assert_eq!(server.queries().len(), 1);
    }
}
