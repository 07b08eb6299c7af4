#![allow(dead_code)]
use super::dns_server_mock::{MockBehavior, QueryLog};
use std::net::SocketAddr;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

/// How the DoH mock replies at the HTTP level.
#[derive(Debug, Clone)]
pub enum DohReply {
    /// 200 with `application/dns-message` and the behavior's DNS reply.
    Dns(MockBehavior),
    /// This status with an empty body.
    Status(u16),
    /// 200 with the DNS reply under another content type.
    WrongContentType(MockBehavior),
}

/// Plain HTTP/1.1 DNS-over-HTTPS endpoint at `/dns-query`.
pub struct MockDohServer {
    addr: SocketAddr,
    queries: QueryLog,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDohServer {
    pub async fn start(reply: DohReply) -> Result<Self, std::io::Error> {
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
                            tokio::spawn(serve_http(stream, reply.clone(), log.clone()));
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

    pub fn url(&self) -> String {
        format!("http://{}/dns-query", self.addr)
    }

    pub fn queries(&self) -> Vec<Vec<u8>> {
        self.queries.lock().unwrap().clone()
    }
}

impl Drop for MockDohServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn serve_http(mut stream: TcpStream, reply: DohReply, log: QueryLog) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    let header_end = loop {
        let Ok(n) = stream.read(&mut buf).await else {
            return;
        };
        if n == 0 {
            return;
        }
        request.extend_from_slice(&buf[..n]);
        if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&request[..header_end]).to_ascii_lowercase();
    let content_length = head
        .lines()
        .find_map(|line| line.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while request.len() < header_end + content_length {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    let query = request[header_end..header_end + content_length].to_vec();
    log.lock().unwrap().push(query.clone());

    let (status, content_type, body) = match reply {
        DohReply::Dns(behavior) => (
            200,
            "application/dns-message",
            behavior.respond(&query).unwrap_or_default(),
        ),
        DohReply::Status(code) => (code, "text/plain", Vec::new()),
        DohReply::WrongContentType(behavior) => (
            200,
            "text/html",
            behavior.respond(&query).unwrap_or_default(),
        ),
    };

    let head = format!(
        "HTTP/1.1 {} X\r\ncontent-type: {}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
        status,
        content_type,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes()).await;
    let _ = stream.write_all(&body).await;
    let _ = stream.shutdown().await;
}
