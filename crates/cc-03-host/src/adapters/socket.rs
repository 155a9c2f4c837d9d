//! # Socket Transport
//!
//! Exposes the host entry points to an external consensus engine over TCP.
//!
//! ```text
//! frame    = len:u32be body
//! request  = bincode(Request)
//! response = bincode(Response)
//! ```
//!
//! Requests on one connection are answered in order.

use crate::domain::{HostError, HostInfo};
use crate::service::HostService;
use serde::{Deserialize, Serialize};
use shared_types::{HostResult, ResultCode, TxId};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Largest accepted frame body.
pub const MAX_FRAME_LEN: usize = 4 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Request {
    Info,
    CheckTx(Vec<u8>),
    DeliverTx(Vec<u8>),
    Commit,
}

/// `HostResult` with every field always present on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultFrame {
    pub code: u32,
    pub data: Vec<u8>,
    pub log: String,
}

impl From<HostResult> for ResultFrame {
    fn from(result: HostResult) -> Self {
        Self {
            code: result.code.as_u32(),
            data: result.data,
            log: result.log,
        }
    }
}

impl ResultFrame {
    pub fn into_result(self) -> HostResult {
        let code = ResultCode::from_u32(self.code).unwrap_or(ResultCode::InternalError);
        HostResult {
            code,
            data: self.data,
            log: self.log,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    Info(HostInfo),
    CheckTx(ResultFrame),
    DeliverTx(ResultFrame),
    /// `data` holds the 32-byte app hash.
    Commit(ResultFrame),
    Exception(String),
}

/// Strip the `tcp://` scheme from a listen address.
pub fn parse_listen_addr(addr: &str) -> Result<SocketAddr, HostError> {
    let bare = match addr.split_once("://") {
        Some(("tcp", rest)) => rest,
        Some((scheme, _)) => {
            return Err(HostError::Transport(format!(
                "unsupported address scheme: {scheme}"
            )))
        }
        None => addr,
    };
    bare.parse()
        .map_err(|e| HostError::Transport(format!("invalid listen address {addr}: {e}")))
}

async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Option<Vec<u8>>, HostError> {
    let mut len = [0u8; 4];
    match reader.read_exact(&mut len).await {
        Ok(_) => {}
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(HostError::Transport(e.to_string())),
    }
    let len = u32::from_be_bytes(len) as usize;
    if len > MAX_FRAME_LEN {
        return Err(HostError::Transport(format!("frame too large: {len} bytes")));
    }
    let mut body = vec![0u8; len];
    reader
        .read_exact(&mut body)
        .await
        .map_err(|e| HostError::Transport(e.to_string()))?;
    Ok(Some(body))
}

async fn write_frame<W: AsyncWrite + Unpin, T: Serialize>(
    writer: &mut W,
    value: &T,
) -> Result<(), HostError> {
    let body = bincode::serialize(value).map_err(|e| HostError::Transport(e.to_string()))?;
    let len = u32::try_from(body.len())
        .map_err(|_| HostError::Transport(format!("frame too large: {} bytes", body.len())))?;
    writer
        .write_all(&len.to_be_bytes())
        .await
        .map_err(|e| HostError::Transport(e.to_string()))?;
    writer
        .write_all(&body)
        .await
        .map_err(|e| HostError::Transport(e.to_string()))?;
    writer
        .flush()
        .await
        .map_err(|e| HostError::Transport(e.to_string()))
}

fn tx_reply(result: Result<TxId, HostError>) -> ResultFrame {
    match result {
        Ok(tx_id) => HostResult::ok_with_data(tx_id.as_bytes().to_vec()).into(),
        Err(e) => HostResult::from(e).into(),
    }
}

fn dispatch(host: &HostService, request: Request) -> Response {
    match request {
        Request::Info => Response::Info(host.info_snapshot()),
        Request::CheckTx(tx) => Response::CheckTx(tx_reply(host.check(&tx))),
        Request::DeliverTx(tx) => Response::DeliverTx(tx_reply(host.deliver(&tx))),
        Request::Commit => Response::Commit(match host.commit() {
            Ok(block) => HostResult::ok_with_data(block.app_hash.to_vec()).into(),
            Err(e) => HostResult::from(e).into(),
        }),
    }
}

pub struct SocketServer {
    listener: TcpListener,
    host: Arc<HostService>,
}

impl SocketServer {
    pub async fn bind(addr: &str, host: Arc<HostService>) -> Result<Self, HostError> {
        let addr = parse_listen_addr(addr)?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| HostError::Transport(format!("bind {addr}: {e}")))?;
        Ok(Self { listener, host })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, HostError> {
        self.listener
            .local_addr()
            .map_err(|e| HostError::Transport(e.to_string()))
    }

    /// Accept connections until `shutdown` flips.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        if let Ok(addr) = self.listener.local_addr() {
            info!(%addr, "Socket transport listening");
        }
        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        debug!(%peer, "Socket connection accepted");
                        tokio::spawn(serve_connection(stream, self.host.clone()));
                    }
                    Err(e) => error!(error = %e, "Socket accept failed"),
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("Socket transport stopped");
    }
}

async fn serve_connection(mut stream: TcpStream, host: Arc<HostService>) {
    loop {
        let body = match read_frame(&mut stream).await {
            Ok(Some(body)) => body,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Socket read failed");
                break;
            }
        };
        let response = match bincode::deserialize::<Request>(&body) {
            Ok(request) => dispatch(&host, request),
            Err(e) => Response::Exception(format!("malformed request: {e}")),
        };
        if let Err(e) = write_frame(&mut stream, &response).await {
            warn!(error = %e, "Socket write failed");
            break;
        }
    }
}

/// Client side of the socket transport.
pub struct SocketClient {
    stream: TcpStream,
}

impl SocketClient {
    pub async fn connect(addr: SocketAddr) -> Result<Self, HostError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| HostError::Transport(e.to_string()))?;
        Ok(Self { stream })
    }

    pub async fn request(&mut self, request: &Request) -> Result<Response, HostError> {
        write_frame(&mut self.stream, request).await?;
        let body = read_frame(&mut self.stream)
            .await?
            .ok_or_else(|| HostError::Transport("connection closed".to_string()))?;
        bincode::deserialize(&body).map_err(|e| HostError::Transport(e.to_string()))
    }
}
