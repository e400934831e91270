// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TCP client for `vead`'s Request Dispatcher (spec §4.8, §6).

use tokio::net::TcpStream;
use vea_wire::{read_message, write_message, ProtocolError, Request, Response};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("could not connect to vead at {0}: {1}")]
    Connect(String, std::io::Error),
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
    #[error("unexpected response: {0:?}")]
    UnexpectedResponse(Response),
    #[error("{0}")]
    Remote(String),
}

/// A single connection to `vead`. Requests are sent and their matching
/// response awaited in lock-step; this client does not multiplex
/// concurrent requests over one connection.
pub struct VeaClient {
    stream: TcpStream,
}

impl VeaClient {
    pub async fn connect(host: &str, port: u16) -> Result<Self, ClientError> {
        let addr = format!("{host}:{port}");
        let stream =
            TcpStream::connect(&addr).await.map_err(|e| ClientError::Connect(addr.clone(), e))?;
        Ok(Self { stream })
    }

    /// Sends `request` and returns the matching response, unwrapping a
    /// server-side `Error` envelope into `ClientError::Remote`.
    pub async fn call(&mut self, request: Request) -> Result<Response, ClientError> {
        write_message(&mut self.stream, &request).await?;
        loop {
            let response: Response = read_message(&mut self.stream).await?;
            if response.id() != request.id() {
                // A stream event or a response correlated with a different
                // in-flight request slipped in; this client only issues
                // one request at a time, so that should not happen, but
                // skip rather than misreport.
                continue;
            }
            return match response {
                Response::Error { error, .. } => Err(ClientError::Remote(error)),
                other => Ok(other),
            };
        }
    }
}

/// Generates a fresh request correlation id.
pub fn request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
