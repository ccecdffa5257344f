//! One-shot blocking HTTP exchange
//!
//! Each call performs exactly one request/response round trip: GET when
//! there is no body, multipart POST when there is one (picture uploads).
//! No retries, no connection reuse across calls. Redirects are followed and
//! non-2xx statuses fail the exchange, both per agent defaults.

use std::io::Read;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::config::CoreConfig;
use crate::error::{Error, Result};

/// Performs single HTTP exchanges against the server.
#[derive(Debug, Clone, Copy)]
pub struct Transport {
    request_timeout: Duration,
    connect_timeout: Duration,
}

impl Transport {
    pub fn new(config: &CoreConfig) -> Self {
        Self {
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
        }
    }

    /// Perform one exchange and return the raw response body.
    ///
    /// Blocks the calling thread until the exchange finishes. The agent and
    /// its connection are released on every exit path.
    pub fn perform(&self, url: &str, body: Option<&[u8]>) -> Result<Vec<u8>> {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(self.request_timeout))
            .timeout_connect(Some(self.connect_timeout))
            .build()
            .new_agent();

        let response = match body {
            None => agent.get(url).call()?,
            Some(data) => {
                let boundary = multipart_boundary();
                let payload = multipart_body(&boundary, data);
                agent
                    .post(url)
                    .header(
                        "Content-Type",
                        &format!("multipart/form-data; boundary={}", boundary),
                    )
                    .send(&payload[..])?
            }
        };

        let mut bytes = Vec::new();
        response
            .into_body()
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| Error::Transport(format!("read failed: {}", e)))?;
        Ok(bytes)
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new(&CoreConfig::default())
    }
}

fn multipart_boundary() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("----mediahome{:x}", nanos)
}

/// Assemble a multipart/form-data body with the picture as its single part,
/// named "file", the shape the server's upload endpoints expect.
fn multipart_body(boundary: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::with_capacity(data.len() + 256);
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"file\"; filename=\"profile.png\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
