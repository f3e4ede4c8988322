//! Response size cap for SPARQL answers.

use crate::error::{LindasError, Result};

/// Default cap on a decoded SPARQL response body.
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024; // 16 MiB

/// Read a response body into memory, failing once it exceeds `limit_bytes`.
///
/// An advertised `Content-Length` above the limit fails before any byte is read. Otherwise the
/// body is streamed and the read stops as soon as `limit_bytes + 1` bytes have been seen.
pub async fn read_response_body_with_limit(
    response: &mut reqwest::Response,
    limit_bytes: usize,
    context: &str,
) -> Result<Vec<u8>> {
    if let Some(content_length) = response.content_length() {
        if content_length > limit_bytes as u64 {
            return Err(LindasError::BodyTooLarge {
                context: context.to_string(),
                limit: limit_bytes,
                observed: format!("Content-Length {content_length} bytes"),
            });
        }
    }

    let endpoint = response.url().to_string();
    let max_bytes = limit_bytes.saturating_add(1);
    let mut out: Vec<u8> = Vec::new();
    loop {
        let chunk = response
            .chunk()
            .await
            .map_err(|source| LindasError::Request {
                endpoint: endpoint.clone(),
                source,
            })?;
        let Some(chunk) = chunk else {
            break;
        };
        if out.len().saturating_add(chunk.len()) >= max_bytes {
            return Err(LindasError::BodyTooLarge {
                context: context.to_string(),
                limit: limit_bytes,
                observed: format!("received {max_bytes} bytes"),
            });
        }
        out.extend_from_slice(&chunk);
    }
    Ok(out)
}
