//! TronGrid HTTP client.
//!
//! Two endpoints, both POST: `/wallet/getnowblock` for the tip and
//! `/wallet/getblockbynum` for a specific height. A block that has not been
//! produced yet comes back as an empty object, which is how `NotFound` is
//! told apart from a transport failure.

use crate::{ChainError, ChainSource};
use pc28_types::Block;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// JSON shape of a TronGrid block response.
#[derive(Debug, Deserialize)]
struct BlockData {
    #[serde(rename = "blockID", default)]
    block_id: String,
    block_header: Option<BlockHeader>,
}

#[derive(Debug, Deserialize)]
struct BlockHeader {
    raw_data: RawData,
}

#[derive(Debug, Deserialize)]
struct RawData {
    #[serde(default)]
    number: u64,
    #[serde(default)]
    timestamp: u64,
}

impl BlockData {
    fn into_block(self, requested: Option<u64>) -> Result<Block, ChainError> {
        if self.block_id.is_empty() {
            // TronGrid answers an empty object for heights beyond the tip.
            return match requested {
                Some(height) => Err(ChainError::NotFound(height)),
                None => Err(ChainError::InvalidResponse(
                    "tip response carried no blockID".to_string(),
                )),
            };
        }
        let header = self.block_header.ok_or_else(|| {
            ChainError::InvalidResponse("block response carried no header".to_string())
        })?;
        Ok(Block {
            hash: self.block_id,
            height: header.raw_data.number,
            timestamp: header.raw_data.timestamp,
        })
    }
}

/// Client for a TronGrid-compatible node.
#[derive(Clone)]
pub struct TronClient {
    http: reqwest::Client,
    base: String,
}

impl TronClient {
    /// Build a client for a node URL, with a per-request timeout.
    pub fn new(base: &str, timeout: Duration) -> Result<Self, ChainError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChainError::Unavailable(e.to_string()))?;
        Ok(Self {
            http,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    async fn post_block(
        &self,
        path: &str,
        body: Option<serde_json::Value>,
        requested: Option<u64>,
    ) -> Result<Block, ChainError> {
        let url = format!("{}{}", self.base, path);
        debug!(%url, ?requested, "fetching block");

        let mut request = self.http.post(&url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request
            .send()
            .await
            .map_err(|e| ChainError::Unavailable(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ChainError::Unavailable(format!(
                "{url} returned {}",
                response.status()
            )));
        }
        let data: BlockData = response
            .json()
            .await
            .map_err(|e| ChainError::InvalidResponse(e.to_string()))?;
        data.into_block(requested)
    }
}

impl ChainSource for TronClient {
    async fn latest_block(&self) -> Result<Block, ChainError> {
        self.post_block("/wallet/getnowblock", None, None).await
    }

    async fn block_by_height(&self, height: u64) -> Result<Block, ChainError> {
        self.post_block(
            "/wallet/getblockbynum",
            Some(serde_json::json!({ "num": height })),
            Some(height),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK_JSON: &str = r#"{
        "blockID": "0000000002e63e97ab339cbb1be1a1c095ac4ffd125cbca41157a5a79b9f8839",
        "block_header": {
            "raw_data": {
                "number": 48639639,
                "timestamp": 1700000000000,
                "txTrieRoot": "ignored",
                "witness_address": "ignored",
                "parentHash": "ignored",
                "version": 28
            }
        }
    }"#;

    #[test]
    fn test_decode_block() {
        let data: BlockData = serde_json::from_str(BLOCK_JSON).unwrap();
        let block = data.into_block(None).unwrap();
        assert_eq!(block.height, 48_639_639);
        assert_eq!(block.timestamp, 1_700_000_000_000);
        assert!(block.hash.ends_with("8839"));
    }

    #[test]
    fn test_empty_object_is_not_found_for_requested_height() {
        let data: BlockData = serde_json::from_str("{}").unwrap();
        assert_eq!(
            data.into_block(Some(48_639_640)),
            Err(ChainError::NotFound(48_639_640))
        );
    }

    #[test]
    fn test_empty_tip_is_invalid_response() {
        let data: BlockData = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            data.into_block(None),
            Err(ChainError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_missing_header_is_invalid_response() {
        let data: BlockData = serde_json::from_str(r#"{"blockID": "abc"}"#).unwrap();
        assert!(matches!(
            data.into_block(None),
            Err(ChainError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = TronClient::new("https://nile.trongrid.io/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base, "https://nile.trongrid.io");
    }
}
