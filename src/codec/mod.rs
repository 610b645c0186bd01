//! Serialization codecs for the A2A wire protocol

pub mod jsonrpc;

pub use jsonrpc::{JsonRpcCodec, JsonRpcError, JsonRpcRequest, JsonRpcResponse};

use crate::{
    protocol::{error::A2AError, operation::A2AOperation},
    service::response::A2AResponse,
};
use bytes::Bytes;

/// Codec trait for encoding and decoding A2A protocol messages
///
/// A codec implements one protocol binding. The core binding is JSON-RPC 2.0
/// over HTTP; the trait keeps the client service independent of it.
pub trait Codec: Send + Sync {
    /// Serialize an A2A operation to bytes for transport
    fn encode_request(&self, operation: &A2AOperation) -> Result<Bytes, A2AError>;

    /// Deserialize transport response bytes to an A2A response
    ///
    /// The original operation is passed for context: it decides which shape
    /// the body is decoded into.
    fn decode_response(
        &self,
        body: &[u8],
        operation: &A2AOperation,
    ) -> Result<A2AResponse, A2AError>;

    /// Get the content type for this codec
    fn content_type(&self) -> &str;
}
