//! Infrastructure layer for the client.
//!
//! Contains the file-system facing adapters.  Domain types and the document
//! codec come from `btc_core`; nothing in `btc_core` depends on this layer.

pub mod storage;
