//! exfil-sink Gateway HTTP Server
//!
//! Accepts `POST` uploads on any path and writes each body to a file in the
//! upload directory, named from the `filename` request header.

pub mod error;
pub mod server;
pub mod upload;

pub use error::ApiError;
pub use server::{build_router, ServerConfig, UploadServer, DEFAULT_PORT};
pub use upload::{receive_upload, GatewayState, MISSING_LENGTH_MESSAGE, SUCCESS_MESSAGE};
