//! `exfil-sink-core` — the domain side of the upload fixture.
//!
//! Provides:
//! - `IncomingUpload`: headers interpreted into a declared length and target name
//! - `UploadStore`: writes a completed upload into the upload directory
//! - `SinkError`: every recognised failure of an upload

pub mod error;
pub mod storage;
pub mod upload;

pub use error::SinkError;
pub use storage::{is_plain_file_name, UploadStore};
pub use upload::{IncomingUpload, DEFAULT_FILENAME, FILENAME_HEADER};
