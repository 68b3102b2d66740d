//! Interpretation of upload headers and accumulation of the declared body.

use crate::error::SinkError;

/// Name of the request header selecting the destination file.
pub const FILENAME_HEADER: &str = "filename";

/// Destination name used when the caller does not provide one.
pub const DEFAULT_FILENAME: &str = "uploaded_file";

/// Upper bound on the buffer reserved up front, whatever the declared length.
const MAX_PREALLOCATION: u64 = 1 << 20;

/// A single upload in flight: the declared length, the destination name and
/// the body bytes received so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingUpload {
    content_length: u64,
    filename: String,
    body: Vec<u8>,
}

impl IncomingUpload {
    /// Build an upload from raw header values.
    ///
    /// An absent or blank `Content-Length` is [`SinkError::MissingContentLength`];
    /// anything that is not a non-negative decimal integer is
    /// [`SinkError::InvalidContentLength`]. A missing or empty filename falls
    /// back to `default_filename`; the name is otherwise taken verbatim.
    pub fn from_headers(
        content_length: Option<&[u8]>,
        filename: Option<&[u8]>,
        default_filename: &str,
    ) -> Result<Self, SinkError> {
        let content_length = parse_content_length(content_length)?;

        let filename = match filename {
            Some(raw) if !raw.is_empty() => std::str::from_utf8(raw)
                .map_err(|_| SinkError::InvalidFilename)?
                .to_string(),
            _ => default_filename.to_string(),
        };

        Ok(Self {
            content_length,
            filename,
            body: Vec::with_capacity(content_length.min(MAX_PREALLOCATION) as usize),
        })
    }

    pub fn content_length(&self) -> u64 {
        self.content_length
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Bytes still expected before the body is complete.
    pub fn remaining(&self) -> u64 {
        self.content_length - self.body.len() as u64
    }

    pub fn is_complete(&self) -> bool {
        self.remaining() == 0
    }

    /// Append a chunk of body data, keeping at most the declared length.
    ///
    /// Returns the number of bytes taken from `chunk`; anything past the
    /// declared length is dropped.
    pub fn extend_body(&mut self, chunk: &[u8]) -> usize {
        let take = chunk.len().min(self.remaining().min(usize::MAX as u64) as usize);
        self.body.extend_from_slice(&chunk[..take]);
        take
    }

    /// Fail unless exactly the declared number of bytes has been received.
    pub fn ensure_complete(&self) -> Result<(), SinkError> {
        if self.is_complete() {
            Ok(())
        } else {
            Err(SinkError::IncompleteBody {
                expected: self.content_length,
                received: self.body.len() as u64,
            })
        }
    }
}

fn parse_content_length(raw: Option<&[u8]>) -> Result<u64, SinkError> {
    let raw = match raw {
        Some(raw) => raw,
        None => return Err(SinkError::MissingContentLength),
    };

    let text = std::str::from_utf8(raw)
        .map_err(|_| SinkError::InvalidContentLength(String::from_utf8_lossy(raw).into_owned()))?
        .trim();

    if text.is_empty() {
        return Err(SinkError::MissingContentLength);
    }

    // `u64::from_str` accepts a leading '+', which is not a valid length.
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SinkError::InvalidContentLength(text.to_string()));
    }

    text.parse()
        .map_err(|_| SinkError::InvalidContentLength(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_or_blank_length_is_missing() {
        for raw in [None, Some(&b""[..]), Some(&b"   "[..])] {
            let err = IncomingUpload::from_headers(raw, None, DEFAULT_FILENAME).unwrap_err();
            assert!(matches!(err, SinkError::MissingContentLength));
        }
    }

    #[test]
    fn test_non_numeric_length_is_invalid() {
        for raw in ["abc", "-3", "+3", "1.5", "99999999999999999999999"] {
            let err =
                IncomingUpload::from_headers(Some(raw.as_bytes()), None, DEFAULT_FILENAME).unwrap_err();
            assert!(matches!(err, SinkError::InvalidContentLength(_)), "{raw}");
        }
    }

    #[test]
    fn test_filename_defaults_when_absent_or_empty() {
        let upload = IncomingUpload::from_headers(Some(b"0"), None, DEFAULT_FILENAME).unwrap();
        assert_eq!(upload.filename(), "uploaded_file");

        let upload = IncomingUpload::from_headers(Some(b"0"), Some(b""), "fallback.bin").unwrap();
        assert_eq!(upload.filename(), "fallback.bin");
    }

    #[test]
    fn test_filename_taken_verbatim() {
        let upload =
            IncomingUpload::from_headers(Some(b" 3 "), Some(b"../loot/report.bin"), DEFAULT_FILENAME)
                .unwrap();
        assert_eq!(upload.filename(), "../loot/report.bin");
        assert_eq!(upload.content_length(), 3);
    }

    #[test]
    fn test_non_utf8_filename_rejected() {
        let err = IncomingUpload::from_headers(Some(b"1"), Some(&[0xff, 0xfe]), DEFAULT_FILENAME)
            .unwrap_err();
        assert!(matches!(err, SinkError::InvalidFilename));
    }

    #[test]
    fn test_extend_body_stops_at_declared_length() {
        let mut upload = IncomingUpload::from_headers(Some(b"4"), None, DEFAULT_FILENAME).unwrap();
        assert_eq!(upload.extend_body(b"ab"), 2);
        assert!(!upload.is_complete());
        assert_eq!(upload.extend_body(b"cdef"), 2);
        assert!(upload.is_complete());
        assert_eq!(upload.extend_body(b"gh"), 0);
        assert_eq!(upload.body(), b"abcd");
    }

    #[test]
    fn test_short_body_is_incomplete() {
        let mut upload = IncomingUpload::from_headers(Some(b"5"), None, DEFAULT_FILENAME).unwrap();
        upload.extend_body(b"abc");
        match upload.ensure_complete() {
            Err(SinkError::IncompleteBody { expected, received }) => {
                assert_eq!(expected, 5);
                assert_eq!(received, 3);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_zero_length_is_complete_immediately() {
        let upload = IncomingUpload::from_headers(Some(b"0"), None, DEFAULT_FILENAME).unwrap();
        assert!(upload.ensure_complete().is_ok());
        assert!(upload.body().is_empty());
    }
}
