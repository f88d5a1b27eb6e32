//! HTTP Range header handling for partial downloads

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

const BYTES_UNIT: &str = "bytes=";

/// A single contiguous byte window of a resource.
///
/// Fields are signed: a header such as `bytes=900-100` still parses, and the
/// resulting negative `chunk_size` is left for the caller to reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkRequest {
    pub start: i64,
    pub end: i64,
    pub chunk_size: i64,
}

impl ChunkRequest {
    /// Window `start..=end`.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the window size does not fit in an `i64`;
    /// use [`ChunkRequest::try_new`] for untrusted bounds.
    pub fn new(start: i64, end: i64) -> Self {
        Self {
            start,
            end,
            chunk_size: end - start + 1,
        }
    }

    /// Window `start..=end`, or `InvalidRange` when its size overflows.
    pub fn try_new(start: i64, end: i64) -> Result<Self> {
        let chunk_size = end
            .checked_sub(start)
            .and_then(|d| d.checked_add(1))
            .ok_or_else(|| Error::InvalidRange("Range too large".into()))?;

        Ok(Self {
            start,
            end,
            chunk_size,
        })
    }

    /// Parse a single-range `Range` header against a resource of `resource_size` bytes.
    ///
    /// `bytes=<start>-<end>` is taken literally; `bytes=<start>-` runs to the
    /// last byte of the resource. Suffix ranges (`bytes=-500`) and multi-range
    /// headers are not supported.
    pub fn parse(header: &str, resource_size: i64) -> Result<Self> {
        let spec = header
            .trim()
            .strip_prefix(BYTES_UNIT)
            .ok_or_else(|| Error::InvalidRange(format!("Missing '{}' prefix", BYTES_UNIT)))?;

        if spec.contains(',') {
            return Err(Error::InvalidRange(
                "Multiple ranges are not supported".into(),
            ));
        }

        let (start, end) = spec
            .split_once('-')
            .ok_or_else(|| Error::InvalidRange("Invalid range format".into()))?;

        let start = start
            .trim()
            .parse::<i64>()
            .map_err(|_| Error::InvalidRange("Invalid range start".into()))?;

        let end = match end.trim() {
            "" => resource_size.saturating_sub(1),
            end => end
                .parse::<i64>()
                .map_err(|_| Error::InvalidRange("Invalid range end".into()))?,
        };

        Self::try_new(start, end)
    }

    /// True when the window lies within a resource of `resource_size` bytes.
    pub fn is_satisfiable(&self, resource_size: i64) -> bool {
        self.start >= 0 && self.start <= self.end && self.end < resource_size
    }

    /// Value for a `Range` request header.
    pub fn range_header(&self) -> String {
        format!("bytes={}-{}", self.start, self.end)
    }

    /// Value for a `Content-Range` response header.
    pub fn content_range(&self, resource_size: i64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, resource_size)
    }
}

/// Free function form of [`ChunkRequest::parse`].
pub fn parse_range(header: &str, resource_size: i64) -> Result<ChunkRequest> {
    ChunkRequest::parse(header, resource_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_range() {
        let chunk = parse_range("bytes=0-499", 1000).unwrap();
        assert_eq!(
            chunk,
            ChunkRequest {
                start: 0,
                end: 499,
                chunk_size: 500
            }
        );
    }

    #[test]
    fn test_open_range() {
        let chunk = parse_range("bytes=500-", 1000).unwrap();
        assert_eq!(chunk.start, 500);
        assert_eq!(chunk.end, 999);
        assert_eq!(chunk.chunk_size, 500);
    }

    #[test]
    fn test_single_byte() {
        let chunk = parse_range("bytes=0-0", 1000).unwrap();
        assert_eq!(chunk.chunk_size, 1);
        assert!(chunk.is_satisfiable(1000));
    }

    #[test]
    fn test_out_of_bounds_is_not_rejected() {
        let chunk = parse_range("bytes=900-100", 1000).unwrap();
        assert_eq!(chunk.chunk_size, -799);
        assert!(!chunk.is_satisfiable(1000));

        let chunk = parse_range("bytes=0-5000", 1000).unwrap();
        assert_eq!(chunk.chunk_size, 5001);
        assert!(!chunk.is_satisfiable(1000));
    }

    #[test]
    fn test_open_range_on_empty_resource() {
        let chunk = parse_range("bytes=0-", 0).unwrap();
        assert_eq!(chunk.end, -1);
        assert_eq!(chunk.chunk_size, 0);
        assert!(!chunk.is_satisfiable(0));
    }

    #[test]
    fn test_malformed_headers() {
        for header in [
            "0-499",
            "items=0-499",
            "bytes=",
            "bytes=abc-10",
            "bytes=0-xyz",
            "bytes=-500",
            "bytes=0-10,20-30",
        ] {
            let err = parse_range(header, 1000).unwrap_err();
            assert_eq!(err.code(), "INVALID_RANGE", "header {:?}", header);
        }
    }

    #[test]
    fn test_oversized_window() {
        let err = parse_range("bytes=0-9223372036854775807", 1000).unwrap_err();
        assert_eq!(err.code(), "INVALID_RANGE");
        assert!(err.to_string().contains("Range too large"));

        assert!(ChunkRequest::try_new(i64::MAX, i64::MIN).is_err());

        let chunk = parse_range("bytes=1-9223372036854775807", 1000).unwrap();
        assert_eq!(chunk.chunk_size, i64::MAX);
        assert!(!chunk.is_satisfiable(1000));
    }

    #[test]
    fn test_header_rendering() {
        let chunk = ChunkRequest::new(100, 199);
        assert_eq!(chunk.chunk_size, 100);
        assert_eq!(chunk.range_header(), "bytes=100-199");
        assert_eq!(chunk.content_range(1000), "bytes 100-199/1000");
    }
}
