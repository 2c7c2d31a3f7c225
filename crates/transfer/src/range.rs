use std::fmt;
use std::str::FromStr;

use crate::TransferError;

/// An inclusive span of byte offsets `[start, end]`.
///
/// Empty ranges are not representable; a zero-length upload is expressed
/// with [`ContentRange::Empty`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ByteRange {
    start: u64,
    end: u64,
}

#[allow(clippy::len_without_is_empty)]
impl ByteRange {
    /// Creates a range covering `start..=end`.
    pub fn new(start: u64, end: u64) -> Result<Self, TransferError> {
        if end < start {
            return Err(TransferError::InvalidRange(format!(
                "end {end} precedes start {start}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Creates the range of `len` bytes beginning at `start`.
    ///
    /// Returns `None` when `len` is 0.
    pub fn from_len(start: u64, len: u64) -> Option<Self> {
        if len == 0 {
            return None;
        }
        Some(Self {
            start,
            end: start + len - 1,
        })
    }

    /// Range of `len` bytes at `start` for callers that guarantee `len > 0`.
    pub(crate) fn spanning(start: u64, len: u64) -> Self {
        debug_assert!(len > 0);
        Self {
            start,
            end: (start + len).saturating_sub(1),
        }
    }

    /// Offset of the first byte.
    pub fn start(&self) -> u64 {
        self.start
    }

    /// Offset of the last byte (inclusive).
    pub fn end(&self) -> u64 {
        self.end
    }

    /// Number of bytes covered.
    pub fn len(&self) -> u64 {
        self.end - self.start + 1
    }

    /// Offset one past the last byte, i.e. where the next range must start.
    pub fn next_offset(&self) -> u64 {
        self.end + 1
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// A `Content-Range` request header value in one of the forms the upload
/// handshake uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentRange {
    /// `bytes */*`: open a new upload session.
    Open,
    /// `bytes /*/`: ask how many bytes the appliance already holds.
    Query,
    /// `bytes <start>-<end>/*`: an intermediate chunk, total still unknown.
    Partial(ByteRange),
    /// `bytes <start>-<end>/<total>`: the terminal chunk.
    Final { range: ByteRange, total: u64 },
    /// `bytes */<total>`: completes an upload without sending more bytes.
    Empty { total: u64 },
}

impl ContentRange {
    /// Range form for a chunk. The terminal chunk announces `end + 1` as
    /// the total length.
    pub fn for_chunk(range: ByteRange, last: bool) -> Self {
        if last {
            ContentRange::Final {
                range,
                total: range.next_offset(),
            }
        } else {
            ContentRange::Partial(range)
        }
    }

    /// Returns `true` if this value announces the instance length.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ContentRange::Final { .. } | ContentRange::Empty { .. })
    }

    /// The announced instance length, if any.
    pub fn total(&self) -> Option<u64> {
        match self {
            ContentRange::Final { total, .. } | ContentRange::Empty { total } => Some(*total),
            _ => None,
        }
    }

    /// The byte span carried by this request, if any.
    pub fn range(&self) -> Option<ByteRange> {
        match self {
            ContentRange::Partial(range) | ContentRange::Final { range, .. } => Some(*range),
            _ => None,
        }
    }
}

impl fmt::Display for ContentRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentRange::Open => f.write_str("bytes */*"),
            ContentRange::Query => f.write_str("bytes /*/"),
            ContentRange::Partial(range) => write!(f, "bytes {range}/*"),
            ContentRange::Final { range, total } => write!(f, "bytes {range}/{total}"),
            ContentRange::Empty { total } => write!(f, "bytes */{total}"),
        }
    }
}

impl FromStr for ContentRange {
    type Err = TransferError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || TransferError::MalformedHeader {
            header: "Content-Range",
            value: s.to_string(),
        };

        let spec = s.trim().strip_prefix("bytes ").ok_or_else(malformed)?;
        match spec {
            "*/*" => return Ok(ContentRange::Open),
            "/*/" => return Ok(ContentRange::Query),
            _ => {}
        }

        let (span, total) = spec.split_once('/').ok_or_else(malformed)?;
        if span == "*" {
            let total = total.parse().map_err(|_| malformed())?;
            return Ok(ContentRange::Empty { total });
        }

        let (start, end) = span.split_once('-').ok_or_else(malformed)?;
        let start: u64 = start.parse().map_err(|_| malformed())?;
        let end: u64 = end.parse().map_err(|_| malformed())?;
        let range = ByteRange::new(start, end)?;

        if total == "*" {
            return Ok(ContentRange::Partial(range));
        }
        let total: u64 = total.parse().map_err(|_| malformed())?;
        if total != range.next_offset() {
            return Err(TransferError::InvalidRange(format!(
                "terminal range {range} does not end at instance length {total}"
            )));
        }
        Ok(ContentRange::Final { range, total })
    }
}

/// Parses the `Range` response header of a committed-bytes query.
///
/// Accepts a bare byte count (`"5000"`) or a range of already-held bytes
/// (`"bytes=0-4999"`), both meaning 5000 bytes committed.
pub fn parse_committed(value: &str) -> Result<u64, TransferError> {
    let malformed = || TransferError::MalformedHeader {
        header: "Range",
        value: value.to_string(),
    };

    let trimmed = value.trim();
    if let Ok(count) = trimmed.parse::<u64>() {
        return Ok(count);
    }

    let spec = trimmed.strip_prefix("bytes=").ok_or_else(malformed)?;
    let (start, end) = spec.split_once('-').ok_or_else(malformed)?;
    if start != "0" {
        return Err(malformed());
    }
    let end: u64 = end.parse().map_err(|_| malformed())?;
    end.checked_add(1).ok_or_else(malformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_range_rejects_inverted_bounds() {
        assert!(ByteRange::new(10, 9).is_err());
        assert_eq!(ByteRange::new(7, 7).unwrap().len(), 1);
    }

    #[test]
    fn from_len_zero_is_none() {
        assert!(ByteRange::from_len(0, 0).is_none());
        let r = ByteRange::from_len(5000, 2345).unwrap();
        assert_eq!(r.start(), 5000);
        assert_eq!(r.end(), 7344);
        assert_eq!(r.next_offset(), 7345);
    }

    #[test]
    fn renders_every_form() {
        let r = ByteRange::new(10000, 12344).unwrap();
        assert_eq!(ContentRange::Open.to_string(), "bytes */*");
        assert_eq!(ContentRange::Query.to_string(), "bytes /*/");
        assert_eq!(ContentRange::Partial(r).to_string(), "bytes 10000-12344/*");
        assert_eq!(
            ContentRange::for_chunk(r, true).to_string(),
            "bytes 10000-12344/12345"
        );
        assert_eq!(ContentRange::Empty { total: 0 }.to_string(), "bytes */0");
    }

    #[test]
    fn only_terminal_forms_announce_length() {
        let r = ByteRange::new(0, 99).unwrap();
        assert!(!ContentRange::Open.is_terminal());
        assert!(!ContentRange::Query.is_terminal());
        assert!(!ContentRange::Partial(r).is_terminal());
        assert_eq!(ContentRange::Partial(r).total(), None);
        assert_eq!(ContentRange::for_chunk(r, true).total(), Some(100));
        assert_eq!(ContentRange::Empty { total: 0 }.total(), Some(0));
    }

    #[test]
    fn parse_inverts_display() {
        let r = ByteRange::new(5000, 9999).unwrap();
        for value in [
            ContentRange::Open,
            ContentRange::Query,
            ContentRange::Partial(r),
            ContentRange::for_chunk(r, true),
            ContentRange::Empty { total: 42 },
        ] {
            assert_eq!(value.to_string().parse::<ContentRange>().unwrap(), value);
        }
    }

    #[test]
    fn parse_rejects_inconsistent_total() {
        let err = "bytes 0-99/99".parse::<ContentRange>().unwrap_err();
        assert!(matches!(err, TransferError::InvalidRange(_)));
    }

    #[test]
    fn parse_rejects_garbage() {
        for bad in ["", "bytes", "bytes 1-/*", "items 0-1/*", "bytes a-b/*", "bytes */x"] {
            assert!(bad.parse::<ContentRange>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn committed_accepts_count_and_range() {
        assert_eq!(parse_committed("5000").unwrap(), 5000);
        assert_eq!(parse_committed(" 0 ").unwrap(), 0);
        assert_eq!(parse_committed("bytes=0-4999").unwrap(), 5000);
    }

    #[test]
    fn committed_rejects_non_integer() {
        let err = parse_committed("lots").unwrap_err();
        assert!(matches!(
            err,
            TransferError::MalformedHeader { header: "Range", .. }
        ));
        assert!(parse_committed("bytes=10-20").is_err());
        assert!(parse_committed("").is_err());
    }
}
