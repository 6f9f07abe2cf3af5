//! Decoding of the `data: <json>` line stream served by the analysis
//! endpoint. Only the `data:` convention is honoured; `event:`, `id:` and
//! `retry:` fields are ignored.

pub mod decoder;
pub mod envelope;

pub use decoder::LineDecoder;
pub use envelope::{parse_line, parse_payload, Envelope, EnvelopeError, DATA_PREFIX};

/// Bytes in, parsed envelopes out, in arrival order.
#[derive(Debug, Default)]
pub struct EnvelopeDecoder {
    lines: LineDecoder,
}

impl EnvelopeDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, chunk: &[u8]) -> Vec<Result<Envelope, EnvelopeError>> {
        self.lines
            .push(chunk)
            .iter()
            .filter_map(|line| parse_line(line))
            .collect()
    }

    /// Parse a trailing line that arrived without its terminator.
    pub fn finish(self) -> Option<Result<Envelope, EnvelopeError>> {
        self.lines.finish().and_then(|line| parse_line(&line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STREAM: &str = concat!(
        "data: {\"step\":1,\"status\":\"starting\",\"message\":\"Scanning\",\"progress_percentage\":10}\n",
        "\n",
        "data: {\"step\":2,\"status\":\"in_progress\",\"message\":\"x\",\"progress_percentage\":50}\n",
        "\n",
        "data: {\"type\":\"complete\"}\n",
    );

    fn decode_in_chunks(input: &[u8], size: usize) -> Vec<Envelope> {
        let mut dec = EnvelopeDecoder::new();
        let mut out = Vec::new();
        for chunk in input.chunks(size) {
            out.extend(dec.push(chunk).into_iter().map(|r| r.unwrap()));
        }
        if let Some(last) = dec.finish() {
            out.push(last.unwrap());
        }
        out
    }

    #[test]
    fn test_chunking_does_not_change_envelopes() {
        let whole = decode_in_chunks(STREAM.as_bytes(), STREAM.len());
        assert_eq!(whole.len(), 3);
        for size in [1, 2, 3, 7, 16, 64] {
            assert_eq!(decode_in_chunks(STREAM.as_bytes(), size), whole, "chunk size {}", size);
        }
    }

    #[test]
    fn test_trailing_line_without_newline_is_flushed() {
        let mut dec = EnvelopeDecoder::new();
        assert!(dec.push(b"data: {\"type\":\"complete\"}").is_empty());
        assert_eq!(dec.finish().unwrap().unwrap(), Envelope::Complete);
    }

    #[test]
    fn test_malformed_line_does_not_poison_following_lines() {
        let mut dec = EnvelopeDecoder::new();
        let out = dec.push(b"data: {not json}\ndata: {\"type\":\"complete\"}\n");
        assert_eq!(out.len(), 2);
        assert!(out[0].is_err());
        assert_eq!(out[1].as_ref().unwrap(), &Envelope::Complete);
    }
}
