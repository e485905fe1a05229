//! Incremental parser for `text/event-stream` bodies.
//!
//! Events are separated by a blank line; only `event:` and `data:` fields
//! are kept. Bytes are buffered until an event is complete so multi-byte
//! characters split across network chunks decode intact.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    pub event: Option<String>,
    pub data: String,
}

#[derive(Debug, Default)]
pub struct SseParser {
    buffer: Vec<u8>,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds raw body bytes and returns every event completed by them.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        while let Some((end, skip)) = find_boundary(&self.buffer) {
            let block: Vec<u8> = self.buffer.drain(..end + skip).take(end).collect();
            if let Some(event) = parse_block(&String::from_utf8_lossy(&block)) {
                events.push(event);
            }
        }
        events
    }

    /// Flushes a trailing event that was not followed by a blank line.
    pub fn finish(&mut self) -> Option<SseEvent> {
        if self.buffer.is_empty() {
            return None;
        }
        let block = std::mem::take(&mut self.buffer);
        parse_block(&String::from_utf8_lossy(&block))
    }
}

/// Position of the first blank line and the length of its separator.
fn find_boundary(buffer: &[u8]) -> Option<(usize, usize)> {
    let lf = buffer.windows(2).position(|w| w == b"\n\n").map(|i| (i, 2));
    let crlf = buffer
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|i| (i, 4));

    match (lf, crlf) {
        (Some(a), Some(b)) => Some(if a.0 <= b.0 { a } else { b }),
        (a, b) => a.or(b),
    }
}

fn parse_block(block: &str) -> Option<SseEvent> {
    let mut event_type = None;
    let mut data_lines: Vec<&str> = Vec::new();

    for line in block.lines() {
        let line = line.trim_end_matches('\r');
        if let Some(val) = line.strip_prefix("event:") {
            event_type = Some(val.trim().to_string());
        } else if let Some(val) = line.strip_prefix("data:") {
            data_lines.push(val.strip_prefix(' ').unwrap_or(val));
        }
    }

    if data_lines.is_empty() {
        return None;
    }

    Some(SseEvent {
        event: event_type,
        data: data_lines.join("\n"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_events() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"data: hello\n\ndata: world\n\n");
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].data, "hello");
        assert_eq!(events[1].data, "world");
    }

    #[test]
    fn test_event_type_and_comments() {
        let mut parser = SseParser::new();
        let events = parser.feed(b": keep-alive\n\nevent: error\ndata: {\"error\":\"x\"}\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event.as_deref(), Some("error"));
        assert_eq!(events[0].data, "{\"error\":\"x\"}");
    }

    #[test]
    fn test_split_across_chunks() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b"data: hel").is_empty());
        let events = parser.feed(b"lo\n\n");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "hello");
    }

    #[test]
    fn test_multibyte_char_split_across_chunks() {
        let rocket = "data: 🚀\n\n".as_bytes();
        let mut parser = SseParser::new();
        assert!(parser.feed(&rocket[..8]).is_empty());
        let events = parser.feed(&rocket[8..]);
        assert_eq!(events[0].data, "🚀");
    }

    #[test]
    fn test_crlf_and_trailing_event() {
        let mut parser = SseParser::new();
        let events = parser.feed(b"data: one\r\n\r\ndata: two");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].data, "one");
        assert_eq!(parser.finish().map(|e| e.data), Some("two".to_string()));
        assert_eq!(parser.finish(), None);
    }
}
