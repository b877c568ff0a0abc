/// SSE field carrying event payloads.
pub const DATA_PREFIX: &str = "data:";

/// Stream terminator used by both the vendor and OpenAI.
pub const DONE_SENTINEL: &str = "[DONE]";

/// Parse a single SSE line into (key, value) pair.
///
/// SSE format: `key: value\n`
pub fn parse_sse_line(line: &str) -> Option<(&str, &str)> {
    let colon_pos = line.find(':')?;
    let key = &line[..colon_pos];
    let value = line[colon_pos + 1..].trim();
    Some((key, value))
}

/// Payload of a `data:` line, `None` for every other line.
pub fn data_payload(line: &str) -> Option<&str> {
    if !line.starts_with(DATA_PREFIX) {
        return None;
    }
    parse_sse_line(line).map(|(_, value)| value)
}
