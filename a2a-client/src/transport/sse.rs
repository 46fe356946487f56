use a2a_core::TransportError;
use futures::StreamExt;
use futures::stream::BoxStream;

/// Split a streaming response into the `data` payloads of its SSE events.
///
/// A response that is not `text/event-stream` is read whole and yielded as
/// a single payload.
pub(crate) fn event_payloads(response: reqwest::Response) -> BoxStream<'static, Result<String, TransportError>> {
    let is_event_stream = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("text/event-stream"));

    if !is_event_stream {
        return async_stream::stream! {
            match response.text().await {
                Ok(body) if body.trim().is_empty() => {}
                Ok(body) => yield Ok(body),
                Err(e) => yield Err(TransportError::Stream(e.to_string())),
            }
        }
        .boxed();
    }

    async_stream::stream! {
        let mut bytes_stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();

        while let Some(chunk_result) = bytes_stream.next().await {
            let chunk = match chunk_result {
                Ok(c) => c,
                Err(e) => {
                    yield Err(TransportError::Stream(e.to_string()));
                    return;
                }
            };
            buffer.extend(chunk.iter().copied().filter(|b| *b != b'\r'));

            while let Some(event_end) = find_event_end(&buffer) {
                let event: Vec<u8> = buffer.drain(..event_end + 2).collect();
                if let Some(data) = parse_sse_data(&String::from_utf8_lossy(&event)) {
                    yield Ok(data);
                }
            }
        }

        // Last event may arrive without its blank-line terminator.
        if let Some(data) = parse_sse_data(&String::from_utf8_lossy(&buffer)) {
            yield Ok(data);
        }
    }
    .boxed()
}

fn find_event_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|window| window == b"\n\n")
}

/// Parse the data field of one SSE event. Multi-line data is joined with
/// newlines; events without data (or with empty data) yield `None`.
fn parse_sse_data(event: &str) -> Option<String> {
    let lines: Vec<&str> = event
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| data.strip_prefix(' ').unwrap_or(data))
        .collect();

    let data = lines.join("\n");
    if data.trim().is_empty() { None } else { Some(data) }
}
