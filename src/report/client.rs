use crate::error::{ReportBuilderError, Result};
use crate::report::types::{Content, GenerateContentChunk, GenerateContentRequest, GenerationConfig};
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::Client;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// One streaming generateContent call. Non-2xx responses become a typed
    /// API error; a 2xx response yields the chunk sequence for the caller
    /// to pull from.
    pub(crate) async fn stream_generate_content(
        &self,
        model: &str,
        contents: Vec<Content>,
        config: GenerationConfig,
    ) -> Result<ResponseChunks> {
        let url = format!(
            "{}/models/{}:streamGenerateContent?alt=sse&key={}",
            self.base_url, model, self.api_key
        );

        let payload = GenerateContentRequest {
            contents,
            generation_config: config,
        };

        let res = self.client.post(&url).json(&payload).send().await?;
        let status = res.status();

        if !status.is_success() {
            let message = res.text().await?;
            return Err(ReportBuilderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(ResponseChunks::from_byte_stream(
            res.bytes_stream().map(|chunk| chunk.map(|b| b.to_vec())).boxed(),
        ))
    }
}

/// Lazy, finite, non-restartable sequence of partial responses.
///
/// Wraps the SSE body (`data: {json}` lines) and re-frames transport chunks
/// into complete events, since a transport chunk can end mid-line. Dropping
/// the value releases the underlying connection, so a consumer that returns
/// early does not have to drain the remainder.
pub struct ResponseChunks {
    stream: BoxStream<'static, reqwest::Result<Vec<u8>>>,
    buffer: Vec<u8>,
    exhausted: bool,
}

impl ResponseChunks {
    fn from_byte_stream(stream: BoxStream<'static, reqwest::Result<Vec<u8>>>) -> Self {
        Self {
            stream,
            buffer: Vec::new(),
            exhausted: false,
        }
    }

    /// Pulls the next parsed chunk, or `None` once the stream is exhausted.
    pub async fn next_chunk(&mut self) -> Result<Option<GenerateContentChunk>> {
        loop {
            if let Some(chunk) = self.pop_buffered_event()? {
                return Ok(Some(chunk));
            }

            if self.exhausted {
                return Ok(None);
            }

            match self.stream.next().await {
                Some(bytes) => self.buffer.extend_from_slice(&bytes?),
                None => {
                    self.exhausted = true;
                    // Flush a trailing event that arrived without a newline.
                    if self.buffer.last().is_some_and(|&b| b != b'\n') {
                        self.buffer.push(b'\n');
                    }
                }
            }
        }
    }

    fn pop_buffered_event(&mut self) -> Result<Option<GenerateContentChunk>> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim();

            if let Some(payload) = line.strip_prefix("data:") {
                let payload = payload.trim();
                if payload.is_empty() {
                    continue;
                }
                let chunk = serde_json::from_str(payload)?;
                return Ok(Some(chunk));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::types::Part;
    use futures::executor::block_on;
    use futures::stream;

    fn chunks_from(parts: &[&str]) -> ResponseChunks {
        let items: Vec<reqwest::Result<Vec<u8>>> =
            parts.iter().map(|p| Ok(p.as_bytes().to_vec())).collect();
        ResponseChunks::from_byte_stream(stream::iter(items).boxed())
    }

    #[test]
    fn test_parses_one_event_per_data_line() {
        let mut chunks = chunks_from(&[
            "data: {\"candidates\": []}\n\n",
            "data: {\"candidates\": [{\"content\": {\"parts\": [{\"text\": \"hi\"}]}}]}\n\n",
        ]);

        let first = block_on(chunks.next_chunk()).unwrap().unwrap();
        assert!(first.candidates.is_empty());

        let second = block_on(chunks.next_chunk()).unwrap().unwrap();
        assert!(matches!(second.first_part(), Some(Part::Text { text }) if text == "hi"));

        assert!(block_on(chunks.next_chunk()).unwrap().is_none());
    }

    #[test]
    fn test_reassembles_events_split_across_transport_chunks() {
        let mut chunks = chunks_from(&[
            "data: {\"candidates\": [{\"content\": {\"par",
            "ts\": [{\"text\": \"split\"}]}}]}\n",
        ]);

        let event = block_on(chunks.next_chunk()).unwrap().unwrap();
        assert!(matches!(event.first_part(), Some(Part::Text { text }) if text == "split"));
        assert!(block_on(chunks.next_chunk()).unwrap().is_none());
    }

    #[test]
    fn test_trailing_event_without_newline_is_flushed() {
        let mut chunks = chunks_from(&["data: {\"candidates\": []}"]);

        assert!(block_on(chunks.next_chunk()).unwrap().is_some());
        assert!(block_on(chunks.next_chunk()).unwrap().is_none());
    }

    #[test]
    fn test_non_data_lines_are_ignored() {
        let mut chunks = chunks_from(&[": keep-alive\n\ndata: {\"candidates\": []}\n"]);

        assert!(block_on(chunks.next_chunk()).unwrap().is_some());
        assert!(block_on(chunks.next_chunk()).unwrap().is_none());
    }

    #[test]
    fn test_malformed_payload_is_an_error() {
        let mut chunks = chunks_from(&["data: {not json}\n"]);
        assert!(block_on(chunks.next_chunk()).is_err());
    }
}
