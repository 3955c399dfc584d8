//! Reply streaming

use futures::{Stream, StreamExt};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use lazyai_protocol::StreamingEnvelope;

use crate::error::{Result, SessionError};

/// Copy a chunked body into `sink`, flushing after every chunk.
///
/// Nothing is buffered across chunks, so each token the upstream sends is
/// visible as soon as it arrives. Returns the number of bytes written.
pub async fn pipe_stream<S, B, E, W>(stream: S, sink: &mut W) -> Result<u64>
where
  S: Stream<Item = std::result::Result<B, E>>,
  B: AsRef<[u8]>,
  E: Into<SessionError>,
  W: AsyncWrite + Unpin,
{
  let mut stream = std::pin::pin!(stream);
  let mut written = 0u64;

  while let Some(chunk) = stream.next().await {
    let chunk = chunk.map_err(Into::into)?;
    let bytes = chunk.as_ref();
    if bytes.is_empty() {
      continue;
    }
    sink.write_all(bytes).await?;
    sink.flush().await?;
    written += bytes.len() as u64;
  }

  Ok(written)
}

/// Write the reply carried by a JSON streaming envelope.
///
/// Fails with [`SessionError::Decode`] if the body is not an envelope or
/// holds no assistant message that is still streaming.
pub async fn write_envelope_reply<W>(body: &str, sink: &mut W) -> Result<u64>
where
  W: AsyncWrite + Unpin,
{
  let envelope: StreamingEnvelope = serde_json::from_str(body).map_err(|e| SessionError::Decode {
    message: e.to_string(),
    body: body.to_string(),
  })?;

  let content = envelope
    .streaming_assistant_content()
    .ok_or_else(|| SessionError::Decode {
      message: "no streaming assistant message in envelope".to_string(),
      body: body.to_string(),
    })?;

  sink.write_all(content.as_bytes()).await?;
  sink.flush().await?;
  Ok(content.len() as u64)
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[tokio::test]
  async fn copies_chunks_in_order() {
    let chunks: Vec<std::result::Result<&[u8], std::io::Error>> =
      vec![Ok(&b"Hi"[..]), Ok(&b""[..]), Ok(&b" there"[..])];
    let mut sink: Vec<u8> = Vec::new();

    let written = pipe_stream(futures::stream::iter(chunks), &mut sink)
      .await
      .expect("pipe");

    assert_eq!(written, 8);
    assert_eq!(sink, b"Hi there");
  }

  #[tokio::test]
  async fn stream_error_stops_copy() {
    let chunks: Vec<std::result::Result<&[u8], std::io::Error>> = vec![
      Ok(&b"partial"[..]),
      Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
      Ok(&b"never"[..]),
    ];
    let mut sink: Vec<u8> = Vec::new();

    let err = pipe_stream(futures::stream::iter(chunks), &mut sink)
      .await
      .expect_err("stream error");

    assert!(matches!(err, SessionError::Io(_)));
    assert_eq!(sink, b"partial");
  }

  #[tokio::test]
  async fn envelope_reply_is_written() {
    let body = r#"{"data": {"messages": [
      {"id": 99, "type": "assistant", "content": "Hi there", "streaming": true}
    ]}}"#;
    let mut sink: Vec<u8> = Vec::new();

    write_envelope_reply(body, &mut sink).await.expect("envelope");
    assert_eq!(sink, b"Hi there");
  }

  #[tokio::test]
  async fn envelope_without_streaming_message_is_decode_error() {
    let body = r#"{"data": {"messages": []}}"#;
    let mut sink: Vec<u8> = Vec::new();

    let err = write_envelope_reply(body, &mut sink).await.expect_err("decode");
    assert!(matches!(err, SessionError::Decode { ref body, .. } if body.contains("messages")));
  }

  #[tokio::test]
  async fn non_json_envelope_is_decode_error() {
    let mut sink: Vec<u8> = Vec::new();
    let err = write_envelope_reply("Hi there", &mut sink).await.expect_err("decode");
    assert!(matches!(err, SessionError::Decode { .. }));
    assert!(sink.is_empty());
  }
}
