//! Wires the Framed Transport (C1) to the Dispatcher (C5): the stdio
//! request/response loop plus graceful shutdown on EOF.

use crate::dispatcher::Dispatcher;
use crate::rpc::{decode_line, FramingError, InboundMessage, LineReader, LineWriter, ReadOutcome, ResponseEnvelope};
use std::sync::Arc;

pub async fn run<R, W>(reader: R, writer: W, dispatcher: Arc<Dispatcher>) -> std::io::Result<()>
where
    R: tokio::io::AsyncRead + Unpin,
    W: tokio::io::AsyncWrite + Unpin + Send + 'static,
{
    let mut line_reader = LineReader::new(reader);
    let line_writer = LineWriter::new(writer);

    loop {
        match line_reader.read_line().await? {
            ReadOutcome::Eof => {
                tracing::info!("input stream closed; shutting down");
                return Ok(());
            }
            ReadOutcome::Oversize => {
                let resp = ResponseEnvelope::failure(
                    serde_json::Value::Null,
                    crate::error::ErrorCode::ParseError.code(),
                    "line exceeds maximum size".to_string(),
                    None,
                );
                line_writer.write_value(&resp).await?;
            }
            ReadOutcome::Line(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                handle_line(line, &dispatcher, &line_writer).await?;
            }
        }
    }
}

async fn handle_line<W>(line: String, dispatcher: &Arc<Dispatcher>, writer: &LineWriter<W>) -> std::io::Result<()>
where
    W: tokio::io::AsyncWrite + Unpin + Send + 'static,
{
    match decode_line(&line) {
        Ok(InboundMessage::Request(request)) => {
            let response = dispatcher.dispatch(request).await;
            writer.write_value(&response).await?;
        }
        Ok(InboundMessage::Notification(notification)) => {
            dispatcher.handle_notification(notification);
        }
        Err(FramingError::Parse) => {
            tracing::warn!("failed to parse inbound line as JSON");
            let resp = ResponseEnvelope::failure(
                serde_json::Value::Null,
                crate::error::ErrorCode::ParseError.code(),
                "malformed JSON".to_string(),
                None,
            );
            writer.write_value(&resp).await?;
        }
        Err(FramingError::Shape(message)) => {
            tracing::warn!(message, "inbound line failed envelope validation");
            let resp = ResponseEnvelope::failure(
                serde_json::Value::Null,
                crate::error::ErrorCode::InvalidRequest.code(),
                message,
                None,
            );
            writer.write_value(&resp).await?;
        }
    }
    Ok(())
}
