pub mod message;
pub mod transport;

pub use message::{decode_line, ErrorObject, FramingError, InboundMessage, Notification, Request, ResponseEnvelope};
pub use transport::{LineReader, LineWriter, ReadOutcome};
