use bytes::{Bytes, BytesMut};
use futures::Stream;
use multer::Multipart;

use crate::{
    application::{decoder::MultipartError, error::ApplicationError},
    domain::models::file::ExtractedFile,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    /// Waiting for the next part's headers.
    AwaitingPart,
    /// Collecting the bytes of a part that carries a filename.
    InFilePart,
    /// Discarding the bytes of a plain form field.
    InFieldPart,
    /// The closing boundary was reached.
    Complete,
    /// Framing or transport failed; nothing is returned.
    Failed,
}

/// Walks the parts of a `multipart/form-data` stream and keeps the last file part.
pub struct FormDecoder {
    multipart: Multipart<'static>,
    state: ParserState,
    file: Option<Bytes>,
    parts: usize,
}

impl FormDecoder {
    pub fn new<S, O, E>(stream: S, boundary: String) -> Self
    where
        S: Stream<Item = Result<O, E>> + Send + 'static,
        O: Into<Bytes> + 'static,
        E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
    {
        Self {
            multipart: Multipart::new(stream, boundary),
            state: ParserState::AwaitingPart,
            file: None,
            parts: 0,
        }
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Number of parts whose headers have been read so far.
    pub fn parts(&self) -> usize {
        self.parts
    }

    /// Consumes the whole stream. Succeeds only once the closing boundary was seen
    /// and the last file part held bytes.
    pub async fn decode(&mut self) -> Result<ExtractedFile, ApplicationError> {
        if let Err(err) = self.consume().await {
            self.state = ParserState::Failed;
            self.file = None;
            return Err(err);
        }

        self.file
            .take()
            .and_then(ExtractedFile::new)
            .ok_or(ApplicationError::NoFile)
    }

    async fn consume(&mut self) -> Result<(), ApplicationError> {
        while let Some(mut field) = self.multipart.next_field().await.map_err(classify)? {
            self.parts += 1;

            if field.file_name().is_some() {
                self.state = ParserState::InFilePart;
                let mut buffer = BytesMut::new();
                while let Some(chunk) = field.chunk().await.map_err(classify)? {
                    buffer.extend_from_slice(&chunk);
                }
                // Last file part wins, even when it is empty.
                self.file = Some(buffer.freeze());
            } else {
                self.state = ParserState::InFieldPart;
                while field.chunk().await.map_err(classify)?.is_some() {}
            }

            self.state = ParserState::AwaitingPart;
        }

        self.state = ParserState::Complete;
        Ok(())
    }
}

fn classify(err: multer::Error) -> ApplicationError {
    match err {
        multer::Error::StreamReadFailed(cause) => ApplicationError::Transport(cause.to_string()),
        multer::Error::IncompleteStream
        | multer::Error::IncompleteHeaders
        | multer::Error::IncompleteFieldData { .. } => MultipartError::UnexpectedEnd.into(),
        other => MultipartError::Malformed(other).into(),
    }
}
