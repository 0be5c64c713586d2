use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, BarcodeError>;

#[derive(Error, Debug)]
pub enum BarcodeError {
    #[error("primer '{id}' is empty once masked ends are removed")]
    InvalidPrimer { id: String },

    #[error("primer file contains no primers")]
    NoPrimers,

    #[error("primer id '{id}' appears more than once")]
    DuplicatePrimer { id: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read primers: {0}")]
    PrimerSource(#[source] io::Error),

    #[error("read source failed (last read processed: {}): {source}", last_read.as_deref().unwrap_or("<none>"))]
    SourceExhaustedWithError {
        last_read: Option<String>,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {sink} (last read processed: {}): {source}", last_read.as_deref().unwrap_or("<none>"))]
    SinkWrite {
        sink: String,
        last_read: Option<String>,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl BarcodeError {
    pub(crate) fn sink(sink: impl Into<String>) -> impl FnOnce(io::Error) -> Self {
        let sink = sink.into();
        move |source| BarcodeError::SinkWrite {
            sink,
            last_read: None,
            source,
        }
    }

    /// Attach the last processed read id to a sink failure.
    pub(crate) fn after_read(self, last: Option<&str>) -> Self {
        match self {
            BarcodeError::SinkWrite { sink, source, .. } => BarcodeError::SinkWrite {
                sink,
                last_read: last.map(str::to_string),
                source,
            },
            other => other,
        }
    }
}
