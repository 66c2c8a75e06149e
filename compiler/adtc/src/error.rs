//! Driver-level failures: everything that stops a run before or after the
//! per-declaration pipeline.

use std::io;
use std::path::PathBuf;

use adt_ir::InternError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("cannot read `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write `{}`: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed type `{text}` at offset {offset}: {message}")]
    TypeSyntax {
        text: String,
        offset: usize,
        message: String,
    },

    #[error("invalid span [{start}, {end}] on `{name}`")]
    Span { name: String, start: u32, end: u32 },

    #[error(transparent)]
    Intern(#[from] InternError),

    #[error("{0}")]
    Usage(String),
}

pub type DriverResult<T> = Result<T, DriverError>;
