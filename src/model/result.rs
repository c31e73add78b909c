use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Failed to read `{path}`: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Not a valid JSON document: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("Failed to render chart: {0}")]
    Render(String),
    #[error("Failed to write `{path}`: {source}")]
    Write {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to build report: {0}")]
    Report(String),
}

/// The input parsed as JSON but does not have the expected shape.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Top level of the analysis is not an object")]
    NotAnObject,
    #[error("Not found 'repos' field")]
    MissingRepos,
    #[error("'repos' is not an object")]
    ReposNotAnObject,
    #[error("Repo `{repo}` is not an object")]
    RepoNotAnObject { repo: String },
    #[error("Repo `{repo}`: 'macro_usage' is not an object")]
    MacroUsageNotAnObject { repo: String },
    #[error("Repo `{repo}`: not found 'derive_macro_usage' field")]
    MissingDeriveMacroUsage { repo: String },
    #[error("Repo `{repo}`: 'derive_macro_usage' is not an object")]
    DeriveMacroUsageNotAnObject { repo: String },
    #[error("Repo `{repo}`: '{field}' is not a non-negative integer")]
    InvalidCount { repo: String, field: &'static str },
}
