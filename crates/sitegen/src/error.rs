// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

/// Faults that make a build meaningless. Content problems that can be
/// worked around (missing page copy, malformed JSON, unknown component)
/// are logged and defaulted instead of surfacing here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid site configuration {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("CSV decoding failed for {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: arrow_schema::ArrowError,
    },

    #[error("{kind} table not found: {}", path.display())]
    MissingTable { kind: &'static str, path: PathBuf },

    #[error("page template not found: {}", path.display())]
    MissingTemplate { path: PathBuf },

    #[error("template rendering failed: {0}")]
    Template(#[from] tera::Error),

    #[error("unknown language code: {0}")]
    UnknownLanguage(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
