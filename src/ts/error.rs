// SPDX-License-Identifier: PMPL-1.0-or-later

//! Errors raised while reading or writing catalog files

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TsError {
    #[error("cannot access file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot decode file as {encoding}")]
    Decode { encoding: String },

    #[error("unknown encoding '{0}'")]
    UnknownEncoding(String),

    #[error("parse error at line {line}: {message}")]
    Xml { line: usize, message: String },

    #[error("unexpected tag <{element}> at line {line}")]
    UnexpectedElement { element: String, line: usize },

    #[error("unexpected characters '{text}' at line {line}")]
    UnexpectedText { text: String, line: usize },

    #[error("unexpected end of document inside <{element}>")]
    UnexpectedEof { element: String },

    #[error("document has no <TS> root element")]
    MissingRoot,

    #[error("message '{source_text}' at line {line} has numerus forms but is not marked numerus=\"yes\"")]
    PluralMismatch { source_text: String, line: usize },

    #[error("malformed .qm file at byte {offset}: {message}")]
    Qm { offset: usize, message: String },

    #[error("PO parse error at line {line}: {message}")]
    Po { line: usize, message: String },

    #[error("unknown catalog format '{0}'")]
    UnknownFormat(String),
}

impl TsError {
    /// Shorten offending text the way Linguist does in its diagnostics.
    pub(crate) fn unexpected_text(text: &str, line: usize) -> Self {
        let mut shown: String = text.chars().take(30).collect();
        if text.chars().count() > 30 {
            shown.push_str("[...]");
        }
        TsError::UnexpectedText { text: shown, line }
    }
}

pub type TsResult<T> = Result<T, TsError>;
