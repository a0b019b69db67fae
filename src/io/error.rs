use crate::model::point::PointKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error(
        "failed to parse {kind} record{}: {details}",
        .block.map(|b| format!(" (block {b})")).unwrap_or_default()
    )]
    Parse {
        kind: PointKind,
        block: Option<usize>,
        details: String,
    },
}

impl Error {
    pub fn parse(kind: PointKind, details: impl Into<String>) -> Self {
        Self::Parse {
            kind,
            block: None,
            details: details.into(),
        }
    }

    /// Attaches the 1-based position of the failing block within its log.
    pub(crate) fn at_block(self, number: usize) -> Self {
        match self {
            Self::Parse { kind, details, .. } => Self::Parse {
                kind,
                block: Some(number),
                details,
            },
            other => other,
        }
    }
}
