//! Error types for document tree operations

/// Result type for document tree operations
pub type Result<T> = std::result::Result<T, Error>;

fn missing_range(from: &usize, to: &usize) -> String {
    if from == to {
        format!("[{}] is", from)
    } else {
        format!("[{}-{}] are", from, to)
    }
}

/// Unified error type shared by the tree core and both serializers
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Indexed list access skipped positions that have not been created yet
    #[error("Cannot access idx {idx}, {path}{} missing", missing_range(.from, .to))]
    IndexGap {
        /// The index the caller asked for
        idx: usize,
        /// Path of the list, without its own trailing index
        path: String,
        /// First missing position
        from: usize,
        /// Last missing position
        to: usize,
    },

    /// Markup serialization found no top-level element
    #[error("No root node found")]
    NoRoot,

    /// Markup serialization found more than one top-level element
    #[error("Multiple roots found: `[{}]`", .0.join(", "))]
    MultipleRoots(Vec<String>),

    /// A list-child write tried to start a new output list at a non-zero index
    #[error("Unexpected input (first), idx:`{idx}`, name:`{name}`, elem:`{elem}`, out:`{out}`")]
    UnexpectedFirst {
        idx: usize,
        name: String,
        elem: String,
        out: String,
    },

    /// A list-child write did not line up with the next appendable output slot
    #[error("Unexpected input (append), idx:`{idx}`, name:`{name}`, elem:`{elem}`, out:`{out}`")]
    UnexpectedAppend {
        idx: usize,
        name: String,
        elem: String,
        out: String,
    },

    /// Markup backend error
    #[error("XML error: {0}")]
    Xml(String),

    /// Mapping stringification error
    #[error("JSON error: {0}")]
    Json(String),
}

impl Error {
    /// Create a new index-gap error for the missing positions `[from, to]`
    pub fn index_gap(idx: usize, path: impl Into<String>, from: usize, to: usize) -> Self {
        Error::IndexGap {
            idx,
            path: path.into(),
            from,
            to,
        }
    }

    /// Create a new markup backend error
    pub fn xml<S: Into<String>>(msg: S) -> Self {
        Error::Xml(msg.into())
    }
}
