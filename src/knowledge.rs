//! Knowledge base loading
//!
//! The knowledge base is a single UTF-8 text file read once at startup and
//! shared, unchanged, by every chat request.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("knowledge file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read knowledge file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Immutable knowledge text, cheap to clone
#[derive(Clone, PartialEq, Eq)]
pub struct KnowledgeBase {
    text: Arc<str>,
}

impl KnowledgeBase {
    /// Read the whole file at `path`
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, KnowledgeError> {
        let path = path.as_ref();
        match tokio::fs::read_to_string(path).await {
            Ok(text) => Ok(Self::from(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(KnowledgeError::NotFound {
                path: path.to_path_buf(),
            }),
            Err(source) => Err(KnowledgeError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl From<String> for KnowledgeBase {
    fn from(text: String) -> Self {
        Self { text: text.into() }
    }
}

impl From<&str> for KnowledgeBase {
    fn from(text: &str) -> Self {
        Self { text: text.into() }
    }
}

// The corpus can be large; keep debug output short.
impl fmt::Debug for KnowledgeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KnowledgeBase")
            .field("bytes", &self.text.len())
            .finish()
    }
}
