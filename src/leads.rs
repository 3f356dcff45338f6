//! Lead capture: validation and the append-only leads file

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_PART_LEN: usize = 64;
const MAX_LABEL_LEN: usize = 63;

// Dot-atoms of atext; `\w` admits accented letters (SMTPUTF8 addresses)
static LOCAL_PART: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w!#$%&'*+/=?^`{|}~-]+(\.[\w!#$%&'*+/=?^`{|}~-]+)*$").unwrap());
// DNS labels that may carry internationalized letters; the TLD starts with a letter
static DOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([\p{L}\p{M}\p{N}]([\p{L}\p{M}\p{N}-]*[\p{L}\p{M}\p{N}])?\.)+\p{L}([\p{L}\p{M}\p{N}-]*[\p{L}\p{M}\p{N}])?$")
        .unwrap()
});

#[derive(Debug, Error)]
pub enum LeadError {
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("failed to write lead to {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A validated lead submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lead {
    name: String,
    email: String,
}

impl Lead {
    /// Validate `email` and build the lead. The name is taken as is.
    pub fn new(name: impl Into<String>, email: &str) -> Result<Self, LeadError> {
        Ok(Self {
            name: name.into(),
            email: normalize_email(email)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    /// One line of the leads file, newline included. Nothing is escaped.
    pub fn record_line(&self) -> String {
        format!("Nome: {}, Email: {}\n", self.name, self.email)
    }
}

/// Check the address syntax and lowercase the domain
fn normalize_email(email: &str) -> Result<String, LeadError> {
    let invalid = || LeadError::InvalidEmail(email.to_string());

    if email.chars().count() > MAX_EMAIL_LEN {
        return Err(invalid());
    }
    let (local, domain) = email.rsplit_once('@').ok_or_else(invalid)?;
    if local.chars().count() > MAX_LOCAL_PART_LEN || !LOCAL_PART.is_match(local) {
        return Err(invalid());
    }
    if !DOMAIN.is_match(domain) || domain.split('.').any(|label| label.chars().count() > MAX_LABEL_LEN) {
        return Err(invalid());
    }

    Ok(format!("{}@{}", local, domain.to_lowercase()))
}

/// Append-only flat file of leads
#[derive(Debug, Clone)]
pub struct LeadStore {
    path: PathBuf,
}

impl LeadStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record. The file is opened and closed for every call;
    /// concurrent appends are left to the file system's append semantics.
    pub async fn append(&self, lead: &Lead) -> Result<(), LeadError> {
        let write_error = |source| LeadError::Write {
            path: self.path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(write_error)?;
        file.write_all(lead.record_line().as_bytes())
            .await
            .map_err(write_error)?;
        file.flush().await.map_err(write_error)?;
        Ok(())
    }
}
