//! Commit request: message plus the change set it covers

use nbp_vcs::ChangeSet;

use crate::error::PipelineError;

/// Reject empty or whitespace-only commit messages.
pub fn validate_message(message: &str) -> Result<(), PipelineError> {
    if message.trim().is_empty() {
        return Err(PipelineError::InvalidInvocation(
            "commit message must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// What to commit and with which message. Immutable once built.
#[derive(Debug, Clone)]
pub struct CommitRequest {
    message: String,
    files: ChangeSet,
}

impl CommitRequest {
    pub fn new(message: impl Into<String>, files: ChangeSet) -> Result<Self, PipelineError> {
        let message = message.into();
        validate_message(&message)?;
        Ok(Self { message, files })
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn files(&self) -> &ChangeSet {
        &self.files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nbp_vcs::{ChangeEntry, ChangeStatus};

    #[test]
    fn empty_message_is_rejected() {
        for msg in ["", "   ", "\n\t"] {
            let err = CommitRequest::new(msg, ChangeSet::new()).unwrap_err();
            assert!(matches!(err, PipelineError::InvalidInvocation(_)));
        }
    }

    #[test]
    fn request_keeps_message_and_files() {
        let files: ChangeSet = vec![ChangeEntry::new("eda.ipynb", ChangeStatus::Modified)]
            .into_iter()
            .collect();
        let request = CommitRequest::new("Refresh EDA", files).unwrap();
        assert_eq!(request.message(), "Refresh EDA");
        assert_eq!(request.files().len(), 1);
    }
}
