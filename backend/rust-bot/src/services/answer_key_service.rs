use std::path::Path;

use crate::error::DocumentError;
use crate::models::AnswerKeyDocument;

/// Ordered ground-truth answers for the test. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerKey {
    answers: Vec<String>,
}

impl AnswerKey {
    pub fn new(answers: Vec<String>) -> Self {
        Self { answers }
    }

    /// Loads the key, degrading to an empty key on any failure.
    pub fn load(path: &Path) -> Self {
        match Self::read(path) {
            Ok(key) => {
                if key.is_empty() {
                    tracing::warn!(
                        "Answer key {} is empty: only empty submissions will be accepted",
                        path.display()
                    );
                } else {
                    tracing::info!(
                        "Loaded answer key with {} answers from {}",
                        key.len(),
                        path.display()
                    );
                }
                key
            }
            Err(e) => {
                tracing::error!("Failed to load answer key: {}", e);
                tracing::warn!("Continuing with an empty answer key");
                Self::default()
            }
        }
    }

    pub fn read(path: &Path) -> Result<Self, DocumentError> {
        let raw = std::fs::read(path).map_err(|e| DocumentError::from_io(path, e))?;
        let doc: AnswerKeyDocument =
            serde_json::from_slice(&raw).map_err(|source| DocumentError::Malformed {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self::new(doc.answers))
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_answers_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.json");
        fs::write(&path, r#"{ "answers": ["a", "b", "c"] }"#).unwrap();

        let key = AnswerKey::load(&path);
        assert_eq!(key.answers(), ["a", "b", "c"]);
    }

    #[test]
    fn missing_file_is_empty_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.json");

        assert!(matches!(
            AnswerKey::read(&path),
            Err(DocumentError::NotFound(_))
        ));
        assert!(AnswerKey::load(&path).is_empty());
    }

    #[test]
    fn non_string_answers_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.json");
        fs::write(&path, r#"{ "answers": ["a", 2, null] }"#).unwrap();

        assert!(matches!(
            AnswerKey::read(&path),
            Err(DocumentError::Malformed { .. })
        ));
        assert!(AnswerKey::load(&path).is_empty());
    }

    #[test]
    fn answers_must_be_a_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.json");
        fs::write(&path, r#"{ "answers": "abc" }"#).unwrap();

        assert!(AnswerKey::read(&path).is_err());
    }

    #[test]
    fn missing_answers_field_is_empty_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.json");
        fs::write(&path, "{}").unwrap();

        assert_eq!(AnswerKey::read(&path).unwrap(), AnswerKey::default());
    }

    #[test]
    fn broken_json_is_empty_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.json");
        fs::write(&path, "{ answers: [").unwrap();

        assert!(AnswerKey::load(&path).is_empty());
    }
}
