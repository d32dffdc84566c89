use std::collections::HashSet;
use std::fs;
use std::path::Path;

use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Embed)]
#[folder = "assets/catalogs/"]
struct CatalogAssets;

const BUILTIN_CATALOG: &str = "internal-audit-basics.toml";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("bundled catalog {0} is missing")]
    MissingBuiltin(&'static str),
    #[error("question at position {0} has an empty id")]
    EmptyId(usize),
    #[error("duplicate question id '{0}'")]
    DuplicateId(String),
    #[error("question '{0}' is multiple choice but has no options")]
    MissingOptions(String),
    #[error("question '{0}' has options but is not multiple choice")]
    UnexpectedOptions(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
    Essay,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    /// Locale key used by the question badge.
    pub fn label_key(self) -> &'static str {
        match self {
            Difficulty::Beginner => "difficulty.beginner",
            Difficulty::Intermediate => "difficulty.intermediate",
            Difficulty::Advanced => "difficulty.advanced",
        }
    }
}

/// Bilingual question text. `primary` is shown prominently, `secondary` underneath.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub primary: String,
    #[serde(default)]
    pub secondary: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: Prompt,
    pub kind: QuestionKind,
    #[serde(default)]
    pub options: Vec<String>,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub title: String,
    #[serde(default, rename = "question")]
    pub questions: Vec<Question>,
}

impl Catalog {
    pub fn builtin() -> Result<Self, CatalogError> {
        let file = CatalogAssets::get(BUILTIN_CATALOG)
            .ok_or(CatalogError::MissingBuiltin(BUILTIN_CATALOG))?;
        let content = String::from_utf8_lossy(file.data.as_ref());
        Self::from_toml_str(&content)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate. An empty question list is accepted here; starting an
    /// exam over it is refused later.
    pub fn from_toml_str(content: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = toml::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for (pos, q) in self.questions.iter().enumerate() {
            if q.id.trim().is_empty() {
                return Err(CatalogError::EmptyId(pos));
            }
            if !seen.insert(q.id.as_str()) {
                return Err(CatalogError::DuplicateId(q.id.clone()));
            }
            match (q.kind, q.options.is_empty()) {
                (QuestionKind::MultipleChoice, true) => {
                    return Err(CatalogError::MissingOptions(q.id.clone()));
                }
                (QuestionKind::TrueFalse | QuestionKind::Essay, false) => {
                    return Err(CatalogError::UnexpectedOptions(q.id.clone()));
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.questions.iter().position(|q| q.id == id)
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_loads() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.questions[0].kind, QuestionKind::MultipleChoice);
        assert_eq!(catalog.questions[0].options.len(), 4);
        assert_eq!(catalog.questions[1].kind, QuestionKind::TrueFalse);
        assert_eq!(catalog.questions[2].kind, QuestionKind::Essay);
        assert_eq!(catalog.index_of("3"), Some(2));
    }

    #[test]
    fn empty_catalog_is_not_a_parse_error() {
        let catalog = Catalog::from_toml_str("title = \"empty\"").unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn rejects_choice_question_without_options() {
        let toml_str = r#"
title = "bad"

[[question]]
id = "1"
kind = "multiple_choice"
difficulty = "beginner"
prompt = { primary = "?" }
"#;
        let err = Catalog::from_toml_str(toml_str).unwrap_err();
        assert!(matches!(err, CatalogError::MissingOptions(id) if id == "1"));
    }

    #[test]
    fn rejects_options_on_essay() {
        let toml_str = r#"
title = "bad"

[[question]]
id = "e"
kind = "essay"
difficulty = "advanced"
options = ["a"]
prompt = { primary = "?" }
"#;
        let err = Catalog::from_toml_str(toml_str).unwrap_err();
        assert!(matches!(err, CatalogError::UnexpectedOptions(_)));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let toml_str = r#"
title = "dup"

[[question]]
id = "1"
kind = "essay"
difficulty = "beginner"
prompt = { primary = "a" }

[[question]]
id = "1"
kind = "true_false"
difficulty = "beginner"
prompt = { primary = "b" }
"#;
        let err = Catalog::from_toml_str(toml_str).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId(id) if id == "1"));
    }
}
