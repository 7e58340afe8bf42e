use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A breakdown category and the keywords that attribute a post to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoriesFile {
    pub categories: Vec<CategoryConfig>,
}

/// Built-in category table used when no categories file is configured.
#[must_use]
pub fn default_categories() -> Vec<CategoryConfig> {
    let table: &[(&str, &[&str])] = &[
        (
            "Transportation",
            &["traffic", "parking", "bus", "train", "subway", "commute", "road", "construction"],
        ),
        (
            "Safety",
            &["crime", "police", "safe", "unsafe", "theft", "accident", "emergency"],
        ),
        (
            "Events",
            &["festival", "concert", "event", "parade", "market", "game", "show"],
        ),
        (
            "Food & Dining",
            &["restaurant", "food", "coffee", "brunch", "dinner", "menu", "cafe"],
        ),
        (
            "Community",
            &["neighborhood", "community", "park", "school", "library", "neighbors"],
        ),
    ];

    table
        .iter()
        .map(|(name, keywords)| CategoryConfig {
            name: (*name).to_string(),
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        })
        .collect()
}

/// Load and validate the category table from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_categories(path: &Path) -> Result<CategoriesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CategoriesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let mut file: CategoriesFile =
        serde_yaml::from_str(&content).map_err(ConfigError::CategoriesFileParse)?;

    for category in &mut file.categories {
        for keyword in &mut category.keywords {
            *keyword = keyword.trim().to_lowercase();
        }
        category.keywords.retain(|k| !k.is_empty());
    }

    validate_categories(&file)?;

    Ok(file)
}

fn validate_categories(file: &CategoriesFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for category in &file.categories {
        if category.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "category name must be non-empty".to_string(),
            ));
        }

        if category.keywords.is_empty() {
            return Err(ConfigError::Validation(format!(
                "category '{}' has no keywords",
                category.name
            )));
        }

        if !seen_names.insert(category.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate category name: '{}'",
                category.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "atlasiq-categories-{}-{name}.yaml",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn defaults_pass_validation() {
        let file = CategoriesFile {
            categories: default_categories(),
        };
        assert!(validate_categories(&file).is_ok());
        assert_eq!(file.categories.len(), 5);
    }

    #[test]
    fn loads_and_lowercases_keywords() {
        let path = write_temp(
            "ok",
            "categories:\n  - name: Transit\n    keywords: [\" Bus \", Train, \"\"]\n",
        );
        let file = load_categories(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(file.categories[0].keywords, vec!["bus", "train"]);
    }

    #[test]
    fn rejects_duplicate_names_case_insensitively() {
        let file = CategoriesFile {
            categories: vec![
                CategoryConfig {
                    name: "Safety".to_string(),
                    keywords: vec!["crime".to_string()],
                },
                CategoryConfig {
                    name: "safety".to_string(),
                    keywords: vec!["police".to_string()],
                },
            ],
        };
        let err = validate_categories(&file).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref m) if m.contains("duplicate")));
    }

    #[test]
    fn rejects_category_without_keywords() {
        let path = write_temp("empty", "categories:\n  - name: Weather\n    keywords: []\n");
        let result = load_categories(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = load_categories(Path::new("/definitely/not/here.yaml"));
        assert!(matches!(result, Err(ConfigError::CategoriesFileIo { .. })));
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let path = write_temp("bad", "categories: [name: {\n");
        let result = load_categories(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ConfigError::CategoriesFileParse(_))));
    }
}
