//! Field extraction

use thiserror::Error;

use crate::types::VaultItem;

/// Extracted secrets in field order
pub type SecretMap = Vec<(String, String)>;

/// Errors from field extraction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("item '{item}' produces the key '{key}' more than once")]
    DuplicateKey { item: String, key: String },
}

pub type ExtractResult<T> = Result<T, ExtractError>;

/// Key a field's value is stored under
pub fn secret_key(title: &str, label: &str) -> String {
    format!("{title}:{label}")
}

/// Extract `title:label -> value` pairs from an item.
///
/// With a non-empty `section_filter` the item is only considered when one of
/// its sections carries that label (ignoring case); all of its fields are
/// then extracted, not just the ones in that section. Fields with a blank
/// label are skipped. Two fields yielding the same key is an error.
pub fn extract_secrets(item: &VaultItem, section_filter: &str) -> ExtractResult<SecretMap> {
    if !section_filter.is_empty() && !item.has_section_labeled(section_filter) {
        return Ok(SecretMap::new());
    }

    let mut secrets = SecretMap::with_capacity(item.fields.len());
    for field in item.fields.iter().filter(|f| !f.label.trim().is_empty()) {
        let key = secret_key(&item.title, &field.label);
        if secrets.iter().any(|(existing, _)| existing == &key) {
            return Err(ExtractError::DuplicateKey {
                item: item.title.clone(),
                key,
            });
        }
        secrets.push((key, field.value.clone()));
    }
    Ok(secrets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Field, Section};

    fn item() -> VaultItem {
        VaultItem::new("i1", "Payments")
            .with_section(Section::new("s1", "Production"))
            .with_field(Field::new("f1", "api-key", "abc").in_section("s1"))
            .with_field(Field::new("f2", "endpoint", "https://pay"))
            .with_field(Field::new("f3", "", "ignored"))
            .with_field(Field::new("f4", "   ", "ignored too"))
    }

    #[test]
    fn test_one_entry_per_labelled_field() {
        let secrets = extract_secrets(&item(), "").unwrap();
        assert_eq!(
            secrets,
            vec![
                ("Payments:api-key".to_string(), "abc".to_string()),
                ("Payments:endpoint".to_string(), "https://pay".to_string()),
            ]
        );
    }

    #[test]
    fn test_section_filter_match_ignores_case() {
        let secrets = extract_secrets(&item(), "production").unwrap();
        // A matching section admits every field of the item
        assert_eq!(secrets.len(), 2);
    }

    #[test]
    fn test_section_filter_without_match_is_empty() {
        assert!(extract_secrets(&item(), "Staging").unwrap().is_empty());
    }

    #[test]
    fn test_section_filter_without_sections_is_empty() {
        let item = VaultItem::new("i2", "Plain").with_field(Field::new("f1", "user", "bob"));
        assert!(extract_secrets(&item, "Production").unwrap().is_empty());
    }

    #[test]
    fn test_no_fields_is_empty() {
        let item = VaultItem::new("i3", "Empty");
        assert!(extract_secrets(&item, "").unwrap().is_empty());
    }

    #[test]
    fn test_empty_value_is_kept() {
        let item = VaultItem::new("i4", "Svc").with_field(Field::new("f1", "optional", ""));
        let secrets = extract_secrets(&item, "").unwrap();
        assert_eq!(secrets, vec![("Svc:optional".to_string(), String::new())]);
    }

    #[test]
    fn test_duplicate_label_within_item() {
        let item = VaultItem::new("i5", "Dup")
            .with_field(Field::new("f1", "password", "one"))
            .with_field(Field::new("f2", "password", "two"));

        let err = extract_secrets(&item, "").unwrap_err();
        assert_eq!(
            err,
            ExtractError::DuplicateKey {
                item: "Dup".to_string(),
                key: "Dup:password".to_string(),
            }
        );
    }

    #[test]
    fn test_secret_key_format() {
        assert_eq!(secret_key("Mail", "smtp-host"), "Mail:smtp-host");
    }
}
