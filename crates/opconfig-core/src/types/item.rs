//! Vault item types as returned by the Connect API
//!
//! The API omits or nulls collections and strings freely (summaries from the
//! list endpoint carry no fields at all). Everything here deserializes such
//! gaps to empty values so extraction code never has to null-check.

use serde::{Deserialize, Deserializer, Serialize};

/// Purpose tag the API puts on an item's free-text notes field
pub const NOTES_PURPOSE: &str = "NOTES";

/// Deserialize `null` the same way as a missing value
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reference to the vault an item lives in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
}

/// A vault item (summary or full detail)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub vault: Option<VaultRef>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fields: Vec<Field>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<Section>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub urls: Vec<ItemUrl>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub favorite: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_edited_by: Option<String>,
}

impl VaultItem {
    /// Create an item with the given id and title and nothing else
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    /// Add a field
    pub fn with_field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Add a section
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Whether the item carries `tag` (exact match, as the API filters)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Section a field points at, if the item defines it
    pub fn section_of(&self, field: &Field) -> Option<&Section> {
        let id = &field.section.as_ref()?.id;
        self.sections.iter().find(|s| &s.id == id)
    }

    /// Whether any section label equals `label`, ignoring case
    pub fn has_section_labeled(&self, label: &str) -> bool {
        self.sections
            .iter()
            .any(|s| s.label.to_lowercase() == label.to_lowercase())
    }

    /// The first field whose purpose is [`NOTES_PURPOSE`]
    pub fn notes_field(&self) -> Option<&Field> {
        self.fields.iter().find(|f| f.purpose == NOTES_PURPOSE)
    }

    /// Copy of this item with detail-only data dropped, as the list endpoint returns it
    pub fn to_summary(&self) -> Self {
        Self {
            fields: Vec::new(),
            sections: Vec::new(),
            ..self.clone()
        }
    }
}

/// Field value type discriminator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    #[default]
    String,
    Concealed,
    Email,
    Url,
    Otp,
    Date,
    MonthYear,
    Menu,
    Phone,
    Address,
    Reference,
    Sshkey,
    CreditCardType,
    CreditCardNumber,
    Gender,
    #[serde(other)]
    Unknown,
}

/// Back-reference from a field to the section it is displayed in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
}

/// A single field on an item
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Field {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub purpose: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub field_type: FieldType,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<SectionRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl Field {
    /// Create a plain text field
    pub fn new(id: impl Into<String>, label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    /// Create the notes field the API attaches to most item categories
    pub fn notes(value: impl Into<String>) -> Self {
        Self {
            id: "notesPlain".to_string(),
            label: "notesPlain".to_string(),
            purpose: NOTES_PURPOSE.to_string(),
            value: value.into(),
            ..Default::default()
        }
    }

    /// Set the field type
    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    /// Place the field in a section
    pub fn in_section(mut self, section_id: impl Into<String>) -> Self {
        self.section = Some(SectionRef { id: section_id.into() });
        self
    }
}

/// A named grouping of fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,
}

impl Section {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// A URL attached to an item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUrl {
    #[serde(default, deserialize_with = "null_as_default")]
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub primary: bool,
}
