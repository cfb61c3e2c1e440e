use super::{TagDictionary, TagInfo};
use crate::error::{LoadDictionarySnafu, Result};
use crate::Tag;
use serde::Deserialize;
use snafu::ResultExt;
use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Read;

/// One attribute record of a [`TableDictionary`],
/// in the layout of the JSON attribute resources:
///
/// ```json
/// {
///   "name": "Patient's Name",
///   "keyword": "PatientName",
///   "valueRepresentation": "PN",
///   "valueMultiplicity": "1",
///   "description": "Patient's full name."
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableEntry {
    pub name: String,
    pub keyword: String,
    pub value_representation: String,
    pub value_multiplicity: Option<String>,
    pub description: String,
}

/// A tag dictionary holding its own attribute table,
/// typically loaded from a JSON resource file.
///
/// The resource is an object keyed by tag (in any form accepted by
/// [`Tag::normalize`]), with a [`TableEntry`] per attribute.
/// Entries with a malformed tag key are skipped.
#[derive(Debug, Clone, Default)]
pub struct TableDictionary {
    by_tag: HashMap<Tag, TableEntry>,
    by_keyword: HashMap<String, Tag>,
}

impl TableDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dictionary from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: HashMap<String, TableEntry> =
            serde_json::from_str(json).context(LoadDictionarySnafu)?;
        Ok(Self::from_entries(entries))
    }

    /// Load a dictionary from a byte reader with JSON content.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let entries: HashMap<String, TableEntry> =
            serde_json::from_reader(reader).context(LoadDictionarySnafu)?;
        Ok(Self::from_entries(entries))
    }

    /// Load a dictionary from an already decoded JSON value.
    pub fn from_json_value(json: serde_json::Value) -> Result<Self> {
        let entries: HashMap<String, TableEntry> =
            serde_json::from_value(json).context(LoadDictionarySnafu)?;
        Ok(Self::from_entries(entries))
    }

    fn from_entries(entries: HashMap<String, TableEntry>) -> Self {
        let mut dict = TableDictionary::new();
        for (key, entry) in entries {
            match Tag::normalize(&key) {
                Ok(tag) => dict.insert(tag, entry),
                Err(_) => tracing::warn!("skipping dictionary entry with invalid tag `{}`", key),
            }
        }
        dict
    }

    /// Add or replace the entry of an attribute.
    pub fn insert(&mut self, tag: Tag, entry: TableEntry) {
        if !entry.keyword.is_empty() {
            self.by_keyword.insert(entry.keyword.clone(), tag);
        }
        if let Some(old) = self.by_tag.insert(tag, entry) {
            if self.by_keyword.get(&old.keyword) == Some(&tag)
                && self.by_tag[&tag].keyword != old.keyword
            {
                self.by_keyword.remove(&old.keyword);
            }
        }
    }

    /// The number of attributes in the table.
    pub fn len(&self) -> usize {
        self.by_tag.len()
    }

    /// Iterate over all entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (Tag, &TableEntry)> {
        self.by_tag.iter().map(|(tag, entry)| (*tag, entry))
    }
}

impl TagDictionary for TableDictionary {
    fn tag_info(&self, tag: Tag) -> Option<TagInfo<'_>> {
        self.by_tag.get(&tag).map(|entry| TagInfo {
            keyword: Cow::Borrowed(&entry.keyword),
            name: Cow::Borrowed(&entry.name),
            vr: Cow::Borrowed(&entry.value_representation),
            description: Cow::Borrowed(&entry.description),
            value_multiplicity: entry.value_multiplicity.as_deref().map(Cow::Borrowed),
        })
    }

    fn tag_by_keyword(&self, keyword: &str) -> Option<Tag> {
        self.by_keyword.get(keyword).copied()
    }

    fn is_empty(&self) -> bool {
        self.by_tag.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TableDictionary {
        TableDictionary::from_json_str(
            r#"{
                "00100010": {
                    "name": "Patient's Name",
                    "keyword": "PatientName",
                    "valueRepresentation": "PN",
                    "valueMultiplicity": "1",
                    "description": "Patient's full name."
                },
                "0008,0061": {
                    "name": "Modalities in Study",
                    "keyword": "ModalitiesInStudy",
                    "valueRepresentation": "CS",
                    "valueMultiplicity": "1-n"
                },
                "not a tag": { "keyword": "Broken" }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn loads_json_resource() {
        let dict = sample();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.tag_by_keyword("PatientName"), Some(Tag(0x0010, 0x0010)));
        assert_eq!(dict.tag_by_keyword("Broken"), None);

        let info = dict.tag_info(Tag(0x0010, 0x0010)).unwrap();
        assert_eq!(info.name, "Patient's Name");
        assert_eq!(info.vr, "PN");
        assert!(info.is_single_valued());
        assert_eq!(
            dict.value_multiplicity(Tag(0x0008, 0x0061)).as_deref(),
            Some("1-n")
        );
        assert_eq!(dict.tag_name(Tag(0x0008, 0x0061)).as_deref(), Some("Modalities in Study"));
    }

    #[test]
    fn rejects_malformed_resource() {
        assert!(matches!(
            TableDictionary::from_json_str("[1, 2, 3]"),
            Err(crate::Error::LoadDictionary { .. })
        ));
    }

    #[test]
    fn replacing_an_entry_updates_keywords() {
        let mut dict = sample();
        dict.insert(
            Tag(0x0010, 0x0010),
            TableEntry {
                keyword: "PatientsName".into(),
                ..TableEntry::default()
            },
        );
        assert_eq!(dict.tag_by_keyword("PatientName"), None);
        assert_eq!(dict.tag_by_keyword("PatientsName"), Some(Tag(0x0010, 0x0010)));
    }
}
