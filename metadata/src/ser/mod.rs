//! Export of the metadata model.
//!
//! Two forms are supported:
//!
//! - a flattened map from tag or keyword to value
//!   ([`DataSet::to_map`]), where single valued attributes map to
//!   their value directly and sequences map to a list of item maps;
//! - standard DICOM JSON ([`DataSet::to_dicom_json`]),
//!   via the [`Serialize`] implementation of [`DataSet`].

use crate::dictionary::TagDictionary;
use crate::model::{DataSet, Element, Scalar, Sequence, Value, ValueRef};
use crate::Tag;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

pub(crate) use self::value::flat_scalar;
use self::value::DicomScalar;

mod value;

/// A flattened export of a data set.
///
/// Entries keep the order in which they were exported.
pub type JsonMap = serde_json::Map<String, JsonValue>;

/// How exported entries are keyed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyMode {
    /// By canonical tag text, such as `00100010`
    #[default]
    Tags,
    /// By attribute keyword, such as `PatientName`.
    /// Attributes unknown to the dictionary are keyed by tag.
    Keywords,
}

impl<D> DataSet<D>
where
    D: TagDictionary,
{
    /// The key of an attribute in exports.
    pub(crate) fn export_key(&self, tag: Tag, keys: KeyMode) -> String {
        match keys {
            KeyMode::Tags => tag.to_string(),
            KeyMode::Keywords => self
                .dict()
                .keyword(tag)
                .filter(|keyword| !keyword.is_empty())
                .map(|keyword| keyword.into_owned())
                .unwrap_or_else(|| tag.to_string()),
        }
    }

    /// The flattened value of an element of this data set.
    pub(crate) fn export_value(&self, element: &Element<D>, keys: KeyMode) -> JsonValue {
        match self.element_value(element.tag()) {
            None | Some(ValueRef::Empty) => JsonValue::Null,
            Some(ValueRef::Single(value)) => flat_scalar(value),
            Some(ValueRef::Multi(values)) => values.iter().map(flat_scalar).collect(),
            Some(ValueRef::Sequence(seq)) => seq
                .to_maps(keys)
                .into_iter()
                .map(JsonValue::Object)
                .collect(),
        }
    }

    /// Export the elements of this data set as a flattened map,
    /// in tag order.
    ///
    /// If `filter` is not empty,
    /// only the elements with one of the given tags are exported.
    /// Sequence items are exported recursively with the same key mode.
    pub fn to_map(&self, keys: KeyMode, filter: &[Tag]) -> JsonMap {
        self.iter()
            .filter(|e| filter.is_empty() || filter.contains(&e.tag()))
            .map(|e| (self.export_key(e.tag(), keys), self.export_value(e, keys)))
            .collect()
    }

    /// Export this data set as standard DICOM JSON.
    pub fn to_dicom_json(&self) -> Result<JsonValue, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Export this data set as a string of standard DICOM JSON.
    pub fn to_dicom_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl<D> Sequence<D>
where
    D: TagDictionary,
{
    /// Export every item of the sequence as a flattened map.
    pub fn to_maps(&self, keys: KeyMode) -> Vec<JsonMap> {
        self.iter().map(|item| item.to_map(keys, &[])).collect()
    }
}

impl<D> Serialize for DataSet<D> {
    /// Serializes the data set as a JSON map
    /// containing one entry per data element (indexed by tag).
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut ser = serializer.serialize_map(Some(self.len()))?;
        for e in self {
            ser.serialize_entry(&e.tag(), &DicomElement(e))?;
        }
        ser.end()
    }
}

/// Wrapper for a data element in standard DICOM JSON.
struct DicomElement<'a, D>(&'a Element<D>);

fn is_binary_vr(vr: &str) -> bool {
    matches!(vr, "OB" | "OD" | "OF" | "OL" | "OV" | "OW" | "UN")
}

impl<D> Serialize for DicomElement<'_, D> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let e = self.0;
        let vr = if e.vr().is_empty() { "UN" } else { e.vr() };
        let mut ser = serializer.serialize_map(None)?;
        ser.serialize_entry("vr", vr)?;

        match e.value() {
            Value::Empty => {}
            Value::Sequence(seq) => {
                if !seq.is_empty() {
                    ser.serialize_entry("Value", seq.items())?;
                }
            }
            Value::Primitive(values) => match values.as_slice() {
                [] => {}
                [value @ Scalar::Bytes(_)] if is_binary_vr(vr) => {
                    ser.serialize_entry("InlineBinary", &DicomScalar { value, vr })?;
                }
                values => {
                    let values: Vec<_> = values
                        .iter()
                        .map(|value| DicomScalar { value, vr })
                        .collect();
                    ser.serialize_entry("Value", &values)?;
                }
            },
        }
        ser.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PersonName;
    use crate::tags;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> DataSet {
        let mut item = DataSet::new();
        item.put(Element::new(tags::STUDY_INSTANCE_UID, "UI", Scalar::from("1.2.3.4")));

        DataSet::from_element_iter([
            Element::new(tags::MODALITY, "CS", Scalar::from("CT")),
            Element::new(
                tags::PATIENT_NAME,
                "PN",
                Scalar::PersonName(PersonName::from_dicom_str("Doe^Jane")),
            ),
            Element::new(
                tags::PIXEL_SPACING,
                "DS",
                vec![Scalar::Float(0.5), Scalar::Float(0.5)],
            ),
            Element::new(
                tags::REFERENCED_STUDY_SEQUENCE,
                "SQ",
                Sequence::with_items(tags::REFERENCED_STUDY_SEQUENCE, vec![item]),
            ),
            Element::new(Tag(0x0009, 0x1001), "OB", Scalar::Bytes(vec![0xFF, 0x00])),
            Element::empty(tags::ACCESSION_NUMBER, "SH"),
        ])
    }

    #[test]
    fn flattened_export_by_keyword() {
        let map = sample().to_map(KeyMode::Keywords, &[tags::MODALITY]);
        assert_eq!(JsonValue::Object(map), json!({ "Modality": "CT" }));
    }

    #[test]
    fn flattened_export_by_tag() {
        let map = sample().to_map(KeyMode::Tags, &[]);
        assert_eq!(
            JsonValue::Object(map),
            json!({
                "00080050": null,
                "00080060": "CT",
                "00081110": [ { "0020000D": "1.2.3.4" } ],
                "00091001": ["/wA="],
                "00100010": { "Alphabetic": { "FamilyName": "Doe", "GivenName": "Jane" } },
                "00280030": [0.5, 0.5],
            })
        );
    }

    #[test]
    fn keyword_export_falls_back_to_tags() {
        let map = sample().to_map(KeyMode::Keywords, &[]);
        let keys: Vec<_> = map.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "AccessionNumber",
                "Modality",
                "ReferencedStudySequence",
                "00091001",
                "PatientName",
                "PixelSpacing",
            ]
        );
        assert_eq!(
            map["ReferencedStudySequence"],
            json!([ { "StudyInstanceUID": "1.2.3.4" } ])
        );
    }

    #[test]
    fn standard_dicom_json_export() {
        let json = sample().to_dicom_json().unwrap();
        assert_eq!(
            json,
            json!({
                "00080050": { "vr": "SH" },
                "00080060": { "vr": "CS", "Value": ["CT"] },
                "00081110": {
                    "vr": "SQ",
                    "Value": [ { "0020000D": { "vr": "UI", "Value": ["1.2.3.4"] } } ]
                },
                "00091001": { "vr": "OB", "InlineBinary": "/wA=" },
                "00100010": { "vr": "PN", "Value": [ { "Alphabetic": "Doe^Jane" } ] },
                "00280030": { "vr": "DS", "Value": [0.5, 0.5] },
            })
        );
    }
}
