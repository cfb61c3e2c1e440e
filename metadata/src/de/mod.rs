//! Decoding of DICOM JSON data sets into the metadata model.
//!
//! Each element node is dispatched on its value representation:
//! sequences are decoded recursively into nested data sets,
//! binary value representations go through the inline binary decoder,
//! and everything else through the [value decoders](self::value).

use crate::dictionary::TagDictionary;
use crate::error::{InvalidInputSnafu, Result, SequenceTooDeepSnafu};
use crate::model::{DataSet, Element, Sequence, Value};
use crate::Tag;
use serde_json::{Map, Value as JsonValue};
use snafu::ensure;

pub(crate) mod value;

/// The default limit of nested sequences.
pub const DEFAULT_MAX_SEQUENCE_DEPTH: usize = 64;

fn is_binary_vr(vr: &str) -> bool {
    matches!(vr, "OB" | "OD" | "OF" | "OL" | "OV" | "OW")
}

/// Decoder of DICOM JSON element nodes.
#[derive(Debug, Clone)]
pub struct ElementDecoder<D> {
    dict: D,
    max_depth: usize,
}

impl<D> ElementDecoder<D>
where
    D: TagDictionary + Clone,
{
    /// Create a decoder which attaches the given dictionary
    /// to every decoded data set.
    pub fn new(dict: D, max_depth: usize) -> Self {
        ElementDecoder { dict, max_depth }
    }

    /// Decode one DICOM JSON data set object.
    pub fn decode_data_set(&self, node: &JsonValue) -> Result<DataSet<D>> {
        let object = node.as_object().ok_or_else(|| {
            InvalidInputSnafu {
                reason: "data set is not a JSON object",
            }
            .build()
        })?;
        self.data_set(object, 0)
    }

    /// Decode one element node of the given attribute.
    pub fn decode_element(&self, tag: Tag, node: &JsonValue) -> Result<Element<D>> {
        self.element(tag, node, 0)
    }

    fn data_set(&self, object: &Map<String, JsonValue>, depth: usize) -> Result<DataSet<D>> {
        let mut data = DataSet::new_with_dict(self.dict.clone());
        for (key, node) in object {
            let tag = Tag::normalize(key)?;
            data.put(self.element(tag, node, depth)?);
        }
        Ok(data)
    }

    fn element(&self, tag: Tag, node: &JsonValue, depth: usize) -> Result<Element<D>> {
        let node = node.as_object().ok_or_else(|| {
            InvalidInputSnafu {
                reason: format!("element {} is not a JSON object", tag),
            }
            .build()
        })?;
        let vr = node.get("vr").and_then(JsonValue::as_str).unwrap_or("");
        tracing::trace!("decoding {} with VR `{}`", tag, vr);

        let value = match vr {
            "SQ" => Value::Sequence(self.sequence(tag, node.get("Value"), depth)?),
            _ if is_binary_vr(vr) || (vr == "UN" && node.contains_key("InlineBinary")) => {
                Value::Primitive(value::binary(tag, node))
            }
            _ => match node.get("Value") {
                None | Some(JsonValue::Null) => Value::Empty,
                Some(JsonValue::Array(values)) => Value::Primitive(value::decode(tag, vr, values)),
                Some(single) => {
                    Value::Primitive(value::decode(tag, vr, std::slice::from_ref(single)))
                }
            },
        };
        Ok(Element::new(tag, vr, value))
    }

    fn sequence(&self, tag: Tag, items: Option<&JsonValue>, depth: usize) -> Result<Sequence<D>> {
        let items = match items {
            None | Some(JsonValue::Null) => return Ok(Sequence::new(tag)),
            Some(JsonValue::Array(items)) => items.as_slice(),
            Some(single) => std::slice::from_ref(single),
        };
        ensure!(
            depth < self.max_depth,
            SequenceTooDeepSnafu {
                tag,
                max_depth: self.max_depth,
            }
        );

        let mut seq = Sequence::new(tag);
        for item in items {
            let object = item.as_object().ok_or_else(|| {
                InvalidInputSnafu {
                    reason: format!("item of sequence {} is not a JSON object", tag),
                }
                .build()
            })?;
            seq.push(self.data_set(object, depth + 1)?);
        }
        Ok(seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::StandardTagDictionary;
    use crate::model::{Scalar, ValueRef};
    use crate::tags;
    use serde_json::json;

    fn decoder(max_depth: usize) -> ElementDecoder<StandardTagDictionary> {
        ElementDecoder::new(StandardTagDictionary, max_depth)
    }

    #[test]
    fn decodes_data_set() {
        let data = decoder(DEFAULT_MAX_SEQUENCE_DEPTH)
            .decode_data_set(&json!({
                "00080060": { "vr": "CS", "Value": ["MR"] },
                "00100010": { "vr": "PN" },
                "0020,0013": { "vr": "IS", "Value": "4" },
                "00281050": { "Value": ["40", "400"] },
            }))
            .unwrap();
        assert_eq!(data.len(), 4);
        assert_eq!(data.first_str(tags::MODALITY), Some("MR"));
        assert!(!data.element(tags::PATIENT_NAME).unwrap().has_value());
        assert_eq!(data.first_value(tags::INSTANCE_NUMBER), Some(&Scalar::Int(4)));
        // no VR: values are kept as given
        let window = data.element(tags::WINDOW_CENTER).unwrap();
        assert_eq!(window.vr(), "");
        assert_eq!(window.values(), &[Scalar::from("40"), Scalar::from("400")]);
    }

    #[test]
    fn empty_sequences_are_present() {
        let data = decoder(4)
            .decode_data_set(&json!({
                "00081110": { "vr": "SQ" },
                "00101002": { "vr": "SQ", "Value": [] },
            }))
            .unwrap();
        for tag in [tags::REFERENCED_STUDY_SEQUENCE, tags::OTHER_PATIENT_IDS_SEQUENCE] {
            let element = data.element(tag).unwrap();
            assert!(!element.has_value());
            assert_eq!(element.vr(), "SQ");
            assert!(matches!(data.element_value(tag), Some(ValueRef::Sequence(seq)) if seq.is_empty()));
        }
    }

    #[test]
    fn unknown_vr_with_inline_binary() {
        let element = decoder(4)
            .decode_element(
                Tag(0x0009, 0x0010),
                &json!({ "vr": "UN", "InlineBinary": "Zm9vYmFyIA==" }),
            )
            .unwrap();
        assert_eq!(element.values(), &[Scalar::Bytes(b"foobar ".to_vec())]);
    }

    #[test]
    fn structural_errors_are_fatal() {
        let decoder = decoder(4);
        assert!(matches!(
            decoder.decode_data_set(&json!({ "0010001": { "vr": "CS", "Value": ["X"] } })),
            Err(crate::Error::InvalidTag { .. })
        ));
        assert!(matches!(
            decoder.decode_data_set(&json!({ "00100010": "Doe^John" })),
            Err(crate::Error::InvalidInput { .. })
        ));
        assert!(matches!(
            decoder.decode_data_set(&json!({ "00081110": { "vr": "SQ", "Value": [42] } })),
            Err(crate::Error::InvalidInput { .. })
        ));
        assert!(matches!(
            decoder.decode_data_set(&json!([])),
            Err(crate::Error::InvalidInput { .. })
        ));
    }

    #[test]
    fn nesting_is_limited() {
        let nested = json!({
            "00081110": { "vr": "SQ", "Value": [
                { "00101002": { "vr": "SQ", "Value": [
                    { "00100020": { "vr": "LO", "Value": ["ID"] } }
                ] } }
            ] }
        });
        assert!(decoder(2).decode_data_set(&nested).is_ok());
        assert!(matches!(
            decoder(1).decode_data_set(&nested),
            Err(crate::Error::SequenceTooDeep { tag, max_depth: 1, .. })
                if tag == tags::OTHER_PATIENT_IDS_SEQUENCE
        ));
    }
}
