//! Value serialization

use crate::de::value;
use crate::model::{PersonName, Scalar};
use base64::Engine;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value as JsonValue};

pub(crate) const NAN: &str = "NaN";
pub(crate) const INFINITY: &str = "inf";
pub(crate) const NEG_INFINITY: &str = "-inf";

fn special_float(number: f64) -> &'static str {
    if number.is_nan() {
        NAN
    } else if number.is_sign_positive() {
        INFINITY
    } else {
        NEG_INFINITY
    }
}

fn encode_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Convert a decoded value to its flattened JSON form.
///
/// Dates become ISO calendar dates,
/// binary data becomes base64 text,
/// and person names keep their structured form.
pub(crate) fn flat_scalar(value: &Scalar) -> JsonValue {
    match value {
        Scalar::Null => JsonValue::Null,
        Scalar::Str(s) => JsonValue::from(s.as_str()),
        Scalar::Int(i) => JsonValue::from(*i),
        Scalar::Float(f) if f.is_finite() => JsonValue::from(*f),
        Scalar::Float(f) => JsonValue::from(special_float(*f)),
        Scalar::Date(date) => JsonValue::from(date.format("%Y-%m-%d").to_string()),
        Scalar::Bytes(bytes) => JsonValue::from(encode_base64(bytes)),
        Scalar::PersonName(name) => structured_person_name(name),
        Scalar::Tag(tag) => JsonValue::from(tag.to_string()),
        Scalar::Json(value) => value.clone(),
    }
}

fn structured_person_name(name: &PersonName) -> JsonValue {
    let keys = ["FamilyName", "GivenName", "MiddleName", "NamePrefix", "NameSuffix"];
    let alphabetic: Map<String, JsonValue> = keys
        .iter()
        .zip(name.components())
        .filter_map(|(key, component)| component.map(|c| (key.to_string(), json!(c))))
        .collect();

    let mut out = Map::new();
    out.insert("Alphabetic".to_string(), JsonValue::Object(alphabetic));
    if let Some(ideographic) = &name.ideographic {
        out.insert("Ideographic".to_string(), ideographic.clone());
    }
    if let Some(phonetic) = &name.phonetic {
        out.insert("Phonetic".to_string(), phonetic.clone());
    }
    JsonValue::Object(out)
}

/// Wrapper type for a decoded value
/// to be encoded in standard DICOM JSON,
/// according to the value representation of its element.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DicomScalar<'a> {
    pub value: &'a Scalar,
    pub vr: &'a str,
}

impl Serialize for DicomScalar<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.value {
            Scalar::Null => serializer.serialize_none(),
            Scalar::Str(s) => match self.vr {
                "TM" => serializer.serialize_str(&dicom_time(s)),
                "DT" => serializer.serialize_str(&dicom_date_time(s)),
                "PN" => PersonNameDef::Alphabetic(s).serialize(serializer),
                _ => serializer.serialize_str(s),
            },
            Scalar::Int(i) => match self.vr {
                // integer and decimal strings are sent as numbers
                // unless they could lose precision
                "IS" | "DS" | "SV" | "UV" if i.unsigned_abs() > (1 << 53) => {
                    serializer.collect_str(i)
                }
                _ => serializer.serialize_i64(*i),
            },
            Scalar::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            Scalar::Float(f) => serializer.serialize_str(special_float(*f)),
            Scalar::Date(date) => serializer.collect_str(&date.format("%Y%m%d")),
            Scalar::Bytes(bytes) => serializer.serialize_str(&encode_base64(bytes)),
            Scalar::PersonName(name) => PersonNameDef::Structured(name).serialize(serializer),
            Scalar::Tag(tag) => serializer.collect_str(tag),
            Scalar::Json(value) => value.serialize(serializer),
        }
    }
}

/// A person name in the DICOM JSON model.
enum PersonNameDef<'a> {
    Alphabetic(&'a str),
    Structured(&'a PersonName),
}

impl Serialize for PersonNameDef<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut ser = serializer.serialize_map(None)?;
        match self {
            PersonNameDef::Alphabetic(text) => {
                ser.serialize_entry("Alphabetic", text)?;
            }
            PersonNameDef::Structured(name) => {
                ser.serialize_entry("Alphabetic", &name.to_dicom_string())?;
                if let Some(ideographic) = &name.ideographic {
                    ser.serialize_entry("Ideographic", ideographic)?;
                }
                if let Some(phonetic) = &name.phonetic {
                    ser.serialize_entry("Phonetic", phonetic)?;
                }
            }
        }
        ser.end()
    }
}

/// Turn a formatted `HH:MM:SS` time back into `HHMMSS`.
///
/// Only text which the TM decoder could have produced is converted,
/// anything else is returned unchanged.
fn dicom_time(text: &str) -> String {
    let raw = text.replace(':', "");
    if value::iso_time(&raw).as_deref() == Some(text) {
        raw
    } else {
        text.to_string()
    }
}

/// Turn an ISO 8601 date-time back into `YYYYMMDDHHMMSS.FFFFFF&ZZXX`.
///
/// Only text which the DT decoder could have produced is converted,
/// anything else is returned unchanged.
fn dicom_date_time(text: &str) -> String {
    let Some((date, time)) = text.split_once('T') else {
        return text.to_string();
    };
    let (time, zone) = match time.find(|c: char| c == '+' || c == '-' || c == 'Z') {
        Some(pos) => time.split_at(pos),
        None => (time, ""),
    };
    let (zone, iso_zone) = match zone {
        "Z" => ("UTC".to_string(), "Z"),
        zone => (zone.replace(':', ""), zone),
    };
    let raw = format!("{}{}{}", date.replace('-', ""), time.replace(':', ""), zone);
    let expected = format!("{}T{}{}", date, time, iso_zone);
    match value::parse_date_time(&raw) {
        Some(iso) if iso == expected => raw,
        _ => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn dicom(value: &Scalar, vr: &str) -> JsonValue {
        serde_json::to_value(DicomScalar { value, vr }).unwrap()
    }

    #[test]
    fn flattens_scalars() {
        assert_eq!(flat_scalar(&Scalar::from("CT")), json!("CT"));
        assert_eq!(flat_scalar(&Scalar::Int(5)), json!(5));
        assert_eq!(flat_scalar(&Scalar::Float(f64::NAN)), json!("NaN"));
        assert_eq!(
            flat_scalar(&Scalar::Date(NaiveDate::from_ymd_opt(2023, 6, 13).unwrap())),
            json!("2023-06-13")
        );
        assert_eq!(flat_scalar(&Scalar::Bytes(vec![1, 2, 3])), json!("AQID"));
        assert_eq!(
            flat_scalar(&Scalar::PersonName(PersonName::from_dicom_str("Doe^Jane"))),
            json!({ "Alphabetic": { "FamilyName": "Doe", "GivenName": "Jane" } })
        );
    }

    #[test]
    fn encodes_scalars_as_dicom_json() {
        let date = Scalar::Date(NaiveDate::from_ymd_opt(2023, 6, 13).unwrap());
        assert_eq!(dicom(&date, "DA"), json!("20230613"));
        assert_eq!(dicom(&Scalar::from("10:20:30.5"), "TM"), json!("102030.5"));
        assert_eq!(
            dicom(&Scalar::from("2023-01-15T10:20:30.123+01:00"), "DT"),
            json!("20230115102030.123+0100")
        );
        assert_eq!(
            dicom(&Scalar::from("2023-01-15T10:20:30Z"), "DT"),
            json!("20230115102030UTC")
        );
        assert_eq!(
            dicom(&Scalar::from("2023-01-15T00:00:00"), "DT"),
            json!("20230115000000")
        );
        assert_eq!(
            dicom(
                &Scalar::PersonName(PersonName::from_dicom_str("Doe^Jane")),
                "PN"
            ),
            json!({ "Alphabetic": "Doe^Jane" })
        );
        assert_eq!(dicom(&Scalar::Float(f64::NEG_INFINITY), "FD"), json!("-inf"));
        assert_eq!(dicom(&Scalar::Int(876543245678901234), "IS"), json!("876543245678901234"));
    }

    #[test]
    fn keeps_unparsed_times_as_given() {
        assert_eq!(dicom(&Scalar::from("12:30:xx"), "TM"), json!("12:30:xx"));
        assert_eq!(dicom(&Scalar::from("99"), "TM"), json!("99"));
        assert_eq!(dicom(&Scalar::from("Today"), "DT"), json!("Today"));
        assert_eq!(
            dicom(&Scalar::from("20230115T102030"), "DT"),
            json!("20230115T102030")
        );
        assert_eq!(dicom(&Scalar::from("2023-01-15"), "DT"), json!("2023-01-15"));
    }
}
