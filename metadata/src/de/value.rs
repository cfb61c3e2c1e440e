//! Value decoders, one per family of value representations.
//!
//! Every decoder maps one raw JSON value to a [`Scalar`].
//! Decoders never fail:
//! content which does not match the value representation
//! is kept as it was found, and a warning is logged.
use crate::model::{PersonName, Scalar};
use crate::Tag;
use base64::Engine;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value as JsonValue;

/// Decode the values of a primitive element according to its VR.
pub(crate) fn decode(tag: Tag, vr: &str, values: &[JsonValue]) -> Vec<Scalar> {
    let decoder: fn(Tag, &JsonValue) -> Scalar = match vr {
        "DA" => date,
        "TM" => time,
        "DT" => date_time,
        "PN" => person_name,
        "DS" => decimal,
        "IS" => integer,
        "FL" | "FD" => floating_point,
        "AT" => attribute_tag,
        _ => passthrough,
    };
    values.iter().map(|value| decoder(tag, value)).collect()
}

/// Decode binary data.
///
/// `InlineBinary` takes priority over `Value`.
/// If neither is present, there are no values.
pub(crate) fn binary(tag: Tag, node: &serde_json::Map<String, JsonValue>) -> Vec<Scalar> {
    match node.get("InlineBinary") {
        Some(JsonValue::String(encoded)) => {
            let decoded = base64::engine::general_purpose::STANDARD.decode(encoded.trim());
            match decoded {
                Ok(bytes) => vec![Scalar::Bytes(bytes)],
                Err(e) => {
                    tracing::warn!("inline binary of {} is not valid base64 ({}); keeping it as text", tag, e);
                    vec![Scalar::Str(encoded.clone())]
                }
            }
        }
        Some(other) if !other.is_null() => vec![passthrough(tag, other)],
        _ => match node.get("Value") {
            Some(JsonValue::Array(values)) => values.iter().map(|v| passthrough(tag, v)).collect(),
            Some(JsonValue::Null) | None => {
                if node.contains_key("BulkDataURI") {
                    tracing::warn!("bulk data URI is not supported; skipping value of {}", tag);
                }
                Vec::new()
            }
            Some(value) => vec![passthrough(tag, value)],
        },
    }
}

/// Convert a JSON value to a scalar without interpretation.
pub(crate) fn passthrough(_tag: Tag, value: &JsonValue) -> Scalar {
    match value {
        JsonValue::Null => Scalar::Null,
        JsonValue::String(s) => Scalar::Str(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Scalar::Int(i)
            } else if n.is_f64() {
                n.as_f64().map_or_else(|| Scalar::Json(value.clone()), Scalar::Float)
            } else {
                // unsigned integers beyond the signed range
                Scalar::Json(value.clone())
            }
        }
        _ => Scalar::Json(value.clone()),
    }
}

/// The text form of strings and numbers.
fn text_of(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// DA: `YYYYMMDD` to a calendar date.
fn date(tag: Tag, value: &JsonValue) -> Scalar {
    let Some(text) = text_of(value) else {
        return passthrough(tag, value);
    };
    let trimmed = text.trim();
    if trimmed.len() != 8 {
        if !trimmed.is_empty() {
            tracing::warn!("date `{}` of {} is not in YYYYMMDD form; keeping it as text", text, tag);
        }
        return Scalar::Str(text);
    }
    match NaiveDate::parse_from_str(trimmed, "%Y%m%d") {
        Ok(date) => Scalar::Date(date),
        Err(_) => {
            tracing::warn!("could not parse date `{}` of {}; keeping it as text", text, tag);
            Scalar::Str(text)
        }
    }
}

/// Split `HH[MM[SS[.F{1,6}]]]` into its components.
fn time_parts(text: &str) -> Option<(&str, Option<&str>, Option<&str>, Option<&str>)> {
    let (hms, fraction) = match text.split_once('.') {
        Some((hms, fraction)) => (hms, Some(fraction)),
        None => (text, None),
    };
    if !hms.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if let Some(fraction) = fraction {
        if hms.len() != 6
            || fraction.is_empty()
            || fraction.len() > 6
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
    }
    let (hours, minutes, seconds) = match hms.len() {
        2 => (hms, None, None),
        4 => (&hms[..2], Some(&hms[2..4]), None),
        6 => (&hms[..2], Some(&hms[2..4]), Some(&hms[4..6])),
        _ => return None,
    };
    let in_range = |part: Option<&str>, max: u32| {
        part.map_or(true, |p| p.parse::<u32>().map_or(false, |n| n <= max))
    };
    if !in_range(Some(hours), 23) || !in_range(minutes, 59) || !in_range(seconds, 60) {
        return None;
    }
    Some((hours, minutes, seconds, fraction))
}

/// Format `HHMMSS.FFFFFF` as `HH:MM:SS.FFFFFF`.
pub(crate) fn iso_time(text: &str) -> Option<String> {
    let (hours, minutes, seconds, fraction) = time_parts(text)?;
    let mut out = hours.to_string();
    for part in [minutes, seconds].into_iter().flatten() {
        out.push(':');
        out.push_str(part);
    }
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    Some(out)
}

/// TM: `HHMMSS.FFFFFF` to `HH:MM:SS.FFFFFF`.
fn time(tag: Tag, value: &JsonValue) -> Scalar {
    let Some(text) = text_of(value) else {
        return passthrough(tag, value);
    };
    match iso_time(text.trim()) {
        Some(out) => Scalar::Str(out),
        None => {
            if !text.is_empty() {
                tracing::warn!("could not parse time `{}` of {}; keeping it as text", text, tag);
            }
            Scalar::Str(text)
        }
    }
}

/// Convert a DICOM UTC offset (`+HHMM`, `-HHMM` or `UTC`)
/// to its ISO 8601 form.
fn iso_offset(zone: &str) -> Option<String> {
    if zone == "UTC" {
        return Some("Z".to_string());
    }
    let bytes = zone.as_bytes();
    match bytes {
        [sign @ (b'+' | b'-'), digits @ ..]
            if digits.len() == 4 && digits.iter().all(u8::is_ascii_digit) =>
        {
            Some(format!("{}{}:{}", *sign as char, &zone[1..3], &zone[3..5]))
        }
        _ => None,
    }
}

/// Interpret `YYYYMMDDHHMMSS.FFFFFF&ZZXX` as an ISO 8601 date-time.
///
/// Missing time components are taken as zero.
/// The offset may follow the time directly or after an `&`.
pub(crate) fn parse_date_time(text: &str) -> Option<String> {
    if text.len() < 8 || !text.is_char_boundary(8) {
        return None;
    }
    let (date, rest) = text.split_at(8);
    if !date.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let (time, zone) = match rest.split_once('&') {
        Some((time, zone)) => (time, Some(zone)),
        None => match rest.find(|c: char| c == '+' || c == '-') {
            Some(pos) => (&rest[..pos], Some(&rest[pos..])),
            None => match rest.strip_suffix("UTC") {
                Some(time) => (time, Some("UTC")),
                None => (rest, None),
            },
        },
    };
    let zone = match zone {
        Some(zone) => Some(iso_offset(zone)?),
        None => None,
    };

    let (hours, minutes, seconds, fraction) = if time.is_empty() {
        ("00", None, None, None)
    } else {
        time_parts(time)?
    };

    let iso = format!(
        "{}-{}-{}T{}:{}:{}{}{}",
        &date[..4],
        &date[4..6],
        &date[6..8],
        hours,
        minutes.unwrap_or("00"),
        seconds.unwrap_or("00"),
        fraction.map(|f| format!(".{}", f)).unwrap_or_default(),
        zone.as_deref().unwrap_or(""),
    );

    let valid = if zone.is_some() {
        DateTime::parse_from_rfc3339(&iso).is_ok()
    } else {
        NaiveDateTime::parse_from_str(&iso, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
    };
    valid.then_some(iso)
}

/// DT: `YYYYMMDDHHMMSS.FFFFFF&ZZXX` to ISO 8601.
fn date_time(tag: Tag, value: &JsonValue) -> Scalar {
    let Some(text) = text_of(value) else {
        return passthrough(tag, value);
    };
    match parse_date_time(text.trim()) {
        Some(iso) => Scalar::Str(iso),
        None => {
            if !text.is_empty() {
                tracing::warn!("could not parse date-time `{}` of {}; keeping it as text", text, tag);
            }
            Scalar::Str(text)
        }
    }
}

/// PN: structured or `^`-delimited names to a [`PersonName`].
fn person_name(tag: Tag, value: &JsonValue) -> Scalar {
    match value {
        JsonValue::String(text) => Scalar::PersonName(PersonName::from_dicom_str(text)),
        JsonValue::Object(parts) => {
            let mut name = match parts.get("Alphabetic") {
                Some(JsonValue::String(text)) => PersonName::from_dicom_str(text),
                Some(JsonValue::Object(components)) => {
                    let component = |key: &str| {
                        components
                            .get(key)
                            .and_then(JsonValue::as_str)
                            .map(str::to_string)
                    };
                    PersonName {
                        family_name: component("FamilyName"),
                        given_name: component("GivenName"),
                        middle_name: component("MiddleName"),
                        name_prefix: component("NamePrefix"),
                        name_suffix: component("NameSuffix"),
                        ..PersonName::default()
                    }
                }
                _ => PersonName::default(),
            };
            name.ideographic = parts.get("Ideographic").cloned();
            name.phonetic = parts.get("Phonetic").cloned();
            Scalar::PersonName(name)
        }
        _ => passthrough(tag, value),
    }
}

/// DS: decimal strings to floating point numbers.
fn decimal(tag: Tag, value: &JsonValue) -> Scalar {
    match value {
        JsonValue::String(text) => match text.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => Scalar::Float(number),
            _ => {
                if !text.trim().is_empty() {
                    tracing::warn!("decimal string `{}` of {} is not a number; keeping it as text", text, tag);
                }
                Scalar::Str(text.clone())
            }
        },
        JsonValue::Number(n) => n.as_f64().map_or_else(|| passthrough(tag, value), Scalar::Float),
        _ => passthrough(tag, value),
    }
}

/// IS: integer strings to integers.
fn integer(tag: Tag, value: &JsonValue) -> Scalar {
    match value {
        JsonValue::String(text) => match text.trim().parse::<i64>() {
            Ok(number) => Scalar::Int(number),
            Err(_) => {
                if !text.trim().is_empty() {
                    tracing::warn!("integer string `{}` of {} is not an integer; keeping it as text", text, tag);
                }
                Scalar::Str(text.clone())
            }
        },
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Scalar::Int(i),
            None => match n.as_f64() {
                Some(f) if f.fract() == 0. && f.abs() < i64::MAX as f64 => Scalar::Int(f as i64),
                _ => passthrough(tag, value),
            },
        },
        _ => passthrough(tag, value),
    }
}

/// FL, FD: numbers (or their text form, including `NaN` and `inf`)
/// to floating point numbers.
fn floating_point(tag: Tag, value: &JsonValue) -> Scalar {
    match value {
        JsonValue::Number(n) => n.as_f64().map_or_else(|| passthrough(tag, value), Scalar::Float),
        JsonValue::String(text) => match text.trim().parse::<f64>() {
            Ok(number) => Scalar::Float(number),
            Err(_) => {
                tracing::warn!("`{}` of {} is not a floating point number; keeping it as text", text, tag);
                Scalar::Str(text.clone())
            }
        },
        _ => passthrough(tag, value),
    }
}

/// AT: tag text or `[group, element]` pairs to tags.
fn attribute_tag(tag: Tag, value: &JsonValue) -> Scalar {
    match value {
        JsonValue::String(text) => match Tag::normalize(text) {
            Ok(t) => Scalar::Tag(t),
            Err(_) => {
                tracing::warn!("`{}` of {} is not an attribute tag; keeping it as text", text, tag);
                Scalar::Str(text.clone())
            }
        },
        JsonValue::Array(pair) if pair.len() == 2 => {
            let part = |v: &JsonValue| v.as_u64().and_then(|n| u16::try_from(n).ok());
            match (part(&pair[0]), part(&pair[1])) {
                (Some(group), Some(element)) => Scalar::Tag(Tag(group, element)),
                _ => passthrough(tag, value),
            }
        }
        _ => passthrough(tag, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const TAG: Tag = Tag(0x0008, 0x0020);

    fn dec(vr: &str, values: JsonValue) -> Vec<Scalar> {
        match values {
            JsonValue::Array(values) => decode(TAG, vr, &values),
            _ => unreachable!(),
        }
    }

    #[test]
    fn dates() {
        assert_eq!(
            dec("DA", json!(["20230115", 19991231])),
            vec![
                Scalar::Date(NaiveDate::from_ymd_opt(2023, 1, 15).unwrap()),
                Scalar::Date(NaiveDate::from_ymd_opt(1999, 12, 31).unwrap()),
            ]
        );
        // wrong length or impossible dates are kept as text
        assert_eq!(
            dec("DA", json!(["2023011", "20231340", ""])),
            vec![Scalar::from("2023011"), Scalar::from("20231340"), Scalar::from("")]
        );
    }

    #[test]
    fn times() {
        assert_eq!(
            dec("TM", json!(["102030", "102030.123456", "1020", "10", "ab", "251010"])),
            vec![
                Scalar::from("10:20:30"),
                Scalar::from("10:20:30.123456"),
                Scalar::from("10:20"),
                Scalar::from("10"),
                Scalar::from("ab"),
                Scalar::from("251010"),
            ]
        );
    }

    #[test]
    fn date_times() {
        assert_eq!(
            dec(
                "DT",
                json!([
                    "20230115102030.123456&+0100",
                    "20230115102030-0500",
                    "20230115102030&UTC",
                    "20230115",
                    "2023011510",
                    "20230115102030&+01",
                    "not a date time",
                ])
            ),
            vec![
                Scalar::from("2023-01-15T10:20:30.123456+01:00"),
                Scalar::from("2023-01-15T10:20:30-05:00"),
                Scalar::from("2023-01-15T10:20:30Z"),
                Scalar::from("2023-01-15T00:00:00"),
                Scalar::from("2023-01-15T10:00:00"),
                Scalar::from("20230115102030&+01"),
                Scalar::from("not a date time"),
            ]
        );
    }

    #[test]
    fn person_names() {
        let names = dec(
            "PN",
            json!([
                { "Alphabetic": { "FamilyName": "Doe", "GivenName": "Jane" } },
                "Smith^John^^Dr.",
                { "Alphabetic": "Yamada^Tarou", "Ideographic": "山田^太郎" },
                null,
            ]),
        );
        assert_eq!(
            names[0],
            Scalar::PersonName(PersonName {
                family_name: Some("Doe".into()),
                given_name: Some("Jane".into()),
                ..PersonName::default()
            })
        );
        let john = names[1].as_person_name().unwrap();
        assert_eq!(john.given_name.as_deref(), Some("John"));
        assert_eq!(john.middle_name, None);
        assert_eq!(john.name_prefix.as_deref(), Some("Dr."));
        assert_eq!(john.name_suffix, None);
        let tarou = names[2].as_person_name().unwrap();
        assert_eq!(tarou.family_name.as_deref(), Some("Yamada"));
        assert_eq!(tarou.ideographic, Some(json!("山田^太郎")));
        assert_eq!(names[3], Scalar::Null);
    }

    #[test]
    fn numbers_are_lenient() {
        assert_eq!(
            dec("DS", json!(["1.5", " -2 ", 3, "x1"])),
            vec![
                Scalar::Float(1.5),
                Scalar::Float(-2.),
                Scalar::Float(3.),
                Scalar::from("x1")
            ]
        );
        assert_eq!(
            dec("IS", json!(["12", 7, 8.0, "1.5", "abc"])),
            vec![
                Scalar::Int(12),
                Scalar::Int(7),
                Scalar::Int(8),
                Scalar::from("1.5"),
                Scalar::from("abc")
            ]
        );
        let floats = dec("FD", json!([0.25, "NaN", "-inf", "oops"]));
        assert_eq!(floats[0], Scalar::Float(0.25));
        assert!(matches!(floats[1], Scalar::Float(f) if f.is_nan()));
        assert_eq!(floats[2], Scalar::Float(f64::NEG_INFINITY));
        assert_eq!(floats[3], Scalar::from("oops"));
    }

    #[test]
    fn attribute_tags() {
        assert_eq!(
            dec("AT", json!(["00100010", [32, 14], "(0008,0060)", "bogus", {"x": 1}])),
            vec![
                Scalar::Tag(Tag(0x0010, 0x0010)),
                Scalar::Tag(Tag(0x0020, 0x000E)),
                Scalar::Tag(Tag(0x0008, 0x0060)),
                Scalar::from("bogus"),
                Scalar::Json(json!({"x": 1})),
            ]
        );
    }

    #[test]
    fn inline_binary_takes_priority() {
        let node = json!({ "vr": "OB", "InlineBinary": "AQID", "Value": [9, 9] });
        assert_eq!(
            binary(TAG, node.as_object().unwrap()),
            vec![Scalar::Bytes(vec![1, 2, 3])]
        );

        let node = json!({ "vr": "OW", "Value": [1, 2] });
        assert_eq!(
            binary(TAG, node.as_object().unwrap()),
            vec![Scalar::Int(1), Scalar::Int(2)]
        );

        let node = json!({ "vr": "OB" });
        assert!(binary(TAG, node.as_object().unwrap()).is_empty());

        let node = json!({ "vr": "OB", "InlineBinary": "%%%" });
        assert_eq!(binary(TAG, node.as_object().unwrap()), vec![Scalar::from("%%%")]);
    }

    #[test]
    fn unknown_vrs_pass_through() {
        assert_eq!(
            dec("UI", json!(["1.2.840.10008.1.2", null, {"a": true}])),
            vec![
                Scalar::from("1.2.840.10008.1.2"),
                Scalar::Null,
                Scalar::Json(json!({"a": true}))
            ]
        );
    }
}
