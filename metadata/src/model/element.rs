//! Data element and value types.
use crate::dictionary::StandardTagDictionary;
use crate::model::Sequence;
use crate::Tag;
use chrono::NaiveDate;
use dicom_core::VR;
use std::fmt;

/// The components of a person name in its alphabetic representation.
///
/// Components which were not given are `None`.
/// The ideographic and phonetic representations, when present,
/// are kept as they were found in the JSON input.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct PersonName {
    pub family_name: Option<String>,
    pub given_name: Option<String>,
    pub middle_name: Option<String>,
    pub name_prefix: Option<String>,
    pub name_suffix: Option<String>,
    pub ideographic: Option<serde_json::Value>,
    pub phonetic: Option<serde_json::Value>,
}

impl PersonName {
    /// Build a person name from its `^`-delimited DICOM form,
    /// as in `Doe^Jane^^Dr.`.
    ///
    /// Empty components become `None`.
    pub fn from_dicom_str(text: &str) -> Self {
        let mut parts = text.split('^').map(|part| {
            let part = part.trim();
            if part.is_empty() {
                None
            } else {
                Some(part.to_string())
            }
        });
        PersonName {
            family_name: parts.next().flatten(),
            given_name: parts.next().flatten(),
            middle_name: parts.next().flatten(),
            name_prefix: parts.next().flatten(),
            name_suffix: parts.next().flatten(),
            ideographic: None,
            phonetic: None,
        }
    }

    /// The five alphabetic components in DICOM order.
    pub fn components(&self) -> [Option<&str>; 5] {
        [
            self.family_name.as_deref(),
            self.given_name.as_deref(),
            self.middle_name.as_deref(),
            self.name_prefix.as_deref(),
            self.name_suffix.as_deref(),
        ]
    }

    /// Render the alphabetic name in its `^`-delimited DICOM form,
    /// without trailing empty components.
    pub fn to_dicom_string(&self) -> String {
        let components = self.components();
        let len = components
            .iter()
            .rposition(Option::is_some)
            .map_or(0, |i| i + 1);
        components[..len]
            .iter()
            .map(|c| c.unwrap_or(""))
            .collect::<Vec<_>>()
            .join("^")
    }

    /// Whether no alphabetic component is present.
    pub fn is_empty(&self) -> bool {
        self.components().iter().all(Option::is_none)
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [family, given, middle, prefix, suffix] = self.components();
        let words: Vec<&str> = [prefix, given, middle, family, suffix]
            .into_iter()
            .flatten()
            .collect();
        f.write_str(&words.join(" "))
    }
}

/// A single decoded value of a primitive data element.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// An explicit `null` in the value list
    Null,
    /// Text, including formatted times and date-times
    /// and any value kept unparsed
    Str(String),
    /// An integer (IS, and integral binary VRs given as numbers)
    Int(i64),
    /// A floating point or decimal number (DS, FL, FD)
    Float(f64),
    /// A calendar date (DA)
    Date(NaiveDate),
    /// Decoded inline binary data
    Bytes(Vec<u8>),
    /// A structured person name (PN)
    PersonName(PersonName),
    /// An attribute tag (AT)
    Tag(Tag),
    /// Any other JSON value, passed through unchanged
    Json(serde_json::Value),
}

impl Scalar {
    /// Whether this is a null or an empty piece of text.
    pub fn is_empty(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::Str(s) => s.is_empty(),
            Scalar::Json(serde_json::Value::Null) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Retrieve the value as an integer,
    /// parsing text and truncating floats if necessary.
    pub fn to_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            Scalar::Float(f) if f.is_finite() => Some(*f as i64),
            Scalar::Str(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
            }
            Scalar::Json(serde_json::Value::Number(n)) => n.as_i64(),
            _ => None,
        }
    }

    /// Retrieve the value as a floating point number,
    /// parsing text if necessary.
    pub fn to_float(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            Scalar::Str(s) => s.trim().parse().ok(),
            Scalar::Json(serde_json::Value::Number(n)) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Scalar::Date(date) => Some(*date),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Scalar::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_person_name(&self) -> Option<&PersonName> {
        match self {
            Scalar::PersonName(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_tag(&self) -> Option<Tag> {
        match self {
            Scalar::Tag(tag) => Some(*tag),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Str(s) => f.write_str(s),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Scalar::Bytes(bytes) => write!(f, "<{} bytes>", bytes.len()),
            Scalar::PersonName(name) => fmt::Display::fmt(name, f),
            Scalar::Tag(tag) => fmt::Display::fmt(tag, f),
            Scalar::Json(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<NaiveDate> for Scalar {
    fn from(value: NaiveDate) -> Self {
        Scalar::Date(value)
    }
}

impl From<PersonName> for Scalar {
    fn from(value: PersonName) -> Self {
        Scalar::PersonName(value)
    }
}

impl From<Tag> for Scalar {
    fn from(value: Tag) -> Self {
        Scalar::Tag(value)
    }
}

/// The decoded value of a data element.
#[derive(Debug, Clone)]
pub enum Value<D = StandardTagDictionary> {
    /// No value was given
    Empty,
    /// A list of primitive values
    Primitive(Vec<Scalar>),
    /// A sequence of nested data sets
    Sequence(Sequence<D>),
}

impl<D> PartialEq for Value<D> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Empty, Value::Empty) => true,
            (Value::Primitive(a), Value::Primitive(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            _ => false,
        }
    }
}

impl<D> Value<D> {
    /// The primitive values, or an empty slice for other kinds of values.
    pub fn values(&self) -> &[Scalar] {
        match self {
            Value::Primitive(values) => values,
            _ => &[],
        }
    }

    pub fn sequence(&self) -> Option<&Sequence<D>> {
        match self {
            Value::Sequence(seq) => Some(seq),
            _ => None,
        }
    }
}

impl<D> From<Scalar> for Value<D> {
    fn from(value: Scalar) -> Self {
        Value::Primitive(vec![value])
    }
}

impl<D> From<Vec<Scalar>> for Value<D> {
    fn from(values: Vec<Scalar>) -> Self {
        Value::Primitive(values)
    }
}

impl<D> From<Sequence<D>> for Value<D> {
    fn from(seq: Sequence<D>) -> Self {
        Value::Sequence(seq)
    }
}

/// A borrowed element value in the shape dictated by
/// the attribute's value multiplicity.
///
/// Attributes declared as single valued (VM 1)
/// are retrieved as [`ValueRef::Single`],
/// unless they are sequences,
/// which are always retrieved as [`ValueRef::Sequence`].
#[derive(Debug)]
pub enum ValueRef<'a, D = StandardTagDictionary> {
    Empty,
    Single(&'a Scalar),
    Multi(&'a [Scalar]),
    Sequence(&'a Sequence<D>),
}

impl<D> Clone for ValueRef<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D> Copy for ValueRef<'_, D> {}

impl<D> PartialEq for ValueRef<'_, D> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ValueRef::Empty, ValueRef::Empty) => true,
            (ValueRef::Single(a), ValueRef::Single(b)) => a == b,
            (ValueRef::Multi(a), ValueRef::Multi(b)) => a == b,
            (ValueRef::Sequence(a), ValueRef::Sequence(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a, D> ValueRef<'a, D> {
    pub fn is_empty(&self) -> bool {
        match self {
            ValueRef::Empty => true,
            ValueRef::Single(_) => false,
            ValueRef::Multi(values) => values.is_empty(),
            ValueRef::Sequence(seq) => seq.is_empty(),
        }
    }

    /// The single value, if the value was retrieved as single valued.
    pub fn as_single(&self) -> Option<&'a Scalar> {
        match self {
            ValueRef::Single(value) => Some(value),
            _ => None,
        }
    }

    /// The value list, if the value was retrieved as multi valued.
    pub fn as_multi(&self) -> Option<&'a [Scalar]> {
        match self {
            ValueRef::Multi(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&'a Sequence<D>> {
        match self {
            ValueRef::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    /// The first primitive value, regardless of shape.
    pub fn first(&self) -> Option<&'a Scalar> {
        match self {
            ValueRef::Single(value) => Some(value),
            ValueRef::Multi(values) => values.first(),
            _ => None,
        }
    }

    /// The first primitive value as text.
    pub fn as_str(&self) -> Option<&'a str> {
        self.first().and_then(Scalar::as_str)
    }
}

/// A decoded DICOM data element.
#[derive(Debug, Clone)]
pub struct Element<D = StandardTagDictionary> {
    tag: Tag,
    vr: String,
    value: Value<D>,
}

impl<D> PartialEq for Element<D> {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.vr == other.vr && self.value == other.value
    }
}

impl<D> Element<D> {
    /// Create a data element from its parts.
    pub fn new(tag: Tag, vr: impl Into<String>, value: impl Into<Value<D>>) -> Self {
        Element {
            tag,
            vr: vr.into(),
            value: value.into(),
        }
    }

    /// Create a data element without a value.
    pub fn empty(tag: Tag, vr: impl Into<String>) -> Self {
        Element {
            tag,
            vr: vr.into(),
            value: Value::Empty,
        }
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// The value representation code as found in the input,
    /// or an empty string if none was given.
    pub fn vr(&self) -> &str {
        &self.vr
    }

    /// The value representation, if it is a known code.
    pub fn vr_code(&self) -> Option<VR> {
        self.vr.parse().ok()
    }

    pub fn is_sequence(&self) -> bool {
        self.vr == "SQ" || matches!(self.value, Value::Sequence(_))
    }

    pub fn value(&self) -> &Value<D> {
        &self.value
    }

    pub fn into_value(self) -> Value<D> {
        self.value
    }

    /// The primitive values of the element,
    /// empty for sequences and elements without a value.
    pub fn values(&self) -> &[Scalar] {
        self.value.values()
    }

    /// The first primitive value of the element.
    pub fn first_value(&self) -> Option<&Scalar> {
        self.values().first()
    }

    pub fn sequence(&self) -> Option<&Sequence<D>> {
        self.value.sequence()
    }

    /// Whether the element holds at least one value or sequence item.
    pub fn has_value(&self) -> bool {
        match &self.value {
            Value::Empty => false,
            Value::Primitive(values) => !values.is_empty(),
            Value::Sequence(seq) => !seq.is_empty(),
        }
    }
}

impl<D> fmt::Display for Element<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.has_value() {
            return f.write_str("[empty]");
        }
        match &self.value {
            Value::Sequence(seq) => write!(f, "[{} item(s)]", seq.len()),
            _ => {
                f.write_str("[")?;
                for (i, value) in self.values().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_str("]")
            }
        }
    }
}
