//! DICOMweb JSON metadata module
//!
//! This library parses DICOMweb JSON metadata responses,
//! as per the [DICOM standard part 18 chapter F][1],
//! into a typed model of [instances](Instance),
//! [series](Series) and [studies](Study).
//!
//! [1]: https://dicom.nema.org/medical/dicom/current/output/chtml/part18/chapter_F.html
//!
//! Element values are decoded according to their value representation:
//! dates become [`chrono`] dates,
//! person names become [`PersonName`]s,
//! numbers become integers or floats,
//! and inline binary data is decoded from base64.
//! Values which do not match their value representation are kept as given.
//!
//! # Example
//!
//! ```rust
//! use dicomweb_metadata::{tags, KeyMode, SeriesOrder};
//!
//! let json = r#"[
//!   {
//!     "0020000D": { "vr": "UI", "Value": ["1.2.3"] },
//!     "0020000E": { "vr": "UI", "Value": ["1.2.3.2"] },
//!     "00080060": { "vr": "CS", "Value": ["MR"] },
//!     "00200011": { "vr": "IS", "Value": [2] },
//!     "00100010": { "vr": "PN", "Value": [{ "Alphabetic": "Doe^Jane" }] }
//!   },
//!   {
//!     "0020000D": { "vr": "UI", "Value": ["1.2.3"] },
//!     "0020000E": { "vr": "UI", "Value": ["1.2.3.1"] },
//!     "00080060": { "vr": "CS", "Value": ["CT"] },
//!     "00200011": { "vr": "IS", "Value": [1] }
//!   }
//! ]"#;
//!
//! let study = dicomweb_metadata::parse_study_ordered(json, [SeriesOrder::BySeriesNumber])?;
//!
//! assert_eq!(study.series_count(), 2);
//! assert_eq!(study.modalities(), vec!["CT", "MR"]);
//! assert_eq!(study.patient_name().map(|name| name.to_string()), Some("Jane Doe".to_string()));
//!
//! let first = &study.series()[0].instances()[0];
//! assert_eq!(first.first_str(tags::MODALITY), Some("CT"));
//! assert_eq!(
//!     serde_json::Value::Object(first.to_map(KeyMode::Keywords, &[tags::MODALITY])),
//!     serde_json::json!({ "Modality": "CT" })
//! );
//! # Ok::<(), dicomweb_metadata::Error>(())
//! ```
//!
//! Use [`ParserOptions`] to select a different [tag dictionary](TagDictionary)
//! or to limit the nesting of sequences.

pub mod de;
pub mod dictionary;
pub mod error;
pub mod model;
pub mod parser;
pub mod ser;
pub mod tag;
pub mod tags;

pub use crate::dictionary::{StandardTagDictionary, TableDictionary, TagDictionary, TagInfo};
pub use crate::error::{Error, Result};
pub use crate::model::{
    DataSet, Element, Instance, PersonName, Scalar, Sequence, SequenceItem, Series, SeriesOrder,
    Study, Value, ValueRef,
};
pub use crate::parser::{JsonInput, Parser, ParserOptions};
pub use crate::ser::{JsonMap, KeyMode};
pub use crate::tag::{AsTag, Tag, TagStyle};

/// Parse the first data set of a DICOMweb JSON response
/// with the standard tag dictionary.
pub fn parse_instance<'a>(input: impl Into<JsonInput<'a>>) -> Result<Instance> {
    Parser::new().parse_instance(input)
}

/// Parse every data set of a DICOMweb JSON response
/// with the standard tag dictionary.
pub fn parse_instances<'a>(input: impl Into<JsonInput<'a>>) -> Result<Vec<Instance>> {
    Parser::new().parse_instances(input)
}

/// Parse a DICOMweb JSON response into a study
/// with the standard tag dictionary,
/// keeping the series in order of first appearance.
pub fn parse_study<'a>(input: impl Into<JsonInput<'a>>) -> Result<Study> {
    Parser::new().parse_study(input)
}

/// Parse a DICOMweb JSON response into a study
/// with the standard tag dictionary,
/// then apply the given series orderings in sequence.
pub fn parse_study_ordered<'a, I>(input: impl Into<JsonInput<'a>>, modes: I) -> Result<Study>
where
    I: IntoIterator<Item = SeriesOrder>,
{
    Parser::new().parse_study_ordered(input, modes)
}
