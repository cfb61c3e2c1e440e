//! Parsing of DICOMweb JSON responses into instances, series and studies.
//!
//! A [`Parser`] is created through [`ParserOptions`],
//! which selects the tag dictionary,
//! the sequence nesting limit,
//! and the series ordering applied to parsed studies.
//!
//! ```
//! use dicomweb_metadata::{ParserOptions, SeriesOrder};
//!
//! let parser = ParserOptions::new()
//!     .max_sequence_depth(16)
//!     .order_series(SeriesOrder::BySeriesNumber)
//!     .build();
//! let study = parser.parse_study(r#"[{
//!     "0020000D": { "vr": "UI", "Value": ["1.2.3"] },
//!     "0020000E": { "vr": "UI", "Value": ["1.2.3.1"] }
//! }]"#)?;
//! assert_eq!(study.study_instance_uid(), "1.2.3");
//! # Ok::<(), dicomweb_metadata::Error>(())
//! ```

use crate::de::{ElementDecoder, DEFAULT_MAX_SEQUENCE_DEPTH};
use crate::dictionary::{StandardTagDictionary, TagDictionary};
use crate::error::{
    InvalidInputSnafu, InvalidJsonSnafu, MissingStudyUidSnafu, NoInstancesFoundSnafu, Result,
};
use crate::model::{Instance, Series, SeriesOrder, Study};
use serde_json::Value as JsonValue;
use snafu::{ensure, OptionExt, ResultExt};
use std::borrow::Cow;
use std::collections::HashMap;

/// The input of a parse operation:
/// either JSON text or an already decoded JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonInput<'a> {
    /// JSON text, still to be parsed
    Text(&'a [u8]),
    /// A decoded JSON value
    Value(Cow<'a, JsonValue>),
}

impl<'a> JsonInput<'a> {
    fn into_value(self) -> Result<Cow<'a, JsonValue>> {
        match self {
            JsonInput::Text(text) => serde_json::from_slice(text)
                .map(Cow::Owned)
                .context(InvalidJsonSnafu),
            JsonInput::Value(value) => Ok(value),
        }
    }
}

impl<'a> From<&'a str> for JsonInput<'a> {
    fn from(text: &'a str) -> Self {
        JsonInput::Text(text.as_bytes())
    }
}

impl<'a> From<&'a String> for JsonInput<'a> {
    fn from(text: &'a String) -> Self {
        JsonInput::Text(text.as_bytes())
    }
}

impl<'a> From<&'a [u8]> for JsonInput<'a> {
    fn from(text: &'a [u8]) -> Self {
        JsonInput::Text(text)
    }
}

impl From<JsonValue> for JsonInput<'static> {
    fn from(value: JsonValue) -> Self {
        JsonInput::Value(Cow::Owned(value))
    }
}

impl<'a> From<&'a JsonValue> for JsonInput<'a> {
    fn from(value: &'a JsonValue) -> Self {
        JsonInput::Value(Cow::Borrowed(value))
    }
}

/// A builder of [`Parser`]s.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ParserOptions<D = StandardTagDictionary> {
    dictionary: D,
    max_sequence_depth: usize,
    order: Vec<SeriesOrder>,
}

impl ParserOptions {
    pub fn new() -> Self {
        ParserOptions::default()
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            dictionary: StandardTagDictionary,
            max_sequence_depth: DEFAULT_MAX_SEQUENCE_DEPTH,
            order: Vec::new(),
        }
    }
}

impl<D> ParserOptions<D> {
    /// Set the tag dictionary attached to the parsed data sets.
    pub fn dictionary<Di>(self, dict: Di) -> ParserOptions<Di>
    where
        Di: TagDictionary,
        Di: Clone,
    {
        ParserOptions {
            dictionary: dict,
            max_sequence_depth: self.max_sequence_depth,
            order: self.order,
        }
    }

    /// Set the maximum nesting depth of sequences.
    ///
    /// Input with deeper sequences fails to parse.
    /// The default is [`DEFAULT_MAX_SEQUENCE_DEPTH`].
    pub fn max_sequence_depth(mut self, depth: usize) -> Self {
        self.max_sequence_depth = depth;
        self
    }

    /// Set the ordering applied to the series of every parsed study.
    pub fn order_series(mut self, mode: SeriesOrder) -> Self {
        self.order = vec![mode];
        self
    }

    /// Set several orderings to apply in sequence
    /// to the series of every parsed study.
    pub fn order_series_by<I>(mut self, modes: I) -> Self
    where
        I: IntoIterator<Item = SeriesOrder>,
    {
        self.order = modes.into_iter().collect();
        self
    }

    pub fn build(self) -> Parser<D>
    where
        D: TagDictionary,
        D: Clone,
    {
        Parser {
            decoder: ElementDecoder::new(self.dictionary, self.max_sequence_depth),
            order: self.order,
        }
    }
}

/// A parser of DICOMweb JSON metadata.
#[derive(Debug, Clone)]
pub struct Parser<D = StandardTagDictionary> {
    decoder: ElementDecoder<D>,
    order: Vec<SeriesOrder>,
}

impl Parser {
    /// Create a parser with the default options.
    pub fn new() -> Self {
        ParserOptions::new().build()
    }
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new()
    }
}

/// Retrieve the list of data sets of a DICOMweb JSON response.
fn data_sets(value: &JsonValue) -> Result<&[JsonValue]> {
    let data_sets = value.as_array().context(InvalidInputSnafu {
        reason: "expected a JSON array of data sets",
    })?;
    ensure!(
        !data_sets.is_empty(),
        InvalidInputSnafu {
            reason: "expected DICOM JSON to contain at least one data set",
        }
    );
    Ok(data_sets.as_slice())
}

impl<D> Parser<D>
where
    D: TagDictionary + Clone,
{
    /// Parse the first data set of a DICOMweb JSON response.
    pub fn parse_instance<'a>(&self, input: impl Into<JsonInput<'a>>) -> Result<Instance<D>> {
        let value = input.into().into_value()?;
        let first = data_sets(&value)?.first().context(NoInstancesFoundSnafu)?;
        self.instance(first)
    }

    /// Parse every data set of a DICOMweb JSON response.
    pub fn parse_instances<'a>(
        &self,
        input: impl Into<JsonInput<'a>>,
    ) -> Result<Vec<Instance<D>>> {
        let value = input.into().into_value()?;
        let instances = data_sets(&value)?
            .iter()
            .map(|data_set| self.instance(data_set))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!("parsed {} instances", instances.len());
        Ok(instances)
    }

    /// Parse a DICOMweb JSON response into a study,
    /// applying the orderings configured for this parser.
    pub fn parse_study<'a>(&self, input: impl Into<JsonInput<'a>>) -> Result<Study<D>> {
        self.parse_study_ordered(input, self.order.iter().copied())
    }

    /// Parse a DICOMweb JSON response into a study,
    /// applying the given orderings in sequence
    /// instead of the ones configured for this parser.
    pub fn parse_study_ordered<'a, I>(
        &self,
        input: impl Into<JsonInput<'a>>,
        modes: I,
    ) -> Result<Study<D>>
    where
        I: IntoIterator<Item = SeriesOrder>,
    {
        let instances = self.parse_instances(input)?;
        let mut study = self.study_from_instances(instances)?;
        study.order_series_by(modes);
        Ok(study)
    }

    /// Group instances into series by series instance UID,
    /// in order of first appearance,
    /// and build a study with the study instance UID of the first instance.
    pub fn study_from_instances(&self, instances: Vec<Instance<D>>) -> Result<Study<D>> {
        let first = instances.first().context(NoInstancesFoundSnafu)?;
        let study_uid = first
            .study_instance_uid()
            .filter(|uid| !uid.is_empty())
            .context(MissingStudyUidSnafu)?
            .to_string();

        let mut groups: Vec<Vec<Instance<D>>> = Vec::new();
        let mut index: HashMap<Option<String>, usize> = HashMap::new();
        for instance in instances {
            let key = instance.series_instance_uid().map(str::to_string);
            let position = *index.entry(key).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[position].push(instance);
        }

        let series = groups
            .into_iter()
            .map(Series::from_instances)
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!("grouped study {} into {} series", study_uid, series.len());
        Ok(Study::new(study_uid, series))
    }

    fn instance(&self, data_set: &JsonValue) -> Result<Instance<D>> {
        self.decoder.decode_data_set(data_set).map(Instance::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::TableDictionary;
    use crate::model::Scalar;
    use crate::tags;
    use serde_json::json;

    fn data_set(study: &str, series: &str, number: i64) -> JsonValue {
        json!({
            "0020000D": { "vr": "UI", "Value": [study] },
            "0020000E": { "vr": "UI", "Value": [series] },
            "00200011": { "vr": "IS", "Value": [number] },
        })
    }

    #[test]
    fn rejects_unusable_input() {
        let parser = Parser::new();
        assert!(matches!(
            parser.parse_instance("invalid json"),
            Err(crate::Error::InvalidJson { .. })
        ));
        assert!(matches!(
            parser.parse_instance("[]"),
            Err(crate::Error::InvalidInput { .. })
        ));
        assert!(matches!(
            parser.parse_instances(&json!({ "00080060": { "vr": "CS" } })),
            Err(crate::Error::InvalidInput { .. })
        ));
        assert!(matches!(
            parser.study_from_instances(vec![]),
            Err(crate::Error::NoInstancesFound { .. })
        ));
    }

    #[test]
    fn accepts_text_and_values() {
        let parser = Parser::new();
        let value = json!([data_set("1", "1.1", 1)]);
        let text = value.to_string();
        let from_text = parser.parse_instance(&text).unwrap();
        let from_bytes = parser.parse_instance(text.as_bytes()).unwrap();
        let from_value = parser.parse_instance(&value).unwrap();
        let from_owned = parser.parse_instance(value).unwrap();
        assert_eq!(from_text, from_value);
        assert_eq!(from_bytes, from_owned);
        assert_eq!(from_text.series_instance_uid(), Some("1.1"));
    }

    #[test]
    fn groups_by_series_in_first_seen_order() {
        let input = json!([
            data_set("1", "b", 1),
            data_set("1", "a", 2),
            data_set("1", "b", 3),
        ]);
        let study = Parser::new().parse_study(&input).unwrap();
        let uids: Vec<_> = study.series().iter().map(Series::series_instance_uid).collect();
        assert_eq!(uids, vec!["b", "a"]);
        assert_eq!(study.series()[0].instance_count(), 2);
        assert_eq!(study.total_instance_count(), 3);
    }

    #[test]
    fn applies_configured_ordering() {
        let input = json!([data_set("1", "b", 2), data_set("1", "a", 1)]);
        let parser = ParserOptions::new()
            .order_series(SeriesOrder::BySeriesNumber)
            .build();
        let study = parser.parse_study(&input).unwrap();
        assert_eq!(study.series()[0].series_instance_uid(), "a");
        assert_eq!(study.current_order(), Some(SeriesOrder::BySeriesNumber));

        let study = parser
            .parse_study_ordered(&input, [SeriesOrder::Default])
            .unwrap();
        assert_eq!(study.series()[0].series_instance_uid(), "b");
    }

    #[test]
    fn study_needs_uids() {
        let parser = Parser::new();
        assert!(matches!(
            parser.parse_study(&json!([{ "0020000E": { "vr": "UI", "Value": ["1.1"] } }])),
            Err(crate::Error::MissingStudyUid { .. })
        ));
        assert!(matches!(
            parser.parse_study(&json!([
                data_set("1", "1.1", 1),
                { "0020000D": { "vr": "UI", "Value": ["1"] } },
            ])),
            Err(crate::Error::MissingSeriesUid { .. })
        ));
    }

    #[test]
    fn uses_the_given_dictionary() {
        let dict = TableDictionary::from_json_str(
            r#"{ "00200011": { "keyword": "SeriesNumber", "valueRepresentation": "IS", "valueMultiplicity": "1" } }"#,
        )
        .unwrap();
        let parser = ParserOptions::new().dictionary(dict).build();
        let instance = parser.parse_instance(&json!([data_set("1", "1.1", 7)])).unwrap();
        assert_eq!(
            instance.value_by_keyword("SeriesNumber").and_then(|v| v.as_single()),
            Some(&Scalar::Int(7))
        );
        assert_eq!(instance.dict().len(), 1);
        assert!(instance.first_value(tags::SERIES_NUMBER).is_some());
    }
}
