use crate::dictionary::{StandardTagDictionary, TagDictionary};
use crate::model::{Instance, PersonName, Scalar, Series};
use crate::ser::{JsonMap, KeyMode};
use crate::tag::AsTag;
use crate::tags::{self, STUDY_LEVEL_TAGS};
use crate::Tag;
use chrono::{NaiveDate, NaiveDateTime};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A strategy for ordering the series of a study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesOrder {
    /// Keep the current order
    Default,
    /// Ascending by series number (0020,0011)
    BySeriesNumber,
    /// Ascending by series date (0008,0021)
    BySeriesDate,
    /// Ascending by the study date (0008,0020) found in each series
    ByEarliestStudyDate,
}

impl SeriesOrder {
    /// The name of the ordering mode, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            SeriesOrder::Default => "default",
            SeriesOrder::BySeriesNumber => "by-series-number",
            SeriesOrder::BySeriesDate => "by-series-date",
            SeriesOrder::ByEarliestStudyDate => "by-earliest-study-date",
        }
    }
}

impl fmt::Display for SeriesOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error type for an unrecognized series ordering mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSeriesOrder(pub String);

impl fmt::Display for UnknownSeriesOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown series ordering mode `{}`", self.0)
    }
}

impl std::error::Error for UnknownSeriesOrder {}

impl FromStr for SeriesOrder {
    type Err = UnknownSeriesOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(SeriesOrder::Default),
            "by-series-number" => Ok(SeriesOrder::BySeriesNumber),
            "by-series-date" => Ok(SeriesOrder::BySeriesDate),
            "by-earliest-study-date" => Ok(SeriesOrder::ByEarliestStudyDate),
            _ => Err(UnknownSeriesOrder(s.to_string())),
        }
    }
}

/// Interpret a value as a number for ordering purposes.
fn numeric_key(value: &Scalar) -> Option<f64> {
    match value {
        Scalar::Int(_) | Scalar::Float(_) | Scalar::Str(_) => value.to_float(),
        Scalar::Json(serde_json::Value::Number(n)) => n.as_f64(),
        _ => None,
    }
    .filter(|n| !n.is_nan())
}

/// Interpret a value as a point in time for ordering purposes.
///
/// Decoded dates are accepted,
/// as well as text in the `YYYYMMDD`, `YYYY-MM-DD`
/// and ISO 8601 date-time forms.
fn timestamp_key(value: &Scalar) -> Option<NaiveDateTime> {
    match value {
        Scalar::Date(date) => date.and_hms_opt(0, 0, 0),
        Scalar::Str(text) => {
            let text = text.trim();
            NaiveDate::parse_from_str(text, "%Y%m%d")
                .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .or_else(|| {
                    chrono::DateTime::parse_from_rfc3339(text)
                        .ok()
                        .map(|dt| dt.naive_utc())
                })
                .or_else(|| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").ok())
        }
        _ => None,
    }
}

/// Stable sort placing the entries with a valid key first, in key order,
/// followed by the entries without one, in their current relative order.
fn sort_valid_first<T, K, F>(items: &mut Vec<T>, key: F)
where
    K: PartialOrd,
    F: Fn(&T) -> Option<K>,
{
    let mut keyed: Vec<(Option<K>, T)> = std::mem::take(items)
        .into_iter()
        .map(|item| (key(&item), item))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    items.extend(keyed.into_iter().map(|(_, item)| item));
}

/// A study: the series of one clinical examination.
#[derive(Debug, Clone)]
pub struct Study<D = StandardTagDictionary> {
    study_instance_uid: String,
    series: Vec<Series<D>>,
    current_order: Option<SeriesOrder>,
}

impl<D> PartialEq for Study<D> {
    fn eq(&self, other: &Self) -> bool {
        self.study_instance_uid == other.study_instance_uid && self.series == other.series
    }
}

impl<D> Study<D> {
    /// Create a study with the given series.
    pub fn new(study_instance_uid: impl Into<String>, series: Vec<Series<D>>) -> Self {
        Study {
            study_instance_uid: study_instance_uid.into(),
            series,
            current_order: None,
        }
    }

    /// Append a series to the study.
    ///
    /// The series is not checked against the study instance UID.
    pub fn add_series(&mut self, series: Series<D>) -> &mut Self {
        self.series.push(series);
        self.current_order = None;
        self
    }

    pub fn study_instance_uid(&self) -> &str {
        &self.study_instance_uid
    }

    pub fn series(&self) -> &[Series<D>] {
        &self.series
    }

    /// Fetch a series by its position in the study.
    pub fn series_at(&self, index: usize) -> Option<&Series<D>> {
        self.series.get(index)
    }

    /// Fetch a series by its series instance UID.
    pub fn series_by_uid(&self, uid: &str) -> Option<&Series<D>> {
        self.series.iter().find(|s| s.series_instance_uid() == uid)
    }

    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// The number of instances across all series.
    pub fn total_instance_count(&self) -> usize {
        self.series.iter().map(Series::instance_count).sum()
    }

    /// Iterate over the instances of all series, in series order.
    pub fn instances(&self) -> impl Iterator<Item = &Instance<D>> + '_ {
        self.series.iter().flat_map(|s| s.instances())
    }

    /// The ordering mode last applied to the series, if any.
    pub fn current_order(&self) -> Option<SeriesOrder> {
        self.current_order
    }

    pub fn into_series(self) -> Vec<Series<D>> {
        self.series
    }
}

impl<D> Study<D>
where
    D: TagDictionary,
{
    /// The distinct modalities of the series, in order of first appearance.
    pub fn modalities(&self) -> Vec<&str> {
        let mut modalities: Vec<&str> = Vec::new();
        for modality in self.series.iter().filter_map(Series::modality) {
            if !modality.is_empty() && !modalities.contains(&modality) {
                modalities.push(modality);
            }
        }
        modalities
    }

    /// The first non-empty value of an attribute, scanning the series in order.
    pub fn first_value<T: AsTag>(&self, tag: T) -> Option<&Scalar> {
        let tag = tag.as_tag()?;
        self.series
            .iter()
            .filter_map(|s| s.first_value(tag))
            .find(|value| !value.is_empty())
    }

    /// The first non-empty value of an attribute by keyword.
    pub fn first_value_by_keyword(&self, keyword: &str) -> Option<&Scalar> {
        let tag = self.instances().next()?.resolve_keyword(keyword).ok()?;
        self.first_value(tag)
    }

    /// The study date, if it could be decoded.
    pub fn study_date(&self) -> Option<NaiveDate> {
        self.first_value(tags::STUDY_DATE).and_then(Scalar::as_date)
    }

    pub fn study_description(&self) -> Option<&str> {
        self.first_value(tags::STUDY_DESCRIPTION)
            .and_then(Scalar::as_str)
    }

    pub fn patient_name(&self) -> Option<&PersonName> {
        self.first_value(tags::PATIENT_NAME)
            .and_then(Scalar::as_person_name)
    }

    pub fn patient_id(&self) -> Option<&str> {
        self.first_value(tags::PATIENT_ID).and_then(Scalar::as_str)
    }

    /// Reorder the series with the given mode.
    ///
    /// Series with a valid sort key come first, in ascending order;
    /// series without one follow, in their current relative order.
    /// Sorting is stable and always starts from the current order,
    /// so successive modes accumulate.
    /// Applying the mode which was applied last does nothing.
    pub fn order_series(&mut self, mode: SeriesOrder) -> &mut Self {
        if self.current_order == Some(mode) {
            return self;
        }
        tracing::debug!(
            "ordering {} series of study {} {}",
            self.series.len(),
            self.study_instance_uid,
            mode
        );
        match mode {
            SeriesOrder::Default => {}
            SeriesOrder::BySeriesNumber => self.order_by_field(tags::SERIES_NUMBER, numeric_key),
            SeriesOrder::BySeriesDate => self.order_by_field(tags::SERIES_DATE, timestamp_key),
            SeriesOrder::ByEarliestStudyDate => {
                self.order_by_field(tags::STUDY_DATE, timestamp_key)
            }
        }
        self.current_order = Some(mode);
        self
    }

    /// Apply several ordering modes in sequence.
    pub fn order_series_by<I>(&mut self, modes: I) -> &mut Self
    where
        I: IntoIterator<Item = SeriesOrder>,
    {
        for mode in modes {
            self.order_series(mode);
        }
        self
    }

    fn order_by_field<K, F>(&mut self, tag: Tag, key: F)
    where
        K: PartialOrd,
        F: Fn(&Scalar) -> Option<K>,
    {
        sort_valid_first(&mut self.series, |series| {
            series
                .first_value(tag)
                .filter(|value| !value.is_empty())
                .and_then(&key)
        });
    }

    /// Export the [study level attributes](STUDY_LEVEL_TAGS),
    /// each taken from the first instance holding a value for it.
    pub fn summary(&self, keys: KeyMode) -> JsonMap {
        let mut map = JsonMap::new();
        for &tag in STUDY_LEVEL_TAGS {
            let holder = self.instances().find(|instance| {
                instance
                    .element(tag)
                    .map_or(false, |element| element.has_value())
            });
            if let Some(instance) = holder {
                if let Some(element) = instance.element(tag) {
                    map.insert(
                        instance.export_key(tag, keys),
                        instance.export_value(element, keys),
                    );
                }
            }
        }
        map
    }

    /// Export the [summary](Series::summary) of every series.
    pub fn series_summaries(&self, keys: KeyMode) -> Vec<JsonMap> {
        self.series.iter().map(|s| s.summary(keys)).collect()
    }
}
