use crate::dictionary::{StandardTagDictionary, TagDictionary};
use crate::error::{MissingSeriesUidSnafu, Result, SeriesUidMismatchSnafu};
use crate::model::{Instance, Scalar};
use crate::ser::{JsonMap, KeyMode};
use crate::tag::AsTag;
use crate::tags::{self, SERIES_LEVEL_TAGS};
use snafu::{ensure, OptionExt};

/// A series: instances sharing one series instance UID.
///
/// Every instance of a series reports the series' UID
/// in its `SeriesInstanceUID` (0020,000E) attribute.
#[derive(Debug, Clone)]
pub struct Series<D = StandardTagDictionary> {
    series_instance_uid: String,
    instances: Vec<Instance<D>>,
}

impl<D> PartialEq for Series<D> {
    fn eq(&self, other: &Self) -> bool {
        self.series_instance_uid == other.series_instance_uid && self.instances == other.instances
    }
}

impl<D> Series<D>
where
    D: TagDictionary,
{
    /// Create a series from a list of instances.
    ///
    /// Without an explicit UID,
    /// the UID is taken from the first instance.
    /// Fails if no UID can be determined,
    /// or if any instance belongs to a different series.
    pub fn new(instances: Vec<Instance<D>>, series_instance_uid: Option<String>) -> Result<Self> {
        let uid = match series_instance_uid.filter(|uid| !uid.is_empty()) {
            Some(uid) => uid,
            None => {
                let first = instances.first().context(MissingSeriesUidSnafu {
                    reason: "cannot create series without instances or explicit UID",
                })?;
                first
                    .series_instance_uid()
                    .filter(|uid| !uid.is_empty())
                    .context(MissingSeriesUidSnafu {
                        reason: "series instance UID not found in first instance",
                    })?
                    .to_string()
            }
        };
        for instance in &instances {
            Self::check_membership(&uid, instance)?;
        }
        Ok(Series {
            series_instance_uid: uid,
            instances,
        })
    }

    /// Create a series from instances, deriving the UID from the first one.
    pub fn from_instances(instances: Vec<Instance<D>>) -> Result<Self> {
        Self::new(instances, None)
    }

    fn check_membership(uid: &str, instance: &Instance<D>) -> Result<()> {
        let found = instance.series_instance_uid();
        ensure!(
            found == Some(uid),
            SeriesUidMismatchSnafu {
                expected: uid,
                found: found.map(str::to_string),
            }
        );
        Ok(())
    }

    /// Add an instance to the end of the series.
    ///
    /// Fails, leaving the series untouched,
    /// if the instance belongs to a different series.
    pub fn add_instance(&mut self, instance: Instance<D>) -> Result<&mut Self> {
        Self::check_membership(&self.series_instance_uid, &instance)?;
        self.instances.push(instance);
        Ok(self)
    }

    /// Sort the instances by instance number (0020,0013).
    ///
    /// The sort is stable.
    /// Instances without a numeric instance number sort as number 0.
    pub fn sort_instances_by_number(&mut self) -> &mut Self {
        self.instances
            .sort_by_key(|instance| instance.instance_number().unwrap_or(0));
        self
    }

    /// The first value of an attribute among the instances of the series,
    /// skipping instances where it is absent or empty.
    pub fn first_value<T: AsTag>(&self, tag: T) -> Option<&Scalar> {
        let tag = tag.as_tag()?;
        self.instances
            .iter()
            .filter_map(|instance| instance.first_value(tag))
            .find(|value| !matches!(value, Scalar::Null))
    }

    /// The first value of an attribute by keyword, as in [`first_value`](Self::first_value).
    pub fn first_value_by_keyword(&self, keyword: &str) -> Option<&Scalar> {
        let tag = self.instances.first()?.resolve_keyword(keyword).ok()?;
        self.first_value(tag)
    }

    pub fn modality(&self) -> Option<&str> {
        self.first_value(tags::MODALITY).and_then(Scalar::as_str)
    }

    /// The series number (0020,0011), if numeric.
    pub fn series_number(&self) -> Option<i64> {
        self.first_value(tags::SERIES_NUMBER).and_then(Scalar::to_int)
    }

    pub fn series_description(&self) -> Option<&str> {
        self.first_value(tags::SERIES_DESCRIPTION)
            .and_then(Scalar::as_str)
    }

    /// Export the first instance of the series.
    ///
    /// An empty series exports an empty map.
    pub fn to_map(&self, keys: KeyMode, filter: &[crate::Tag]) -> JsonMap {
        self.instances
            .first()
            .map(|first| first.to_map(keys, filter))
            .unwrap_or_default()
    }

    /// Export the [series level attributes](SERIES_LEVEL_TAGS)
    /// of the first instance.
    pub fn summary(&self, keys: KeyMode) -> JsonMap {
        self.to_map(keys, SERIES_LEVEL_TAGS)
    }

    /// Export every instance of the series.
    pub fn instances_to_maps(&self, keys: KeyMode) -> Vec<JsonMap> {
        self.instances
            .iter()
            .map(|instance| instance.to_map(keys, &[]))
            .collect()
    }
}

impl<D> Series<D> {
    pub fn series_instance_uid(&self) -> &str {
        &self.series_instance_uid
    }

    pub fn instances(&self) -> &[Instance<D>] {
        &self.instances
    }

    /// Fetch an instance by its position in the series.
    pub fn instance(&self, index: usize) -> Option<&Instance<D>> {
        self.instances.get(index)
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn into_instances(self) -> Vec<Instance<D>> {
        self.instances
    }
}
