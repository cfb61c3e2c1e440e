use crate::dictionary::{StandardTagDictionary, TagDictionary};
use crate::model::{DataSet, Element, PersonName, Scalar};
use crate::tags;
use std::ops::{Deref, DerefMut};

/// A single DICOM instance decoded from one DICOM JSON data set.
///
/// All element operations are those of the underlying [`DataSet`],
/// which an instance dereferences to.
#[derive(Debug, Clone)]
pub struct Instance<D = StandardTagDictionary> {
    data: DataSet<D>,
}

impl<D> PartialEq for Instance<D> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Instance<StandardTagDictionary> {
    /// Create a new instance without elements.
    pub fn new() -> Self {
        Instance {
            data: DataSet::new(),
        }
    }
}

impl Default for Instance<StandardTagDictionary> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> Instance<D> {
    /// Create a new instance without elements,
    /// using the given dictionary for keyword lookups.
    pub fn new_with_dict(dict: D) -> Self {
        Instance {
            data: DataSet::new_with_dict(dict),
        }
    }

    /// Construct an instance from an iterator of elements.
    pub fn from_iter_with_dict<I>(iter: I, dict: D) -> Self
    where
        I: IntoIterator<Item = Element<D>>,
    {
        Instance {
            data: DataSet::from_iter_with_dict(iter, dict),
        }
    }

    /// Retrieve the underlying data set.
    pub fn into_inner(self) -> DataSet<D> {
        self.data
    }
}

impl<D> From<DataSet<D>> for Instance<D> {
    fn from(data: DataSet<D>) -> Self {
        Instance { data }
    }
}

impl<D> Deref for Instance<D> {
    type Target = DataSet<D>;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<D> DerefMut for Instance<D> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.data
    }
}

impl<D> Instance<D>
where
    D: TagDictionary,
{
    fn common(&self, name: &str) -> Option<&Scalar> {
        self.value_by_name(name).and_then(|value| value.first())
    }

    fn common_str(&self, name: &str) -> Option<&str> {
        self.common(name).and_then(Scalar::as_str)
    }

    pub fn study_instance_uid(&self) -> Option<&str> {
        self.common_str("StudyInstanceUID")
    }

    pub fn series_instance_uid(&self) -> Option<&str> {
        self.common_str("SeriesInstanceUID")
    }

    pub fn sop_instance_uid(&self) -> Option<&str> {
        self.common_str("SOPInstanceUID")
    }

    pub fn sop_class_uid(&self) -> Option<&str> {
        self.common_str("SOPClassUID")
    }

    pub fn modality(&self) -> Option<&str> {
        self.common_str("Modality")
    }

    pub fn patient_name(&self) -> Option<&PersonName> {
        self.common("PatientName").and_then(Scalar::as_person_name)
    }

    pub fn patient_id(&self) -> Option<&str> {
        self.common_str("PatientID")
    }

    /// The instance number, if present and numeric.
    pub fn instance_number(&self) -> Option<i64> {
        self.first_value(tags::INSTANCE_NUMBER)
            .and_then(Scalar::to_int)
    }
}
