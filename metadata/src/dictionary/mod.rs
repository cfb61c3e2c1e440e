//! The tag dictionary consulted by the metadata model.
//!
//! The model only needs a narrow, read-only view of a DICOM data dictionary:
//! keyword/tag translation for keyword lookups and keyword-keyed exports,
//! and the value multiplicity of an attribute
//! to decide whether a single value should be returned unwrapped.
//!
//! The default is [`StandardTagDictionary`],
//! which is backed by the standard attribute registry.
//! [`TableDictionary`] holds entries loaded from a JSON resource.
//! Every model type receives its dictionary explicitly,
//! so different parses may use different dictionaries.
use crate::Tag;
use std::borrow::Cow;
use std::fmt::Debug;
use std::sync::Arc;

mod standard;
mod table;

pub use self::standard::StandardTagDictionary;
pub use self::table::{TableDictionary, TableEntry};

/// Everything the dictionary knows about one attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo<'a> {
    /// The attribute keyword, such as `PatientName`
    pub keyword: Cow<'a, str>,
    /// The human readable attribute name, such as `Patient's Name`
    pub name: Cow<'a, str>,
    /// The typical value representation
    pub vr: Cow<'a, str>,
    /// Free text description of the attribute (may be empty)
    pub description: Cow<'a, str>,
    /// The value multiplicity (`1`, `1-n`, `2`, ...), if known
    pub value_multiplicity: Option<Cow<'a, str>>,
}

impl TagInfo<'_> {
    /// Whether the attribute is declared to hold exactly one value.
    pub fn is_single_valued(&self) -> bool {
        self.value_multiplicity.as_deref() == Some("1")
    }
}

/// Type trait for a read-only dictionary of DICOM attributes.
///
/// Implementations must tolerate being entirely empty:
/// every lookup then reports "not found".
/// Dictionaries are shared read-only for the duration of a parse,
/// hence the `Send + Sync` requirement.
pub trait TagDictionary: Debug + Send + Sync {
    /// Fetch the information about an attribute by its tag.
    fn tag_info(&self, tag: Tag) -> Option<TagInfo<'_>>;

    /// Fetch the tag of an attribute by its keyword (e.g. "SOPInstanceUID").
    /// Keywords are case sensitive.
    fn tag_by_keyword(&self, keyword: &str) -> Option<Tag>;

    /// Fetch the keyword of an attribute.
    fn keyword(&self, tag: Tag) -> Option<Cow<'_, str>> {
        self.tag_info(tag).map(|info| info.keyword)
    }

    /// Fetch the human readable name of an attribute.
    fn tag_name(&self, tag: Tag) -> Option<Cow<'_, str>> {
        self.tag_info(tag).map(|info| info.name)
    }

    /// Fetch the declared value multiplicity of an attribute.
    fn value_multiplicity(&self, tag: Tag) -> Option<Cow<'_, str>> {
        self.tag_info(tag).and_then(|info| info.value_multiplicity)
    }

    /// Describe a value representation code.
    fn vr_meaning(&self, vr: &str) -> Option<&'static str> {
        vr_meaning(vr)
    }

    /// Whether this dictionary has no entries loaded.
    fn is_empty(&self) -> bool {
        false
    }
}

impl<T> TagDictionary for &T
where
    T: TagDictionary + ?Sized,
{
    fn tag_info(&self, tag: Tag) -> Option<TagInfo<'_>> {
        (**self).tag_info(tag)
    }

    fn tag_by_keyword(&self, keyword: &str) -> Option<Tag> {
        (**self).tag_by_keyword(keyword)
    }

    fn vr_meaning(&self, vr: &str) -> Option<&'static str> {
        (**self).vr_meaning(vr)
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}

impl<T> TagDictionary for Arc<T>
where
    T: TagDictionary + ?Sized,
{
    fn tag_info(&self, tag: Tag) -> Option<TagInfo<'_>> {
        (**self).tag_info(tag)
    }

    fn tag_by_keyword(&self, keyword: &str) -> Option<Tag> {
        (**self).tag_by_keyword(keyword)
    }

    fn vr_meaning(&self, vr: &str) -> Option<&'static str> {
        (**self).vr_meaning(vr)
    }

    fn is_empty(&self) -> bool {
        (**self).is_empty()
    }
}

/// Describe a value representation code, such as `PN` → `Person Name`.
pub fn vr_meaning(vr: &str) -> Option<&'static str> {
    let meaning = match vr {
        "AE" => "Application Entity",
        "AS" => "Age String",
        "AT" => "Attribute Tag",
        "CS" => "Code String",
        "DA" => "Date",
        "DS" => "Decimal String",
        "DT" => "Date Time",
        "FD" => "Floating Point Double",
        "FL" => "Floating Point Single",
        "IS" => "Integer String",
        "LO" => "Long String",
        "LT" => "Long Text",
        "OB" => "Other Byte",
        "OD" => "Other Double",
        "OF" => "Other Float",
        "OL" => "Other Long",
        "OV" => "Other 64-bit Very Long",
        "OW" => "Other Word",
        "PN" => "Person Name",
        "SH" => "Short String",
        "SL" => "Signed Long",
        "SQ" => "Sequence of Items",
        "SS" => "Signed Short",
        "ST" => "Short Text",
        "SV" => "Signed 64-bit Very Long",
        "TM" => "Time",
        "UC" => "Unlimited Characters",
        "UI" => "Unique Identifier",
        "UL" => "Unsigned Long",
        "UN" => "Unknown",
        "UR" => "URI/URL",
        "US" => "Unsigned Short",
        "UT" => "Unlimited Text",
        "UV" => "Unsigned 64-bit Very Long",
        _ => return None,
    };
    Some(meaning)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vr_meanings() {
        assert_eq!(vr_meaning("PN"), Some("Person Name"));
        assert_eq!(vr_meaning("SQ"), Some("Sequence of Items"));
        assert_eq!(vr_meaning("XX"), None);
        assert_eq!(StandardTagDictionary.vr_meaning("DA"), Some("Date"));
    }

    #[test]
    fn shared_dictionaries_delegate() {
        let dict = Arc::new(TableDictionary::new());
        assert!(dict.is_empty());
        assert!((&dict).tag_by_keyword("PatientName").is_none());
        assert!(!(&StandardTagDictionary).is_empty());
    }
}
