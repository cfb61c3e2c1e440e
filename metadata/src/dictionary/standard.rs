use super::{TagDictionary, TagInfo};
use crate::tags::KNOWN_ATTRIBUTES;
use crate::Tag;
use dicom_core::dictionary::{DataDictionary, DataDictionaryEntry};
use dicom_core::VR;
use dicom_dictionary_std::StandardDataDictionary;
use std::borrow::Cow;
use std::fmt;

/// A tag dictionary which consults
/// the global DICOM standard attribute registry.
///
/// Keywords and value representations come from the registry.
/// The registry does not record value multiplicity,
/// so multiplicity is known for the attributes declared in
/// [`tags`](crate::tags)
/// and for attributes whose value representation
/// only admits a single value (sequences, long texts and binary data).
/// Any other attribute is reported without a multiplicity.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StandardTagDictionary;

impl StandardTagDictionary {
    fn known(tag: Tag) -> Option<&'static (Tag, &'static str, &'static str, &'static str)> {
        KNOWN_ATTRIBUTES.iter().find(|(t, ..)| *t == tag)
    }
}

/// Value representations which never hold more than one value.
fn is_single_valued_vr(vr: VR) -> bool {
    matches!(
        vr,
        VR::SQ
            | VR::LT
            | VR::ST
            | VR::UT
            | VR::UR
            | VR::OB
            | VR::OD
            | VR::OF
            | VR::OL
            | VR::OV
            | VR::OW
            | VR::UN
    )
}

impl TagDictionary for StandardTagDictionary {
    fn tag_info(&self, tag: Tag) -> Option<TagInfo<'_>> {
        if let Some(entry) = StandardDataDictionary.by_tag(tag.into()) {
            let vr = entry.vr();
            let known_vm = Self::known(tag).map(|(.., vm)| Cow::Borrowed(*vm));
            let value_multiplicity = match (known_vm, vr) {
                (Some(vm), _) => Some(vm),
                (None, vr) if is_single_valued_vr(vr) => Some(Cow::Borrowed("1")),
                (None, _) => None,
            };
            return Some(TagInfo {
                keyword: Cow::Borrowed(entry.alias),
                name: Cow::Borrowed(entry.alias),
                vr: Cow::Borrowed(vr.to_string()),
                description: Cow::Borrowed(""),
                value_multiplicity,
            });
        }

        Self::known(tag).map(|(_, keyword, vr, vm)| TagInfo {
            keyword: Cow::Borrowed(*keyword),
            name: Cow::Borrowed(*keyword),
            vr: Cow::Borrowed(*vr),
            description: Cow::Borrowed(""),
            value_multiplicity: Some(Cow::Borrowed(*vm)),
        })
    }

    fn tag_by_keyword(&self, keyword: &str) -> Option<Tag> {
        StandardDataDictionary
            .by_name(keyword)
            .map(|entry| Tag::from(entry.tag()))
            .or_else(|| {
                KNOWN_ATTRIBUTES
                    .iter()
                    .find(|(_, k, ..)| *k == keyword)
                    .map(|(tag, ..)| *tag)
            })
    }
}

impl fmt::Display for StandardTagDictionary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("Standard DICOM Data Dictionary")
    }
}
