//! DICOM attribute tags as used by DICOM JSON.
//!
//! DICOM JSON keys every attribute by its tag
//! written as 8 upper case hexadecimal digits (`GGGGEEEE`).
//! This module converts between that canonical form,
//! the usual display forms (`GGGG,EEEE`, `(GGGG,EEEE)`),
//! and the [`Tag`] value type used for lookups.
use crate::error::{InvalidTagSnafu, Result};
use serde::{Serialize, Serializer};
use snafu::OptionExt;
use std::fmt;
use std::str::FromStr;

/// A DICOM attribute tag: a group number and an element number.
///
/// The canonical text form is `GGGGEEEE` in upper case hexadecimal,
/// which is also what [`Display`](fmt::Display) produces.
/// Tags order by group first, then by element.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(pub u16, pub u16);

impl Tag {
    /// The group number of the tag.
    #[inline]
    pub fn group(self) -> u16 {
        self.0
    }

    /// The element number of the tag.
    #[inline]
    pub fn element(self) -> u16 {
        self.1
    }

    /// Parse a tag in any of the accepted text forms.
    ///
    /// All non-hexadecimal characters are stripped first,
    /// so `0010,0010`, `(0010,0010)` and `00100010` are all the same tag.
    /// A 4-digit group alone is padded with a zero element number.
    pub fn normalize(raw: &str) -> Result<Tag> {
        let digits: String = raw.chars().filter(char::is_ascii_hexdigit).collect();
        let digits = if digits.len() == 4 {
            digits + "0000"
        } else {
            digits
        };
        if digits.len() != 8 {
            return InvalidTagSnafu { input: raw }.fail();
        }
        let value = u32::from_str_radix(&digits, 16)
            .ok()
            .context(InvalidTagSnafu { input: raw })?;
        Ok(Tag((value >> 16) as u16, (value & 0xFFFF) as u16))
    }

    /// Format this tag with the given separator style.
    pub fn format(self, style: TagStyle) -> String {
        match style {
            TagStyle::Comma => format!("{:04X},{:04X}", self.0, self.1),
            TagStyle::Paren => format!("({:04X}{:04X})", self.0, self.1),
            TagStyle::Both => format!("({:04X},{:04X})", self.0, self.1),
            TagStyle::Bare => self.to_string(),
        }
    }

    /// Whether the given text is already a canonical `GGGGEEEE` tag
    /// (case-insensitive).
    pub fn is_canonical(text: &str) -> bool {
        text.len() == 8 && text.bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04X}{:04X}", self.0, self.1)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag({:04X},{:04X})", self.0, self.1)
    }
}

impl FromStr for Tag {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        Tag::normalize(s)
    }
}

impl From<(u16, u16)> for Tag {
    fn from((group, element): (u16, u16)) -> Self {
        Tag(group, element)
    }
}

impl From<dicom_core::Tag> for Tag {
    fn from(tag: dicom_core::Tag) -> Self {
        Tag(tag.0, tag.1)
    }
}

impl From<Tag> for dicom_core::Tag {
    fn from(tag: Tag) -> Self {
        dicom_core::Tag(tag.0, tag.1)
    }
}

impl Serialize for Tag {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Display style for [`format`] and [`Tag::format`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagStyle {
    /// `GGGG,EEEE`
    #[default]
    Comma,
    /// `(GGGGEEEE)`
    Paren,
    /// `(GGGG,EEEE)`
    Both,
    /// `GGGGEEEE`
    Bare,
}

impl TagStyle {
    /// Resolve a style by name (`comma`, `paren` or `both`).
    /// Any other name yields [`TagStyle::Bare`].
    pub fn from_name(name: &str) -> TagStyle {
        match name {
            "comma" => TagStyle::Comma,
            "paren" => TagStyle::Paren,
            "both" => TagStyle::Both,
            _ => TagStyle::Bare,
        }
    }
}

/// Normalize tag text to its canonical `GGGGEEEE` form.
pub fn normalize(raw: &str) -> Result<String> {
    Tag::normalize(raw).map(|tag| tag.to_string())
}

/// Normalize tag text and re-format it with the given style.
pub fn format(raw: &str, style: TagStyle) -> Result<String> {
    Tag::normalize(raw).map(|tag| tag.format(style))
}

/// Conversion into a tag for element lookups.
///
/// Lookups accept a [`Tag`], a `(group, element)` pair,
/// or tag text in any form understood by [`Tag::normalize`].
/// Text which is not a valid tag simply matches nothing.
pub trait AsTag {
    /// Retrieve the tag, or `None` if this is not a valid tag.
    fn as_tag(&self) -> Option<Tag>;
}

impl AsTag for Tag {
    fn as_tag(&self) -> Option<Tag> {
        Some(*self)
    }
}

impl AsTag for (u16, u16) {
    fn as_tag(&self) -> Option<Tag> {
        Some(Tag(self.0, self.1))
    }
}

impl AsTag for str {
    fn as_tag(&self) -> Option<Tag> {
        // keywords such as "PatientName" must not be read as hex digits
        let tag_like = self
            .chars()
            .all(|c| c.is_ascii_hexdigit() || matches!(c, ',' | '(' | ')' | ' '));
        if tag_like {
            Tag::normalize(self).ok()
        } else {
            None
        }
    }
}

impl AsTag for String {
    fn as_tag(&self) -> Option<Tag> {
        self.as_str().as_tag()
    }
}

impl<T: AsTag + ?Sized> AsTag for &T {
    fn as_tag(&self) -> Option<Tag> {
        (**self).as_tag()
    }
}
