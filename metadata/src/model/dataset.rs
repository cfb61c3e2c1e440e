use crate::dictionary::{StandardTagDictionary, TagDictionary};
use crate::error::{MissingDictionaryDataSnafu, Result, UnknownKeywordSnafu};
use crate::model::{Element, Scalar, Value, ValueRef};
use crate::tag::AsTag;
use crate::tags::common_attribute;
use crate::Tag;
use snafu::OptionExt;
use std::collections::BTreeMap;

/** A collection of decoded data elements, keyed by tag.
 *
 * This is the shared element storage of [instances](crate::Instance)
 * and [sequence items](crate::SequenceItem).
 * Elements are kept in tag order,
 * which is also the order of exports.
 */
#[derive(Debug, Clone)]
pub struct DataSet<D = StandardTagDictionary> {
    /// the element map
    entries: BTreeMap<Tag, Element<D>>,
    /// the tag dictionary
    dict: D,
}

impl<D> PartialEq for DataSet<D> {
    // This implementation ignores the tag dictionary.
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl DataSet<StandardTagDictionary> {
    /// Create a new empty data set.
    pub fn new() -> Self {
        Self::new_with_dict(StandardTagDictionary)
    }

    /// Construct a data set from an iterator of elements.
    pub fn from_element_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Element<StandardTagDictionary>>,
    {
        Self::from_iter_with_dict(iter, StandardTagDictionary)
    }
}

impl Default for DataSet<StandardTagDictionary> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> DataSet<D> {
    /// Create a new empty data set,
    /// using the given dictionary for keyword lookups.
    pub fn new_with_dict(dict: D) -> Self {
        DataSet {
            entries: BTreeMap::new(),
            dict,
        }
    }

    /// Construct a data set from an iterator of elements,
    /// using the given dictionary for keyword lookups.
    pub fn from_iter_with_dict<I>(iter: I, dict: D) -> Self
    where
        I: IntoIterator<Item = Element<D>>,
    {
        let entries = iter.into_iter().map(|e| (e.tag(), e)).collect();
        DataSet { entries, dict }
    }

    /// The tag dictionary of this data set.
    pub fn dict(&self) -> &D {
        &self.dict
    }

    /// Insert a data element, replacing (and returning) any
    /// previous element of the same attribute.
    pub fn put(&mut self, element: Element<D>) -> Option<Element<D>> {
        self.entries.insert(element.tag(), element)
    }

    /// Retrieve a data element by its tag.
    ///
    /// The tag may also be given as text,
    /// in any of the forms accepted by [`Tag::normalize`].
    pub fn element<T: AsTag>(&self, tag: T) -> Option<&Element<D>> {
        tag.as_tag().and_then(|tag| self.entries.get(&tag))
    }

    pub fn has_element<T: AsTag>(&self, tag: T) -> bool {
        self.element(tag).is_some()
    }

    /// Iterate over all elements in tag order.
    pub fn iter(&self) -> std::collections::btree_map::Values<'_, Tag, Element<D>> {
        self.entries.values()
    }

    /// Iterate over the tags of all elements in order.
    pub fn tags(&self) -> impl Iterator<Item = Tag> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<D> DataSet<D>
where
    D: TagDictionary,
{
    /// Whether the attribute's value should be retrieved unwrapped.
    fn is_single_valued(&self, element: &Element<D>) -> bool {
        !element.is_sequence()
            && self
                .dict
                .value_multiplicity(element.tag())
                .map_or(false, |vm| vm == "1")
    }

    /// Retrieve the value of an element by its tag.
    ///
    /// Attributes which the dictionary declares as single valued
    /// are retrieved as a [single](ValueRef::Single) value,
    /// all others as a [list](ValueRef::Multi).
    /// Sequences are always retrieved as [sequences](ValueRef::Sequence).
    pub fn element_value<T: AsTag>(&self, tag: T) -> Option<ValueRef<'_, D>> {
        let element = self.element(tag)?;
        let value = match element.value() {
            Value::Sequence(seq) => ValueRef::Sequence(seq),
            Value::Empty => ValueRef::Empty,
            Value::Primitive(values) => match values.first() {
                None => ValueRef::Empty,
                Some(first) if self.is_single_valued(element) => ValueRef::Single(first),
                Some(_) => ValueRef::Multi(values),
            },
        };
        Some(value)
    }

    /// Retrieve the first primitive value of an element by its tag.
    pub fn first_value<T: AsTag>(&self, tag: T) -> Option<&Scalar> {
        self.element(tag).and_then(Element::first_value)
    }

    /// Retrieve the first value of an element as text.
    pub fn first_str<T: AsTag>(&self, tag: T) -> Option<&str> {
        self.first_value(tag).and_then(Scalar::as_str)
    }

    /// Resolve an attribute keyword (or canonical tag text) to a tag.
    ///
    /// Fails if the dictionary has no data loaded,
    /// or if it does not know the keyword.
    pub fn resolve_keyword(&self, keyword: &str) -> Result<Tag> {
        if Tag::is_canonical(keyword) {
            return Tag::normalize(keyword);
        }
        if self.dict.is_empty() {
            return MissingDictionaryDataSnafu.fail();
        }
        self.dict
            .tag_by_keyword(keyword)
            .context(UnknownKeywordSnafu { keyword })
    }

    /// Retrieve a data element by its keyword, such as `PatientID`.
    pub fn element_by_keyword(&self, keyword: &str) -> Option<&Element<D>> {
        self.resolve_keyword(keyword)
            .ok()
            .and_then(|tag| self.element(tag))
    }

    /// Retrieve the value of an element by its keyword, such as `PatientID`,
    /// or by its tag in canonical text form.
    ///
    /// Unknown keywords yield `None`.
    pub fn value_by_keyword(&self, keyword: &str) -> Option<ValueRef<'_, D>> {
        let tag = self.resolve_keyword(keyword).ok()?;
        self.element_value(tag)
    }

    /// Retrieve the first primitive value of an element by its keyword.
    pub fn first_value_by_keyword(&self, keyword: &str) -> Option<&Scalar> {
        let tag = self.resolve_keyword(keyword).ok()?;
        self.first_value(tag)
    }

    /// Retrieve the value of an element by semantic name.
    ///
    /// The [common attributes](crate::tags::COMMON_ATTRIBUTES)
    /// resolve without the dictionary,
    /// other names are looked up as keywords.
    pub fn value_by_name(&self, name: &str) -> Option<ValueRef<'_, D>> {
        match common_attribute(name) {
            Some(tag) => self.element_value(tag),
            None => self.value_by_keyword(name),
        }
    }
}

impl<'a, D> IntoIterator for &'a DataSet<D> {
    type Item = &'a Element<D>;
    type IntoIter = std::collections::btree_map::Values<'a, Tag, Element<D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

impl<D> Extend<Element<D>> for DataSet<D> {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = Element<D>>,
    {
        self.entries.extend(iter.into_iter().map(|e| (e.tag(), e)))
    }
}
