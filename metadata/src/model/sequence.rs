use crate::dictionary::StandardTagDictionary;
use crate::model::DataSet;
use crate::Tag;

/// A nested data set inside a sequence.
///
/// Items are structurally identical to instances,
/// but carry no identity of their own.
pub type SequenceItem<D = StandardTagDictionary> = DataSet<D>;

/// The value of a sequence (SQ) element:
/// an ordered list of items, tagged with the owning attribute.
#[derive(Debug, Clone)]
pub struct Sequence<D = StandardTagDictionary> {
    tag: Tag,
    items: Vec<SequenceItem<D>>,
}

impl<D> Sequence<D> {
    /// Create an empty sequence for the given attribute.
    pub fn new(tag: Tag) -> Self {
        Sequence {
            tag,
            items: Vec::new(),
        }
    }

    pub fn with_items(tag: Tag, items: Vec<SequenceItem<D>>) -> Self {
        Sequence { tag, items }
    }

    /// The tag of the attribute owning this sequence.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn push(&mut self, item: SequenceItem<D>) {
        self.items.push(item);
    }

    pub fn items(&self) -> &[SequenceItem<D>] {
        &self.items
    }

    /// Fetch an item by its position in the sequence.
    pub fn item(&self, index: usize) -> Option<&SequenceItem<D>> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SequenceItem<D>> {
        self.items.iter()
    }
}

impl<D> PartialEq for Sequence<D> {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.items == other.items
    }
}

impl<'a, D> IntoIterator for &'a Sequence<D> {
    type Item = &'a SequenceItem<D>;
    type IntoIter = std::slice::Iter<'a, SequenceItem<D>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
