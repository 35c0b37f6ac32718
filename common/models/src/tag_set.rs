use crate::tag::Tag;
use crate::TagKey;

/// Ordered set of tag-key byte-strings accumulated while enumerating series.
///
/// `is_superset_keys` is the fast early-out used by scans: repeated tag sets
/// cost a two-pointer merge and no insertion work.
#[derive(Debug, Default)]
pub struct TagKeysSet {
    keys: Vec<TagKey>,
}

impl TagKeysSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    /// True iff every key of `tags` is already present. `tags` must be
    /// tag-key-sorted.
    pub fn is_superset_keys(&self, tags: &[Tag]) -> bool {
        let mut i = 0;
        for tag in tags {
            loop {
                if i == self.keys.len() {
                    return false;
                }
                match self.keys[i].as_slice().cmp(tag.key.as_slice()) {
                    std::cmp::Ordering::Less => i += 1,
                    std::cmp::Ordering::Equal => break,
                    std::cmp::Ordering::Greater => return false,
                }
            }
        }
        true
    }

    /// Adds every key of `tags` to the set.
    pub fn union_keys(&mut self, tags: &[Tag]) {
        for tag in tags {
            if let Err(pos) = self.keys.binary_search(&tag.key) {
                self.keys.insert(pos, tag.key.clone());
            }
        }
    }

    /// Keys in lexicographic order.
    pub fn keys(&self) -> &[TagKey] {
        &self.keys
    }
}
