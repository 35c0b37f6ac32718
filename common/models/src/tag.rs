use serde::{Deserialize, Serialize};

use crate::errors::{ModelError, ModelResult};
use crate::{TagKey, TagValue};

/// Reserved tag key holding the measurement name. Its single-byte encoding
/// sorts before every user tag key.
pub const MEASUREMENT_TAG_KEY: &[u8] = b"\x00";

/// Reserved tag key holding the field key. Its single-byte encoding sorts
/// after every user tag key.
pub const FIELD_KEY_TAG_KEY: &[u8] = b"\xff";

const TAG_KEY_MAX_LEN: usize = 512;
const TAG_VALUE_MAX_LEN: usize = 4096;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone)]
pub struct Tag {
    pub key: TagKey,
    pub value: TagValue,
}

impl Tag {
    pub fn new(key: TagKey, value: TagValue) -> Self {
        Self { key, value }
    }

    pub fn from_parts(key: &str, value: &str) -> Self {
        Self {
            key: key.as_bytes().to_vec(),
            value: value.as_bytes().to_vec(),
        }
    }

    pub fn check(&self) -> ModelResult<()> {
        if self.key.is_empty() {
            return Err(ModelError::InvalidTag {
                err: "Tag key cannot be empty".to_string(),
            });
        }
        if self.key.len() > TAG_KEY_MAX_LEN {
            return Err(ModelError::InvalidTag {
                err: format!("Tag key exceeds the TAG_KEY_MAX_LEN({})", TAG_KEY_MAX_LEN),
            });
        }
        if self.value.len() > TAG_VALUE_MAX_LEN {
            return Err(ModelError::InvalidTag {
                err: format!(
                    "Tag value exceeds the TAG_VALUE_MAX_LEN({})",
                    TAG_VALUE_MAX_LEN
                ),
            });
        }
        Ok(())
    }
}

pub fn sort_tags(tags: &mut [Tag]) {
    tags.sort_by(|a, b| a.key.cmp(&b.key));
}

/// Returns the value of `key` in `tags`, or `None` if absent.
pub fn tag_value<'a>(tags: &'a [Tag], key: &[u8]) -> Option<&'a [u8]> {
    tags.iter()
        .find(|t| t.key.as_slice() == key)
        .map(|t| t.value.as_slice())
}

fn is_tag_escape_char(c: u8) -> bool {
    matches!(c, b',' | b'=' | b' ')
}

/// Appends `raw` to `buf`, prefixing `,`, `=` and ` ` with a backslash.
pub fn escape_tag_into(buf: &mut Vec<u8>, raw: &[u8]) {
    for &c in raw {
        if is_tag_escape_char(c) {
            buf.push(b'\\');
        }
        buf.push(c);
    }
}

/// Exact inverse of [`escape_tag_into`] on valid input.
pub fn unescape_tag(raw: &[u8]) -> Vec<u8> {
    if !raw.contains(&b'\\') {
        return raw.to_vec();
    }
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        if raw[i] == b'\\' && i + 1 < raw.len() && is_tag_escape_char(raw[i + 1]) {
            i += 1;
        }
        out.push(raw[i]);
        i += 1;
    }
    out
}

/// Appends the canonical `,k=v` suffix of a tag-key-sorted tag list.
///
/// Round trip: [`parse_tags_with_tags`] on the produced key yields the same
/// tags in the same order.
pub fn append_hash_key(buf: &mut Vec<u8>, tags: &[Tag]) {
    for t in tags {
        buf.push(b',');
        escape_tag_into(buf, &t.key);
        buf.push(b'=');
        escape_tag_into(buf, &t.value);
    }
}

/// Parses the tag list of a canonical series key, reusing the capacity of
/// `scratch`. The measurement section (everything before the first
/// unescaped comma) is skipped; pairs with no `=` or an empty key are
/// dropped.
pub fn parse_tags_with_tags(series_key: &[u8], mut scratch: Vec<Tag>) -> Vec<Tag> {
    scratch.clear();
    let mut pos = scan_to_unescaped(series_key, 0, b',');
    while pos < series_key.len() {
        pos += 1;
        let key_end = scan_to_unescaped(series_key, pos, b'=');
        if key_end >= series_key.len() {
            break;
        }
        let val_end = scan_to_unescaped(series_key, key_end + 1, b',');
        let key = unescape_tag(&series_key[pos..key_end]);
        if !key.is_empty() {
            let value = unescape_tag(&series_key[key_end + 1..val_end]);
            scratch.push(Tag { key, value });
        }
        pos = val_end;
    }
    scratch
}

fn scan_to_unescaped(buf: &[u8], mut i: usize, stop: u8) -> usize {
    while i < buf.len() {
        match buf[i] {
            b'\\' if i + 1 < buf.len() => i += 2,
            c if c == stop => break,
            _ => i += 1,
        }
    }
    i.min(buf.len())
}
