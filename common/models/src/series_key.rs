use std::borrow::Cow;

use crate::errors::{ModelError, ModelResult};
use crate::{BucketId, OrgId};

/// Length of the encoded `(org, bucket)` measurement name.
pub const ORG_BUCKET_NAME_LEN: usize = 16;

/// Separator between the series key and the field key inside a composite
/// key.
pub const SERIES_FIELD_SEPARATOR: &[u8] = b"#!~#";

/// Packs both ids into the fixed-length byte tag used as the measurement
/// name of every point in the bucket.
pub fn encode_name(org: OrgId, bucket: BucketId) -> [u8; ORG_BUCKET_NAME_LEN] {
    let mut name = [0u8; ORG_BUCKET_NAME_LEN];
    name[..8].copy_from_slice(&org.to_be_bytes());
    name[8..].copy_from_slice(&bucket.to_be_bytes());
    name
}

/// Inverse of [`encode_name`].
pub fn decode_name(name: &[u8; ORG_BUCKET_NAME_LEN]) -> (OrgId, BucketId) {
    let org = u64::from_be_bytes(name[..8].try_into().unwrap());
    let bucket = u64::from_be_bytes(name[8..].try_into().unwrap());
    (org, bucket)
}

fn is_measurement_escape_char(c: u8) -> bool {
    matches!(c, b',' | b' ')
}

/// Produces the on-wire escaped form of a measurement name, prefixing `,`
/// and ` ` with a backslash. Borrows when no escaping is needed.
pub fn escape_measurement(name: &[u8]) -> Cow<'_, [u8]> {
    if !name.iter().any(|&c| is_measurement_escape_char(c)) {
        return Cow::Borrowed(name);
    }
    let mut out = Vec::with_capacity(name.len() + 2);
    for &c in name {
        if is_measurement_escape_char(c) {
            out.push(b'\\');
        }
        out.push(c);
    }
    Cow::Owned(out)
}

/// Exact inverse of [`escape_measurement`] on valid input.
pub fn unescape_measurement(name: &[u8]) -> Cow<'_, [u8]> {
    if !name.contains(&b'\\') {
        return Cow::Borrowed(name);
    }
    let mut out = Vec::with_capacity(name.len());
    let mut i = 0;
    while i < name.len() {
        if name[i] == b'\\' && i + 1 < name.len() && is_measurement_escape_char(name[i + 1]) {
            i += 1;
        }
        out.push(name[i]);
        i += 1;
    }
    Cow::Owned(out)
}

/// Appends `series_key`, the separator and `field_key` to `buf`, forming
/// the composite key that TSM files and the cache index on.
pub fn append_series_field_key(buf: &mut Vec<u8>, series_key: &[u8], field_key: &[u8]) {
    buf.reserve(series_key.len() + SERIES_FIELD_SEPARATOR.len() + field_key.len());
    buf.extend_from_slice(series_key);
    buf.extend_from_slice(SERIES_FIELD_SEPARATOR);
    buf.extend_from_slice(field_key);
}

/// Splits a composite key on the last separator into its series key and
/// field key.
pub fn series_and_field_from_composite_key(key: &[u8]) -> ModelResult<(&[u8], &[u8])> {
    let sep = key
        .windows(SERIES_FIELD_SEPARATOR.len())
        .rposition(|w| w == SERIES_FIELD_SEPARATOR)
        .ok_or_else(|| ModelError::MalformedKey {
            err: "no series/field separator".to_string(),
        })?;
    Ok((&key[..sep], &key[sep + SERIES_FIELD_SEPARATOR.len()..]))
}
