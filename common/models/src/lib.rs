pub use errors::{ModelError, ModelResult};
pub use field_value::{FieldVal, ValueType};
pub use point::Point;
pub use series_key::{
    append_series_field_key, encode_name, escape_measurement, series_and_field_from_composite_key,
    unescape_measurement, ORG_BUCKET_NAME_LEN, SERIES_FIELD_SEPARATOR,
};
pub use tag::Tag;
pub use tag_set::TagKeysSet;
pub use time_range::TimeRange;

pub mod errors;
pub mod field_value;
pub mod point;
pub mod predicate;
pub mod series_key;
pub mod tag;
pub mod tag_set;
pub mod time_range;

pub type OrgId = u64;
pub type BucketId = u64;
pub type SeriesId = u32;

pub type TagKey = Vec<u8>;
pub type TagValue = Vec<u8>;

pub type FieldName = Vec<u8>;

pub type Timestamp = i64;
