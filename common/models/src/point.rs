use crate::errors::{ModelError, ModelResult};
use crate::field_value::FieldVal;
use crate::tag::{Tag, FIELD_KEY_TAG_KEY, MEASUREMENT_TAG_KEY};
use crate::{BucketId, FieldName, OrgId, Timestamp};

/// One sample addressed to a bucket: `(measurement, tag-set, field)` plus a
/// timestamped value.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub org: OrgId,
    pub bucket: BucketId,
    pub measurement: Vec<u8>,
    /// User tags, excluding the reserved measurement and field-key tags.
    pub tags: Vec<Tag>,
    pub field: FieldName,
    pub timestamp: Timestamp,
    pub value: FieldVal,
}

impl Point {
    pub fn new(
        org: OrgId,
        bucket: BucketId,
        measurement: impl Into<Vec<u8>>,
        tags: Vec<Tag>,
        field: impl Into<Vec<u8>>,
        timestamp: Timestamp,
        value: FieldVal,
    ) -> Self {
        Self {
            org,
            bucket,
            measurement: measurement.into(),
            tags,
            field: field.into(),
            timestamp,
            value,
        }
    }

    pub fn check(&self) -> ModelResult<()> {
        if self.measurement.is_empty() {
            return Err(ModelError::InvalidPoint {
                err: "Measurement cannot be empty".to_string(),
            });
        }
        if self.field.is_empty() {
            return Err(ModelError::InvalidPoint {
                err: "Field key cannot be empty".to_string(),
            });
        }
        for tag in &self.tags {
            tag.check()?;
            if tag.key.as_slice() == MEASUREMENT_TAG_KEY || tag.key.as_slice() == FIELD_KEY_TAG_KEY
            {
                return Err(ModelError::InvalidPoint {
                    err: "Tag key is reserved".to_string(),
                });
            }
        }
        Ok(())
    }
}
