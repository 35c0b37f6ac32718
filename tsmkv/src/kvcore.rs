use std::sync::Arc;

use models::series_key::{append_series_field_key, encode_name, escape_measurement};
use models::tag::{self, Tag, FIELD_KEY_TAG_KEY, MEASUREMENT_TAG_KEY};
use models::Point;
use tracing::debug;

use crate::error::{Error, Result};
use crate::index::InvertedIndex;
use crate::kv_option::Options;
use crate::mem_cache::MemCache;
use crate::points_writer::PointsWriter;
use crate::tsm::FileStore;

/// The storage engine core: the live TSM file set, the write cache and the
/// series index, behind one handle.
///
/// Flushing the cache into new TSM files and reloading files from disk are
/// the embedding layer's jobs; the core reads whatever both sides currently
/// hold.
pub struct TsmStore {
    options: Arc<Options>,
    file_store: Arc<FileStore>,
    cache: Arc<MemCache>,
    index: Arc<InvertedIndex>,
}

impl TsmStore {
    pub fn open(options: Options) -> Self {
        Self {
            options: Arc::new(options),
            file_store: Arc::new(FileStore::new()),
            cache: Arc::new(MemCache::new()),
            index: Arc::new(InvertedIndex::new()),
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn file_store(&self) -> &Arc<FileStore> {
        &self.file_store
    }

    pub fn cache(&self) -> &Arc<MemCache> {
        &self.cache
    }

    pub fn index(&self) -> &Arc<InvertedIndex> {
        &self.index
    }
}

impl PointsWriter for TsmStore {
    /// Registers each point's series in the index and appends the sample to
    /// the cache under its composite key.
    fn write_points(&self, points: &[Point]) -> Result<()> {
        let mut tags: Vec<Tag> = Vec::new();
        let mut series_key: Vec<u8> = Vec::new();
        let mut sfkey: Vec<u8> = Vec::new();

        for point in points {
            point
                .check()
                .map_err(|source| Error::InvalidPoint { source })?;

            let org_bucket = encode_name(point.org, point.bucket);
            let org_bucket_esc = escape_measurement(&org_bucket);

            tags.clear();
            tags.push(Tag::new(
                MEASUREMENT_TAG_KEY.to_vec(),
                point.measurement.clone(),
            ));
            tags.extend(point.tags.iter().cloned());
            tags.push(Tag::new(FIELD_KEY_TAG_KEY.to_vec(), point.field.clone()));
            tag::sort_tags(&mut tags);

            series_key.clear();
            series_key.extend_from_slice(&org_bucket_esc);
            tag::append_hash_key(&mut series_key, &tags);

            sfkey.clear();
            append_series_field_key(&mut sfkey, &series_key, &point.field);

            self.index.add_series(&org_bucket_esc, &series_key, &tags);
            self.cache.write(&sfkey, point.timestamp, point.value.clone());
        }
        debug!(points = points.len(), "wrote points");
        Ok(())
    }
}
