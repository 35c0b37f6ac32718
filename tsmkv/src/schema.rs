//! Schema enumeration over the hybrid column store: distinct tag keys and
//! tag values observed on series with data in a time range, merged from the
//! immutable TSM files and the write cache.

use std::collections::BTreeSet;
use std::sync::Arc;

use models::predicate::{walk, Expr, Operator};
use models::series_key::{
    append_series_field_key, encode_name, escape_measurement, series_and_field_from_composite_key,
};
use models::tag::{self, Tag, FIELD_KEY_TAG_KEY, MEASUREMENT_TAG_KEY};
use models::{BucketId, OrgId, TagKeysSet, TimeRange};
use tracing::debug;

use crate::context::CancellationToken;
use crate::error::{Error, Result};
use crate::index::SeriesIndex;
use crate::kvcore::TsmStore;
use crate::reader::{CursorStats, StringIterator, TimestampArray};
use crate::tsm::{TimeRangeIterator, TsmFile};

/// Period, in loop iterations, at which schema scans poll the cancellation
/// token. Polling more often than this causes measurable overhead in tight
/// loops.
pub const CANCEL_CHECK_INTERVAL: usize = 5000;

/// Rejects predicates the schema scans cannot evaluate: operators outside
/// `{=, !=, =~, !~, AND, OR}`, non-tag-reference LHS, non-literal RHS.
pub fn validate_tag_predicate(expr: &Expr) -> Result<()> {
    let mut err: Option<Error> = None;
    walk(expr, &mut |node| {
        if err.is_some() {
            return;
        }
        if let Expr::Binary(b) = node {
            match b.op {
                Operator::Eq
                | Operator::EqRegex
                | Operator::NotEqRegex
                | Operator::NotEq
                | Operator::Or
                | Operator::And => {}
                _ => {
                    err = Some(Error::InvalidPredicate {
                        reason: "unexpected tag comparison operator".to_string(),
                    });
                    return;
                }
            }
            err = validate_operands(b.lhs.as_ref(), b.rhs.as_ref());
        }
    });
    match err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Stricter validator for measurement-name predicates: additionally rejects
/// `!=` and `!~`, which the measurement scan does not implement.
pub fn validate_measurement_names_tag_predicate(expr: &Expr) -> Result<()> {
    let mut err: Option<Error> = None;
    walk(expr, &mut |node| {
        if err.is_some() {
            return;
        }
        if let Expr::Binary(b) = node {
            match b.op {
                Operator::Eq | Operator::EqRegex | Operator::Or | Operator::And => {}
                Operator::NotEq | Operator::NotEqRegex => {
                    err = Some(Error::Unimplemented {
                        msg: "!= and !~ predicates on measurement names".to_string(),
                    });
                    return;
                }
                _ => {
                    err = Some(Error::InvalidPredicate {
                        reason: "unexpected tag comparison operator".to_string(),
                    });
                    return;
                }
            }
            err = validate_operands(b.lhs.as_ref(), b.rhs.as_ref());
        }
    });
    match err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn validate_operands(lhs: &Expr, rhs: &Expr) -> Option<Error> {
    match lhs {
        Expr::VarRef(..) | Expr::Binary(..) | Expr::Paren(..) => {}
        other => {
            return Some(Error::InvalidPredicate {
                reason: format!(
                    "binary expression: LHS must be a tag key reference, got: {}",
                    other
                ),
            });
        }
    }
    match rhs {
        Expr::StringLiteral(..) | Expr::RegexLiteral(..) | Expr::Binary(..) | Expr::Paren(..) => {}
        other => {
            return Some(Error::InvalidPredicate {
                reason: format!(
                    "binary expression: RHS must be a string or regex, got: {}",
                    other
                ),
            });
        }
    }
    None
}

fn tsm_key_prefix(org_bucket_esc: &[u8], measurement: Option<&[u8]>) -> Vec<u8> {
    let mut prefix = org_bucket_esc.to_vec();
    if let Some(m) = measurement {
        let mt = [Tag::new(MEASUREMENT_TAG_KEY.to_vec(), m.to_vec())];
        tag::append_hash_key(&mut prefix, &mt);
        prefix.push(b',');
    }
    prefix
}

fn stats_from_iters(mut stats: CursorStats, iters: &[Box<dyn TimeRangeIterator>]) -> CursorStats {
    for iter in iters {
        stats.add(iter.stats());
    }
    stats
}

fn values_iterator(values: BTreeSet<Vec<u8>>, stats: CursorStats) -> StringIterator {
    let values = values
        .into_iter()
        .map(|v| String::from_utf8_lossy(&v).into_owned())
        .collect();
    StringIterator::with_stats(values, stats)
}

fn keyset_iterator(keyset: &TagKeysSet, stats: CursorStats) -> StringIterator {
    // The reserved measurement and field-key tags are bookkeeping, not user
    // schema; they are not surfaced.
    let keys = keyset
        .keys()
        .iter()
        .filter(|k| {
            k.as_slice() != MEASUREMENT_TAG_KEY && k.as_slice() != FIELD_KEY_TAG_KEY
        })
        .map(|k| String::from_utf8_lossy(k).into_owned())
        .collect();
    StringIterator::with_stats(keys, stats)
}

impl TsmStore {
    /// Enumerates the distinct values of `tag_key` observed on any series of
    /// the bucket with at least one point in `range`.
    ///
    /// The result iterator always carries the values collected so far plus
    /// cumulative scan stats; on cancellation or a mid-scan failure the
    /// second slot carries the error and the values are partial.
    pub fn tag_values(
        &self,
        ctx: &CancellationToken,
        org: OrgId,
        bucket: BucketId,
        tag_key: &[u8],
        range: TimeRange,
        predicate: Option<&Expr>,
    ) -> (StringIterator, Option<Error>) {
        match predicate {
            None => self.tag_values_no_predicate(ctx, org, bucket, None, tag_key, range),
            Some(p) => self.tag_values_predicate(ctx, org, bucket, None, tag_key, range, p),
        }
    }

    /// Enumerates the distinct tag keys observed on any series of the bucket
    /// with at least one point in `range`. Partial-result semantics match
    /// [`TsmStore::tag_values`].
    pub fn tag_keys(
        &self,
        ctx: &CancellationToken,
        org: OrgId,
        bucket: BucketId,
        range: TimeRange,
        predicate: Option<&Expr>,
    ) -> (StringIterator, Option<Error>) {
        match predicate {
            None => self.tag_keys_no_predicate(ctx, org, bucket, None, range),
            Some(p) => self.tag_keys_predicate(ctx, org, bucket, None, range, p),
        }
    }

    fn tag_values_no_predicate(
        &self,
        ctx: &CancellationToken,
        org: OrgId,
        bucket: BucketId,
        measurement: Option<&[u8]>,
        tag_key: &[u8],
        range: TimeRange,
    ) -> (StringIterator, Option<Error>) {
        let org_bucket = encode_name(org, bucket);
        let org_bucket_esc = escape_measurement(&org_bucket);
        let prefix = tsm_key_prefix(&org_bucket_esc, measurement);

        let mut tsm_values: BTreeSet<Vec<u8>> = BTreeSet::new();
        let mut tags: Vec<Tag> = Vec::new();
        let mut stats = CursorStats::default();
        let mut canceled = false;
        let mut scan_err: Option<Error> = None;

        self.file_store().for_each_file(|f| {
            if ctx.is_cancelled() {
                canceled = true;
                return false;
            }
            if !f.overlaps_time_range(&range) || !f.overlaps_key_prefix_range(&prefix, &prefix) {
                return true;
            }
            let mut iter = f.time_range_iterator(&prefix, range);
            while iter.next() {
                let sfkey = iter.key();
                if !sfkey.starts_with(&prefix) {
                    // end of prefix
                    break;
                }

                let key = match series_and_field_from_composite_key(sfkey) {
                    Ok((key, _)) => key,
                    Err(source) => {
                        scan_err = Some(Error::MalformedKey { source });
                        stats.add(iter.stats());
                        return false;
                    }
                };
                tags = tag::parse_tags_with_tags(key, std::mem::take(&mut tags));
                let Some(cur_val) = tag::tag_value(&tags, tag_key) else {
                    continue;
                };
                if cur_val.is_empty() || tsm_values.contains(cur_val) {
                    continue;
                }

                if iter.has_data() {
                    tsm_values.insert(cur_val.to_vec());
                }
            }
            if let Some(e) = iter.err() {
                scan_err = Some(Error::ReadTsm {
                    reason: e.to_string(),
                });
                stats.add(iter.stats());
                return false;
            }
            stats.add(iter.stats());
            true
        });

        if canceled {
            debug!("tag values scan cancelled during file walk");
            return (values_iterator(tsm_values, stats), Some(Error::Cancelled));
        }
        if let Some(e) = scan_err {
            return (values_iterator(tsm_values, stats), Some(e));
        }

        // With performance in mind, the cancellation token is deliberately
        // not polled while scanning the cache.
        let mut ts = TimestampArray::default();
        let cache_res = self.cache().apply_entry_fn(|sfkey, entry| {
            if !sfkey.starts_with(&prefix) {
                return Ok(());
            }

            let (key, _) = series_and_field_from_composite_key(sfkey)
                .map_err(|source| Error::MalformedKey { source })?;
            tags = tag::parse_tags_with_tags(key, std::mem::take(&mut tags));
            let Some(cur_val) = tag::tag_value(&tags, tag_key) else {
                return Ok(());
            };
            if cur_val.is_empty() || tsm_values.contains(cur_val) {
                return Ok(());
            }

            ts.clear();
            entry.append_timestamps(&mut ts.timestamps);
            if !ts.is_empty() {
                ts.sort();

                stats.scanned_values += ts.len();
                stats.scanned_bytes += ts.len() * 8;

                if ts.contains(range.min_ts, range.max_ts) {
                    tsm_values.insert(cur_val.to_vec());
                }
            }
            Ok(())
        });

        (values_iterator(tsm_values, stats), cache_res.err())
    }

    fn tag_values_predicate(
        &self,
        ctx: &CancellationToken,
        org: OrgId,
        bucket: BucketId,
        measurement: Option<&[u8]>,
        tag_key: &[u8],
        range: TimeRange,
        predicate: &Expr,
    ) -> (StringIterator, Option<Error>) {
        if let Err(e) = validate_tag_predicate(predicate) {
            return (StringIterator::empty(), Some(e));
        }

        let org_bucket = encode_name(org, bucket);

        let keys = match self.find_candidate_keys(ctx, &org_bucket, predicate) {
            Ok(keys) => keys,
            Err(e) => return (StringIterator::empty(), Some(e)),
        };
        if keys.is_empty() {
            return (StringIterator::empty(), None);
        }

        let org_bucket_esc = escape_measurement(&org_bucket);
        let prefix = tsm_key_prefix(&org_bucket_esc, measurement);

        let (_pinned, mut iters, canceled) = self.pin_overlapping_files(ctx, &prefix, range);

        let mut stats = CursorStats::default();
        if canceled {
            stats = stats_from_iters(stats, &iters);
            return (
                StringIterator::with_stats(Vec::new(), stats),
                Some(Error::Cancelled),
            );
        }

        let mut tsm_values: BTreeSet<Vec<u8>> = BTreeSet::new();

        // reusable scratch, owned by this scan
        let mut tags: Vec<Tag> = Vec::new();
        let mut keybuf: Vec<u8> = Vec::new();
        let mut sfkey: Vec<u8> = Vec::new();
        let mut ts = TimestampArray::default();

        for (i, key) in keys.iter().enumerate() {
            if i % CANCEL_CHECK_INTERVAL == 0 && ctx.is_cancelled() {
                let stats = stats_from_iters(stats, &iters);
                debug!(visited = i, "tag values scan cancelled");
                return (values_iterator(tsm_values, stats), Some(Error::Cancelled));
            }

            tags = tag::parse_tags_with_tags(key, std::mem::take(&mut tags));
            let Some(cur_val) = tag::tag_value(&tags, tag_key) else {
                continue;
            };
            if cur_val.is_empty() || tsm_values.contains(cur_val) {
                continue;
            }

            // org_bucket_esc is already escaped, so the composite key is
            // assembled from the raw parts instead of re-escaping the name.
            keybuf.clear();
            keybuf.extend_from_slice(&org_bucket_esc);
            tag::append_hash_key(&mut keybuf, &tags);
            sfkey.clear();
            append_series_field_key(
                &mut sfkey,
                &keybuf,
                tag::tag_value(&tags, FIELD_KEY_TAG_KEY).unwrap_or_default(),
            );

            ts.clear();
            self.cache().append_timestamps(&sfkey, &mut ts.timestamps);
            if !ts.is_empty() {
                ts.sort();

                stats.scanned_values += ts.len();
                stats.scanned_bytes += ts.len() * 8;

                if ts.contains(range.min_ts, range.max_ts) {
                    tsm_values.insert(cur_val.to_vec());
                }
                continue;
            }

            for iter in iters.iter_mut() {
                if !iter.seek(&sfkey).exact {
                    continue;
                }
                if iter.has_data() {
                    tsm_values.insert(cur_val.to_vec());
                    break;
                }
            }
        }

        let stats = stats_from_iters(stats, &iters);
        (values_iterator(tsm_values, stats), None)
    }

    fn tag_keys_no_predicate(
        &self,
        ctx: &CancellationToken,
        org: OrgId,
        bucket: BucketId,
        measurement: Option<&[u8]>,
        range: TimeRange,
    ) -> (StringIterator, Option<Error>) {
        let org_bucket = encode_name(org, bucket);
        let org_bucket_esc = escape_measurement(&org_bucket);
        let prefix = tsm_key_prefix(&org_bucket_esc, measurement);

        let mut keyset = TagKeysSet::new();
        let mut tags: Vec<Tag> = Vec::new();
        let mut stats = CursorStats::default();
        let mut canceled = false;
        let mut scan_err: Option<Error> = None;

        self.file_store().for_each_file(|f| {
            if ctx.is_cancelled() {
                canceled = true;
                return false;
            }
            if !f.overlaps_time_range(&range) || !f.overlaps_key_prefix_range(&prefix, &prefix) {
                return true;
            }
            let mut iter = f.time_range_iterator(&prefix, range);
            while iter.next() {
                let sfkey = iter.key();
                if !sfkey.starts_with(&prefix) {
                    // end of prefix
                    break;
                }

                let key = match series_and_field_from_composite_key(sfkey) {
                    Ok((key, _)) => key,
                    Err(source) => {
                        scan_err = Some(Error::MalformedKey { source });
                        stats.add(iter.stats());
                        return false;
                    }
                };
                tags = tag::parse_tags_with_tags(key, std::mem::take(&mut tags));
                if keyset.is_superset_keys(&tags) {
                    continue;
                }

                if iter.has_data() {
                    keyset.union_keys(&tags);
                }
            }
            if let Some(e) = iter.err() {
                scan_err = Some(Error::ReadTsm {
                    reason: e.to_string(),
                });
                stats.add(iter.stats());
                return false;
            }
            stats.add(iter.stats());
            true
        });

        if canceled {
            debug!("tag keys scan cancelled during file walk");
            return (keyset_iterator(&keyset, stats), Some(Error::Cancelled));
        }
        if let Some(e) = scan_err {
            return (keyset_iterator(&keyset, stats), Some(e));
        }

        // With performance in mind, the cancellation token is deliberately
        // not polled while scanning the cache.
        let mut ts = TimestampArray::default();
        let cache_res = self.cache().apply_entry_fn(|sfkey, entry| {
            if !sfkey.starts_with(&prefix) {
                return Ok(());
            }

            let (key, _) = series_and_field_from_composite_key(sfkey)
                .map_err(|source| Error::MalformedKey { source })?;
            tags = tag::parse_tags_with_tags(key, std::mem::take(&mut tags));
            if keyset.is_superset_keys(&tags) {
                return Ok(());
            }

            ts.clear();
            entry.append_timestamps(&mut ts.timestamps);
            if !ts.is_empty() {
                ts.sort();

                stats.scanned_values += ts.len();
                stats.scanned_bytes += ts.len() * 8;

                if ts.contains(range.min_ts, range.max_ts) {
                    keyset.union_keys(&tags);
                }
            }
            Ok(())
        });

        (keyset_iterator(&keyset, stats), cache_res.err())
    }

    fn tag_keys_predicate(
        &self,
        ctx: &CancellationToken,
        org: OrgId,
        bucket: BucketId,
        measurement: Option<&[u8]>,
        range: TimeRange,
        predicate: &Expr,
    ) -> (StringIterator, Option<Error>) {
        if let Err(e) = validate_tag_predicate(predicate) {
            return (StringIterator::empty(), Some(e));
        }

        let org_bucket = encode_name(org, bucket);

        let keys = match self.find_candidate_keys(ctx, &org_bucket, predicate) {
            Ok(keys) => keys,
            Err(e) => return (StringIterator::empty(), Some(e)),
        };
        if keys.is_empty() {
            return (StringIterator::empty(), None);
        }

        let org_bucket_esc = escape_measurement(&org_bucket);
        let prefix = tsm_key_prefix(&org_bucket_esc, measurement);

        let (_pinned, mut iters, canceled) = self.pin_overlapping_files(ctx, &prefix, range);

        let mut stats = CursorStats::default();
        if canceled {
            stats = stats_from_iters(stats, &iters);
            return (
                StringIterator::with_stats(Vec::new(), stats),
                Some(Error::Cancelled),
            );
        }

        let mut keyset = TagKeysSet::new();

        // reusable scratch, owned by this scan
        let mut tags: Vec<Tag> = Vec::new();
        let mut keybuf: Vec<u8> = Vec::new();
        let mut sfkey: Vec<u8> = Vec::new();
        let mut ts = TimestampArray::default();

        for (i, key) in keys.iter().enumerate() {
            if i % CANCEL_CHECK_INTERVAL == 0 && ctx.is_cancelled() {
                let stats = stats_from_iters(stats, &iters);
                debug!(visited = i, "tag keys scan cancelled");
                return (keyset_iterator(&keyset, stats), Some(Error::Cancelled));
            }

            tags = tag::parse_tags_with_tags(key, std::mem::take(&mut tags));
            if keyset.is_superset_keys(&tags) {
                continue;
            }

            // org_bucket_esc is already escaped, so the composite key is
            // assembled from the raw parts instead of re-escaping the name.
            keybuf.clear();
            keybuf.extend_from_slice(&org_bucket_esc);
            tag::append_hash_key(&mut keybuf, &tags);
            sfkey.clear();
            append_series_field_key(
                &mut sfkey,
                &keybuf,
                tag::tag_value(&tags, FIELD_KEY_TAG_KEY).unwrap_or_default(),
            );

            ts.clear();
            self.cache().append_timestamps(&sfkey, &mut ts.timestamps);
            if !ts.is_empty() {
                ts.sort();

                stats.scanned_values += ts.len();
                stats.scanned_bytes += ts.len() * 8;

                if ts.contains(range.min_ts, range.max_ts) {
                    keyset.union_keys(&tags);
                    continue;
                }
            }

            for iter in iters.iter_mut() {
                if !iter.seek(&sfkey).exact {
                    continue;
                }
                if iter.has_data() {
                    keyset.union_keys(&tags);
                    break;
                }
            }
        }

        let stats = stats_from_iters(stats, &iters);
        (keyset_iterator(&keyset, stats), None)
    }

    /// Pins every file overlapping the prefix and time range and opens one
    /// iterator per pin. The pins keep the files alive for as long as the
    /// returned iterators; dropping the vector releases them on every exit
    /// path.
    fn pin_overlapping_files(
        &self,
        ctx: &CancellationToken,
        prefix: &[u8],
        range: TimeRange,
    ) -> (
        Vec<Arc<dyn TsmFile>>,
        Vec<Box<dyn TimeRangeIterator>>,
        bool,
    ) {
        let mut pinned: Vec<Arc<dyn TsmFile>> = Vec::new();
        let mut iters: Vec<Box<dyn TimeRangeIterator>> = Vec::new();
        let mut canceled = false;
        self.file_store().for_each_file(|f| {
            if ctx.is_cancelled() {
                canceled = true;
                return false;
            }
            if f.overlaps_time_range(&range) && f.overlaps_key_prefix_range(prefix, prefix) {
                pinned.push(Arc::clone(f));
                iters.push(f.time_range_iterator(prefix, range));
            }
            true
        });
        (pinned, iters, canceled)
    }

    /// Resolves the candidate series keys matching `predicate`. Unlike the
    /// scans above, failures here carry no partial results.
    fn find_candidate_keys(
        &self,
        ctx: &CancellationToken,
        org_bucket: &[u8],
        predicate: &Expr,
    ) -> Result<Vec<Vec<u8>>> {
        let org_bucket_esc = escape_measurement(org_bucket);
        let Some(mut sitr) = self
            .index()
            .measurement_series_by_expr_iterator(&org_bucket_esc, predicate)?
        else {
            return Ok(Vec::new());
        };

        let mut keys = Vec::new();
        let mut i = 0usize;
        loop {
            if i % CANCEL_CHECK_INTERVAL == 0 && ctx.is_cancelled() {
                return Err(Error::Cancelled);
            }
            let Some(id) = sitr.next()? else {
                break;
            };
            if let Some(key) = self.index().series_key(id) {
                if !key.is_empty() {
                    keys.push(key);
                }
            }
            i += 1;
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_validate_tag_predicate() {
        validate_tag_predicate(&Expr::tag_eq("host", "h1")).unwrap();
        validate_tag_predicate(&Expr::tag_not_eq("host", "h1")).unwrap();
        validate_tag_predicate(&Expr::tag_regex("host", ".*")).unwrap();
        validate_tag_predicate(&Expr::and(
            Expr::paren(Expr::tag_eq("a", "b")),
            Expr::tag_not_regex("c", "d.*"),
        ))
        .unwrap();

        let err = validate_tag_predicate(&Expr::binary(
            Operator::Gt,
            Expr::VarRef("host".to_string()),
            Expr::StringLiteral("h1".to_string()),
        ))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidPredicate { .. }));

        let err = validate_tag_predicate(&Expr::binary(
            Operator::Eq,
            Expr::StringLiteral("host".to_string()),
            Expr::StringLiteral("h1".to_string()),
        ))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidPredicate { .. }));

        let err = validate_tag_predicate(&Expr::binary(
            Operator::Eq,
            Expr::VarRef("host".to_string()),
            Expr::VarRef("other".to_string()),
        ))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidPredicate { .. }));
    }

    #[test]
    fn test_validate_measurement_names_tag_predicate() {
        validate_measurement_names_tag_predicate(&Expr::tag_eq("m", "cpu")).unwrap();
        validate_measurement_names_tag_predicate(&Expr::tag_regex("m", "cpu.*")).unwrap();

        let err =
            validate_measurement_names_tag_predicate(&Expr::tag_not_eq("m", "cpu")).unwrap_err();
        assert!(matches!(err, Error::Unimplemented { .. }));

        let err = validate_measurement_names_tag_predicate(&Expr::tag_not_regex("m", "cpu.*"))
            .unwrap_err();
        assert!(matches!(err, Error::Unimplemented { .. }));
    }

    #[test]
    fn test_tsm_key_prefix_with_measurement() {
        let prefix = tsm_key_prefix(b"name", Some(b"cpu"));
        assert_eq!(prefix, b"name,\x00=cpu,".to_vec());
    }
}
