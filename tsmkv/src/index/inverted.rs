use std::collections::{BTreeMap, BTreeSet, HashMap};

use bytes::BufMut;
use models::predicate::{BinaryExpr, Expr, Operator};
use models::tag::Tag;
use models::SeriesId;
use parking_lot::RwLock;
use regex::bytes::Regex;
use tracing::debug;

use super::{IndexError, IndexResult, SeriesIdIterator, SeriesIndex};

/// In-memory inverted index.
///
/// Three maps are maintained per registered series: the forward map
/// (series key to id), the reverse map (id to series key) and one posting
/// list per `(measurement, tag key, tag value)` triple, keyed by a
/// length-prefixed byte encoding so that all values of one tag key form a
/// contiguous range.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    inner: RwLock<IndexData>,
}

#[derive(Debug, Default)]
struct IndexData {
    next_id: SeriesId,
    key_to_id: HashMap<Vec<u8>, SeriesId>,
    id_to_key: HashMap<SeriesId, Vec<u8>>,
    measurements: HashMap<Vec<u8>, BTreeSet<SeriesId>>,
    postings: BTreeMap<Vec<u8>, BTreeSet<SeriesId>>,
}

fn encode_tag_key_prefix(measurement: &[u8], tag_key: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4 + measurement.len() + tag_key.len());
    buf.put_u16(measurement.len() as u16);
    buf.put_slice(measurement);
    buf.put_u16(tag_key.len() as u16);
    buf.put_slice(tag_key);
    buf
}

fn encode_inverted_index_key(measurement: &[u8], tag_key: &[u8], tag_value: &[u8]) -> Vec<u8> {
    let mut buf = encode_tag_key_prefix(measurement, tag_key);
    buf.reserve(2 + tag_value.len());
    buf.put_u16(tag_value.len() as u16);
    buf.put_slice(tag_value);
    buf
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a series under `measurement`, returning its id. Re-adding
    /// an existing series key returns the original id.
    pub fn add_series(&self, measurement: &[u8], series_key: &[u8], tags: &[Tag]) -> SeriesId {
        let mut data = self.inner.write();
        if let Some(id) = data.key_to_id.get(series_key) {
            return *id;
        }
        data.next_id += 1;
        let id = data.next_id;
        debug!(id, "registering series");

        data.key_to_id.insert(series_key.to_vec(), id);
        data.id_to_key.insert(id, series_key.to_vec());
        data.measurements
            .entry(measurement.to_vec())
            .or_default()
            .insert(id);
        for tag in tags {
            let key = encode_inverted_index_key(measurement, &tag.key, &tag.value);
            data.postings.entry(key).or_default().insert(id);
        }
        if tags.is_empty() {
            let key = encode_inverted_index_key(measurement, &[], &[]);
            data.postings.entry(key).or_default().insert(id);
        }
        id
    }

    pub fn series_count(&self) -> usize {
        self.inner.read().id_to_key.len()
    }
}

impl SeriesIndex for InvertedIndex {
    fn measurement_series_by_expr_iterator(
        &self,
        measurement: &[u8],
        predicate: &Expr,
    ) -> IndexResult<Option<Box<dyn SeriesIdIterator>>> {
        let data = self.inner.read();
        if !data.measurements.contains_key(measurement) {
            return Ok(None);
        }
        let ids = eval_expr(&data, measurement, predicate)?;
        Ok(Some(Box::new(SeriesIdListIterator {
            ids: ids.into_iter().collect::<Vec<_>>().into_iter(),
        })))
    }

    fn series_key(&self, id: SeriesId) -> Option<Vec<u8>> {
        self.inner.read().id_to_key.get(&id).cloned()
    }
}

#[derive(Debug)]
struct SeriesIdListIterator {
    ids: std::vec::IntoIter<SeriesId>,
}

impl SeriesIdIterator for SeriesIdListIterator {
    fn next(&mut self) -> IndexResult<Option<SeriesId>> {
        Ok(self.ids.next())
    }
}

fn eval_expr(data: &IndexData, measurement: &[u8], expr: &Expr) -> IndexResult<BTreeSet<SeriesId>> {
    match expr {
        Expr::Paren(inner) => eval_expr(data, measurement, inner),
        Expr::Binary(b) => match b.op {
            Operator::And => {
                let lhs = eval_expr(data, measurement, &b.lhs)?;
                let rhs = eval_expr(data, measurement, &b.rhs)?;
                Ok(lhs.intersection(&rhs).copied().collect())
            }
            Operator::Or => {
                let lhs = eval_expr(data, measurement, &b.lhs)?;
                let rhs = eval_expr(data, measurement, &b.rhs)?;
                Ok(lhs.union(&rhs).copied().collect())
            }
            Operator::Eq | Operator::NotEq | Operator::EqRegex | Operator::NotEqRegex => {
                eval_comparison(data, measurement, b)
            }
            op => Err(IndexError::UnsupportedExpr {
                msg: format!("operator {}", op),
            }),
        },
        other => Err(IndexError::UnsupportedExpr {
            msg: format!("{}", other),
        }),
    }
}

fn eval_comparison(
    data: &IndexData,
    measurement: &[u8],
    expr: &BinaryExpr,
) -> IndexResult<BTreeSet<SeriesId>> {
    let Expr::VarRef(tag_key) = expr.lhs.as_ref() else {
        return Err(IndexError::UnsupportedExpr {
            msg: format!("LHS must be a tag key reference, got: {}", expr.lhs),
        });
    };
    let tag_key = tag_key.as_bytes();

    let matching = match (expr.op, expr.rhs.as_ref()) {
        (Operator::Eq | Operator::NotEq, Expr::StringLiteral(value)) => {
            let key = encode_inverted_index_key(measurement, tag_key, value.as_bytes());
            data.postings.get(&key).cloned().unwrap_or_default()
        }
        (Operator::EqRegex | Operator::NotEqRegex, Expr::RegexLiteral(pattern)) => {
            let re = Regex::new(pattern).map_err(|source| IndexError::InvalidRegex {
                pattern: pattern.clone(),
                source,
            })?;
            scan_tag_values(data, measurement, tag_key, |value| re.is_match(value))
        }
        _ => {
            return Err(IndexError::UnsupportedExpr {
                msg: format!("RHS must be a string or regex, got: {}", expr.rhs),
            })
        }
    };

    match expr.op {
        Operator::Eq | Operator::EqRegex => Ok(matching),
        _ => {
            let all = data
                .measurements
                .get(measurement)
                .cloned()
                .unwrap_or_default();
            Ok(all.difference(&matching).copied().collect())
        }
    }
}

/// Unions the posting lists of every `(measurement, tag_key, value)` whose
/// value satisfies `matches`.
fn scan_tag_values(
    data: &IndexData,
    measurement: &[u8],
    tag_key: &[u8],
    matches: impl Fn(&[u8]) -> bool,
) -> BTreeSet<SeriesId> {
    let prefix = encode_tag_key_prefix(measurement, tag_key);
    let mut ids = BTreeSet::new();
    for (key, posting) in data.postings.range(prefix.clone()..) {
        if !key.starts_with(&prefix) {
            break;
        }
        let value = &key[prefix.len() + 2..];
        if matches(value) {
            ids.extend(posting.iter().copied());
        }
    }
    ids
}
