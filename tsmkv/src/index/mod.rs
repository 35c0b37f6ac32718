use models::predicate::Expr;
use models::SeriesId;
use snafu::Snafu;

pub mod inverted;

pub use inverted::InvertedIndex;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum IndexError {
    #[snafu(display("series not exists"))]
    SeriesNotExists,

    #[snafu(display("invalid regex /{}/: {}", pattern, source))]
    InvalidRegex {
        pattern: String,
        source: regex::Error,
    },

    #[snafu(display("unsupported expression: {}", msg))]
    UnsupportedExpr { msg: String },

    #[snafu(display("index storage error: {}", msg))]
    IndexStorage { msg: String },
}

pub type IndexResult<T> = Result<T, IndexError>;

/// Iterator of candidate series ids; `Ok(None)` terminates.
pub trait SeriesIdIterator: std::fmt::Debug {
    fn next(&mut self) -> IndexResult<Option<SeriesId>>;
}

/// Inverted index over series keys, narrowed per measurement.
pub trait SeriesIndex: Send + Sync {
    /// Ids of the measurement's series whose tag set matches `predicate`.
    /// `Ok(None)` means the measurement is unknown to the index.
    fn measurement_series_by_expr_iterator(
        &self,
        measurement: &[u8],
        predicate: &Expr,
    ) -> IndexResult<Option<Box<dyn SeriesIdIterator>>>;

    /// Resolves an id to its series key bytes; `None` for dropped series.
    fn series_key(&self, id: SeriesId) -> Option<Vec<u8>>;
}
