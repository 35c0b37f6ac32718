use snafu::Snafu;

use crate::index::IndexError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("operation cancelled"))]
    Cancelled,

    #[snafu(display("invalid tag predicate: {}", reason))]
    InvalidPredicate { reason: String },

    #[snafu(display("not implemented: {}", msg))]
    Unimplemented { msg: String },

    #[snafu(display("malformed composite key: {}", source))]
    MalformedKey { source: models::ModelError },

    #[snafu(display("invalid point: {}", source))]
    InvalidPoint { source: models::ModelError },

    #[snafu(display("read tsm file error: {}", reason))]
    ReadTsm { reason: String },

    #[snafu(display("Index: {}", source))]
    IndexErr { source: IndexError },

    #[snafu(display("Internal error: {}", reason))]
    Internal { reason: String },
}

impl From<IndexError> for Error {
    fn from(source: IndexError) -> Self {
        Error::IndexErr { source }
    }
}
