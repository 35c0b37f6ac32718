pub use context::CancellationToken;
pub use error::{Error, Result};
pub use kv_option::Options;
pub use kvcore::TsmStore;
pub use points_writer::{BufferedPointsWriter, PointsWriter};
pub use schema::{
    validate_measurement_names_tag_predicate, validate_tag_predicate, CANCEL_CHECK_INTERVAL,
};

pub mod context;
pub mod error;
pub mod index;
pub mod kv_option;
pub mod kvcore;
pub mod mem_cache;
pub mod points_writer;
pub mod reader;
pub mod schema;
pub mod tsm;

pub type ColumnFileId = u64;
