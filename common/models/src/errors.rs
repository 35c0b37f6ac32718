use snafu::Snafu;

pub type ModelResult<T, E = ModelError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ModelError {
    #[snafu(display("Invalid tag: {}", err))]
    InvalidTag { err: String },

    #[snafu(display("Invalid point: {}", err))]
    InvalidPoint { err: String },

    #[snafu(display("Malformed series key: {}", err))]
    MalformedKey { err: String },
}
