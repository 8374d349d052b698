#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("option '{0}' is ambiguous")]
    AmbiguousOption(String),

    #[error("option '{0}' requires an argument")]
    MissingArgument(String),

    #[error("option '{0}' doesn't allow an argument")]
    UnexpectedArgument(String),
}

pub type Result<T> = std::result::Result<T, Error>;
