use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// 401 from the backend. The session is already cleared by the time
    /// this surfaces.
    #[error("Unauthorized")]
    Unauthorized,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Login/register rejection with the backend's field errors
    /// flattened into a single line.
    #[error("{0}")]
    Auth(String),

    #[error("No home directory")]
    NoHomeDir,
}

pub type Result<T> = std::result::Result<T, Error>;
