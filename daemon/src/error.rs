use thiserror::Error;

#[derive(Error, Debug)]
pub enum DotnoteError {
    #[error("failed to read config file: {0}")]
    ConfigFile(std::io::Error),
    #[error("failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("invalid config value: {0}")]
    InvalidConfig(String),
    #[error("failed to initialize display: {0}")]
    DisplayInit(#[from] anyhow::Error),
    #[error("web server error: {0}")]
    Server(std::io::Error),
}
