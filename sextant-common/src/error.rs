#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SextantCommonError {
    #[error("Invalid alignment: {0}")]
    InvalidAlignment(String),

    #[error("Invalid line style: {0}")]
    InvalidLineStyle(String),

    #[error("Invalid style configuration: {0}")]
    InvalidStyle(String),

    #[error("Renderer does not support {0}")]
    Unsupported(&'static str),
}
