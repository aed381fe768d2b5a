use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error(
        "invalid format descriptor element {index}: expected a width or a literal string, \
         found {found}"
    )]
    InvalidFormatDescriptor { index: usize, found: String },

    #[error("format descriptor is not a JSON array: {0}")]
    DescriptorSyntax(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, IngestError>;
