//! Error types for the Star Notary core.

use thiserror::Error;

/// Core errors that can occur while encoding, hashing, or decoding blocks.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

/// Input errors for requester-supplied parameters.
///
/// These are checked before anything touches the registry or the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Fill the address parameter")]
    MissingAddress,

    #[error("Fill the signature parameter")]
    MissingSignature,

    #[error("Fill the address and star parameters")]
    MissingStar,

    #[error(
        "Your star information should include non-empty string properties for 'ra', 'dec', 'mag', 'con' and 'story' (missing '{0}')"
    )]
    EmptyStarField(&'static str),

    #[error("Your star story too is long. Maximum size is {max} bytes (got {len})")]
    StoryTooLong { len: usize, max: usize },

    #[error("Your star story contains non-ASCII symbols")]
    NonAsciiStory,
}
