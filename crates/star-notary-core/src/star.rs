//! Star payloads: requester input checks and the story hex codec.
//!
//! A [`StarSubmission`] can only be built through [`StarSubmission::new`], so
//! holding one means the payload already passed every input rule.

use crate::block::{BlockBody, Star, StarRecord};
use crate::error::{CoreError, ValidationError};

/// Maximum story size in bytes (roughly 250 words).
pub const MAX_STORY_BYTES: usize = 500;

/// Reject a missing or blank address.
pub fn validate_address(address: Option<&str>) -> Result<&str, ValidationError> {
    match address {
        Some(a) if !a.trim().is_empty() => Ok(a),
        _ => Err(ValidationError::MissingAddress),
    }
}

/// Reject a missing or blank signature.
pub fn validate_signature(signature: Option<&str>) -> Result<&str, ValidationError> {
    match signature {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(ValidationError::MissingSignature),
    }
}

/// Hex-encode story text for storage.
pub fn encode_story(story: &str) -> String {
    hex::encode(story.as_bytes())
}

/// Decode a stored story back to text.
pub fn decode_story(story_hex: &str) -> Result<String, CoreError> {
    let bytes = hex::decode(story_hex).map_err(|e| CoreError::DecodingError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| CoreError::DecodingError(e.to_string()))
}

/// A star payload that passed input validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarSubmission {
    ra: String,
    dec: String,
    mag: String,
    con: String,
    story: String,
}

impl StarSubmission {
    /// Check and build a submission.
    ///
    /// Every field must be a non-empty string; the story must be ASCII and at
    /// most [`MAX_STORY_BYTES`] bytes.
    pub fn new(
        ra: impl Into<String>,
        dec: impl Into<String>,
        mag: impl Into<String>,
        con: impl Into<String>,
        story: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::with_story_limit(ra, dec, mag, con, story, MAX_STORY_BYTES)
    }

    /// Same as [`StarSubmission::new`] with an explicit story limit.
    pub fn with_story_limit(
        ra: impl Into<String>,
        dec: impl Into<String>,
        mag: impl Into<String>,
        con: impl Into<String>,
        story: impl Into<String>,
        max_story_bytes: usize,
    ) -> Result<Self, ValidationError> {
        let submission = Self {
            ra: ra.into(),
            dec: dec.into(),
            mag: mag.into(),
            con: con.into(),
            story: story.into(),
        };

        for (name, value) in [
            ("ra", &submission.ra),
            ("dec", &submission.dec),
            ("mag", &submission.mag),
            ("con", &submission.con),
            ("story", &submission.story),
        ] {
            if value.is_empty() {
                return Err(ValidationError::EmptyStarField(name));
            }
        }

        if submission.story.len() > max_story_bytes {
            return Err(ValidationError::StoryTooLong {
                len: submission.story.len(),
                max: max_story_bytes,
            });
        }

        if !submission.story.is_ascii() {
            return Err(ValidationError::NonAsciiStory);
        }

        Ok(submission)
    }

    pub fn story(&self) -> &str {
        &self.story
    }

    /// Build the ledger body for this star, hex-encoding the story.
    pub fn into_body(self, address: &str) -> BlockBody {
        BlockBody::Star(StarRecord {
            address: address.to_string(),
            star: Star {
                story_hex: encode_story(&self.story),
                ra: self.ra,
                dec: self.dec,
                mag: self.mag,
                con: self.con,
                story_decoded: None,
            },
        })
    }
}
