use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod assignment;
pub mod derangement;
pub mod invite;
pub mod reveal;

pub use assignment::build_assignments;
pub use derangement::{generate_derangement, is_derangement, MAX_SHUFFLE_ATTEMPTS};
pub use invite::{invite_links, InviteLink};
pub use reveal::{token_from_link, RevealError, INVALID_LINK_MESSAGE, UNAVAILABLE_MESSAGE};

pub type ParticipantId = String;
pub type Token = String;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContactType {
    Email,
    Whatsapp,
}

impl fmt::Display for ContactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContactType::Email => f.write_str("email"),
            ContactType::Whatsapp => f.write_str("whatsapp"),
        }
    }
}

/// One entry of the input list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    pub contact_type: ContactType,
}

/// Who a giver draws. Names are copied from the participant list at build time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub token: Token,
    pub giver_id: ParticipantId,
    pub giver_name: String,
    pub receiver_name: String,
}

/// The published artifact read by the reveal page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssignmentsData {
    pub assignments: Vec<Assignment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    Io,
    Internal,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WichtelError {
    #[error("need at least 2 participants, got {count}")]
    TooFewParticipants { count: usize },
    #[error("duplicate participant id `{0}`")]
    DuplicateParticipantId(ParticipantId),
    #[error("participant #{index} has an empty `{field}`")]
    BlankField { index: usize, field: &'static str },
    #[error("no derangement found after {attempts} shuffles; random source looks broken")]
    ShuffleLimitExceeded { attempts: u32 },
}

impl WichtelError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WichtelError::TooFewParticipants { .. }
            | WichtelError::DuplicateParticipantId(_)
            | WichtelError::BlankField { .. } => ErrorKind::InvalidInput,
            WichtelError::ShuffleLimitExceeded { .. } => ErrorKind::Internal,
        }
    }
}
