use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{AssignmentsData, ContactType, Participant, ParticipantId};

/// Route of the reveal page, relative to the site root.
pub const REVEAL_ROUTE: &str = "wichtel";

/// A personal link the organizer sends to one giver.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InviteLink {
    pub giver_id: ParticipantId,
    pub giver_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    pub contact_type: ContactType,
    pub url: String,
}

pub fn invite_links(
    participants: &[Participant],
    data: &AssignmentsData,
    base_url: &str,
) -> Vec<InviteLink> {
    let base = base_url.trim().trim_end_matches('/');
    let by_id = participants
        .iter()
        .map(|p| (p.id.as_str(), p))
        .collect::<HashMap<_, _>>();

    data.assignments
        .iter()
        .filter_map(|a| {
            let Some(giver) = by_id.get(a.giver_id.as_str()) else {
                tracing::warn!(giver_id = %a.giver_id, "assignment without participant");
                return None;
            };
            Some(InviteLink {
                giver_id: a.giver_id.clone(),
                giver_name: a.giver_name.clone(),
                contact: giver.contact.clone(),
                contact_type: giver.contact_type,
                url: format!("{base}/{REVEAL_ROUTE}/{}", a.token),
            })
        })
        .collect()
}
