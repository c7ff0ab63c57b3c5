use std::collections::HashSet;

use rand::Rng;
use uuid::Uuid;

use crate::derangement::generate_derangement;
use crate::{Assignment, AssignmentsData, Participant, Token, WichtelError};

/// Pairs every participant with a receiver other than themselves and mints a
/// reveal token per giver. Output order follows `participants`.
pub fn build_assignments<R: Rng + ?Sized>(
    participants: &[Participant],
    rng: &mut R,
) -> Result<AssignmentsData, WichtelError> {
    validate_participants(participants)?;

    let derangement = generate_derangement(participants.len(), rng)?;

    let mut minted = HashSet::with_capacity(participants.len());
    let assignments = participants
        .iter()
        .zip(derangement)
        .map(|(giver, receiver_index)| {
            let receiver = &participants[receiver_index];
            Assignment {
                token: mint_unique_token(&mut minted),
                giver_id: giver.id.clone(),
                giver_name: giver.name.clone(),
                receiver_name: receiver.name.clone(),
            }
        })
        .collect::<Vec<_>>();

    tracing::info!(count = assignments.len(), "assignments built");
    Ok(AssignmentsData { assignments })
}

fn validate_participants(participants: &[Participant]) -> Result<(), WichtelError> {
    if participants.len() < 2 {
        return Err(WichtelError::TooFewParticipants {
            count: participants.len(),
        });
    }

    let mut ids = HashSet::with_capacity(participants.len());
    for (index, participant) in participants.iter().enumerate() {
        if participant.id.trim().is_empty() {
            return Err(WichtelError::BlankField { index, field: "id" });
        }
        if participant.name.trim().is_empty() {
            return Err(WichtelError::BlankField {
                index,
                field: "name",
            });
        }
        if !ids.insert(participant.id.as_str()) {
            return Err(WichtelError::DuplicateParticipantId(participant.id.clone()));
        }
    }
    Ok(())
}

fn mint_unique_token(minted: &mut HashSet<Token>) -> Token {
    loop {
        let token = Uuid::new_v4().to_string();
        if minted.insert(token.clone()) {
            return token;
        }
    }
}

impl AssignmentsData {
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn tokens_are_unique(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.assignments.len());
        self.assignments.iter().all(|a| seen.insert(a.token.as_str()))
    }
}
