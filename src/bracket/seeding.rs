use std::cmp::Reverse;
use std::collections::HashMap;

use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::bracket::draw::Team;
use crate::bracket::error::BracketError;
use crate::models::tournament::{Participant, SeedingMode};

/// Order the checked-in field according to the tournament's seeding mode.
/// Always returns a permutation of the input.
///
/// `ranked` sorts by ranking points descending; the sort is stable, so ties
/// keep their check-in order. `manual` follows `manual_order`; ids missing
/// from it are appended in their original relative order rather than dropped.
pub fn seed(
    participants: &[Participant],
    mode: SeedingMode,
    manual_order: Option<&[Uuid]>,
) -> Result<Vec<Participant>, BracketError> {
    if participants.is_empty() {
        return Err(BracketError::EmptyParticipantList);
    }

    let mut seeded = participants.to_vec();
    match mode {
        SeedingMode::Ranked => {
            seeded.sort_by_key(|p| Reverse(p.ranking_points.unwrap_or(0)));
        }
        SeedingMode::Random => {
            seeded.shuffle(&mut rand::thread_rng());
        }
        SeedingMode::Manual => {
            let order = manual_order.unwrap_or(&[]);
            let rank: HashMap<Uuid, usize> = order
                .iter()
                .enumerate()
                .map(|(i, id)| (*id, i))
                .collect();
            let mut listed: Vec<Participant> = Vec::with_capacity(seeded.len());
            let mut unlisted: Vec<Participant> = Vec::new();
            for p in seeded {
                if rank.contains_key(&p.user_id) {
                    listed.push(p);
                } else {
                    unlisted.push(p);
                }
            }
            listed.sort_by_key(|p| rank[&p.user_id]);
            listed.extend(unlisted);
            seeded = listed;
        }
    }

    Ok(seeded)
}

/// Parse a stored seeding mode string. The engine never trusts raw strings
/// beyond this point.
pub fn parse_mode(raw: &str) -> Result<SeedingMode, BracketError> {
    match raw {
        "random" => Ok(SeedingMode::Random),
        "ranked" => Ok(SeedingMode::Ranked),
        "manual" => Ok(SeedingMode::Manual),
        other => Err(BracketError::InvalidSeedingMode(other.to_string())),
    }
}

/// Build the manual order from per-registration seed assignments: seeded
/// entrants ascending by seed number, the rest follow in check-in order.
pub fn manual_order_from_seeds(participants: &[Participant]) -> Vec<Uuid> {
    let mut seeded: Vec<&Participant> = participants.iter().filter(|p| p.seed.is_some()).collect();
    seeded.sort_by_key(|p| p.seed.unwrap());
    seeded.iter().map(|p| p.user_id).collect()
}

/// Turn a seeded field into bracket entrants. Singles map one-to-one;
/// doubles pair consecutive entries, so an odd field is rejected before any
/// bracket math happens.
pub fn pair_teams(seeded: &[Participant], is_doubles: bool) -> Result<Vec<Team>, BracketError> {
    if !is_doubles {
        return Ok(seeded.iter().map(|p| Team::singles(p.user_id)).collect());
    }

    if seeded.len() % 2 != 0 {
        return Err(BracketError::UnevenDoublesField(seeded.len()));
    }

    Ok(seeded
        .chunks(2)
        .map(|pair| Team::doubles(pair[0].user_id, pair[1].user_id))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(points: &[i32]) -> Vec<Participant> {
        points
            .iter()
            .map(|&ranking_points| Participant {
                user_id: Uuid::new_v4(),
                seed: None,
                ranking_points: Some(ranking_points),
            })
            .collect()
    }

    #[test]
    fn ranked_sorts_descending_and_is_stable() {
        let mut participants = field(&[50, 80, 80, 100]);
        participants[1].seed = Some(1);
        let tied_first = participants[1].user_id;
        let tied_second = participants[2].user_id;

        let seeded = seed(&participants, SeedingMode::Ranked, None).unwrap();

        let points: Vec<i32> = seeded.iter().map(|p| p.ranking_points.unwrap()).collect();
        assert_eq!(points, vec![100, 80, 80, 50]);
        // Tie keeps input order.
        assert_eq!(seeded[1].user_id, tied_first);
        assert_eq!(seeded[2].user_id, tied_second);
    }

    #[test]
    fn ranked_treats_missing_points_as_zero() {
        let mut participants = field(&[10, 20]);
        participants[0].ranking_points = None;
        let unranked = participants[0].user_id;

        let seeded = seed(&participants, SeedingMode::Ranked, None).unwrap();
        assert_eq!(seeded.last().unwrap().user_id, unranked);
    }

    #[test]
    fn random_is_a_permutation() {
        let participants = field(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let seeded = seed(&participants, SeedingMode::Random, None).unwrap();

        assert_eq!(seeded.len(), participants.len());
        for p in &participants {
            assert!(seeded.iter().any(|s| s.user_id == p.user_id));
        }
    }

    #[test]
    fn manual_orders_by_list_and_appends_missing() {
        let participants = field(&[1, 2, 3, 4]);
        let order = vec![participants[2].user_id, participants[0].user_id];

        let seeded = seed(&participants, SeedingMode::Manual, Some(&order)).unwrap();

        assert_eq!(seeded[0].user_id, participants[2].user_id);
        assert_eq!(seeded[1].user_id, participants[0].user_id);
        // The two unlisted entrants keep their original relative order.
        assert_eq!(seeded[2].user_id, participants[1].user_id);
        assert_eq!(seeded[3].user_id, participants[3].user_id);
    }

    #[test]
    fn empty_field_is_rejected() {
        let err = seed(&[], SeedingMode::Random, None).unwrap_err();
        assert!(matches!(err, BracketError::EmptyParticipantList));
    }

    #[test]
    fn unknown_mode_string_is_rejected() {
        let err = parse_mode("swiss").unwrap_err();
        assert!(matches!(err, BracketError::InvalidSeedingMode(m) if m == "swiss"));
    }

    #[test]
    fn doubles_pairing_rejects_odd_field() {
        let participants = field(&[1, 2, 3]);
        let err = pair_teams(&participants, true).unwrap_err();
        assert!(matches!(err, BracketError::UnevenDoublesField(3)));
    }

    #[test]
    fn doubles_pairing_keeps_seeding_order() {
        let participants = field(&[1, 2, 3, 4]);
        let teams = pair_teams(&participants, true).unwrap();

        assert_eq!(teams.len(), 2);
        assert_eq!(teams[0].player1, participants[0].user_id);
        assert_eq!(teams[0].player2, Some(participants[1].user_id));
        assert_eq!(teams[1].player1, participants[2].user_id);
    }

    #[test]
    fn manual_order_from_seed_numbers() {
        let mut participants = field(&[1, 2, 3]);
        participants[2].seed = Some(1);
        participants[0].seed = Some(2);

        let order = manual_order_from_seeds(&participants);
        assert_eq!(order, vec![participants[2].user_id, participants[0].user_id]);
    }
}
