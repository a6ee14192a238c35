use std::collections::HashMap;

use crate::bracket::draw::{BracketKind, Draw, MatchNode, NodeId, Slot, Team};
use crate::bracket::error::BracketError;
use crate::models::tournament::Standing;

#[derive(Debug, Clone)]
pub struct Group {
    pub index: u32,
    pub members: Vec<Team>,
    pub matches: Vec<NodeId>,
}

/// Group stage: participants split into groups, full round robin inside each.
/// All matches share one arena; round numbers come from the circle-method
/// schedule, so a round holds at most one match per entrant.
#[derive(Debug)]
pub struct GroupStage {
    pub draw: Draw,
    pub groups: Vec<Group>,
    pub rounds: u32,
    pub top_advance: u32,
}

/// Split the field into `group_count` groups (ceil-division, last group may
/// be smaller) and schedule every within-group pairing exactly once: a group
/// of size k plays k(k-1)/2 matches and everyone appears in k-1 of them.
pub fn generate(
    teams: &[Team],
    group_count: u32,
    top_advance: u32,
) -> Result<GroupStage, BracketError> {
    let n = teams.len();
    if n < 2 {
        return Err(BracketError::InsufficientParticipants {
            required: 2,
            actual: n,
        });
    }
    if group_count == 0 {
        return Err(BracketError::InvalidGroupConfig(
            "group count must be at least 1".into(),
        ));
    }

    let chunk = n.div_ceil(group_count as usize);
    if (group_count as usize - 1) * chunk >= n {
        return Err(BracketError::InvalidGroupConfig(format!(
            "cannot split {} participants into {} groups",
            n, group_count
        )));
    }

    let smallest_group = n - (group_count as usize - 1) * chunk;
    if top_advance == 0 || top_advance as usize > smallest_group {
        return Err(BracketError::InvalidGroupConfig(format!(
            "top_advance {} is out of range for a smallest group of {}",
            top_advance, smallest_group
        )));
    }

    let mut draw = Draw::default();
    let mut groups = Vec::with_capacity(group_count as usize);
    let mut positions: HashMap<u32, u32> = HashMap::new();

    for (gi, members) in teams.chunks(chunk).enumerate() {
        let mut matches = Vec::new();
        for (round, a, b) in circle_schedule(members.len()) {
            let position = positions.entry(round).or_insert(0);
            let id = draw.push(MatchNode::new(BracketKind::Main, round, *position));
            *position += 1;

            let node = draw.node_mut(id);
            node.group = Some(gi as u32);
            node.team1 = Slot::Team(members[a]);
            node.team2 = Slot::Team(members[b]);
            matches.push(id);
        }
        groups.push(Group {
            index: gi as u32,
            members: members.to_vec(),
            matches,
        });
    }

    let rounds = draw.rounds_in(BracketKind::Main);
    Ok(GroupStage {
        draw,
        groups,
        rounds,
        top_advance,
    })
}

/// Circle-method round robin for `k` entrants: pin index 0, rotate the rest.
/// Odd k gets a phantom entrant whose pairings are skipped (that entrant's
/// round off). Yields `(round, a, b)` index triples, rounds 1-based.
fn circle_schedule(k: usize) -> Vec<(u32, usize, usize)> {
    if k < 2 {
        return Vec::new();
    }
    let padded = if k % 2 == 0 { k } else { k + 1 };
    let mut ring: Vec<usize> = (0..padded).collect();
    let mut pairings = Vec::new();

    for round in 1..padded as u32 {
        for i in 0..padded / 2 {
            let a = ring[i];
            let b = ring[padded - 1 - i];
            if a < k && b < k {
                pairings.push((round, a.min(b), a.max(b)));
            }
        }
        let last = ring.pop().expect("ring is never empty");
        ring.insert(1, last);
    }
    pairings
}

/// Group standings order: points descending, then game difference
/// descending. The sort is stable, so anything still tied keeps its stored
/// order.
pub fn sort_standings(rows: &mut [Standing]) {
    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.game_difference().cmp(&a.game_difference()))
    });
}

/// The entrants advancing out of a group: the first `top_advance` rows after
/// sorting.
pub fn advancing(rows: &[Standing], top_advance: u32) -> Vec<Standing> {
    let mut sorted = rows.to_vec();
    sort_standings(&mut sorted);
    sorted.truncate(top_advance as usize);
    sorted
}
