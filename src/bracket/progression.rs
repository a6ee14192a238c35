use std::collections::HashMap;

use crate::bracket::draw::{BracketKind, Draw, NodeId, Side, Slot};
use crate::bracket::error::BracketError;
use crate::models::tournament::MatchStatus;

/// 2-D placement of one match for visualization: bracket kind × round ×
/// slot index within the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPlacement {
    pub bracket: BracketKind,
    pub round: u32,
    pub position: u32,
    pub node: NodeId,
}

/// All placements in layout order (bracket kind, round, position).
pub fn layout(draw: &Draw) -> Vec<SlotPlacement> {
    let mut placements: Vec<SlotPlacement> = draw
        .ids()
        .map(|id| {
            let n = draw.node(id);
            SlotPlacement {
                bracket: n.bracket,
                round: n.round,
                position: n.position,
                node: id,
            }
        })
        .collect();
    placements.sort_by_key(|p| (p.bracket.as_str(), p.round, p.position));
    placements
}

/// Where this match's winner goes, and which side it lands in. `None` for
/// terminal matches (the final, a bronze match, consolation finals).
pub fn winner_destination(draw: &Draw, node: NodeId) -> Option<(NodeId, Side)> {
    let target = draw.node(node).next_match?;
    Some((target, draw.winner_side(node, target)))
}

/// Where this match's loser goes. Only double-elimination and compass main
/// matches (and bronze-feeding semifinals) have one.
pub fn loser_destination(draw: &Draw, node: NodeId) -> Option<(NodeId, Side)> {
    let target = draw.node(node).next_loser_match?;
    Some((target, draw.loser_side(node, target)))
}

/// Record a winner and push both movers through the progression graph. This
/// is the same resolution the result-recording collaborator performs against
/// the persisted pointers; here it operates on the in-memory draw so the
/// whole progression is testable without storage.
pub fn apply_result(draw: &mut Draw, node: NodeId, winner_team: u8) -> Result<(), BracketError> {
    if !matches!(winner_team, 1 | 2) {
        return Err(BracketError::Invariant(format!(
            "winner team must be 1 or 2, got {winner_team}"
        )));
    }
    let (team1, team2) = {
        let n = draw.node(node);
        (n.team1, n.team2)
    };
    let (winner, loser) = if winner_team == 1 {
        (team1, team2)
    } else {
        (team2, team1)
    };
    if winner.team().is_none() {
        return Err(BracketError::Invariant(
            "cannot complete a match whose winning side is unassigned".into(),
        ));
    }

    {
        let n = draw.node_mut(node);
        n.status = MatchStatus::Completed;
        n.winner_team = Some(winner_team);
    }

    if let Some((target, side)) = winner_destination(draw, node) {
        draw.fill_slot(target, side, winner);
    }
    if let Some((target, side)) = loser_destination(draw, node) {
        // A bye on the losing side keeps feeding byes downstream.
        let drop = if loser.team().is_some() { loser } else { Slot::Bye };
        draw.fill_slot(target, side, drop);
    }
    Ok(())
}

/// Structural invariants of the progression graph:
///
/// * every edge points at an existing later-round node;
/// * no (target, side) is fed by two different matches;
/// * matches without a winner destination all sit in the top round of their
///   bracket kind (the terminal final, a bronze match, consolation finals);
/// * loser edges only leave the main bracket.
pub fn validate(draw: &Draw) -> Result<(), BracketError> {
    let mut fed: HashMap<(NodeId, u8), NodeId> = HashMap::new();

    for id in draw.ids() {
        let node = draw.node(id);

        if let Some(target) = node.next_match {
            if target >= draw.len() {
                return Err(BracketError::Invariant(format!(
                    "winner edge of node {id} points outside the arena"
                )));
            }
            let t = draw.node(target);
            if t.bracket == node.bracket && t.round <= node.round {
                return Err(BracketError::Invariant(format!(
                    "winner edge of node {id} does not advance the round"
                )));
            }
            let side = draw.winner_side(id, target);
            claim(&mut fed, target, side, id)?;
        } else if node.round < draw.rounds_in(node.bracket) {
            return Err(BracketError::Invariant(format!(
                "non-terminal node {id} has no winner destination"
            )));
        }

        if let Some(target) = node.next_loser_match {
            if node.bracket != BracketKind::Main {
                return Err(BracketError::Invariant(format!(
                    "loser edge leaving non-main node {id}"
                )));
            }
            if target >= draw.len() {
                return Err(BracketError::Invariant(format!(
                    "loser edge of node {id} points outside the arena"
                )));
            }
            let side = draw.loser_side(id, target);
            claim(&mut fed, target, side, id)?;
        }
    }
    Ok(())
}

fn claim(
    fed: &mut HashMap<(NodeId, u8), NodeId>,
    target: NodeId,
    side: Side,
    from: NodeId,
) -> Result<(), BracketError> {
    let side_key = match side {
        Side::Team1 => 1,
        Side::Team2 => 2,
    };
    if let Some(prior) = fed.insert((target, side_key), from) {
        return Err(BracketError::Invariant(format!(
            "slot {side_key} of node {target} fed by both {prior} and {from}"
        )));
    }
    Ok(())
}
