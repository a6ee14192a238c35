use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::tournament::MatchStatus;

/// Index of a match node inside a [`Draw`] arena.
pub type NodeId = usize;

/// Which bracket a round or slot belongs to. Rounds are keyed by
/// `(tournament, bracket kind, round number)`, so every kind numbers its
/// rounds from 1 independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BracketKind {
    Main,
    Losers,
    East,
    West,
    Northeast,
    Southeast,
    Northwest,
    Southwest,
}

impl BracketKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BracketKind::Main => "main",
            BracketKind::Losers => "losers",
            BracketKind::East => "east",
            BracketKind::West => "west",
            BracketKind::Northeast => "northeast",
            BracketKind::Southeast => "southeast",
            BracketKind::Northwest => "northwest",
            BracketKind::Southwest => "southwest",
        }
    }

    /// Compass quadrants in feed order: the quadrant at index `k - 1`
    /// receives the losers of main-draw round `k`.
    pub const QUADRANTS: [BracketKind; 6] = [
        BracketKind::East,
        BracketKind::West,
        BracketKind::Northeast,
        BracketKind::Southeast,
        BracketKind::Northwest,
        BracketKind::Southwest,
    ];
}

/// A singles entrant or a doubles pairing, after seeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Team {
    pub player1: Uuid,
    pub player2: Option<Uuid>,
}

impl Team {
    pub fn singles(player: Uuid) -> Self {
        Self {
            player1: player,
            player2: None,
        }
    }

    pub fn doubles(player1: Uuid, player2: Uuid) -> Self {
        Self {
            player1,
            player2: Some(player2),
        }
    }
}

/// One side of a match. `Pending` means the feeding match has not produced
/// its mover yet; `Bye` marks a side that can never be filled because the
/// feeder was a bye. The distinction drives eager auto-resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slot {
    #[default]
    Pending,
    Bye,
    Team(Team),
}

impl Slot {
    pub fn team(&self) -> Option<Team> {
        match self {
            Slot::Team(t) => Some(*t),
            _ => None,
        }
    }

    pub fn is_bye(&self) -> bool {
        matches!(self, Slot::Bye)
    }
}

/// Which side of a match a mover lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Team1,
    Team2,
}

impl Side {
    pub fn from_position(position: u32) -> Self {
        if position % 2 == 0 {
            Side::Team1
        } else {
            Side::Team2
        }
    }
}

/// A match in the in-memory bracket. `next_match`/`next_loser_match` are the
/// forward edges of the progression graph; each node has at most one of each.
#[derive(Debug, Clone)]
pub struct MatchNode {
    pub id: Uuid,
    pub bracket: BracketKind,
    pub round: u32,
    pub position: u32,
    pub group: Option<u32>,
    pub team1: Slot,
    pub team2: Slot,
    pub status: MatchStatus,
    pub winner_team: Option<u8>,
    pub next_match: Option<NodeId>,
    pub next_loser_match: Option<NodeId>,
}

impl MatchNode {
    pub fn new(bracket: BracketKind, round: u32, position: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            bracket,
            round,
            position,
            group: None,
            team1: Slot::Pending,
            team2: Slot::Pending,
            status: MatchStatus::Pending,
            winner_team: None,
            next_match: None,
            next_loser_match: None,
        }
    }

    pub fn slot_mut(&mut self, side: Side) -> &mut Slot {
        match side {
            Side::Team1 => &mut self.team1,
            Side::Team2 => &mut self.team2,
        }
    }
}

/// Arena of match nodes. The whole generated structure (main bracket, loser
/// bracket, consolation quadrants) lives in one arena so progression edges
/// are plain indices.
#[derive(Debug, Default, Clone)]
pub struct Draw {
    nodes: Vec<MatchNode>,
}

impl Draw {
    pub fn push(&mut self, node: MatchNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn node(&self, id: NodeId) -> &MatchNode {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut MatchNode {
        &mut self.nodes[id]
    }

    pub fn nodes(&self) -> &[MatchNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        0..self.nodes.len()
    }

    /// Number of rounds present for a bracket kind (0 if the kind is absent).
    pub fn rounds_in(&self, bracket: BracketKind) -> u32 {
        self.nodes
            .iter()
            .filter(|n| n.bracket == bracket)
            .map(|n| n.round)
            .max()
            .unwrap_or(0)
    }

    /// Node ids of one round, ordered by position.
    pub fn round_matches(&self, bracket: BracketKind, round: u32) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .ids()
            .filter(|&i| self.nodes[i].bracket == bracket && self.nodes[i].round == round)
            .collect();
        ids.sort_by_key(|&i| self.nodes[i].position);
        ids
    }

    pub fn find(&self, bracket: BracketKind, round: u32, position: u32) -> Option<NodeId> {
        self.ids().find(|&i| {
            let n = &self.nodes[i];
            n.bracket == bracket && n.round == round && n.position == position
        })
    }

    /// Place a mover into a slot of `target`, then auto-resolve that match if
    /// both sides are now known and one of them is a bye.
    pub fn fill_slot(&mut self, target: NodeId, side: Side, slot: Slot) {
        *self.nodes[target].slot_mut(side) = slot;
        self.auto_resolve(target);
    }

    /// Resolve a match whose outcome is forced: a real team against a bye
    /// completes immediately with the team as winner, two byes forfeit. The
    /// mover propagates along the forward edges, so resolution cascades.
    fn auto_resolve(&mut self, id: NodeId) {
        let (team1, team2) = (self.nodes[id].team1, self.nodes[id].team2);
        let outcome = match (team1, team2) {
            (Slot::Team(_), Slot::Bye) => Some((MatchStatus::Completed, Some(1), team1)),
            (Slot::Bye, Slot::Team(_)) => Some((MatchStatus::Completed, Some(2), team2)),
            (Slot::Bye, Slot::Bye) => Some((MatchStatus::Forfeited, None, Slot::Bye)),
            _ => None,
        };

        let Some((status, winner, advancing)) = outcome else {
            return;
        };

        let node = &mut self.nodes[id];
        node.status = status;
        node.winner_team = winner;
        let next = node.next_match;
        let next_loser = node.next_loser_match;

        if let Some(next) = next {
            let side = self.winner_side(id, next);
            self.fill_slot(next, side, advancing);
        }
        // A bye never drops a real loser; the loser-side feed stays a bye.
        if let Some(next_loser) = next_loser {
            let side = self.loser_side(id, next_loser);
            self.fill_slot(next_loser, side, Slot::Bye);
        }
    }

    /// The side of `target` this node's winner lands in: feeders are ranked
    /// in arena order (creation order, which follows bracket/round/position),
    /// first feeder fills team 1. This also covers the grand final, fed by
    /// the winners final and the losers final.
    pub fn winner_side(&self, from: NodeId, target: NodeId) -> Side {
        let rank = self
            .ids()
            .filter(|&i| self.nodes[i].next_match == Some(target))
            .position(|i| i == from)
            .unwrap_or(0);
        Side::from_position(rank as u32)
    }

    /// The side of `target` this node's loser lands in. Loser edges record
    /// the target only, so the side is derived from which feeder this is.
    pub fn loser_side(&self, from: NodeId, target: NodeId) -> Side {
        let feeders: Vec<NodeId> = self
            .ids()
            .filter(|&i| self.nodes[i].next_loser_match == Some(target))
            .collect();
        if feeders.len() == 1 {
            // Sole loser feed: the other side is a loser-bracket survivor.
            Side::Team2
        } else {
            let rank = feeders.iter().position(|&i| i == from).unwrap_or(0);
            Side::from_position(rank as u32)
        }
    }
}
