use crate::bracket::draw::{BracketKind, Draw, NodeId, Team};
use crate::bracket::error::BracketError;
use crate::bracket::knockout::{bracket_size, populate_round_one, scaffold_bracket};

/// One consolation quadrant. `matches` is empty when the feeding round
/// produces a single loser (the quadrant exists but has nothing to play).
#[derive(Debug, Clone)]
pub struct QuadrantDraw {
    pub kind: BracketKind,
    /// Main-draw round whose losers this quadrant receives.
    pub source_round: u32,
    pub matches: Vec<NodeId>,
}

/// Compass draw: a single-elimination main draw plus up to six consolation
/// quadrants. `quadrants[k - 1]` receives the losers of main round `k` and
/// is `None` when the main draw has fewer than `k` rounds — "does not exist"
/// is distinct from "exists but empty".
#[derive(Debug)]
pub struct CompassDraw {
    pub draw: Draw,
    pub quadrants: [Option<QuadrantDraw>; 6],
}

impl CompassDraw {
    pub fn quadrant(&self, kind: BracketKind) -> Option<&QuadrantDraw> {
        self.quadrants
            .iter()
            .flatten()
            .find(|q| q.kind == kind)
    }
}

/// Build the compass draw. The main draw is identical to single elimination
/// (standard seeding table, eager byes); every main-draw match up to round
/// six gets a loser edge into its quadrant. Consolation matches are created
/// with empty team slots — they fill as the feeding rounds complete, except
/// for bye feeds, which resolve immediately.
pub fn generate(teams: &[Team]) -> Result<CompassDraw, BracketError> {
    let n = teams.len();
    if n < 2 {
        return Err(BracketError::InsufficientParticipants {
            required: 2,
            actual: n,
        });
    }

    let mut draw = Draw::default();
    let size = bracket_size(n);
    let main_rounds = size.trailing_zeros() as usize;
    let main = scaffold_bracket(&mut draw, BracketKind::Main, size);

    let mut quadrants: [Option<QuadrantDraw>; 6] = Default::default();
    for (qi, kind) in BracketKind::QUADRANTS.iter().enumerate() {
        let source_round = qi + 1;
        if source_round > main_rounds {
            break;
        }

        let loser_count = size >> source_round;
        let mut matches = Vec::new();
        if loser_count >= 2 {
            let rounds = scaffold_bracket(&mut draw, *kind, loser_count);
            for (m, &id) in main[source_round - 1].iter().enumerate() {
                draw.node_mut(id).next_loser_match = Some(rounds[0][m / 2]);
            }
            matches = rounds.into_iter().flatten().collect();
        }
        quadrants[qi] = Some(QuadrantDraw {
            kind: *kind,
            source_round: source_round as u32,
            matches,
        });
    }

    populate_round_one(&mut draw, &main[0], teams);
    Ok(CompassDraw { draw, quadrants })
}
