use crate::bracket::draw::{BracketKind, Draw, MatchNode, NodeId, Side, Slot, Team};
use crate::bracket::error::BracketError;

/// Smallest power of two that fits the field.
pub fn bracket_size(entrants: usize) -> usize {
    entrants.next_power_of_two()
}

/// Seed numbers (1-based) in round-one slot order, built by successive
/// mirroring: `[1]` → `[1,2]` → `[1,4,2,3]` → `[1,8,4,5,2,7,3,6]`.
/// Consecutive slots pair up, so round one is 1vN, 4v5, 2v(N-1), ... and the
/// top two seeds sit in opposite halves until the final. Padded seed numbers
/// above the real field become byes, which therefore land on the top seeds
/// first.
pub fn seeding_order(bracket_size: usize) -> Vec<usize> {
    debug_assert!(bracket_size.is_power_of_two());
    let mut order = vec![1usize];
    let mut n = 1;
    while n < bracket_size {
        n *= 2;
        let mut next = Vec::with_capacity(n);
        for &s in &order {
            next.push(s);
            next.push(n + 1 - s);
        }
        order = next;
    }
    order
}

/// Create the rounds of one single-elimination bracket (no entrants yet) and
/// wire the winner edges: positions 2i and 2i+1 feed position i of the next
/// round. Returns the node ids per round.
pub(crate) fn scaffold_bracket(
    draw: &mut Draw,
    kind: BracketKind,
    entrants: usize,
) -> Vec<Vec<NodeId>> {
    debug_assert!(entrants.is_power_of_two() && entrants >= 2);
    let total_rounds = entrants.trailing_zeros() as usize;

    let mut rounds: Vec<Vec<NodeId>> = Vec::with_capacity(total_rounds);
    for r in 1..=total_rounds {
        let width = entrants >> r;
        let ids = (0..width)
            .map(|p| draw.push(MatchNode::new(kind, r as u32, p as u32)))
            .collect();
        rounds.push(ids);
    }
    for r in 0..total_rounds.saturating_sub(1) {
        for (p, &id) in rounds[r].iter().enumerate() {
            draw.node_mut(id).next_match = Some(rounds[r + 1][p / 2]);
        }
    }
    rounds
}

/// Fill round one from the seeding table and let byes resolve eagerly: a
/// one-sided match completes on the spot and its winner propagates forward,
/// so later rounds may already carry teams when generation returns. All
/// progression edges must be wired before this runs.
pub(crate) fn populate_round_one(draw: &mut Draw, round_one: &[NodeId], teams: &[Team]) {
    let size = round_one.len() * 2;
    let order = seeding_order(size);
    for (slot_idx, &seed_num) in order.iter().enumerate() {
        let target = round_one[slot_idx / 2];
        let side = Side::from_position((slot_idx % 2) as u32);
        let slot = if seed_num <= teams.len() {
            Slot::Team(teams[seed_num - 1])
        } else {
            Slot::Bye
        };
        draw.fill_slot(target, side, slot);
    }
}

/// Single elimination. With `bronze_match`, a standalone third-place match is
/// added in the final round (position 1), fed by the semifinal losers; it is
/// not part of the winner progression chain.
pub fn generate_single(teams: &[Team], bronze_match: bool) -> Result<Draw, BracketError> {
    let n = teams.len();
    if n < 2 {
        return Err(BracketError::InsufficientParticipants {
            required: 2,
            actual: n,
        });
    }

    let mut draw = Draw::default();
    let size = bracket_size(n);
    let main = scaffold_bracket(&mut draw, BracketKind::Main, size);

    if bronze_match && main.len() >= 2 {
        let final_round = main.len() as u32;
        let bronze = draw.push(MatchNode::new(BracketKind::Main, final_round, 1));
        for &semi in &main[main.len() - 2] {
            draw.node_mut(semi).next_loser_match = Some(bronze);
        }
    }

    populate_round_one(&mut draw, &main[0], teams);
    Ok(draw)
}

/// Where a winners-round loser lands in its loser-bracket round. The mapping
/// alternates between reversal (even winners rounds) and half-rotation (odd),
/// the standard scheme that keeps a dropping player away from the
/// loser-bracket line fed by their own quarter for as long as the width
/// allows.
fn drop_position(winners_round: usize, position: usize, width: usize) -> usize {
    if width <= 1 {
        return 0;
    }
    if winners_round % 2 == 0 {
        width - 1 - position
    } else {
        (position + width / 2) % width
    }
}

/// Double elimination: the winners bracket of [`generate_single`] plus a
/// loser bracket in standard minor/major interleaving, plus a grand final.
///
/// Loser rounds come in pairs of equal width `size / 2^(i+1)`: the odd
/// (minor) round pairs loser-bracket survivors, the even (major) round pits
/// each survivor against a freshly dropped winners-round loser. Losers of
/// winners round 1 open loser round 1; losers of winners round `r ≥ 2` drop
/// into loser round `2(r-1)`.
pub fn generate_double(teams: &[Team]) -> Result<Draw, BracketError> {
    let n = teams.len();
    if n < 3 {
        return Err(BracketError::InsufficientParticipants {
            required: 3,
            actual: n,
        });
    }

    let mut draw = Draw::default();
    let size = bracket_size(n);
    let k = size.trailing_zeros() as usize;
    let main = scaffold_bracket(&mut draw, BracketKind::Main, size);

    let lb_round_count = 2 * k - 2;
    let mut lb: Vec<Vec<NodeId>> = Vec::with_capacity(lb_round_count);
    for r in 1..=lb_round_count {
        let pair = (r + 1) / 2;
        let width = size >> (pair + 1);
        let ids = (0..width)
            .map(|p| draw.push(MatchNode::new(BracketKind::Losers, r as u32, p as u32)))
            .collect();
        lb.push(ids);
    }

    // Internal loser-bracket winner edges: minor rounds keep their width into
    // the following major round, major rounds halve into the next minor.
    for r in 0..lb_round_count - 1 {
        let minor = (r + 1) % 2 == 1;
        for p in 0..lb[r].len() {
            let target = if minor { lb[r + 1][p] } else { lb[r + 1][p / 2] };
            let id = lb[r][p];
            draw.node_mut(id).next_match = Some(target);
        }
    }

    // Grand final, fed by both bracket finals.
    let grand_final = draw.push(MatchNode::new(BracketKind::Main, (k + 1) as u32, 0));
    let winners_final = main[k - 1][0];
    let losers_final = lb[lb_round_count - 1][0];
    draw.node_mut(winners_final).next_match = Some(grand_final);
    draw.node_mut(losers_final).next_match = Some(grand_final);

    // Drops out of the winners bracket.
    for (m, &id) in main[0].iter().enumerate() {
        draw.node_mut(id).next_loser_match = Some(lb[0][m / 2]);
    }
    for r in 2..=k {
        let targets = &lb[2 * (r - 1) - 1];
        for (m, &id) in main[r - 1].iter().enumerate() {
            let t = drop_position(r, m, targets.len());
            draw.node_mut(id).next_loser_match = Some(targets[t]);
        }
    }

    populate_round_one(&mut draw, &main[0], teams);
    Ok(draw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tournament::MatchStatus;
    use uuid::Uuid;

    fn teams(n: usize) -> Vec<Team> {
        (0..n).map(|_| Team::singles(Uuid::new_v4())).collect()
    }

    #[test]
    fn seeding_order_is_the_standard_table() {
        assert_eq!(seeding_order(2), vec![1, 2]);
        assert_eq!(seeding_order(4), vec![1, 4, 2, 3]);
        assert_eq!(seeding_order(8), vec![1, 8, 4, 5, 2, 7, 3, 6]);
        assert_eq!(
            seeding_order(16),
            vec![1, 16, 8, 9, 4, 13, 5, 12, 2, 15, 7, 10, 3, 14, 6, 11]
        );
    }

    #[test]
    fn bracket_size_is_next_power_of_two() {
        for (n, expected) in [(2, 2), (3, 4), (5, 8), (8, 8), (9, 16), (100, 128)] {
            assert_eq!(bracket_size(n), expected);
        }
    }

    #[test]
    fn round_and_match_counts_match_bracket_size() {
        for n in 2..=33 {
            let draw = generate_single(&teams(n), false).unwrap();
            let size = bracket_size(n);
            let rounds = size.trailing_zeros();
            assert_eq!(draw.rounds_in(BracketKind::Main), rounds);
            assert_eq!(draw.round_matches(BracketKind::Main, 1).len(), size / 2);
            // A full single-elimination bracket always holds size - 1 matches.
            assert_eq!(draw.len(), size - 1);
        }
    }

    #[test]
    fn top_two_seeds_sit_in_opposite_halves() {
        let field = teams(16);
        let draw = generate_single(&field, false).unwrap();
        let round_one = draw.round_matches(BracketKind::Main, 1);
        let half = round_one.len() / 2;

        let position_of = |team: Team| {
            round_one
                .iter()
                .position(|&id| {
                    let node = draw.node(id);
                    node.team1.team() == Some(team) || node.team2.team() == Some(team)
                })
                .unwrap()
        };

        let first = position_of(field[0]);
        let second = position_of(field[1]);
        assert!(first < half);
        assert!(second >= half, "seed 2 must start in the bottom half");
    }

    #[test]
    fn five_entrants_give_three_byes_to_the_top_seeds() {
        let field = teams(5);
        let draw = generate_single(&field, false).unwrap();
        let round_one = draw.round_matches(BracketKind::Main, 1);
        assert_eq!(round_one.len(), 4);

        // Slot order for 8: 1v8, 4v5, 2v7, 3v6 — seeds 6..8 are byes.
        let statuses: Vec<MatchStatus> = round_one.iter().map(|&id| draw.node(id).status).collect();
        assert_eq!(
            statuses,
            vec![
                MatchStatus::Completed,
                MatchStatus::Pending,
                MatchStatus::Completed,
                MatchStatus::Completed,
            ]
        );

        // Seed 1 auto-advanced into round two.
        let semi = draw.node(draw.find(BracketKind::Main, 2, 0).unwrap());
        assert_eq!(semi.team1.team(), Some(field[0]));
        // Seeds 2 and 3 auto-advanced and already face each other.
        let other_semi = draw.node(draw.find(BracketKind::Main, 2, 1).unwrap());
        assert_eq!(other_semi.team1.team(), Some(field[1]));
        assert_eq!(other_semi.team2.team(), Some(field[2]));
        // The only real round-one match is 4 v 5.
        let played = draw.node(round_one[1]);
        assert_eq!(played.team1.team(), Some(field[3]));
        assert_eq!(played.team2.team(), Some(field[4]));
    }

    #[test]
    fn byes_never_stay_pending() {
        for n in 2..=17 {
            let draw = generate_single(&teams(n), false).unwrap();
            for id in draw.ids() {
                let node = draw.node(id);
                let one_sided = node.team1.is_bye() ^ node.team2.is_bye();
                if one_sided && node.round == 1 {
                    assert_eq!(node.status, MatchStatus::Completed);
                    assert!(node.winner_team.is_some());
                }
            }
        }
    }

    #[test]
    fn bronze_match_is_fed_by_both_semifinals() {
        let draw = generate_single(&teams(8), true).unwrap();
        let bronze = draw.find(BracketKind::Main, 3, 1).expect("bronze exists");
        let feeders: Vec<NodeId> = draw
            .ids()
            .filter(|&id| draw.node(id).next_loser_match == Some(bronze))
            .collect();
        assert_eq!(feeders.len(), 2);
        for id in feeders {
            assert_eq!(draw.node(id).round, 2);
        }
        // Not part of the winner chain.
        assert!(draw.node(bronze).next_match.is_none());
    }

    #[test]
    fn no_bronze_for_two_entrant_bracket() {
        let draw = generate_single(&teams(2), true).unwrap();
        assert_eq!(draw.len(), 1);
    }

    #[test]
    fn double_elimination_has_standard_round_widths() {
        let draw = generate_double(&teams(8)).unwrap();
        // Loser rounds for size 8: widths 2, 2, 1, 1.
        assert_eq!(draw.rounds_in(BracketKind::Losers), 4);
        assert_eq!(draw.round_matches(BracketKind::Losers, 1).len(), 2);
        assert_eq!(draw.round_matches(BracketKind::Losers, 2).len(), 2);
        assert_eq!(draw.round_matches(BracketKind::Losers, 3).len(), 1);
        assert_eq!(draw.round_matches(BracketKind::Losers, 4).len(), 1);
        // Main has its 3 rounds plus the grand final.
        assert_eq!(draw.rounds_in(BracketKind::Main), 4);
        assert_eq!(draw.round_matches(BracketKind::Main, 4).len(), 1);
    }

    #[test]
    fn every_real_winners_match_has_a_loser_destination() {
        let draw = generate_double(&teams(8)).unwrap();
        for id in draw.ids() {
            let node = draw.node(id);
            if node.bracket == BracketKind::Main && node.round <= 3 {
                assert!(node.next_loser_match.is_some());
                let target = draw.node(node.next_loser_match.unwrap());
                assert_eq!(target.bracket, BracketKind::Losers);
                let expected_round = if node.round == 1 { 1 } else { 2 * (node.round - 1) };
                assert_eq!(target.round, expected_round);
            }
        }
    }

    #[test]
    fn second_round_drops_are_reversed_to_avoid_quarter_rematches() {
        let draw = generate_double(&teams(16)).unwrap();
        let wb2 = draw.round_matches(BracketKind::Main, 2);
        let lb2 = draw.round_matches(BracketKind::Losers, 2);
        assert_eq!(wb2.len(), 4);
        for (m, &id) in wb2.iter().enumerate() {
            let target = draw.node(id).next_loser_match.unwrap();
            assert_eq!(target, lb2[lb2.len() - 1 - m]);
        }
    }

    #[test]
    fn both_finals_feed_the_grand_final() {
        let draw = generate_double(&teams(8)).unwrap();
        let grand_final = draw.find(BracketKind::Main, 4, 0).unwrap();
        let winners_final = draw.find(BracketKind::Main, 3, 0).unwrap();
        let losers_final = draw.find(BracketKind::Losers, 4, 0).unwrap();
        assert_eq!(draw.node(winners_final).next_match, Some(grand_final));
        assert_eq!(draw.node(losers_final).next_match, Some(grand_final));
        assert_eq!(
            draw.winner_side(winners_final, grand_final),
            Side::Team1
        );
        assert_eq!(draw.winner_side(losers_final, grand_final), Side::Team2);
    }

    #[test]
    fn double_elimination_bye_cascades_into_loser_bracket() {
        // 5 entrants in a size-8 draw: three winners-round byes drop byes
        // into the loser bracket, and the all-bye loser match forfeits.
        let draw = generate_double(&teams(5)).unwrap();
        let lb1 = draw.round_matches(BracketKind::Losers, 1);
        // Feeders of lb1[1] are the 2v7 and 3v6 byes: both drop a bye.
        let forfeited = draw.node(lb1[1]);
        assert_eq!(forfeited.status, MatchStatus::Forfeited);
        assert!(forfeited.winner_team.is_none());
        // The forfeit propagates a bye onward into the major round.
        let lb2 = draw.round_matches(BracketKind::Losers, 2);
        assert!(draw.node(lb2[1]).team1.is_bye() || draw.node(lb2[1]).team2.is_bye());
    }

    #[test]
    fn too_small_fields_are_rejected() {
        assert!(matches!(
            generate_single(&teams(1), false),
            Err(BracketError::InsufficientParticipants { required: 2, actual: 1 })
        ));
        assert!(matches!(
            generate_double(&teams(2)),
            Err(BracketError::InsufficientParticipants { required: 3, actual: 2 })
        ));
    }
}
