// Compass-draw properties: quadrant existence follows main-draw depth, and
// losers land only in the quadrant matching the round they lost.
use padelpoint_backend::bracket::draw::{BracketKind, Team};
use padelpoint_backend::bracket::{compass, knockout, progression};
use padelpoint_backend::models::tournament::MatchStatus;
use uuid::Uuid;

fn field(n: usize) -> Vec<Team> {
    (0..n).map(|_| Team::singles(Uuid::new_v4())).collect()
}

#[test]
fn four_entrant_draw_has_east_and_an_empty_west() {
    let result = compass::generate(&field(4)).unwrap();

    let east = result.quadrant(BracketKind::East).expect("east exists");
    assert_eq!(east.matches.len(), 1);

    // The final produces one loser: West exists but holds no matches.
    let west = result.quadrant(BracketKind::West).expect("west exists");
    assert!(west.matches.is_empty());

    assert!(result.quadrant(BracketKind::Northeast).is_none());
    assert!(result.quadrant(BracketKind::Southeast).is_none());
    assert!(result.quadrant(BracketKind::Northwest).is_none());
    assert!(result.quadrant(BracketKind::Southwest).is_none());
}

#[test]
fn quadrant_counts_track_main_draw_depth() {
    for n in [2usize, 4, 8, 16, 32, 64] {
        let result = compass::generate(&field(n)).unwrap();
        let main_rounds = knockout::bracket_size(n).trailing_zeros() as usize;

        let existing = result.quadrants.iter().flatten().count();
        let populated = result
            .quadrants
            .iter()
            .flatten()
            .filter(|q| !q.matches.is_empty())
            .count();

        assert_eq!(existing, main_rounds.min(6), "existence for {n} entrants");
        assert_eq!(
            populated,
            (main_rounds - 1).min(6),
            "populated quadrants for {n} entrants"
        );
    }
}

#[test]
fn round_losers_land_in_their_quadrant_only() {
    let seeds = field(16);
    let result = compass::generate(&seeds).unwrap();
    let mut draw = result.draw;

    // Round one: favorites win, losers are every team2.
    let mut round_losers: Vec<Team> = Vec::new();
    for id in draw.round_matches(BracketKind::Main, 1) {
        round_losers.push(draw.node(id).team2.team().unwrap());
        progression::apply_result(&mut draw, id, 1).unwrap();
    }

    let in_quadrant = |draw: &padelpoint_backend::bracket::draw::Draw,
                       kind: BracketKind,
                       team: Team| {
        draw.nodes()
            .iter()
            .filter(|n| n.bracket == kind)
            .any(|n| n.team1.team() == Some(team) || n.team2.team() == Some(team))
    };

    for loser in &round_losers {
        assert!(in_quadrant(&draw, BracketKind::East, *loser));
        for other in [
            BracketKind::West,
            BracketKind::Northeast,
            BracketKind::Southeast,
        ] {
            assert!(!in_quadrant(&draw, other, *loser));
        }
    }

    // Round two losers go West, not East.
    for id in draw.round_matches(BracketKind::Main, 2) {
        let loser = draw.node(id).team2.team().unwrap();
        progression::apply_result(&mut draw, id, 1).unwrap();
        assert!(in_quadrant(&draw, BracketKind::West, loser));
        assert!(!in_quadrant(&draw, BracketKind::East, loser));
    }
}

#[test]
fn consolation_brackets_progress_like_small_knockouts() {
    let seeds = field(8);
    let result = compass::generate(&seeds).unwrap();
    let mut draw = result.draw;

    for id in draw.round_matches(BracketKind::Main, 1) {
        progression::apply_result(&mut draw, id, 1).unwrap();
    }
    // East now holds the four round-one losers across two matches; playing
    // one pushes its winner into the East final.
    let east_round_one = draw.round_matches(BracketKind::East, 1);
    assert_eq!(east_round_one.len(), 2);
    let winner = draw.node(east_round_one[0]).team1.team().unwrap();
    progression::apply_result(&mut draw, east_round_one[0], 1).unwrap();

    let east_final = draw
        .find(BracketKind::East, 2, 0)
        .expect("east has a final");
    assert_eq!(draw.node(east_final).team1.team(), Some(winner));
}

#[test]
fn compass_draw_validates_for_many_sizes() {
    for n in 2..=33 {
        let result = compass::generate(&field(n)).unwrap();
        progression::validate(&result.draw).unwrap();
    }
}

#[test]
fn odd_field_byes_stay_out_of_the_main_rounds() {
    let result = compass::generate(&field(6)).unwrap();
    let draw = &result.draw;
    // Byes completed their round-one matches at generation time.
    for id in draw.round_matches(BracketKind::Main, 1) {
        let node = draw.node(id);
        if node.team1.is_bye() || node.team2.is_bye() {
            assert_eq!(node.status, MatchStatus::Completed);
        }
    }
}
