use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::bracket::draw::BracketKind;
use crate::bracket::error::BracketError;
use crate::bracket::{standings, GeneratedBracket};
use crate::models::tournament::{
    BracketResponse, BracketSection, BracketSlot, GenerationSummary, MatchWithSlot, Participant,
    RoundWithMatches, Tournament, TournamentMatch, TournamentRound,
};

/// Storage adapter for the bracket engine: loads the inputs of a generation
/// run and flattens a generated draw into rounds, matches, slots and
/// standings in one transaction.
pub struct BracketRepository {
    pool: PgPool,
}

impl BracketRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn fetch_tournament(&self, id: Uuid) -> Result<Option<Tournament>, sqlx::Error> {
        sqlx::query_as::<_, Tournament>("SELECT * FROM tournaments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// The immutable participant snapshot a generation run consumes: only
    /// checked-in registrations, in check-in order.
    pub async fn fetch_checked_in(&self, tournament_id: Uuid) -> Result<Vec<Participant>, sqlx::Error> {
        sqlx::query_as::<_, Participant>(
            r#"
            SELECT user_id, seed, ranking_points
            FROM tournament_registrations
            WHERE tournament_id = $1 AND status = 'checked_in'
            ORDER BY created_at
            "#,
        )
        .bind(tournament_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn rounds_exist(&self, tournament_id: Uuid) -> Result<bool, sqlx::Error> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM tournament_rounds WHERE tournament_id = $1")
                .bind(tournament_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    /// Persist a generated bracket. The whole pass rides one transaction
    /// under an advisory lock keyed on the tournament id, and the
    /// already-generated guard is re-checked after the lock is held, so two
    /// concurrent generation calls cannot both insert. Any failure rolls the
    /// entire attempt back.
    pub async fn persist(
        &self,
        tournament_id: Uuid,
        bracket: &GeneratedBracket,
        participants: &[Participant],
    ) -> Result<GenerationSummary, BracketError> {
        let draw = bracket.draw();
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(advisory_key(tournament_id))
            .execute(&mut *tx)
            .await?;

        let existing: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM tournament_rounds WHERE tournament_id = $1")
                .bind(tournament_id)
                .fetch_one(&mut *tx)
                .await?;
        if existing > 0 {
            return Err(BracketError::RoundsAlreadyExist(tournament_id));
        }

        // Rounds first: matches reference them.
        let mut round_ids: HashMap<(BracketKind, u32), Uuid> = HashMap::new();
        for node in draw.nodes() {
            round_ids
                .entry((node.bracket, node.round))
                .or_insert_with(Uuid::new_v4);
        }
        let mut rounds: Vec<(&(BracketKind, u32), &Uuid)> = round_ids.iter().collect();
        rounds.sort_by_key(|((kind, number), _)| (kind.as_str(), *number));
        for ((kind, number), round_id) in rounds {
            sqlx::query(
                r#"
                INSERT INTO tournament_rounds (id, tournament_id, bracket_kind, round_number)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(round_id)
            .bind(tournament_id)
            .bind(kind.as_str())
            .bind(*number as i32)
            .execute(&mut *tx)
            .await?;
        }

        for node in draw.nodes() {
            let team1 = node.team1.team();
            let team2 = node.team2.team();
            sqlx::query(
                r#"
                INSERT INTO tournament_matches (
                    id, round_id, group_number,
                    team1_player1_id, team1_player2_id,
                    team2_player1_id, team2_player2_id,
                    status, winner_team, is_draw,
                    next_match_id, next_loser_match_id
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, FALSE, $10, $11)
                "#,
            )
            .bind(node.id)
            .bind(round_ids[&(node.bracket, node.round)])
            .bind(node.group.map(|g| g as i32))
            .bind(team1.map(|t| t.player1))
            .bind(team1.and_then(|t| t.player2))
            .bind(team2.map(|t| t.player1))
            .bind(team2.and_then(|t| t.player2))
            .bind(node.status.as_str())
            .bind(node.winner_team.map(|w| w as i16))
            .bind(node.next_match.map(|t| draw.node(t).id))
            .bind(node.next_loser_match.map(|t| draw.node(t).id))
            .execute(&mut *tx)
            .await?;
        }

        for node in draw.nodes() {
            sqlx::query(
                r#"
                INSERT INTO bracket_slots (
                    id, tournament_id, bracket_kind, round_number, position, match_id
                ) VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(tournament_id)
            .bind(node.bracket.as_str())
            .bind(node.round as i32)
            .bind(node.position as i32)
            .bind(node.id)
            .execute(&mut *tx)
            .await?;
        }

        let standings_created =
            standings::initialize_in_tx(&mut tx, tournament_id, participants).await?;

        sqlx::query(
            "UPDATE tournaments SET status = 'in_progress', updated_at = NOW() WHERE id = $1",
        )
        .bind(tournament_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(GenerationSummary {
            tournament_id,
            rounds_created: round_ids.len(),
            matches_created: draw.len(),
            slots_created: draw.len(),
            standings_created,
        })
    }

    /// Delete everything a generation run created, in one transaction, and
    /// put the tournament back into pending. This is the explicit reset a
    /// regeneration requires; generation itself never overwrites.
    pub async fn reset(&self, tournament_id: Uuid) -> Result<(), BracketError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(advisory_key(tournament_id))
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM bracket_slots WHERE tournament_id = $1")
            .bind(tournament_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            r#"
            DELETE FROM tournament_matches m
            USING tournament_rounds r
            WHERE m.round_id = r.id AND r.tournament_id = $1
            "#,
        )
        .bind(tournament_id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM tournament_rounds WHERE tournament_id = $1")
            .bind(tournament_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM tournament_standings WHERE tournament_id = $1")
            .bind(tournament_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE tournaments SET status = 'pending', updated_at = NOW() WHERE id = $1")
            .bind(tournament_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!("Reset bracket for tournament {}", tournament_id);
        Ok(())
    }

    /// The visualization read model: every bracket kind with its rounds,
    /// matches and layout positions.
    pub async fn bracket_view(&self, tournament: Tournament) -> Result<BracketResponse, sqlx::Error> {
        let rounds = sqlx::query_as::<_, TournamentRound>(
            r#"
            SELECT * FROM tournament_rounds
            WHERE tournament_id = $1
            ORDER BY bracket_kind, round_number
            "#,
        )
        .bind(tournament.id)
        .fetch_all(&self.pool)
        .await?;

        let matches = sqlx::query_as::<_, TournamentMatch>(
            r#"
            SELECT m.* FROM tournament_matches m
            JOIN tournament_rounds r ON m.round_id = r.id
            WHERE r.tournament_id = $1
            "#,
        )
        .bind(tournament.id)
        .fetch_all(&self.pool)
        .await?;

        let slots = sqlx::query_as::<_, BracketSlot>(
            r#"
            SELECT * FROM bracket_slots
            WHERE tournament_id = $1
            ORDER BY bracket_kind, round_number, position
            "#,
        )
        .bind(tournament.id)
        .fetch_all(&self.pool)
        .await?;

        let position_of: HashMap<Uuid, i32> = slots
            .iter()
            .filter_map(|s| s.match_id.map(|m| (m, s.position)))
            .collect();
        let mut by_round: HashMap<Uuid, Vec<MatchWithSlot>> = HashMap::new();
        for match_row in matches {
            let position = position_of.get(&match_row.id).copied().unwrap_or(0);
            by_round
                .entry(match_row.round_id)
                .or_default()
                .push(MatchWithSlot {
                    match_row,
                    position,
                });
        }

        let mut brackets: Vec<BracketSection> = Vec::new();
        for round in rounds {
            let mut matches = by_round.remove(&round.id).unwrap_or_default();
            matches.sort_by_key(|m| m.position);

            let same_section = brackets
                .last()
                .map(|s| s.bracket_kind == round.bracket_kind)
                .unwrap_or(false);
            if !same_section {
                brackets.push(BracketSection {
                    bracket_kind: round.bracket_kind.clone(),
                    rounds: Vec::new(),
                });
            }
            if let Some(section) = brackets.last_mut() {
                section.rounds.push(RoundWithMatches { round, matches });
            }
        }

        Ok(BracketResponse {
            tournament,
            brackets,
        })
    }
}

/// Advisory-lock key for a tournament: the first eight bytes of its id.
/// Stable across processes, which is all the serialization needs.
fn advisory_key(tournament_id: Uuid) -> i64 {
    let bytes = tournament_id.as_bytes();
    i64::from_le_bytes(bytes[..8].try_into().expect("uuid has 16 bytes"))
}
