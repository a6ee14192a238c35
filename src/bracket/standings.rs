use sqlx::PgPool;
use uuid::Uuid;

use crate::models::tournament::{Participant, Standing, StandingsResponse};

/// Service responsible for tournament standings.
#[derive(Debug)]
pub struct StandingsService {
    pool: PgPool,
}

impl StandingsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get standings for a tournament, in display order: points descending,
    /// game difference descending. Rows tied on both keep insertion order.
    pub async fn get_standings(&self, tournament_id: Uuid) -> Result<StandingsResponse, sqlx::Error> {
        let standings = sqlx::query_as::<_, Standing>(
            r#"
            SELECT * FROM tournament_standings
            WHERE tournament_id = $1
            ORDER BY points DESC, (games_won - games_lost) DESC, last_updated ASC
            "#,
        )
        .bind(tournament_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(StandingsResponse {
            tournament_id,
            standings,
        })
    }

    /// Get standings restricted to one group of a round-robin stage, same
    /// order as [`get_standings`].
    pub async fn get_group_standings(
        &self,
        tournament_id: Uuid,
        group_number: i32,
    ) -> Result<Vec<Standing>, sqlx::Error> {
        sqlx::query_as::<_, Standing>(
            r#"
            SELECT s.* FROM tournament_standings s
            WHERE s.tournament_id = $1
              AND s.user_id IN (
                SELECT unnest(ARRAY[
                    m.team1_player1_id, m.team1_player2_id,
                    m.team2_player1_id, m.team2_player2_id
                ])
                FROM tournament_matches m
                JOIN tournament_rounds r ON m.round_id = r.id
                WHERE r.tournament_id = $1 AND m.group_number = $2
              )
            ORDER BY s.points DESC, (s.games_won - s.games_lost) DESC
            "#,
        )
        .bind(tournament_id)
        .bind(group_number)
        .fetch_all(&self.pool)
        .await
    }
}

/// Insert one all-zero standings row per checked-in participant, inside the
/// generation transaction so a failed persist leaves no standings behind.
pub(crate) async fn initialize_in_tx(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    tournament_id: Uuid,
    participants: &[Participant],
) -> Result<usize, sqlx::Error> {
    for participant in participants {
        sqlx::query(
            r#"
            INSERT INTO tournament_standings (id, tournament_id, user_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (tournament_id, user_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tournament_id)
        .bind(participant.user_id)
        .execute(&mut **tx)
        .await?;
    }
    tracing::info!(
        "Initialized standings for tournament {} with {} participants",
        tournament_id,
        participants.len()
    );
    Ok(participants.len())
}
