use sqlx::PgPool;
use uuid::Uuid;

use crate::bracket::error::BracketError;
use crate::bracket::persistence::BracketRepository;
use crate::bracket::standings::StandingsService;
use crate::bracket::{compass, groups, knockout, progression, seeding, GeneratedBracket};
use crate::models::tournament::{
    BracketResponse, GenerationSummary, Standing, StandingsResponse, Tournament, TournamentType,
};
use crate::models::user::UserRole;

/// The caller on whose behalf a generation or reset runs.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: UserRole,
}

/// Orchestrates bracket generation: loads the tournament and its checked-in
/// field, dispatches to the generator matching the tournament type, and
/// hands the result to the persistence adapter.
pub struct BracketService {
    repo: BracketRepository,
    standings: StandingsService,
}

impl BracketService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repo: BracketRepository::new(pool.clone()),
            standings: StandingsService::new(pool),
        }
    }

    pub async fn generate_knockout(
        &self,
        tournament_id: Uuid,
        actor: Actor,
    ) -> Result<GenerationSummary, BracketError> {
        let tournament = self.load_authorized(tournament_id, actor).await?;
        match tournament.tournament_type {
            TournamentType::KnockoutSingle | TournamentType::KnockoutDouble => {}
            other => {
                return Err(BracketError::TournamentTypeMismatch {
                    id: tournament_id,
                    actual: other.as_str(),
                    expected: "knockout_single or knockout_double",
                })
            }
        }
        self.run_generation(tournament).await
    }

    pub async fn generate_compass(
        &self,
        tournament_id: Uuid,
        actor: Actor,
    ) -> Result<GenerationSummary, BracketError> {
        let tournament = self.load_authorized(tournament_id, actor).await?;
        if tournament.tournament_type != TournamentType::Compass {
            return Err(BracketError::TournamentTypeMismatch {
                id: tournament_id,
                actual: tournament.tournament_type.as_str(),
                expected: "compass",
            });
        }
        self.run_generation(tournament).await
    }

    pub async fn generate_groups(
        &self,
        tournament_id: Uuid,
        actor: Actor,
    ) -> Result<GenerationSummary, BracketError> {
        let tournament = self.load_authorized(tournament_id, actor).await?;
        if tournament.tournament_type != TournamentType::RoundRobin {
            return Err(BracketError::TournamentTypeMismatch {
                id: tournament_id,
                actual: tournament.tournament_type.as_str(),
                expected: "round_robin",
            });
        }
        self.run_generation(tournament).await
    }

    pub async fn reset_bracket(
        &self,
        tournament_id: Uuid,
        actor: Actor,
    ) -> Result<(), BracketError> {
        self.load_authorized(tournament_id, actor).await?;
        self.repo.reset(tournament_id).await
    }

    pub async fn bracket(&self, tournament_id: Uuid) -> Result<BracketResponse, BracketError> {
        let tournament = self
            .repo
            .fetch_tournament(tournament_id)
            .await?
            .ok_or(BracketError::TournamentNotFound(tournament_id))?;
        Ok(self.repo.bracket_view(tournament).await?)
    }

    pub async fn standings(&self, tournament_id: Uuid) -> Result<StandingsResponse, BracketError> {
        self.repo
            .fetch_tournament(tournament_id)
            .await?
            .ok_or(BracketError::TournamentNotFound(tournament_id))?;
        Ok(self.standings.get_standings(tournament_id).await?)
    }

    pub async fn group_standings(
        &self,
        tournament_id: Uuid,
        group_number: i32,
    ) -> Result<Vec<Standing>, BracketError> {
        self.repo
            .fetch_tournament(tournament_id)
            .await?
            .ok_or(BracketError::TournamentNotFound(tournament_id))?;
        Ok(self
            .standings
            .get_group_standings(tournament_id, group_number)
            .await?)
    }

    /// Generation and reset are for the tournament's organizer or an admin.
    async fn load_authorized(
        &self,
        tournament_id: Uuid,
        actor: Actor,
    ) -> Result<Tournament, BracketError> {
        let tournament = self
            .repo
            .fetch_tournament(tournament_id)
            .await?
            .ok_or(BracketError::TournamentNotFound(tournament_id))?;
        if !actor.role.is_admin() && tournament.organizer_id != actor.user_id {
            return Err(BracketError::AccessDenied);
        }
        Ok(tournament)
    }

    async fn run_generation(
        &self,
        tournament: Tournament,
    ) -> Result<GenerationSummary, BracketError> {
        // Early guard; persist() re-checks under the advisory lock.
        if self.repo.rounds_exist(tournament.id).await? {
            return Err(BracketError::RoundsAlreadyExist(tournament.id));
        }

        let participants = self.repo.fetch_checked_in(tournament.id).await?;
        if participants.is_empty() {
            return Err(BracketError::EmptyParticipantList);
        }

        let mode = seeding::parse_mode(&tournament.seeding_mode)?;
        let manual_order = seeding::manual_order_from_seeds(&participants);
        let seeded = seeding::seed(&participants, mode, Some(&manual_order))?;
        let entrants = seeding::pair_teams(&seeded, tournament.is_doubles)?;

        let bracket = match tournament.tournament_type {
            TournamentType::KnockoutSingle => GeneratedBracket::Knockout(
                knockout::generate_single(&entrants, tournament.bronze_match)?,
            ),
            TournamentType::KnockoutDouble => {
                GeneratedBracket::Knockout(knockout::generate_double(&entrants)?)
            }
            TournamentType::Compass => GeneratedBracket::Compass(compass::generate(&entrants)?),
            TournamentType::RoundRobin => {
                let group_count = tournament.group_count.unwrap_or(1).max(1) as u32;
                let top_advance = tournament.top_per_group.unwrap_or(1).max(1) as u32;
                GeneratedBracket::Groups(groups::generate(&entrants, group_count, top_advance)?)
            }
        };

        // Group-stage matches have no progression edges to check.
        if !matches!(bracket, GeneratedBracket::Groups(_)) {
            progression::validate(bracket.draw())?;
        }

        let summary = self.repo.persist(tournament.id, &bracket, &participants).await?;
        tracing::info!(
            "Generated {} bracket for tournament {}: {} rounds, {} matches",
            tournament.tournament_type.as_str(),
            tournament.id,
            summary.rounds_created,
            summary.matches_created
        );
        Ok(summary)
    }
}
