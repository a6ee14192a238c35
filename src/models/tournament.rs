// src/models/tournament.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Tournament {
    pub id: Uuid,
    pub name: String,
    pub organizer_id: Uuid,
    pub tournament_type: TournamentType,
    /// Raw seeding mode as stored; parsed (and rejected if unknown) at
    /// generation time.
    pub seeding_mode: String,
    pub bronze_match: bool,
    pub is_doubles: bool,
    pub group_count: Option<i32>,
    pub top_per_group: Option<i32>,
    pub status: TournamentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TournamentType {
    KnockoutSingle,
    KnockoutDouble,
    Compass,
    RoundRobin,
}

impl TournamentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TournamentType::KnockoutSingle => "knockout_single",
            TournamentType::KnockoutDouble => "knockout_double",
            TournamentType::Compass => "compass",
            TournamentType::RoundRobin => "round_robin",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SeedingMode {
    Random,
    Ranked,
    Manual,
}

impl SeedingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeedingMode::Random => "random",
            SeedingMode::Ranked => "ranked",
            SeedingMode::Manual => "manual",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    Pending,
    InProgress,
    Completed,
}

impl TournamentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TournamentStatus::Pending => "pending",
            TournamentStatus::InProgress => "in_progress",
            TournamentStatus::Completed => "completed",
        }
    }
}

/// One checked-in entrant, as the generators consume it. Immutable snapshot
/// of the registration row at generation time.
#[derive(Debug, FromRow, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Participant {
    pub user_id: Uuid,
    pub seed: Option<i32>,
    pub ranking_points: Option<i32>,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct TournamentRound {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub bracket_kind: String,
    pub round_number: i32,
    pub status: RoundStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct TournamentMatch {
    pub id: Uuid,
    pub round_id: Uuid,
    pub group_number: Option<i32>,
    pub team1_player1_id: Option<Uuid>,
    pub team1_player2_id: Option<Uuid>,
    pub team2_player1_id: Option<Uuid>,
    pub team2_player2_id: Option<Uuid>,
    pub status: MatchStatus,
    pub winner_team: Option<i16>,
    pub is_draw: bool,
    pub next_match_id: Option<Uuid>,
    pub next_loser_match_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    InProgress,
    Completed,
    Forfeited,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Pending => "pending",
            MatchStatus::InProgress => "in_progress",
            MatchStatus::Completed => "completed",
            MatchStatus::Forfeited => "forfeited",
        }
    }
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct BracketSlot {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub bracket_kind: String,
    pub round_number: i32,
    pub position: i32,
    pub match_id: Option<Uuid>,
}

#[derive(Debug, FromRow, Serialize, Deserialize, Clone)]
pub struct Standing {
    pub id: Uuid,
    pub tournament_id: Uuid,
    pub user_id: Uuid,
    pub matches_played: i32,
    pub matches_won: i32,
    pub matches_drawn: i32,
    pub matches_lost: i32,
    pub games_won: i32,
    pub games_lost: i32,
    pub points: i32,
    pub fair_play_points: i32,
    pub yellow_cards: i32,
    pub red_cards: i32,
    pub conduct_bonus: i32,
    pub last_updated: DateTime<Utc>,
}

impl Standing {
    /// Game difference, the first tie-breaker in group standings.
    pub fn game_difference(&self) -> i32 {
        self.games_won - self.games_lost
    }
}

// Request/Response DTOs

#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub tournament_id: Uuid,
    pub rounds_created: usize,
    pub matches_created: usize,
    pub slots_created: usize,
    pub standings_created: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BracketResponse {
    pub tournament: Tournament,
    pub brackets: Vec<BracketSection>,
}

/// All rounds and matches of one bracket kind, in layout order.
#[derive(Debug, Serialize, Deserialize)]
pub struct BracketSection {
    pub bracket_kind: String,
    pub rounds: Vec<RoundWithMatches>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoundWithMatches {
    pub round: TournamentRound,
    pub matches: Vec<MatchWithSlot>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchWithSlot {
    #[serde(flatten)]
    pub match_row: TournamentMatch,
    pub position: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StandingsResponse {
    pub tournament_id: Uuid,
    pub standings: Vec<Standing>,
}
