// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Storage layer.
//!
//! Lookups return `Option` for "not found"; callers decide whether absence
//! is fatal. Only constraint violations surface as errors.

pub mod memory;

pub use memory::MemoryDb;

use crate::error::AppError;
use crate::models::{NewUser, Team, TeamMember, TeamRole, User};

/// User storage.
pub trait UserRepository: Send + Sync {
    fn find_by_id(&self, id: i64) -> Option<User>;
    fn find_by_api_key(&self, api_key: &str) -> Option<User>;
    fn find_by_email(&self, email: &str) -> Option<User>;

    /// Store a new user and assign its id. Fails with `409-1` on a duplicate email.
    fn insert(&self, user: NewUser) -> Result<User, AppError>;

    /// Overwrite an existing user record. Returns false if the id is unknown.
    fn update(&self, user: &User) -> bool;
}

/// Team and team-membership storage.
pub trait TeamRepository: Send + Sync {
    fn insert_team(&self, name: &str, description: &str) -> Team;
    fn find_team(&self, team_id: i64) -> Option<Team>;
    fn update_team(&self, team: &Team) -> bool;

    /// Delete a team together with all of its memberships.
    fn delete_team(&self, team_id: i64) -> bool;

    /// Teams the user belongs to, ordered by team id.
    fn teams_of_user(&self, user_id: i64) -> Vec<Team>;

    fn find_member(&self, team_id: i64, user_id: i64) -> Option<TeamMember>;

    /// Members of a team, ordered by join time.
    fn members(&self, team_id: i64) -> Vec<TeamMember>;

    fn count_by_role(&self, team_id: i64, role: TeamRole) -> u64;

    /// Fails with `409-ALREADY_MEMBER` if (team_id, user_id) already exists.
    fn insert_member(&self, member: TeamMember) -> Result<TeamMember, AppError>;

    fn update_member_role(&self, team_id: i64, user_id: i64, role: TeamRole)
        -> Option<TeamMember>;

    fn remove_member(&self, team_id: i64, user_id: i64) -> bool;

    /// Run `f` while holding the team's membership lock.
    ///
    /// Demotions and removals must check the leader count and write inside
    /// the same call, or two concurrent changes can both see a second leader.
    fn with_member_lock(
        &self,
        team_id: i64,
        f: &mut dyn FnMut() -> Result<(), AppError>,
    ) -> Result<(), AppError>;

    fn exists_member(&self, team_id: i64, user_id: i64) -> bool {
        self.find_member(team_id, user_id).is_some()
    }

    fn exists_member_with_role(&self, team_id: i64, user_id: i64, role: TeamRole) -> bool {
        self.find_member(team_id, user_id)
            .is_some_and(|member| member.role == role)
    }
}
