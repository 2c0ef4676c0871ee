// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team-scoped authorization checks.
//!
//! All checks are read-only. The `require_*` forms raise a structured
//! failure; the `is_*` forms are plain probes.

use std::sync::Arc;

use crate::db::TeamRepository;
use crate::error::{AppError, Result};
use crate::models::TeamRole;

#[derive(Clone)]
pub struct TeamPermissionValidator {
    teams: Arc<dyn TeamRepository>,
}

impl TeamPermissionValidator {
    pub fn new(teams: Arc<dyn TeamRepository>) -> Self {
        Self { teams }
    }

    pub fn require_member(&self, team_id: i64, user_id: i64) -> Result<()> {
        self.require_member_with(team_id, user_id, "You are not a member of this team")
    }

    /// Same as [`Self::require_member`] with a caller-specific message.
    pub fn require_member_with(&self, team_id: i64, user_id: i64, msg: &str) -> Result<()> {
        if !self.is_member(team_id, user_id) {
            return Err(AppError::no_permission(msg));
        }
        Ok(())
    }

    pub fn require_leader(&self, team_id: i64, user_id: i64) -> Result<()> {
        self.require_leader_with(team_id, user_id, "Only a team leader can do this")
    }

    pub fn require_leader_with(&self, team_id: i64, user_id: i64, msg: &str) -> Result<()> {
        if !self.is_leader(team_id, user_id) {
            return Err(AppError::no_permission(msg));
        }
        Ok(())
    }

    pub fn is_member(&self, team_id: i64, user_id: i64) -> bool {
        self.teams.exists_member(team_id, user_id)
    }

    pub fn is_leader(&self, team_id: i64, user_id: i64) -> bool {
        self.teams
            .exists_member_with_role(team_id, user_id, TeamRole::Leader)
    }

    /// Fails on the first user without a membership, naming that user.
    pub fn require_all_members(&self, team_id: i64, user_ids: &[i64]) -> Result<()> {
        for &user_id in user_ids {
            self.require_member_with(
                team_id,
                user_id,
                &format!("User {user_id} is not a member of this team"),
            )?;
        }
        Ok(())
    }

    /// Must pass before removing or demoting a member.
    ///
    /// Fails if the member does not exist, or if the member is the team's
    /// only LEADER.
    pub fn guard_leader_removal(&self, team_id: i64, member_user_id: i64) -> Result<()> {
        let member = self
            .teams
            .find_member(team_id, member_user_id)
            .ok_or_else(|| {
                AppError::service(
                    "404-MEMBER_NOT_FOUND",
                    format!("Team member not found. User ID: {member_user_id}"),
                )
            })?;

        if member.role == TeamRole::Leader
            && self.teams.count_by_role(team_id, TeamRole::Leader) == 1
        {
            tracing::warn!(team_id, user_id = member_user_id, "Refusing to remove last leader");
            return Err(AppError::service(
                "409-LAST_LEADER_CANNOT_BE_REMOVED",
                "The last leader of a team cannot be removed",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDb;
    use crate::models::TeamMember;

    fn setup() -> (MemoryDb, TeamPermissionValidator, i64) {
        let db = MemoryDb::new();
        let team = db.insert_team("core", "");
        db.insert_member(TeamMember::new(team.id, 1, TeamRole::Leader))
            .unwrap();
        db.insert_member(TeamMember::new(team.id, 2, TeamRole::Member))
            .unwrap();
        let validator = TeamPermissionValidator::new(Arc::new(db.clone()));
        (db, validator, team.id)
    }

    #[test]
    fn test_member_checks() {
        let (_, validator, team) = setup();

        assert!(validator.require_member(team, 1).is_ok());
        assert!(validator.require_member(team, 2).is_ok());
        assert!(validator.is_member(team, 2));

        assert!(!validator.is_member(team, 3));
        let err = validator.require_member(team, 3).unwrap_err();
        assert_eq!(err.result_code(), "403-NO_PERMISSION");
    }

    #[test]
    fn test_leader_checks() {
        let (_, validator, team) = setup();

        assert!(validator.is_leader(team, 1));
        assert!(!validator.is_leader(team, 2));
        assert!(validator.require_leader(team, 1).is_ok());
        assert_eq!(
            validator.require_leader(team, 2).unwrap_err().result_code(),
            "403-NO_PERMISSION"
        );
    }

    #[test]
    fn test_require_all_members_names_first_outsider() {
        let (_, validator, team) = setup();

        assert!(validator.require_all_members(team, &[1, 2]).is_ok());
        assert!(validator.require_all_members(team, &[]).is_ok());

        let err = validator.require_all_members(team, &[1, 7, 8]).unwrap_err();
        assert!(err.to_string().contains("User 7"));
    }

    #[test]
    fn test_guard_last_leader() {
        let (db, validator, team) = setup();

        let err = validator.guard_leader_removal(team, 1).unwrap_err();
        assert_eq!(err.result_code(), "409-LAST_LEADER_CANNOT_BE_REMOVED");

        // Removing a plain member is always allowed
        assert!(validator.guard_leader_removal(team, 2).is_ok());

        db.update_member_role(team, 2, TeamRole::Leader).unwrap();
        assert!(validator.guard_leader_removal(team, 1).is_ok());
        assert!(validator.guard_leader_removal(team, 2).is_ok());
    }

    #[test]
    fn test_guard_missing_member() {
        let (_, validator, team) = setup();
        let err = validator.guard_leader_removal(team, 99).unwrap_err();
        assert_eq!(err.result_code(), "404-MEMBER_NOT_FOUND");
    }
}
