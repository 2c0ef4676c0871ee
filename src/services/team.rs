// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team lifecycle: creation, lookup, update, deletion.

use std::sync::Arc;

use crate::db::TeamRepository;
use crate::error::{AppError, Result};
use crate::models::{Identity, Team, TeamMember, TeamResponse, TeamRole};
use crate::services::permission::TeamPermissionValidator;

#[derive(Clone)]
pub struct TeamService {
    teams: Arc<dyn TeamRepository>,
    permissions: TeamPermissionValidator,
}

impl TeamService {
    pub fn new(teams: Arc<dyn TeamRepository>, permissions: TeamPermissionValidator) -> Self {
        Self { teams, permissions }
    }

    /// Create a team with the creator as its first LEADER.
    pub fn create_team(
        &self,
        creator: &Identity,
        name: &str,
        description: &str,
    ) -> Result<TeamResponse> {
        let team = self.teams.insert_team(name, description);
        self.teams
            .insert_member(TeamMember::new(team.id, creator.user_id, TeamRole::Leader))?;

        tracing::info!(team_id = team.id, leader = creator.user_id, "Team created");
        Ok(TeamResponse::new(&team, 1))
    }

    pub fn get_team(&self, team_id: i64, requester_id: i64) -> Result<TeamResponse> {
        let team = self.find_team(team_id)?;
        self.permissions.require_member_with(
            team_id,
            requester_id,
            "You do not have permission to view this team",
        )?;
        Ok(self.to_response(&team))
    }

    pub fn my_teams(&self, user_id: i64) -> Vec<TeamResponse> {
        self.teams
            .teams_of_user(user_id)
            .iter()
            .map(|team| self.to_response(team))
            .collect()
    }

    pub fn update_team(
        &self,
        team_id: i64,
        requester_id: i64,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<TeamResponse> {
        let mut team = self.find_team(team_id)?;
        self.permissions.require_leader_with(
            team_id,
            requester_id,
            "Only a team leader can update the team",
        )?;

        if let Some(name) = name {
            team.name = name.to_string();
        }
        if let Some(description) = description {
            team.description = description.to_string();
        }
        if !self.teams.update_team(&team) {
            return Err(team_not_found(team_id));
        }
        Ok(self.to_response(&team))
    }

    pub fn delete_team(&self, team_id: i64, requester_id: i64) -> Result<()> {
        self.find_team(team_id)?;
        self.permissions.require_leader_with(
            team_id,
            requester_id,
            "Only a team leader can delete the team",
        )?;

        self.teams.delete_team(team_id);
        tracing::info!(team_id, requester_id, "Team deleted");
        Ok(())
    }

    fn find_team(&self, team_id: i64) -> Result<Team> {
        self.teams
            .find_team(team_id)
            .ok_or_else(|| team_not_found(team_id))
    }

    fn to_response(&self, team: &Team) -> TeamResponse {
        TeamResponse::new(team, self.teams.members(team.id).len())
    }
}

pub(crate) fn team_not_found(team_id: i64) -> AppError {
    AppError::service("404-TEAM_NOT_FOUND", format!("Team not found. ID: {team_id}"))
}
