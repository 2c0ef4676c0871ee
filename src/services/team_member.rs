// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team membership management.
//!
//! Every mutation that could remove or demote a LEADER runs
//! [`TeamPermissionValidator::guard_leader_removal`] under the team's
//! membership lock, together with the write it protects.

use std::sync::Arc;

use crate::db::{TeamRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::models::{TeamMember, TeamMemberResponse, TeamRole};
use crate::services::permission::TeamPermissionValidator;
use crate::services::team::team_not_found;

#[derive(Clone)]
pub struct TeamMemberService {
    teams: Arc<dyn TeamRepository>,
    users: Arc<dyn UserRepository>,
    permissions: TeamPermissionValidator,
}

impl TeamMemberService {
    pub fn new(
        teams: Arc<dyn TeamRepository>,
        users: Arc<dyn UserRepository>,
        permissions: TeamPermissionValidator,
    ) -> Self {
        Self {
            teams,
            users,
            permissions,
        }
    }

    pub fn list_members(&self, team_id: i64, requester_id: i64) -> Result<Vec<TeamMemberResponse>> {
        self.permissions.require_member_with(
            team_id,
            requester_id,
            "You do not have permission to view this team's members",
        )?;

        Ok(self
            .teams
            .members(team_id)
            .iter()
            .map(|member| self.to_response(member))
            .collect())
    }

    /// Add a user, looked up by email, to the team.
    pub fn add_member(
        &self,
        team_id: i64,
        email: &str,
        role: TeamRole,
        inviter_id: i64,
    ) -> Result<TeamMemberResponse> {
        self.permissions.require_leader_with(
            team_id,
            inviter_id,
            "You do not have permission to add team members",
        )?;
        self.teams
            .find_team(team_id)
            .ok_or_else(|| team_not_found(team_id))?;

        let user = self.users.find_by_email(email).ok_or_else(|| {
            AppError::service(
                "404-USER_NOT_FOUND",
                format!("No user found with email: {email}"),
            )
        })?;

        if self.teams.exists_member(team_id, user.id) {
            return Err(AppError::service(
                "409-ALREADY_MEMBER",
                format!("Already a member of this team. Email: {}", user.email),
            ));
        }

        let member = self
            .teams
            .insert_member(TeamMember::new(team_id, user.id, role))?;
        tracing::info!(team_id, user_id = user.id, %role, "Team member added");
        Ok(self.to_response(&member))
    }

    /// Change a member's role. Demoting the last LEADER is refused.
    pub fn update_member_role(
        &self,
        team_id: i64,
        user_id: i64,
        new_role: TeamRole,
        requester_id: i64,
    ) -> Result<TeamMemberResponse> {
        self.teams
            .find_team(team_id)
            .ok_or_else(|| team_not_found(team_id))?;
        // Permission check, leader guard and write all run under one lock.
        let mut updated = None;
        self.teams.with_member_lock(team_id, &mut || {
            self.permissions.require_leader_with(
                team_id,
                requester_id,
                "You do not have permission to change member roles",
            )?;

            let current = self
                .teams
                .find_member(team_id, user_id)
                .ok_or_else(|| member_not_found(user_id))?;
            if current.role == TeamRole::Leader && new_role != TeamRole::Leader {
                self.permissions.guard_leader_removal(team_id, user_id)?;
            }

            updated = self.teams.update_member_role(team_id, user_id, new_role);
            Ok(())
        })?;

        let member = updated.ok_or_else(|| member_not_found(user_id))?;
        tracing::info!(team_id, user_id, role = %new_role, "Team member role changed");
        Ok(self.to_response(&member))
    }

    /// Remove a member. Removing the last LEADER is refused.
    pub fn remove_member(&self, team_id: i64, user_id: i64, remover_id: i64) -> Result<()> {
        self.teams
            .find_team(team_id)
            .ok_or_else(|| team_not_found(team_id))?;
        self.teams.with_member_lock(team_id, &mut || {
            self.permissions.require_leader_with(
                team_id,
                remover_id,
                "You do not have permission to remove team members",
            )?;
            self.permissions.guard_leader_removal(team_id, user_id)?;

            if !self.teams.remove_member(team_id, user_id) {
                return Err(member_not_found(user_id));
            }
            Ok(())
        })?;
        tracing::info!(team_id, user_id, remover_id, "Team member removed");
        Ok(())
    }

    fn to_response(&self, member: &TeamMember) -> TeamMemberResponse {
        let user = self.users.find_by_id(member.user_id);
        TeamMemberResponse {
            team_id: member.team_id,
            user_id: member.user_id,
            user_email: user.as_ref().map(|u| u.email.clone()).unwrap_or_default(),
            user_nickname: user.map(|u| u.nickname).unwrap_or_default(),
            role: member.role,
            joined_at: member.joined_at,
        }
    }
}

fn member_not_found(user_id: i64) -> AppError {
    AppError::service(
        "404-MEMBER_NOT_FOUND",
        format!("Team member not found. User ID: {user_id}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryDb;
    use crate::models::NewUser;
    use std::sync::Barrier;
    use std::thread;

    struct Fixture {
        members: TeamMemberService,
        team_id: i64,
        leader: i64,
        member: i64,
    }

    /// Team with members [leader A, member B].
    fn fixture() -> Fixture {
        let db = MemoryDb::new();
        let a = db
            .insert(NewUser::new("a@example.com", "h".into(), "a"))
            .unwrap();
        let b = db
            .insert(NewUser::new("b@example.com", "h".into(), "b"))
            .unwrap();
        db.insert(NewUser::new("c@example.com", "h".into(), "c"))
            .unwrap();

        let team = db.insert_team("core", "");
        db.insert_member(TeamMember::new(team.id, a.id, TeamRole::Leader))
            .unwrap();
        db.insert_member(TeamMember::new(team.id, b.id, TeamRole::Member))
            .unwrap();

        let teams: Arc<dyn TeamRepository> = Arc::new(db.clone());
        let members = TeamMemberService::new(
            teams.clone(),
            Arc::new(db),
            TeamPermissionValidator::new(teams),
        );
        Fixture {
            members,
            team_id: team.id,
            leader: a.id,
            member: b.id,
        }
    }

    #[test]
    fn test_last_leader_cannot_be_removed_until_promotion() {
        let f = fixture();

        let err = f
            .members
            .remove_member(f.team_id, f.leader, f.leader)
            .unwrap_err();
        assert_eq!(err.result_code(), "409-LAST_LEADER_CANNOT_BE_REMOVED");

        f.members
            .update_member_role(f.team_id, f.member, TeamRole::Leader, f.leader)
            .unwrap();
        f.members
            .remove_member(f.team_id, f.leader, f.member)
            .unwrap();

        let remaining = f.members.list_members(f.team_id, f.member).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].role, TeamRole::Leader);
    }

    #[test]
    fn test_last_leader_cannot_be_demoted() {
        let f = fixture();
        let err = f
            .members
            .update_member_role(f.team_id, f.leader, TeamRole::Member, f.leader)
            .unwrap_err();
        assert_eq!(err.result_code(), "409-LAST_LEADER_CANNOT_BE_REMOVED");
    }

    #[test]
    fn test_member_cannot_manage_members() {
        let f = fixture();
        let err = f
            .members
            .add_member(f.team_id, "c@example.com", TeamRole::Member, f.member)
            .unwrap_err();
        assert_eq!(err.result_code(), "403-NO_PERMISSION");

        let err = f
            .members
            .remove_member(f.team_id, f.leader, f.member)
            .unwrap_err();
        assert_eq!(err.result_code(), "403-NO_PERMISSION");
    }

    #[test]
    fn test_add_member_by_email() {
        let f = fixture();
        let added = f
            .members
            .add_member(f.team_id, "c@example.com", TeamRole::Member, f.leader)
            .unwrap();
        assert_eq!(added.user_email, "c@example.com");

        let err = f
            .members
            .add_member(f.team_id, "c@example.com", TeamRole::Member, f.leader)
            .unwrap_err();
        assert_eq!(err.result_code(), "409-ALREADY_MEMBER");

        let err = f
            .members
            .add_member(f.team_id, "nobody@example.com", TeamRole::Member, f.leader)
            .unwrap_err();
        assert_eq!(err.result_code(), "404-USER_NOT_FOUND");
    }

    fn leader_count(f: &Fixture) -> usize {
        f.members
            .list_members(f.team_id, f.leader)
            .or_else(|_| f.members.list_members(f.team_id, f.member))
            .unwrap()
            .iter()
            .filter(|m| m.role == TeamRole::Leader)
            .count()
    }

    #[test]
    fn test_concurrent_mutual_demotion_keeps_a_leader() {
        for _ in 0..200 {
            let f = fixture();
            f.members
                .update_member_role(f.team_id, f.member, TeamRole::Leader, f.leader)
                .unwrap();

            let barrier = Barrier::new(2);
            let (a, b) = thread::scope(|s| {
                let a = s.spawn(|| {
                    barrier.wait();
                    f.members
                        .update_member_role(f.team_id, f.member, TeamRole::Member, f.leader)
                });
                let b = s.spawn(|| {
                    barrier.wait();
                    f.members
                        .update_member_role(f.team_id, f.leader, TeamRole::Member, f.member)
                });
                (a.join().unwrap(), b.join().unwrap())
            });

            assert!(a.is_err() || b.is_err(), "both demotions succeeded");
            assert_eq!(leader_count(&f), 1);
        }
    }

    #[test]
    fn test_concurrent_mutual_removal_keeps_a_leader() {
        for _ in 0..200 {
            let f = fixture();
            f.members
                .update_member_role(f.team_id, f.member, TeamRole::Leader, f.leader)
                .unwrap();

            let barrier = Barrier::new(2);
            let (a, b) = thread::scope(|s| {
                let a = s.spawn(|| {
                    barrier.wait();
                    f.members.remove_member(f.team_id, f.member, f.leader)
                });
                let b = s.spawn(|| {
                    barrier.wait();
                    f.members.remove_member(f.team_id, f.leader, f.member)
                });
                (a.join().unwrap(), b.join().unwrap())
            });

            assert!(a.is_err() || b.is_err(), "both removals succeeded");
            assert_eq!(leader_count(&f), 1);
        }
    }

    #[test]
    fn test_outsider_cannot_list_members() {
        let f = fixture();
        let err = f.members.list_members(f.team_id, 999).unwrap_err();
        assert_eq!(err.result_code(), "403-NO_PERMISSION");
    }
}
