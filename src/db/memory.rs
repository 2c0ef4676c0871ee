// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory storage backed by `DashMap`.
//!
//! Cheap to clone; clones share the same maps.

use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::{TeamRepository, UserRepository};
use crate::error::AppError;
use crate::models::{NewUser, Team, TeamMember, TeamRole, User};

#[derive(Default)]
struct Inner {
    next_user_id: AtomicI64,
    next_team_id: AtomicI64,
    users: DashMap<i64, User>,
    /// email -> user id
    users_by_email: DashMap<String, i64>,
    /// api key -> user id
    users_by_api_key: DashMap<String, i64>,
    teams: DashMap<i64, Team>,
    /// (team_id, user_id) -> membership
    members: DashMap<(i64, i64), TeamMember>,
    /// team_id -> lock serializing leader-reducing membership changes
    member_locks: DashMap<i64, Arc<Mutex<()>>>,
}

/// In-memory database shared across request handlers.
#[derive(Clone, Default)]
pub struct MemoryDb {
    inner: Arc<Inner>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for MemoryDb {
    fn find_by_id(&self, id: i64) -> Option<User> {
        self.inner.users.get(&id).map(|u| u.clone())
    }

    fn find_by_api_key(&self, api_key: &str) -> Option<User> {
        if api_key.is_empty() {
            return None;
        }
        let id = *self.inner.users_by_api_key.get(api_key)?;
        self.find_by_id(id)
    }

    fn find_by_email(&self, email: &str) -> Option<User> {
        let id = *self.inner.users_by_email.get(email)?;
        self.find_by_id(id)
    }

    fn insert(&self, new_user: NewUser) -> Result<User, AppError> {
        let slot = match self.inner.users_by_email.entry(new_user.email.clone()) {
            Entry::Occupied(_) => {
                return Err(AppError::service("409-1", "Email is already registered"))
            }
            Entry::Vacant(slot) => slot,
        };

        let id = self.inner.next_user_id.fetch_add(1, Ordering::Relaxed) + 1;
        let user = User {
            id,
            email: new_user.email,
            password_hash: new_user.password_hash,
            nickname: new_user.nickname,
            is_admin: new_user.is_admin,
            profile_img_url: String::new(),
            api_key: new_user.api_key,
            created_at: Utc::now(),
        };

        self.inner.users.insert(id, user.clone());
        self.inner.users_by_api_key.insert(user.api_key.clone(), id);
        slot.insert(id);

        tracing::debug!(user_id = id, "User stored");
        Ok(user)
    }

    fn update(&self, user: &User) -> bool {
        let Some(mut stored) = self.inner.users.get_mut(&user.id) else {
            return false;
        };
        if stored.api_key != user.api_key {
            self.inner.users_by_api_key.remove(&stored.api_key);
            self.inner.users_by_api_key.insert(user.api_key.clone(), user.id);
        }
        if stored.email != user.email {
            self.inner.users_by_email.remove(&stored.email);
            self.inner.users_by_email.insert(user.email.clone(), user.id);
        }
        *stored = user.clone();
        true
    }
}

impl TeamRepository for MemoryDb {
    fn insert_team(&self, name: &str, description: &str) -> Team {
        let id = self.inner.next_team_id.fetch_add(1, Ordering::Relaxed) + 1;
        let team = Team {
            id,
            name: name.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
        };
        self.inner.teams.insert(id, team.clone());
        team
    }

    fn find_team(&self, team_id: i64) -> Option<Team> {
        self.inner.teams.get(&team_id).map(|t| t.clone())
    }

    fn update_team(&self, team: &Team) -> bool {
        match self.inner.teams.get_mut(&team.id) {
            Some(mut stored) => {
                *stored = team.clone();
                true
            }
            None => false,
        }
    }

    fn delete_team(&self, team_id: i64) -> bool {
        let removed = self.inner.teams.remove(&team_id).is_some();
        self.inner.members.retain(|(tid, _), _| *tid != team_id);
        self.inner.member_locks.remove(&team_id);
        removed
    }

    fn teams_of_user(&self, user_id: i64) -> Vec<Team> {
        let team_ids: Vec<i64> = self
            .inner
            .members
            .iter()
            .filter(|m| m.key().1 == user_id)
            .map(|m| m.key().0)
            .collect();

        let mut teams: Vec<Team> = team_ids
            .into_iter()
            .filter_map(|id| self.find_team(id))
            .collect();
        teams.sort_by_key(|t| t.id);
        teams
    }

    fn find_member(&self, team_id: i64, user_id: i64) -> Option<TeamMember> {
        self.inner
            .members
            .get(&(team_id, user_id))
            .map(|m| m.clone())
    }

    fn members(&self, team_id: i64) -> Vec<TeamMember> {
        let mut members: Vec<TeamMember> = self
            .inner
            .members
            .iter()
            .filter(|m| m.key().0 == team_id)
            .map(|m| m.value().clone())
            .collect();
        members.sort_by_key(|m| (m.joined_at, m.user_id));
        members
    }

    fn count_by_role(&self, team_id: i64, role: TeamRole) -> u64 {
        self.inner
            .members
            .iter()
            .filter(|m| m.key().0 == team_id && m.value().role == role)
            .count() as u64
    }

    fn insert_member(&self, member: TeamMember) -> Result<TeamMember, AppError> {
        match self.inner.members.entry((member.team_id, member.user_id)) {
            Entry::Occupied(_) => Err(AppError::service(
                "409-ALREADY_MEMBER",
                format!("User {} is already a member of this team", member.user_id),
            )),
            Entry::Vacant(slot) => {
                slot.insert(member.clone());
                Ok(member)
            }
        }
    }

    fn update_member_role(
        &self,
        team_id: i64,
        user_id: i64,
        role: TeamRole,
    ) -> Option<TeamMember> {
        let mut member = self.inner.members.get_mut(&(team_id, user_id))?;
        member.role = role;
        Some(member.clone())
    }

    fn remove_member(&self, team_id: i64, user_id: i64) -> bool {
        self.inner.members.remove(&(team_id, user_id)).is_some()
    }

    fn with_member_lock(
        &self,
        team_id: i64,
        f: &mut dyn FnMut() -> Result<(), AppError>,
    ) -> Result<(), AppError> {
        let lock = self.inner.member_locks.entry(team_id).or_default().clone();
        let _held = lock.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }
}
