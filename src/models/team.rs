// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team and membership models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a user within a team.
///
/// Serialized upper case; accepted in any case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TeamRole {
    Leader,
    Member,
}

impl fmt::Display for TeamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TeamRole::Leader => f.write_str("LEADER"),
            TeamRole::Member => f.write_str("MEMBER"),
        }
    }
}

impl FromStr for TeamRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("leader") {
            Ok(TeamRole::Leader)
        } else if s.eq_ignore_ascii_case("member") {
            Ok(TeamRole::Member)
        } else {
            Err(format!("Invalid team role: {s}"))
        }
    }
}

impl<'de> Deserialize<'de> for TeamRole {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Membership row. Unique per (team_id, user_id).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub team_id: i64,
    pub user_id: i64,
    pub role: TeamRole,
    pub joined_at: DateTime<Utc>,
}

impl TeamMember {
    pub fn new(team_id: i64, user_id: i64, role: TeamRole) -> Self {
        Self {
            team_id,
            user_id,
            role,
            joined_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub member_count: usize,
}

impl TeamResponse {
    pub fn new(team: &Team, member_count: usize) -> Self {
        Self {
            id: team.id,
            name: team.name.clone(),
            description: team.description.clone(),
            created_at: team.created_at,
            member_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberResponse {
    pub team_id: i64,
    pub user_id: i64,
    pub user_email: String,
    pub user_nickname: String,
    pub role: TeamRole,
    pub joined_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!("leader".parse::<TeamRole>().unwrap(), TeamRole::Leader);
        assert_eq!("MEMBER".parse::<TeamRole>().unwrap(), TeamRole::Member);
        assert!("owner".parse::<TeamRole>().is_err());
    }

    #[test]
    fn test_role_serializes_upper_case() {
        assert_eq!(
            serde_json::to_string(&TeamRole::Leader).unwrap(),
            "\"LEADER\""
        );
        let role: TeamRole = serde_json::from_str("\"MEMBER\"").unwrap();
        assert_eq!(role, TeamRole::Member);
        let role: TeamRole = serde_json::from_str("\"leader\"").unwrap();
        assert_eq!(role, TeamRole::Leader);
        assert!(serde_json::from_str::<TeamRole>("\"owner\"").is_err());
    }
}
