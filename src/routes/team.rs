// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Team and team-member routes. All require a resolved caller.

use axum::{
    extract::State,
    routing::{get, patch},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::context::Actor;
use crate::error::Result;
use crate::models::{RsData, TeamMemberResponse, TeamResponse, TeamRole};
use crate::AppState;

use super::{validate_request, ApiJson, ApiPath};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/v1/teams", get(my_teams).post(create_team))
        .route(
            "/api/v1/teams/{team_id}",
            get(get_team).patch(update_team).delete(delete_team),
        )
        .route(
            "/api/v1/teams/{team_id}/members",
            get(list_members).post(add_member),
        )
        .route(
            "/api/v1/teams/{team_id}/members/{user_id}",
            patch(update_member_role).delete(remove_member),
        )
}

// ─── Teams ───────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct CreateTeamRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub description: String,
}

async fn create_team(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    ApiJson(req): ApiJson<CreateTeamRequest>,
) -> Result<Json<RsData<TeamResponse>>> {
    validate_request(&req)?;
    let team = state
        .team_service
        .create_team(&actor, &req.name, &req.description)?;
    Ok(Json(RsData::success("Team created", team)))
}

async fn my_teams(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
) -> Json<RsData<Vec<TeamResponse>>> {
    let teams = state.team_service.my_teams(actor.user_id);
    Json(RsData::success("Teams loaded", teams))
}

async fn get_team(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    ApiPath(team_id): ApiPath<i64>,
) -> Result<Json<RsData<TeamResponse>>> {
    let team = state.team_service.get_team(team_id, actor.user_id)?;
    Ok(Json(RsData::success("Team loaded", team)))
}

#[derive(Deserialize, Validate)]
pub struct UpdateTeamRequest {
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

async fn update_team(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    ApiPath(team_id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateTeamRequest>,
) -> Result<Json<RsData<TeamResponse>>> {
    validate_request(&req)?;
    let team = state.team_service.update_team(
        team_id,
        actor.user_id,
        req.name.as_deref(),
        req.description.as_deref(),
    )?;
    Ok(Json(RsData::success("Team updated", team)))
}

async fn delete_team(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    ApiPath(team_id): ApiPath<i64>,
) -> Result<Json<RsData<()>>> {
    state.team_service.delete_team(team_id, actor.user_id)?;
    Ok(Json(RsData::new("200-OK", "Team deleted")))
}

// ─── Members ─────────────────────────────────────────────────

async fn list_members(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    ApiPath(team_id): ApiPath<i64>,
) -> Result<Json<RsData<Vec<TeamMemberResponse>>>> {
    let members = state
        .team_member_service
        .list_members(team_id, actor.user_id)?;
    Ok(Json(RsData::success("Team members loaded", members)))
}

#[derive(Deserialize, Validate)]
pub struct AddMemberRequest {
    #[validate(email)]
    pub email: String,
    #[serde(default = "default_role")]
    pub role: TeamRole,
}

fn default_role() -> TeamRole {
    TeamRole::Member
}

async fn add_member(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    ApiPath(team_id): ApiPath<i64>,
    ApiJson(req): ApiJson<AddMemberRequest>,
) -> Result<Json<RsData<TeamMemberResponse>>> {
    validate_request(&req)?;
    let member = state
        .team_member_service
        .add_member(team_id, &req.email, req.role, actor.user_id)?;
    Ok(Json(RsData::success("Team member added", member)))
}

#[derive(Deserialize)]
pub struct UpdateRoleRequest {
    pub role: TeamRole,
}

async fn update_member_role(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    ApiPath((team_id, user_id)): ApiPath<(i64, i64)>,
    ApiJson(req): ApiJson<UpdateRoleRequest>,
) -> Result<Json<RsData<TeamMemberResponse>>> {
    let member = state.team_member_service.update_member_role(
        team_id,
        user_id,
        req.role,
        actor.user_id,
    )?;
    Ok(Json(RsData::success("Team member role updated", member)))
}

async fn remove_member(
    State(state): State<Arc<AppState>>,
    Actor(actor): Actor,
    ApiPath((team_id, user_id)): ApiPath<(i64, i64)>,
) -> Result<Json<RsData<()>>> {
    state
        .team_member_service
        .remove_member(team_id, user_id, actor.user_id)?;
    Ok(Json(RsData::new("200-OK", "Team member removed")))
}
