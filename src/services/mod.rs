// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod permission;
pub mod team;
pub mod team_member;
pub mod token;
pub mod user;

pub use permission::TeamPermissionValidator;
pub use team::TeamService;
pub use team_member::TeamMemberService;
pub use token::{TokenPayload, TokenService};
pub use user::UserService;
