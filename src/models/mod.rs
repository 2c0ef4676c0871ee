// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod rs_data;
pub mod team;
pub mod user;

pub use rs_data::RsData;
pub use team::{Team, TeamMember, TeamMemberResponse, TeamResponse, TeamRole};
pub use user::{Identity, NewUser, User, UserDto};
