// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! ANT-style public path matching.
//!
//! `*` matches within one path segment, `**` spans segments, `?` matches a
//! single character.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::config::ConfigError;

#[derive(Debug, Clone)]
pub struct PublicPaths {
    set: GlobSet,
}

impl PublicPaths {
    pub fn new<I, S>(patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let glob = GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|e| ConfigError::InvalidPattern {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                })?;
            builder.add(glob);
        }

        let set = builder.build().map_err(|e| ConfigError::InvalidPattern {
            pattern: "<set>".to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { set })
    }

    pub fn matches(&self, path: &str) -> bool {
        self.set.is_match(path)
    }
}
