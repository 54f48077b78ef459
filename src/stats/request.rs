//! Stats Request & Filter
//!
//! A stats request names the follower indices the caller is interested in. An empty request
//! means every follower task currently known. Names match follower indices by exact string
//! equality; patterns are not supported and are rejected up front.

use super::registry::FollowerTaskDescriptor;
use crate::error::{StatsError, StatsResult};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Characters that would make a name look like a pattern or a list.
const RESERVED_CHARS: [char; 2] = ['*', ','];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsRequest {
    indices: BTreeSet<String>,
}

impl StatsRequest {
    /// A request for every follower task.
    pub fn all() -> Self {
        Self::default()
    }

    /// A request scoped to the given follower indices.
    ///
    /// Names are trimmed and duplicates collapse. Blank names and names containing
    /// pattern or list characters are rejected.
    pub fn for_indices<I, S>(indices: I) -> StatsResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names = BTreeSet::new();
        for raw in indices {
            let name = raw.as_ref().trim();
            if name.is_empty() {
                return Err(StatsError::InvalidRequest {
                    reason: "index name must not be empty".to_string(),
                });
            }
            if let Some(c) = name.chars().find(|c| RESERVED_CHARS.contains(c)) {
                return Err(StatsError::InvalidRequest {
                    reason: format!("index name [{}] must not contain '{}'", name, c),
                });
            }
            names.insert(name.to_string());
        }
        Ok(Self { indices: names })
    }

    /// Parses the comma-separated `indices` query parameter. Absent or empty means all.
    pub fn from_query(indices: Option<&str>) -> StatsResult<Self> {
        match indices {
            None => Ok(Self::all()),
            Some(list) if list.trim().is_empty() => Ok(Self::all()),
            Some(list) => Self::for_indices(list.split(',')),
        }
    }

    pub fn is_all(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> impl Iterator<Item = &str> {
        self.indices.iter().map(String::as_str)
    }

    pub fn matches(&self, follower_index: &str) -> bool {
        self.is_all() || self.indices.contains(follower_index)
    }

    /// Keeps the descriptors whose follower index this request selects.
    pub fn filter(&self, tasks: Vec<FollowerTaskDescriptor>) -> Vec<FollowerTaskDescriptor> {
        if self.is_all() {
            return tasks;
        }
        tasks
            .into_iter()
            .filter(|task| self.matches(&task.follower_index))
            .collect()
    }
}
