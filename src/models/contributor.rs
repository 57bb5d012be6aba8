use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contributor {
    pub id: String,
    pub name: String,
}

/// user id → display name, used to label breakdowns without re-fetching.
#[derive(Debug, Default, Clone)]
pub struct Directory {
    names: HashMap<String, String>,
}

impl Directory {
    pub fn new(contributors: &[Contributor]) -> Self {
        Self {
            names: contributors
                .iter()
                .map(|c| (c.id.clone(), c.name.clone()))
                .collect(),
        }
    }

    /// Display name, falling back to the raw id for unknown users.
    pub fn name_of<'a>(&'a self, user_id: &'a str) -> &'a str {
        self.names.get(user_id).map(String::as_str).unwrap_or(user_id)
    }
}
