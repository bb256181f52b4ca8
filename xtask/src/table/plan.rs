//! What `up` and `down` should do, decided from the observed table alone.

use taskdeck_core::storage::ATTR_ID;

/// Key layout and status of an existing table, as DescribeTable reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observed {
    pub active: bool,
    pub hash_key: Option<String>,
    pub range_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Up {
    /// No table yet.
    Create,
    /// Keyed on the task id alone; nothing to change.
    Ready,
    /// A table exists under the name but DynamoDB cannot rekey it in place.
    Conflict(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Down {
    Delete,
    Absent,
}

pub fn plan_up(observed: Option<&Observed>) -> Up {
    let Some(table) = observed else {
        return Up::Create;
    };

    if let Some(range) = &table.range_key {
        return Up::Conflict(format!(
            "it has sort key '{range}', tasks are keyed by '{ATTR_ID}' only"
        ));
    }
    match table.hash_key.as_deref() {
        Some(ATTR_ID) | None => Up::Ready,
        Some(other) => Up::Conflict(format!("it is keyed by '{other}', not '{ATTR_ID}'")),
    }
}

pub fn plan_down(observed: Option<&Observed>) -> Down {
    if observed.is_some() {
        Down::Delete
    } else {
        Down::Absent
    }
}

impl Up {
    pub fn summary(&self, table: &str) -> String {
        match self {
            Up::Create => format!("+ {table} (hash key {ATTR_ID}: S, on-demand billing)"),
            Up::Ready => format!("= {table} already exists"),
            Up::Conflict(reason) => format!("! {table} exists but {reason}"),
        }
    }
}

impl Down {
    pub fn summary(&self, table: &str) -> String {
        match self {
            Down::Delete => format!("- {table} and every task stored in it"),
            Down::Absent => format!("= {table} does not exist"),
        }
    }
}
