//! Role domain model

/// A named permission grouping attached to users for access control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: i64,
    pub name: String,
}
