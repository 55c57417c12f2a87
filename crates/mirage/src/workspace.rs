//! Workspaces: tenant scopes that isolate otherwise identical patterns.
//!
//! When the multi-workspace feature is off every operation runs against
//! [`DEFAULT_WORKSPACE_ID`], which is created at startup.

use crate::error::MockError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tenant scope identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct WorkspaceId(pub i64);

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Workspace used for every operation when workspaces are disabled.
pub const DEFAULT_WORKSPACE_ID: WorkspaceId = WorkspaceId(4269);

const DEFAULT_WORKSPACE_NAME: &str = "default";
const DEFAULT_WORKSPACE_DESCRIPTION: &str =
    "Default workspace since workspace feature is disabled!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// All known workspaces, keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkspaceTable {
    workspaces: BTreeMap<WorkspaceId, Workspace>,
    next_id: i64,
}

impl WorkspaceTable {
    pub fn contains(&self, id: WorkspaceId) -> bool {
        self.workspaces.contains_key(&id)
    }

    pub fn get(&self, id: WorkspaceId) -> Option<&Workspace> {
        self.workspaces.get(&id)
    }

    pub fn len(&self) -> usize {
        self.workspaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workspaces.is_empty()
    }

    /// Create a workspace with a fresh id. Names must be non-empty and unique.
    pub fn create(&mut self, name: &str, description: &str) -> Result<WorkspaceId, MockError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MockError::invalid("workspace name cannot be empty."));
        }
        if self.workspaces.values().any(|w| w.name == name) {
            return Err(MockError::conflict(format!(
                "workspace named '{name}' already exists"
            )));
        }

        let id = WorkspaceId(self.allocate_id());
        self.workspaces.insert(
            id,
            Workspace {
                id,
                name: name.to_string(),
                description: description.to_string(),
            },
        );
        Ok(id)
    }

    /// Insert the default workspace unless it is already present.
    /// Returns true when it was created.
    pub fn ensure_default(&mut self) -> bool {
        if self.contains(DEFAULT_WORKSPACE_ID) {
            return false;
        }
        self.workspaces.insert(
            DEFAULT_WORKSPACE_ID,
            Workspace {
                id: DEFAULT_WORKSPACE_ID,
                name: DEFAULT_WORKSPACE_NAME.to_string(),
                description: DEFAULT_WORKSPACE_DESCRIPTION.to_string(),
            },
        );
        self.next_id = self.next_id.max(DEFAULT_WORKSPACE_ID.0);
        true
    }

    /// Zero-based page of workspaces ordered by id.
    pub fn page(&self, page: i64, size: i64) -> Result<Page<Workspace>, MockError> {
        if page < 0 || size < 1 {
            return Err(MockError::invalid(
                "Page must be greater than or equal to 0 and size must be greater than 0",
            ));
        }
        let offset = usize::try_from(page.saturating_mul(size)).unwrap_or(usize::MAX);
        let limit = usize::try_from(size).unwrap_or(usize::MAX);
        let content = self
            .workspaces
            .values()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        Ok(Page::of(content, page, size, self.workspaces.len() as i64))
    }

    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub first: bool,
    pub last: bool,
    pub total_elements: i64,
    pub total_pages: i64,
    pub size: i64,
    pub page: i64,
}

impl<T> Page<T> {
    pub fn of(content: Vec<T>, page: i64, size: i64, total_elements: i64) -> Self {
        let total_pages = if size > 0 {
            total_elements / size + i64::from(total_elements % size != 0)
        } else {
            0
        };
        Self {
            content,
            first: page == 0,
            last: page >= total_pages.saturating_sub(1),
            total_elements,
            total_pages,
            size,
            page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_assigns_increasing_ids() {
        let mut table = WorkspaceTable::default();
        let a = table.create("team1", "first").unwrap();
        let b = table.create("team2", "").unwrap();
        assert!(b > a);
        assert_eq!(table.get(a).unwrap().name, "team1");
    }

    #[test]
    fn test_create_rejects_empty_and_duplicate_names() {
        let mut table = WorkspaceTable::default();
        assert!(matches!(
            table.create("  ", "x"),
            Err(MockError::InvalidInput(_))
        ));
        table.create("team", "x").unwrap();
        assert!(matches!(
            table.create("team", "y"),
            Err(MockError::Conflict(_))
        ));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_default_workspace_is_idempotent() {
        let mut table = WorkspaceTable::default();
        assert!(table.ensure_default());
        assert!(!table.ensure_default());
        assert!(table.contains(DEFAULT_WORKSPACE_ID));

        // Ids handed out afterwards never collide with the default one
        let next = table.create("other", "").unwrap();
        assert!(next > DEFAULT_WORKSPACE_ID);
    }

    #[test]
    fn test_extreme_page_arguments() {
        let mut table = WorkspaceTable::default();
        table.create("a", "").unwrap();
        table.create("b", "").unwrap();

        let page = table.page(0, i64::MAX).unwrap();
        assert_eq!(page.content.len(), 2);
        assert_eq!(page.total_pages, 1);
        assert!(page.first);
        assert!(page.last);

        let page = table.page(i64::MAX, 1).unwrap();
        assert!(page.content.is_empty());
        assert_eq!(page.total_pages, 2);
        assert!(!page.first);
        assert!(page.last);

        let page = table.page(i64::MAX, i64::MAX).unwrap();
        assert!(page.content.is_empty());
        assert!(page.last);
    }

    #[test]
    fn test_single_page() {
        let mut table = WorkspaceTable::default();
        table.create("myWorkspace", "fake work").unwrap();

        let page = table.page(0, 10).unwrap();
        assert_eq!(page.content.len(), 1);
        assert!(page.first);
        assert!(page.last);
        assert_eq!(page.total_elements, 1);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_paging_through_workspaces() {
        let mut table = WorkspaceTable::default();
        for i in 0..5 {
            table.create(&format!("ws{i}"), "").unwrap();
        }

        let second = table.page(1, 2).unwrap();
        assert_eq!(second.content.len(), 2);
        assert_eq!(second.content[0].name, "ws2");
        assert!(!second.first);
        assert!(!second.last);
        assert_eq!(second.total_pages, 3);

        let last = table.page(2, 2).unwrap();
        assert_eq!(last.content.len(), 1);
        assert!(last.last);

        let beyond = table.page(7, 2).unwrap();
        assert!(beyond.content.is_empty());
    }

    #[test]
    fn test_invalid_page_arguments() {
        let table = WorkspaceTable::default();
        assert!(table.page(-1, 10).is_err());
        assert!(table.page(0, 0).is_err());
    }

    #[test]
    fn test_page_serializes_camel_case() {
        let page: Page<Workspace> = Page::of(vec![], 0, 10, 0);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["totalElements"], 0);
        assert_eq!(json["totalPages"], 0);
        assert_eq!(json["first"], true);
    }
}
