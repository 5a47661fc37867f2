//! Capability table — which backend category conventionally serves which tools.
//!
//! Pure data. Order matters: categories are consulted first to last, so two
//! categories claiming the same tool resolve to the earlier one.

use serde::{Deserialize, Serialize};

/// One backend category and the tools it conventionally provides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityCategory {
    pub name: String,
    pub tools: Vec<String>,
}

impl CapabilityCategory {
    pub fn provides(&self, tool: &str) -> bool {
        self.tools.iter().any(|t| t == tool)
    }
}

/// Ordered category → tools table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityTable {
    categories: Vec<CapabilityCategory>,
}

impl CapabilityTable {
    /// Empty table; inference never matches.
    pub fn empty() -> Self {
        Self {
            categories: Vec::new(),
        }
    }

    /// Append a category. An existing category of the same name keeps its
    /// position and gets the new tool set.
    pub fn with_category<I, S>(mut self, name: impl Into<String>, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(name, tools);
        self
    }

    pub fn insert<I, S>(&mut self, name: impl Into<String>, tools: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let tools: Vec<String> = tools.into_iter().map(Into::into).collect();
        match self.categories.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.tools = tools,
            None => self.categories.push(CapabilityCategory { name, tools }),
        }
    }

    pub fn categories(&self) -> &[CapabilityCategory] {
        &self.categories
    }

    /// Categories claiming `tool`, in table order.
    pub fn categories_for<'a>(&'a self, tool: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.categories
            .iter()
            .filter(move |c| c.provides(tool))
            .map(|c| c.name.as_str())
    }

    /// Tools listed for a category.
    pub fn tools_for(&self, category: &str) -> &[String] {
        self.categories
            .iter()
            .find(|c| c.name == category)
            .map(|c| c.tools.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for CapabilityTable {
    /// Conventional tool sets of the reference MCP servers.
    fn default() -> Self {
        Self::empty()
            .with_category(
                "filesystem",
                [
                    "read_file",
                    "write_file",
                    "edit_file",
                    "list_directory",
                    "search_files",
                    "get_file_info",
                    "list_allowed_directories",
                ],
            )
            .with_category(
                "git",
                [
                    "git_status",
                    "git_diff_staged",
                    "git_commit",
                    "git_add",
                    "git_reset",
                    "git_log",
                    "git_diff_unstaged",
                    "git_show",
                ],
            )
            .with_category(
                "memory",
                [
                    "create_entities",
                    "create_relations",
                    "add_observations",
                    "delete_entities",
                    "search_nodes",
                    "open_nodes",
                    "read_graph",
                ],
            )
            .with_category("sequential-thinking", ["sequentialthinking"])
            .with_category(
                "github",
                [
                    "create_or_update_file",
                    "search_repositories",
                    "create_issue",
                    "create_pull_request",
                    "list_commits",
                    "get_file_contents",
                ],
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_order() {
        let table = CapabilityTable::default();
        let names: Vec<&str> = table.categories().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["filesystem", "git", "memory", "sequential-thinking", "github"]
        );
        assert!(table.tools_for("git").contains(&"git_log".to_string()));
        assert!(table.tools_for("nope").is_empty());
    }

    #[test]
    fn test_categories_for_preserves_order() {
        let table = CapabilityTable::empty()
            .with_category("primary", ["search"])
            .with_category("other", ["read"])
            .with_category("fallback", ["search"]);
        let hits: Vec<&str> = table.categories_for("search").collect();
        assert_eq!(hits, vec!["primary", "fallback"]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut table = CapabilityTable::empty()
            .with_category("a", ["x"])
            .with_category("b", ["y"]);
        table.insert("a", ["z"]);
        assert_eq!(table.categories()[0].name, "a");
        assert_eq!(table.tools_for("a"), ["z".to_string()]);
        assert_eq!(table.categories().len(), 2);
    }

    #[test]
    fn test_serializes_as_ordered_list() {
        let table = CapabilityTable::empty().with_category("git", ["git_log"]);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "name": "git", "tools": ["git_log"] }])
        );
        let back: CapabilityTable = serde_json::from_value(json).unwrap();
        assert_eq!(back, table);
    }
}
