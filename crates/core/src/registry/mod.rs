//! Command registry tree
//!
//! A named hierarchy of groups and leaf commands. Every node is either a
//! group (ordered children, no command) or a leaf (a command, no children).
//! The tree is assembled once through [`RegistryBuilder`] and frozen into a
//! [`CommandRegistry`], which is only ever read afterwards and can be shared
//! across concurrent executions without locking.

use std::fmt;
use std::sync::Arc;

use cloudcmd_common::validation::{FieldValidator, StringValidator};
use thiserror::Error;

use crate::pipeline::Command;

/// Registration and resolution failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Command not found: {path}")]
    NotFound { path: String },

    /// The path names a group rather than a leaf
    #[error("'{path}' is a command group; available subcommands: {}", .subcommands.join(", "))]
    AmbiguousPath { path: String, subcommands: Vec<String> },

    #[error("A command is already registered at '{path}'")]
    DuplicateRegistration { path: String },

    /// A leaf would sit under another leaf, or replace a group
    #[error("'{path}' conflicts with an existing {existing}")]
    PathConflict { path: String, existing: &'static str },

    #[error("Invalid command name '{name}': {reason}")]
    InvalidName { name: String, reason: String },
}

enum NodeKind {
    Group(Vec<CommandNode>),
    Leaf(Arc<dyn Command>),
}

/// A group or leaf in the command tree
pub struct CommandNode {
    name: String,
    description: String,
    kind: NodeKind,
}

impl CommandNode {
    fn group(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            kind: NodeKind::Group(Vec::new()),
        }
    }

    fn leaf(name: &str, command: Arc<dyn Command>) -> Self {
        Self {
            name: name.to_string(),
            description: command.description().to_string(),
            kind: NodeKind::Leaf(command),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub const fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group(_))
    }

    /// The executable attached to a leaf
    pub fn command(&self) -> Option<&Arc<dyn Command>> {
        match &self.kind {
            NodeKind::Leaf(command) => Some(command),
            NodeKind::Group(_) => None,
        }
    }

    /// Children in registration order; empty for a leaf
    pub fn children(&self) -> &[CommandNode] {
        match &self.kind {
            NodeKind::Group(children) => children,
            NodeKind::Leaf(_) => &[],
        }
    }

    pub fn child(&self, name: &str) -> Option<&CommandNode> {
        self.children().iter().find(|c| c.name == name)
    }

    fn child_group_mut(&mut self, name: &str, path: &str) -> Result<&mut CommandNode, RegistryError> {
        let NodeKind::Group(children) = &mut self.kind else {
            return Err(RegistryError::PathConflict { path: path.to_string(), existing: "command" });
        };
        let index = match children.iter().position(|c| c.name == name) {
            Some(index) => index,
            None => {
                children.push(CommandNode::group(name, ""));
                children.len() - 1
            }
        };
        let child = &mut children[index];
        if child.is_group() {
            Ok(child)
        } else {
            Err(RegistryError::PathConflict { path: path.to_string(), existing: "command" })
        }
    }
}

impl fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::Group(children) => f
                .debug_struct("Group")
                .field("name", &self.name)
                .field("children", children)
                .finish(),
            NodeKind::Leaf(_) => f.debug_struct("Leaf").field("name", &self.name).finish(),
        }
    }
}

/// Split a user-facing path on whitespace or dots: `"storage account list"`
/// and `"storage.account.list"` are the same path
pub fn split_path(path: &str) -> Vec<&str> {
    path.split(|c: char| c.is_whitespace() || c == '.').filter(|s| !s.is_empty()).collect()
}

fn join_path(path: &[&str]) -> String {
    path.join(" ")
}

fn validate_name(name: &str) -> Result<(), RegistryError> {
    FieldValidator::<str>::validate(&StringValidator::identifier(), name)
        .map_err(|reason| RegistryError::InvalidName { name: name.to_string(), reason })
}

/// Mutable tree used during startup registration
#[derive(Debug)]
pub struct RegistryBuilder {
    root: CommandNode,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self { root: CommandNode::group("", "") }
    }

    /// Create (or re-describe) the group at `path`, creating parents as needed
    pub fn group(&mut self, path: &[&str], description: &str) -> Result<&mut Self, RegistryError> {
        if path.is_empty() {
            return Err(RegistryError::InvalidName {
                name: String::new(),
                reason: "group path is empty".to_string(),
            });
        }
        let mut node = &mut self.root;
        for (depth, segment) in path.iter().enumerate() {
            validate_name(segment)?;
            node = node.child_group_mut(segment, &join_path(&path[..=depth]))?;
        }
        node.description = description.to_string();
        Ok(self)
    }

    /// Insert a leaf at exactly `path`, creating intermediate groups
    pub fn register(
        &mut self,
        path: &[&str],
        command: Arc<dyn Command>,
    ) -> Result<&mut Self, RegistryError> {
        let Some((leaf, groups)) = path.split_last() else {
            return Err(RegistryError::InvalidName {
                name: String::new(),
                reason: "command path is empty".to_string(),
            });
        };
        for segment in path {
            validate_name(segment)?;
        }

        let mut node = &mut self.root;
        for (depth, segment) in groups.iter().enumerate() {
            node = node.child_group_mut(segment, &join_path(&path[..=depth]))?;
        }

        let full = join_path(path);
        let NodeKind::Group(children) = &mut node.kind else {
            return Err(RegistryError::PathConflict { path: full, existing: "command" });
        };
        if let Some(existing) = children.iter().find(|c| c.name == *leaf) {
            return Err(if existing.is_group() {
                RegistryError::PathConflict { path: full, existing: "group" }
            } else {
                RegistryError::DuplicateRegistration { path: full }
            });
        }

        tracing::debug!(path = %full, "registered command");
        children.push(CommandNode::leaf(leaf, command));
        Ok(self)
    }

    /// Insert a leaf under `group`, named after the command itself
    pub fn register_in(
        &mut self,
        group: &[&str],
        command: Arc<dyn Command>,
    ) -> Result<&mut Self, RegistryError> {
        let name = command.name().to_string();
        let mut path = group.to_vec();
        path.push(&name);
        self.register(&path, command)
    }

    /// Freeze the tree
    pub fn build(self) -> CommandRegistry {
        CommandRegistry { root: self.root }
    }
}

/// Immutable command tree
#[derive(Debug)]
pub struct CommandRegistry {
    root: CommandNode,
}

impl CommandRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn root(&self) -> &CommandNode {
        &self.root
    }

    /// Exact-name descent; `None` when any segment is missing
    pub fn find(&self, path: &[&str]) -> Option<&CommandNode> {
        path.iter().try_fold(&self.root, |node, segment| node.child(segment))
    }

    /// Resolve `path` to a leaf command
    ///
    /// # Errors
    /// - `NotFound` when no node exists at `path`
    /// - `AmbiguousPath` when `path` names a group (including the empty path)
    pub fn resolve(&self, path: &[&str]) -> Result<Arc<dyn Command>, RegistryError> {
        let node = self
            .find(path)
            .ok_or_else(|| RegistryError::NotFound { path: join_path(path) })?;

        match &node.kind {
            NodeKind::Leaf(command) => Ok(Arc::clone(command)),
            NodeKind::Group(children) => Err(RegistryError::AmbiguousPath {
                path: join_path(path),
                subcommands: children.iter().map(|c| c.name.clone()).collect(),
            }),
        }
    }

    /// Resolve a whitespace- or dot-separated path
    pub fn resolve_str(&self, path: &str) -> Result<Arc<dyn Command>, RegistryError> {
        self.resolve(&split_path(path))
    }

    /// Every leaf with its full path, depth first in registration order
    pub fn leaves(&self) -> Vec<(String, Arc<dyn Command>)> {
        fn walk(
            node: &CommandNode,
            prefix: &mut Vec<String>,
            out: &mut Vec<(String, Arc<dyn Command>)>,
        ) {
            for child in node.children() {
                prefix.push(child.name.clone());
                match &child.kind {
                    NodeKind::Leaf(command) => out.push((prefix.join(" "), Arc::clone(command))),
                    NodeKind::Group(_) => walk(child, prefix, out),
                }
                prefix.pop();
            }
        }

        let mut out = Vec::new();
        walk(&self.root, &mut Vec::new(), &mut out);
        out
    }
}
