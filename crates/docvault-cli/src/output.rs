//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use docvault_entity::document::Document;
use docvault_entity::folder::Folder;
use docvault_entity::permission::{DocumentAce, EffectivePermission, FolderAce, ResourceRef};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// One resolved permission, flattened for display.
#[derive(Debug, Serialize, Tabled)]
pub struct PermissionRow {
    /// Queried resource.
    pub resource: String,
    /// Resolved level, or "none".
    pub level: String,
    /// Whether the grant was inherited.
    pub inherited: bool,
    /// Resource holding the grant.
    pub origin: String,
    /// Human-readable provenance.
    pub explanation: String,
}

impl PermissionRow {
    /// Build a row for `resource` from an optional resolution.
    pub fn new(resource: ResourceRef, permission: Option<&EffectivePermission>) -> Self {
        match permission {
            Some(p) => Self {
                resource: resource.to_string(),
                level: p.access_level.to_string(),
                inherited: p.inherited,
                origin: p.origin.to_string(),
                explanation: p.describe(),
            },
            None => Self {
                resource: resource.to_string(),
                level: "none".to_string(),
                inherited: false,
                origin: "-".to_string(),
                explanation: "no access".to_string(),
            },
        }
    }
}

/// One stored access entry, flattened for display.
#[derive(Debug, Serialize, Tabled)]
pub struct AceRow {
    /// Entry id.
    pub id: i64,
    /// Resource the entry is attached to.
    pub resource: String,
    /// Grantee.
    pub user_id: i64,
    /// Granted level.
    pub level: String,
    /// Recursive flag ("-" for documents).
    pub recursive: String,
    /// Owning organization.
    pub organization_id: i64,
}

impl From<&FolderAce> for AceRow {
    fn from(ace: &FolderAce) -> Self {
        Self {
            id: ace.id.get(),
            resource: ResourceRef::Folder(ace.folder_id).to_string(),
            user_id: ace.user_id.get(),
            level: ace.access_level.to_string(),
            recursive: ace.recursive.to_string(),
            organization_id: ace.organization_id.get(),
        }
    }
}

impl From<&DocumentAce> for AceRow {
    fn from(ace: &DocumentAce) -> Self {
        Self {
            id: ace.id.get(),
            resource: ResourceRef::Document(ace.document_id).to_string(),
            user_id: ace.user_id.get(),
            level: ace.access_level.to_string(),
            recursive: "-".to_string(),
            organization_id: ace.organization_id.get(),
        }
    }
}

/// A folder or document, flattened for display.
#[derive(Debug, Serialize, Tabled)]
pub struct ResourceRow {
    /// Typed reference, e.g. `folder:12`.
    pub resource: String,
    /// Display name.
    pub name: String,
    /// Parent folder (containing folder for documents), or "-" for roots.
    pub parent: String,
    /// Owning organization.
    pub organization_id: i64,
    /// Creation time, RFC 3339.
    pub created_at: String,
}

impl From<&Folder> for ResourceRow {
    fn from(folder: &Folder) -> Self {
        Self {
            resource: ResourceRef::Folder(folder.id).to_string(),
            name: folder.name.clone(),
            parent: folder
                .parent_id
                .map_or_else(|| "-".to_string(), |id| ResourceRef::Folder(id).to_string()),
            organization_id: folder.organization_id.get(),
            created_at: folder.created_at.to_rfc3339(),
        }
    }
}

impl From<&Document> for ResourceRow {
    fn from(document: &Document) -> Self {
        Self {
            resource: ResourceRef::Document(document.id).to_string(),
            name: document.name.clone(),
            parent: ResourceRef::Folder(document.folder_id).to_string(),
            organization_id: document.organization_id.get(),
            created_at: document.created_at.to_rfc3339(),
        }
    }
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

/// Print a single item in the selected format
pub fn print_item<T: Serialize + std::fmt::Debug>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            println!("{item:#?}");
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
            println!("{json}");
        }
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}
