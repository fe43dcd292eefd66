//! Generic modeling-platform surface.
//!
//! The scenario/data-management platform (scenario versioning, item storage,
//! GDX serialization) lives outside this crate. The driver only needs the
//! narrow surface below: declare schema items on a scenario, export its data
//! to the engine's input file, and import the solution afterwards.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use strum::Display;
use thiserror::Error;
use tracing::debug;

/// Platform-side errors surfaced through the [`Scenario`] trait.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("item {0:?} already exists with a different index structure")]
    ItemMismatch(String),
    #[error("scenario storage error: {0}")]
    Storage(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Kinds of schema items a scenario can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Set,
    Par,
    Var,
    Equ,
}

/// Index structure of a schema item.
///
/// `idx_sets` names the sets the item is indexed over, in order. `idx_names`
/// optionally renames the index columns; when absent the set names are used.
/// An empty `idx_sets` declares a dimensionless item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSpec {
    pub item_type: ItemType,
    pub idx_sets: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idx_names: Option<Vec<String>>,
}

impl ItemSpec {
    pub fn new(item_type: ItemType, idx_sets: &[&str]) -> Self {
        Self {
            item_type,
            idx_sets: idx_sets.iter().map(|s| s.to_string()).collect(),
            idx_names: None,
        }
    }

    pub fn set(idx_sets: &[&str]) -> Self {
        Self::new(ItemType::Set, idx_sets)
    }

    pub fn par(idx_sets: &[&str]) -> Self {
        Self::new(ItemType::Par, idx_sets)
    }

    pub fn var(idx_sets: &[&str]) -> Self {
        Self::new(ItemType::Var, idx_sets)
    }

    /// Rename the index columns. Must match `idx_sets` in length.
    pub fn with_idx_names(mut self, names: &[&str]) -> Self {
        debug_assert_eq!(names.len(), self.idx_sets.len());
        self.idx_names = Some(names.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Index column names: the explicit names when given, the set names
    /// otherwise.
    pub fn column_names(&self) -> &[String] {
        self.idx_names.as_deref().unwrap_or(&self.idx_sets)
    }

    pub fn is_indexed(&self) -> bool {
        !self.idx_sets.is_empty()
    }
}

/// The platform surface the driver runs against.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Scenario: Send + Sync {
    fn model_name(&self) -> &str;
    fn scenario_name(&self) -> &str;

    /// Whether the scenario already holds an item of this kind and name.
    fn has_item(&self, kind: ItemType, name: &str) -> bool;

    /// Declare a new item on the scenario.
    fn init_item(&mut self, name: &str, spec: &ItemSpec) -> Result<(), PlatformError>;

    /// Export the scenario's data to the engine input file at `path`.
    async fn write_input(&self, path: &Path) -> Result<(), PlatformError>;

    /// Import the engine's solution from the output file at `path`.
    async fn read_solution(&mut self, path: &Path) -> Result<(), PlatformError>;
}

/// Declare every item in `items` that the scenario does not already have.
///
/// Items the scenario holds are left untouched, so repeated initialization
/// is safe.
pub fn initialize_items(
    scenario: &mut dyn Scenario,
    items: &IndexMap<&str, ItemSpec>,
) -> Result<(), PlatformError> {
    for (name, spec) in items {
        if scenario.has_item(spec.item_type, name) {
            debug!(item = *name, "already declared, skipping");
            continue;
        }
        debug!(item = *name, kind = %spec.item_type, "declaring item");
        scenario.init_item(name, spec)?;
    }
    Ok(())
}

/// In-process scenario used by tests and examples.
///
/// Input export writes a plain-text listing of the declared items; solution
/// import records that the engine produced an output file.
#[derive(Debug, Default)]
pub struct MemoryScenario {
    model: String,
    scenario: String,
    items: IndexMap<String, ItemSpec>,
    has_solution: bool,
}

impl MemoryScenario {
    pub fn new(model: impl Into<String>, scenario: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            scenario: scenario.into(),
            ..Self::default()
        }
    }

    pub fn items(&self) -> &IndexMap<String, ItemSpec> {
        &self.items
    }

    pub fn has_solution(&self) -> bool {
        self.has_solution
    }
}

#[async_trait]
impl Scenario for MemoryScenario {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn scenario_name(&self) -> &str {
        &self.scenario
    }

    fn has_item(&self, kind: ItemType, name: &str) -> bool {
        self.items
            .get(name)
            .is_some_and(|spec| spec.item_type == kind)
    }

    fn init_item(&mut self, name: &str, spec: &ItemSpec) -> Result<(), PlatformError> {
        if let Some(existing) = self.items.get(name) {
            if existing != spec {
                return Err(PlatformError::ItemMismatch(name.to_string()));
            }
            return Ok(());
        }
        self.items.insert(name.to_string(), spec.clone());
        Ok(())
    }

    async fn write_input(&self, path: &Path) -> Result<(), PlatformError> {
        let mut lines = vec![format!("* {} / {}", self.model, self.scenario)];
        for (name, spec) in &self.items {
            lines.push(format!(
                "{} {}({})",
                spec.item_type,
                name,
                spec.column_names().join(",")
            ));
        }
        lines.push(String::new());
        tokio::fs::write(path, lines.join("\n")).await?;
        Ok(())
    }

    async fn read_solution(&mut self, path: &Path) -> Result<(), PlatformError> {
        if tokio::fs::metadata(path).await.is_err() {
            return Err(PlatformError::Storage(format!(
                "missing solution file {}",
                path.display()
            )));
        }
        self.has_solution = true;
        Ok(())
    }
}
