//! In-memory command table.

use std::sync::Arc;

use scriptlint_core::errors::RuleError;
use scriptlint_core::types::collections::FxHashMap;

use super::{CommandMetadata, CommandMetadataStore};

/// Command table held in memory, indexed by lower-cased name and alias.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCommandStore {
    commands: Vec<Arc<CommandMetadata>>,
    by_name: FxHashMap<String, usize>,
    by_alias: FxHashMap<String, usize>,
}

impl InMemoryCommandStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Core commands and their default aliases.
    pub fn builtin() -> Self {
        let mut store = Self::new();
        for command in [
            CommandMetadata::new("Get-ChildItem")
                .with_aliases(&["gci", "ls", "dir"])
                .with_parameters(&["Path", "Filter", "Recurse", "Force"]),
            CommandMetadata::new("Where-Object")
                .with_aliases(&["?", "where"])
                .with_parameters(&["FilterScript", "Property", "Value"]),
            CommandMetadata::new("ForEach-Object")
                .with_aliases(&["%", "foreach"])
                .with_parameters(&["Process", "Begin", "End", "MemberName"]),
            CommandMetadata::new("Write-Output")
                .with_aliases(&["echo", "write"])
                .with_parameters(&["InputObject", "NoEnumerate"]),
            CommandMetadata::new("Get-Content")
                .with_aliases(&["cat", "gc", "type"])
                .with_parameters(&["Path", "Raw", "Encoding", "TotalCount"]),
            CommandMetadata::new("Set-Location")
                .with_aliases(&["cd", "chdir", "sl"])
                .with_parameters(&["Path", "LiteralPath", "PassThru"]),
            CommandMetadata::new("Select-Object")
                .with_aliases(&["select"])
                .with_parameters(&["Property", "First", "Last", "Unique"]),
            CommandMetadata::new("Remove-Item")
                .with_aliases(&["rm", "del", "ri"])
                .with_parameters(&["Path", "Recurse", "Force"]),
            CommandMetadata::new("Get-Item").with_aliases(&["gi"]).with_parameters(&["Path"]),
            CommandMetadata::new("Get-WmiObject")
                .with_aliases(&["gwmi"])
                .with_parameters(&["Class", "ComputerName"])
                .with_platforms(&["windows"]),
        ] {
            store.insert(command);
        }
        store
    }

    /// Add or replace a command.
    pub fn insert(&mut self, command: CommandMetadata) {
        let key = command.name.to_ascii_lowercase();
        let idx = match self.by_name.get(&key) {
            Some(&idx) => {
                self.by_alias.retain(|_, v| *v != idx);
                self.commands[idx] = Arc::new(command);
                idx
            }
            None => {
                self.commands.push(Arc::new(command));
                self.commands.len() - 1
            }
        };
        for alias in &self.commands[idx].aliases {
            self.by_alias.insert(alias.to_ascii_lowercase(), idx);
        }
        self.by_name.insert(key, idx);
    }

    pub fn with_command(mut self, command: CommandMetadata) -> Self {
        self.insert(command);
        self
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl CommandMetadataStore for InMemoryCommandStore {
    fn lookup(
        &self,
        name: &str,
        platforms: &[String],
    ) -> Result<Option<Arc<CommandMetadata>>, RuleError> {
        let key = name.to_ascii_lowercase();
        let found = self
            .by_name
            .get(&key)
            .or_else(|| self.by_alias.get(&key))
            .map(|&idx| Arc::clone(&self.commands[idx]))
            .filter(|c| c.available_on(platforms));
        Ok(found)
    }

    fn alias_target(&self, name: &str) -> Result<Option<String>, RuleError> {
        Ok(self
            .by_alias
            .get(&name.to_ascii_lowercase())
            .map(|&idx| self.commands[idx].name.clone()))
    }
}
