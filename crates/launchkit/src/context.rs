//! Session context assembled from config and CLI overrides

use anyhow::{Context, Result};
use camino::Utf8PathBuf;

use launchkit_core::{ExecutionMode, LaunchkitConfig};
use launchkit_engine::{Dispatcher, HandlerSet};
use launchkit_lang::{builtin_table, GrammarTable};
use launchkit_registry::ProjectStore;

/// Everything one command session needs: the loaded grammar and a
/// dispatcher wired to the registry
pub struct AppContext {
    pub table: GrammarTable,
    pub dispatcher: Dispatcher,
}

impl AppContext {
    /// Build the context, honoring CLI overrides over the config file
    pub fn init(
        registry_override: Option<&Utf8PathBuf>,
        grammar_override: Option<&Utf8PathBuf>,
    ) -> Result<(Self, ExecutionMode)> {
        let config = LaunchkitConfig::load_default().context("Failed to load configuration")?;

        let registry_path = match registry_override {
            Some(path) => path.clone().into_std_path_buf(),
            None => config.registry_path()?,
        };

        let grammar_path = grammar_override.or(config.grammar.as_ref());
        let table = match grammar_path {
            Some(path) => GrammarTable::load(path.as_std_path())
                .with_context(|| format!("Failed to load grammar from {path}"))?,
            None => builtin_table().clone(),
        };

        let projects_root = config.projects_root_path()?;
        let store = ProjectStore::new(registry_path);
        let dispatcher = Dispatcher::new(HandlerSet::standard(projects_root), store);

        Ok((Self { table, dispatcher }, config.mode))
    }
}
