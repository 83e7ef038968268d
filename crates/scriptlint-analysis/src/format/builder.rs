//! Formatter assembly: editor factories resolved by name against a typed
//! service map.

use std::any::{Any, TypeId};
use std::sync::Arc;

use scriptlint_core::config::FormatterConfig;
use scriptlint_core::errors::ConfigError;
use scriptlint_core::types::collections::FxHashMap;

use super::editor::ScriptEditor;
use super::editors::{AvoidTrailingWhitespace, PlaceOpenBrace, UseConsistentIndentation};
use super::formatter::ScriptFormatter;
use crate::parser::{ScriptParser, StandardParser};

/// Brace placement runs before indentation, which depends on final nesting.
pub const DEFAULT_EDITOR_ORDER: &[&str] = &[
    PlaceOpenBrace::NAME,
    UseConsistentIndentation::NAME,
    AvoidTrailingWhitespace::NAME,
];

/// Constructor for one editor from its configuration and services.
pub type EditorFactory =
    fn(&FormatterConfig, &EditorServices) -> Result<Box<dyn ScriptEditor>, ConfigError>;

/// Services editors may depend on, keyed by type.
#[derive(Default, Clone)]
pub struct EditorServices {
    services: FxHashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl EditorServices {
    pub fn insert<T: Any + Send + Sync>(&mut self, service: Arc<T>) {
        self.services.insert(TypeId::of::<T>(), service);
    }

    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.services
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|s| s.downcast::<T>().ok())
    }

    /// Like [`get`](Self::get), reporting which editor needed the service.
    pub fn require<T: Any + Send + Sync>(&self, editor: &str) -> Result<Arc<T>, ConfigError> {
        self.get::<T>().ok_or_else(|| ConfigError::MissingService {
            editor: editor.to_string(),
            service: std::any::type_name::<T>().to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

fn place_open_brace(
    config: &FormatterConfig,
    _services: &EditorServices,
) -> Result<Box<dyn ScriptEditor>, ConfigError> {
    Ok(Box::new(PlaceOpenBrace::new(config)))
}

fn use_consistent_indentation(
    config: &FormatterConfig,
    _services: &EditorServices,
) -> Result<Box<dyn ScriptEditor>, ConfigError> {
    Ok(Box::new(UseConsistentIndentation::new(config)))
}

fn avoid_trailing_whitespace(
    config: &FormatterConfig,
    _services: &EditorServices,
) -> Result<Box<dyn ScriptEditor>, ConfigError> {
    Ok(Box::new(AvoidTrailingWhitespace::new(config)))
}

/// Builds a [`ScriptFormatter`].
///
/// Editor order comes from, in priority: [`with_editors`](Self::with_editors),
/// `FormatterConfig::editors`, then [`DEFAULT_EDITOR_ORDER`].
pub struct ScriptFormatterBuilder {
    config: FormatterConfig,
    services: EditorServices,
    factories: Vec<(String, EditorFactory)>,
    order: Option<Vec<String>>,
    parser: Arc<dyn ScriptParser>,
}

impl Default for ScriptFormatterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptFormatterBuilder {
    /// A builder with the built-in editors registered.
    pub fn new() -> Self {
        Self {
            config: FormatterConfig::default(),
            services: EditorServices::default(),
            factories: Vec::new(),
            order: None,
            parser: Arc::new(StandardParser),
        }
        .register_editor(PlaceOpenBrace::NAME, place_open_brace)
        .register_editor(UseConsistentIndentation::NAME, use_consistent_indentation)
        .register_editor(AvoidTrailingWhitespace::NAME, avoid_trailing_whitespace)
    }

    pub fn with_config(mut self, config: FormatterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_service<T: Any + Send + Sync>(mut self, service: Arc<T>) -> Self {
        self.services.insert(service);
        self
    }

    pub fn with_parser(mut self, parser: Arc<dyn ScriptParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Register (or replace) the factory for `name`.
    pub fn register_editor(mut self, name: impl Into<String>, factory: EditorFactory) -> Self {
        let name = name.into();
        match self
            .factories
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(slot) => slot.1 = factory,
            None => self.factories.push((name, factory)),
        }
        self
    }

    /// Explicit editor order, overriding config and defaults.
    pub fn with_editors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> Result<ScriptFormatter, ConfigError> {
        self.config.validate()?;
        let order: Vec<String> = match self.order {
            Some(order) => order,
            None if !self.config.editors.is_empty() => self.config.editors.clone(),
            None => DEFAULT_EDITOR_ORDER.iter().map(|s| s.to_string()).collect(),
        };
        let mut editors = Vec::with_capacity(order.len());
        for name in &order {
            let factory = self
                .factories
                .iter()
                .find(|(registered, _)| registered.eq_ignore_ascii_case(name))
                .map(|(_, factory)| *factory)
                .ok_or_else(|| ConfigError::UnknownEditor(name.clone()))?;
            editors.push(factory(&self.config, &self.services)?);
        }
        tracing::debug!(editors = ?order, "formatter built");
        Ok(ScriptFormatter::from_parts(editors, self.parser))
    }
}
