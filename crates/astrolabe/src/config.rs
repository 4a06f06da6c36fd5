//! Configuration types for Astrolabe selection and composition.
//!
//! All types implement [`serde::Deserialize`] with every field defaulted, so
//! a partial (or empty) configuration file is valid.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the sections below.
//! - [`SelectionConfig`] - Controls warnings raised while evaluating criteria.
//! - [`ComposeConfig`] - Controls how views are composed.
//!
//! # Example
//!
//! ```
//! # use astrolabe::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.selection().warn_unrestricted());
//! assert!(config.compose().prune_dangling_relations());
//! ```

use serde::Deserialize;

/// Top-level configuration combining selection and compose settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Selection configuration section.
    #[serde(default)]
    selection: SelectionConfig,

    /// Compose configuration section.
    #[serde(default)]
    compose: ComposeConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(selection: SelectionConfig, compose: ComposeConfig) -> Self {
        Self { selection, compose }
    }

    /// Returns the selection configuration.
    pub fn selection(&self) -> &SelectionConfig {
        &self.selection
    }

    /// Returns the compose configuration.
    pub fn compose(&self) -> &ComposeConfig {
        &self.compose
    }
}

/// Settings for criteria evaluation.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Log a warning when criteria match every item.
    warn_unrestricted: bool,
}

impl SelectionConfig {
    pub fn new(warn_unrestricted: bool) -> Self {
        Self { warn_unrestricted }
    }

    /// Whether unrestricted criteria such as `{}` are reported.
    pub fn warn_unrestricted(&self) -> bool {
        self.warn_unrestricted
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            warn_unrestricted: true,
        }
    }
}

/// Settings for view composition.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ComposeConfig {
    /// Compose views of a batch on the rayon thread pool.
    parallel: bool,

    /// Drop relations from filtered views when an endpoint was filtered out.
    prune_dangling_relations: bool,
}

impl ComposeConfig {
    /// Creates a new [`ComposeConfig`].
    ///
    /// # Arguments
    ///
    /// * `parallel` - Compose batches in parallel.
    /// * `prune_dangling_relations` - Drop relations left without an endpoint by a filter.
    pub fn new(parallel: bool, prune_dangling_relations: bool) -> Self {
        Self {
            parallel,
            prune_dangling_relations,
        }
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    pub fn prune_dangling_relations(&self) -> bool {
        self.prune_dangling_relations
    }
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            prune_dangling_relations: true,
        }
    }
}
