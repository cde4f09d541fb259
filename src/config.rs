//! Configuration for CountDB
//!
//! Centralized configuration with sensible defaults.

/// Main configuration shared by the importer and the query session
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Parser Configuration
    // -------------------------------------------------------------------------
    /// Character that starts a trailing comment (unless preceded by `\`)
    pub comment_marker: char,

    // -------------------------------------------------------------------------
    // Import Configuration
    // -------------------------------------------------------------------------
    /// What to do with a count entry that appears before any block header
    pub orphan_entries: OrphanPolicy,

    /// fsync the database file (and its directory) on every commit
    pub sync_on_commit: bool,

    // -------------------------------------------------------------------------
    // Query Configuration
    // -------------------------------------------------------------------------
    /// Prompt written before each interactive read
    pub prompt: String,
}

/// Handling of count entries seen while no block is current
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrphanPolicy {
    /// Abort the import with a structural error (nothing is committed)
    Fail,

    /// Log a warning, drop the entry and keep going
    Skip,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            comment_marker: '#',
            orphan_entries: OrphanPolicy::Fail,
            sync_on_commit: true,
            prompt: "cnt2db> ".to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the comment marker character
    pub fn comment_marker(mut self, marker: char) -> Self {
        self.config.comment_marker = marker;
        self
    }

    /// Set the orphan entry policy
    pub fn orphan_entries(mut self, policy: OrphanPolicy) -> Self {
        self.config.orphan_entries = policy;
        self
    }

    /// Enable or disable fsync on commit
    pub fn sync_on_commit(mut self, sync: bool) -> Self {
        self.config.sync_on_commit = sync;
        self
    }

    /// Set the interactive prompt
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.prompt = prompt.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
