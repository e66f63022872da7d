//! Per-guild default report format. The store is injected by the caller; the
//! composers never read it.
//!
//! Keys are `default_format_user` / `default_format_bot`; an unset key resolves
//! to [ReportFormat::Text].

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::report::compose::ReportFormat;
use crate::report::error::{ReportError, Result};

pub const DEFAULT_CONFIG_PATH: &str = "data/guild_config.json";

/// Who shared the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorKind {
    User,
    Bot,
}

impl ActorKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

impl fmt::Display for ActorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActorKind {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "bot" => Ok(Self::Bot),
            _ => Err(ReportError::UnknownActor(s.to_string())),
        }
    }
}

pub fn default_format_key(actor: ActorKind) -> String {
    format!("default_format_{actor}")
}

/// Key/value settings keyed by guild id.
pub trait GuildConfigStore {
    fn get_value(&self, guild_id: &str, key: &str) -> Option<String>;
    fn set_value(&mut self, guild_id: &str, key: &str, value: &str) -> Result<()>;
}

type GuildValues = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryConfigStore {
    guilds: GuildValues,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GuildConfigStore for MemoryConfigStore {
    fn get_value(&self, guild_id: &str, key: &str) -> Option<String> {
        self.guilds.get(guild_id)?.get(key).cloned()
    }

    fn set_value(&mut self, guild_id: &str, key: &str, value: &str) -> Result<()> {
        self.guilds
            .entry(guild_id.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON file backed store; every `set_value` rewrites the file.
#[derive(Debug, Clone)]
pub struct JsonFileConfigStore {
    path: PathBuf,
    values: MemoryConfigStore,
}

impl JsonFileConfigStore {
    /// Open the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), %err, "ignoring unreadable guild config");
                MemoryConfigStore::default()
            }),
            Err(_) => MemoryConfigStore::default(),
        };
        Self { path, values }
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, payload)?;
        Ok(())
    }
}

impl GuildConfigStore for JsonFileConfigStore {
    fn get_value(&self, guild_id: &str, key: &str) -> Option<String> {
        self.values.get_value(guild_id, key)
    }

    fn set_value(&mut self, guild_id: &str, key: &str, value: &str) -> Result<()> {
        self.values.set_value(guild_id, key, value)?;
        self.save()
    }
}

/// Stored default format for `actor`; `Text` when unset or unrecognised.
pub fn resolve_format(store: &dyn GuildConfigStore, guild_id: &str, actor: ActorKind) -> ReportFormat {
    store
        .get_value(guild_id, &default_format_key(actor))
        .and_then(|raw| match raw.parse::<ReportFormat>() {
            Ok(format) => Some(format),
            Err(err) => {
                tracing::warn!(guild_id, %err, "stored default format ignored");
                None
            }
        })
        .unwrap_or_default()
}

/// Set (with `Some`) or read back (with `None`) a guild's default format and
/// return the reply shown to whoever ran the command.
pub fn configure_default_format(
    store: &mut dyn GuildConfigStore,
    guild_id: &str,
    actor: ActorKind,
    format: Option<ReportFormat>,
) -> Result<String> {
    match format {
        Some(format) => {
            store.set_value(guild_id, &default_format_key(actor), format.as_str())?;
            tracing::info!(guild_id, %actor, %format, "default format updated");
            Ok(format!("Default format for {actor} set to {format}"))
        }
        None => {
            let format = resolve_format(store, guild_id, actor);
            Ok(format!("Default format for {actor} is {format}"))
        }
    }
}
