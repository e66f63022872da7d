pub mod battle;
pub mod guild_config;

pub use battle::{
    parse_battle_record_json, parse_fleet_losses_json, BattleRecord, FleetLossRecord, FleetState,
    Front, Loot, LootInfo, LootValues, Parties, Party, Planet, Remainder, Ships, UnitTable,
};
pub use guild_config::{
    configure_default_format, default_format_key, resolve_format, ActorKind, GuildConfigStore,
    JsonFileConfigStore, MemoryConfigStore, DEFAULT_CONFIG_PATH,
};
