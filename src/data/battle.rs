//! Battle report input schema: parties, ship tables, loot and per-unit loss records.
//!
//! Top-level sections are optional in the document; the accessors on
//! [BattleRecord] turn an absent section into [ReportError::MalformedReport].
//! Everything below a section degrades to zero/empty when missing.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::report::error::{ReportError, Result};
use crate::report::totals::StatRecord;

/// Unit-type identifier → stat record for one side.
pub type UnitTable = BTreeMap<String, StatRecord>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Front {
    #[serde(rename = "att")]
    Attacker,
    #[serde(rename = "def")]
    Defender,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BattleRecord {
    #[serde(default)]
    pub parties: Option<Parties>,
    #[serde(default)]
    pub ships: Option<Ships>,
    #[serde(default)]
    pub loot: Option<Loot>,
}

impl BattleRecord {
    pub fn parties(&self) -> Result<&Parties> {
        self.parties.as_ref().ok_or_else(|| ReportError::missing("parties"))
    }

    pub fn ships(&self) -> Result<&Ships> {
        self.ships.as_ref().ok_or_else(|| ReportError::missing("ships"))
    }

    pub fn loot(&self) -> Result<&Loot> {
        self.loot.as_ref().ok_or_else(|| ReportError::missing("loot"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Parties {
    #[serde(default)]
    pub attacker: Option<Party>,
    #[serde(default)]
    pub defender: Option<Party>,
}

impl Parties {
    pub fn party(&self, front: Front) -> Result<&Party> {
        match front {
            Front::Attacker => self
                .attacker
                .as_ref()
                .ok_or_else(|| ReportError::missing("parties.attacker")),
            Front::Defender => self
                .defender
                .as_ref()
                .ok_or_else(|| ReportError::missing("parties.defender")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Party {
    pub planet: Planet,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Planet {
    pub user_alias: String,
    #[serde(default)]
    pub alliance: Option<String>,
}

impl Planet {
    /// Alliance tag, if set and non-empty.
    pub fn alliance_tag(&self) -> Option<&str> {
        self.alliance.as_deref().filter(|tag| !tag.is_empty())
    }

    /// `[TAG] alias`, or the bare alias without an alliance.
    pub fn display_name(&self) -> String {
        match self.alliance_tag() {
            Some(tag) => format!("[{tag}] {}", self.user_alias),
            None => self.user_alias.clone(),
        }
    }
}

/// `g` is the fleet/defense each side brought, `result` what was left afterwards.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Ships {
    #[serde(default)]
    pub g: FleetState,
    #[serde(default)]
    pub result: FleetState,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FleetState {
    #[serde(default)]
    pub att: Option<UnitTable>,
    #[serde(default)]
    pub def: Option<UnitTable>,
}

impl FleetState {
    pub fn side(&self, front: Front) -> Option<&UnitTable> {
        match front {
            Front::Attacker => self.att.as_ref(),
            Front::Defender => self.def.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Loot {
    #[serde(default)]
    pub info: Option<LootInfo>,
    #[serde(default)]
    pub values: Option<LootValues>,
}

impl Loot {
    pub fn info(&self) -> Result<&LootInfo> {
        self.info.as_ref().ok_or_else(|| ReportError::missing("loot.info"))
    }

    pub fn amounts(&self) -> &[(String, f64)] {
        match &self.values {
            Some(values) => values.entries(),
            None => &[],
        }
    }

    pub fn any_positive(&self) -> bool {
        self.values.as_ref().is_some_and(LootValues::any_positive)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct LootInfo {
    #[serde(default)]
    pub atter_couldloot: bool,
}

/// Looted amount per resource, in document order. Missing (`null`) and
/// negative amounts are stored as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LootValues(Vec<(String, f64)>);

impl LootValues {
    pub fn entries(&self) -> &[(String, f64)] {
        &self.0
    }

    pub fn any_positive(&self) -> bool {
        self.0.iter().any(|(_, amount)| *amount > 0.0)
    }
}

fn clamp_amount(amount: Option<f64>) -> f64 {
    amount.filter(|value| value.is_finite()).unwrap_or(0.0).max(0.0)
}

impl<S: Into<String>> FromIterator<(S, f64)> for LootValues {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, amount)| (name.into(), clamp_amount(Some(amount))))
                .collect(),
        )
    }
}

impl<'de> Deserialize<'de> for LootValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct LootVisitor;

        impl<'de> Visitor<'de> for LootVisitor {
            type Value = LootValues;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of resource name to looted amount")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<LootValues, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, amount)) = map.next_entry::<String, Option<f64>>()? {
                    entries.push((name, clamp_amount(amount)));
                }
                Ok(LootValues(entries))
            }
        }

        deserializer.deserialize_map(LootVisitor)
    }
}

/// One participating unit type in the fleet-loss breakdown. `front` is `None`
/// for a missing or unrecognised side; such records are left out of the tally.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FleetLossRecord {
    #[serde(default, deserialize_with = "known_front")]
    pub front: Option<Front>,
    #[serde(default)]
    pub fight: StatRecord,
    #[serde(default)]
    pub frest: Remainder,
    #[serde(default)]
    pub survived: bool,
}

/// What was left of a unit type after the fight. Reports use `""` (or omit the
/// field) when nothing survived.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Remainder {
    Units(StatRecord),
    #[default]
    Wiped,
}

impl Remainder {
    pub fn stats(&self) -> StatRecord {
        match self {
            Self::Units(stats) => *stats,
            Self::Wiped => StatRecord::default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRemainder {
    Units(StatRecord),
    Marker(IgnoredAny),
}

impl<'de> Deserialize<'de> for Remainder {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match Option::<RawRemainder>::deserialize(deserializer)? {
            Some(RawRemainder::Units(stats)) => Self::Units(stats),
            Some(RawRemainder::Marker(_)) | None => Self::Wiped,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFront {
    Known(Front),
    Other(IgnoredAny),
}

fn known_front<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<Front>, D::Error> {
    Ok(match Option::<RawFront>::deserialize(deserializer)? {
        Some(RawFront::Known(front)) => Some(front),
        Some(RawFront::Other(_)) | None => None,
    })
}

/// Parse a battle report document.
pub fn parse_battle_record_json(input: &str) -> Result<BattleRecord> {
    Ok(serde_json::from_str(input)?)
}

/// Parse the fleet-loss breakdown (a JSON array of per-unit records).
pub fn parse_fleet_losses_json(input: &str) -> Result<Vec<FleetLossRecord>> {
    Ok(serde_json::from_str(input)?)
}
