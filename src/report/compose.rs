//! Report composition: the detailed multi-line text and the one-line digest.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::data::battle::{BattleRecord, FleetLossRecord, Front, Loot, Planet, Ships};
use crate::report::error::{ReportError, Result};
use crate::report::losses::narrate_losses;
use crate::report::military::{military_points, military_points_from_units};
use crate::report::number::{format_fixed1, format_grouped, format_number};
use crate::report::totals::{aggregate, StatTotals};

/// Width of the closing rule of the detailed report.
pub const SEPARATOR_WIDTH: usize = 100;

/// MP differences at or below this are treated as no loss.
const MP_LOSS_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextReport {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestReport {
    pub embed_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormattedReport {
    Text(TextReport),
    Digest(DigestReport),
}

impl FormattedReport {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(report) => &report.text,
            Self::Digest(report) => &report.embed_description,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    OneLine,
}

impl ReportFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::OneLine => "oneline",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "oneline" => Ok(Self::OneLine),
            _ => Err(ReportError::UnknownFormat(s.to_string())),
        }
    }
}

/// How the battle ended, as far as the loot section tells.
#[derive(Debug, Clone, PartialEq)]
pub enum BattleOutcome {
    Looted(Vec<f64>),
    LootedNothing,
    DefenderWon,
}

impl BattleOutcome {
    pub fn from_loot(loot: &Loot) -> Result<Self> {
        if !loot.info()?.atter_couldloot {
            return Ok(Self::DefenderWon);
        }
        if loot.any_positive() {
            Ok(Self::Looted(loot.amounts().iter().map(|(_, amount)| *amount).collect()))
        } else {
            Ok(Self::LootedNothing)
        }
    }

    pub fn render(&self) -> String {
        match self {
            Self::Looted(amounts) => format!(
                "**Attacker won and looted {} resources! :tada:**",
                join_amounts(amounts, format_grouped)
            ),
            Self::LootedNothing => {
                "**Attacker won :tada: and looted nothing :face_holding_back_tears:!**".to_string()
            }
            Self::DefenderWon => "**Defender won! :tada:**".to_string(),
        }
    }
}

fn join_amounts(amounts: &[f64], render: fn(f64) -> String) -> String {
    amounts
        .iter()
        .map(|amount| render(*amount))
        .collect::<Vec<_>>()
        .join("/")
}

/// One side's line in the detailed report.
#[derive(Debug, Clone, PartialEq)]
pub struct PartySummary {
    pub display_name: String,
    pub totals: StatTotals,
}

impl PartySummary {
    fn new(planet: &Planet, ships: &Ships, front: Front) -> Self {
        let totals = ships
            .g
            .side(front)
            .map(|units| aggregate(units.values()))
            .unwrap_or_default();
        Self {
            display_name: planet.display_name(),
            totals,
        }
    }

    pub fn military_points(&self) -> f64 {
        military_points(self.totals.attack(), self.totals.defense())
    }

    fn render(&self, label: &str, units_noun: &str) -> String {
        format!(
            "**{label}:** {} with **{}** {units_noun} and **{}mp** ({}/{})",
            self.display_name,
            format_grouped(self.totals.count()),
            format_fixed1(self.military_points()),
            format_grouped(self.totals.attack()),
            format_grouped(self.totals.defense()),
        )
    }
}

/// Multi-line report: header, both parties, optional loss narrative, result
/// and a closing rule.
pub fn compose_detailed_report(
    record: &BattleRecord,
    losses: Option<&[FleetLossRecord]>,
    report_url: &str,
    actor_name: &str,
) -> Result<TextReport> {
    let parties = record.parties()?;
    let ships = record.ships()?;
    let outcome = BattleOutcome::from_loot(record.loot()?)?;

    let attacker = PartySummary::new(&parties.party(Front::Attacker)?.planet, ships, Front::Attacker);
    let defender = PartySummary::new(&parties.party(Front::Defender)?.planet, ships, Front::Defender);
    tracing::debug!(
        attacker_mp = attacker.military_points(),
        defender_mp = defender.military_points(),
        "composing detailed report"
    );

    let mut lines = vec![
        format!("{actor_name} shared a battle report: {report_url}"),
        String::new(),
        attacker.render("Attacker", "ships"),
        defender.render("Defender", "ships/defense units"),
    ];
    if let Some(records) = losses {
        lines.extend(narrate_losses(records).render());
    }
    lines.push(outcome.render());
    lines.push("-".repeat(SEPARATOR_WIDTH));

    Ok(TextReport {
        text: lines.join("\n"),
    })
}

/// MP a side lost between the starting and the surviving unit tables.
pub fn military_points_lost(ships: &Ships, front: Front) -> f64 {
    military_points_from_units(ships.g.side(front))
        - military_points_from_units(ships.result.side(front))
}

/// One line: `[Battle Report](url): attacker vs defender - loot`. The winner is
/// bolded and each side with a measurable loss gets a `(-x MP)` suffix.
pub fn compose_digest(
    record: &BattleRecord,
    report_url: &str,
    actor_name: &str,
) -> Result<DigestReport> {
    let parties = record.parties()?;
    let ships = record.ships()?;
    let loot = record.loot()?;

    let mut attacker = parties.party(Front::Attacker)?.planet.display_name();
    let mut defender = parties.party(Front::Defender)?.planet.display_name();
    let mut loot_suffix = String::new();

    if loot.info()?.atter_couldloot {
        attacker = format!("**{attacker}**");
        let amounts: Vec<f64> = loot.amounts().iter().map(|(_, amount)| *amount).collect();
        if !amounts.is_empty() {
            loot_suffix = format!(" - {}", join_amounts(&amounts, format_number));
        }
    } else {
        defender = format!("**{defender}**");
    }

    let attacker_lost = military_points_lost(ships, Front::Attacker);
    if attacker_lost > MP_LOSS_EPSILON {
        attacker = format!("{attacker} (-{} MP)", format_number(attacker_lost));
    }
    let defender_lost = military_points_lost(ships, Front::Defender);
    if defender_lost > MP_LOSS_EPSILON {
        defender = format!("{defender} (-{} MP)", format_number(defender_lost));
    }

    tracing::debug!(actor = actor_name, attacker_lost, defender_lost, "composing digest");

    Ok(DigestReport {
        embed_description: format!(
            "[Battle Report]({report_url}): {attacker} vs {defender}{loot_suffix}"
        ),
    })
}

/// Dispatch to the composer selected by `format`.
pub fn render_report(
    format: ReportFormat,
    record: &BattleRecord,
    losses: Option<&[FleetLossRecord]>,
    report_url: &str,
    actor_name: &str,
) -> Result<FormattedReport> {
    match format {
        ReportFormat::Text => {
            compose_detailed_report(record, losses, report_url, actor_name).map(FormattedReport::Text)
        }
        ReportFormat::OneLine => {
            compose_digest(record, report_url, actor_name).map(FormattedReport::Digest)
        }
    }
}
