//! Fleet-loss narration: per-side fighting vs surviving MP, decided into a
//! [SideOutcome] and rendered into a sentence as a separate step.

use crate::data::battle::{FleetLossRecord, Front};
use crate::report::military::military_points_from_totals;
use crate::report::number::format_fixed1;
use crate::report::totals::StatTotals;

/// Fighting and surviving totals of one side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideLosses {
    pub front: Front,
    pub records: usize,
    pub any_survived: bool,
    pub fighting: StatTotals,
    pub surviving: StatTotals,
}

impl SideLosses {
    /// Fold every record of `front`; a wiped remainder counts as zero stats.
    pub fn tally(records: &[FleetLossRecord], front: Front) -> Self {
        let mut side = Self {
            front,
            records: 0,
            any_survived: false,
            fighting: StatTotals::new(),
            surviving: StatTotals::new(),
        };
        for record in records.iter().filter(|record| record.front == Some(front)) {
            side.records += 1;
            side.any_survived |= record.survived;
            side.fighting.add(&record.fight);
            side.surviving.add(&record.frest.stats());
        }
        side
    }

    pub fn engaged(&self) -> bool {
        self.records > 0
    }

    pub fn fighting_mp(&self) -> f64 {
        military_points_from_totals(Some(&self.fighting))
    }

    pub fn surviving_mp(&self) -> f64 {
        military_points_from_totals(Some(&self.surviving))
    }

    /// `surviving / fighting`; `None` when nothing of value was committed.
    pub fn survived_ratio(&self) -> Option<f64> {
        let fighting = self.fighting_mp();
        (fighting > 0.0).then(|| self.surviving_mp() / fighting)
    }

    /// Surviving share in percent as it appears in the report (`"57.1"`).
    pub fn survived_percent_text(&self) -> Option<String> {
        self.survived_ratio().map(|ratio| format_fixed1(ratio * 100.0))
    }

    /// Numeric value of [SideLosses::survived_percent_text].
    pub fn survived_percent(&self) -> Option<f64> {
        self.survived_percent_text().and_then(|text| text.parse().ok())
    }
}

/// Rendered percentage at which an attacker counts as having lost nothing.
const FULL_SURVIVAL: &str = "100.0";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SideOutcome {
    /// No records for the side, or nothing of value committed.
    DidNotEngage,
    TotalLoss { fighting_mp: f64 },
    /// Survivors are worth at least what went into the fight.
    Unscathed { surviving_mp: f64 },
    LostNothing,
    /// `survived_percent` is unrounded; rendering rounds it once.
    PartialLoss { surviving_mp: f64, survived_percent: f64 },
}

pub fn assess_defender(side: &SideLosses) -> SideOutcome {
    if !side.engaged() {
        return SideOutcome::DidNotEngage;
    }
    if !side.any_survived {
        return SideOutcome::TotalLoss {
            fighting_mp: side.fighting_mp(),
        };
    }
    match side.survived_ratio() {
        Some(ratio) if ratio >= 1.0 => SideOutcome::Unscathed {
            surviving_mp: side.surviving_mp(),
        },
        Some(ratio) => SideOutcome::PartialLoss {
            surviving_mp: side.surviving_mp(),
            survived_percent: ratio * 100.0,
        },
        None => SideOutcome::DidNotEngage,
    }
}

/// The attacker always counts as engaged, so a side without records reads as
/// a total loss of zero MP.
pub fn assess_attacker(side: &SideLosses) -> SideOutcome {
    if !side.any_survived {
        return SideOutcome::TotalLoss {
            fighting_mp: side.fighting_mp(),
        };
    }
    let Some(ratio) = side.survived_ratio() else {
        return SideOutcome::LostNothing;
    };
    let percent = ratio * 100.0;
    if format_fixed1(percent) == FULL_SURVIVAL {
        return SideOutcome::LostNothing;
    }
    SideOutcome::PartialLoss {
        surviving_mp: side.surviving_mp(),
        survived_percent: percent,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossNarrative {
    pub attacker: SideOutcome,
    pub defender: SideOutcome,
}

impl LossNarrative {
    /// Attacker sentence followed by defender sentence.
    pub fn render(&self) -> [String; 2] {
        [
            render_attacker_outcome(&self.attacker),
            render_defender_outcome(&self.defender),
        ]
    }
}

/// Split `records` by front and decide both sides.
pub fn narrate_losses(records: &[FleetLossRecord]) -> LossNarrative {
    let attacker = SideLosses::tally(records, Front::Attacker);
    let defender = SideLosses::tally(records, Front::Defender);
    tracing::debug!(
        attacker_records = attacker.records,
        attacker_fighting_mp = attacker.fighting_mp(),
        defender_records = defender.records,
        defender_fighting_mp = defender.fighting_mp(),
        "tallied fleet losses"
    );
    LossNarrative {
        attacker: assess_attacker(&attacker),
        defender: assess_defender(&defender),
    }
}

pub fn render_attacker_outcome(outcome: &SideOutcome) -> String {
    match *outcome {
        SideOutcome::DidNotEngage => {
            "Attacker didn't engage in the fight and hasn't lost any units.".to_string()
        }
        SideOutcome::TotalLoss { fighting_mp } => {
            format!("Attacker lost all units ({}mp) :sob:.", format_fixed1(fighting_mp))
        }
        SideOutcome::Unscathed { .. } | SideOutcome::LostNothing => {
            "Attacker lost nothing :confetti_ball:.".to_string()
        }
        SideOutcome::PartialLoss {
            surviving_mp,
            survived_percent,
        } => format!(
            "Attacker lost some units but {}mp ({}%) survived :piñata:.",
            format_fixed1(surviving_mp),
            format_fixed1(survived_percent)
        ),
    }
}

pub fn render_defender_outcome(outcome: &SideOutcome) -> String {
    match *outcome {
        SideOutcome::DidNotEngage => "Defender was a chicken and didn't engage in the fight but also hasn't lost any units :chicken:.".to_string(),
        SideOutcome::TotalLoss { fighting_mp } => {
            format!("Defender lost all units ({}mp) :sob:.", format_fixed1(fighting_mp))
        }
        SideOutcome::Unscathed { surviving_mp } => format!(
            "Defender with their force of {}mp got involved in a hefty battle but was able to strike back successfully without losing anything :tada:.",
            format_fixed1(surviving_mp)
        ),
        SideOutcome::LostNothing => "Defender lost nothing :tada:.".to_string(),
        SideOutcome::PartialLoss {
            surviving_mp,
            survived_percent,
        } => format!(
            "Defender lost some units but {}mp ({}%) survived :face_holding_back_tears:.",
            format_fixed1(surviving_mp),
            format_fixed1(survived_percent)
        ),
    }
}
