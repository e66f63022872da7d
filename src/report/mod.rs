pub mod compose;
pub mod error;
pub mod losses;
pub mod military;
pub mod number;
pub mod totals;

pub use compose::{
    compose_detailed_report, compose_digest, military_points_lost, render_report,
    BattleOutcome, DigestReport, FormattedReport, PartySummary, ReportFormat, TextReport,
    SEPARATOR_WIDTH,
};
pub use error::{ReportError, Result};
pub use losses::{
    assess_attacker, assess_defender, narrate_losses, render_attacker_outcome,
    render_defender_outcome, LossNarrative, SideLosses, SideOutcome,
};
pub use military::{
    military_points, military_points_from_totals, military_points_from_units, MP_DIVISOR,
};
pub use number::{format_fixed1, format_grouped, format_number};
pub use totals::{aggregate, StatField, StatRecord, StatTotals};
