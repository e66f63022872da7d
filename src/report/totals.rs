use serde::{Deserialize, Serialize};

/// Per-unit-type stat record as it appears in a battle report. Absent fields
/// read as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatRecord {
    pub at: f64,
    pub de: f64,
    pub cn: f64,
}

impl StatRecord {
    pub fn new(at: f64, de: f64, cn: f64) -> Self {
        Self { at, de, cn }
    }

    pub fn get(&self, field: StatField) -> f64 {
        match field {
            StatField::Attack => self.at,
            StatField::Defense => self.de,
            StatField::Count => self.cn,
        }
    }
}

const FIELD_COUNT: usize = 3;

/// Stat fields the aggregator knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatField {
    /// `at`
    Attack,
    /// `de`
    Defense,
    /// `cn`
    Count,
}

impl StatField {
    pub const ALL: [StatField; FIELD_COUNT] = [StatField::Attack, StatField::Defense, StatField::Count];

    const fn index(self) -> usize {
        match self {
            Self::Attack => 0,
            Self::Defense => 1,
            Self::Count => 2,
        }
    }
}

/// Party-level sums keyed by [StatField]. Every field starts at zero; the
/// number of folded records tells an empty fold apart from an all-zero one.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatTotals {
    values: [f64; FIELD_COUNT],
    folded: usize,
}

impl StatTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, record: &StatRecord) {
        for field in StatField::ALL {
            self.values[field.index()] += record.get(field);
        }
        self.folded += 1;
    }

    /// Adds another partial fold into self.
    pub fn merge(&mut self, other: &StatTotals) {
        for field in StatField::ALL {
            self.values[field.index()] += other.values[field.index()];
        }
        self.folded += other.folded;
    }

    pub fn get(&self, field: StatField) -> f64 {
        self.values[field.index()]
    }

    pub fn attack(&self) -> f64 {
        self.get(StatField::Attack)
    }

    pub fn defense(&self) -> f64 {
        self.get(StatField::Defense)
    }

    pub fn count(&self) -> f64 {
        self.get(StatField::Count)
    }

    pub fn is_empty(&self) -> bool {
        self.folded == 0
    }
}

impl<'a> Extend<&'a StatRecord> for StatTotals {
    fn extend<I: IntoIterator<Item = &'a StatRecord>>(&mut self, records: I) {
        for record in records {
            self.add(record);
        }
    }
}

pub fn aggregate<'a, I>(records: I) -> StatTotals
where
    I: IntoIterator<Item = &'a StatRecord>,
{
    let mut totals = StatTotals::new();
    totals.extend(records);
    totals
}
