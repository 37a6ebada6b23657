use crate::calendar::Month;
use crate::core::energy_supply::energy_supply::MonthlyRow;
use crate::core::units::MONTHS_PER_YEAR;

/// Days per month that the building is counted as open, Jan to Dec. These are fixed
/// reference figures rather than a count of working days in any particular year.
pub const OPERATIONAL_DAYS_PER_MONTH: [u32; MONTHS_PER_YEAR] =
    [18, 20, 23, 22, 23, 22, 23, 23, 22, 23, 22, 17];

// Lighting uses its own figures for the summer months
const LIGHTING_DAYS_JULY: u32 = 21;
const LIGHTING_DAYS_AUGUST: u32 = 22;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OperationalDays {
    days: [u32; MONTHS_PER_YEAR],
}

impl OperationalDays {
    pub fn standard() -> Self {
        Self {
            days: OPERATIONAL_DAYS_PER_MONTH,
        }
    }

    /// Operational days used for lighting, where July and August are shortened.
    pub fn for_lighting() -> Self {
        Self::standard()
            .with_override(Month::Jul, LIGHTING_DAYS_JULY)
            .with_override(Month::Aug, LIGHTING_DAYS_AUGUST)
    }

    pub fn with_override(mut self, month: Month, days: u32) -> Self {
        self.days[month.index()] = days;
        self
    }

    pub fn days_in(&self, month: Month) -> u32 {
        self.days[month.index()]
    }

    pub fn total(&self) -> u32 {
        self.days.iter().sum()
    }

    /// Spread a per-day quantity over the year: each month gets `daily` once for each of
    /// its operational days.
    pub fn distribute(&self, daily: f64) -> MonthlyRow {
        self.days.map(|days| daily * days as f64)
    }
}

impl Default for OperationalDays {
    fn default() -> Self {
        Self::standard()
    }
}
