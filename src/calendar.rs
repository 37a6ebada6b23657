use crate::core::units::{DAYS_IN_MONTH, DAYS_PER_YEAR, HOURS_PER_DAY};
use crate::errors::CalculationError;
use crate::input::BuildingSpecification;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

// Define days that start each month (and end the previous one). Note there are 13
// values so that the end of the final month is handled correctly.
// E.g. Jan is days 0-30
pub(crate) const MONTH_START_END_DAYS: [u32; 13] =
    [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334, 365];

pub const HOURS_PER_YEAR: usize = (DAYS_PER_YEAR * HOURS_PER_DAY) as usize;

#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, Hash, PartialEq, Serialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    pub fn is_weekend(&self) -> bool {
        matches!(self, Weekday::Sat | Weekday::Sun)
    }
}

#[derive(
    Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    /// Zero-based position of the month in the year.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Calendar number of the month, 1 to 12.
    pub fn number(&self) -> u32 {
        self.index() as u32 + 1
    }

    pub fn days(&self) -> u32 {
        DAYS_IN_MONTH[self.index()]
    }

    /// Day of the year (0-based) on which this month starts.
    pub fn first_day(&self) -> u32 {
        MONTH_START_END_DAYS[self.index()]
    }
}

/// Day of the week for a day of the year (0-364), the year starting on a Monday.
pub fn day_of_week(day: u32) -> Weekday {
    match day % 7 {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        6 => Weekday::Sun,
        _ => unreachable!("a value modulo 7 is always below 7"),
    }
}

/// Month containing a day of the (non-leap) year, or None if the day lies past its end.
pub fn month_for_day(day: u32) -> Option<Month> {
    Month::iter().find(|month| day < MONTH_START_END_DAYS[month.index() + 1])
}

pub fn is_weekend(day: u32) -> bool {
    day_of_week(day).is_weekend()
}

/// Placeholder holiday calendar: the first five and the last eight days of the year.
pub fn is_public_holiday(day: u32) -> bool {
    day <= 4 || day >= 357
}

/// Whether the building is open on a day of the year.
///
/// Public holidays close the building when the specification observes them; otherwise
/// the specification's flag for the weekday decides. A weekday without a flag is an
/// error rather than a closed day.
pub fn is_occupied_day(day: u32, spec: &BuildingSpecification) -> Result<bool, CalculationError> {
    if spec.observes_public_holidays() && is_public_holiday(day) {
        return Ok(false);
    }

    let weekday = day_of_week(day);
    spec.occupied_on(weekday)
        .ok_or(CalculationError::UnresolvedWeekday { day, weekday })
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HourOfYear {
    pub month: Month,
    pub day: u32,
    pub hour: u32,
}

impl HourOfYear {
    pub fn index(&self) -> usize {
        (self.day * HOURS_PER_DAY + self.hour) as usize
    }

    /// Day of the month, 1-based.
    pub fn day_of_month(&self) -> u32 {
        self.day - self.month.first_day() + 1
    }
}

/// Every hour of the year in order, Jan 1st 00:00 to Dec 31st 23:00.
pub fn hours_of_year() -> impl Iterator<Item = HourOfYear> {
    Month::iter().flat_map(|month| {
        (month.first_day()..month.first_day() + month.days()).flat_map(move |day| {
            (0..HOURS_PER_DAY).map(move |hour| HourOfYear { month, day, hour })
        })
    })
}
