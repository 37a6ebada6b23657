use crate::calendar::{hours_of_year, is_occupied_day, HourOfYear, Month, HOURS_PER_YEAR};
use crate::core::units::{DAYS_PER_YEAR, HOURS_PER_DAY};
use crate::diagnostics::{Subsystem, Warning, WarningKind, WarningSink};
use crate::errors::CalculationError;
use crate::input::{BuildingSpecification, Floor, OccupationZone};
use indexmap::IndexMap;
use strum::{EnumCount, IntoEnumIterator};
use tracing::debug;

pub const ZONE_COUNT: usize = OccupationZone::COUNT;

// Systems are brought up an hour before occupants arrive
const OPENING_LEAD_HOURS: u32 = 1;

/// Area density factor for each zone type, applied to the zone's total floor area (m2).
pub fn density_factor(zone: OccupationZone) -> f64 {
    match zone {
        OccupationZone::Office => 0.10,
        OccupationZone::Teaching => 0.50,
        OccupationZone::Canteen => 0.67,
        OccupationZone::CommonAreas => 0.10,
        OccupationZone::Other => 0.05,
    }
}

/// Hours of the day a zone is active: from `open` up to, not including, `close`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoneWindow {
    pub open: u32,
    pub close: u32,
}

impl ZoneWindow {
    pub fn contains(&self, hour: u32) -> bool {
        self.open <= hour && hour < self.close
    }

    pub fn hours(&self) -> u32 {
        self.close.saturating_sub(self.open)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OccupancyMode {
    /// Typical occupation as a share of capacity, the same for every zone.
    Schedule,
    /// Per-zone estimate from declared floor areas.
    Density,
}

pub struct OccupancyModel<'a> {
    spec: &'a BuildingSpecification,
}

impl<'a> OccupancyModel<'a> {
    pub fn new(spec: &'a BuildingSpecification) -> Self {
        Self { spec }
    }

    /// Active window for a zone, or None (with a warning) when it cannot be established.
    pub fn zone_window(&self, zone: OccupationZone, sink: &mut dyn WarningSink) -> Option<ZoneWindow> {
        let schedule = self.spec.zone_schedule(zone).copied().unwrap_or_default();

        let open = if zone == OccupationZone::Office {
            match (schedule.open_time, self.spec.heating_system.start_time) {
                (Some(open), Some(heating_start)) => Some(open.min(heating_start)),
                (open, heating_start) => open.or(heating_start),
            }
        } else {
            schedule.open_time
        };

        let (open, close) = match (open, schedule.close_time) {
            (Some(open), Some(close)) => (open, close),
            (open, _) => {
                let field = if open.is_none() { "open_time" } else { "close_time" };
                sink.record(Warning::missing(
                    Subsystem::Occupancy,
                    format!("zone_schedules.{zone}.{field}"),
                    format!("{zone} zone has no {}; it is treated as unoccupied", field.replace('_', " ")),
                ));
                return None;
            }
        };

        if close <= open {
            sink.record(Warning::new(
                Subsystem::Occupancy,
                WarningKind::MisconfiguredWindow,
                format!("zone_schedules.{zone}.close_time"),
                format!("{zone} zone closes at {close}, not after it opens at {open}"),
            ));
            return None;
        }

        Some(ZoneWindow {
            open: open.saturating_sub(OPENING_LEAD_HOURS),
            close: close.min(HOURS_PER_DAY),
        })
    }

    pub fn mode(&self) -> OccupancyMode {
        match (self.spec.building_capacity, self.spec.typical_occupation) {
            (Some(capacity), Some(typical))
                if capacity.is_finite() && typical.is_finite() && capacity > 0. && typical > 0. =>
            {
                OccupancyMode::Schedule
            }
            _ => OccupancyMode::Density,
        }
    }

    /// Year-wide occupancy value for each zone type.
    pub fn zone_fractions(&self) -> IndexMap<OccupationZone, f64> {
        let mode = self.mode();
        debug!(?mode, "Estimating zone occupancy");

        OccupationZone::iter()
            .map(|zone| {
                let fraction = match (mode, self.spec.building_capacity, self.spec.typical_occupation) {
                    (OccupancyMode::Schedule, Some(capacity), Some(typical)) => {
                        typical / capacity * 100.
                    }
                    _ => density_factor(zone) * self.total_floor_area(zone),
                };
                (zone, fraction)
            })
            .collect()
    }

    fn total_floor_area(&self, zone: OccupationZone) -> f64 {
        self.spec
            .floor_areas
            .get(&zone)
            .map(|areas| {
                Floor::iter()
                    .filter_map(|floor| areas.get(&floor))
                    .filter(|area| area.is_finite())
                    .sum()
            })
            .unwrap_or(0.)
    }

    /// Expand zone fractions over every hour of the year.
    pub fn hourly(&self, sink: &mut dyn WarningSink) -> Result<HourlyOccupancy, CalculationError> {
        let windows: IndexMap<OccupationZone, Option<ZoneWindow>> = OccupationZone::iter()
            .map(|zone| (zone, self.zone_window(zone, sink)))
            .collect();
        let fractions = self.zone_fractions();

        let occupied_days = (0..DAYS_PER_YEAR)
            .map(|day| is_occupied_day(day, self.spec))
            .collect::<Result<Vec<bool>, _>>()?;

        let mut values = Vec::with_capacity(HOURS_PER_YEAR * ZONE_COUNT);
        for hour_of_year in hours_of_year() {
            let occupied = occupied_days[hour_of_year.day as usize];
            for (zone, window) in &windows {
                let value = match window {
                    Some(window) if occupied && window.contains(hour_of_year.hour) => fractions[zone],
                    _ => 0.,
                };
                values.push(value);
            }
        }

        Ok(HourlyOccupancy { values })
    }
}

/// Occupancy for every hour of the year, one column per zone type.
#[derive(Clone, Debug, PartialEq)]
pub struct HourlyOccupancy {
    // laid out by (day of year, hour of day, zone)
    values: Vec<f64>,
}

impl HourlyOccupancy {
    pub fn len(&self) -> usize {
        self.values.len() / ZONE_COUNT
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value for a zone at an hour of a day of the year (both 0-based).
    pub fn value(&self, day: u32, hour: u32, zone: OccupationZone) -> f64 {
        self.values[(day * HOURS_PER_DAY + hour) as usize * ZONE_COUNT + zone as usize]
    }

    /// Value for a zone at an hour of a given day of a month (day 1-based).
    pub fn at(&self, month: Month, day_of_month: u32, hour: u32, zone: OccupationZone) -> Option<f64> {
        if day_of_month == 0 || day_of_month > month.days() || hour >= HOURS_PER_DAY {
            return None;
        }
        Some(self.value(month.first_day() + day_of_month - 1, hour, zone))
    }

    /// Rows in hour-of-year order, each with a value per zone in zone declaration order.
    pub fn rows(&self) -> impl Iterator<Item = (HourOfYear, &[f64])> {
        hours_of_year().zip(self.values.chunks(ZONE_COUNT))
    }

    pub fn zone_hours(&self, zone: OccupationZone) -> impl Iterator<Item = f64> + '_ {
        self.values
            .iter()
            .skip(zone as usize)
            .step_by(ZONE_COUNT)
            .copied()
    }
}
