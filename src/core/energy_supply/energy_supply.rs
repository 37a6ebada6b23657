use crate::core::units::MONTHS_PER_YEAR;
use indexmap::IndexMap;
use itertools::Itertools;
use std::array;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// kWh for each month, Jan to Dec.
pub type MonthlyRow = [f64; MONTHS_PER_YEAR];

pub const ZERO_ROW: MonthlyRow = [0.; MONTHS_PER_YEAR];

/// End uses electricity is attributed to. The declaration order is the row order of
/// every results table.
#[derive(Clone, Copy, Debug, Display, EnumIter, Eq, Hash, PartialEq)]
pub enum EnergyCategory {
    Others,
    #[strum(serialize = "Building standby")]
    BuildingStandby,
    Lighting,
    #[strum(serialize = "Hot water")]
    HotWater,
    Ventilation,
    Cooling,
    Heating,
}

/// Monthly electricity use by end use, always holding a full row for every category.
#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyEnergyTable {
    rows: IndexMap<EnergyCategory, MonthlyRow>,
}

impl MonthlyEnergyTable {
    /// Lay the given rows out in category order, using a row of zeros for any category
    /// that was not computed.
    pub fn assemble(mut rows: IndexMap<EnergyCategory, MonthlyRow>) -> Self {
        Self {
            rows: EnergyCategory::iter()
                .map(|category| (category, rows.swap_remove(&category).unwrap_or(ZERO_ROW)))
                .collect(),
        }
    }

    pub fn row(&self, category: EnergyCategory) -> &MonthlyRow {
        &self.rows[&category]
    }

    pub fn rows(&self) -> impl Iterator<Item = (EnergyCategory, &MonthlyRow)> {
        self.rows.iter().map(|(category, row)| (*category, row))
    }

    pub fn annual_totals(&self) -> AnnualEnergyTotals {
        AnnualEnergyTotals::from_cells(
            self.rows()
                .map(|(category, row)| (category, Some(row.iter().sum()))),
        )
    }

    /// Total across all end uses for each month.
    pub fn monthly_totals(&self) -> MonthlyRow {
        aggregate_monthly_zonal_energy(&self.rows.values().copied().collect_vec())
    }
}

/// kWh per year for each end use. A cell may be unset when the totals come from
/// somewhere other than a [`MonthlyEnergyTable`].
#[derive(Clone, Debug, PartialEq)]
pub struct AnnualEnergyTotals {
    totals: IndexMap<EnergyCategory, Option<f64>>,
}

impl AnnualEnergyTotals {
    pub fn from_cells(cells: impl IntoIterator<Item = (EnergyCategory, Option<f64>)>) -> Self {
        Self {
            totals: cells.into_iter().collect(),
        }
    }

    pub fn get(&self, category: EnergyCategory) -> Option<f64> {
        self.totals.get(&category).copied().flatten()
    }

    pub fn iter(&self) -> impl Iterator<Item = (EnergyCategory, Option<f64>)> + '_ {
        self.totals.iter().map(|(category, total)| (*category, *total))
    }

    /// Sum of every numeric cell; unset or non-finite cells are skipped.
    pub fn grand_total(&self) -> f64 {
        sum_numeric(self.totals.values().copied())
    }
}

pub fn sum_numeric(cells: impl IntoIterator<Item = Option<f64>>) -> f64 {
    cells
        .into_iter()
        .flatten()
        .filter(|cell| cell.is_finite())
        .sum()
}

/// Collapse a set of per-zone monthly rows into a single row for the category.
pub fn aggregate_monthly_zonal_energy(zonal: &[MonthlyRow]) -> MonthlyRow {
    zonal.iter().fold(ZERO_ROW, |total, zone| {
        array::from_fn(|month| total[month] + zone[month])
    })
}
