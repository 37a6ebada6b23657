use crate::core::cooling_systems::air_conditioning::CoolingCalculator;
use crate::core::energy_supply::energy_supply::{
    AnnualEnergyTotals, EnergyCategory, MonthlyEnergyTable, MonthlyRow, ZERO_ROW,
};
use crate::core::lighting::lamp_tables::ReferenceTables;
use crate::core::lighting::lighting::LightingCalculator;
use crate::core::occupancy::{HourlyOccupancy, OccupancyModel};
use crate::core::units::MONTHS_PER_YEAR;
use crate::core::ventilation::VentilationCalculator;
use crate::core::water_heat_demand::hot_water::HotWaterCalculator;
use crate::diagnostics::{Subsystem, Warning, WarningSink};
use crate::errors::OpenBesError;
use crate::input::{BuildingSpecification, SimulationParameters};
use crate::read_weather_file::WeatherProvider;
use indexmap::IndexMap;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::debug;

/// Everything a run produces.
#[derive(Clone, Debug, PartialEq)]
pub struct RunResults {
    pub monthly: MonthlyEnergyTable,
    pub annual: AnnualEnergyTotals,
    /// kWh per year across every end use
    pub total: f64,
}

/// A building ready to be simulated: the caller's specification laid over the default
/// record, plus the reference data the calculators draw on.
#[derive(Clone)]
pub struct Corpus {
    spec: BuildingSpecification,
    tables: ReferenceTables,
    weather: Option<Arc<dyn WeatherProvider>>,
    fixed_rows: IndexMap<EnergyCategory, MonthlyRow>,
}

impl Corpus {
    pub fn from_inputs(spec: &BuildingSpecification, _parameters: &SimulationParameters) -> Self {
        Self {
            spec: spec.merged_over_defaults(),
            tables: ReferenceTables::embedded(),
            weather: None,
            fixed_rows: Default::default(),
        }
    }

    pub fn with_reference_tables(mut self, tables: ReferenceTables) -> Self {
        self.tables = tables;
        self
    }

    pub fn with_weather_provider(mut self, provider: Arc<dyn WeatherProvider>) -> Self {
        self.weather = Some(provider);
        self
    }

    /// Use a known monthly row for a category in place of its calculation.
    pub fn with_fixed_row(mut self, category: EnergyCategory, row: MonthlyRow) -> Self {
        self.fixed_rows.insert(category, row);
        self
    }

    pub fn specification(&self) -> &BuildingSpecification {
        &self.spec
    }

    pub fn run(&self, sink: &mut dyn WarningSink) -> Result<RunResults, OpenBesError> {
        let mut rows = IndexMap::new();
        for category in EnergyCategory::iter() {
            let row = match self.fixed_rows.get(&category) {
                Some(row) => *row,
                None => self.calculate_row(category, sink)?,
            };
            rows.insert(category, row);
        }

        let monthly = MonthlyEnergyTable::assemble(rows);
        let annual = monthly.annual_totals();
        let total = annual.grand_total();

        Ok(RunResults {
            monthly,
            annual,
            total,
        })
    }

    fn calculate_row(
        &self,
        category: EnergyCategory,
        sink: &mut dyn WarningSink,
    ) -> Result<MonthlyRow, OpenBesError> {
        let spec = &self.spec;
        Ok(match category {
            EnergyCategory::Others => monthly_constant(
                spec.other_electricity_usage,
                Subsystem::Others,
                "other_electricity_usage",
                sink,
            ),
            EnergyCategory::BuildingStandby => monthly_constant(
                spec.building_standby_load,
                Subsystem::BuildingStandby,
                "building_standby_load",
                sink,
            ),
            EnergyCategory::Lighting => {
                LightingCalculator::new(spec, &self.tables).kwh_per_month(sink)?
            }
            EnergyCategory::HotWater => {
                HotWaterCalculator::new(&spec.hot_water_system).kwh_per_month(sink)?
            }
            EnergyCategory::Ventilation => {
                VentilationCalculator::new(&spec.ventilation_system).kwh_per_month(sink)?
            }
            EnergyCategory::Cooling => {
                CoolingCalculator::new(spec).kwh_per_month(self.weather.as_deref(), sink)?
            }
            EnergyCategory::Heating => {
                debug!("Heating electricity is not modelled");
                ZERO_ROW
            }
        })
    }

    /// Hourly occupancy of each zone type over the year.
    pub fn occupancy(&self, sink: &mut dyn WarningSink) -> Result<HourlyOccupancy, OpenBesError> {
        Ok(OccupancyModel::new(&self.spec).hourly(sink)?)
    }
}

fn monthly_constant(
    kwh_per_month: Option<f64>,
    subsystem: Subsystem,
    field: &'static str,
    sink: &mut dyn WarningSink,
) -> MonthlyRow {
    match kwh_per_month {
        Some(kwh) => [kwh; MONTHS_PER_YEAR],
        None => {
            sink.record(Warning::missing(
                subsystem,
                field,
                format!("no monthly {subsystem} consumption given; taken as zero"),
            ));
            ZERO_ROW
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{Diagnostics, WarningKind};
    use crate::errors::CalculationError;
    use crate::input::{LightingSystem, LightingTechnology};
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn should_warn_for_each_missing_constant_row() {
        let corpus = Corpus::from_inputs(&Default::default(), &Default::default());
        let mut diagnostics = Diagnostics::new();
        let results = corpus.run(&mut diagnostics).unwrap();

        assert_eq!(results.total, 0.);
        assert_eq!(diagnostics.for_subsystem(Subsystem::Others).count(), 1);
        assert_eq!(diagnostics.for_subsystem(Subsystem::BuildingStandby).count(), 1);
        assert_eq!(
            diagnostics
                .for_subsystem(Subsystem::Cooling)
                .map(|warning| warning.kind)
                .collect::<Vec<_>>(),
            vec![WarningKind::MissingInput]
        );
    }

    #[rstest]
    fn should_replace_calculation_with_fixed_row() {
        let spec = BuildingSpecification {
            other_electricity_usage: Some(100.),
            ..Default::default()
        };
        let corpus = Corpus::from_inputs(&spec, &Default::default())
            .with_fixed_row(EnergyCategory::Others, [1.; 12])
            .with_fixed_row(EnergyCategory::Heating, [2.; 12]);
        let mut sink: Vec<Warning> = vec![];
        let results = corpus.run(&mut sink).unwrap();

        assert_eq!(results.monthly.row(EnergyCategory::Others), &[1.; 12]);
        assert_eq!(results.annual.get(EnergyCategory::Heating), Some(24.));
    }

    #[rstest]
    fn should_repeat_monthly_constants() {
        let spec = BuildingSpecification {
            other_electricity_usage: Some(1136.),
            building_standby_load: Some(2321.2),
            ..Default::default()
        };
        let mut sink: Vec<Warning> = vec![];
        let results = Corpus::from_inputs(&spec, &Default::default())
            .run(&mut sink)
            .unwrap();
        assert_relative_eq!(
            results.annual.get(EnergyCategory::BuildingStandby).unwrap(),
            27_854.4,
            max_relative = 1e-12
        );
        assert_eq!(results.annual.get(EnergyCategory::Others), Some(13_632.));
    }

    #[rstest]
    fn should_abort_on_unrecognised_domain_value() {
        let spec = BuildingSpecification {
            lighting_systems: vec![LightingSystem {
                technology: Some(LightingTechnology::Unrecognised("Gaslight".to_string())),
                ..Default::default()
            }],
            ..Default::default()
        };
        let mut sink: Vec<Warning> = vec![];
        assert!(matches!(
            Corpus::from_inputs(&spec, &Default::default()).run(&mut sink),
            Err(OpenBesError::InvalidDomainValue(_))
        ));
    }

    #[rstest]
    fn should_fail_occupancy_when_a_weekday_flag_is_missing() {
        let corpus = Corpus::from_inputs(&Default::default(), &Default::default());
        let mut sink: Vec<Warning> = vec![];
        assert!(corpus.occupancy(&mut sink).is_ok());

        let mut corpus = corpus;
        corpus.spec.occupied_days.swap_remove(&crate::calendar::Weekday::Wed);
        assert!(matches!(
            corpus.occupancy(&mut sink),
            Err(OpenBesError::FailureInCalculation(
                CalculationError::UnresolvedWeekday { .. }
            ))
        ));
    }
}
