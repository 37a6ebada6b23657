use crate::calendar::{hours_of_year, Month, HOURS_PER_YEAR};
use crate::compare_floats::{clamp_between, max_of_2};
use crate::core::energy_supply::energy_supply::{MonthlyRow, ZERO_ROW};
use crate::core::schedule::OperationalDays;
use crate::diagnostics::{Resolution, Subsystem, Warning, WarningKind, WarningSink};
use crate::errors::InvalidDomainValueError;
use crate::input::BuildingSpecification;
use crate::read_weather_file::{WeatherData, WeatherProvider};
use strum::IntoEnumIterator;
use tracing::debug;

/// This module provides a provisional estimate of the electricity used by air conditioning.
///
/// The estimate runs in four stages: a cooling load proxy regressed on outdoor dry bulb
/// temperature, a part-load ratio against the installed sensible capacity, a fan power
/// curve over that ratio, and distribution of the hourly figures over operational days.
/// The regression coefficients are placeholders.

// kW
pub const MIN_COOLING_CAPACITY: f64 = 0.01;

// Relative humidity (%) assumed for every hour
pub const RELATIVE_HUMIDITY: f64 = 55.;

const SQUARE_METRES_PER_UNIT_AREA: f64 = 1000.;

/// Cooling load proxy for an hour at the given dry bulb temperature (deg C).
pub fn reference_consumption_by_temperature(dry_bulb_temperature: f64) -> f64 {
    let t = dry_bulb_temperature;
    let rh = RELATIVE_HUMIDITY;
    0.1117801 + 0.028493334 * rh - 0.000411156 * rh.powi(2) + 0.021414276 * t
        + 0.000161125 * t.powi(2)
        - 0.000679104 * t * rh
}

/// Share of nominal consumption drawn at a part-load ratio between 0 and 1.
pub fn part_load_fan_power(ratio: f64) -> f64 {
    0.2012307 - 0.0312175 * ratio + 1.9504979 * ratio.powi(2) - 1.1205104 * ratio.powi(3)
}

pub struct CoolingCalculator<'a> {
    spec: &'a BuildingSpecification,
}

impl<'a> CoolingCalculator<'a> {
    pub fn new(spec: &'a BuildingSpecification) -> Self {
        Self { spec }
    }

    fn installed_capacity(
        &self,
        per_unit: Option<f64>,
        field: &'static str,
        sink: &mut dyn WarningSink,
    ) -> f64 {
        match (per_unit, self.spec.cooling_system.number) {
            (Some(per_unit), Some(number)) => {
                max_of_2(per_unit * number as f64, MIN_COOLING_CAPACITY)
            }
            (per_unit, _) => {
                sink.record(Warning::missing(
                    Subsystem::Cooling,
                    if per_unit.is_none() {
                        field
                    } else {
                        "cooling_system.number"
                    },
                    format!("assuming the minimal cooling capacity of {MIN_COOLING_CAPACITY} kW"),
                ));
                MIN_COOLING_CAPACITY
            }
        }
    }

    /// Nominal cooling capacity of all installed units, in kW.
    pub fn nominal_capacity(&self, sink: &mut dyn WarningSink) -> f64 {
        self.installed_capacity(
            self.spec.cooling_system.nominal_capacity,
            "cooling_system.nominal_capacity",
            sink,
        )
    }

    /// Sensible cooling capacity of all installed units, in kW.
    pub fn sensible_capacity(&self, sink: &mut dyn WarningSink) -> f64 {
        self.installed_capacity(
            self.spec.cooling_system.sensible_nominal_capacity,
            "cooling_system.sensible_nominal_capacity",
            sink,
        )
    }

    /// Electrical input in kW of the installed units running at full load.
    pub fn nominal_consumption(&self, sink: &mut dyn WarningSink) -> Resolution<f64> {
        match self.spec.cooling_system.energy_efficiency_ratio {
            Some(eer) if eer > 0. => Resolution::Resolved(self.nominal_capacity(sink) / eer),
            _ => Resolution::Degraded(Warning::missing(
                Subsystem::Cooling,
                "cooling_system.energy_efficiency_ratio",
                "no usable energy efficiency ratio given; cooling energy taken as zero",
            )),
        }
    }

    /// kWh used in each hour of the year, for as many hours as the weather covers.
    pub fn hourly_consumption(
        &self,
        weather: &WeatherData,
        sink: &mut dyn WarningSink,
    ) -> Resolution<Vec<f64>> {
        let set_point = match self.spec.cooling_system.set_point_temperature {
            Some(set_point) => set_point,
            None => {
                return Resolution::Degraded(Warning::missing(
                    Subsystem::Cooling,
                    "cooling_system.set_point_temperature",
                    "no set point temperature given; cooling energy taken as zero",
                ))
            }
        };
        let building_area = match self.spec.building_area {
            Some(area) => area,
            None => {
                return Resolution::Degraded(Warning::missing(
                    Subsystem::Cooling,
                    "building_area",
                    "no building area given; cooling energy taken as zero",
                ))
            }
        };
        let nominal_consumption = match self.nominal_consumption(sink) {
            Resolution::Resolved(consumption) => consumption,
            Resolution::Degraded(warning) => return Resolution::Degraded(warning),
        };
        let sensible_capacity = self.sensible_capacity(sink);

        Resolution::Resolved(
            weather
                .air_temperatures
                .iter()
                .map(|dry_bulb| {
                    if *dry_bulb <= set_point {
                        return 0.;
                    }
                    let demand = reference_consumption_by_temperature(*dry_bulb) * building_area
                        / SQUARE_METRES_PER_UNIT_AREA;
                    let ratio = clamp_between(demand / sensible_capacity, 0., 1.);
                    nominal_consumption * part_load_fan_power(ratio)
                })
                .collect(),
        )
    }

    /// Fold a year of hourly consumption into months, counting only operational days.
    pub fn monthly_from_hourly(hourly: &[f64]) -> MonthlyRow {
        let operational_days = OperationalDays::standard();
        let mut totals = ZERO_ROW;
        for (hour, kwh) in hours_of_year().zip(hourly) {
            totals[hour.month.index()] += kwh;
        }
        for month in Month::iter() {
            totals[month.index()] *=
                operational_days.days_in(month) as f64 / month.days() as f64;
        }
        totals
    }

    pub fn kwh_per_month_with_weather(
        &self,
        weather: &WeatherData,
        sink: &mut dyn WarningSink,
    ) -> Result<MonthlyRow, InvalidDomainValueError> {
        if !self.is_electric()? {
            return Ok(ZERO_ROW);
        }

        if weather.air_temperatures.len() < HOURS_PER_YEAR {
            sink.record(Warning::new(
                Subsystem::Cooling,
                WarningKind::LookupMiss,
                "meteorological_file",
                format!(
                    "weather covers {} hours rather than a full year; cooling energy taken as zero",
                    weather.air_temperatures.len()
                ),
            ));
            return Ok(ZERO_ROW);
        }

        Ok(match self.hourly_consumption(weather, sink) {
            Resolution::Resolved(hourly) => Self::monthly_from_hourly(&hourly),
            Resolution::Degraded(warning) => {
                sink.record(warning);
                ZERO_ROW
            }
        })
    }

    /// kWh of electricity per month, using the weather named by the specification.
    pub fn kwh_per_month(
        &self,
        provider: Option<&dyn WeatherProvider>,
        sink: &mut dyn WarningSink,
    ) -> Result<MonthlyRow, InvalidDomainValueError> {
        if !self.is_electric()? {
            return Ok(ZERO_ROW);
        }

        let file_name = match &self.spec.meteorological_file {
            Some(file_name) => file_name,
            None => {
                sink.record(Warning::missing(
                    Subsystem::Cooling,
                    "meteorological_file",
                    "no weather file named; cooling energy taken as zero",
                ));
                return Ok(ZERO_ROW);
            }
        };
        let weather = match provider.map(|provider| provider.hourly_weather(file_name)) {
            Some(Ok(weather)) => weather,
            Some(Err(error)) => {
                sink.record(Warning::new(
                    Subsystem::Cooling,
                    WarningKind::LookupMiss,
                    "meteorological_file",
                    format!("{error:#}; cooling energy taken as zero"),
                ));
                return Ok(ZERO_ROW);
            }
            None => {
                sink.record(Warning::new(
                    Subsystem::Cooling,
                    WarningKind::LookupMiss,
                    "meteorological_file",
                    format!("no weather source available for '{file_name}'; cooling energy taken as zero"),
                ));
                return Ok(ZERO_ROW);
            }
        };

        self.kwh_per_month_with_weather(&weather, sink)
    }

    fn is_electric(&self) -> Result<bool, InvalidDomainValueError> {
        match &self.spec.cooling_system.energy_source {
            Some(source) => {
                let electric = source.is_electric("cooling_system.energy_source")?;
                if !electric {
                    debug!(?source, "Cooling is not electrically powered");
                }
                Ok(electric)
            }
            None => Ok(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{CoolingSystem, EnergySource};
    use approx::assert_relative_eq;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::sync::Arc;

    #[fixture]
    fn spec() -> BuildingSpecification {
        BuildingSpecification {
            cooling_system: CoolingSystem {
                energy_source: Some(EnergySource::Electricity),
                number: Some(2),
                nominal_capacity: Some(5.),
                sensible_nominal_capacity: Some(4.),
                energy_efficiency_ratio: Some(2.5),
                set_point_temperature: Some(25.),
            },
            building_area: Some(1000.),
            meteorological_file: Some("lisbon.epw".to_string()),
            ..Default::default()
        }
    }

    fn constant_weather(dry_bulb: f64) -> WeatherData {
        WeatherData {
            air_temperatures: vec![dry_bulb; HOURS_PER_YEAR],
            relative_humidities: vec![RELATIVE_HUMIDITY; HOURS_PER_YEAR],
            latitude: None,
            longitude: None,
        }
    }

    #[rstest]
    fn should_evaluate_temperature_regression() {
        assert_relative_eq!(
            reference_consumption_by_temperature(30.),
            0.10208575,
            max_relative = 1e-9
        );
    }

    #[rstest]
    #[case(0., 0.2012307)]
    #[case(0.5, 0.533182625)]
    #[case(1., 1.0000007)]
    fn should_evaluate_fan_power_curve(#[case] ratio: f64, #[case] expected: f64) {
        assert_relative_eq!(part_load_fan_power(ratio), expected, max_relative = 1e-9);
    }

    #[rstest]
    fn should_multiply_capacity_by_unit_count(spec: BuildingSpecification) {
        let mut sink: Vec<Warning> = vec![];
        let calculator = CoolingCalculator::new(&spec);
        assert_eq!(calculator.nominal_capacity(&mut sink), 10.);
        assert_eq!(calculator.sensible_capacity(&mut sink), 8.);
        assert!(sink.is_empty());
    }

    #[rstest]
    fn should_floor_missing_capacity(spec: BuildingSpecification) {
        let spec = BuildingSpecification {
            cooling_system: CoolingSystem {
                sensible_nominal_capacity: None,
                number: Some(0),
                ..spec.cooling_system.clone()
            },
            ..spec
        };
        let mut sink: Vec<Warning> = vec![];
        let calculator = CoolingCalculator::new(&spec);
        assert_eq!(calculator.sensible_capacity(&mut sink), MIN_COOLING_CAPACITY);
        assert_eq!(sink.len(), 1);
        assert_eq!(calculator.nominal_capacity(&mut sink), MIN_COOLING_CAPACITY);
        assert_eq!(sink.len(), 1);
    }

    #[rstest]
    fn should_not_cool_below_set_point(spec: BuildingSpecification) {
        let mut sink: Vec<Warning> = vec![];
        let monthly = CoolingCalculator::new(&spec)
            .kwh_per_month_with_weather(&constant_weather(20.), &mut sink)
            .unwrap();
        assert_eq!(monthly, ZERO_ROW);
        assert!(sink.is_empty());
    }

    #[rstest]
    fn should_distribute_hourly_consumption_over_operational_days(spec: BuildingSpecification) {
        let mut sink: Vec<Warning> = vec![];
        let monthly = CoolingCalculator::new(&spec)
            .kwh_per_month_with_weather(&constant_weather(30.), &mut sink)
            .unwrap();

        let ratio = reference_consumption_by_temperature(30.) / 8.;
        let hourly = 10. / 2.5 * part_load_fan_power(ratio);
        for (month, operational_days) in Month::iter().zip(OperationalDays::standard().distribute(1.)) {
            assert_relative_eq!(
                monthly[month.index()],
                hourly * 24. * operational_days,
                max_relative = 1e-9
            );
        }
    }

    #[rstest]
    fn should_give_zero_row_without_efficiency_ratio(spec: BuildingSpecification) {
        let spec = BuildingSpecification {
            cooling_system: CoolingSystem {
                energy_efficiency_ratio: None,
                ..spec.cooling_system.clone()
            },
            ..spec
        };
        let mut sink: Vec<Warning> = vec![];
        let monthly = CoolingCalculator::new(&spec)
            .kwh_per_month_with_weather(&constant_weather(30.), &mut sink)
            .unwrap();
        assert_eq!(monthly, ZERO_ROW);
        assert_eq!(sink[0].field, "cooling_system.energy_efficiency_ratio");
    }

    #[rstest]
    fn should_give_zero_row_for_partial_weather(spec: BuildingSpecification) {
        let weather = WeatherData {
            air_temperatures: vec![30.; 24],
            relative_humidities: vec![],
            latitude: None,
            longitude: None,
        };
        let mut sink: Vec<Warning> = vec![];
        let monthly = CoolingCalculator::new(&spec)
            .kwh_per_month_with_weather(&weather, &mut sink)
            .unwrap();
        assert_eq!(monthly, ZERO_ROW);
        assert_eq!(sink[0].kind, WarningKind::LookupMiss);
    }

    #[rstest]
    fn should_look_up_weather_by_file_name(spec: BuildingSpecification) {
        let provider = IndexMap::from([("lisbon.epw".to_string(), Arc::new(constant_weather(30.)))]);
        let mut sink: Vec<Warning> = vec![];
        let monthly = CoolingCalculator::new(&spec)
            .kwh_per_month(Some(&provider), &mut sink)
            .unwrap();
        assert!(monthly.iter().all(|kwh| *kwh > 0.));

        let spec = BuildingSpecification {
            meteorological_file: Some("porto.epw".to_string()),
            ..spec
        };
        let monthly = CoolingCalculator::new(&spec)
            .kwh_per_month(Some(&provider), &mut sink)
            .unwrap();
        assert_eq!(monthly, ZERO_ROW);
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].kind, WarningKind::LookupMiss);
    }

    #[rstest]
    fn should_use_no_electricity_for_other_sources(spec: BuildingSpecification) {
        let spec = BuildingSpecification {
            cooling_system: CoolingSystem {
                energy_source: Some(EnergySource::NaturalGas),
                ..spec.cooling_system.clone()
            },
            ..spec
        };
        let mut sink: Vec<Warning> = vec![];
        assert_eq!(
            CoolingCalculator::new(&spec).kwh_per_month(None, &mut sink).unwrap(),
            ZERO_ROW
        );
        assert!(sink.is_empty());
    }
}
