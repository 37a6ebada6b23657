use crate::core::energy_supply::energy_supply::{MonthlyRow, ZERO_ROW};
use crate::core::schedule::OperationalDays;
use crate::core::units::water_heating_kwh;
use crate::diagnostics::{Resolution, Subsystem, Warning, WarningSink};
use crate::errors::InvalidDomainValueError;
use crate::input::HotWaterSystem;
use tracing::debug;

/// This module estimates the electricity used to heat domestic hot water.

pub struct HotWaterCalculator<'a> {
    system: &'a HotWaterSystem,
}

impl<'a> HotWaterCalculator<'a> {
    pub fn new(system: &'a HotWaterSystem) -> Self {
        Self { system }
    }

    /// Energy in kWh needed each day to bring the day's demand from the supply
    /// temperature up to the reference temperature, before heater efficiency.
    pub fn daily_nominal(&self) -> Resolution<f64> {
        let HotWaterSystem {
            water_demand,
            reference_temperature,
            supply_temperature,
            ..
        } = self.system;

        match (water_demand, reference_temperature, supply_temperature) {
            (Some(demand), Some(reference), Some(supply)) => {
                Resolution::Resolved(water_heating_kwh(*demand, reference - supply))
            }
            _ => {
                let field = if water_demand.is_none() {
                    "hot_water_system.water_demand"
                } else if reference_temperature.is_none() {
                    "hot_water_system.reference_temperature"
                } else {
                    "hot_water_system.supply_temperature"
                };
                Resolution::Degraded(Warning::missing(
                    Subsystem::HotWater,
                    field,
                    "insufficient data to calculate hot water energy consumption",
                ))
            }
        }
    }

    /// Daily kWh with heater efficiency applied.
    pub fn daily(&self, sink: &mut dyn WarningSink) -> f64 {
        let nominal = self.daily_nominal().or_record(0., sink);

        match self.system.efficiency_cop {
            Some(cop) => nominal * cop,
            None => {
                sink.record(Warning::missing(
                    Subsystem::HotWater,
                    "hot_water_system.efficiency_cop",
                    "no heater efficiency given; hot water energy consumption taken as zero",
                ));
                0.
            }
        }
    }

    /// kWh of electricity per month. A system fed by any other energy source uses none.
    pub fn kwh_per_month(
        &self,
        sink: &mut dyn WarningSink,
    ) -> Result<MonthlyRow, InvalidDomainValueError> {
        if let Some(source) = &self.system.energy_source {
            if !source.is_electric("hot_water_system.energy_source")? {
                debug!(?source, "Hot water is not heated electrically");
                return Ok(ZERO_ROW);
            }
        }

        Ok(OperationalDays::standard().distribute(self.daily(sink)))
    }
}
