use crate::core::energy_supply::energy_supply::{MonthlyRow, ZERO_ROW};
use crate::core::schedule::OperationalDays;
use crate::diagnostics::{Subsystem, Warning, WarningKind, WarningSink};
use crate::errors::InvalidDomainValueError;
use crate::input::VentilationSystem;
use tracing::debug;

/// Electricity used by mechanical ventilation.
pub struct VentilationCalculator<'a> {
    system: &'a VentilationSystem,
}

impl<'a> VentilationCalculator<'a> {
    pub fn new(system: &'a VentilationSystem) -> Self {
        Self { system }
    }

    /// Hours the system runs each operational day. Both the on and off hours are run.
    pub fn hours_per_day(&self, sink: &mut dyn WarningSink) -> u32 {
        let (on_time, off_time) = match (self.system.on_time, self.system.off_time) {
            (Some(on_time), Some(off_time)) => (on_time, off_time),
            (on_time, _) => {
                sink.record(Warning::missing(
                    Subsystem::Ventilation,
                    if on_time.is_none() {
                        "ventilation_system.on_time"
                    } else {
                        "ventilation_system.off_time"
                    },
                    "insufficient information to calculate ventilation hours",
                ));
                return 0;
            }
        };

        if off_time < on_time {
            sink.record(Warning::new(
                Subsystem::Ventilation,
                WarningKind::MisconfiguredWindow,
                "ventilation_system.off_time",
                format!("ventilation switches off at {off_time}, before it switches on at {on_time}; assuming zero hours"),
            ));
            return 0;
        }

        off_time - on_time + 1
    }

    /// Mechanical ventilation hours in each month.
    pub fn mv_hours_per_month(&self, sink: &mut dyn WarningSink) -> MonthlyRow {
        OperationalDays::standard().distribute(self.hours_per_day(sink) as f64)
    }

    pub fn kwh_per_month(
        &self,
        sink: &mut dyn WarningSink,
    ) -> Result<MonthlyRow, InvalidDomainValueError> {
        if let Some(source) = &self.system.energy_source {
            if !source.is_electric("ventilation_system.energy_source")? {
                debug!(?source, "Ventilation is not electrically powered");
                return Ok(ZERO_ROW);
            }
        }

        let power = self.system.rated_input_power.unwrap_or_else(|| {
            sink.record(Warning::missing(
                Subsystem::Ventilation,
                "ventilation_system.rated_input_power",
                "no ventilation system power specified; assuming zero ventilation energy use",
            ));
            0.
        });

        Ok(self.mv_hours_per_month(sink).map(|hours| hours * power))
    }
}
