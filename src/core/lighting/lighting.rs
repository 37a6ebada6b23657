use crate::core::energy_supply::energy_supply::{
    aggregate_monthly_zonal_energy, MonthlyRow,
};
use crate::core::lighting::lamp_tables::{LampTableId, ReferenceTables};
use crate::core::schedule::OperationalDays;
use crate::core::units::watt_hours_to_kwh;
use crate::diagnostics::{Resolution, Subsystem, Warning, WarningKind, WarningSink};
use crate::errors::InvalidDomainValueError;
use crate::input::{
    BuildingSpecification, LightingBallast, LightingSystem, LightingTechnology,
    MAX_LIGHTING_ZONES,
};
use std::array;

/// How the power drawn by one luminaire is found for a lighting technology.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WattageRule {
    /// Lamps draw their rated power with no control gear losses.
    DirectWattage,
    LookupTable(LampTableId),
}

/// Pick the wattage rule for a technology and ballast pairing.
///
/// Only tubular T8 fluorescents distinguish between ballasts; any other technology
/// ignores a recognised ballast. Values outside either domain are rejected.
pub fn wattage_rule(
    technology: &LightingTechnology,
    ballast: Option<&LightingBallast>,
    zone: usize,
) -> Result<WattageRule, InvalidDomainValueError> {
    if let Some(LightingBallast::Unrecognised(value)) = ballast {
        return Err(InvalidDomainValueError::new(
            field_name(zone, "ballast"),
            value.as_str(),
            "lighting ballast",
        ));
    }

    Ok(match technology {
        LightingTechnology::Ic | LightingTechnology::Hal | LightingTechnology::Led => {
            WattageRule::DirectWattage
        }
        LightingTechnology::FtT8 => match ballast {
            Some(LightingBallast::Electronic) => {
                WattageRule::LookupTable(LampTableId::FtT8ElectronicBallast)
            }
            _ => WattageRule::LookupTable(LampTableId::FtT8),
        },
        LightingTechnology::FtT5 => WattageRule::LookupTable(LampTableId::FtT5),
        LightingTechnology::Fc => WattageRule::LookupTable(LampTableId::Fc),
        LightingTechnology::Vm => WattageRule::LookupTable(LampTableId::Vm),
        LightingTechnology::Vs => WattageRule::LookupTable(LampTableId::Vs),
        LightingTechnology::Im => WattageRule::LookupTable(LampTableId::Im),
        LightingTechnology::Ind => WattageRule::LookupTable(LampTableId::Ind),
        LightingTechnology::Unrecognised(value) => {
            return Err(InvalidDomainValueError::new(
                field_name(zone, "tech"),
                value.as_str(),
                "lighting technology",
            ))
        }
    })
}

fn field_name(zone: usize, field: &str) -> String {
    format!("lighting_systems[{zone}].{field}")
}

/// Power in W drawn by one luminaire of a lighting system, ballast included.
pub fn luminaire_wattage(
    system: &LightingSystem,
    zone: usize,
    tables: &ReferenceTables,
) -> Result<Resolution<f64>, InvalidDomainValueError> {
    let technology = match &system.technology {
        Some(technology) => technology,
        None => {
            return Ok(Resolution::Degraded(Warning::missing(
                Subsystem::Lighting,
                field_name(zone, "tech"),
                format!("no lighting technology given for zone {}", zone + 1),
            )))
        }
    };
    let rule = wattage_rule(technology, system.ballast.as_ref(), zone)?;

    let (lamp_power, lamp_number) = match (system.lamp_power, system.lamp_number) {
        (Some(lamp_power), Some(lamp_number)) => (lamp_power, lamp_number),
        (None, _) => {
            return Ok(Resolution::Degraded(Warning::missing(
                Subsystem::Lighting,
                field_name(zone, "lamp_power"),
                format!("no lamp power given for zone {}", zone + 1),
            )))
        }
        (_, None) => {
            return Ok(Resolution::Degraded(Warning::missing(
                Subsystem::Lighting,
                field_name(zone, "lamp_number"),
                format!("no lamp count given for zone {}", zone + 1),
            )))
        }
    };

    Ok(match rule {
        WattageRule::DirectWattage => Resolution::Resolved((lamp_power * lamp_number) as f64),
        WattageRule::LookupTable(id) => match tables
            .lamp_table(id)
            .and_then(|table| table.watts_per_luminaire(lamp_power, lamp_number))
        {
            Some(watts) => Resolution::Resolved(watts),
            None => Resolution::Degraded(Warning::new(
                Subsystem::Lighting,
                WarningKind::LookupMiss,
                field_name(zone, "lamp_power"),
                format!(
                    "{id} has no entry for {lamp_number} lamps of {lamp_power} W (zone {})",
                    zone + 1
                ),
            )),
        },
    })
}

/// Electricity used by the lighting systems of a building.
pub struct LightingCalculator<'a> {
    spec: &'a BuildingSpecification,
    tables: &'a ReferenceTables,
}

impl<'a> LightingCalculator<'a> {
    pub fn new(spec: &'a BuildingSpecification, tables: &'a ReferenceTables) -> Self {
        Self { spec, tables }
    }

    /// Power in W of one luminaire in a zone slot (0-based). An undeclared zone draws
    /// nothing.
    pub fn watts_per_luminaire(
        &self,
        zone: usize,
    ) -> Result<Resolution<f64>, InvalidDomainValueError> {
        match self.spec.lighting_system(zone) {
            Some(system) => luminaire_wattage(system, zone, self.tables),
            None => Ok(Resolution::Resolved(0.)),
        }
    }

    pub fn kwh_per_day_for_zone(
        &self,
        zone: usize,
        sink: &mut dyn WarningSink,
    ) -> Result<f64, InvalidDomainValueError> {
        let system = match self.spec.lighting_system(zone) {
            Some(system) => system,
            None => return Ok(0.),
        };
        let watts = self.watts_per_luminaire(zone)?.or_record(0., sink);

        let factors = [
            ("luminaire_number", system.luminaire_number.map(f64::from)),
            ("similar_zone_number", system.similar_zone_number.map(f64::from)),
            ("simultaneity_factor", system.simultaneity_factor),
            ("operating_hours", system.operating_hours),
        ];
        let mut watt_hours = watts;
        for (field, factor) in factors {
            match factor {
                Some(factor) => watt_hours *= factor,
                None => {
                    sink.record(Warning::missing(
                        Subsystem::Lighting,
                        field_name(zone, field),
                        format!(
                            "inadequate data to calculate lighting power for zone {}",
                            zone + 1
                        ),
                    ));
                    return Ok(0.);
                }
            }
        }

        Ok(watt_hours_to_kwh(watt_hours))
    }

    /// kWh per day for each of the zone slots.
    pub fn kwh_per_day_per_zone(
        &self,
        sink: &mut dyn WarningSink,
    ) -> Result<[f64; MAX_LIGHTING_ZONES], InvalidDomainValueError> {
        let mut daily = [0.; MAX_LIGHTING_ZONES];
        for (zone, kwh) in daily.iter_mut().enumerate() {
            *kwh = self.kwh_per_day_for_zone(zone, sink)?;
        }
        if self.spec.lighting_systems.len() > MAX_LIGHTING_ZONES {
            sink.record(Warning::new(
                Subsystem::Lighting,
                WarningKind::MissingInput,
                "lighting_systems",
                format!(
                    "only the first {MAX_LIGHTING_ZONES} of {} lighting systems are counted",
                    self.spec.lighting_systems.len()
                ),
            ));
        }
        Ok(daily)
    }

    pub fn kwh_per_month_per_zone(
        &self,
        sink: &mut dyn WarningSink,
    ) -> Result<[MonthlyRow; MAX_LIGHTING_ZONES], InvalidDomainValueError> {
        let days = OperationalDays::for_lighting();
        let daily = self.kwh_per_day_per_zone(sink)?;
        Ok(array::from_fn(|zone| days.distribute(daily[zone])))
    }

    pub fn kwh_per_month(
        &self,
        sink: &mut dyn WarningSink,
    ) -> Result<MonthlyRow, InvalidDomainValueError> {
        Ok(aggregate_monthly_zonal_energy(
            &self.kwh_per_month_per_zone(sink)?,
        ))
    }
}
