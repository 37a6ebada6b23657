pub const WATTS_PER_KILOWATT: u32 = 1_000;
pub const SECONDS_PER_HOUR: u32 = 3_600;
pub const HOURS_PER_DAY: u32 = 24;
pub const DAYS_PER_YEAR: u32 = 365;
pub const MONTHS_PER_YEAR: usize = 12;
pub const DAYS_IN_MONTH: [u32; MONTHS_PER_YEAR] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

// Specific heat capacity of water, in J/(g.K)
pub const SPECIFIC_HEAT_CAPACITY_WATER: f64 = 4.18;

/// Energy in kWh to raise a volume of water through a temperature difference.
///
/// Arguments:
/// * `litres` - volume of water, taken as 1 kg per litre
/// * `temperature_rise` - in Kelvin (or degrees Celsius)
pub(crate) fn water_heating_kwh(litres: f64, temperature_rise: f64) -> f64 {
    // kJ = J/(g.K) * K * kg; kWh = kJ / 3600
    SPECIFIC_HEAT_CAPACITY_WATER * temperature_rise * litres / SECONDS_PER_HOUR as f64
}

pub(crate) fn watt_hours_to_kwh(watt_hours: f64) -> f64 {
    watt_hours / WATTS_PER_KILOWATT as f64
}
