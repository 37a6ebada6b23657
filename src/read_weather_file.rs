use anyhow::{anyhow, bail, Context};
use csv::ReaderBuilder as CsvReaderBuilder;
use indexmap::IndexMap;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

const COLUMN_LATITUDE: usize = 6;
const COLUMN_LONGITUDE: usize = 7;
const COLUMN_AIR_TEMP: usize = 6; // dry bulb temp in degrees
const COLUMN_RELATIVE_HUMIDITY: usize = 8; // in percent
const HEADER_ROWS: usize = 8;

const EPW_EXTENSION: &str = "epw";

/// Hourly weather for a year, one entry per hour.
#[derive(Clone, Debug, PartialEq)]
pub struct WeatherData {
    pub air_temperatures: Vec<f64>,
    pub relative_humidities: Vec<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Read an EnergyPlus weather (EPW) file: a location row, seven further header rows,
/// then one row per hour.
pub fn weather_data_to_vec(file: impl Read) -> anyhow::Result<WeatherData> {
    let mut reader = CsvReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(file);

    let mut air_temperatures = vec![];
    let mut relative_humidities = vec![];
    let mut latitude: Option<f64> = None;
    let mut longitude: Option<f64> = None;

    for (i, result) in reader.records().enumerate() {
        let record: csv::StringRecord = result?;
        if i == 0 {
            latitude = record.get(COLUMN_LATITUDE).and_then(|value| value.trim().parse().ok());
            longitude = record.get(COLUMN_LONGITUDE).and_then(|value| value.trim().parse().ok());
        } else if i >= HEADER_ROWS {
            air_temperatures.push(parse_column(&record, COLUMN_AIR_TEMP, i)?);
            relative_humidities.push(parse_column(&record, COLUMN_RELATIVE_HUMIDITY, i)?);
        }
    }

    if air_temperatures.is_empty() {
        bail!("Weather file holds no hourly rows");
    }

    Ok(WeatherData {
        air_temperatures,
        relative_humidities,
        latitude,
        longitude,
    })
}

fn parse_column(record: &csv::StringRecord, column: usize, row: usize) -> anyhow::Result<f64> {
    record
        .get(column)
        .ok_or_else(|| anyhow!("Weather file row {} has no column {column}", row + 1))?
        .trim()
        .parse()
        .with_context(|| format!("Weather file row {} column {column} is not a number", row + 1))
}

/// Source of hourly weather, looked up by the file name held in a building specification.
pub trait WeatherProvider: Send + Sync {
    fn hourly_weather(&self, file_name: &str) -> anyhow::Result<Arc<WeatherData>>;
}

/// EPW files in a directory on disk.
#[derive(Clone, Debug)]
pub struct EpwDirectory {
    directory: PathBuf,
}

impl EpwDirectory {
    pub fn new(directory: impl AsRef<Path>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    /// Names of the EPW files available in the directory.
    pub fn available_files(&self) -> anyhow::Result<Vec<String>> {
        let mut files = fs::read_dir(&self.directory)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .is_some_and(|extension| extension.eq_ignore_ascii_case(EPW_EXTENSION))
            })
            .filter_map(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .map(str::to_owned)
            })
            .collect::<Vec<_>>();
        files.sort();
        Ok(files)
    }
}

impl WeatherProvider for EpwDirectory {
    fn hourly_weather(&self, file_name: &str) -> anyhow::Result<Arc<WeatherData>> {
        let path = self.directory.join(file_name);
        let file = File::open(&path)
            .with_context(|| format!("Could not open weather file {}", path.display()))?;
        let weather = weather_data_to_vec(BufReader::new(file))
            .with_context(|| format!("Could not read weather file {}", path.display()))?;
        Ok(Arc::new(weather))
    }
}

impl WeatherProvider for IndexMap<String, Arc<WeatherData>> {
    fn hourly_weather(&self, file_name: &str) -> anyhow::Result<Arc<WeatherData>> {
        self.get(file_name)
            .cloned()
            .ok_or_else(|| anyhow!("No weather data loaded under the name '{file_name}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    const HEADER: &str = "LOCATION,Lisbon,-,PRT,IWEC,085360,38.73,-9.15,0.0,71.0
DESIGN CONDITIONS,0
TYPICAL/EXTREME PERIODS,0
GROUND TEMPERATURES,0
HOLIDAYS/DAYLIGHT SAVINGS,No,0,0,0
COMMENTS 1,synthetic
COMMENTS 2,synthetic
DATA PERIODS,1,1,Data,Sunday, 1/ 1,12/31
";

    fn epw(rows: &[(f64, f64)]) -> String {
        let mut epw = HEADER.to_string();
        for (hour, (dry_bulb, humidity)) in rows.iter().enumerate() {
            epw.push_str(&format!(
                "1999,1,1,{},60,?9?9?9,{dry_bulb},5.0,{humidity},101000\n",
                hour + 1
            ));
        }
        epw
    }

    #[rstest]
    fn should_read_dry_bulb_and_humidity() {
        let weather =
            weather_data_to_vec(epw(&[(10.5, 80.), (11., 75.), (12.25, 70.)]).as_bytes()).unwrap();
        assert_eq!(weather.air_temperatures, vec![10.5, 11., 12.25]);
        assert_eq!(weather.relative_humidities, vec![80., 75., 70.]);
        assert_eq!(weather.latitude, Some(38.73));
        assert_eq!(weather.longitude, Some(-9.15));
    }

    #[rstest]
    fn should_reject_file_without_hourly_rows() {
        assert!(weather_data_to_vec(HEADER.as_bytes()).is_err());
    }

    #[rstest]
    fn should_reject_non_numeric_temperature() {
        let mut file = HEADER.to_string();
        file.push_str("1999,1,1,1,60,?9?9?9,warm,5.0,80,101000\n");
        assert!(weather_data_to_vec(file.as_bytes()).is_err());
    }

    #[rstest]
    fn should_look_up_weather_held_in_memory() {
        let weather = Arc::new(weather_data_to_vec(epw(&[(20., 50.)]).as_bytes()).unwrap());
        let provider = IndexMap::from([("lisbon.epw".to_string(), weather.clone())]);
        assert_eq!(provider.hourly_weather("lisbon.epw").unwrap(), weather);
        assert!(provider.hourly_weather("porto.epw").is_err());
    }

    #[rstest]
    fn should_report_missing_file_in_directory() {
        let provider = EpwDirectory::new(std::env::temp_dir().join("openbes-no-such-directory"));
        assert!(provider.hourly_weather("lisbon.epw").is_err());
        assert!(provider.available_files().is_err());
    }
}
