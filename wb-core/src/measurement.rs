use crate::reading::Reading;
use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::io::Read;
use wb_utils::dates::parse_date;

/// A single observation from the upstream measurement table.
///
/// Column names follow the upstream table: `Date, Reservoir, Station,
/// Measure, TimeOfDay, Value, Unit, Season`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    /// Object identifier (reservoir, gauge, canal)
    #[serde(rename = "Reservoir")]
    pub object: String,
    /// Optional sub-station within the object
    #[serde(rename = "Station", default)]
    pub station: Option<String>,
    /// Free-text measure name, e.g. "приток", "объём", "сброс"
    #[serde(rename = "Measure")]
    pub measure: String,
    #[serde(rename = "TimeOfDay", default)]
    pub time_of_day: String,
    /// Raw value exactly as supplied; see [`Measurement::reading`]
    #[serde(rename = "Value", default)]
    pub value: String,
    #[serde(rename = "Unit", default)]
    pub unit: String,
    #[serde(rename = "Season", default)]
    pub season: String,
}

/// Rows as they come off the CSV reader, before the date is checked.
#[derive(Debug, Deserialize)]
struct MeasurementRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Reservoir", default)]
    object: String,
    #[serde(rename = "Station", default)]
    station: String,
    #[serde(rename = "Measure", default)]
    measure: String,
    #[serde(rename = "TimeOfDay", default)]
    time_of_day: String,
    #[serde(rename = "Value", default)]
    value: String,
    #[serde(rename = "Unit", default)]
    unit: String,
    #[serde(rename = "Season", default)]
    season: String,
}

impl MeasurementRow {
    fn into_measurement(self, date: NaiveDate) -> Measurement {
        let station = Some(self.station.trim().to_string()).filter(|s| !s.is_empty());
        Measurement {
            date,
            object: self.object,
            station,
            measure: self.measure,
            time_of_day: self.time_of_day,
            value: self.value,
            unit: self.unit,
            season: self.season,
        }
    }
}

/// Measurements read from a table, plus the rows that had to be dropped.
#[derive(Debug, Default)]
pub struct MeasurementTable {
    pub measurements: Vec<Measurement>,
    /// Rows dropped because their date could not be parsed.
    pub skipped_rows: usize,
}

impl Measurement {
    /// A measurement with only the fields the analytics look at.
    pub fn new(date: NaiveDate, object: &str, measure: &str, value: &str) -> Measurement {
        Measurement {
            date,
            object: object.to_string(),
            station: None,
            measure: measure.to_string(),
            time_of_day: String::new(),
            value: value.to_string(),
            unit: String::new(),
            season: String::new(),
        }
    }

    /// Parse the raw value.
    pub fn reading(&self) -> Reading {
        Reading::parse(&self.value)
    }

    /// Read a headed CSV measurement table.
    ///
    /// Rows whose date is not well-formed are skipped and counted; the value
    /// column is kept raw, so unparseable values survive as missing readings.
    pub fn read_csv<R: Read>(reader: R) -> Result<MeasurementTable, csv::Error> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(reader);
        let mut table = MeasurementTable::default();
        for (index, result) in rdr.deserialize::<MeasurementRow>().enumerate() {
            let row = result?;
            match parse_date(&row.date) {
                Ok(date) => table.measurements.push(row.into_measurement(date)),
                Err(e) => {
                    warn!("Skipping row {}: {}", index + 1, e);
                    table.skipped_rows += 1;
                }
            }
        }
        debug!(
            "Read {} measurements ({} rows skipped)",
            table.measurements.len(),
            table.skipped_rows
        );
        Ok(table)
    }
}

#[cfg(test)]
mod test {
    use super::Measurement;
    use crate::reading::Reading;
    use chrono::NaiveDate;

    const STR_RESULT: &str = "\
Date,Reservoir,Station,Measure,TimeOfDay,Value,Unit,Season
2023-10-01,Токтогульское вдхр.,,приток,утро,\"512,4\",м3/с,межвегетация
2023-10-02,Токтогульское вдхр.,,приток,утро,,м3/с,межвегетация
02.10.2023,г/п Учтепа,пост 1,расход,утро,98.5,м3/с,межвегетация
not-a-date,г/п Учтепа,,расход,утро,1,м3/с,межвегетация
";

    #[test]
    fn test_read_csv() {
        let table = Measurement::read_csv(STR_RESULT.as_bytes()).unwrap();
        assert_eq!(table.measurements.len(), 3);
        assert_eq!(table.skipped_rows, 1);

        let first = &table.measurements[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2023, 10, 1).unwrap());
        assert_eq!(first.object, "Токтогульское вдхр.");
        assert_eq!(first.station, None);
        assert_eq!(first.reading(), Reading::Present(512.4));

        assert_eq!(table.measurements[1].reading(), Reading::Missing);

        let third = &table.measurements[2];
        assert_eq!(third.date, NaiveDate::from_ymd_opt(2023, 10, 2).unwrap());
        assert_eq!(third.station.as_deref(), Some("пост 1"));
        assert_eq!(third.season, "межвегетация");
    }

    #[test]
    fn test_read_csv_minimal_columns() {
        let csv = "Date,Reservoir,Measure,Value\n2024-01-05,Чарвакское вдхр.,сброс,12\n";
        let table = Measurement::read_csv(csv.as_bytes()).unwrap();
        assert_eq!(table.measurements.len(), 1);
        assert_eq!(table.measurements[0].unit, "");
        assert_eq!(table.measurements[0].reading(), Reading::Present(12.0));
    }

    #[test]
    fn test_serde_shape() {
        let m = Measurement::new(
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            "река Угам",
            "расход",
            "4,2",
        );
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["Date"], "2024-03-01");
        assert_eq!(json["Reservoir"], "река Угам");
        assert_eq!(json["Value"], "4,2");
    }
}
