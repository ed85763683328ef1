//! CSV dataset codec.
//!
//! Files carry a header row with the 8 feature columns and `MedHouseVal`.
//! Columns are located by name so their order in the file does not matter.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use data_spi::{
    DataError, Dataset, DatasetStore, FeatureVector, LabeledExample, Result, FEATURE_COUNT,
    FEATURE_NAMES, TARGET_NAME,
};

/// Significant digits used when writing values.
///
/// 17 digits identify every `f64` exactly, so a write/read cycle returns
/// the same values regardless of magnitude.
pub const SIGNIFICANT_DIGITS: usize = 17;

/// Format `value` rounded to `digits` significant digits, without trailing zeros.
///
/// ```rust
/// use data_core::format_significant;
///
/// assert_eq!(format_significant(41.0, 10), "41");
/// assert_eq!(format_significant(0.1234567890123, 10), "0.123456789");
/// ```
pub fn format_significant(value: f64, digits: usize) -> String {
    let digits = digits.max(1);
    let scientific = format!("{:.*e}", digits - 1, value);
    match scientific.parse::<f64>() {
        Ok(rounded) => rounded.to_string(),
        Err(_) => scientific,
    }
}

/// Largest absolute difference between two datasets, over all targets and features.
///
/// Returns `None` when the datasets have different lengths.
pub fn max_abs_difference(a: &Dataset, b: &Dataset) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }

    let diff = a
        .iter()
        .zip(b.iter())
        .flat_map(|(x, y)| {
            let features = x
                .features
                .as_slice()
                .iter()
                .zip(y.features.as_slice())
                .map(|(p, q)| (p - q).abs());
            std::iter::once((x.target - y.target).abs()).chain(features)
        })
        .fold(0.0_f64, f64::max);

    Some(diff)
}

/// CSV implementation of [`DatasetStore`].
#[derive(Debug, Clone)]
pub struct CsvDatasetStore {
    digits: usize,
}

impl Default for CsvDatasetStore {
    fn default() -> Self {
        Self {
            digits: SIGNIFICANT_DIGITS,
        }
    }
}

impl CsvDatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of significant digits written per value.
    pub fn with_digits(mut self, digits: usize) -> Self {
        self.digits = digits.max(1);
        self
    }

    /// Parse a dataset from any CSV reader.
    pub fn read_from<R: Read>(&self, reader: R) -> Result<Dataset> {
        let mut reader = csv::Reader::from_reader(reader);
        let headers = reader
            .headers()
            .map_err(|e| DataError::ParseError(e.to_string()))?
            .clone();

        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| DataError::MissingColumn(name.to_string()))
        };

        let mut feature_columns = [0usize; FEATURE_COUNT];
        for (slot, name) in feature_columns.iter_mut().zip(FEATURE_NAMES) {
            *slot = column(name)?;
        }
        let target_column = column(TARGET_NAME)?;

        if headers.len() > FEATURE_COUNT + 1 {
            tracing::warn!(
                columns = headers.len(),
                "CSV has extra columns; only the housing features and target are read"
            );
        }

        let mut dataset = Dataset::default();
        for (idx, record) in reader.records().enumerate() {
            let row = idx + 1;
            let record = record.map_err(|e| DataError::ParseError(e.to_string()))?;

            let cell = |col: usize, name: &str| -> Result<f64> {
                let raw = record.get(col).unwrap_or("");
                raw.trim().parse::<f64>().map_err(|_| DataError::InvalidValue {
                    row,
                    column: name.to_string(),
                    value: raw.to_string(),
                })
            };

            let mut values = [0.0; FEATURE_COUNT];
            for ((value, &col), name) in values.iter_mut().zip(&feature_columns).zip(FEATURE_NAMES) {
                *value = cell(col, name)?;
            }
            let target = cell(target_column, TARGET_NAME)?;
            if !target.is_finite() {
                return Err(DataError::NonFinite {
                    field: TARGET_NAME.to_string(),
                });
            }

            dataset.push(LabeledExample::new(FeatureVector::new(values)?, target));
        }

        Ok(dataset)
    }

    /// Serialize a dataset to any writer.
    pub fn write_to<W: Write>(&self, dataset: &Dataset, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);

        let header: Vec<&str> = FEATURE_NAMES
            .iter()
            .copied()
            .chain(std::iter::once(TARGET_NAME))
            .collect();
        writer
            .write_record(&header)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        for example in dataset {
            let record: Vec<String> = example
                .features
                .as_slice()
                .iter()
                .chain(std::iter::once(&example.target))
                .map(|v| format_significant(*v, self.digits))
                .collect();
            writer
                .write_record(&record)
                .map_err(|e| DataError::ParseError(e.to_string()))?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl DatasetStore for CsvDatasetStore {
    fn name(&self) -> &str {
        "csv"
    }

    fn load(&self, path: &Path) -> Result<Dataset> {
        let file = File::open(path)?;
        let dataset = self.read_from(BufReader::new(file))?;
        tracing::debug!(path = %path.display(), rows = dataset.len(), "loaded dataset");
        Ok(dataset)
    }

    fn save(&self, dataset: &Dataset, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        self.write_to(dataset, BufWriter::new(file))?;
        tracing::debug!(path = %path.display(), rows = dataset.len(), "saved dataset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
MedInc,HouseAge,AveRooms,AveBedrms,Population,AveOccup,Latitude,Longitude,MedHouseVal
8.3252,41,6.984126984,1.023809524,322,2.555555556,37.88,-122.23,4.526
8.3014,21,6.238137083,0.9718804921,2401,2.109841828,37.86,-122.22,3.585
";

    #[test]
    fn test_format_significant_rounds() {
        assert_eq!(format_significant(6.98412698412698, 10), "6.984126984");
        assert_eq!(format_significant(-122.23, 10), "-122.23");
        assert_eq!(format_significant(322.0, 10), "322");
    }

    #[test]
    fn test_read_sample() {
        let ds = CsvDatasetStore::new().read_from(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.examples()[0].target, 4.526);
        assert_eq!(ds.examples()[1].features.get("Population"), Some(2401.0));
    }

    #[test]
    fn test_columns_located_by_name() {
        let csv = "\
MedHouseVal,Longitude,Latitude,AveOccup,Population,AveBedrms,AveRooms,HouseAge,MedInc
1.5,-120,35,2,100,1,5,30,4
";
        let ds = CsvDatasetStore::new().read_from(csv.as_bytes()).unwrap();
        let ex = ds.examples()[0];
        assert_eq!(ex.target, 1.5);
        assert_eq!(ex.features.values(), &[4.0, 30.0, 5.0, 1.0, 100.0, 2.0, 35.0, -120.0]);
    }

    #[test]
    fn test_missing_target_column() {
        let csv = "MedInc,HouseAge,AveRooms,AveBedrms,Population,AveOccup,Latitude,Longitude\n1,2,3,4,5,6,7,8\n";
        match CsvDatasetStore::new().read_from(csv.as_bytes()) {
            Err(DataError::MissingColumn(name)) => assert_eq!(name, "MedHouseVal"),
            other => panic!("Expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_cell() {
        let csv = "\
MedInc,HouseAge,AveRooms,AveBedrms,Population,AveOccup,Latitude,Longitude,MedHouseVal
1,2,three,4,5,6,7,8,9
";
        match CsvDatasetStore::new().read_from(csv.as_bytes()) {
            Err(DataError::InvalidValue { row, column, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(column, "AveRooms");
            }
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_write_then_read_in_memory() {
        let store = CsvDatasetStore::new();
        let original = store.read_from(SAMPLE.as_bytes()).unwrap();

        let mut buffer = Vec::new();
        store.write_to(&original, &mut buffer).unwrap();
        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.starts_with("MedInc,HouseAge"));
        assert!(text.lines().next().unwrap().ends_with("MedHouseVal"));

        let reread = store.read_from(buffer.as_slice()).unwrap();
        assert!(max_abs_difference(&original, &reread).unwrap() < 1e-6);
    }

    #[test]
    fn test_large_values_survive_round_trip() {
        let store = CsvDatasetStore::new();
        let features =
            FeatureVector::new([8.3252, 41.0, 6.98, 1.02, 35682.123456789, 2.55, 37.88, -122.23])
                .unwrap();
        let original: Dataset = std::iter::once(LabeledExample::new(features, 4.526)).collect();

        let mut buffer = Vec::new();
        store.write_to(&original, &mut buffer).unwrap();
        let reread = store.read_from(buffer.as_slice()).unwrap();

        assert_eq!(
            reread.examples()[0].features.get("Population"),
            Some(35682.123456789)
        );
        assert!(max_abs_difference(&original, &reread).unwrap() < 1e-6);
    }

    #[test]
    fn test_default_digits_are_exact() {
        for value in [35682.123456789, 0.1, -122.23, 1e-7, 6.98412698412698] {
            let written = format_significant(value, SIGNIFICANT_DIGITS);
            assert_eq!(written.parse::<f64>().unwrap(), value);
        }
    }

    #[test]
    fn test_max_abs_difference_length_mismatch() {
        let store = CsvDatasetStore::new();
        let ds = store.read_from(SAMPLE.as_bytes()).unwrap();
        assert!(max_abs_difference(&ds, &ds.subset(&[0])).is_none());
    }
}
