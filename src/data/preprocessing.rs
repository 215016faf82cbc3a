use anyhow::{bail, Context, Result};
use csv::Reader;
use ndarray::{Array1, Array2, Axis};
use ndarray_rand::rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Feature column headers, in the order the model consumes them.
pub const FEATURE_COLUMNS: [&str; 5] = ["SO2", "CO2", "PM10", "PM2.5", "Temperature"];
pub const TARGET_COLUMN: &str = "AQI";

pub struct Dataset {
    /// n × 5, temperature in °C
    pub features: Array2<f64>,
    pub targets: Array1<f64>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    fn select(&self, rows: &[usize]) -> Dataset {
        Dataset {
            features: self.features.select(Axis(0), rows),
            targets: self.targets.select(Axis(0), rows),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataStats {
    pub mean: Array1<f64>,
    pub std: Array1<f64>,
}

impl DataStats {
    /// Column mean and sample std. Constant columns get a std of 1 so they
    /// standardize to zero instead of NaN.
    pub fn fit(x: &Array2<f64>) -> DataStats {
        let mean = x
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(x.ncols()));
        let ddof = if x.nrows() > 1 { 1.0 } else { 0.0 };
        let std = x
            .std_axis(Axis(0), ddof)
            .mapv(|s| if s > 0.0 && s.is_finite() { s } else { 1.0 });
        DataStats { mean, std }
    }

    pub fn standardize(&self, x: &Array2<f64>) -> Array2<f64> {
        (x - &self.mean) / &self.std
    }
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    // The temperature header carries its unit, e.g. "Temperature (°C)".
    headers
        .iter()
        .position(|h| {
            let h = h.trim();
            if name == "Temperature" {
                h.starts_with(name)
            } else {
                h == name
            }
        })
        .with_context(|| format!("missing column '{}'", name))
}

pub fn load_dataset(csv_path: impl AsRef<Path>) -> Result<Dataset> {
    let csv_path = csv_path.as_ref();
    let file = File::open(csv_path)
        .with_context(|| format!("opening dataset {}", csv_path.display()))?;
    let mut rdr = Reader::from_reader(file);

    let headers = rdr.headers()?.clone();
    log::info!("Dataset columns: {:?}", headers.iter().collect::<Vec<_>>());

    let mut feature_idx = [0usize; 5];
    for (slot, name) in feature_idx.iter_mut().zip(FEATURE_COLUMNS) {
        *slot = find_column(&headers, name)?;
    }
    let target_idx = find_column(&headers, TARGET_COLUMN)?;

    let mut inputs = Vec::new();
    let mut outputs = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        let cell = |idx: usize, name: &str| -> Result<f64> {
            let raw = record.get(idx).unwrap_or("").trim();
            raw.parse::<f64>()
                .with_context(|| format!("row {}: bad {} value '{}'", row + 1, name, raw))
        };

        for (&idx, name) in feature_idx.iter().zip(FEATURE_COLUMNS) {
            inputs.push(cell(idx, name)?);
        }
        outputs.push(cell(target_idx, TARGET_COLUMN)?);
    }

    let features = Array2::from_shape_vec((outputs.len(), FEATURE_COLUMNS.len()), inputs)?;
    let targets = Array1::from(outputs);
    log::info!("Loaded {} rows from {}", targets.len(), csv_path.display());

    Ok(Dataset { features, targets })
}

/// Shuffles rows with a seeded RNG and holds out `ceil(n * test_size)` of
/// them for testing. Returns `(train, test)`.
pub fn train_test_split(data: &Dataset, test_size: f64, seed: u64) -> Result<(Dataset, Dataset)> {
    if data.is_empty() {
        bail!("cannot split an empty dataset");
    }
    if !(0.0..1.0).contains(&test_size) {
        bail!("test size must be in [0, 1), got {}", test_size);
    }

    let mut rows: Vec<usize> = (0..data.len()).collect();
    rows.shuffle(&mut StdRng::seed_from_u64(seed));

    let test_len = ((data.len() as f64) * test_size).ceil() as usize;
    let (test_rows, train_rows) = rows.split_at(test_len.min(data.len() - 1));

    Ok((data.select(train_rows), data.select(test_rows)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::path::PathBuf;

    fn write_csv(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}.csv", name, std::process::id()));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn loads_columns_by_header() {
        let path = write_csv(
            "reorder",
            "AQI,PM2.5,SO2,Temperature (°C),CO2,PM10\n\
             42,4,1,20,2,3\n\
             80,9,5,25,6,7\n",
        );
        let data = load_dataset(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(data.features, array![[1.0, 2.0, 3.0, 4.0, 20.0], [5.0, 6.0, 7.0, 9.0, 25.0]]);
        assert_eq!(data.targets, array![42.0, 80.0]);
    }

    #[test]
    fn missing_column_is_named() {
        let path = write_csv("missing", "SO2,CO2,PM10,Temperature,AQI\n1,2,3,4,5\n");
        let err = load_dataset(&path).err().unwrap();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains("PM2.5"));
    }

    #[test]
    fn bad_cell_reports_row() {
        let path = write_csv("badcell", "SO2,CO2,PM10,PM2.5,Temperature,AQI\n1,2,3,4,5,6\n1,x,3,4,5,6\n");
        let err = load_dataset(&path).err().unwrap();
        std::fs::remove_file(&path).ok();
        assert!(err.to_string().contains("row 2"));
    }

    fn sequential(n: usize) -> Dataset {
        let features = Array2::from_shape_fn((n, 5), |(r, c)| (r * 5 + c) as f64);
        let targets = Array1::from_iter((0..n).map(|r| r as f64));
        Dataset { features, targets }
    }

    #[test]
    fn split_sizes_and_disjointness() {
        let data = sequential(10);
        let (train, test) = train_test_split(&data, 0.2, 42).unwrap();
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);

        let mut all: Vec<f64> = train.targets.iter().chain(test.targets.iter()).copied().collect();
        all.sort_by(f64::total_cmp);
        assert_eq!(all, (0..10).map(|r| r as f64).collect::<Vec<_>>());

        // rows stay intact
        for (row, &t) in train.features.outer_iter().zip(train.targets.iter()) {
            assert_eq!(row[0], t * 5.0);
        }
    }

    #[test]
    fn split_is_reproducible() {
        let data = sequential(25);
        let (_, a) = train_test_split(&data, 0.2, 7).unwrap();
        let (_, b) = train_test_split(&data, 0.2, 7).unwrap();
        assert_eq!(a.targets, b.targets);
    }

    #[test]
    fn split_rejects_empty() {
        let data = sequential(0);
        assert!(train_test_split(&data, 0.2, 42).is_err());
    }

    #[test]
    fn stats_handle_constant_columns() {
        let x = array![[1.0, 5.0], [3.0, 5.0]];
        let stats = DataStats::fit(&x);
        assert_eq!(stats.std[1], 1.0);
        let z = stats.standardize(&x);
        assert_eq!(z.column(1).to_vec(), vec![0.0, 0.0]);
        assert!((z[[0, 0]] + z[[1, 0]]).abs() < 1e-12);
    }
}
