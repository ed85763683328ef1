//! Feature quantization for histogram-based tree growth.
//!
//! Each feature gets a sorted list of cut points. A value maps to the number
//! of cuts strictly below it, so `value <= cuts[b]` holds exactly when
//! `bin(value) <= b`. Trees store `cuts[b]` as the split threshold and can
//! therefore predict on raw values.

/// Maximum number of bins per feature; bin indices fit in a `u8`.
pub const MAX_BINS: usize = 256;

/// Value-to-bin mapping for one feature.
#[derive(Debug, Clone, PartialEq)]
pub struct BinMapper {
    /// Sorted split candidates; at most `MAX_BINS - 1` entries.
    cuts: Vec<f64>,
}

impl BinMapper {
    /// Derive cut points from a feature column.
    ///
    /// With at most `max_bins` distinct values every boundary between
    /// neighbours becomes a cut (their midpoint). Otherwise cuts are
    /// equal-frequency quantiles of the column.
    pub fn fit(values: &[f64], max_bins: usize) -> Self {
        let max_bins = max_bins.clamp(2, MAX_BINS);

        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);

        let mut distinct = sorted.clone();
        distinct.dedup();

        let cuts = if distinct.len() <= max_bins {
            distinct
                .windows(2)
                .map(|w| w[0] + (w[1] - w[0]) / 2.0)
                .collect()
        } else {
            let n = sorted.len();
            let last = sorted[n - 1];
            let mut cuts: Vec<f64> = (1..max_bins)
                .map(|i| sorted[i * n / max_bins])
                .filter(|&c| c < last)
                .collect();
            cuts.dedup();
            cuts
        };

        Self { cuts }
    }

    pub fn bin(&self, value: f64) -> u8 {
        self.cuts.partition_point(|&c| c < value) as u8
    }

    pub fn n_bins(&self) -> usize {
        self.cuts.len() + 1
    }

    /// Threshold separating bins `..=bin` from the rest.
    pub fn threshold(&self, bin: usize) -> f64 {
        self.cuts[bin]
    }

    pub fn cuts(&self) -> &[f64] {
        &self.cuts
    }
}

/// A column-major quantized feature matrix.
#[derive(Debug, Clone)]
pub struct BinnedMatrix {
    mappers: Vec<BinMapper>,
    columns: Vec<Vec<u8>>,
    n_rows: usize,
}

impl BinnedMatrix {
    /// Fit one mapper per feature and quantize every row.
    pub fn from_rows(rows: &[&[f64]], n_features: usize, max_bins: usize) -> Self {
        let mut mappers = Vec::with_capacity(n_features);
        let mut columns = Vec::with_capacity(n_features);

        for feature in 0..n_features {
            let values: Vec<f64> = rows.iter().map(|r| r[feature]).collect();
            let mapper = BinMapper::fit(&values, max_bins);
            columns.push(values.iter().map(|&v| mapper.bin(v)).collect());
            mappers.push(mapper);
        }

        Self {
            mappers,
            columns,
            n_rows: rows.len(),
        }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_features(&self) -> usize {
        self.mappers.len()
    }

    pub fn mapper(&self, feature: usize) -> &BinMapper {
        &self.mappers[feature]
    }

    pub fn column(&self, feature: usize) -> &[u8] {
        &self.columns[feature]
    }

    pub fn get(&self, row: usize, feature: usize) -> u8 {
        self.columns[feature][row]
    }
}
