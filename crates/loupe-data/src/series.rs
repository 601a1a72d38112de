// Time series — per-collection table of five market metrics
//
// time_series.json is a JSON array of records, one per timestep, in on-disk
// order:
//
//   [
//     {"floorEth": 0.51, "floorUsd": 912.4, "salesCount": 37,
//      "volumeEth": 18.9, "volumeUsd": 33790.1, "timestamp": 1650000000},
//     ...
//   ]
//
// Only the five metric fields are read; anything else in a record is
// ignored. A `null` metric reads as NaN, a missing metric is a parse error.

use loupe_core::Tensor;
use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};

/// Number of metrics per timestep.
pub const NUM_FIELDS: usize = 5;

/// Metric names in the order they appear in every row and window.
pub const FIELD_NAMES: [&str; NUM_FIELDS] =
    ["floorEth", "floorUsd", "salesCount", "volumeEth", "volumeUsd"];

/// One timestep of a collection's series.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRow {
    #[serde(deserialize_with = "nullable_f64")]
    pub floor_eth: f64,
    #[serde(deserialize_with = "nullable_f64")]
    pub floor_usd: f64,
    #[serde(deserialize_with = "nullable_f64")]
    pub sales_count: f64,
    #[serde(deserialize_with = "nullable_f64")]
    pub volume_eth: f64,
    #[serde(deserialize_with = "nullable_f64")]
    pub volume_usd: f64,
}

fn nullable_f64<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(d)?.unwrap_or(f64::NAN))
}

impl MetricRow {
    /// The five metrics in [`FIELD_NAMES`] order.
    pub fn fields(&self) -> [f64; NUM_FIELDS] {
        [
            self.floor_eth,
            self.floor_usd,
            self.sales_count,
            self.volume_eth,
            self.volume_usd,
        ]
    }
}

impl From<[f64; NUM_FIELDS]> for MetricRow {
    fn from(f: [f64; NUM_FIELDS]) -> Self {
        MetricRow {
            floor_eth: f[0],
            floor_usd: f[1],
            sales_count: f[2],
            volume_eth: f[3],
            volume_usd: f[4],
        }
    }
}

/// Ordered rows of one collection, exactly as stored on disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    rows: Vec<MetricRow>,
}

impl TimeSeries {
    pub fn new(rows: Vec<MetricRow>) -> Self {
        Self { rows }
    }

    /// Parse a records-oriented JSON document.
    pub fn from_json_slice(bytes: &[u8]) -> serde_json::Result<Self> {
        let rows: Vec<MetricRow> = serde_json::from_slice(bytes)?;
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[MetricRow] {
        &self.rows
    }

    /// The five metrics of the row at `offset`.
    pub fn row(&self, offset: usize) -> Result<[f64; NUM_FIELDS]> {
        self.rows
            .get(offset)
            .map(MetricRow::fields)
            .ok_or(Error::OffsetOutOfRange {
                offset,
                len: self.rows.len(),
            })
    }

    /// `[1, len, 5]` window whose row `i` is series row `i` (oldest first).
    pub fn leading_window(&self, len: usize) -> Result<Tensor> {
        assemble((0..len).map(|i| self.row(i)), len)
    }

    /// `[1, len, 5]` window ending at `offset`, most recent first: row 0 is
    /// series row `offset`, row `len - 1` is series row `offset - len + 1`.
    pub fn window_ending_at(&self, offset: usize, len: usize) -> Result<Tensor> {
        if offset + 1 < len {
            return Err(Error::OffsetOutOfRange {
                offset,
                len: self.rows.len(),
            });
        }
        assemble((0..len).map(|k| self.row(offset - k)), len)
    }
}

fn assemble(
    rows: impl Iterator<Item = Result<[f64; NUM_FIELDS]>>,
    len: usize,
) -> Result<Tensor> {
    let mut data = Vec::with_capacity(len * NUM_FIELDS);
    for row in rows {
        data.extend(row?.iter().map(|&v| v as f32));
    }
    let window = Tensor::from_vec(data, (len, NUM_FIELDS))?;
    Ok(window.unsqueeze(0)?)
}
