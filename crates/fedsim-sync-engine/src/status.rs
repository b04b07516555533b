//! Status reconciliation
//!
//! Turns one raw status payload into the canonical [`StatusSnapshot`] plus
//! the derived chart sequence. The reconciler is a pure total function:
//! malformed fields degrade to empty/absent values, they never abort the
//! reconciliation.

use serde_json::Value;
use tracing::warn;

/// Backend-reported run status.
///
/// Anything the backend reports outside this set (older deployments publish
/// `COMPLETED` once a run finishes) degrades to [`RunStatus::Idle`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RunStatus {
    #[default]
    Idle,
    Running,
    Error,
}

impl RunStatus {
    /// Parse the wire string, degrading unknown values to `Idle`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "RUNNING" => Self::Running,
            "ERROR" => Self::Error,
            _ => Self::Idle,
        }
    }

    /// The wire spelling, used for the status badge.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Running => "RUNNING",
            Self::Error => "ERROR",
        }
    }
}

/// One point of the training chart.
///
/// Produced either from live metrics (round + loss, and accuracy where the
/// payload carries it) or from persisted history (round + accuracy only).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChartPoint {
    pub round: u64,
    pub loss: Option<f64>,
    pub accuracy: Option<f64>,
}

/// Canonical view of one status payload.
///
/// Replaced wholesale on every successful status poll; the render layer never
/// sees a partially updated snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatusSnapshot {
    pub status: RunStatus,
    pub current_round: u64,
    pub total_rounds: u64,
    /// Log lines in backend order, oldest first. Display reverses them.
    pub logs: Vec<String>,
    /// Present only while `status == Error`; stale error text never survives
    /// a recovered run.
    pub error_details: Option<String>,
    /// Live chart points zipped from the metrics arrays, ascending by round.
    pub chart: Vec<ChartPoint>,
}

/// Reconcile one raw status payload into the canonical snapshot.
///
/// The caller guarantees only that `raw` is valid JSON; every field may be
/// missing or of the wrong type.
pub fn reconcile(raw: &Value) -> StatusSnapshot {
    let status = raw
        .get("status")
        .and_then(Value::as_str)
        .map(RunStatus::parse)
        .unwrap_or_default();

    let error_details = if status == RunStatus::Error {
        raw.get("error_details")
            .and_then(Value::as_str)
            .map(str::to_string)
    } else {
        None
    };

    StatusSnapshot {
        status,
        current_round: raw.get("current_round").and_then(Value::as_u64).unwrap_or(0),
        total_rounds: raw.get("total_rounds").and_then(Value::as_u64).unwrap_or(0),
        logs: string_array(raw.get("logs")),
        error_details,
        chart: derive_chart(raw.get("metrics")),
    }
}

/// Zip the parallel metric arrays into chart points.
///
/// If the arrays differ in length the result is truncated to the shortest;
/// that is a data-quality issue worth a warning, never a crash.
fn derive_chart(metrics: Option<&Value>) -> Vec<ChartPoint> {
    let Some(metrics) = metrics else {
        return Vec::new();
    };

    let Some(rounds) = metrics.get("rounds").and_then(Value::as_array) else {
        return Vec::new();
    };
    if rounds.is_empty() {
        return Vec::new();
    }

    let loss = float_series(metrics.get("loss"));
    let accuracy = float_series(metrics.get("accuracy"));

    let mut len = rounds.len();
    for series in [&loss, &accuracy].into_iter().flatten() {
        len = len.min(series.len());
    }
    if len < rounds.len() {
        warn!(
            rounds = rounds.len(),
            truncated_to = len,
            "metric arrays differ in length, truncating chart"
        );
    }

    let mut chart = Vec::with_capacity(len);
    for (i, raw_round) in rounds.iter().take(len).enumerate() {
        let Some(round) = raw_round.as_u64() else {
            warn!(index = i, "skipping non-numeric round index in metrics");
            continue;
        };
        chart.push(ChartPoint {
            round,
            loss: loss.as_ref().and_then(|s| s[i]),
            accuracy: accuracy.as_ref().and_then(|s| s[i]),
        });
    }
    chart
}

/// A metric series with per-element degradation: a non-numeric element
/// becomes `None` rather than poisoning the whole series.
fn float_series(value: Option<&Value>) -> Option<Vec<Option<f64>>> {
    let array = value?.as_array()?;
    Some(array.iter().map(Value::as_f64).collect())
}

fn string_array(value: Option<&Value>) -> Vec<String> {
    match value.and_then(Value::as_array) {
        Some(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}
