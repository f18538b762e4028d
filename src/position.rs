use crate::error::{ReportBuilderError, Result};
use crate::registry::PlayerRecord;
use std::fmt;

/// Playing position assigned to a player from their investment metrics.
///
/// Variant order is the tie-break order: on an exact tie the earlier
/// variant wins, and that ordering is part of the classification contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    /// Highest trading volume (거래금액).
    LegendSlugger,
    /// Highest trading frequency (거래빈도).
    SupersonicLeadoff,
    /// Highest diversification (분산투자). Also the fallback position.
    #[default]
    HexagonAllRounder,
    /// Highest stability score (안정성_점수).
    IronWallShortstop,
    /// Highest global share ratio (해외비중).
    PrecisionHitter,
}

impl Position {
    pub fn label(&self) -> &'static str {
        match self {
            Position::LegendSlugger => "초공격형 레전드 슬러거",
            Position::SupersonicLeadoff => "공격형 슈퍼소닉 리드오프",
            Position::HexagonAllRounder => "밸런스형 육각형 올라운더",
            Position::IronWallShortstop => "수비형 철벽 유격수",
            Position::PrecisionHitter => "안정형 정밀 타격 머신",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Total classification: never fails.
///
/// A record with a malformed (non-numeric) metric, or with no usable
/// metrics at all, is assigned the default [`Position::HexagonAllRounder`]
/// rather than propagating an error.
pub fn classify(record: &PlayerRecord) -> Position {
    classify_strict(record).unwrap_or_default()
}

/// Fallible classification: the typed form of the fallback contract.
///
/// A missing or blank metric coerces to 0.0. A present but non-numeric
/// metric is [`ReportBuilderError::MetricCoercion`]. A record where all
/// five metrics are missing or blank carries no signal and is assigned the
/// default position directly, so the all-zero tie cannot elect a slugger.
pub fn classify_strict(record: &PlayerRecord) -> Result<Position> {
    let metrics = [
        (
            Position::LegendSlugger,
            "거래금액",
            record.trading_volume.as_deref(),
        ),
        (
            Position::SupersonicLeadoff,
            "거래빈도",
            record.trading_frequency.as_deref(),
        ),
        (
            Position::HexagonAllRounder,
            "분산투자",
            record.diversification.as_deref(),
        ),
        (
            Position::IronWallShortstop,
            "안정성_점수",
            record.stability_score.as_deref(),
        ),
        (
            Position::PrecisionHitter,
            "해외비중",
            record.global_share_ratio.as_deref(),
        ),
    ];

    let mut any_present = false;
    let mut best: Option<(Position, f64)> = None;

    for (position, metric, raw) in metrics {
        let value = match coerce_metric(metric, raw)? {
            Some(v) => {
                any_present = true;
                v
            }
            None => 0.0,
        };

        // Strictly-greater comparison keeps the first-defined winner on ties.
        let replace = match best {
            Some((_, best_value)) => value > best_value,
            None => true,
        };
        if replace {
            best = Some((position, value));
        }
    }

    if !any_present {
        return Ok(Position::default());
    }

    Ok(best.map(|(position, _)| position).unwrap_or_default())
}

fn coerce_metric(metric: &'static str, raw: Option<&str>) -> Result<Option<f64>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ReportBuilderError::MetricCoercion {
                metric,
                value: value.to_string(),
            }),
    }
}
