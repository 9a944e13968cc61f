//! KPI accumulation and on-demand reporting.
//!
//! The accumulator only stores raw samples and counters. Every derived
//! figure is recomputed by [`KpiAccumulator::snapshot`]; nothing is cached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::survey::ImprovementArea;

/// A 1-5 satisfaction rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatisfactionSample {
    pub score: u8,
    pub recorded_at: DateTime<Utc>,
}

/// Wall-clock duration of one successful completion call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseTimeSample {
    pub seconds: f64,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementKind {
    ImprovementFeedback,
}

/// A structured piece of feedback beyond the rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementEvent {
    pub kind: EngagementKind,
    pub area: ImprovementArea,
    pub recorded_at: DateTime<Utc>,
}

/// Process-lifetime KPI state for one session.
#[derive(Debug, Clone)]
pub struct KpiAccumulator {
    satisfaction_samples: Vec<SatisfactionSample>,
    response_times: Vec<ResponseTimeSample>,
    resolved_count: u64,
    total_queries: u64,
    engagement_events: Vec<EngagementEvent>,
    session_start: DateTime<Utc>,
}

impl KpiAccumulator {
    pub fn new(session_start: DateTime<Utc>) -> Self {
        Self {
            satisfaction_samples: Vec::new(),
            response_times: Vec::new(),
            resolved_count: 0,
            total_queries: 0,
            engagement_events: Vec::new(),
            session_start,
        }
    }

    pub fn record_satisfaction(&mut self, score: u8, at: DateTime<Utc>) {
        self.satisfaction_samples.push(SatisfactionSample {
            score,
            recorded_at: at,
        });
    }

    /// Count one completed chat turn and its backend latency.
    pub fn record_query(&mut self, seconds: f64, at: DateTime<Utc>) {
        self.total_queries += 1;
        self.response_times.push(ResponseTimeSample {
            seconds,
            recorded_at: at,
        });
    }

    pub fn record_improvement(&mut self, area: ImprovementArea, at: DateTime<Utc>) {
        self.engagement_events.push(EngagementEvent {
            kind: EngagementKind::ImprovementFeedback,
            area,
            recorded_at: at,
        });
    }

    pub fn record_resolution(&mut self) {
        self.resolved_count += 1;
    }

    pub fn satisfaction_samples(&self) -> &[SatisfactionSample] {
        &self.satisfaction_samples
    }

    pub fn response_times(&self) -> &[ResponseTimeSample] {
        &self.response_times
    }

    pub fn engagement_events(&self) -> &[EngagementEvent] {
        &self.engagement_events
    }

    pub fn resolved_count(&self) -> u64 {
        self.resolved_count
    }

    pub fn total_queries(&self) -> u64 {
        self.total_queries
    }

    pub fn session_start(&self) -> DateTime<Utc> {
        self.session_start
    }

    /// Compute the report as of `now`.
    ///
    /// Every ratio guards its zero denominator and reports `0` instead.
    pub fn snapshot(&self, now: DateTime<Utc>) -> KpiReport {
        let average_satisfaction = mean(self.satisfaction_samples.iter().map(|s| f64::from(s.score)));
        let average_response_time = mean(self.response_times.iter().map(|s| s.seconds));

        let duration_minutes = (now - self.session_start).num_milliseconds() as f64 / 60_000.0;

        let response_rate = if duration_minutes > 0.0 {
            self.total_queries as f64 / duration_minutes
        } else {
            0.0
        };

        let resolution_rate = if self.total_queries > 0 {
            self.resolved_count as f64 / self.total_queries as f64 * 100.0
        } else {
            0.0
        };

        KpiReport {
            average_satisfaction: round2(average_satisfaction),
            average_response_time: round2(average_response_time),
            total_queries: self.total_queries,
            resolved_count: self.resolved_count,
            session_duration_minutes: round2(duration_minutes),
            response_rate: round2(response_rate),
            resolution_rate: round2(resolution_rate),
            timestamp: now.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        }
    }
}

/// Point-in-time service-quality metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiReport {
    pub average_satisfaction: f64,
    pub average_response_time: f64,
    pub total_queries: u64,
    #[serde(rename = "resolved_queries")]
    pub resolved_count: u64,
    pub session_duration_minutes: f64,
    pub response_rate: f64,
    pub resolution_rate: f64,
    /// Generation time, `%Y-%m-%d %H:%M:%S UTC`.
    pub timestamp: String,
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// Round half away from zero to two decimals.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
