//! Risk matrix scoring: impact x probability -> critical value -> level.
//!
//! Levels come from a closed threshold table and are always derived from the
//! critical value. [`Risk`] keeps its score private so the only way to change
//! it is to change the factors it is computed from.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::labels;
use crate::types::{round2, EntityId};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lowest accepted impact or probability.
pub const MIN_FACTOR: u8 = 1;
/// Highest accepted impact or probability.
pub const MAX_FACTOR: u8 = 5;

/// Upper bound (inclusive) of the LOW band.
pub const LOW_MAX: u8 = 6;
/// Upper bound (inclusive) of the MEDIUM band.
pub const MEDIUM_MAX: u8 = 12;
/// Upper bound (inclusive) of the HIGH band. Everything above is CRITICAL.
pub const HIGH_MAX: u8 = 19;

pub const LEVEL_LOW: &str = "LOW";
pub const LEVEL_MEDIUM: &str = "MEDIUM";
pub const LEVEL_HIGH: &str = "HIGH";
pub const LEVEL_CRITICAL: &str = "CRITICAL";

/// All valid level strings, lowest first.
pub const VALID_LEVELS: &[&str] = &[LEVEL_LOW, LEVEL_MEDIUM, LEVEL_HIGH, LEVEL_CRITICAL];

/// Display colour for level strings outside the closed table.
pub const UNKNOWN_LEVEL_COLOR: &str = "#6b7280";

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// Criticality band of a risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Every level, lowest first.
    pub const ALL: [RiskLevel; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    /// Convert from a stored string value.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            LEVEL_LOW => Ok(Self::Low),
            LEVEL_MEDIUM => Ok(Self::Medium),
            LEVEL_HIGH => Ok(Self::High),
            LEVEL_CRITICAL => Ok(Self::Critical),
            _ => Err(format!(
                "Invalid risk level '{s}'. Must be one of: {}",
                VALID_LEVELS.join(", ")
            )),
        }
    }

    /// Convert to the stored string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => LEVEL_LOW,
            Self::Medium => LEVEL_MEDIUM,
            Self::High => LEVEL_HIGH,
            Self::Critical => LEVEL_CRITICAL,
        }
    }

    /// Portuguese display label used in the report.
    pub fn label(&self) -> &'static str {
        labels::risk_level_label(self.as_str())
    }

    /// Display colour (green, yellow, orange, red).
    pub fn color(&self) -> &'static str {
        match self {
            Self::Low => "#22c55e",
            Self::Medium => "#eab308",
            Self::High => "#f97316",
            Self::Critical => "#ef4444",
        }
    }
}

/// Display colour for a raw level string; unknown levels get a neutral grey.
pub fn risk_color(level: &str) -> &'static str {
    RiskLevel::from_str_value(level)
        .map(|l| l.color())
        .unwrap_or(UNKNOWN_LEVEL_COLOR)
}

/// Map a critical value to its level.
///
/// Total over `u8`: values below the matrix minimum land in LOW and values
/// above 25 in CRITICAL. Range validation of the factors happens at the
/// boundary, not here.
pub fn calculate_risk_level(critical_value: u8) -> RiskLevel {
    if critical_value <= LOW_MAX {
        RiskLevel::Low
    } else if critical_value <= MEDIUM_MAX {
        RiskLevel::Medium
    } else if critical_value <= HIGH_MAX {
        RiskLevel::High
    } else {
        RiskLevel::Critical
    }
}

// ---------------------------------------------------------------------------
// Score
// ---------------------------------------------------------------------------

/// Derived part of a risk: critical value and the level it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskScore {
    pub critical_value: u8,
    pub level: RiskLevel,
}

impl RiskScore {
    /// Score a risk from its impact and probability.
    pub fn from_factors(impact: u8, probability: u8) -> Self {
        Self::from_critical_value(impact.saturating_mul(probability))
    }

    pub fn from_critical_value(critical_value: u8) -> Self {
        Self {
            critical_value,
            level: calculate_risk_level(critical_value),
        }
    }
}

/// Anything that carries a risk score.
pub trait Scored {
    fn score(&self) -> RiskScore;
}

impl Scored for RiskScore {
    fn score(&self) -> RiskScore {
        *self
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Number of risks per level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LevelCounts {
    #[serde(rename = "LOW")]
    pub low: usize,
    #[serde(rename = "MEDIUM")]
    pub medium: usize,
    #[serde(rename = "HIGH")]
    pub high: usize,
    #[serde(rename = "CRITICAL")]
    pub critical: usize,
}

impl LevelCounts {
    pub fn get(&self, level: RiskLevel) -> usize {
        match level {
            RiskLevel::Low => self.low,
            RiskLevel::Medium => self.medium,
            RiskLevel::High => self.high,
            RiskLevel::Critical => self.critical,
        }
    }

    fn increment(&mut self, level: RiskLevel) {
        match level {
            RiskLevel::Low => self.low += 1,
            RiskLevel::Medium => self.medium += 1,
            RiskLevel::High => self.high += 1,
            RiskLevel::Critical => self.critical += 1,
        }
    }
}

/// Aggregate view of a project's risks.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskSummary {
    pub total: usize,
    /// Mean of the critical values, rounded to two decimals.
    pub average_critical_value: f64,
    pub by_level: LevelCounts,
}

/// Summarize a list of scored risks.
///
/// Level counts use each risk's own level, never the level of the average.
pub fn summarize<R: Scored>(risks: &[R]) -> RiskSummary {
    if risks.is_empty() {
        return RiskSummary {
            total: 0,
            average_critical_value: 0.0,
            by_level: LevelCounts::default(),
        };
    }

    let mut by_level = LevelCounts::default();
    let mut sum: u32 = 0;
    for risk in risks {
        let score = risk.score();
        sum += u32::from(score.critical_value);
        by_level.increment(score.level);
    }

    RiskSummary {
        total: risks.len(),
        average_critical_value: round2(f64::from(sum) / risks.len() as f64),
        by_level,
    }
}

/// Sort risks the way the report lists them: most critical first.
///
/// The sort is stable, so ties keep their incoming order.
pub fn sort_by_criticality<R: Scored>(risks: &mut [R]) {
    risks.sort_by(|a, b| b.score().critical_value.cmp(&a.score().critical_value));
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A risk that has not been persisted yet (user input or generated).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRisk {
    pub description: String,
    pub source: String,
    pub impact: u8,
    pub probability: u8,
    pub mitigation: Option<String>,
}

impl Scored for NewRisk {
    fn score(&self) -> RiskScore {
        RiskScore::from_factors(self.impact, self.probability)
    }
}

/// Partial update of a risk; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskUpdate {
    pub description: Option<String>,
    pub source: Option<String>,
    pub impact: Option<u8>,
    pub probability: Option<u8>,
    pub mitigation: Option<String>,
}

/// A risk owned by a project.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    pub id: EntityId,
    project_id: EntityId,
    pub description: String,
    pub source: String,
    impact: u8,
    probability: u8,
    #[serde(flatten)]
    score: RiskScore,
    pub mitigation: Option<String>,
}

impl Risk {
    /// Create a risk, deriving its critical value and level.
    pub fn new(id: EntityId, project_id: EntityId, input: NewRisk) -> Self {
        let score = input.score();
        Self {
            id,
            project_id,
            description: input.description,
            source: input.source,
            impact: input.impact,
            probability: input.probability,
            score,
            mitigation: input.mitigation,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn impact(&self) -> u8 {
        self.impact
    }

    pub fn probability(&self) -> u8 {
        self.probability
    }

    pub fn critical_value(&self) -> u8 {
        self.score.critical_value
    }

    pub fn level(&self) -> RiskLevel {
        self.score.level
    }

    /// Apply a partial update and recompute the score from the new factors.
    pub fn apply_update(&mut self, update: RiskUpdate) {
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(source) = update.source {
            self.source = source;
        }
        if let Some(mitigation) = update.mitigation {
            self.mitigation = Some(mitigation);
        }
        self.impact = update.impact.unwrap_or(self.impact);
        self.probability = update.probability.unwrap_or(self.probability);
        self.score = RiskScore::from_factors(self.impact, self.probability);
    }
}

impl Scored for Risk {
    fn score(&self) -> RiskScore {
        self.score
    }
}

/// Check that a factor lies in the 1..=5 matrix range.
pub fn validate_factor(name: &str, value: i64) -> Result<u8, CoreError> {
    if (i64::from(MIN_FACTOR)..=i64::from(MAX_FACTOR)).contains(&value) {
        Ok(value as u8)
    } else {
        Err(CoreError::Validation(format!(
            "{name} must be between {MIN_FACTOR} and {MAX_FACTOR} (got {value})"
        )))
    }
}
