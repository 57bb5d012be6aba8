//! Budget / overtime classification of a live duration.
//!
//! Two independent 0–100 scales: the used share of the budget (capped at
//! 100) and, once over budget, the overtime progress from "just over" (0) to
//! "double the budget" (100). Classification is cosmetic only.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    pub warning: f64,
    pub critical: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warning: 70.0,
            critical: 95.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Nominal,
    Warning,
    Critical,
}

impl Band {
    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Nominal => "nominal",
            Band::Warning => "warning",
            Band::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetUsage {
    pub budget_seconds: i64,
    pub live_seconds: i64,
    pub percentage: f64,
    pub is_over_budget: bool,
    pub overtime_ratio: f64,
    pub band: Band,
}

impl BudgetUsage {
    pub fn overtime_percentage(&self) -> f64 {
        self.overtime_ratio * 100.0
    }

    /// Seconds left before the budget is reached (negative when over).
    pub fn remaining_seconds(&self) -> i64 {
        self.budget_seconds - self.live_seconds
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum BudgetStatus {
    Unbounded,
    Bounded(BudgetUsage),
}

impl BudgetStatus {
    pub fn band(&self) -> Option<Band> {
        match self {
            BudgetStatus::Unbounded => None,
            BudgetStatus::Bounded(u) => Some(u.band),
        }
    }
}

pub fn classify(percentage: f64, is_over_budget: bool, thresholds: &Thresholds) -> Band {
    if is_over_budget || percentage >= thresholds.critical {
        Band::Critical
    } else if percentage >= thresholds.warning {
        Band::Warning
    } else {
        Band::Nominal
    }
}

pub fn evaluate(live_seconds: i64, budget_seconds: Option<i64>, thresholds: &Thresholds) -> BudgetStatus {
    let budget = match budget_seconds {
        Some(b) if b > 0 => b,
        _ => return BudgetStatus::Unbounded,
    };

    let live = live_seconds.max(0);
    let percentage = (live as f64 / budget as f64 * 100.0).min(100.0);
    let is_over_budget = live > budget;
    let overtime_ratio = if is_over_budget {
        ((live - budget) as f64 / budget as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    BudgetStatus::Bounded(BudgetUsage {
        budget_seconds: budget,
        live_seconds: live,
        percentage,
        is_over_budget,
        overtime_ratio,
        band: classify(percentage, is_over_budget, thresholds),
    })
}
