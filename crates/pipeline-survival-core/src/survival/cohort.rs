//! Cohort analysis: dated deals to durations, one curve per product.
//!
//! Every deal's week 0 is its own opening date, so products launched at
//! different times can be compared on the same axis.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::curve::SurvivalCurve;
use super::estimator::KaplanMeier;
use super::record::PipelineRecord;
use crate::error::{InvalidReason, SurvivalError};

/// Unit durations are expressed in. Partial units are truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    Day,
    #[default]
    Week,
}

impl DurationUnit {
    fn days(self) -> i64 {
        match self {
            DurationUnit::Day => 1,
            DurationUnit::Week => 7,
        }
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DurationUnit::Day => write!(f, "day"),
            DurationUnit::Week => write!(f, "week"),
        }
    }
}

impl FromStr for DurationUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "d" | "day" | "days" => Ok(DurationUnit::Day),
            "w" | "week" | "weeks" => Ok(DurationUnit::Week),
            other => Err(format!("unknown duration unit '{other}' (use day or week)")),
        }
    }
}

/// A sales opportunity with its opening date and, if won, its closing date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deal {
    pub product_id: String,
    pub opened_on: NaiveDate,
    pub won_on: Option<NaiveDate>,
}

impl Deal {
    pub fn new(
        product_id: impl Into<String>,
        opened_on: NaiveDate,
        won_on: Option<NaiveDate>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            opened_on,
            won_on,
        }
    }

    /// Convert to a record as seen at `cutoff`.
    ///
    /// Deals won after the cutoff are treated as still open at the cutoff.
    pub fn to_record(
        &self,
        cutoff: NaiveDate,
        unit: DurationUnit,
    ) -> Result<PipelineRecord, InvalidReason> {
        let (end, won) = match self.won_on {
            Some(won) if won <= cutoff => (won, true),
            _ => (cutoff, false),
        };
        let days = (end - self.opened_on).num_days();
        if days < 0 {
            return Err(InvalidReason::NegativeDuration(days as f64 / unit.days() as f64));
        }
        let units = days / unit.days();
        Ok(PipelineRecord::new(units as f64, won))
    }
}

/// Survival curve for a single product line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCurve {
    pub product_id: String,
    pub deal_count: usize,
    pub won_count: usize,
    pub curve: SurvivalCurve,
}

/// Fits curves over dated deals.
#[derive(Debug, Clone, Copy, Default)]
pub struct CohortAnalysis {
    unit: DurationUnit,
    estimator: KaplanMeier,
}

impl CohortAnalysis {
    pub fn new(unit: DurationUnit) -> Self {
        Self {
            unit,
            estimator: KaplanMeier::new(),
        }
    }

    pub fn with_estimator(mut self, estimator: KaplanMeier) -> Self {
        self.estimator = estimator;
        self
    }

    pub fn unit(&self) -> DurationUnit {
        self.unit
    }

    /// Convert deals opened on or before `cutoff`, failing on the first
    /// invalid one by input index. Deals opened after `cutoff` are skipped.
    pub fn records(
        &self,
        deals: &[Deal],
        cutoff: NaiveDate,
    ) -> Result<Vec<PipelineRecord>, SurvivalError> {
        Ok(self
            .observed(deals, cutoff)?
            .into_iter()
            .map(|(_, record)| record)
            .collect())
    }

    /// One curve across all products.
    pub fn pooled(
        &self,
        deals: &[Deal],
        cutoff: NaiveDate,
    ) -> Result<SurvivalCurve, SurvivalError> {
        let records = self.records(deals, cutoff)?;
        self.estimator.fit(&records)
    }

    /// One curve per product, in order of first appearance.
    pub fn by_product(
        &self,
        deals: &[Deal],
        cutoff: NaiveDate,
    ) -> Result<Vec<ProductCurve>, SurvivalError> {
        let observed = self.observed(deals, cutoff)?;
        if observed.is_empty() {
            return Err(SurvivalError::EmptyInput);
        }

        let mut groups: Vec<(&str, Vec<PipelineRecord>)> = Vec::new();
        for (deal, record) in observed {
            match groups.iter_mut().find(|(id, _)| *id == deal.product_id) {
                Some((_, group)) => group.push(record),
                None => groups.push((deal.product_id.as_str(), vec![record])),
            }
        }
        debug!(products = groups.len(), deals = deals.len(), %cutoff, "grouped deals by product");

        groups
            .into_iter()
            .map(|(product_id, group)| -> Result<ProductCurve, SurvivalError> {
                let curve = self.estimator.fit(&group)?;
                Ok(ProductCurve {
                    product_id: product_id.to_string(),
                    deal_count: group.len(),
                    won_count: group.iter().filter(|r| r.event_observed).count(),
                    curve,
                })
            })
            .collect()
    }

    fn observed<'a>(
        &self,
        deals: &'a [Deal],
        cutoff: NaiveDate,
    ) -> Result<Vec<(&'a Deal, PipelineRecord)>, SurvivalError> {
        let mut observed = Vec::with_capacity(deals.len());
        for (index, deal) in deals.iter().enumerate() {
            if deal.opened_on > cutoff {
                debug!(
                    index,
                    opened_on = %deal.opened_on,
                    %cutoff,
                    "skipping deal opened after cutoff"
                );
                continue;
            }
            let record = deal
                .to_record(cutoff, self.unit)
                .map_err(|reason| SurvivalError::invalid(index, reason))?;
            observed.push((deal, record));
        }
        Ok(observed)
    }
}
