//! Configuration types shared across the merge core and the orchestrator.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConcordError;
use crate::source::SourceId;

/// Minimum paired points required for correlation when a group does not configure one.
pub const DEFAULT_MIN_DATA_POINTS: usize = 10;

/// Correlation analysis settings for a merge group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationSettings {
    /// Whether pairwise correlation is computed at all.
    pub enabled: bool,
    /// Minimum number of paired dates required; defaults to [`DEFAULT_MIN_DATA_POINTS`].
    #[serde(default)]
    pub min_data_points: Option<usize>,
    /// Rolling analysis window in days, anchored at the latest aligned date.
    #[serde(default)]
    pub window_days: Option<u32>,
}

impl Default for CorrelationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            min_data_points: None,
            window_days: None,
        }
    }
}

/// A named canonical quantity that several sources report (e.g. body weight in kg).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeGroup {
    /// Unique slug, e.g. `body_weight`.
    pub slug: String,
    /// Human-readable label.
    pub label: String,
    /// Unit every source is converted into.
    pub canonical_unit: String,
    /// Optional grouping category (e.g. `body`, `sleep`).
    #[serde(default)]
    pub category: Option<String>,
    /// Correlation settings; absent means enabled with defaults.
    #[serde(default)]
    pub correlation: Option<CorrelationSettings>,
}

impl MergeGroup {
    /// Create a group with default correlation settings.
    pub fn new(
        slug: impl Into<String>,
        label: impl Into<String>,
        canonical_unit: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            label: label.into(),
            canonical_unit: canonical_unit.into(),
            category: None,
            correlation: None,
        }
    }

    /// Set the category.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the correlation settings.
    #[must_use]
    pub fn with_correlation(mut self, settings: CorrelationSettings) -> Self {
        self.correlation = Some(settings);
        self
    }

    /// Whether correlation analysis runs for this group.
    #[must_use]
    pub fn correlation_enabled(&self) -> bool {
        self.correlation.as_ref().is_none_or(|c| c.enabled)
    }

    /// Effective minimum number of paired points.
    #[must_use]
    pub fn min_data_points(&self) -> usize {
        self.correlation
            .as_ref()
            .and_then(|c| c.min_data_points)
            .unwrap_or(DEFAULT_MIN_DATA_POINTS)
    }

    /// Rolling analysis window, if configured.
    #[must_use]
    pub fn window_days(&self) -> Option<u32> {
        self.correlation.as_ref().and_then(|c| c.window_days)
    }

    /// Check required fields and settings.
    ///
    /// # Errors
    /// Returns `ConcordError::Configuration` for a blank slug or canonical unit,
    /// a zero minimum, or a zero-day window.
    pub fn validate(&self) -> Result<(), ConcordError> {
        if self.slug.trim().is_empty() {
            return Err(ConcordError::config("merge group slug is empty"));
        }
        if self.canonical_unit.trim().is_empty() {
            return Err(ConcordError::config(format!(
                "merge group {} has no canonical unit",
                self.slug
            )));
        }
        if let Some(c) = &self.correlation {
            if c.min_data_points == Some(0) {
                return Err(ConcordError::config(format!(
                    "merge group {}: min_data_points must be at least 1",
                    self.slug
                )));
            }
            if c.window_days == Some(0) {
                return Err(ConcordError::config(format!(
                    "merge group {}: window_days must be at least 1",
                    self.slug
                )));
            }
        }
        Ok(())
    }
}

/// Binds one merge group to one upstream source and its unit conversion.
///
/// `canonical = raw * factor + offset`. Lower `priority` wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMapping {
    /// Slug of the group this mapping belongs to.
    #[serde(default)]
    pub group: String,
    /// Source identifier.
    pub source: SourceId,
    /// The source's native unit.
    pub unit: String,
    /// Multiplicative conversion to the canonical unit.
    pub factor: f64,
    /// Additive conversion to the canonical unit.
    #[serde(default)]
    pub offset: f64,
    /// Source priority; lower number means higher priority.
    pub priority: u32,
    /// Declared accuracy in percent.
    #[serde(default)]
    pub accuracy_pct: Option<f64>,
    /// Declared measurement precision in the native unit.
    #[serde(default)]
    pub precision: Option<f64>,
}

impl SourceMapping {
    /// Identity mapping (`factor = 1`, `offset = 0`).
    pub fn new(
        group: impl Into<String>,
        source: impl Into<SourceId>,
        unit: impl Into<String>,
        priority: u32,
    ) -> Self {
        Self {
            group: group.into(),
            source: source.into(),
            unit: unit.into(),
            factor: 1.0,
            offset: 0.0,
            priority,
            accuracy_pct: None,
            precision: None,
        }
    }

    /// Set the linear conversion.
    #[must_use]
    pub const fn with_conversion(mut self, factor: f64, offset: f64) -> Self {
        self.factor = factor;
        self.offset = offset;
        self
    }

    /// Set the declared accuracy percentage.
    #[must_use]
    pub const fn with_accuracy(mut self, pct: f64) -> Self {
        self.accuracy_pct = Some(pct);
        self
    }

    /// Set the declared precision.
    #[must_use]
    pub const fn with_precision(mut self, precision: f64) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Check the conversion coefficients only.
    ///
    /// # Errors
    /// Returns `ConcordError::Configuration` if `factor` is zero or non-finite,
    /// or `offset` is non-finite.
    pub fn check_conversion(&self) -> Result<(), ConcordError> {
        if !self.factor.is_finite() || self.factor == 0.0 {
            return Err(ConcordError::config(format!(
                "source {} in group {}: factor must be non-zero and finite, got {}",
                self.source, self.group, self.factor
            )));
        }
        if !self.offset.is_finite() {
            return Err(ConcordError::config(format!(
                "source {} in group {}: offset must be finite, got {}",
                self.source, self.group, self.offset
            )));
        }
        Ok(())
    }

    /// Validate this mapping against the group it is used with.
    ///
    /// # Errors
    /// Returns `ConcordError::Configuration` for a blank source or unit, a
    /// mapping bound to another group, bad conversion coefficients, or a
    /// negative/non-finite declared accuracy or precision.
    pub fn validate(&self, group_slug: &str) -> Result<(), ConcordError> {
        if self.source.is_blank() {
            return Err(ConcordError::config(format!(
                "group {group_slug}: source mapping has an empty source id"
            )));
        }
        if self.group != group_slug {
            return Err(ConcordError::config(format!(
                "source {} is mapped to group {}, not {group_slug}",
                self.source, self.group
            )));
        }
        if self.unit.trim().is_empty() {
            return Err(ConcordError::config(format!(
                "source {} in group {group_slug} has no unit",
                self.source
            )));
        }
        self.check_conversion()?;
        if let Some(a) = self.accuracy_pct
            && (!a.is_finite() || a < 0.0)
        {
            return Err(ConcordError::config(format!(
                "source {} in group {group_slug}: accuracy must be a non-negative percentage",
                self.source
            )));
        }
        if let Some(p) = self.precision
            && (!p.is_finite() || p < 0.0)
        {
            return Err(ConcordError::config(format!(
                "source {} in group {group_slug}: precision must be non-negative",
                self.source
            )));
        }
        Ok(())
    }

    /// The mapping that converts canonical values back into this source's unit.
    ///
    /// # Errors
    /// Returns `ConcordError::Configuration` if the forward conversion is invalid.
    pub fn inverse(&self) -> Result<Self, ConcordError> {
        self.check_conversion()?;
        Ok(Self {
            factor: 1.0 / self.factor,
            offset: -self.offset / self.factor,
            ..self.clone()
        })
    }

    /// Deterministic ordering key: priority first, then source id.
    #[must_use]
    pub fn rank_key(&self) -> (u32, &SourceId) {
        (self.priority, &self.source)
    }
}

/// Method used to blend several same-date values into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum FusionMethod {
    /// Weighted mean; weight is `1 / priority` unless a weight table is supplied.
    #[default]
    WeightedAverage,
    /// Median of the present values.
    Median,
    /// Weighted mean using each source's declared accuracy percentage as weight.
    AccuracyWeighted,
}

impl FusionMethod {
    /// Stable label used in merged points and configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WeightedAverage => "weighted_average",
            Self::Median => "median",
            Self::AccuracyWeighted => "accuracy_weighted",
        }
    }
}

impl fmt::Display for FusionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FusionMethod {
    type Err = ConcordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "weighted_average" | "weighted" => Ok(Self::WeightedAverage),
            "median" => Ok(Self::Median),
            "accuracy_weighted" => Ok(Self::AccuracyWeighted),
            other => Err(ConcordError::config(format!(
                "unsupported fusion method: {other}"
            ))),
        }
    }
}

/// How a date with several observations is collapsed into one merged point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPolicy {
    /// Take the highest-priority observation.
    #[default]
    PriorityPick,
    /// Blend all observations with the given fusion method.
    Fuse(FusionMethod),
}

/// Explicit per-source fusion weights; overrides the `1 / priority` default.
pub type WeightTable = BTreeMap<SourceId, f64>;

/// Per-user merge preferences as stored by the surrounding application.
///
/// Read-only input: the core never mutates these.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserMergePreference {
    /// Source to pick whenever it reported on a date.
    #[serde(default)]
    pub preferred_source: Option<SourceId>,
    /// Blend values instead of picking one.
    #[serde(default)]
    pub fusion_enabled: bool,
    /// Fusion method name; defaults to weighted average when fusion is enabled.
    #[serde(default)]
    pub fusion_method: Option<String>,
    /// Flag dates whose source spread exceeds this percentage of the merged value.
    #[serde(default)]
    pub disagreement_threshold_pct: Option<f64>,
}

/// Resolved options for one merged-view computation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewOptions {
    /// Resolution policy applied to multi-source dates.
    pub policy: ResolutionPolicy,
    /// Source that wins a priority pick whenever present.
    pub preferred_source: Option<SourceId>,
    /// Explicit fusion weights.
    pub weights: Option<WeightTable>,
    /// Disagreement alert threshold, in percent of the merged value.
    pub disagreement_threshold_pct: Option<f64>,
}

impl ViewOptions {
    /// Options for a bare policy.
    #[must_use]
    pub const fn new(policy: ResolutionPolicy) -> Self {
        Self {
            policy,
            preferred_source: None,
            weights: None,
            disagreement_threshold_pct: None,
        }
    }

    /// Set the preferred source.
    #[must_use]
    pub fn preferred_source(mut self, source: impl Into<SourceId>) -> Self {
        self.preferred_source = Some(source.into());
        self
    }

    /// Set explicit fusion weights.
    #[must_use]
    pub fn weights(mut self, weights: WeightTable) -> Self {
        self.weights = Some(weights);
        self
    }

    /// Set the disagreement threshold.
    #[must_use]
    pub const fn disagreement_threshold_pct(mut self, pct: f64) -> Self {
        self.disagreement_threshold_pct = Some(pct);
        self
    }

    /// Build options from stored user preferences.
    ///
    /// # Errors
    /// Returns `ConcordError::Configuration` if the stored fusion method is not
    /// supported or the disagreement threshold is negative or non-finite.
    pub fn try_from_preference(pref: &UserMergePreference) -> Result<Self, ConcordError> {
        let policy = if pref.fusion_enabled {
            let method = match pref.fusion_method.as_deref() {
                Some(name) => name.parse()?,
                None => FusionMethod::default(),
            };
            ResolutionPolicy::Fuse(method)
        } else {
            ResolutionPolicy::PriorityPick
        };
        if let Some(t) = pref.disagreement_threshold_pct
            && (!t.is_finite() || t < 0.0)
        {
            return Err(ConcordError::config(
                "disagreement threshold must be a non-negative percentage",
            ));
        }
        Ok(Self {
            policy,
            preferred_source: pref.preferred_source.clone(),
            weights: None,
            disagreement_threshold_pct: pref.disagreement_threshold_pct,
        })
    }
}

impl From<ResolutionPolicy> for ViewOptions {
    fn from(policy: ResolutionPolicy) -> Self {
        Self::new(policy)
    }
}
