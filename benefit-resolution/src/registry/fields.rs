use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::fmt;
use std::str::FromStr;

/// Every benefit field the engine knows how to track.
///
/// Registry entries are validated against this set at load time, so request
/// handling never deals with free-form path strings. Declaration order is the
/// canonical output order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub enum BenefitField {
    AnnualMaximumRemaining,
    IndividualDeductible,
    DeductibleMet,
    CrownFrequency,
    PerioScalingFrequency,
    MissingToothClause,
    ProphylaxisFrequency,
    BitewingFrequency,
    MajorWaitingPeriod,
    CompositePosteriorDowngrade,
    PerioMaintenanceFrequency,
    BasicCoverage,
    MajorCoverage,
    SealantFrequency,
    OrthoLifetimeMaximum,
    FluorideCoverage,
}

impl BenefitField {
    pub const ALL: [BenefitField; 16] = [
        Self::AnnualMaximumRemaining,
        Self::IndividualDeductible,
        Self::DeductibleMet,
        Self::CrownFrequency,
        Self::PerioScalingFrequency,
        Self::MissingToothClause,
        Self::ProphylaxisFrequency,
        Self::BitewingFrequency,
        Self::MajorWaitingPeriod,
        Self::CompositePosteriorDowngrade,
        Self::PerioMaintenanceFrequency,
        Self::BasicCoverage,
        Self::MajorCoverage,
        Self::SealantFrequency,
        Self::OrthoLifetimeMaximum,
        Self::FluorideCoverage,
    ];

    /// Dotted location of this field in an eligibility document
    pub fn path(&self) -> &'static str {
        match self {
            Self::AnnualMaximumRemaining => "annual_maximum_remaining",
            Self::IndividualDeductible => "individual_deductible",
            Self::DeductibleMet => "deductible_met",
            Self::CrownFrequency => "frequency_limits.D2740",
            Self::PerioScalingFrequency => "frequency_limits.D4341",
            Self::MissingToothClause => "missing_tooth_clause",
            Self::ProphylaxisFrequency => "frequency_limits.D1110",
            Self::BitewingFrequency => "frequency_limits.D0274",
            Self::MajorWaitingPeriod => "waiting_period.major",
            Self::CompositePosteriorDowngrade => "composite_posterior_downgrade",
            Self::PerioMaintenanceFrequency => "frequency_limits.D4910",
            Self::BasicCoverage => "coverage_pct.basic",
            Self::MajorCoverage => "coverage_pct.major",
            Self::SealantFrequency => "frequency_limits.D1351",
            Self::OrthoLifetimeMaximum => "ortho_lifetime_maximum",
            Self::FluorideCoverage => "fluoride_coverage",
        }
    }
}

impl fmt::Display for BenefitField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for BenefitField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.path() == s)
            .ok_or_else(|| format!("unknown benefit field path: {s}"))
    }
}
