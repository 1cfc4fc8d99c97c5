use super::phenology::ResolvedPhase;
use super::recommendation::{Recommendation, Severity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseRisk {
    pub level: RiskLevel,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowStatus {
    Open,
    Closed,
}

impl WindowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowStatus::Open => "Open",
            WindowStatus::Closed => "Closed",
        }
    }
}

impl std::fmt::Display for WindowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SprayWindow {
    pub status: WindowStatus,
    pub reason: String,
}

impl SprayWindow {
    pub fn is_open(&self) -> bool {
        self.status == WindowStatus::Open
    }
}

/// Full diagnosis for one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchardState {
    pub pheno_phase: ResolvedPhase,
    pub disease_risk: DiseaseRisk,
    pub weather_window: SprayWindow,
    pub recommendations: Vec<Recommendation>,
}

impl OrchardState {
    pub fn highest_severity(&self) -> Severity {
        self.recommendations
            .iter()
            .map(|r| r.severity)
            .max()
            .unwrap_or(Severity::Info)
    }
}
