//! Token risk assessment models
//!
//! The risk service is an external collaborator; these are its response
//! shapes as consumed by the workspace review gate.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskDecision {
	Allow,
	Warn,
	Block,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskAlertLevel {
	Info,
	Warning,
	Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenRiskBadge {
	pub id: String,
	pub label: String,
	pub detail: String,
	pub level: RiskAlertLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenRiskResponse {
	pub decision: RiskDecision,
	pub score: Option<f64>,
	#[serde(default)]
	pub badges: Vec<TokenRiskBadge>,
	pub alert_level: RiskAlertLevel,
	pub alert_title: String,
	pub alert_message: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_risk_decision_serde_shape() {
		let decision: RiskDecision = serde_json::from_str("\"ALLOW\"").unwrap();
		assert_eq!(decision, RiskDecision::Allow);
		let level: RiskAlertLevel = serde_json::from_str("\"warning\"").unwrap();
		assert_eq!(level, RiskAlertLevel::Warning);
	}

	#[test]
	fn test_risk_response_tolerates_missing_badges() {
		let payload = r#"{
			"decision": "WARN",
			"score": 42.5,
			"alert_level": "warning",
			"alert_title": "Caution",
			"alert_message": "Token has elevated sell tax"
		}"#;
		let risk: TokenRiskResponse = serde_json::from_str(payload).unwrap();
		assert_eq!(risk.decision, RiskDecision::Warn);
		assert!(risk.badges.is_empty());
	}
}
