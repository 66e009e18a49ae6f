use serde::{Deserialize, Serialize};

/// One rung of a tier scale: both rates must meet their minimums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierRule {
    pub label: String,
    pub min_primary: f64,
    pub min_secondary: f64,
}

/// Ordered tier rules, strictest first, with a catch-all label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierScale {
    #[serde(default)]
    pub rules: Vec<TierRule>,
    #[serde(default = "default_fallback")]
    pub fallback: String,
}

impl Default for TierScale {
    fn default() -> Self {
        Self {
            rules: vec![
                TierRule {
                    label: "Excellent".to_string(),
                    min_primary: 90.0,
                    min_secondary: 80.0,
                },
                TierRule {
                    label: "Good".to_string(),
                    min_primary: 75.0,
                    min_secondary: 60.0,
                },
            ],
            fallback: default_fallback(),
        }
    }
}

fn default_fallback() -> String {
    "Needs Attention".to_string()
}

impl TierScale {
    /// First rule whose minimums are both met, else the fallback.
    pub fn classify(&self, primary: f64, secondary: f64) -> &str {
        self.rules
            .iter()
            .find(|rule| primary >= rule.min_primary && secondary >= rule.min_secondary)
            .map(|rule| rule.label.as_str())
            .unwrap_or(self.fallback.as_str())
    }
}

pub fn classify_tier(primary: f64, secondary: f64, scale: &TierScale) -> &str {
    scale.classify(primary, secondary)
}
