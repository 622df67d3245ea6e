use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum YieldType {
    #[serde(rename = "YIELD_FOOD")]
    Food,
    #[serde(rename = "YIELD_PRODUCTION")]
    Production,
    #[serde(rename = "YIELD_GOLD")]
    Gold,
    #[serde(rename = "YIELD_SCIENCE")]
    Science,
    #[serde(rename = "YIELD_CULTURE")]
    Culture,
    #[serde(rename = "YIELD_HAPPINESS")]
    Happiness,
    #[serde(rename = "YIELD_DIPLOMACY")]
    Diplomacy,
}

impl YieldType {
    pub fn as_str(self) -> &'static str {
        match self {
            YieldType::Food => "YIELD_FOOD",
            YieldType::Production => "YIELD_PRODUCTION",
            YieldType::Gold => "YIELD_GOLD",
            YieldType::Science => "YIELD_SCIENCE",
            YieldType::Culture => "YIELD_CULTURE",
            YieldType::Happiness => "YIELD_HAPPINESS",
            YieldType::Diplomacy => "YIELD_DIPLOMACY",
        }
    }
}

impl std::fmt::Display for YieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-yield maintenance of one constructible type, as reported by the city.
///
/// Costs are stored the way the game reports them: upkeep is negative.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Maintenance(pub std::collections::BTreeMap<YieldType, f64>);

impl Maintenance {
    pub fn get(&self, yield_type: YieldType) -> f64 {
        self.0.get(&yield_type).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (YieldType, f64)> + '_ {
        self.0.iter().map(|(yield_type, amount)| (*yield_type, *amount))
    }
}

/// Feature on a plot together with its feature class.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotFeature {
    pub feature_type: crate::DataId,
    #[serde(default)]
    pub feature_class: Option<crate::DataId>,
}
