//! Resolved modifier and requirement records.
//!
//! These arrive already resolved from the game database: every argument has
//! been looked up and every requirement set attached. Discriminants that the
//! database stores as strings are parsed into enums; unrecognized strings are
//! kept in an `Other` variant so callers can report them.

use serde::{Deserialize, Serialize};

use crate::{Arguments, DataId};

/// Which strategy produces the candidate subjects of a modifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CollectionType {
    PlayerCapitalCity,
    PlayerCities,
    AllCities,
    PlayerPlotYields,
    Owner,
    /// Nested: requires the parent city.
    CityPlotYields,
    AllUnits,
    PlayerUnits,
    UnitCombat,
    /// Nested: requires the parent unit.
    UnitOccupiedCity,
    CitiesFollowingOwnerReligion,
    PlayerCombat,
    Other(String),
}

impl CollectionType {
    pub fn as_str(&self) -> &str {
        match self {
            CollectionType::PlayerCapitalCity => "COLLECTION_PLAYER_CAPITAL_CITY",
            CollectionType::PlayerCities => "COLLECTION_PLAYER_CITIES",
            CollectionType::AllCities => "COLLECTION_ALL_CITIES",
            CollectionType::PlayerPlotYields => "COLLECTION_PLAYER_PLOT_YIELDS",
            CollectionType::Owner => "COLLECTION_OWNER",
            CollectionType::CityPlotYields => "COLLECTION_CITY_PLOT_YIELDS",
            CollectionType::AllUnits => "COLLECTION_ALL_UNITS",
            CollectionType::PlayerUnits => "COLLECTION_PLAYER_UNITS",
            CollectionType::UnitCombat => "COLLECTION_UNIT_COMBAT",
            CollectionType::UnitOccupiedCity => "COLLECTION_UNIT_OCCUPIED_CITY",
            CollectionType::CitiesFollowingOwnerReligion => {
                "COLLECTION_CITIES_FOLLOWING_OWNER_RELIGION"
            }
            CollectionType::PlayerCombat => "COLLECTION_PLAYER_COMBAT",
            CollectionType::Other(raw) => raw,
        }
    }
}

impl From<String> for CollectionType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "COLLECTION_PLAYER_CAPITAL_CITY" => CollectionType::PlayerCapitalCity,
            "COLLECTION_PLAYER_CITIES" => CollectionType::PlayerCities,
            "COLLECTION_ALL_CITIES" => CollectionType::AllCities,
            "COLLECTION_PLAYER_PLOT_YIELDS" => CollectionType::PlayerPlotYields,
            "COLLECTION_OWNER" => CollectionType::Owner,
            "COLLECTION_CITY_PLOT_YIELDS" => CollectionType::CityPlotYields,
            "COLLECTION_ALL_UNITS" => CollectionType::AllUnits,
            "COLLECTION_PLAYER_UNITS" => CollectionType::PlayerUnits,
            "COLLECTION_UNIT_COMBAT" => CollectionType::UnitCombat,
            "COLLECTION_UNIT_OCCUPIED_CITY" => CollectionType::UnitOccupiedCity,
            "COLLECTION_CITIES_FOLLOWING_OWNER_RELIGION" => {
                CollectionType::CitiesFollowingOwnerReligion
            }
            "COLLECTION_PLAYER_COMBAT" => CollectionType::PlayerCombat,
            _ => CollectionType::Other(raw),
        }
    }
}

impl From<&str> for CollectionType {
    fn from(raw: &str) -> Self {
        CollectionType::from(raw.to_string())
    }
}

impl From<CollectionType> for String {
    fn from(collection: CollectionType) -> String {
        match collection {
            CollectionType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for CollectionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean combinator of a requirement set.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequirementSetType {
    #[default]
    All,
    Any,
    Other(String),
}

impl RequirementSetType {
    pub fn as_str(&self) -> &str {
        match self {
            RequirementSetType::All => "REQUIREMENTSET_TEST_ALL",
            RequirementSetType::Any => "REQUIREMENTSET_TEST_ANY",
            RequirementSetType::Other(raw) => raw,
        }
    }
}

impl From<String> for RequirementSetType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "REQUIREMENTSET_TEST_ALL" => RequirementSetType::All,
            "REQUIREMENTSET_TEST_ANY" => RequirementSetType::Any,
            _ => RequirementSetType::Other(raw),
        }
    }
}

impl From<RequirementSetType> for String {
    fn from(set_type: RequirementSetType) -> String {
        match set_type {
            RequirementSetType::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for RequirementSetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requirement kind. Only the set reference is interpreted by the engine;
/// every other kind goes to the host's single-requirement predicate.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RequirementKind {
    /// Reads `RequirementSetId` and evaluates the referenced set.
    RequirementSetIsMet,
    Predicate(String),
}

impl RequirementKind {
    pub const REQUIREMENT_SET_IS_MET: &'static str = "REQUIREMENT_REQUIREMENTSET_IS_MET";

    pub fn as_str(&self) -> &str {
        match self {
            RequirementKind::RequirementSetIsMet => Self::REQUIREMENT_SET_IS_MET,
            RequirementKind::Predicate(raw) => raw,
        }
    }
}

impl From<String> for RequirementKind {
    fn from(raw: String) -> Self {
        if raw == Self::REQUIREMENT_SET_IS_MET {
            RequirementKind::RequirementSetIsMet
        } else {
            RequirementKind::Predicate(raw)
        }
    }
}

impl From<&str> for RequirementKind {
    fn from(raw: &str) -> Self {
        RequirementKind::from(raw.to_string())
    }
}

impl From<RequirementKind> for String {
    fn from(kind: RequirementKind) -> String {
        match kind {
            RequirementKind::RequirementSetIsMet => RequirementKind::REQUIREMENT_SET_IS_MET.into(),
            RequirementKind::Predicate(raw) => raw,
        }
    }
}

impl std::fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Requirement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirement_id: Option<DataId>,
    #[serde(rename = "RequirementType")]
    pub kind: RequirementKind,
    #[serde(default)]
    pub inverse: bool,
    #[serde(default)]
    pub arguments: Arguments,
}

impl Requirement {
    pub fn new(kind: impl Into<RequirementKind>) -> Self {
        Self {
            requirement_id: None,
            kind: kind.into(),
            inverse: false,
            arguments: Arguments::default(),
        }
    }

    /// A reference to another requirement set by id.
    pub fn set_reference(requirement_set_id: impl Into<String>) -> Self {
        Self::new(RequirementKind::RequirementSetIsMet)
            .with_arguments(Arguments::new().with("RequirementSetId", requirement_set_id))
    }

    pub fn inverted(mut self) -> Self {
        self.inverse = !self.inverse;
        self
    }

    pub fn with_arguments(mut self, arguments: Arguments) -> Self {
        self.arguments = arguments;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequirementSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirement_set_id: Option<DataId>,
    #[serde(default)]
    pub requirement_set_type: RequirementSetType,
    /// Insertion order from the source definition.
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

impl RequirementSet {
    pub fn all(requirements: Vec<Requirement>) -> Self {
        Self {
            requirement_set_id: None,
            requirement_set_type: RequirementSetType::All,
            requirements,
        }
    }

    pub fn any(requirements: Vec<Requirement>) -> Self {
        Self {
            requirement_set_id: None,
            requirement_set_type: RequirementSetType::Any,
            requirements,
        }
    }
}

/// A fully resolved modifier. Read-only to the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Modifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier_id: Option<DataId>,
    #[serde(default)]
    pub arguments: Arguments,
    pub collection_type: CollectionType,
    #[serde(default)]
    pub effect_type: DataId,
    #[serde(default)]
    pub subject_requirement_set: Option<RequirementSet>,
    /// Checked by the caller against the player, never by subject resolution.
    #[serde(default)]
    pub owner_requirement_set: Option<RequirementSet>,
}

impl Modifier {
    pub fn new(collection_type: impl Into<CollectionType>, effect_type: impl Into<DataId>) -> Self {
        Self {
            modifier_id: None,
            arguments: Arguments::default(),
            collection_type: collection_type.into(),
            effect_type: effect_type.into(),
            subject_requirement_set: None,
            owner_requirement_set: None,
        }
    }

    pub fn with_arguments(mut self, arguments: Arguments) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn with_subject_requirements(mut self, set: RequirementSet) -> Self {
        self.subject_requirement_set = Some(set);
        self
    }

    /// Name used in diagnostics.
    pub fn label(&self) -> &str {
        self.modifier_id.as_deref().unwrap_or(self.effect_type.as_str())
    }
}
