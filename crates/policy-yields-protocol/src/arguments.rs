//! Resolved argument bags attached to modifiers and requirements.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("argument {name} is missing")]
    Missing { name: String },
    #[error("argument {name} is not a number: {value:?}")]
    InvalidNumber { name: String, value: String },
}

/// One resolved argument value. `Extra`/`SecondExtra` carry the database's
/// auxiliary columns and are passed through untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Argument {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_extra: Option<String>,
    #[serde(default, rename = "Type", skip_serializing_if = "Option::is_none")]
    pub arg_type: Option<String>,
}

impl Argument {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }

    /// Game data treats an empty value the same as an unset one.
    pub fn is_set(&self) -> bool {
        !self.value.is_empty()
    }
}

/// Name → value mapping. Names are unique; lookups never mutate.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arguments(BTreeMap<String, Argument>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), Argument::new(value));
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, argument: Argument) {
        self.0.insert(name.into(), argument);
    }

    pub fn get(&self, name: &str) -> Option<&Argument> {
        self.0.get(name)
    }

    /// Value of `name` if present and non-empty.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.get(name)
            .filter(|arg| arg.is_set())
            .map(|arg| arg.value.as_str())
    }

    /// Required access: absence is an error, an empty value is not.
    pub fn get_asserted(&self, name: &str) -> Result<&Argument, ArgumentError> {
        self.get(name).ok_or_else(|| ArgumentError::Missing {
            name: name.to_string(),
        })
    }

    /// E.g. `"YIELD_FOOD, YIELD_PRODUCTION"` -> `["YIELD_FOOD", "YIELD_PRODUCTION"]`.
    pub fn get_array(&self, name: &str) -> Result<Vec<String>, ArgumentError> {
        self.get_array_with(name, ",")
    }

    pub fn get_array_with(&self, name: &str, separator: &str) -> Result<Vec<String>, ArgumentError> {
        let argument = self.get_asserted(name)?;
        Ok(argument
            .value
            .split(separator)
            .map(|item| item.trim().to_string())
            .collect())
    }

    /// Numeric value of a set argument; `None` when absent or empty.
    /// `NaN` and infinities are rejected.
    pub fn number(&self, name: &str) -> Result<Option<f64>, ArgumentError> {
        let Some(raw) = self.value(name) else {
            return Ok(None);
        };
        match raw.trim().parse::<f64>() {
            Ok(number) if number.is_finite() => Ok(Some(number)),
            _ => Err(ArgumentError::InvalidNumber {
                name: name.to_string(),
                value: raw.to_string(),
            }),
        }
    }

    /// Boolean flags are stored as the string `"true"`.
    pub fn flag(&self, name: &str) -> bool {
        self.value(name) == Some("true")
    }
}

impl std::fmt::Display for Arguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("{")?;
        for (i, (name, arg)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={:?}", arg.value)?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asserted_access_distinguishes_missing_from_empty() {
        let args = Arguments::new().with("Empty", "");

        assert_eq!(args.get_asserted("Empty").unwrap().value, "");
        assert_eq!(
            args.get_asserted("Absent"),
            Err(ArgumentError::Missing {
                name: "Absent".into()
            })
        );
        assert_eq!(args.value("Empty"), None);
    }

    #[test]
    fn array_values_are_trimmed_but_not_filtered() {
        let args = Arguments::new().with("YieldType", " YIELD_FOOD,YIELD_GOLD , ");

        let items = args.get_array("YieldType").unwrap();
        assert_eq!(items, vec!["YIELD_FOOD", "YIELD_GOLD", ""]);

        let items = Arguments::new()
            .with("Types", "A|B")
            .get_array_with("Types", "|")
            .unwrap();
        assert_eq!(items, vec!["A", "B"]);

        assert!(args.get_array("Missing").is_err());
    }

    #[test]
    fn numbers_and_flags() {
        let args = Arguments::new()
            .with("Amount", " 5 ")
            .with("Percent", "abc")
            .with("Gold", "true")
            .with("Happiness", "false");

        assert_eq!(args.number("Amount"), Ok(Some(5.0)));
        assert_eq!(args.number("Missing"), Ok(None));
        assert!(matches!(
            args.number("Percent"),
            Err(ArgumentError::InvalidNumber { .. })
        ));
        assert!(args.flag("Gold"));
        assert!(!args.flag("Happiness"));
        assert!(!args.flag("Missing"));
    }

    #[test]
    fn non_finite_numbers_are_invalid() {
        let args = Arguments::new()
            .with("Amount", "NaN")
            .with("Percent", "inf")
            .with("Extra", "-infinity");

        for name in ["Amount", "Percent", "Extra"] {
            assert!(
                matches!(args.number(name), Err(ArgumentError::InvalidNumber { .. })),
                "{name} should be rejected"
            );
        }
    }

    #[test]
    fn deserializes_database_shape() {
        let json = r#"{"Amount":{"Value":"2","Extra":"x","Type":"ARGTYPE_IDENTITY"}}"#;
        let args: Arguments = serde_json::from_str(json).unwrap();
        let amount = args.get("Amount").unwrap();
        assert_eq!(amount.value, "2");
        assert_eq!(amount.extra.as_deref(), Some("x"));
        assert_eq!(amount.second_extra, None);
        assert_eq!(amount.arg_type.as_deref(), Some("ARGTYPE_IDENTITY"));
    }
}
