//! Effect magnitude: flat amounts and percentages turned into numeric deltas.

use policy_yields_protocol::Arguments;

use crate::EvalError;

/// The magnitude arguments of a modifier, parsed once.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MagnitudeArgs {
    /// Flat amount per counted item.
    Amount(f64),
    /// Percent, e.g. `20.0` for +20%.
    Percent(f64),
}

impl MagnitudeArgs {
    /// `Amount` wins over `Percent` when both are set.
    pub fn from_arguments(arguments: &Arguments) -> Result<Self, EvalError> {
        if let Some(amount) = arguments.number("Amount")? {
            return Ok(MagnitudeArgs::Amount(amount));
        }
        if let Some(percent) = arguments.number("Percent")? {
            return Ok(MagnitudeArgs::Percent(percent));
        }
        Err(EvalError::UnhandledArguments {
            arguments: arguments.to_string(),
        })
    }

    pub fn delta(self, count: f64, base_cost: f64) -> Result<f64, EvalError> {
        match self {
            MagnitudeArgs::Amount(amount) => Ok(amount * count),
            MagnitudeArgs::Percent(percent) => {
                if base_cost < 0.0 {
                    return Err(EvalError::InvalidInput(format!(
                        "negative base cost {base_cost} with a percent argument"
                    )));
                }
                let p = percent / 100.0;
                if p > 0.0 {
                    // Positive percents boost the yield paying the cost, so the
                    // base is treated as the already boosted amount.
                    Ok(base_cost - base_cost / (1.0 + p))
                } else {
                    Ok(base_cost * p)
                }
            }
        }
    }
}

/// Signed delta for `count` items with a total `base_cost`.
///
/// `Amount` ignores the base cost. `Percent` rejects a negative base cost.
pub fn compute_delta(arguments: &Arguments, count: f64, base_cost: f64) -> Result<f64, EvalError> {
    MagnitudeArgs::from_arguments(arguments)?.delta(count, base_cost)
}
