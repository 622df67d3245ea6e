use serde::{Deserialize, Serialize};

use crate::{CityId, PlayerId, PlotIndex, UnitId};

/// A runtime entity a modifier may apply to.
///
/// City and unit subjects carry the plot index of their location, computed
/// when the subject is built, so plot-aware requirements can read it the same
/// way for every variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Subject {
    City {
        city: CityId,
        owner: PlayerId,
        plot: PlotIndex,
    },
    Unit {
        unit: UnitId,
        owner: PlayerId,
        plot: PlotIndex,
    },
    Player {
        player: PlayerId,
    },
    Plot {
        city: CityId,
        plot: PlotIndex,
    },
}

impl Subject {
    pub fn plot(&self) -> Option<PlotIndex> {
        match self {
            Subject::City { plot, .. } | Subject::Unit { plot, .. } | Subject::Plot { plot, .. } => {
                Some(*plot)
            }
            Subject::Player { .. } => None,
        }
    }

    pub fn city(&self) -> Option<CityId> {
        match self {
            Subject::City { city, .. } | Subject::Plot { city, .. } => Some(*city),
            Subject::Unit { .. } | Subject::Player { .. } => None,
        }
    }

    pub fn unit(&self) -> Option<UnitId> {
        match self {
            Subject::Unit { unit, .. } => Some(*unit),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Subject::City { .. } => "city",
            Subject::Unit { .. } => "unit",
            Subject::Player { .. } => "player",
            Subject::Plot { .. } => "plot",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plot_is_uniform_across_located_variants() {
        let city = Subject::City {
            city: CityId::new(1),
            owner: PlayerId(0),
            plot: PlotIndex(12),
        };
        let plot = Subject::Plot {
            city: CityId::new(1),
            plot: PlotIndex(13),
        };
        let player = Subject::Player {
            player: PlayerId(0),
        };

        assert_eq!(city.plot(), Some(PlotIndex(12)));
        assert_eq!(plot.plot(), Some(PlotIndex(13)));
        assert_eq!(player.plot(), None);
        assert_eq!(city.city(), plot.city());
        assert_eq!(player.city(), None);
    }
}
