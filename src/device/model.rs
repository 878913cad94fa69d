//! Device model names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Known device models. The set is closed: models are derived from identifiers
/// and only parsed from operator input as a `list` filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Model {
    Snom300,
    Snom320,
    Snom370,
    SnomM9,
    SnomMP,
    SnomM700,
    SnomM300,
    SnomM900,
    SnomPA1,
    Snom820,
    Snom821,
    Snom870,
    Snom720,
    Snom725,
    Snom760,
    SnomD765,
    Snom715,
    SnomD745,
    Snom710,
    SnomD712,
    SnomD375,
    SnomD305,
    SnomD315,
    SnomD345,
    SnomD717,
    SnomD120,
    SnomD735,
    SnomD335,
    SnomM200SC,
    SnomD785,
    SnomD385,
}

impl Model {
    /// Every model, in the order `list all` queries them.
    pub const ALL: [Model; 31] = [
        Model::Snom300,
        Model::Snom320,
        Model::Snom370,
        Model::SnomM9,
        Model::SnomMP,
        Model::SnomM700,
        Model::SnomM300,
        Model::SnomM900,
        Model::SnomPA1,
        Model::Snom820,
        Model::Snom821,
        Model::Snom870,
        Model::Snom720,
        Model::Snom725,
        Model::Snom760,
        Model::SnomD765,
        Model::Snom715,
        Model::SnomD745,
        Model::Snom710,
        Model::SnomD712,
        Model::SnomD375,
        Model::SnomD305,
        Model::SnomD315,
        Model::SnomD345,
        Model::SnomD717,
        Model::SnomD120,
        Model::SnomD735,
        Model::SnomD335,
        Model::SnomM200SC,
        Model::SnomD785,
        Model::SnomD385,
    ];

    /// Name used on the wire and in operator output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Model::Snom300 => "snom300",
            Model::Snom320 => "snom320",
            Model::Snom370 => "snom370",
            Model::SnomM9 => "snomm9",
            Model::SnomMP => "snomMP",
            Model::SnomM700 => "snomM700",
            Model::SnomM300 => "snomM300",
            Model::SnomM900 => "snomM900",
            Model::SnomPA1 => "snomPA1",
            Model::Snom820 => "snom820",
            Model::Snom821 => "snom821",
            Model::Snom870 => "snom870",
            Model::Snom720 => "snom720",
            Model::Snom725 => "snom725",
            Model::Snom760 => "snom760",
            Model::SnomD765 => "snomD765",
            Model::Snom715 => "snom715",
            Model::SnomD745 => "snomD745",
            Model::Snom710 => "snom710",
            Model::SnomD712 => "snomD712",
            Model::SnomD375 => "snomD375",
            Model::SnomD305 => "snomD305",
            Model::SnomD315 => "snomD315",
            Model::SnomD345 => "snomD345",
            Model::SnomD717 => "snomD717",
            Model::SnomD120 => "snomD120",
            Model::SnomD735 => "snomD735",
            Model::SnomD335 => "snomD335",
            Model::SnomM200SC => "snomM200SC",
            Model::SnomD785 => "snomD785",
            Model::SnomD385 => "snomD385",
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a name is not one of [`Model::ALL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownModel(pub String);

impl fmt::Display for UnknownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "model {} not found", self.0)
    }
}

impl std::error::Error for UnknownModel {}

impl FromStr for Model {
    type Err = UnknownModel;

    /// Names are matched case-sensitively (`snomm9`, not `snomM9`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Model::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownModel(s.to_string()))
    }
}
