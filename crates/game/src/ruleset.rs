//! Ruleset registry consulted while migrating saves.
//!
//! Only the parts that decide how old data maps onto current actions are
//! modelled: which actions each unit type can perform, the specialist list,
//! and the map latitude bounds.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::activity::Activity;
use crate::config::{MAP_MAX_LATITUDE, MAP_MIN_LATITUDE};

#[derive(Debug)]
pub enum RulesetError {
    Json(serde_json::Error),
    UnknownAction { unit_type: String, action: String },
}

impl fmt::Display for RulesetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RulesetError::Json(e) => write!(f, "Ruleset JSON error: {e}"),
            RulesetError::UnknownAction { unit_type, action } => {
                write!(f, "Unit type {unit_type} enables unknown action \"{action}\"")
            }
        }
    }
}

impl std::error::Error for RulesetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RulesetError::Json(e) => Some(e),
            RulesetError::UnknownAction { .. } => None,
        }
    }
}

impl From<serde_json::Error> for RulesetError {
    fn from(e: serde_json::Error) -> Self {
        RulesetError::Json(e)
    }
}

// =============================================================================
// Ruleset
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnitTypeRules {
    pub actions: BTreeSet<Action>,
}

impl UnitTypeRules {
    fn from_groups(groups: &[&[Action]]) -> Self {
        Self {
            actions: groups.iter().flat_map(|g| g.iter().copied()).collect(),
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Ruleset {
    pub name: String,
    pub unit_types: BTreeMap<String, UnitTypeRules>,
    pub specialists: Vec<String>,
    pub north_latitude: i64,
    pub south_latitude: i64,
}

/// On-disk shape of a ruleset; actions are given by rule name.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RulesetFile {
    name: String,
    unit_types: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    specialists: Vec<String>,
    #[serde(default = "default_north")]
    north_latitude: i64,
    #[serde(default = "default_south")]
    south_latitude: i64,
}

fn default_north() -> i64 {
    MAP_MAX_LATITUDE
}

fn default_south() -> i64 {
    MAP_MIN_LATITUDE
}

impl Default for Ruleset {
    fn default() -> Self {
        Self::classic()
    }
}

impl Ruleset {
    /// The built-in ruleset.
    pub fn classic() -> Self {
        use Action::*;

        const MOVES: [Action; 5] = [
            UnitMove,
            TransportBoard,
            TransportEmbark,
            TransportDeboard,
            TransportDisembark,
        ];
        const TERRAFORM: [Action; 8] = [
            BuildMine,
            BuildIrrigation,
            BuildRoad,
            BuildBase,
            Clean,
            Cultivate,
            Plant,
            Pillage,
        ];
        const CONQUER: [Action; 8] = [
            ConquerCity,
            ConquerCity2,
            ConquerCity3,
            ConquerCity4,
            ConquerCityShrink,
            ConquerCityShrink2,
            ConquerCityShrink3,
            ConquerCityShrink4,
        ];

        let mut unit_types = BTreeMap::new();
        let mut add = |name: &str, groups: &[&[Action]]| {
            unit_types.insert(name.to_string(), UnitTypeRules::from_groups(groups));
        };

        add(
            "Settlers",
            &[&MOVES, &TERRAFORM, &[FoundCity, JoinCity, DisbandUnit]],
        );
        add("Workers", &[&MOVES, &TERRAFORM, &[DisbandUnit]]);
        add(
            "Engineers",
            &[&MOVES, &TERRAFORM, &[TransformTerrain, DisbandUnit]],
        );
        add(
            "Warriors",
            &[&MOVES, &CONQUER, &[Attack, Fortify, Pillage, DisbandUnit]],
        );
        add(
            "Musketeers",
            &[&MOVES, &CONQUER, &[Attack, Fortify, Pillage, DisbandUnit]],
        );
        add("Explorer", &[&MOVES, &[DisbandUnit]]);
        add(
            "Diplomat",
            &[
                &MOVES,
                &[
                    EstablishEmbassyStay,
                    InvestigateCitySpendUnit,
                    SabotageCity,
                    TargetedSabotageCity,
                    SabotageCityProduction,
                    StealTechnology,
                    InciteCity,
                    EstablishTradeRoute,
                    DisbandUnit,
                ],
            ],
        );
        add(
            "Spy",
            &[
                &MOVES,
                &[
                    EstablishEmbassy,
                    InvestigateCity,
                    PoisonCity,
                    StealGold,
                    SabotageCityEscape,
                    TargetedSabotageCityEscape,
                    SabotageCityProductionEscape,
                    TargetedStealTechnology,
                    SabotageUnit,
                    SpyAttack,
                    SuitcaseNuke,
                    DisbandUnit,
                ],
            ],
        );
        add(
            "Caravan",
            &[
                &MOVES,
                &[
                    HelpWonder,
                    EnterMarketplace,
                    EstablishTradeRoute,
                    DisbandUnitRecover,
                ],
            ],
        );
        add("Cruise Missile", &[&[UnitMove, SuicideAttack]]);
        add("Nuclear", &[&[UnitMove, ExplodeNuclear, SuicideAttack]]);
        add("Transport", &[&[UnitMove, TransportUnload, DisbandUnit]]);

        Self {
            name: "classic".to_string(),
            unit_types,
            specialists: vec![
                "elvis".to_string(),
                "scientist".to_string(),
                "taxman".to_string(),
            ],
            north_latitude: MAP_MAX_LATITUDE,
            south_latitude: MAP_MIN_LATITUDE,
        }
    }

    /// Parse a ruleset from JSON: `{"name", "unit_types": {type: [action names]}, ...}`.
    pub fn from_json(json: &str) -> Result<Self, RulesetError> {
        let file: RulesetFile = serde_json::from_str(json)?;
        let mut unit_types = BTreeMap::new();
        for (unit_type, names) in file.unit_types {
            let mut actions = BTreeSet::new();
            for name in names {
                let action =
                    Action::from_rule_name(&name).ok_or_else(|| RulesetError::UnknownAction {
                        unit_type: unit_type.clone(),
                        action: name.clone(),
                    })?;
                actions.insert(action);
            }
            unit_types.insert(unit_type, UnitTypeRules { actions });
        }
        Ok(Self {
            name: file.name,
            unit_types,
            specialists: file.specialists,
            north_latitude: file.north_latitude,
            south_latitude: file.south_latitude,
        })
    }

    pub fn can_do_action(&self, unit_type: &str, action: Action) -> bool {
        self.unit_types
            .get(unit_type)
            .is_some_and(|rules| rules.actions.contains(&action))
    }

    /// The action a unit of `unit_type` performs to start `activity`.
    pub fn action_for_activity(&self, unit_type: &str, activity: Activity) -> Option<Action> {
        Action::ALL.into_iter().find(|action| {
            action.default_activity() == Some(activity) && self.can_do_action(unit_type, *action)
        })
    }

    pub fn specialist_index(&self, name: &str) -> Option<usize> {
        self.specialists
            .iter()
            .position(|s| s.eq_ignore_ascii_case(name))
    }

    /// Whole map is temperate when both edges share one latitude.
    pub fn all_temperate(&self) -> bool {
        self.north_latitude == self.south_latitude
    }

    /// Only one pole exists when the southern edge does not reach below the equator.
    pub fn single_pole(&self) -> bool {
        self.south_latitude >= 0
    }
}
