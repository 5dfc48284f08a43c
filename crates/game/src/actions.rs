//! Action enumeration of the current build.
//!
//! The order of `Action::ALL` is the canonical ordering written into saves as
//! `savefile.action_vector`. Saved orders refer to actions by their index in
//! that vector, so the vector (not this enum) decides what an index means
//! when a save is loaded.

use serde::{Deserialize, Serialize};

use crate::activity::Activity;

/// What an action is performed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionTarget {
    City,
    Unit,
    Units,
    Tile,
    SelfUnit,
}

/// Static properties of one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionDef {
    pub rule_name: &'static str,
    pub target: ActionTarget,
    /// Activity the actor starts when this action is performed.
    pub default_activity: Option<Activity>,
    /// The actor ends up on the target tile.
    pub moves_actor: bool,
}

const fn def(
    rule_name: &'static str,
    target: ActionTarget,
    default_activity: Option<Activity>,
    moves_actor: bool,
) -> ActionDef {
    ActionDef {
        rule_name,
        target,
        default_activity,
        moves_actor,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    EstablishEmbassy,
    EstablishEmbassyStay,
    InvestigateCity,
    InvestigateCitySpendUnit,
    PoisonCity,
    StealGold,
    SabotageCity,
    TargetedSabotageCity,
    SabotageCityProduction,
    SabotageCityEscape,
    TargetedSabotageCityEscape,
    SabotageCityProductionEscape,
    StealTechnology,
    TargetedStealTechnology,
    InciteCity,
    EstablishTradeRoute,
    EnterMarketplace,
    HelpWonder,
    BribeUnit,
    SabotageUnit,
    CaptureUnits,
    FoundCity,
    JoinCity,
    StealMaps,
    Bombard,
    SuitcaseNuke,
    ExplodeNuclear,
    DestroyCity,
    ExpelUnit,
    DisbandUnitRecover,
    DisbandUnit,
    HomeCity,
    UpgradeUnit,
    ParadropUnit,
    AirliftUnit,
    Attack,
    SuicideAttack,
    ConquerCity,
    ConquerCity2,
    ConquerCity3,
    ConquerCity4,
    ConquerCityShrink,
    ConquerCityShrink2,
    ConquerCityShrink3,
    ConquerCityShrink4,
    HealUnit,
    TransformTerrain,
    Cultivate,
    Plant,
    Pillage,
    Clean,
    Fortify,
    BuildRoad,
    ConvertUnit,
    BuildBase,
    BuildMine,
    BuildIrrigation,
    TransportDeboard,
    TransportUnload,
    TransportDisembark,
    TransportBoard,
    TransportEmbark,
    SpyAttack,
    UnitMove,
}

impl Action {
    pub const ALL: [Action; 64] = [
        Action::EstablishEmbassy,
        Action::EstablishEmbassyStay,
        Action::InvestigateCity,
        Action::InvestigateCitySpendUnit,
        Action::PoisonCity,
        Action::StealGold,
        Action::SabotageCity,
        Action::TargetedSabotageCity,
        Action::SabotageCityProduction,
        Action::SabotageCityEscape,
        Action::TargetedSabotageCityEscape,
        Action::SabotageCityProductionEscape,
        Action::StealTechnology,
        Action::TargetedStealTechnology,
        Action::InciteCity,
        Action::EstablishTradeRoute,
        Action::EnterMarketplace,
        Action::HelpWonder,
        Action::BribeUnit,
        Action::SabotageUnit,
        Action::CaptureUnits,
        Action::FoundCity,
        Action::JoinCity,
        Action::StealMaps,
        Action::Bombard,
        Action::SuitcaseNuke,
        Action::ExplodeNuclear,
        Action::DestroyCity,
        Action::ExpelUnit,
        Action::DisbandUnitRecover,
        Action::DisbandUnit,
        Action::HomeCity,
        Action::UpgradeUnit,
        Action::ParadropUnit,
        Action::AirliftUnit,
        Action::Attack,
        Action::SuicideAttack,
        Action::ConquerCity,
        Action::ConquerCity2,
        Action::ConquerCity3,
        Action::ConquerCity4,
        Action::ConquerCityShrink,
        Action::ConquerCityShrink2,
        Action::ConquerCityShrink3,
        Action::ConquerCityShrink4,
        Action::HealUnit,
        Action::TransformTerrain,
        Action::Cultivate,
        Action::Plant,
        Action::Pillage,
        Action::Clean,
        Action::Fortify,
        Action::BuildRoad,
        Action::ConvertUnit,
        Action::BuildBase,
        Action::BuildMine,
        Action::BuildIrrigation,
        Action::TransportDeboard,
        Action::TransportUnload,
        Action::TransportDisembark,
        Action::TransportBoard,
        Action::TransportEmbark,
        Action::SpyAttack,
        Action::UnitMove,
    ];

    pub fn def(self) -> ActionDef {
        use ActionTarget::{City, SelfUnit, Tile, Unit, Units};
        match self {
            Action::EstablishEmbassy => def("Establish Embassy", City, None, false),
            Action::EstablishEmbassyStay => def("Establish Embassy Stay", City, None, false),
            Action::InvestigateCity => def("Investigate City", City, None, false),
            Action::InvestigateCitySpendUnit => {
                def("Investigate City Spend Unit", City, None, false)
            }
            Action::PoisonCity => def("Poison City", City, None, false),
            Action::StealGold => def("Steal Gold", City, None, false),
            Action::SabotageCity => def("Sabotage City", City, None, false),
            Action::TargetedSabotageCity => def("Targeted Sabotage City", City, None, false),
            Action::SabotageCityProduction => def("Sabotage City Production", City, None, false),
            Action::SabotageCityEscape => def("Sabotage City Escape", City, None, false),
            Action::TargetedSabotageCityEscape => {
                def("Targeted Sabotage City Escape", City, None, false)
            }
            Action::SabotageCityProductionEscape => {
                def("Sabotage City Production Escape", City, None, false)
            }
            Action::StealTechnology => def("Steal Technology", City, None, false),
            Action::TargetedStealTechnology => {
                def("Targeted Steal Technology", City, None, false)
            }
            Action::InciteCity => def("Incite City", City, None, false),
            Action::EstablishTradeRoute => def("Establish Trade Route", City, None, false),
            Action::EnterMarketplace => def("Enter Marketplace", City, None, false),
            Action::HelpWonder => def("Help Wonder", City, None, false),
            Action::BribeUnit => def("Bribe Unit", Unit, None, false),
            Action::SabotageUnit => def("Sabotage Unit", Unit, None, false),
            Action::CaptureUnits => def("Capture Units", Units, None, false),
            Action::FoundCity => def("Found City", Tile, None, false),
            Action::JoinCity => def("Join City", City, None, false),
            Action::StealMaps => def("Steal Maps", City, None, false),
            Action::Bombard => def("Bombard", Units, None, false),
            Action::SuitcaseNuke => def("Suitcase Nuke", City, None, false),
            Action::ExplodeNuclear => def("Explode Nuclear", Tile, None, false),
            Action::DestroyCity => def("Destroy City", City, None, false),
            Action::ExpelUnit => def("Expel Unit", Unit, None, false),
            Action::DisbandUnitRecover => def("Disband Unit Recover", City, None, false),
            Action::DisbandUnit => def("Disband Unit", SelfUnit, None, false),
            Action::HomeCity => def("Home City", City, None, false),
            Action::UpgradeUnit => def("Upgrade Unit", City, None, false),
            Action::ParadropUnit => def("Paradrop Unit", Tile, None, true),
            Action::AirliftUnit => def("Airlift Unit", City, None, true),
            Action::Attack => def("Attack", Units, None, false),
            Action::SuicideAttack => def("Suicide Attack", Units, None, false),
            Action::ConquerCity => def("Conquer City", City, None, true),
            Action::ConquerCity2 => def("Conquer City 2", City, None, true),
            Action::ConquerCity3 => def("Conquer City 3", City, None, true),
            Action::ConquerCity4 => def("Conquer City 4", City, None, true),
            Action::ConquerCityShrink => def("Conquer City Shrink", City, None, true),
            Action::ConquerCityShrink2 => def("Conquer City Shrink 2", City, None, true),
            Action::ConquerCityShrink3 => def("Conquer City Shrink 3", City, None, true),
            Action::ConquerCityShrink4 => def("Conquer City Shrink 4", City, None, true),
            Action::HealUnit => def("Heal Unit", Unit, None, false),
            Action::TransformTerrain => {
                def("Transform Terrain", Tile, Some(Activity::Transform), false)
            }
            Action::Cultivate => def("Cultivate", Tile, Some(Activity::Cultivate), false),
            Action::Plant => def("Plant", Tile, Some(Activity::Plant), false),
            Action::Pillage => def("Pillage", Tile, Some(Activity::Pillage), false),
            Action::Clean => def("Clean", Tile, Some(Activity::Clean), false),
            Action::Fortify => def("Fortify", SelfUnit, Some(Activity::Fortifying), false),
            Action::BuildRoad => def("Build Road", Tile, Some(Activity::Road), false),
            Action::ConvertUnit => def("Convert Unit", SelfUnit, Some(Activity::Convert), false),
            Action::BuildBase => def("Build Base", Tile, Some(Activity::Base), false),
            Action::BuildMine => def("Build Mine", Tile, Some(Activity::Mine), false),
            Action::BuildIrrigation => {
                def("Build Irrigation", Tile, Some(Activity::Irrigate), false)
            }
            Action::TransportDeboard => def("Transport Deboard", SelfUnit, None, false),
            Action::TransportUnload => def("Transport Unload", Unit, None, false),
            Action::TransportDisembark => def("Transport Disembark", Tile, None, true),
            Action::TransportBoard => def("Transport Board", Unit, None, false),
            Action::TransportEmbark => def("Transport Embark", Unit, None, true),
            Action::SpyAttack => def("Spy Attack", Units, None, false),
            Action::UnitMove => def("Unit Move", Tile, None, true),
        }
    }

    pub fn rule_name(self) -> &'static str {
        self.def().rule_name
    }

    pub fn default_activity(self) -> Option<Activity> {
        self.def().default_activity
    }

    pub fn moves_actor(self) -> bool {
        self.def().moves_actor
    }

    pub fn from_rule_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.rule_name().eq_ignore_ascii_case(name))
    }

    /// Rule names in canonical order, as written to `savefile.action_vector`.
    pub fn canonical_names() -> Vec<String> {
        Self::ALL.iter().map(|a| a.rule_name().to_string()).collect()
    }
}
