use serde::{Deserialize, Serialize};

// =============================================================================
// Unit activities
// =============================================================================

/// What a unit is busy doing on its tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Activity {
    #[default]
    Idle,
    Clean,
    Mine,
    Irrigate,
    Fortified,
    Sentry,
    Pillage,
    Goto,
    Explore,
    Transform,
    Fortifying,
    Base,
    Road,
    Convert,
    Cultivate,
    Plant,
}

impl Activity {
    pub const ALL: [Activity; 16] = [
        Activity::Idle,
        Activity::Clean,
        Activity::Mine,
        Activity::Irrigate,
        Activity::Fortified,
        Activity::Sentry,
        Activity::Pillage,
        Activity::Goto,
        Activity::Explore,
        Activity::Transform,
        Activity::Fortifying,
        Activity::Base,
        Activity::Road,
        Activity::Convert,
        Activity::Cultivate,
        Activity::Plant,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Activity::Idle => "Idle",
            Activity::Clean => "Clean",
            Activity::Mine => "Mine",
            Activity::Irrigate => "Irrigate",
            Activity::Fortified => "Fortified",
            Activity::Sentry => "Sentry",
            Activity::Pillage => "Pillage",
            Activity::Goto => "Goto",
            Activity::Explore => "Explore",
            Activity::Transform => "Transform",
            Activity::Fortifying => "Fortifying",
            Activity::Base => "Base",
            Activity::Road => "Road",
            Activity::Convert => "Convert",
            Activity::Cultivate => "Cultivate",
            Activity::Plant => "Plant",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.name().eq_ignore_ascii_case(name))
    }

    /// Letter used for this activity in saved order lists.
    pub fn to_char(self) -> char {
        match self {
            Activity::Idle => 'w',
            Activity::Clean => 'C',
            Activity::Mine => 'm',
            Activity::Irrigate => 'i',
            Activity::Fortified => 'f',
            Activity::Sentry => 's',
            Activity::Pillage => 'e',
            Activity::Goto => 'g',
            Activity::Explore => 'x',
            Activity::Transform => 'o',
            Activity::Fortifying => 'y',
            Activity::Base => 'b',
            Activity::Road => 'R',
            Activity::Convert => 'c',
            Activity::Cultivate => 'I',
            Activity::Plant => 'M',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.to_char() == c)
    }
}

// =============================================================================
// Server side agents
// =============================================================================

/// Automated controller of a unit, as opposed to direct player control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ServerSideAgent {
    #[default]
    None,
    Autoworker,
    Autoexplore,
}

impl ServerSideAgent {
    pub const ALL: [ServerSideAgent; 3] = [
        ServerSideAgent::None,
        ServerSideAgent::Autoworker,
        ServerSideAgent::Autoexplore,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ServerSideAgent::None => "None",
            ServerSideAgent::Autoworker => "Autoworker",
            ServerSideAgent::Autoexplore => "Autoexplore",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }
}
