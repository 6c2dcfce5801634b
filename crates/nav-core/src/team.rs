//! Faction and agent-class enumerations.
//!
//! Teams are a closed two-element set resolved once at agent construction,
//! never re-derived from strings or tags per query.  The class distinction
//! exists because champion-class agents weigh more heavily in the influence
//! field than minion-class ones.

/// The two arena teams.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Faction {
    Red,
    Blue,
}

impl Faction {
    /// The opposing team.
    #[inline]
    pub fn enemy(self) -> Faction {
        match self {
            Faction::Red => Faction::Blue,
            Faction::Blue => Faction::Red,
        }
    }
}

impl std::fmt::Display for Faction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Faction::Red => write!(f, "red"),
            Faction::Blue => write!(f, "blue"),
        }
    }
}

/// Broad capability class of an agent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AgentClass {
    /// Hero unit — rare, high-impact presence.
    Champion,
    /// Wave unit — numerous, low-impact presence.
    Minion,
}

impl AgentClass {
    /// Contribution of one agent of this class to the influence field.
    #[inline]
    pub fn influence_weight(self) -> f32 {
        match self {
            AgentClass::Champion => 5.0,
            AgentClass::Minion => 1.0,
        }
    }
}
