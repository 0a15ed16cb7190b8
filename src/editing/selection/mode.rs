//! Presentation modes of the building

use serde::Serialize;

/// Which presentation the building is in
///
/// `Neither` is both the initial state and the hemisphere state reached when
/// leaving cylinder mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ModeState {
    #[default]
    Neither,
    Cylinder,
    Floor,
}

impl ModeState {
    pub fn name(&self) -> &'static str {
        match self {
            ModeState::Neither => "Hemisphere",
            ModeState::Cylinder => "Cylinder",
            ModeState::Floor => "Floor",
        }
    }

    /// Parse a mode name as typed on the command line
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cylinder" => Some(ModeState::Cylinder),
            "hemisphere" | "neither" => Some(ModeState::Neither),
            "floor" => Some(ModeState::Floor),
            _ => None,
        }
    }
}

/// Result of a mode change request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeTransition {
    /// The mode changed and the one-time cylinder setup ran
    EnteredWithSetup,
    Entered,
    /// Already in the requested mode
    Unchanged,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_names_round_trip() {
        for mode in [ModeState::Neither, ModeState::Cylinder, ModeState::Floor] {
            assert_eq!(ModeState::parse(mode.name()), Some(mode));
        }
        assert_eq!(ModeState::parse("sideways"), None);
        assert_eq!(ModeState::default(), ModeState::Neither);
    }
}
