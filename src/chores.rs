use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BoardError;

/// The household chores that rotate between members.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chore {
    Dishes,
    Trash,
    Bathroom,
}

impl Chore {
    /// Rotation order.
    pub const ROTATION: [Chore; 3] = [Chore::Dishes, Chore::Trash, Chore::Bathroom];

    pub fn name(&self) -> &'static str {
        match self {
            Chore::Dishes => "Dishes",
            Chore::Trash => "Trash",
            Chore::Bathroom => "Bathroom",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Chore::Dishes => "🍽️",
            Chore::Trash => "🗑️",
            Chore::Bathroom => "🚿",
        }
    }
}

impl fmt::Display for Chore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Chore {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Chore::ROTATION
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| BoardError::UnknownChore(s.to_string()))
    }
}

/// The chore after `current` in the rotation, wrapping around.
///
/// Anything unrecognized, or no chore at all, starts the rotation over.
pub fn next_chore(current: Option<&str>) -> Chore {
    let position = current.and_then(|name| Chore::ROTATION.iter().position(|c| c.name() == name));
    match position {
        Some(i) => Chore::ROTATION[(i + 1) % Chore::ROTATION.len()],
        None => Chore::ROTATION[0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_wraps() {
        assert_eq!(next_chore(Some("Dishes")), Chore::Trash);
        assert_eq!(next_chore(Some("Trash")), Chore::Bathroom);
        assert_eq!(next_chore(Some("Bathroom")), Chore::Dishes);
    }

    #[test]
    fn unknown_or_missing_starts_over() {
        assert_eq!(next_chore(None), Chore::Dishes);
        assert_eq!(next_chore(Some("Laundry")), Chore::Dishes);
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("trash".parse::<Chore>().unwrap(), Chore::Trash);
        assert!("Vacuum".parse::<Chore>().is_err());
    }
}
