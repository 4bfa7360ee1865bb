//! Dice and die sets.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Fewest faces a die may have
pub const MIN_FACES: usize = 3;

/// Fewest dice a game needs
pub const MIN_DICE: usize = 3;

/// Errors building dice from user input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiceError {
    #[error("Dice must have at least three sides, got {found}: {die}")]
    TooFewFaces { die: String, found: usize },

    #[error("At least 3 dice are required, got {found}")]
    TooFewDice { found: usize },

    #[error("Non-integer value {token:?} found in dice: {die}")]
    NonInteger { die: String, token: String },

    #[error("Too many {what}")]
    TooLarge { what: &'static str },
}

/// An ordered, immutable list of face values
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Die {
    faces: Vec<i64>,
}

impl Die {
    /// Create a die; it needs at least three faces
    pub fn new(faces: Vec<i64>) -> Result<Self, DiceError> {
        if faces.len() < MIN_FACES {
            return Err(DiceError::TooFewFaces {
                die: join(&faces),
                found: faces.len(),
            });
        }
        if u32::try_from(faces.len()).is_err() {
            return Err(DiceError::TooLarge { what: "faces" });
        }
        Ok(Self { faces })
    }

    pub fn faces(&self) -> &[i64] {
        &self.faces
    }

    /// Number of faces
    pub fn size(&self) -> u32 {
        // bounded at construction
        self.faces.len() as u32
    }

    /// Face value at `index`
    pub fn face(&self, index: u32) -> Option<i64> {
        self.faces.get(index as usize).copied()
    }
}

impl FromStr for Die {
    type Err = DiceError;

    /// Parse comma separated faces, e.g. `2,2,4,4,9,9`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let faces = s
            .split(',')
            .map(|token| {
                token.trim().parse::<i64>().map_err(|_| DiceError::NonInteger {
                    die: s.to_string(),
                    token: token.trim().to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(faces)
    }
}

impl fmt::Display for Die {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", join(&self.faces))
    }
}

fn join(faces: &[i64]) -> String {
    faces
        .iter()
        .map(|face| face.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// The dice on the table for one game, addressed by index
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DieSet {
    dice: Vec<Die>,
}

impl DieSet {
    /// Create a die set; it needs at least three dice
    pub fn new(dice: Vec<Die>) -> Result<Self, DiceError> {
        if dice.len() < MIN_DICE {
            return Err(DiceError::TooFewDice { found: dice.len() });
        }
        if u32::try_from(dice.len()).is_err() {
            return Err(DiceError::TooLarge { what: "dice" });
        }
        Ok(Self { dice })
    }

    /// Parse one die per argument
    pub fn parse<I>(args: I) -> Result<Self, DiceError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let dice = args
            .into_iter()
            .map(|arg| arg.as_ref().parse::<Die>())
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(dice)
    }

    pub fn len(&self) -> usize {
        self.dice.len()
    }

    /// Never true for a constructed set
    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Die> {
        self.dice.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Die> {
        self.dice.iter()
    }

    /// Every index except `excluded`
    pub fn indices_except(&self, excluded: Option<usize>) -> Vec<usize> {
        (0..self.dice.len())
            .filter(|index| Some(*index) != excluded)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_die() {
        let die: Die = "2,2,4,4,9,9".parse().unwrap();
        assert_eq!(die.faces(), &[2, 2, 4, 4, 9, 9]);
        assert_eq!(die.size(), 6);
        assert_eq!(die.to_string(), "[2,2,4,4,9,9]");
    }

    #[test]
    fn test_parse_tolerates_spaces_and_negatives() {
        let die: Die = " 1, -2 ,3".parse().unwrap();
        assert_eq!(die.faces(), &[1, -2, 3]);
    }

    #[test]
    fn test_die_needs_three_faces() {
        assert_eq!(
            "1,2".parse::<Die>(),
            Err(DiceError::TooFewFaces {
                die: "1,2".to_string(),
                found: 2
            })
        );
        assert!(Die::new(vec![1, 2, 3]).is_ok());
    }

    #[test]
    fn test_non_integer_face() {
        assert_eq!(
            "1,x,3".parse::<Die>(),
            Err(DiceError::NonInteger {
                die: "1,x,3".to_string(),
                token: "x".to_string()
            })
        );
        assert!(matches!(
            "1.5,2,3".parse::<Die>(),
            Err(DiceError::NonInteger { .. })
        ));
        assert!(matches!("".parse::<Die>(), Err(DiceError::NonInteger { .. })));
    }

    #[test]
    fn test_face_lookup() {
        let die: Die = "1,1,6,6,8,8".parse().unwrap();
        assert_eq!(die.face(2), Some(6));
        assert_eq!(die.face(6), None);
    }

    #[test]
    fn test_die_set_needs_three_dice() {
        assert_eq!(
            DieSet::parse(["1,2,3", "4,5,6"]),
            Err(DiceError::TooFewDice { found: 2 })
        );
        assert_eq!(
            DieSet::parse(Vec::<String>::new()),
            Err(DiceError::TooFewDice { found: 0 })
        );
    }

    #[test]
    fn test_die_set_reports_first_bad_die() {
        assert!(matches!(
            DieSet::parse(["1,2,3", "4,5", "7,8,9"]),
            Err(DiceError::TooFewFaces { found: 2, .. })
        ));
    }

    #[test]
    fn test_indices_except() {
        let dice = DieSet::parse(["2,2,4,4,9,9", "1,1,6,6,8,8", "3,3,5,5,7,7"]).unwrap();
        assert_eq!(dice.indices_except(Some(1)), vec![0, 2]);
        assert_eq!(dice.indices_except(None), vec![0, 1, 2]);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            DiceError::TooFewDice { found: 1 }.to_string(),
            "At least 3 dice are required, got 1"
        );
    }
}
