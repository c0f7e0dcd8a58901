//! Dice configuration.
//!
//! A die is written as comma-separated face values, one die per argument:
//! `2,2,4,4,9,9`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FairPlayError, Result};

/// Faces of one die, in configuration order. Never empty; faces may repeat.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct FaceSet {
    faces: Vec<u32>,
}

impl FaceSet {
    /// Build from face values. Fails on an empty list or a zero face.
    pub fn new(faces: Vec<u32>) -> Result<Self> {
        if faces.is_empty() {
            return Err(FairPlayError::EmptyFaceSet);
        }
        if faces.contains(&0) {
            return Err(FairPlayError::ConfigParse {
                input: join_faces(&faces),
                reason: "faces must be positive integers".into(),
            });
        }
        Ok(Self { faces })
    }

    /// Parse `"1,2,3"`. Whitespace around tokens is ignored.
    pub fn parse(text: &str) -> Result<Self> {
        let faces = text
            .split(',')
            .map(|token| parse_face(text, token))
            .collect::<Result<Vec<_>>>()?;
        Self::new(faces)
    }

    /// Face values.
    pub fn faces(&self) -> &[u32] {
        &self.faces
    }

    /// Number of faces.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Face at `index`, if any.
    pub fn face(&self, index: usize) -> Option<u32> {
        self.faces.get(index).copied()
    }
}

fn parse_face(input: &str, token: &str) -> Result<u32> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return Err(FairPlayError::ConfigParse {
            input: input.to_string(),
            reason: "empty face value".into(),
        });
    }
    let face: u32 = trimmed.parse().map_err(|_| FairPlayError::ConfigParse {
        input: input.to_string(),
        reason: format!("'{trimmed}' is not a positive integer"),
    })?;
    if face == 0 {
        return Err(FairPlayError::ConfigParse {
            input: input.to_string(),
            reason: "faces must be positive integers".into(),
        });
    }
    Ok(face)
}

fn join_faces(faces: &[u32]) -> String {
    faces
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl fmt::Display for FaceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&join_faces(&self.faces))
    }
}

impl FromStr for FaceSet {
    type Err = FairPlayError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<Vec<u32>> for FaceSet {
    type Error = FairPlayError;

    fn try_from(faces: Vec<u32>) -> Result<Self> {
        Self::new(faces)
    }
}

impl From<FaceSet> for Vec<u32> {
    fn from(set: FaceSet) -> Self {
        set.faces
    }
}

/// Parse one die per argument.
pub fn parse_dice<S: AsRef<str>>(args: &[S]) -> Result<Vec<FaceSet>> {
    args.iter().map(|arg| FaceSet::parse(arg.as_ref())).collect()
}

/// Require at least `min` dice for a game.
pub fn require_playable(dice: &[FaceSet], min: usize) -> Result<()> {
    if dice.len() < min {
        return Err(FairPlayError::NotEnoughDice {
            required: min,
            provided: dice.len(),
        });
    }
    Ok(())
}
