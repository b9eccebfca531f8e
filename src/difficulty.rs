use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

/// Speed setting; each level is a fixed time between ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn interval(self) -> Duration {
        match self {
            Difficulty::Easy => Duration::from_millis(150),
            Difficulty::Medium => Duration::from_millis(100),
            Difficulty::Hard => Duration::from_millis(60),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty {0:?} (expected easy, medium or hard)")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(UnknownDifficulty(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_easy() {
        assert_eq!(Difficulty::default(), Difficulty::Easy);
    }

    #[test]
    fn intervals() {
        assert_eq!(Difficulty::Easy.interval(), Duration::from_millis(150));
        assert_eq!(Difficulty::Medium.interval(), Duration::from_millis(100));
        assert_eq!(Difficulty::Hard.interval(), Duration::from_millis(60));
    }

    #[test]
    fn parses_names() {
        assert_eq!("Medium".parse::<Difficulty>(), Ok(Difficulty::Medium));
        assert_eq!(" hard ".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("insane".parse::<Difficulty>().is_err());
        for level in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(level.to_string().parse::<Difficulty>(), Ok(level));
        }
    }
}
