use std::{borrow::Cow, fmt, str::FromStr};

use serde::{Deserialize, Deserializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    Str(String),
    Base,
    Location,
}

/// Template turning a base class and a location into the location-suffixed
/// class, e.g. `[base]--[location]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierPattern(Vec<Fragment>);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("invalid modifier pattern: {0}")]
    Syntax(String),
    #[error("modifier pattern `{0}` has no [location] placeholder")]
    MissingLocation(String),
}

impl ModifierPattern {
    pub fn parse(input: &str) -> Result<Self, PatternError> {
        let pattern = parse::parse_pattern(input).map_err(|e| PatternError::Syntax(e.to_string()))?;
        if !pattern.0.contains(&Fragment::Location) {
            return Err(PatternError::MissingLocation(input.to_owned()));
        }
        Ok(pattern)
    }

    pub fn apply(&self, base: &str, location: &str) -> String {
        self.0
            .iter()
            .map(|v| match v {
                Fragment::Str(s) => s,
                Fragment::Base => base,
                Fragment::Location => location,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

impl Default for ModifierPattern {
    fn default() -> Self {
        Self(vec![
            Fragment::Base,
            Fragment::Str("--".into()),
            Fragment::Location,
        ])
    }
}

impl FromStr for ModifierPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ModifierPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for fragment in &self.0 {
            match fragment {
                Fragment::Str(s) => f.write_str(s)?,
                Fragment::Base => f.write_str("[base]")?,
                Fragment::Location => f.write_str("[location]")?,
            }
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for ModifierPattern {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: Cow<str> = Deserialize::deserialize(deserializer)?;

        match ModifierPattern::parse(&s) {
            Ok(v) => Ok(v),
            Err(e) => Err(serde::de::Error::custom(e)),
        }
    }
}

mod parse {
    use super::*;
    use winnow::{
        combinator::{alt, repeat},
        error::{ContextError, ParseError},
        token::take_till,
        PResult, Parser,
    };

    fn fragment(input: &mut &str) -> PResult<Fragment> {
        alt((
            "[base]".value(Fragment::Base),
            "[location]".value(Fragment::Location),
            take_till(1.., '[').map(|s: &str| Fragment::Str(s.into())),
        ))
        .parse_next(input)
    }

    fn pattern(input: &mut &str) -> PResult<Vec<Fragment>> {
        repeat(0.., fragment).parse_next(input)
    }

    pub fn parse_pattern(input: &str) -> Result<ModifierPattern, ParseError<&str, ContextError>> {
        Ok(ModifierPattern(pattern.parse(input)?))
    }
}

#[cfg(test)]
mod test {
    use crate::modifier_pattern::{ModifierPattern, PatternError};

    #[test]
    fn test_default_pattern() {
        assert_eq!(
            "toolbar--top",
            ModifierPattern::default().apply("toolbar", "top")
        );
        assert_eq!("[base]--[location]", ModifierPattern::default().to_string());
    }

    #[test]
    fn test_pattern_deserialize() {
        let pattern: ModifierPattern =
            serde_json::from_str("\"is-[location]-[base]\"").expect("should deserialize");

        assert_eq!("is-top-toolbar", pattern.apply("toolbar", "top"));
    }

    #[test]
    fn test_pattern_display_roundtrips() {
        let pattern = ModifierPattern::parse("[base]__[location]").expect("valid pattern");
        assert_eq!(pattern.to_string(), "[base]__[location]");
    }

    #[test]
    fn test_pattern_without_location() {
        assert_eq!(
            ModifierPattern::parse("[base]-static"),
            Err(PatternError::MissingLocation("[base]-static".into()))
        );
    }

    #[test]
    fn test_pattern_unknown_placeholder() {
        assert!(matches!(
            ModifierPattern::parse("[base]--[where]"),
            Err(PatternError::Syntax(_))
        ));
    }
}
