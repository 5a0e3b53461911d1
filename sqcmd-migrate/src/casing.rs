//! Name casing for generated files and model names.

use std::fmt;
use std::str::FromStr;

use convert_case::{Case, Casing as _};
use serde::{Deserialize, Serialize};

/// A casing applied to file names or model names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Casing {
    /// `user profile`
    Lower,
    /// `USER PROFILE`
    Upper,
    /// `User Profile`
    Title,
    /// Upper-case the first character only.
    #[serde(alias = "capitalize")]
    First,
    /// `userProfile`
    Camel,
    /// `UserProfile`
    Pascal,
    /// `user_profile`
    Snake,
}

impl Casing {
    /// Apply this casing to a string.
    pub fn apply(&self, s: &str) -> String {
        match self {
            Self::Lower => s.to_lowercase(),
            Self::Upper => s.to_uppercase(),
            Self::Title => s.to_case(Case::Title),
            Self::First => {
                let mut chars = s.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
            Self::Camel => s.to_case(Case::Camel),
            Self::Pascal => s.to_case(Case::Pascal),
            Self::Snake => s.to_case(Case::Snake),
        }
    }

    /// Get the configuration name of this casing.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lower => "lower",
            Self::Upper => "upper",
            Self::Title => "title",
            Self::First => "first",
            Self::Camel => "camel",
            Self::Pascal => "pascal",
            Self::Snake => "snake",
        }
    }
}

impl FromStr for Casing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lower" => Ok(Self::Lower),
            "upper" => Ok(Self::Upper),
            "title" => Ok(Self::Title),
            "first" | "capitalize" => Ok(Self::First),
            "camel" => Ok(Self::Camel),
            "pascal" => Ok(Self::Pascal),
            "snake" => Ok(Self::Snake),
            _ => Err(format!("unknown casing '{}'", s)),
        }
    }
}

impl fmt::Display for Casing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Apply an optional casing; `None` leaves the string untouched.
pub fn str_to_case(s: &str, casing: Option<Casing>) -> String {
    match casing {
        Some(casing) => casing.apply(s),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_casings() {
        assert_eq!(Casing::Lower.apply("UserProfile"), "userprofile");
        assert_eq!(Casing::Upper.apply("user"), "USER");
        assert_eq!(Casing::First.apply("user"), "User");
        assert_eq!(Casing::First.apply("userProfile"), "UserProfile");
        assert_eq!(Casing::First.apply(""), "");
        assert_eq!(Casing::Camel.apply("user-profile"), "userProfile");
        assert_eq!(Casing::Pascal.apply("user_profile"), "UserProfile");
        assert_eq!(Casing::Snake.apply("UserProfile"), "user_profile");
        assert_eq!(Casing::Title.apply("user profile"), "User Profile");
    }

    #[test]
    fn test_parse_with_alias() {
        assert_eq!("capitalize".parse::<Casing>().unwrap(), Casing::First);
        assert_eq!("Pascal".parse::<Casing>().unwrap(), Casing::Pascal);
        assert!("shouting".parse::<Casing>().is_err());
    }

    #[test]
    fn test_str_to_case_none() {
        assert_eq!(str_to_case("user", None), "user");
        assert_eq!(str_to_case("user", Some(Casing::Upper)), "USER");
    }

    #[test]
    fn test_deserialize_alias() {
        let casing: Casing = serde_json::from_str("\"capitalize\"").unwrap();
        assert_eq!(casing, Casing::First);
    }
}
