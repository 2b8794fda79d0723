use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::AppError;

/// Organizational scope shared by admin `field`, student `department`,
/// teacher `field`/`department` and activity `field`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Field {
    #[serde(rename = "Computer Science")]
    ComputerScience,
    Mechanical,
    Electrical,
    Civil,
    Electronics,
    Chemical,
    General,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::ComputerScience,
        Field::Mechanical,
        Field::Electrical,
        Field::Civil,
        Field::Electronics,
        Field::Chemical,
        Field::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::ComputerScience => "Computer Science",
            Field::Mechanical => "Mechanical",
            Field::Electrical => "Electrical",
            Field::Civil => "Civil",
            Field::Electronics => "Electronics",
            Field::Chemical => "Chemical",
            Field::General => "General",
        }
    }

    pub fn is_general(&self) -> bool {
        matches!(self, Field::General)
    }

    /// Departments are every field except `General`.
    pub fn require_department(self) -> Result<Self, AppError> {
        if self.is_general() {
            return Err(AppError::bad_request("General is not a department"));
        }
        Ok(self)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| AppError::bad_request(format!("invalid field: {s}")))
    }
}

/// Parses an optional stored column, treating stored garbage as an internal error.
pub(crate) fn parse_stored<T: FromStr<Err = AppError>>(raw: Option<String>) -> Result<Option<T>, AppError> {
    raw.map(|value| {
        value
            .parse::<T>()
            .map_err(|_| AppError::internal(format!("invalid stored value: {value}")))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_display_names() {
        assert_eq!("Computer Science".parse::<Field>().unwrap(), Field::ComputerScience);
        assert_eq!("General".parse::<Field>().unwrap(), Field::General);
        assert!("computer science".parse::<Field>().is_err());
    }

    #[test]
    fn serde_uses_display_names() {
        let json = serde_json::to_string(&Field::ComputerScience).unwrap();
        assert_eq!(json, "\"Computer Science\"");
        for field in Field::ALL {
            let encoded = serde_json::to_value(field).unwrap();
            assert_eq!(encoded.as_str(), Some(field.as_str()));
        }
    }

    #[test]
    fn general_is_not_a_department() {
        assert!(Field::General.require_department().is_err());
        assert_eq!(Field::Civil.require_department().unwrap(), Field::Civil);
    }
}
