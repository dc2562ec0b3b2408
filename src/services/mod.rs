pub mod audit;
pub mod comments;
pub mod histories;
pub mod inspections;
pub mod quality;
pub mod reference;
pub mod users;

use std::fmt;
use std::str::FromStr;

use sea_orm::{DbErr, SqlErr};

use crate::auth::CurrentUser;
use crate::errors::ServiceError;

/// Discriminator for the polymorphic parent of comments and histories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentType {
    Inspection,
    Quality,
}

impl ParentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inspection => "inspection",
            Self::Quality => "quality",
        }
    }
}

impl fmt::Display for ParentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParentType {
    type Err = ServiceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "inspection" => Ok(Self::Inspection),
            "quality" => Ok(Self::Quality),
            other => Err(ServiceError::ValidationError(format!(
                "Invalid parent type '{}'",
                other
            ))),
        }
    }
}

/// Author-only write permission: the owner recorded at creation is the sole
/// holder, and ownership never transfers.
pub fn ensure_owner(owner_id: i32, current: &CurrentUser) -> Result<(), ServiceError> {
    if owner_id != current.user_id {
        return Err(ServiceError::Forbidden(
            "Only the author can modify this record".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i32) -> CurrentUser {
        CurrentUser {
            user_id: id,
            username: format!("user{}", id),
        }
    }

    #[test]
    fn parent_type_parses_known_values_only() {
        assert_eq!("inspection".parse::<ParentType>().unwrap(), ParentType::Inspection);
        assert_eq!("quality".parse::<ParentType>().unwrap(), ParentType::Quality);
        assert!("order".parse::<ParentType>().is_err());
        assert!("Inspection".parse::<ParentType>().is_err());
    }

    #[test]
    fn owner_check() {
        assert!(ensure_owner(1, &user(1)).is_ok());
        assert!(matches!(
            ensure_owner(1, &user(2)),
            Err(ServiceError::Forbidden(_))
        ));
    }
}
