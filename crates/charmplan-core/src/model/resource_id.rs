// ── Resource identifier ──
//
// Applications are tracked as `<model>:<application>`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId {
    pub model: String,
    pub application: String,
}

impl ApplicationId {
    pub fn new(model: impl Into<String>, application: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            application: application.into(),
        }
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.model, self.application)
    }
}

impl FromStr for ApplicationId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(model), Some(application), None)
                if !model.is_empty() && !application.is_empty() =>
            {
                Ok(Self::new(model, application))
            }
            _ => Err(CoreError::InvalidResourceId { id: s.to_owned() }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        let id: ApplicationId = "prod:postgresql".parse().unwrap();
        assert_eq!(id.model, "prod");
        assert_eq!(id.application, "postgresql");
        assert_eq!(id.to_string(), "prod:postgresql");
    }

    #[test]
    fn rejects_missing_separator() {
        let err = "postgresql".parse::<ApplicationId>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidResourceId { .. }));
    }

    #[test]
    fn rejects_extra_segments() {
        assert!("prod:pg:extra".parse::<ApplicationId>().is_err());
    }

    #[test]
    fn rejects_empty_segments() {
        assert!(":pg".parse::<ApplicationId>().is_err());
        assert!("prod:".parse::<ApplicationId>().is_err());
    }
}
