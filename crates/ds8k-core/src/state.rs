use serde::{Deserialize, Serialize};

/// Target state of a managed object.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DesiredState {
    #[default]
    Present,
    Absent,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Absent".parse::<DesiredState>().unwrap(), DesiredState::Absent);
        assert_eq!(DesiredState::Present.to_string(), "present");
        assert!("gone".parse::<DesiredState>().is_err());
    }
}
