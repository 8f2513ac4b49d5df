// ── Resource locators ──
//
// Normalized identifiers for the objects the managers look up. WWPNs
// arrive in many spellings; volume and LSS ids are fixed-width hex.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;

// ── Wwpn ────────────────────────────────────────────────────────────

/// Host port WWPN, normalized to upper-case hex without separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Wwpn(String);

impl Wwpn {
    /// Accepts colon-separated or bare hex in any case. Anything that
    /// normalizes to an empty or non-hex string is rejected.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CoreError> {
        let raw = raw.as_ref();
        let normalized = raw.trim().replace(':', "").to_uppercase();
        if normalized.is_empty() || !normalized.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::validation(format!(
                "WWPN '{}' must be hex digits",
                raw.trim()
            )));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Wwpn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Wwpn {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ── VolumeId ────────────────────────────────────────────────────────

/// Four-hex-digit volume id. The first two digits are the LSS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VolumeId(u16);

impl VolumeId {
    pub fn from_value(value: u16) -> Self {
        Self(value)
    }

    pub fn value(self) -> u16 {
        self.0
    }

    pub fn lss(self) -> LssId {
        LssId(self.0.to_be_bytes()[0])
    }

    /// Lowest and highest volume id inside `lss`.
    pub fn lss_bounds(lss: LssId) -> (Self, Self) {
        let base = u16::from(lss.0) << 8;
        (Self(base), Self(base | 0xFF))
    }
}

impl fmt::Display for VolumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

impl FromStr for VolumeId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 4 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::validation(format!(
                "volume id '{s}' must be four hex digits"
            )));
        }
        u16::from_str_radix(s, 16)
            .map(Self)
            .map_err(|e| CoreError::validation(format!("volume id '{s}': {e}")))
    }
}

impl Serialize for VolumeId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── LssId ───────────────────────────────────────────────────────────

/// Two-hex-digit logical subsystem id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LssId(u8);

impl LssId {
    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for LssId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}", self.0)
    }
}

impl FromStr for LssId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 2 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::validation(format!(
                "LSS id '{s}' must be two hex digits"
            )));
        }
        u8::from_str_radix(s, 16)
            .map(Self)
            .map_err(|e| CoreError::validation(format!("LSS id '{s}': {e}")))
    }
}

impl Serialize for LssId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn wwpn_strips_colons_and_uppercases() {
        let wwpn = Wwpn::new("10:00:00:00:c9:a1:ba:b2").unwrap();
        assert_eq!(wwpn.as_str(), "10000000C9A1BAB2");
        assert_eq!(wwpn, Wwpn::new("10000000c9a1bab2").unwrap());
    }

    #[test]
    fn wwpn_from_str() {
        let wwpn: Wwpn = " 1000 ".parse().unwrap();
        assert_eq!(wwpn.to_string(), "1000");
    }

    #[test]
    fn wwpn_rejects_blank_and_non_hex() {
        for raw in ["", "   ", ":", "::", "10:zz", "c9a1-bab2"] {
            let err = raw.parse::<Wwpn>().unwrap_err();
            assert!(matches!(err, CoreError::Validation { .. }), "{raw:?}: {err}");
        }
    }

    #[test]
    fn volume_id_round_trips_and_knows_lss() {
        let id: VolumeId = "10ff".parse().unwrap();
        assert_eq!(id.to_string(), "10FF");
        assert_eq!(id.lss().to_string(), "10");
        assert_eq!(id.value(), 0x10FF);
    }

    #[test]
    fn volume_id_rejects_bad_input() {
        assert!("100".parse::<VolumeId>().is_err());
        assert!("10G0".parse::<VolumeId>().is_err());
        assert!("+100".parse::<VolumeId>().is_err());
    }

    #[test]
    fn lss_bounds() {
        let lss: LssId = "a0".parse().unwrap();
        let (lo, hi) = VolumeId::lss_bounds(lss);
        assert_eq!(lo.to_string(), "A000");
        assert_eq!(hi.to_string(), "A0FF");
    }

    #[test]
    fn lss_id_rejects_bad_input() {
        assert!("1".parse::<LssId>().is_err());
        assert!("zz".parse::<LssId>().is_err());
    }
}
