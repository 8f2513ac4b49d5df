// ── CKD alias id derivation ──
//
// The array allocates alias volumes itself; the ids computed here are
// what the request asks for and what gets reported back.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::ids::VolumeId;

/// Direction in which alias ids are handed out from the start id.
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
pub enum AliasOrder {
    Increment,
    #[default]
    Decrement,
}

/// Alias ids assigned to one base volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasPlan {
    pub base: VolumeId,
    /// First alias id requested for this base.
    pub start: VolumeId,
    pub aliases: Vec<VolumeId>,
}

/// Derive the alias ids for `bases`, `per_base` aliases each.
///
/// Alias `j` of base `i` is `start ± (i * per_base + j)`. Without an
/// explicit start, decrementing begins at `<lss>FF` of the first base;
/// incrementing has no sensible default and needs one. Every id must
/// stay inside the start id's LSS.
pub fn plan_aliases(
    bases: &[VolumeId],
    per_base: u32,
    order: AliasOrder,
    start: Option<VolumeId>,
) -> Result<Vec<AliasPlan>, CoreError> {
    let Some(first) = bases.first() else {
        return Err(CoreError::validation(
            "at least one base volume id is required",
        ));
    };
    if per_base == 0 {
        return Err(CoreError::validation("alias quantity must be at least 1"));
    }

    let start = match (start, order) {
        (Some(start), _) => start,
        (None, AliasOrder::Decrement) => VolumeId::lss_bounds(first.lss()).1,
        (None, AliasOrder::Increment) => {
            return Err(CoreError::validation(
                "an explicit alias start id is required when order is increment",
            ));
        }
    };

    let (low, high) = VolumeId::lss_bounds(start.lss());
    let mut plans = Vec::with_capacity(bases.len());
    let mut offset: u32 = 0;

    for base in bases {
        let mut aliases = Vec::new();
        for _ in 0..per_base {
            let id = step(start, offset, order)
                .filter(|id| (low..=high).contains(id))
                .ok_or_else(|| {
                    CoreError::validation(format!(
                        "{} aliases from {start} ({order}) leave LSS {}",
                        bases.len() * usize::try_from(per_base).unwrap_or(usize::MAX),
                        start.lss()
                    ))
                })?;
            aliases.push(id);
            offset += 1;
        }
        plans.push(AliasPlan {
            base: *base,
            start: aliases[0],
            aliases,
        });
    }

    Ok(plans)
}

fn step(start: VolumeId, offset: u32, order: AliasOrder) -> Option<VolumeId> {
    let offset = u16::try_from(offset).ok()?;
    let value = match order {
        AliasOrder::Increment => start.value().checked_add(offset)?,
        AliasOrder::Decrement => start.value().checked_sub(offset)?,
    };
    Some(VolumeId::from_value(value))
}
