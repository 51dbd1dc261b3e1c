// crates/palkey-core/src/validate.rs

use std::collections::HashSet;

use crate::error::{PalError, Result};
use crate::mapping::fuzzy::MAX_TOLERANCE;
use crate::resource::layout::{RosterLayout, Segment};

pub fn validate_tolerance(tolerance: u8) -> Result<()> {
    // Above this, clusters around neighbouring 5-bit levels start to overlap.
    if tolerance > MAX_TOLERANCE {
        return Err(PalError::Validation(format!(
            "tolerance {tolerance} exceeds maximum of {MAX_TOLERANCE}"
        )));
    }
    Ok(())
}

/// Checks a layout against a resource of `len` bytes before anything is rewritten.
pub fn validate_layout(layout: &RosterLayout, len: usize) -> Result<()> {
    let fits = |s: &Segment| -> Result<()> {
        if s.end()? > len {
            return Err(PalError::SegmentOutOfBounds {
                offset: s.offset,
                entries: s.entries,
                len,
            });
        }
        Ok(())
    };

    let mut names = HashSet::new();
    for c in &layout.characters {
        if !names.insert(c.name.as_str()) {
            return Err(PalError::Layout(format!("duplicate character {:?}", c.name)));
        }
        for s in c.segments() {
            fits(s)?;
        }
    }

    let mut effects = HashSet::new();
    for e in &layout.effects {
        if !effects.insert(e.name.as_str()) {
            return Err(PalError::Layout(format!("duplicate effect {:?}", e.name)));
        }
        fits(&e.segment())?;
    }

    Ok(())
}
