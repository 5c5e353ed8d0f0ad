use crate::error::{AlmError, AlmResult};

/// A named slice of the lunar cycle, as a `[start, end)` fraction range.
///
/// Fractions measure progress through the synodic period from the
/// reference full moon, so 0 is full and 0.5 is new. The one band whose
/// `start > end` *wraps* across the 0/1 seam — that is how "full"
/// straddles the cycle boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseBand {
    /// Start of the range, inclusive, in `[0, 1]`.
    pub start: f64,
    /// End of the range, exclusive, in `[0, 1]`.
    pub end: f64,
    /// Phase name, e.g. `"waxing gibbous"`.
    pub name: String,
}

impl PhaseBand {
    /// Create a band.
    pub fn new(start: f64, end: f64, name: impl Into<String>) -> Self {
        Self {
            start,
            end,
            name: name.into(),
        }
    }

    /// True when this band wraps across the 0/1 seam.
    pub fn wraps(&self) -> bool {
        self.start > self.end
    }

    fn contains(&self, fraction: f64) -> bool {
        if self.wraps() {
            fraction >= self.start || fraction < self.end
        } else {
            fraction >= self.start && fraction < self.end
        }
    }
}

/// An ordered table of phase bands tiling the cycle `[0, 1)`.
///
/// The order is the order bands are displayed in; lookup walks the list,
/// so band order never affects which phase a fraction maps to (the tiling
/// guarantees exactly one match).
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseTable {
    bands: Vec<PhaseBand>,
}

impl Default for PhaseTable {
    /// The classic eight phases in eighth-of-cycle bands centered on the
    /// full moon at fraction 0.
    fn default() -> Self {
        Self {
            bands: vec![
                PhaseBand::new(0.9375, 0.0625, "full"),
                PhaseBand::new(0.0625, 0.1875, "waning gibbous"),
                PhaseBand::new(0.1875, 0.3125, "third quarter"),
                PhaseBand::new(0.3125, 0.4375, "waning crescent"),
                PhaseBand::new(0.4375, 0.5625, "new"),
                PhaseBand::new(0.5625, 0.6875, "waxing crescent"),
                PhaseBand::new(0.6875, 0.8125, "first quarter"),
                PhaseBand::new(0.8125, 0.9375, "waxing gibbous"),
            ],
        }
    }
}

impl PhaseTable {
    /// Tolerance for tiling checks; band edges come from configuration
    /// text, not computation, so anything tighter than this is an error.
    const EDGE_EPSILON: f64 = 1e-9;

    /// Create a table from bands, validating that they tile `[0, 1)`.
    ///
    /// # Errors
    ///
    /// Returns [`AlmError::InvalidCalendarRule`] when the bands leave
    /// gaps, overlap, or more than one band wraps the seam.
    pub fn new(bands: Vec<PhaseBand>) -> AlmResult<Self> {
        let table = Self { bands };
        table.validate()?;
        Ok(table)
    }

    /// The bands, in display order.
    pub fn bands(&self) -> &[PhaseBand] {
        &self.bands
    }

    /// The phase name for a cycle fraction in `[0, 1)`.
    ///
    /// Total for validated tables; `None` can only happen for a fraction
    /// outside `[0, 1)`.
    pub fn classify(&self, fraction: f64) -> Option<&str> {
        self.bands
            .iter()
            .find(|band| band.contains(fraction))
            .map(|band| band.name.as_str())
    }

    fn validate(&self) -> AlmResult<()> {
        if self.bands.is_empty() {
            return Err(invalid("phase table has no bands"));
        }
        for band in &self.bands {
            if !(0.0..=1.0).contains(&band.start) || !(0.0..=1.0).contains(&band.end) {
                return Err(invalid(format!(
                    "phase \"{}\" has edges outside [0, 1]",
                    band.name
                )));
            }
        }
        if self.bands.iter().filter(|b| b.wraps()).count() > 1 {
            return Err(invalid("more than one phase band wraps the 0/1 seam"));
        }

        // Split the wrapping band at the seam, then the pieces must chain
        // start-to-end across [0, 1) with no gaps or overlaps.
        let mut pieces: Vec<(f64, f64)> = Vec::new();
        for band in &self.bands {
            if band.wraps() {
                pieces.push((band.start, 1.0));
                pieces.push((0.0, band.end));
            } else {
                pieces.push((band.start, band.end));
            }
        }
        pieces.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut edge = 0.0;
        for &(start, end) in &pieces {
            if (start - edge).abs() > Self::EDGE_EPSILON {
                return Err(invalid(format!(
                    "phase bands leave a gap or overlap near fraction {edge}"
                )));
            }
            if end <= start && !(end == 0.0 && start == 0.0) {
                return Err(invalid(format!(
                    "phase band piece [{start}, {end}) is empty or inverted"
                )));
            }
            edge = end;
        }
        if (edge - 1.0).abs() > Self::EDGE_EPSILON {
            return Err(invalid("phase bands do not reach the end of the cycle"));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> AlmError {
    AlmError::InvalidCalendarRule(message.into())
}

/// A moon phase lookup result: the phase name plus the raw cycle fraction
/// for callers that render continuously (icon selection, shading).
#[derive(Debug, Clone, PartialEq)]
pub struct MoonPhase {
    /// Matched phase name from the table.
    pub phase: String,
    /// Fraction of the synodic period elapsed since full, in `[0, 1)`.
    pub fraction: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_is_valid() {
        PhaseTable::default().validate().unwrap();
    }

    #[test]
    fn classifies_cardinal_fractions() {
        let table = PhaseTable::default();
        assert_eq!(table.classify(0.0), Some("full"));
        assert_eq!(table.classify(0.25), Some("third quarter"));
        assert_eq!(table.classify(0.5), Some("new"));
        assert_eq!(table.classify(0.75), Some("first quarter"));
        assert_eq!(table.classify(0.99), Some("full"));
    }

    #[test]
    fn every_fraction_matches_exactly_one_band() {
        let table = PhaseTable::default();
        for i in 0..10_000 {
            let fraction = f64::from(i) / 10_000.0;
            let matches = table
                .bands()
                .iter()
                .filter(|b| {
                    if b.wraps() {
                        fraction >= b.start || fraction < b.end
                    } else {
                        fraction >= b.start && fraction < b.end
                    }
                })
                .count();
            assert_eq!(matches, 1, "fraction {fraction} matched {matches} bands");
        }
    }

    #[test]
    fn band_edges_belong_to_the_starting_band() {
        let table = PhaseTable::default();
        assert_eq!(table.classify(0.0625), Some("waning gibbous"));
        assert_eq!(table.classify(0.9375), Some("full"));
    }

    #[test]
    fn gap_is_rejected() {
        let bands = vec![
            PhaseBand::new(0.0, 0.4, "a"),
            PhaseBand::new(0.5, 1.0, "b"),
        ];
        assert!(PhaseTable::new(bands).is_err());
    }

    #[test]
    fn overlap_is_rejected() {
        let bands = vec![
            PhaseBand::new(0.0, 0.6, "a"),
            PhaseBand::new(0.5, 1.0, "b"),
        ];
        assert!(PhaseTable::new(bands).is_err());
    }

    #[test]
    fn two_wrapping_bands_are_rejected() {
        let bands = vec![
            PhaseBand::new(0.9, 0.1, "a"),
            PhaseBand::new(0.8, 0.2, "b"),
        ];
        assert!(PhaseTable::new(bands).is_err());
    }

    #[test]
    fn table_without_wrap_is_fine() {
        let bands = vec![
            PhaseBand::new(0.0, 0.5, "waning"),
            PhaseBand::new(0.5, 1.0, "waxing"),
        ];
        let table = PhaseTable::new(bands).unwrap();
        assert_eq!(table.classify(0.1), Some("waning"));
        assert_eq!(table.classify(0.9), Some("waxing"));
    }
}
