//! Absolute LED positions along a spur.

use std::sync::Arc;

use crate::domain::{LedSlot, Line, LineName};
use crate::geometry::GeoIndex;

use super::error::MatchError;

/// 1-based position of `slot` along its spur's strand.
///
/// Sum of the LED counts of every earlier segment in the spur, plus
/// `slot.led + 1`. Recomputed from the segment table on every call.
pub fn absolute_position(line: &Line, slot: LedSlot) -> Result<usize, MatchError> {
    let spur = line
        .spurs()
        .get(slot.spur)
        .ok_or_else(|| MatchError::SpurOutOfRange {
            line: line.name().clone(),
            spur: slot.spur,
        })?;

    let segment = spur
        .segments()
        .get(slot.segment)
        .ok_or_else(|| MatchError::SegmentOutOfRange {
            line: line.name().clone(),
            spur: slot.spur,
            segment: slot.segment,
        })?;

    if slot.led >= segment.led_count() {
        return Err(MatchError::LedOutOfRange {
            line: line.name().clone(),
            slot,
        });
    }

    let before: usize = spur.segments()[..slot.segment]
        .iter()
        .map(|s| s.led_count())
        .sum();

    Ok(before + slot.led + 1)
}

/// Converts LED slots into strand positions for the lines of an index.
#[derive(Debug, Clone)]
pub struct SpurPositionResolver {
    index: Arc<GeoIndex>,
}

impl SpurPositionResolver {
    pub fn new(index: Arc<GeoIndex>) -> Self {
        Self { index }
    }

    /// 1-based position of `slot` along its spur on `line`.
    pub fn absolute_position(&self, line: &LineName, slot: LedSlot) -> Result<usize, MatchError> {
        absolute_position(self.line(line)?, slot)
    }

    /// Number of LEDs on a spur, which is also its last position.
    pub fn spur_length(&self, line: &LineName, spur: usize) -> Result<usize, MatchError> {
        let geometry = self.line(line)?;
        geometry
            .spurs()
            .get(spur)
            .map(|s| s.led_count())
            .ok_or_else(|| MatchError::SpurOutOfRange {
                line: line.clone(),
                spur,
            })
    }

    fn line(&self, name: &LineName) -> Result<&Line, MatchError> {
        self.index
            .line(name)
            .ok_or_else(|| MatchError::UnknownLine(name.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::Precision;
    use crate::geometry::{GeoIndexBuilder, WaypointRecord};

    fn upnw() -> LineName {
        LineName::parse("UP-NW").unwrap()
    }

    fn waypoint(index: usize, lat: f64, count: u32) -> WaypointRecord {
        WaypointRecord {
            index,
            lon: Some(-88.0),
            lat: Some(lat),
            led_count: (index > 0).then_some(count),
            dlon_offset: Some(0.0),
            dlat_offset: Some(0.01),
            dlon_led: Some(0.0),
            dlat_led: Some(0.01),
            ..Default::default()
        }
    }

    /// One spur whose segments hold the given LED counts.
    fn resolver(counts: &[u32]) -> SpurPositionResolver {
        let mut spur = vec![waypoint(0, 40.0, 0)];
        for (i, &count) in counts.iter().enumerate() {
            spur.push(waypoint(i + 1, 40.0 + (i + 1) as f64 * 0.1, count));
        }
        let line = GeoIndexBuilder::new(Precision::DEFAULT)
            .build_line(upnw(), &[spur])
            .unwrap();
        let index = GeoIndex::new(Precision::DEFAULT, vec![line]).unwrap();
        SpurPositionResolver::new(Arc::new(index))
    }

    #[test]
    fn two_waypoints_three_leds_ends_at_three() {
        let r = resolver(&[3]);
        assert_eq!(r.absolute_position(&upnw(), LedSlot::new(0, 0, 2)), Ok(3));
        assert_eq!(r.absolute_position(&upnw(), LedSlot::new(0, 0, 0)), Ok(1));
        assert_eq!(r.spur_length(&upnw(), 0), Ok(3));
    }

    #[test]
    fn counts_earlier_segments() {
        let r = resolver(&[4, 0, 2, 5]);
        assert_eq!(r.absolute_position(&upnw(), LedSlot::new(0, 2, 0)), Ok(5));
        assert_eq!(r.absolute_position(&upnw(), LedSlot::new(0, 3, 4)), Ok(11));
        assert_eq!(r.spur_length(&upnw(), 0), Ok(11));
    }

    #[test]
    fn out_of_range_slots_are_errors() {
        let r = resolver(&[3, 2]);
        assert!(matches!(
            r.absolute_position(&upnw(), LedSlot::new(1, 0, 0)),
            Err(MatchError::SpurOutOfRange { spur: 1, .. })
        ));
        assert!(matches!(
            r.absolute_position(&upnw(), LedSlot::new(0, 2, 0)),
            Err(MatchError::SegmentOutOfRange { segment: 2, .. })
        ));
        assert!(matches!(
            r.absolute_position(&upnw(), LedSlot::new(0, 1, 2)),
            Err(MatchError::LedOutOfRange { .. })
        ));
        assert!(matches!(
            r.spur_length(&upnw(), 3),
            Err(MatchError::SpurOutOfRange { spur: 3, .. })
        ));
    }

    #[test]
    fn unknown_line_is_an_error() {
        let r = resolver(&[3]);
        let bnsf = LineName::parse("BNSF").unwrap();
        assert_eq!(
            r.absolute_position(&bnsf, LedSlot::new(0, 0, 0)),
            Err(MatchError::UnknownLine(bnsf))
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Positions run 1..=n with no gaps or repeats in traversal order.
            #[test]
            fn strictly_increasing_along_spur(counts in prop::collection::vec(0u32..6, 1..8)
                .prop_filter("spur needs an LED", |c| c.iter().any(|&n| n > 0)))
            {
                let r = resolver(&counts);
                let index = r.index.clone();
                let line = index.line(&upnw()).unwrap();

                let positions: Vec<usize> = line
                    .leds()
                    .map(|(slot, _)| r.absolute_position(&upnw(), slot).unwrap())
                    .collect();

                let expected: Vec<usize> = (1..=positions.len()).collect();
                prop_assert_eq!(&positions, &expected);

                let total: u32 = counts.iter().sum();
                prop_assert_eq!(r.spur_length(&upnw(), 0).unwrap(), total as usize);
            }

            /// Same inputs, same answer.
            #[test]
            fn pure(counts in prop::collection::vec(1u32..6, 1..6), pick in any::<prop::sample::Index>()) {
                let r = resolver(&counts);
                let index = r.index.clone();
                let line = index.line(&upnw()).unwrap();
                let slots: Vec<LedSlot> = line.leds().map(|(slot, _)| slot).collect();
                let slot = slots[pick.index(slots.len())];

                prop_assert_eq!(
                    r.absolute_position(&upnw(), slot),
                    r.absolute_position(&upnw(), slot)
                );
            }
        }
    }
}
