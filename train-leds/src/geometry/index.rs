//! The immutable LED index.

use crate::domain::{Line, LineName};
use crate::geo::Precision;

use super::error::GeometryError;

/// Every tracked line's LED geometry, hashed at one precision.
///
/// Built once at startup and shared read-only (behind an `Arc`) by the
/// matcher, the resolver and the renderers. Nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct GeoIndex {
    precision: Precision,
    lines: Vec<Line>,
}

impl GeoIndex {
    /// Freeze a set of built lines.
    ///
    /// Rejects duplicate line names, lines without LEDs, and LEDs hashed at
    /// a different precision than the index. A line that can never match
    /// anything is a configuration error, not something to discover one
    /// observation at a time.
    pub fn new(precision: Precision, lines: Vec<Line>) -> Result<Self, GeometryError> {
        for (i, line) in lines.iter().enumerate() {
            if lines[..i].iter().any(|other| other.name() == line.name()) {
                return Err(GeometryError::DuplicateLine(line.name().clone()));
            }

            if line.spurs().is_empty() {
                return Err(GeometryError::EmptyLine(line.name().clone()));
            }

            for (spur, s) in line.spurs().iter().enumerate() {
                if s.led_count() == 0 {
                    return Err(GeometryError::EmptySpur {
                        line: line.name().clone(),
                        spur,
                    });
                }
            }

            if let Some((_, led)) = line
                .leds()
                .find(|(_, led)| led.geohash().precision() != precision)
            {
                return Err(GeometryError::PrecisionMismatch {
                    line: line.name().clone(),
                    expected: precision.chars(),
                    found: led.geohash().precision().chars(),
                });
            }
        }

        Ok(Self { precision, lines })
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    pub fn line(&self, name: &LineName) -> Option<&Line> {
        self.lines.iter().find(|l| l.name() == name)
    }

    /// Lines in load order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line_names(&self) -> impl Iterator<Item = &LineName> {
        self.lines.iter().map(Line::name)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LedPoint, Segment, Spur};
    use crate::geo::Coordinate;

    fn line(name: &str, precision: Precision) -> Line {
        let led = LedPoint::new(Coordinate::new(42.0, -88.0).unwrap(), precision).unwrap();
        Line::new(
            LineName::parse(name).unwrap(),
            vec![Spur::new(vec![Segment::new(0, None, vec![led])])],
        )
    }

    #[test]
    fn lookup_by_name() {
        let index = GeoIndex::new(
            Precision::DEFAULT,
            vec![line("UP-NW", Precision::DEFAULT), line("MD-W", Precision::DEFAULT)],
        )
        .unwrap();

        assert_eq!(index.len(), 2);
        assert!(!index.is_empty());
        assert!(index.line(&LineName::parse("MD-W").unwrap()).is_some());
        assert!(index.line(&LineName::parse("BNSF").unwrap()).is_none());

        let names: Vec<&str> = index.line_names().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["UP-NW", "MD-W"]);
    }

    #[test]
    fn rejects_duplicate_lines() {
        let result = GeoIndex::new(
            Precision::DEFAULT,
            vec![line("UP-NW", Precision::DEFAULT), line("UP-NW", Precision::DEFAULT)],
        );
        assert!(matches!(result, Err(GeometryError::DuplicateLine(_))));
    }

    #[test]
    fn rejects_precision_mismatch() {
        let result = GeoIndex::new(
            Precision::DEFAULT,
            vec![line("UP-NW", Precision::new(7).unwrap())],
        );
        assert!(matches!(
            result,
            Err(GeometryError::PrecisionMismatch {
                expected: 6,
                found: 7,
                ..
            })
        ));
    }

    #[test]
    fn rejects_lines_without_leds() {
        let empty_spur = Line::new(
            LineName::parse("UP-NW").unwrap(),
            vec![Spur::new(vec![Segment::new(0, None, Vec::new())])],
        );
        let result = GeoIndex::new(Precision::DEFAULT, vec![empty_spur]);
        assert!(matches!(result, Err(GeometryError::EmptySpur { spur: 0, .. })));

        let no_spurs = Line::new(LineName::parse("UP-NW").unwrap(), Vec::new());
        let result = GeoIndex::new(Precision::DEFAULT, vec![no_spurs]);
        assert!(matches!(result, Err(GeometryError::EmptyLine(_))));
    }
}
