//! Per-line render configuration.
//!
//! The geometry files say where LEDs are; these tables say how a line is
//! drawn: which stations are marked, how far branch rows are indented in
//! the text view, and how spur positions fold onto the physical strand.

use serde::Serialize;

use crate::domain::{InvalidLineName, LineName};

/// Where a landmark sits on its spur.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LandmarkLocation {
    /// A fixed strand position, e.g. the downtown terminal at 0.
    Position(usize),
    /// A station coordinate, matched against the line at startup.
    Coordinate { lat: f64, lon: f64 },
}

/// A named station marked on the display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandmarkSpec {
    pub name: String,
    pub symbol: char,
    pub spur: usize,
    pub location: LandmarkLocation,
    /// Whether the landmark is lit on the physical strand.
    pub lit: bool,
}

impl LandmarkSpec {
    pub fn at_position(name: impl Into<String>, symbol: char, spur: usize, position: usize) -> Self {
        Self {
            name: name.into(),
            symbol,
            spur,
            location: LandmarkLocation::Position(position),
            lit: false,
        }
    }

    pub fn at_coordinate(
        name: impl Into<String>,
        symbol: char,
        spur: usize,
        lat: f64,
        lon: f64,
    ) -> Self {
        Self {
            name: name.into(),
            symbol,
            spur,
            location: LandmarkLocation::Coordinate { lat, lon },
            lit: false,
        }
    }

    /// Also light this landmark on the strand.
    pub fn lit(mut self) -> Self {
        self.lit = true;
        self
    }
}

/// How a line's spurs map onto one continuous LED strand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrandLayout {
    /// Added to a spur position before compression, indexed by spur.
    spur_offsets: Vec<usize>,
    /// Spur positions per physical LED.
    compression: usize,
}

impl StrandLayout {
    /// A compression of 0 is treated as 1.
    pub fn new(spur_offsets: Vec<usize>, compression: usize) -> Self {
        Self {
            spur_offsets,
            compression: compression.max(1),
        }
    }

    pub fn compression(&self) -> usize {
        self.compression
    }

    /// Physical LED index for `position` on `spur`, or `None` when the
    /// spur is not wired onto the strand.
    pub fn physical_index(&self, spur: usize, position: usize) -> Option<usize> {
        let offset = self.spur_offsets.get(spur)?;
        Some((position + offset) / self.compression)
    }
}

/// Everything needed to draw one line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineLayout {
    line: LineName,
    landmarks: Vec<LandmarkSpec>,
    spur_indents: Vec<usize>,
    strand: Option<StrandLayout>,
}

impl LineLayout {
    pub fn new(line: LineName) -> Self {
        Self {
            line,
            landmarks: Vec::new(),
            spur_indents: Vec::new(),
            strand: None,
        }
    }

    pub fn with_landmark(mut self, landmark: LandmarkSpec) -> Self {
        self.landmarks.push(landmark);
        self
    }

    /// Indent a spur's text row by `indent` columns.
    pub fn with_spur_indent(mut self, spur: usize, indent: usize) -> Self {
        if self.spur_indents.len() <= spur {
            self.spur_indents.resize(spur + 1, 0);
        }
        self.spur_indents[spur] = indent;
        self
    }

    pub fn with_strand(mut self, strand: StrandLayout) -> Self {
        self.strand = Some(strand);
        self
    }

    pub fn line(&self) -> &LineName {
        &self.line
    }

    pub fn landmarks(&self) -> &[LandmarkSpec] {
        &self.landmarks
    }

    pub fn spur_indent(&self, spur: usize) -> usize {
        self.spur_indents.get(spur).copied().unwrap_or(0)
    }

    pub fn strand(&self) -> Option<&StrandLayout> {
        self.strand.as_ref()
    }
}

/// Offset that moves the McHenry branch past the end of the main line on
/// the single UP-NW strand.
const UPNW_BRANCH_STRAND_OFFSET: usize = 220;

/// Column where the McHenry branch leaves the main line in the text view.
const UPNW_JUNCTION_COLUMN: usize = 37;

/// Layouts for the Metra lines with a physical display.
pub fn metra_layouts() -> Result<Vec<LineLayout>, InvalidLineName> {
    let upnw = LineLayout::new(LineName::parse("UP-NW")?)
        .with_landmark(LandmarkSpec::at_position("Ogilvie", 'O', 0, 0).lit())
        .with_landmark(LandmarkSpec::at_coordinate("Palatine", 'P', 0, 42.113, -88.049).lit())
        .with_landmark(LandmarkSpec::at_coordinate("Harvard", 'H', 0, 42.4196, -88.6136))
        .with_landmark(LandmarkSpec::at_coordinate("McHenry", 'M', 1, 42.3337, -88.2672))
        .with_spur_indent(1, UPNW_JUNCTION_COLUMN)
        .with_strand(StrandLayout::new(vec![0, UPNW_BRANCH_STRAND_OFFSET], 2));

    Ok(vec![upnw])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strand_compresses_and_offsets() {
        let strand = StrandLayout::new(vec![0, 220], 2);
        assert_eq!(strand.physical_index(0, 0), Some(0));
        assert_eq!(strand.physical_index(0, 78), Some(39));
        assert_eq!(strand.physical_index(0, 79), Some(39));
        assert_eq!(strand.physical_index(1, 5), Some(112));
        assert_eq!(strand.physical_index(2, 5), None);
    }

    #[test]
    fn zero_compression_is_one() {
        let strand = StrandLayout::new(vec![0], 0);
        assert_eq!(strand.compression(), 1);
        assert_eq!(strand.physical_index(0, 7), Some(7));
    }

    #[test]
    fn spur_indents_default_to_zero() {
        let layout = LineLayout::new(LineName::parse("UP-NW").unwrap()).with_spur_indent(2, 9);
        assert_eq!(layout.spur_indent(0), 0);
        assert_eq!(layout.spur_indent(1), 0);
        assert_eq!(layout.spur_indent(2), 9);
        assert_eq!(layout.spur_indent(3), 0);
    }

    #[test]
    fn upnw_layout() {
        let layouts = metra_layouts().unwrap();
        assert_eq!(layouts.len(), 1);

        let upnw = &layouts[0];
        assert_eq!(upnw.line().as_str(), "UP-NW");
        assert_eq!(upnw.spur_indent(1), 37);

        let symbols: String = upnw.landmarks().iter().map(|l| l.symbol).collect();
        assert_eq!(symbols, "OPHM");

        let lit: Vec<&str> = upnw
            .landmarks()
            .iter()
            .filter(|l| l.lit)
            .map(|l| l.name.as_str())
            .collect();
        assert_eq!(lit, vec!["Ogilvie", "Palatine"]);

        assert_eq!(upnw.strand().unwrap().physical_index(1, 0), Some(110));
    }
}
