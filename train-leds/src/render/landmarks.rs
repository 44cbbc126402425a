//! Station LED positions derived at startup.

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::LineName;
use crate::geo::{Coordinate, DistanceMetric, InvalidCoordinate};
use crate::matching::{MatchError, TrainLocator};

use super::layout::{LandmarkLocation, LineLayout};

/// Errors deriving the landmark table.
#[derive(Debug, thiserror::Error)]
pub enum LandmarkError {
    #[error("landmark {name} on {line} has an invalid coordinate: {source}")]
    InvalidCoordinate {
        line: LineName,
        name: String,
        source: InvalidCoordinate,
    },

    #[error("landmark {name} on {line} is not near any LED")]
    NoMatch { line: LineName, name: String },

    #[error("landmark {name} on {line} resolved onto spur {found}, expected spur {expected}")]
    WrongSpur {
        line: LineName,
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("landmark {name} on {line} spur {spur}: position {position} is past the last LED ({length})")]
    PositionOutOfRange {
        line: LineName,
        name: String,
        spur: usize,
        position: usize,
        length: usize,
    },

    #[error(transparent)]
    Match(#[from] MatchError),
}

/// A landmark with its strand position resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Landmark {
    pub line: LineName,
    pub name: String,
    pub symbol: char,
    pub spur: usize,
    pub position: usize,
    pub lit: bool,
}

/// Resolved landmarks for every displayed line. Read-only once derived.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct LandmarkTable {
    landmarks: Vec<Landmark>,
}

impl LandmarkTable {
    /// Resolve every layout landmark against the loaded geometry.
    ///
    /// Layouts for lines that are not loaded are skipped. Everything else
    /// must resolve onto its configured spur or the whole table fails.
    pub fn derive<M: DistanceMetric>(
        layouts: &[LineLayout],
        locator: &TrainLocator<M>,
    ) -> Result<Self, LandmarkError> {
        let mut landmarks = Vec::new();

        for layout in layouts {
            let line = layout.line();
            if locator.index().line(line).is_none() {
                debug!(%line, "no geometry loaded, skipping landmarks");
                continue;
            }

            for spec in layout.landmarks() {
                let position = match spec.location {
                    LandmarkLocation::Position(position) => {
                        let length = locator.resolver().spur_length(line, spec.spur)?;
                        if position > length {
                            return Err(LandmarkError::PositionOutOfRange {
                                line: line.clone(),
                                name: spec.name.clone(),
                                spur: spec.spur,
                                position,
                                length,
                            });
                        }
                        position
                    }
                    LandmarkLocation::Coordinate { lat, lon } => {
                        let coordinate = Coordinate::new(lat, lon).map_err(|source| {
                            LandmarkError::InvalidCoordinate {
                                line: line.clone(),
                                name: spec.name.clone(),
                                source,
                            }
                        })?;

                        let result = locator.locate_coordinate(line, &coordinate)?.ok_or_else(
                            || LandmarkError::NoMatch {
                                line: line.clone(),
                                name: spec.name.clone(),
                            },
                        )?;

                        if result.spur != spec.spur {
                            return Err(LandmarkError::WrongSpur {
                                line: line.clone(),
                                name: spec.name.clone(),
                                expected: spec.spur,
                                found: result.spur,
                            });
                        }
                        result.position
                    }
                };

                info!(%line, landmark = %spec.name, spur = spec.spur, position, "landmark resolved");
                landmarks.push(Landmark {
                    line: line.clone(),
                    name: spec.name.clone(),
                    symbol: spec.symbol,
                    spur: spec.spur,
                    position,
                    lit: spec.lit,
                });
            }
        }

        Ok(Self { landmarks })
    }

    pub fn from_landmarks(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    pub fn all(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn for_line<'a>(&'a self, line: &'a LineName) -> impl Iterator<Item = &'a Landmark> + 'a {
        self.landmarks.iter().filter(move |l| &l.line == line)
    }

    /// Symbol drawn at `position` on `spur`, first configured wins.
    pub fn symbol_at(&self, line: &LineName, spur: usize, position: usize) -> Option<char> {
        self.for_line(line)
            .find(|l| l.spur == spur && l.position == position)
            .map(|l| l.symbol)
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }
}
