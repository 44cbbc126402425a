//! Console strip view.
//!
//! Each spur is one row drawn from its far end down to position 0, the
//! way the strand runs across the physical map. Branch rows come first,
//! indented to sit above their junction.

use std::sync::Arc;

use super::landmarks::LandmarkTable;
use super::layout::LineLayout;
use super::state::{LineRenderState, RenderFrame};

const TRAIN: char = '%';
const TRACK: char = '=';
const BLANK: char = ' ';

#[derive(Debug, Clone)]
pub struct TextStripRenderer {
    layouts: Arc<Vec<LineLayout>>,
    landmarks: Arc<LandmarkTable>,
}

impl TextStripRenderer {
    pub fn new(layouts: Arc<Vec<LineLayout>>, landmarks: Arc<LandmarkTable>) -> Self {
        Self { layouts, landmarks }
    }

    /// Rows to print for one cycle, top to bottom.
    pub fn render(&self, frame: &RenderFrame) -> Vec<String> {
        match frame {
            RenderFrame::Trains(lines) => lines.iter().flat_map(|l| self.render_line(l)).collect(),
            RenderFrame::FeedUnavailable { reason } => {
                vec![format!("!!! positions feed unavailable: {reason} !!!")]
            }
        }
    }

    pub fn render_line(&self, state: &LineRenderState) -> Vec<String> {
        let layout = self.layouts.iter().find(|l| l.line() == state.line());
        let occupied = state.by_spur();

        (0..state.spur_count())
            .rev()
            .map(|spur| {
                let indent = layout.map_or(0, |l| l.spur_indent(spur));
                let length = state.spur_length(spur).unwrap_or(0);

                let mut row = String::with_capacity(indent + length + 1);
                row.extend(std::iter::repeat_n(BLANK, indent));
                for position in (0..=length).rev() {
                    let symbol = if occupied[spur].contains(&position) {
                        TRAIN
                    } else if let Some(symbol) =
                        self.landmarks.symbol_at(state.line(), spur, position)
                    {
                        symbol
                    } else if position == 0 {
                        BLANK
                    } else {
                        TRACK
                    };
                    row.push(symbol);
                }
                row
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LineName;
    use crate::matching::MatchResult;
    use crate::render::landmarks::Landmark;

    fn upnw() -> LineName {
        LineName::parse("UP-NW").unwrap()
    }

    fn landmark(name: &str, symbol: char, spur: usize, position: usize) -> Landmark {
        Landmark {
            line: upnw(),
            name: name.to_string(),
            symbol,
            spur,
            position,
            lit: false,
        }
    }

    fn renderer() -> TextStripRenderer {
        let layouts = vec![LineLayout::new(upnw()).with_spur_indent(1, 3)];
        let landmarks = LandmarkTable::from_landmarks(vec![
            landmark("Ogilvie", 'O', 0, 0),
            landmark("Palatine", 'P', 0, 4),
            landmark("Harvard", 'H', 0, 8),
            landmark("McHenry", 'M', 1, 3),
        ]);
        TextStripRenderer::new(Arc::new(layouts), Arc::new(landmarks))
    }

    fn at(spur: usize, position: usize) -> Option<MatchResult> {
        Some(MatchResult {
            spur,
            segment: 0,
            led: position - 1,
            position,
        })
    }

    #[test]
    fn empty_line_shows_landmarks() {
        let state = LineRenderState::new(upnw(), vec![8, 3]);
        let rows = renderer().render_line(&state);
        assert_eq!(rows, vec!["   M== ", "H===P===O"]);
    }

    #[test]
    fn trains_take_precedence_over_landmarks() {
        let mut state = LineRenderState::new(upnw(), vec![8, 3]);
        state.push("2230", "1", at(0, 4));
        state.push("2232", "2", at(0, 1));
        state.push("640", "3", at(1, 2));
        state.push("lost", "4", None);

        let rows = renderer().render(&RenderFrame::Trains(vec![state]));
        assert_eq!(rows, vec!["   M%= ", "H===%==%O"]);
    }

    #[test]
    fn line_without_layout_is_unindented() {
        let mut state = LineRenderState::new(LineName::parse("MD-W").unwrap(), vec![3]);
        state.push("2200", "1", at(0, 3));
        assert_eq!(renderer().render_line(&state), vec!["%== "]);
    }

    #[test]
    fn feed_unavailable_banner() {
        let rows = renderer().render(&RenderFrame::FeedUnavailable {
            reason: "HTTP 503".to_string(),
        });
        assert_eq!(rows.len(), 1);
        assert!(rows[0].contains("unavailable"));
        assert!(rows[0].contains("HTTP 503"));
    }
}
