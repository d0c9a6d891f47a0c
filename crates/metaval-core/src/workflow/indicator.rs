//! # Stage Indicator
//!
//! Derives the progress markers shown above a workflow. Pure; holds no state.

use super::controller::{WorkflowController, WorkflowPhase};
use serde::{Deserialize, Serialize};

/// Display state of a single marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerState {
    Completed,
    Current,
    Upcoming,
}

impl MarkerState {
    /// Single-character glyph for text rendering.
    #[must_use]
    pub fn glyph(&self) -> char {
        match self {
            MarkerState::Completed => '✓',
            MarkerState::Current => '●',
            MarkerState::Upcoming => '○',
        }
    }
}

/// One marker in the indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageMarker {
    pub index: usize,
    pub label: String,
    pub state: MarkerState,
    /// Whether the connector to the next marker is filled. Always false on the
    /// last marker.
    pub connector_filled: bool,
}

/// Builds marker lists from a position and a set of labels.
pub struct StageIndicator;

impl StageIndicator {
    /// Markers for `total_stages` stages with `current_index` active.
    ///
    /// Labels beyond `total_stages` are ignored; missing labels fall back to
    /// "Stage N". A `current_index` past the end marks every stage completed.
    #[must_use]
    pub fn markers(current_index: usize, total_stages: usize, labels: &[&str]) -> Vec<StageMarker> {
        (1..=total_stages)
            .map(|index| {
                let state = if index < current_index {
                    MarkerState::Completed
                } else if index == current_index {
                    MarkerState::Current
                } else {
                    MarkerState::Upcoming
                };
                let label = labels
                    .get(index.saturating_sub(1))
                    .map(|l| (*l).to_string())
                    .unwrap_or_else(|| format!("Stage {}", index));

                StageMarker {
                    index,
                    label,
                    state,
                    connector_filled: index < total_stages && index < current_index,
                }
            })
            .collect()
    }

    /// Markers for a controller's current phase.
    #[must_use]
    pub fn for_controller(controller: &WorkflowController) -> Vec<StageMarker> {
        let total = controller.total_stages();
        let current = match controller.phase() {
            WorkflowPhase::Stage(i) => i,
            WorkflowPhase::Completed => total.saturating_add(1),
        };
        Self::markers(current, total, &controller.sequence().labels())
    }

    /// One-line text rendering, e.g. `✓ Request ─ ● Generate ─ ○ Negotiate`.
    #[must_use]
    pub fn render_line(markers: &[StageMarker]) -> String {
        markers
            .iter()
            .map(|m| format!("{} {}", m.state.glyph(), m.label))
            .collect::<Vec<_>>()
            .join(" ─ ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_split_around_current() {
        let markers = StageIndicator::markers(3, 5, &["A", "B", "C", "D", "E"]);
        let states: Vec<_> = markers.iter().map(|m| m.state).collect();
        assert_eq!(
            states,
            vec![
                MarkerState::Completed,
                MarkerState::Completed,
                MarkerState::Current,
                MarkerState::Upcoming,
                MarkerState::Upcoming,
            ]
        );
    }

    #[test]
    fn connectors_fill_behind_current() {
        let markers = StageIndicator::markers(3, 4, &[]);
        let filled: Vec<_> = markers.iter().map(|m| m.connector_filled).collect();
        assert_eq!(filled, vec![true, true, false, false]);
        assert_eq!(markers[0].label, "Stage 1");
    }

    #[test]
    fn render_line_uses_glyphs() {
        let markers = StageIndicator::markers(2, 3, &["Request", "Generate", "Negotiate"]);
        assert_eq!(
            StageIndicator::render_line(&markers),
            "✓ Request ─ ● Generate ─ ○ Negotiate"
        );
    }
}
