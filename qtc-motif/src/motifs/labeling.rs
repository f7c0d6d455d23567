//! Motif Labelling
//!
//! Replaces the generic "Gesture Pattern n" labels with descriptive names
//! drawn from a per-pair template list. Motifs from all pairs are ordered on
//! the session timeline first, so each pair's templates are handed out in the
//! order its gestures occur.

use super::motif_detector::Motif;
use std::collections::HashMap;

/// Label used for pairs without templates
pub const FALLBACK_LABEL: &str = "Movement Pattern";

/// Assigns template labels to motifs
#[derive(Debug, Clone, Default)]
pub struct MotifLabeler {
    /// pair_id to label templates, used cyclically
    templates: HashMap<String, Vec<String>>,
}

impl MotifLabeler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style template registration. An empty list means the fallback label.
    pub fn with_templates<I, S>(mut self, pair_id: impl Into<String>, templates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_templates(pair_id, templates);
        self
    }

    pub fn set_templates<I, S>(&mut self, pair_id: impl Into<String>, templates: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let list: Vec<String> = templates.into_iter().map(Into::into).collect();
        self.templates.insert(pair_id.into(), list);
    }

    /// Label for the `nth` (0-based) motif of a pair
    pub fn label_for(&self, pair_id: &str, nth: usize) -> &str {
        match self.templates.get(pair_id) {
            Some(list) if !list.is_empty() => &list[nth % list.len()],
            _ => FALLBACK_LABEL,
        }
    }

    /// Sort motifs by start time and relabel them per pair.
    ///
    /// The sort is stable: motifs starting together keep their input order.
    pub fn label(&self, mut motifs: Vec<Motif>) -> Vec<Motif> {
        motifs.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));

        let mut counters: HashMap<String, usize> = HashMap::new();
        motifs
            .into_iter()
            .map(|motif| {
                let counter = counters.entry(motif.pair_id.clone()).or_insert(0);
                let label = self.label_for(&motif.pair_id, *counter).to_string();
                *counter += 1;
                motif.relabeled(label)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motifs::motif_detector::PatternKind;

    fn motif(pair_id: &str, n: usize, start: f64) -> Motif {
        Motif {
            id: format!("{}_motif_{}", pair_id, n),
            pair_id: pair_id.to_string(),
            start_time: start,
            end_time: start + 1.5,
            label: format!("Gesture Pattern {}", n),
            pattern_kind: PatternKind::ApproachDiverge,
        }
    }

    #[test]
    fn test_fallback_label() {
        let labeler = MotifLabeler::new();
        assert_eq!(labeler.label_for("anything", 0), FALLBACK_LABEL);

        let labeler = MotifLabeler::new().with_templates("p", Vec::<String>::new());
        assert_eq!(labeler.label_for("p", 3), FALLBACK_LABEL);
    }

    #[test]
    fn test_templates_cycle() {
        let labeler = MotifLabeler::new().with_templates("p", ["One", "Two"]);
        assert_eq!(labeler.label_for("p", 0), "One");
        assert_eq!(labeler.label_for("p", 1), "Two");
        assert_eq!(labeler.label_for("p", 2), "One");
    }

    #[test]
    fn test_label_sorts_globally_and_counts_per_pair() {
        let labeler = MotifLabeler::new()
            .with_templates("a", ["Reach", "Rise"])
            .with_templates("b", ["Wave"]);

        let motifs = vec![
            motif("a", 1, 5.0),
            motif("a", 2, 1.0),
            motif("b", 1, 3.0),
            motif("c", 1, 0.5),
        ];
        let labelled = labeler.label(motifs);

        let summary: Vec<(&str, &str)> = labelled
            .iter()
            .map(|m| (m.id.as_str(), m.label.as_str()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("c_motif_1", "Movement Pattern"),
                ("a_motif_2", "Reach"),
                ("b_motif_1", "Wave"),
                ("a_motif_1", "Rise"),
            ]
        );
    }

    #[test]
    fn test_label_empty() {
        assert!(MotifLabeler::new().label(vec![]).is_empty());
    }
}
