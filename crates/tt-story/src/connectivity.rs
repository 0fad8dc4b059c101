use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::Story;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTarget {
    pub from_scene: String,
    pub target: String,
}

/// Result of walking every choice edge from the entry scene.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectivityReport {
    /// Reachable scene ids in breadth-first order.
    pub reachable: Vec<String>,
    pub endings: Vec<String>,
    pub missing_targets: Vec<MissingTarget>,
    pub choiceless: Vec<String>,
    pub unreachable: Vec<String>,
}

impl ConnectivityReport {
    pub fn is_sound(&self) -> bool {
        self.missing_targets.is_empty() && self.choiceless.is_empty()
    }
}

/// Breadth-first walk over all `next_scene` edges, ignoring conditions.
pub fn check_connectivity(story: &Story) -> ConnectivityReport {
    let mut report = ConnectivityReport::default();
    let mut seen = HashSet::new();
    let mut queue = VecDeque::new();
    queue.push_back(story.entry_scene().to_string());
    seen.insert(story.entry_scene().to_string());

    while let Some(scene_id) = queue.pop_front() {
        let Some(scene) = story.get_scene(&scene_id) else {
            continue;
        };
        report.reachable.push(scene_id.clone());

        if scene.is_ending {
            report.endings.push(scene_id);
            continue;
        }
        if scene.choices.is_empty() {
            report.choiceless.push(scene_id.clone());
        }

        for choice in &scene.choices {
            if story.get_scene(&choice.next_scene).is_none() {
                report.missing_targets.push(MissingTarget {
                    from_scene: scene_id.clone(),
                    target: choice.next_scene.clone(),
                });
                continue;
            }
            if seen.insert(choice.next_scene.clone()) {
                queue.push_back(choice.next_scene.clone());
            }
        }
    }

    let reachable: BTreeSet<&str> = report.reachable.iter().map(String::as_str).collect();
    report.unreachable = story
        .scenes()
        .filter(|scene| !reachable.contains(scene.id.as_str()))
        .map(|scene| scene.id.clone())
        .collect();
    report
}
