//! Cyclic pose tables for animated entities

/// Relative body-part offset `(dx, dy)`
pub type Offset = (i32, i32);

/// One part move of a pose transition: `(from, to)`
pub type PartMove = (Offset, Offset);

/// Immutable pose cycle shared by every entity of a kind.
///
/// Pose `i` transitions to pose `i + 1`, the last one back to the first.
/// Parts are matched by their index within the pose, and a transition only
/// lists the parts that actually move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateDefinition {
    states: Vec<Vec<Offset>>,
    transitions: Vec<Vec<PartMove>>,
    min_x: i32,
    max_x: i32,
    min_y: i32,
    max_y: i32,
}

impl StateDefinition {
    /// Build the transition table and extents for a cyclic pose list.
    ///
    /// # Panics
    /// When `states` is empty or the poses differ in part count.
    pub fn cyclic(states: &[&[Offset]]) -> Self {
        assert!(!states.is_empty(), "state definition needs at least one pose");
        let parts = states[0].len();
        assert!(
            states.iter().all(|s| s.len() == parts),
            "all poses must have the same number of parts"
        );

        let states: Vec<Vec<Offset>> = states.iter().map(|s| s.to_vec()).collect();
        let transitions = (0..states.len())
            .map(|i| {
                let next = &states[(i + 1) % states.len()];
                states[i]
                    .iter()
                    .zip(next)
                    .filter(|(from, to)| from != to)
                    .map(|(&from, &to)| (from, to))
                    .collect()
            })
            .collect();

        let all = states.iter().flatten();
        let min_x = all.clone().map(|p| p.0).min().unwrap_or(0);
        let max_x = all.clone().map(|p| p.0).max().unwrap_or(0);
        let min_y = all.clone().map(|p| p.1).min().unwrap_or(0);
        let max_y = all.map(|p| p.1).max().unwrap_or(0);

        Self {
            states,
            transitions,
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    pub fn states(&self) -> &[Vec<Offset>] {
        &self.states
    }

    pub fn states_count(&self) -> usize {
        self.states.len()
    }

    pub fn pose(&self, state: usize) -> Option<&[Offset]> {
        self.states.get(state).map(Vec::as_slice)
    }

    /// Part moves leading from `state` to the next pose
    pub fn transition(&self, state: usize) -> Option<&[PartMove]> {
        self.transitions.get(state).map(Vec::as_slice)
    }

    pub fn min_x(&self) -> i32 {
        self.min_x
    }

    pub fn max_x(&self) -> i32 {
        self.max_x
    }

    pub fn min_y(&self) -> i32 {
        self.min_y
    }

    pub fn max_y(&self) -> i32 {
        self.max_y
    }

    /// Bounding box size over all poses
    pub fn max_boundaries(&self) -> (i32, i32) {
        (self.max_x - self.min_x + 1, self.max_y - self.min_y + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions_only_list_moving_parts() {
        let definition = StateDefinition::cyclic(&[
            &[(0, 0), (1, -1), (-1, -1)],
            &[(0, 0), (1, 0), (-1, -1)],
        ]);
        assert_eq!(definition.transition(0).unwrap(), &[((1, -1), (1, 0))]);
        assert_eq!(definition.transition(1).unwrap(), &[((1, 0), (1, -1))]);
        assert!(definition.transition(2).is_none());
    }

    #[test]
    fn test_identical_poses_have_empty_transition() {
        let definition = StateDefinition::cyclic(&[&[(0, 0), (1, 0)]]);
        assert_eq!(definition.states_count(), 1);
        assert!(definition.transition(0).unwrap().is_empty());
    }

    #[test]
    fn test_extents_cover_all_poses() {
        let definition = StateDefinition::cyclic(&[
            &[(0, 0), (3, -1), (-3, -1)],
            &[(0, 0), (3, 1), (-3, -2)],
        ]);
        assert_eq!((definition.min_x(), definition.max_x()), (-3, 3));
        assert_eq!((definition.min_y(), definition.max_y()), (-2, 1));
        assert_eq!(definition.max_boundaries(), (7, 4));
    }

    #[test]
    #[should_panic(expected = "same number of parts")]
    fn test_mismatched_poses_panic() {
        StateDefinition::cyclic(&[&[(0, 0)], &[(0, 0), (1, 0)]]);
    }
}
