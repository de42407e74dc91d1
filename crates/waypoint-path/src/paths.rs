use std::fmt;

use waypoint_graph::{StateId, StateSet};

use crate::path::Path;

/// Candidate routes produced by one search.
///
/// Never holds an empty [`Path`]: [`add`](Self::add) drops them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paths {
    paths: Vec<Path>,
}

impl Paths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: Path) {
        if !path.is_empty() {
            self.paths.push(path);
        }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.paths.get(index)
    }

    pub fn first(&self) -> Option<&Path> {
        self.paths.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Path> {
        self.paths.iter()
    }

    pub fn as_slice(&self) -> &[Path] {
        &self.paths
    }

    /// Stable ascending sort by score.
    pub fn sort(&mut self) {
        self.paths.sort_by_key(Path::score);
    }

    /// Highest score among the contained paths, or 0 when there are none.
    pub fn best_score(&self) -> i64 {
        self.paths.iter().map(Path::score).max().unwrap_or(0)
    }

    /// First path with the highest score.
    pub fn highest_scoring(&self) -> Option<&Path> {
        self.paths
            .iter()
            .reduce(|best, path| if path.score() > best.score() { path } else { best })
    }

    /// First path with the lowest score.
    pub fn lowest_scoring(&self) -> Option<&Path> {
        self.paths
            .iter()
            .reduce(|best, path| if path.score() < best.score() { path } else { best })
    }

    /// First path with the fewest states.
    pub fn shortest(&self) -> Option<&Path> {
        self.paths
            .iter()
            .reduce(|best, path| if path.len() < best.len() { path } else { best })
    }

    /// Clean every path against the current active states and the state
    /// where the last traversal failed. Paths that clean to nothing are
    /// dropped; `self` is left untouched.
    pub fn clean(&self, active: &StateSet, failed: Option<StateId>) -> Paths {
        self.paths
            .iter()
            .map(|path| path.clean(active, failed))
            .collect()
    }

    pub fn into_vec(self) -> Vec<Path> {
        self.paths
    }
}

impl FromIterator<Path> for Paths {
    fn from_iter<I: IntoIterator<Item = Path>>(iter: I) -> Self {
        let mut paths = Paths::new();
        for path in iter {
            paths.add(path);
        }
        paths
    }
}

impl Extend<Path> for Paths {
    fn extend<I: IntoIterator<Item = Path>>(&mut self, iter: I) {
        for path in iter {
            self.add(path);
        }
    }
}

impl IntoIterator for Paths {
    type Item = Path;
    type IntoIter = std::vec::IntoIter<Path>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.into_iter()
    }
}

impl<'a> IntoIterator for &'a Paths {
    type Item = &'a Path;
    type IntoIter = std::slice::Iter<'a, Path>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

impl fmt::Display for Paths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for path in &self.paths {
            writeln!(f, "{path} (score {})", path.score())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::path_of;
    use waypoint_graph::state_set;

    fn scored(ids: &[i64], score: i64) -> Path {
        let mut path = path_of(ids.iter().copied());
        path.set_score(score);
        path
    }

    #[test]
    fn add_drops_empty_paths() {
        let mut paths = Paths::new();
        paths.add(Path::new());
        assert!(paths.is_empty());
        paths.add(path_of([1i64]));
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn sort_is_ascending_and_stable() {
        let mut paths: Paths = vec![
            scored(&[1, 9], 5),
            scored(&[2, 9], 1),
            scored(&[3, 9], 5),
            scored(&[4, 9], -2),
        ]
        .into_iter()
        .collect();
        paths.sort();

        let firsts: Vec<_> = paths.iter().filter_map(Path::first).collect();
        assert_eq!(
            firsts,
            vec![StateId(4), StateId(2), StateId(1), StateId(3)]
        );
    }

    #[test]
    fn best_score_is_max_or_zero() {
        assert_eq!(Paths::new().best_score(), 0);

        let paths: Paths = vec![scored(&[1], -4), scored(&[2], -1)].into_iter().collect();
        assert_eq!(paths.best_score(), -1);
    }

    #[test]
    fn selection_helpers() {
        let paths: Paths = vec![
            scored(&[1, 2, 3], 4),
            scored(&[5, 3], 9),
            scored(&[6, 3], 2),
        ]
        .into_iter()
        .collect();

        assert_eq!(paths.highest_scoring().unwrap().score(), 9);
        assert_eq!(paths.lowest_scoring().unwrap().score(), 2);
        assert_eq!(paths.shortest().unwrap(), &path_of([5i64, 3]));
        assert!(Paths::new().shortest().is_none());
    }

    #[test]
    fn clean_returns_new_collection() {
        let paths: Paths = vec![
            path_of([1i64, 2, 3]),
            path_of([4i64, 5, 3]),
            path_of([6i64, 7, 3]),
        ]
        .into_iter()
        .collect();

        let cleaned = paths.clean(&state_set([2i64, 7]), Some(StateId(5)));
        assert_eq!(paths.len(), 3);
        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned.get(0).unwrap(), &path_of([2i64, 3]));
        assert_eq!(cleaned.get(1).unwrap(), &path_of([7i64, 3]));
    }

    #[test]
    fn equality_is_pairwise_and_ordered() {
        let a: Paths = vec![path_of([1i64, 2]), path_of([3i64, 2])].into_iter().collect();
        let b: Paths = vec![path_of([1i64, 2]), path_of([3i64, 2])].into_iter().collect();
        let reordered: Paths = vec![path_of([3i64, 2]), path_of([1i64, 2])].into_iter().collect();

        assert_eq!(a, b);
        assert_ne!(a, reordered);
        assert_ne!(a, Paths::new());
    }

    #[test]
    fn display_lists_one_path_per_line() {
        let paths: Paths = vec![scored(&[1, 2], 3)].into_iter().collect();
        assert_eq!(paths.to_string(), "1 -> 2 (score 3)\n");
    }
}
