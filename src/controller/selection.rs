//! Ordered working set of selected document identifiers.

/// Insertion-ordered set of document ids that summary and chat requests act on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: Vec<String>,
}

impl SelectionSet {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove `id` when present, otherwise append it. Returns whether `id` is selected afterwards.
    ///
    /// Applying the same toggle twice restores the previous set, including member order.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.remove(id) {
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    /// Drop every selected id.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Whether `id` is currently selected.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|selected| selected == id)
    }

    /// Remove `id` if present, keeping the order of the remaining members.
    pub fn remove(&mut self, id: &str) -> bool {
        match self.ids.iter().position(|selected| selected == id) {
            Some(index) => {
                self.ids.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of selected ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in insertion order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }
}

impl<S: AsRef<str>> FromIterator<S> for SelectionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut selection = Self::new();
        for id in iter {
            if !selection.contains(id.as_ref()) {
                selection.ids.push(id.as_ref().to_string());
            }
        }
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_appends_then_removes() {
        let mut selection = SelectionSet::new();
        assert!(selection.toggle("doc1"));
        assert!(selection.toggle("doc2"));
        assert_eq!(selection.ids(), ["doc1", "doc2"]);

        assert!(!selection.toggle("doc1"));
        assert_eq!(selection.ids(), ["doc2"]);
        assert!(!selection.contains("doc1"));
    }

    #[test]
    fn double_toggle_restores_any_starting_set() {
        let starts: [&[&str]; 4] = [&[], &["a"], &["a", "b", "c"], &["c", "a", "b", "d"]];
        for start in starts {
            for id in ["a", "b", "c", "z"] {
                let original: SelectionSet = start.iter().collect();
                let mut selection = original.clone();
                selection.toggle(id);
                selection.toggle(id);

                if original.contains(id) {
                    // Re-added members go to the back; everyone else keeps their order.
                    let others = |set: &SelectionSet| -> Vec<String> {
                        set.ids().iter().filter(|v| *v != id).cloned().collect()
                    };
                    assert_eq!(others(&selection), others(&original));
                    assert_eq!(selection.ids().last().map(String::as_str), Some(id));
                    assert_eq!(selection.len(), original.len());
                } else {
                    assert_eq!(
                        selection.ids(),
                        original.ids(),
                        "toggling {id} twice from {start:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn from_iter_drops_duplicates() {
        let selection: SelectionSet = ["a", "b", "a"].into_iter().collect();
        assert_eq!(selection.ids(), ["a", "b"]);
    }

    #[test]
    fn clear_empties_the_set() {
        let mut selection: SelectionSet = ["a", "b"].into_iter().collect();
        selection.clear();
        assert!(selection.is_empty());
        assert_eq!(selection.len(), 0);
    }
}
