/// Ordered, duplicate-free preferences of a single user
///
/// Wraps the `Vec<String>` kept in the store so the uniqueness rule lives in
/// one place.
#[derive(Debug, PartialEq, Eq)]
pub struct PreferenceList<'a> {
    entries: &'a mut Vec<String>,
}

impl<'a> PreferenceList<'a> {
    pub fn new(entries: &'a mut Vec<String>) -> Self {
        Self { entries }
    }

    pub fn contains(&self, text: &str) -> bool {
        self.entries.iter().any(|p| p == text)
    }

    /// Appends `text` unless it is already present; returns whether it was added
    pub fn add(&mut self, text: &str) -> bool {
        if self.contains(text) {
            return false;
        }
        self.entries.push(text.to_string());
        true
    }

    /// Removes the first matching entry; returns whether one was found
    pub fn remove(&mut self, text: &str) -> bool {
        match self.entries.iter().position(|p| p == text) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Empties the list, returning how many entries were dropped
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }
}
