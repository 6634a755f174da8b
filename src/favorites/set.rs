use serde::{Deserialize, Serialize};

/// Ordered, duplicate-free list of favorite Pokémon names.
///
/// Values are never edited in place: `with` and `without` return a new set,
/// so holders of the previous value can detect a change by comparison.
/// Serialized as a bare JSON array of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct FavoriteSet(Vec<String>);

impl FavoriteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Copy with `name` appended. Unchanged copy if already present.
    pub fn with(&self, name: &str) -> Self {
        let mut names = self.0.clone();
        if !self.contains(name) {
            names.push(name.to_string());
        }
        Self(names)
    }

    /// Copy with the matching entry removed. Unchanged copy if absent.
    pub fn without(&self, name: &str) -> Self {
        let mut names = self.0.clone();
        if let Some(index) = names.iter().position(|n| n == name) {
            names.remove(index);
        }
        Self(names)
    }
}

impl From<Vec<String>> for FavoriteSet {
    /// Keeps the first occurrence of each name.
    fn from(names: Vec<String>) -> Self {
        names.into_iter().collect()
    }
}

impl From<FavoriteSet> for Vec<String> {
    fn from(set: FavoriteSet) -> Self {
        set.0
    }
}

impl<S: Into<String>> FromIterator<S> for FavoriteSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut names: Vec<String> = Vec::new();
        for name in iter {
            let name = name.into();
            if !names.contains(&name) {
                names.push(name);
            }
        }
        Self(names)
    }
}
