/// Maps declaring type names to collection names.
///
/// Names without an explicit override are lower-cased (`User` -> `user`).
/// The standard table carries the one documented exception, `BlogPost` -> `blogs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionNaming {
    overrides: Vec<(String, String)>,
}

impl CollectionNaming {
    /// No overrides; every type name is simply lower-cased.
    pub fn empty() -> Self {
        Self {
            overrides: Vec::new(),
        }
    }

    pub fn standard() -> Self {
        Self::empty().with_override("BlogPost", "blogs")
    }

    /// Add or replace the override for `type_name`.
    pub fn with_override(mut self, type_name: impl Into<String>, collection: impl Into<String>) -> Self {
        let type_name = type_name.into();
        let collection = collection.into();
        match self.overrides.iter_mut().find(|(t, _)| *t == type_name) {
            Some(entry) => entry.1 = collection,
            None => self.overrides.push((type_name, collection)),
        }
        self
    }

    pub fn resolve(&self, type_name: &str) -> String {
        self.overrides
            .iter()
            .find(|(t, _)| t == type_name)
            .map(|(_, c)| c.clone())
            .unwrap_or_else(|| type_name.to_lowercase())
    }

    /// Overrides in insertion order.
    pub fn overrides(&self) -> impl Iterator<Item = (&str, &str)> {
        self.overrides.iter().map(|(t, c)| (t.as_str(), c.as_str()))
    }
}

impl Default for CollectionNaming {
    fn default() -> Self {
        Self::standard()
    }
}
