use crate::error::ConfigError;
use indexmap::IndexSet;
use std::fmt;
use std::sync::Arc;

/// Index of a gesture inside the session's [`Vocabulary`].
///
/// Ids are only meaningful for the vocabulary that produced them; the
/// classifier's probability vector is laid out in the same order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GestureId(usize);

impl GestureId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The closed set of gesture identities for one session. Resolved once at
/// session start and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    names: Arc<IndexSet<String>>,
}

impl Vocabulary {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: Arc::new(names.into_iter().map(Into::into).collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolve a gesture name, failing for anything outside the vocabulary
    pub fn resolve(&self, name: &str) -> Result<GestureId, ConfigError> {
        self.names
            .get_index_of(name)
            .map(GestureId)
            .ok_or_else(|| ConfigError::UnknownTarget(name.to_string()))
    }

    /// Id for a classifier output index, if it falls inside the vocabulary
    pub fn id_at(&self, index: usize) -> Option<GestureId> {
        (index < self.names.len()).then_some(GestureId(index))
    }

    pub fn name(&self, id: GestureId) -> &str {
        self.names
            .get_index(id.0)
            .map(String::as_str)
            .unwrap_or("?")
    }

    pub fn ids(&self) -> impl Iterator<Item = GestureId> + '_ {
        (0..self.names.len()).map(GestureId)
    }
}

impl fmt::Display for GestureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_names_in_declaration_order() {
        let vocabulary = Vocabulary::new(["Hammer", "Lehrer", "Schule"]);
        assert_eq!(vocabulary.resolve("Lehrer").unwrap().index(), 1);
        let schule = vocabulary.resolve("Schule").unwrap();
        assert_eq!(vocabulary.name(schule), "Schule");
    }

    #[test]
    fn unknown_name_is_a_config_error() {
        let vocabulary = Vocabulary::new(["Hammer"]);
        assert_eq!(
            vocabulary.resolve("Zange"),
            Err(ConfigError::UnknownTarget("Zange".to_string()))
        );
    }

    #[test]
    fn id_at_is_bounded() {
        let vocabulary = Vocabulary::new(["Hammer", "Lehrer"]);
        assert!(vocabulary.id_at(1).is_some());
        assert!(vocabulary.id_at(2).is_none());
    }
}
