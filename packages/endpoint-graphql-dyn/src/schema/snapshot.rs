use super::converter::*;
use super::self_prelude::*;
use arc_swap::ArcSwap;

/// The schema currently being served.
///
/// A rebuild produces a whole new [`ConvertedSchema`] which replaces the old
/// one in a single swap. Readers holding the previous generation keep it until
/// they drop it.
pub struct SchemaSnapshot {
    current: ArcSwap<ConvertedSchema>,
}

impl SchemaSnapshot {
    pub fn new(schema: ConvertedSchema) -> Self {
        Self {
            current: ArcSwap::from_pointee(schema),
        }
    }

    pub fn load(&self) -> Arc<ConvertedSchema> {
        self.current.load_full()
    }

    /// Publish `schema` and hand back the generation it replaces.
    pub fn replace(&self, schema: ConvertedSchema) -> Arc<ConvertedSchema> {
        let previous = self.current.swap(Arc::new(schema));
        info!(
            "Replaced schema of project {:?} ({} tables)",
            previous.project(),
            self.current.load().schema_type().tables.len()
        );
        previous
    }
}

impl fmt::Debug for SchemaSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaSnapshot")
            .field("current", &self.current.load_full())
            .finish()
    }
}
