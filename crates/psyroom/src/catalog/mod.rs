//! Test definition provider backed by a JSON document.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::scoring::{DefinitionError, InstrumentKind, TestDefinition, TestId};

const BUILTIN_CATALOG: &str = include_str!("../../catalog/builtin.json");

/// Lookup abstraction so the attempt service can be exercised with any storage.
pub trait TestCatalog: Send + Sync {
    fn definition(&self, id: &TestId) -> Result<Option<Arc<TestDefinition>>, CatalogError>;
    fn summaries(&self) -> Result<Vec<TestSummary>, CatalogError>;
}

/// Public listing entry for a catalog test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestSummary {
    pub id: TestId,
    pub title: String,
    pub description: String,
    pub kind: InstrumentKind,
}

impl From<&TestDefinition> for TestSummary {
    fn from(definition: &TestDefinition) -> Self {
        Self {
            id: definition.id.clone(),
            title: definition.title.clone(),
            description: definition.description.clone(),
            kind: definition.kind(),
        }
    }
}

/// Immutable catalog validated once at load time.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    order: Vec<TestId>,
    definitions: BTreeMap<TestId, Arc<TestDefinition>>,
}

impl StaticCatalog {
    /// Catalog shipped with the crate: one test of each instrument kind.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_reader(BUILTIN_CATALOG.as_bytes())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let definitions: Vec<TestDefinition> = serde_json::from_reader(reader)?;
        Self::from_definitions(definitions)
    }

    pub fn from_definitions(definitions: Vec<TestDefinition>) -> Result<Self, CatalogError> {
        let mut catalog = Self::default();

        for definition in definitions {
            definition
                .validate()
                .map_err(|source| CatalogError::Invalid {
                    test_id: definition.id.clone(),
                    source,
                })?;

            if catalog.definitions.contains_key(&definition.id) {
                return Err(CatalogError::DuplicateTest(definition.id));
            }

            catalog.order.push(definition.id.clone());
            catalog
                .definitions
                .insert(definition.id.clone(), Arc::new(definition));
        }

        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl TestCatalog for StaticCatalog {
    fn definition(&self, id: &TestId) -> Result<Option<Arc<TestDefinition>>, CatalogError> {
        Ok(self.definitions.get(id).cloned())
    }

    fn summaries(&self) -> Result<Vec<TestSummary>, CatalogError> {
        Ok(self
            .order
            .iter()
            .filter_map(|id| self.definitions.get(id))
            .map(|definition| TestSummary::from(definition.as_ref()))
            .collect())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read test catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid test catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("test '{test_id}' is invalid: {source}")]
    Invalid {
        test_id: TestId,
        #[source]
        source: DefinitionError,
    },
    #[error("test '{0}' is declared more than once")]
    DuplicateTest(TestId),
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}
