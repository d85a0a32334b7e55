use super::error::*;
use super::filter::*;
use super::handler::*;
use super::schema_type::*;
use super::self_prelude::*;
use crate::naming::{capitalize, safe_name, NameRegistry};
use endpoint_graphql_lib::defaults;

/// State threaded through every handler of one build.
///
/// Memo tables live here and die with the build, so builds for different
/// endpoints never share anything mutable.
pub struct DynBuildContext<'a> {
    pub project: String,
    pub prefix: String,
    pub store: &'a store::SchemaStore,
    /// Tables included in this build, by id.
    pub tables: &'a IndexMap<String, ValidTableType>,
    /// Every generated type name with the site that claimed it.
    pub names: NameRegistry,
    where_inputs: HashMap<(String, String), Arc<DynInputType>>,
    order_by_inputs: HashMap<(String, String), Arc<DynInputType>>,
    ref_types: HashMap<String, (DynTypeRef, Vec<DynAuxType>)>,
    ref_names: HashMap<String, String>,
    expanding: HashSet<String>,
}

impl<'a> DynBuildContext<'a> {
    pub fn new(
        project: impl Into<String>,
        prefix: impl Into<String>,
        store: &'a store::SchemaStore,
        tables: &'a IndexMap<String, ValidTableType>,
        names: NameRegistry,
    ) -> Self {
        Self {
            project: project.into(),
            prefix: prefix.into(),
            store,
            tables,
            names,
            where_inputs: HashMap::new(),
            order_by_inputs: HashMap::new(),
            ref_types: HashMap::new(),
            ref_names: HashMap::new(),
            expanding: HashSet::new(),
        }
    }

    /// The `WhereInput` of a table type, built once per `(project, type)`.
    ///
    /// `AND`/`OR`/`NOT` refer to the input by name, so every caller shares
    /// this one instance.
    pub fn where_input(&mut self, type_name: &str) -> DynSchemaResult<Arc<DynInputType>> {
        let key = (self.project.clone(), type_name.to_string());
        if let Some(input) = self.where_inputs.get(&key) {
            return Ok(input.clone());
        }
        let input = Arc::new(where_input_type(&self.prefix, type_name));
        self.names
            .claim(&input.name, format!("filter of {type_name}"))?;
        self.where_inputs.insert(key, input.clone());
        Ok(input)
    }

    pub fn order_by_input(&mut self, type_name: &str) -> DynSchemaResult<Arc<DynInputType>> {
        let key = (self.project.clone(), type_name.to_string());
        if let Some(input) = self.order_by_inputs.get(&key) {
            return Ok(input.clone());
        }
        let input = Arc::new(order_by_input_type(&self.prefix, type_name));
        self.names
            .claim(&input.name, format!("ordering of {type_name}"))?;
        self.order_by_inputs.insert(key, input.clone());
        Ok(input)
    }

    /// Claim a generated type name. While the name is taken, a counter is
    /// appended: `BlogPostMeta`, `BlogPostMeta2`, ...
    ///
    /// Table types and their scaffolding are claimed before any handler runs,
    /// so nested and shared types are the ones that move aside.
    pub fn reserve_type_name(
        &mut self,
        base: &str,
        owner: impl Into<String>,
    ) -> DynSchemaResult<String> {
        let mut name = base.to_string();
        let mut counter = 1;
        while self.names.contains(&name) {
            counter += 1;
            name = format!("{base}{counter}");
        }
        if name != base {
            debug!("Type name {base:?} is taken, using {name:?}");
        }
        self.names.claim(&name, owner)?;
        Ok(name)
    }

    /// Type name minted for the shape behind a registered `$ref`, reserved on
    /// first use.
    pub fn ref_type_name(&mut self, reference: &str) -> DynSchemaResult<String> {
        if let Some(name) = self.ref_names.get(reference) {
            return Ok(name.clone());
        }
        let base = self
            .store
            .refs()
            .get(reference)
            .map(|entry| entry.name.as_str())
            .unwrap_or(reference);
        let base = format!(
            "{}{}",
            self.prefix,
            capitalize(&safe_name(base, defaults::TABLE_NAME_PREFIX))
        );
        let name = self.reserve_type_name(&base, format!("ref {reference:?}"))?;
        self.ref_names.insert(reference.to_string(), name.clone());
        Ok(name)
    }

    pub(crate) fn ref_type(&self, reference: &str) -> Option<&(DynTypeRef, Vec<DynAuxType>)> {
        self.ref_types.get(reference)
    }

    pub(crate) fn set_ref_type(
        &mut self,
        reference: &str,
        type_ref: DynTypeRef,
        aux_types: Vec<DynAuxType>,
    ) {
        self.ref_types
            .insert(reference.to_string(), (type_ref, aux_types));
    }

    /// Mark a ref as being expanded; false when it already was.
    pub(crate) fn enter_ref(&mut self, reference: &str) -> bool {
        self.expanding.insert(reference.to_string())
    }

    pub(crate) fn leave_ref(&mut self, reference: &str) {
        self.expanding.remove(reference);
    }
}
