//! Plan assembly: build every operator, then link and validate the graph.
//!
//! Nothing is wired until every node has built and every structural rule has
//! passed, so a failed plan never leaves a partially linked graph behind.
//! Order of checks:
//!   1. size cap, duplicate ids
//!   2. build all nodes (sorted by id; fail-fast or collected)
//!   3. link endpoints, self links, duplicate links
//!   4. exactly one sink, input/output arity
//!   5. acyclicity, every node reaches the sink
//!   6. schema binding in topological order, then wiring

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use textflow_core::config::PlanConfig;
use textflow_core::hash::{hash_serde, Hash256};
use textflow_core::id::OperatorId;
use textflow_core::prelude::Schema;
use textflow_operators::{Operator, OperatorBinding, Sink};

use crate::builder::{BuildContext, BuiltOperator, OperatorRegistry};
use crate::descriptor::{Link, OperatorDescriptor};
use crate::dsl::PlanDocument;
use crate::error::{BuildError, GraphError, PlanError};

pub struct PlanAssembler {
    registry: OperatorRegistry,
    context: BuildContext,
    config: PlanConfig,
}

impl PlanAssembler {
    pub fn new(registry: OperatorRegistry, context: BuildContext) -> Self {
        Self {
            registry,
            context,
            config: PlanConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PlanConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    pub fn registry(&self) -> &OperatorRegistry {
        &self.registry
    }

    /// Assemble a parsed document; its `config` block overrides ours.
    pub fn assemble_document(&self, doc: &PlanDocument) -> Result<AssembledPlan, PlanError> {
        let config = doc.plan_config(self.config.clone());
        self.assemble_with(&config, &doc.operators, &doc.links)
    }

    pub fn assemble(
        &self,
        operators: &[OperatorDescriptor],
        links: &[Link],
    ) -> Result<AssembledPlan, PlanError> {
        self.assemble_with(&self.config, operators, links)
    }

    /// Build every descriptor in operator-id order without linking.
    pub fn build_all(
        &self,
        operators: &[OperatorDescriptor],
    ) -> Result<BTreeMap<OperatorId, BuiltOperator>, PlanError> {
        self.build_all_with(&self.config, operators)
    }

    fn build_all_with(
        &self,
        config: &PlanConfig,
        operators: &[OperatorDescriptor],
    ) -> Result<BTreeMap<OperatorId, BuiltOperator>, PlanError> {
        if operators.is_empty() {
            return Err(GraphError::EmptyPlan.into());
        }
        if operators.len() > config.max_operators {
            return Err(GraphError::TooManyOperators {
                count: operators.len(),
                max: config.max_operators,
            }
            .into());
        }

        let mut sorted: Vec<&OperatorDescriptor> = operators.iter().collect();
        sorted.sort_by(|a, b| a.operator_id.cmp(&b.operator_id));
        if let Some(pair) = sorted.windows(2).find(|w| w[0].operator_id == w[1].operator_id) {
            return Err(GraphError::DuplicateOperator {
                operator_id: pair[0].operator_id.clone(),
            }
            .into());
        }

        let mut built = BTreeMap::new();
        let mut failures: Vec<BuildError> = vec![];
        for descriptor in sorted {
            match self.registry.build(descriptor, &self.context) {
                Ok(op) => {
                    built.insert(descriptor.operator_id.clone(), op);
                }
                Err(e) if config.fail_fast => return Err(e.into()),
                Err(e) => failures.push(e),
            }
        }

        if !failures.is_empty() {
            tracing::warn!(
                failed = failures.len(),
                total = operators.len(),
                "operators failed to build"
            );
            return Err(PlanError::Builds(failures));
        }
        Ok(built)
    }

    fn assemble_with(
        &self,
        config: &PlanConfig,
        operators: &[OperatorDescriptor],
        links: &[Link],
    ) -> Result<AssembledPlan, PlanError> {
        let mut nodes = self.build_all_with(config, operators)?;
        let bindings = nodes
            .iter()
            .map(|(id, op)| {
                op.binding()
                    .map(|b| (id.clone(), b))
                    .map_err(|source| PlanError::Binding {
                        operator_id: id.clone(),
                        source,
                    })
            })
            .collect::<Result<BTreeMap<OperatorId, OperatorBinding>, _>>()?;

        let graph = Graph::check(&nodes, links)?;
        let order = graph.topological_order()?;
        graph.check_reaches_sink()?;
        let schemas = bind_schemas(&nodes, &graph, &order)?;
        let sink = wire(&mut nodes, &graph, &order, &schemas)?;

        let mut sorted_links = links.to_vec();
        sorted_links.sort();
        let fingerprint = hash_serde(&(&bindings, &sorted_links))?;

        tracing::info!(
            operators = order.len(),
            links = sorted_links.len(),
            sink = %graph.sink,
            fingerprint = %fingerprint.short(),
            "plan assembled"
        );

        Ok(AssembledPlan {
            sink_id: graph.sink.clone(),
            sink,
            order,
            bindings,
            schemas,
            links: sorted_links,
            fingerprint,
        })
    }
}

/// Adjacency of a validated link set.
struct Graph {
    inputs: BTreeMap<OperatorId, Vec<OperatorId>>,
    output: BTreeMap<OperatorId, OperatorId>,
    sink: OperatorId,
}

impl Graph {
    fn check(nodes: &BTreeMap<OperatorId, BuiltOperator>, links: &[Link]) -> Result<Self, GraphError> {
        let mut seen = BTreeSet::new();
        for link in links {
            for end in [&link.from, &link.to] {
                if !nodes.contains_key(end) {
                    return Err(GraphError::UnknownLinkEndpoint {
                        from: link.from.clone(),
                        to: link.to.clone(),
                        missing: end.clone(),
                    });
                }
            }
            if link.from == link.to {
                return Err(GraphError::SelfLink {
                    operator_id: link.from.clone(),
                });
            }
            if !seen.insert(link) {
                return Err(GraphError::DuplicateLink {
                    from: link.from.clone(),
                    to: link.to.clone(),
                });
            }
            tracing::debug!(from = %link.from, to = %link.to, "linked operators");
        }

        let sinks: Vec<OperatorId> = nodes
            .iter()
            .filter(|(_, op)| op.is_sink())
            .map(|(id, _)| id.clone())
            .collect();
        if sinks.len() != 1 {
            return Err(GraphError::SinkCount { sinks });
        }
        let sink = sinks[0].clone();

        let mut inputs: BTreeMap<OperatorId, Vec<OperatorId>> =
            nodes.keys().map(|id| (id.clone(), vec![])).collect();
        let mut outputs: BTreeMap<OperatorId, Vec<OperatorId>> =
            nodes.keys().map(|id| (id.clone(), vec![])).collect();
        for link in links {
            inputs.entry(link.to.clone()).or_default().push(link.from.clone());
            outputs.entry(link.from.clone()).or_default().push(link.to.clone());
        }

        for (id, op) in nodes {
            let found = inputs.get(id).map_or(0, Vec::len);
            if found != op.input_arity() {
                return Err(GraphError::InputArity {
                    operator_id: id.clone(),
                    expected: op.input_arity(),
                    found,
                });
            }
        }

        let mut output = BTreeMap::new();
        for (id, op) in nodes {
            let targets = outputs.remove(id).unwrap_or_default();
            let expected = usize::from(!op.is_sink());
            if targets.len() != expected {
                return Err(GraphError::OutputArity {
                    operator_id: id.clone(),
                    expected,
                    found: targets.len(),
                });
            }
            if let Some(next) = targets.into_iter().next() {
                output.insert(id.clone(), next);
            }
        }

        Ok(Self {
            inputs,
            output,
            sink,
        })
    }

    /// Kahn's algorithm, smallest ready id first.
    fn topological_order(&self) -> Result<Vec<OperatorId>, GraphError> {
        let mut pending: BTreeMap<&OperatorId, usize> =
            self.inputs.iter().map(|(id, ins)| (id, ins.len())).collect();
        let mut ready: BTreeSet<&OperatorId> = pending
            .iter()
            .filter(|(_, n)| **n == 0)
            .map(|(id, _)| *id)
            .collect();
        let mut order = Vec::with_capacity(pending.len());

        while let Some(id) = ready.pop_first() {
            pending.remove(id);
            order.push(id.clone());
            if let Some(next) = self.output.get(id) {
                if let Some(n) = pending.get_mut(next) {
                    *n -= 1;
                    if *n == 0 {
                        ready.insert(next);
                    }
                }
            }
        }

        if !pending.is_empty() {
            return Err(GraphError::Cycle {
                operator_ids: pending.into_keys().cloned().collect(),
            });
        }
        Ok(order)
    }

    /// Follow each node's single output edge; every path must end at the sink.
    fn check_reaches_sink(&self) -> Result<(), GraphError> {
        let stranded: Vec<OperatorId> = self
            .inputs
            .keys()
            .filter(|start| {
                let mut cur = *start;
                for _ in 0..=self.inputs.len() {
                    if *cur == self.sink {
                        return false;
                    }
                    match self.output.get(cur) {
                        Some(next) => cur = next,
                        None => return true,
                    }
                }
                true
            })
            .cloned()
            .collect();
        if stranded.is_empty() {
            Ok(())
        } else {
            Err(GraphError::Disconnected {
                operator_ids: stranded,
            })
        }
    }
}

/// Validate attribute bindings and derive each node's output schema. The
/// sink's entry is the schema it receives.
fn bind_schemas(
    nodes: &BTreeMap<OperatorId, BuiltOperator>,
    graph: &Graph,
    order: &[OperatorId],
) -> Result<BTreeMap<OperatorId, Schema>, GraphError> {
    let mut schemas: BTreeMap<OperatorId, Schema> = BTreeMap::new();
    for id in order {
        let inputs: Vec<Schema> = graph
            .inputs
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|up| schemas.get(up).cloned())
            .collect();
        let unresolved = |source| GraphError::UnresolvedAttribute {
            operator_id: id.clone(),
            source,
        };
        let schema = match nodes.get(id) {
            Some(BuiltOperator::Operator(op)) => op.plan(&inputs).map_err(unresolved)?,
            Some(BuiltOperator::Sink(sink)) => {
                sink.plan(&inputs).map_err(unresolved)?;
                inputs.into_iter().next().unwrap_or_default()
            }
            None => continue,
        };
        schemas.insert(id.clone(), schema);
    }
    Ok(schemas)
}

/// Hand each operator to its downstream node; returns the sink, which owns
/// the whole chain.
fn wire(
    nodes: &mut BTreeMap<OperatorId, BuiltOperator>,
    graph: &Graph,
    order: &[OperatorId],
    schemas: &BTreeMap<OperatorId, Schema>,
) -> Result<Box<dyn Sink>, GraphError> {
    let mut wired: HashMap<OperatorId, Box<dyn Operator>> = HashMap::new();
    let mut sink = None;

    for id in order {
        let Some(node) = nodes.remove(id) else {
            continue;
        };
        let upstream = graph.inputs.get(id).map(Vec::as_slice).unwrap_or_default();
        let wiring = |source| GraphError::Wiring {
            operator_id: id.clone(),
            source,
        };
        match node {
            BuiltOperator::Operator(mut op) => {
                for up in upstream {
                    if let (Some(input), Some(schema)) = (wired.remove(up), schemas.get(up)) {
                        op.set_input(input, schema).map_err(wiring)?;
                    }
                }
                wired.insert(id.clone(), op);
            }
            BuiltOperator::Sink(mut s) => {
                for up in upstream {
                    if let (Some(input), Some(schema)) = (wired.remove(up), schemas.get(up)) {
                        s.set_input(input, schema).map_err(wiring)?;
                    }
                }
                sink = Some(s);
            }
        }
    }

    sink.ok_or_else(|| GraphError::SinkCount { sinks: vec![] })
}

/// A linked, validated plan ready to run. The sink owns every upstream
/// operator.
pub struct AssembledPlan {
    sink_id: OperatorId,
    sink: Box<dyn Sink>,
    order: Vec<OperatorId>,
    bindings: BTreeMap<OperatorId, OperatorBinding>,
    schemas: BTreeMap<OperatorId, Schema>,
    links: Vec<Link>,
    fingerprint: Hash256,
}

impl AssembledPlan {
    pub fn sink_id(&self) -> &OperatorId {
        &self.sink_id
    }

    pub fn sink(&self) -> &dyn Sink {
        self.sink.as_ref()
    }

    pub fn sink_mut(&mut self) -> &mut dyn Sink {
        self.sink.as_mut()
    }

    /// Operator ids in topological order, sources first and the sink last.
    pub fn order(&self) -> &[OperatorId] {
        &self.order
    }

    pub fn bindings(&self) -> &BTreeMap<OperatorId, OperatorBinding> {
        &self.bindings
    }

    pub fn schema(&self, id: &OperatorId) -> Option<&Schema> {
        self.schemas.get(id)
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Stable over operator configurations and links; equal for two plans
    /// built from the same descriptions.
    pub fn fingerprint(&self) -> Hash256 {
        self.fingerprint
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            fingerprint: self.fingerprint.to_hex(),
            sink: self.sink_id.clone(),
            operators: self
                .order
                .iter()
                .filter_map(|id| {
                    let binding = self.bindings.get(id)?.clone();
                    Some(OperatorSummary {
                        operator_id: id.clone(),
                        operator_type: binding.key,
                        config: binding.config,
                        schema: self.schemas.get(id).cloned().unwrap_or_default(),
                    })
                })
                .collect(),
            links: self.links.clone(),
        }
    }

    pub fn into_sink(self) -> (OperatorId, Box<dyn Sink>) {
        (self.sink_id, self.sink)
    }
}

impl std::fmt::Debug for AssembledPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssembledPlan")
            .field("sink_id", &self.sink_id)
            .field("order", &self.order)
            .field("links", &self.links)
            .field("fingerprint", &self.fingerprint.short())
            .finish()
    }
}

/// Serializable view of an assembled plan, for `explain`.
#[derive(Debug, Clone, Serialize)]
pub struct PlanSummary {
    pub fingerprint: String,
    pub sink: OperatorId,
    pub operators: Vec<OperatorSummary>,
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OperatorSummary {
    pub operator_id: OperatorId,
    pub operator_type: String,
    pub config: serde_json::Value,
    /// Output schema; for the sink, the schema it receives.
    pub schema: Schema,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BuildErrorKind, PaginationKey, PropertyError};
    use crate::builder::OperatorBuilder;
    use crate::properties::{OperatorProperties, PropertyResolver};
    use textflow_core::prelude::{Attribute, FieldType, FieldValue, Tuple};
    use textflow_operators::{DataSet, MemoryCatalog, OpError};

    fn people() -> MemoryCatalog {
        let schema = Schema::try_new(vec![
            Attribute::new("name", FieldType::String),
            Attribute::new("bio", FieldType::Text),
        ])
        .unwrap();
        let row = |name: &str, bio: &str| {
            Tuple::new(vec![FieldValue::String(name.into()), FieldValue::Text(bio.into())])
        };
        let catalog = MemoryCatalog::new();
        catalog.insert(
            "people",
            DataSet::new(
                schema,
                vec![
                    row("ann", "asked for a salary review"),
                    row("bob", "likes sailing"),
                    row("cy", "salary negotiations went well"),
                ],
            )
            .unwrap(),
        );
        catalog
    }

    fn assembler() -> PlanAssembler {
        PlanAssembler::new(OperatorRegistry::default(), BuildContext::new(people()))
    }

    fn scan(id: &str) -> OperatorDescriptor {
        OperatorDescriptor::new(
            id,
            "ScanSource",
            OperatorProperties::new()
                .with("dataSource", "people")
                .with("attributeNames", "name, bio")
                .with("attributeTypes", "string, text"),
        )
    }

    fn regex(id: &str, attr: &str, ty: &str) -> OperatorDescriptor {
        OperatorDescriptor::new(
            id,
            "RegexMatcher",
            OperatorProperties::new()
                .with("regex", "sal[a-z]+")
                .with("attributeNames", attr)
                .with("attributeTypes", ty),
        )
    }

    fn sink(id: &str) -> OperatorDescriptor {
        OperatorDescriptor::new(id, "TupleSink", OperatorProperties::new())
    }

    fn graph_error(res: Result<AssembledPlan, PlanError>) -> GraphError {
        match res {
            Err(PlanError::Graph(e)) => e,
            other => panic!("expected graph error, got {other:?}"),
        }
    }

    #[test]
    fn linear_plan_assembles_and_runs() {
        let ops = [scan("src"), regex("m1", "bio", "text"), sink("out")];
        let links = [Link::new("src", "m1"), Link::new("m1", "out")];
        let mut plan = assembler().assemble(&ops, &links).unwrap();

        assert_eq!(plan.order(), &[OperatorId::new("src"), OperatorId::new("m1"), OperatorId::new("out")]);
        assert_eq!(plan.sink_id().as_str(), "out");
        assert_eq!(plan.schema(&OperatorId::new("out")).map(Schema::len), Some(2));

        let sink = plan.sink_mut();
        sink.open().unwrap();
        assert_eq!(sink.process_tuples(None).unwrap(), 2);
        sink.close().unwrap();
        assert_eq!(sink.collected().len(), 2);
    }

    /// Source whose config cannot be rendered as JSON.
    struct OddSource;

    impl Operator for OddSource {
        fn name(&self) -> &'static str {
            "OddSource"
        }

        fn input_arity(&self) -> usize {
            0
        }

        fn plan(&self, _: &[Schema]) -> Result<Schema, OpError> {
            Ok(Schema::empty())
        }

        fn set_input(&mut self, _: Box<dyn Operator>, _: &Schema) -> Result<(), OpError> {
            Err(OpError::Plan("OddSource takes no input".into()))
        }

        fn open(&mut self) -> Result<(), OpError> {
            Ok(())
        }

        fn next_tuple(&mut self) -> Result<Option<Tuple>, OpError> {
            Ok(None)
        }

        fn close(&mut self) -> Result<(), OpError> {
            Ok(())
        }

        fn binding(&self) -> Result<OperatorBinding, OpError> {
            let config: BTreeMap<(u8, u8), u8> = [((0, 0), 0)].into_iter().collect();
            OperatorBinding::new(self.name(), &config)
        }
    }

    struct OddSourceBuilder(PropertyResolver);

    impl OperatorBuilder for OddSourceBuilder {
        fn properties(&self) -> &PropertyResolver {
            &self.0
        }

        fn try_build(&self, _: &BuildContext) -> Result<BuiltOperator, BuildErrorKind> {
            Ok(BuiltOperator::Operator(Box::new(OddSource)))
        }
    }

    #[test]
    fn unserializable_config_fails_assembly() {
        let mut registry = OperatorRegistry::default();
        registry.register("OddSource", |props| -> Box<dyn OperatorBuilder> {
            Box::new(OddSourceBuilder(props))
        });
        let ops = [
            OperatorDescriptor::new("odd", "OddSource", OperatorProperties::new()),
            sink("out"),
        ];
        let err = PlanAssembler::new(registry, BuildContext::new(people()))
            .assemble(&ops, &[Link::new("odd", "out")])
            .unwrap_err();
        assert!(matches!(
            err,
            PlanError::Binding { ref operator_id, source: OpError::Binding(_) }
                if operator_id.as_str() == "odd"
        ));
    }

    #[test]
    fn same_descriptions_give_same_fingerprint() {
        let ops = [scan("src"), regex("m1", "bio", "text"), sink("out")];
        let links = [Link::new("m1", "out"), Link::new("src", "m1")];
        let a = assembler().assemble(&ops, &links).unwrap();
        let mut reversed = links;
        reversed.reverse();
        let b = assembler().assemble(&ops, &reversed).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.bindings(), b.bindings());
    }

    #[test]
    fn build_errors_fail_fast_on_smallest_id() {
        let mut bad = regex("a_bad", "bio", "text");
        bad.properties = bad.properties.with("limit", "-5");
        let ops = [OperatorDescriptor::new("z", "FooBar", OperatorProperties::new()), bad];
        match assembler().assemble(&ops, &[]) {
            Err(PlanError::Build(e)) => {
                assert_eq!(e.operator_id.as_str(), "a_bad");
                assert!(matches!(
                    e.cause,
                    BuildErrorKind::Property(PropertyError::NegativePagination {
                        key: PaginationKey::Limit,
                        ..
                    })
                ));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn collected_build_errors_are_sorted() {
        let asm = assembler().with_config(PlanConfig {
            fail_fast: false,
            ..PlanConfig::default()
        });
        let ops = [
            OperatorDescriptor::new("z", "FooBar", OperatorProperties::new()),
            scan("src"),
            OperatorDescriptor::new("b", "FileSink", OperatorProperties::new()),
        ];
        let err = asm.assemble(&ops, &[]).unwrap_err();
        let ids: Vec<&str> = err.build_errors().iter().map(|e| e.operator_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "z"]);
        assert_eq!(
            err.build_errors()[1].cause,
            BuildErrorKind::UnknownOperatorType { tag: "FooBar".into() }
        );
    }

    #[test]
    fn empty_and_oversized_plans_are_rejected() {
        assert!(matches!(graph_error(assembler().assemble(&[], &[])), GraphError::EmptyPlan));
        let asm = assembler().with_config(PlanConfig {
            max_operators: 2,
            ..PlanConfig::default()
        });
        let ops = [scan("a"), scan("b"), sink("c")];
        assert!(matches!(
            graph_error(asm.assemble(&ops, &[])),
            GraphError::TooManyOperators { count: 3, max: 2 }
        ));
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let ops = [scan("src"), scan("src"), sink("out")];
        assert!(matches!(
            graph_error(assembler().assemble(&ops, &[])),
            GraphError::DuplicateOperator { operator_id } if operator_id.as_str() == "src"
        ));
    }

    #[test]
    fn link_validation() {
        let ops = [scan("src"), sink("out")];
        assert!(matches!(
            graph_error(assembler().assemble(&ops, &[Link::new("src", "nowhere")])),
            GraphError::UnknownLinkEndpoint { missing, .. } if missing.as_str() == "nowhere"
        ));
        assert!(matches!(
            graph_error(assembler().assemble(&ops, &[Link::new("src", "src")])),
            GraphError::SelfLink { .. }
        ));
        assert!(matches!(
            graph_error(assembler().assemble(&ops, &[Link::new("src", "out"), Link::new("src", "out")])),
            GraphError::DuplicateLink { .. }
        ));
    }

    #[test]
    fn exactly_one_sink() {
        let ops = [scan("src"), sink("a"), sink("b")];
        let err = graph_error(assembler().assemble(&ops, &[Link::new("src", "a")]));
        assert_eq!(err.operator_ids(), vec![OperatorId::new("a"), OperatorId::new("b")]);

        let ops = [scan("src"), regex("m1", "bio", "text")];
        assert!(matches!(
            graph_error(assembler().assemble(&ops, &[Link::new("src", "m1")])),
            GraphError::SinkCount { sinks } if sinks.is_empty()
        ));
    }

    #[test]
    fn arity_is_enforced() {
        let ops = [scan("src"), regex("m1", "bio", "text"), sink("out")];
        assert!(matches!(
            graph_error(assembler().assemble(&ops, &[Link::new("src", "out")])),
            GraphError::InputArity { operator_id, expected: 1, found: 0 } if operator_id.as_str() == "m1"
        ));

        let ops = [scan("a"), scan("b"), regex("m1", "bio", "text"), sink("out")];
        let links = [Link::new("a", "m1"), Link::new("b", "m1"), Link::new("m1", "out")];
        assert!(matches!(
            graph_error(assembler().assemble(&ops, &links)),
            GraphError::InputArity { found: 2, .. }
        ));

        let ops = [scan("src"), regex("m1", "bio", "text"), regex("m2", "bio", "text"), sink("out")];
        let links = [Link::new("src", "m1"), Link::new("src", "m2"), Link::new("m1", "out")];
        assert!(matches!(
            graph_error(assembler().assemble(&ops, &links)),
            GraphError::InputArity { .. } | GraphError::OutputArity { .. }
        ));
    }

    #[test]
    fn cycles_name_their_operators() {
        let ops = [
            scan("src"),
            regex("m1", "bio", "text"),
            regex("m2", "bio", "text"),
            regex("m3", "bio", "text"),
            sink("out"),
        ];
        let links = [
            Link::new("src", "m3"),
            Link::new("m3", "out"),
            Link::new("m1", "m2"),
            Link::new("m2", "m1"),
        ];
        let err = graph_error(assembler().assemble(&ops, &links));
        assert!(matches!(err, GraphError::Cycle { .. }));
        assert_eq!(err.operator_ids(), vec![OperatorId::new("m1"), OperatorId::new("m2")]);
    }

    #[test]
    fn unresolved_target_attribute() {
        let ops = [scan("src"), regex("m1", "summary", "text"), sink("out")];
        let links = [Link::new("src", "m1"), Link::new("m1", "out")];
        assert!(matches!(
            graph_error(assembler().assemble(&ops, &links)),
            GraphError::UnresolvedAttribute { operator_id, .. } if operator_id.as_str() == "m1"
        ));
    }

    #[test]
    fn target_type_must_match_input() {
        let ops = [scan("src"), regex("m1", "bio", "string"), sink("out")];
        let links = [Link::new("src", "m1"), Link::new("m1", "out")];
        assert!(matches!(
            graph_error(assembler().assemble(&ops, &links)),
            GraphError::UnresolvedAttribute { .. }
        ));
    }

    #[test]
    fn document_config_overrides_assembler_config() {
        let doc = PlanDocument {
            config: Some(crate::dsl::DocumentConfig {
                fail_fast: Some(false),
                ..Default::default()
            }),
            operators: vec![
                OperatorDescriptor::new("a", "FooBar", OperatorProperties::new()),
                OperatorDescriptor::new("b", "BarFoo", OperatorProperties::new()),
            ],
            links: vec![],
        };
        let err = assembler().assemble_document(&doc).unwrap_err();
        assert_eq!(err.build_errors().len(), 2);
    }

    #[test]
    fn summary_lists_operators_in_order() {
        let ops = [scan("src"), regex("m1", "bio", "text"), sink("out")];
        let links = [Link::new("src", "m1"), Link::new("m1", "out")];
        let plan = assembler().assemble(&ops, &links).unwrap();
        let summary = plan.summary();
        let types: Vec<&str> = summary.operators.iter().map(|o| o.operator_type.as_str()).collect();
        assert_eq!(types, vec!["ScanSource", "RegexMatcher", "TupleSink"]);
        assert_eq!(summary.fingerprint, plan.fingerprint().to_hex());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["operators"][1]["config"]["regex"], "sal[a-z]+");
    }
}
