//! Inter-service dependency graph and execution ordering.
//!
//! Services form a directed graph: an edge `a → b` means "a depends on b",
//! so `b` must execute before `a`. Ordering uses Kahn's algorithm with a
//! declaration-order ready queue: whenever several services are runnable,
//! the one declared first in the template runs first. Re-running with the
//! same input always yields the same order.

use std::collections::{BTreeSet, BinaryHeap, HashMap};

use crate::domain::error::GraphError;

/// One service and the set of services it depends on.
///
/// Transient — exists only while computing the execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceNode {
    /// Service name, unique within the template.
    pub name: String,
    /// Names of services this one references.
    pub depends_on: BTreeSet<String>,
}

impl ServiceNode {
    /// Create a node from a name and its dependency names.
    pub fn new<I, S>(name: impl Into<String>, depends_on: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            depends_on: depends_on.into_iter().map(Into::into).collect(),
        }
    }
}

/// Compute a dependency-respecting execution order over `nodes`.
///
/// Every dependency precedes its dependents. Dependencies naming services
/// that are not declared are ignored. Ties among independently runnable
/// services keep declaration order.
///
/// # Errors
///
/// Returns [`GraphError::CyclicDependency`] naming the services left
/// unordered when the graph has no valid linear order.
pub fn execution_order(nodes: &[ServiceNode]) -> Result<Vec<String>, GraphError> {
    let position: HashMap<&str, usize> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.name.as_str(), i))
        .collect();

    let mut in_degree = vec![0_usize; nodes.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); nodes.len()];
    for (i, node) in nodes.iter().enumerate() {
        for dep in &node.depends_on {
            if let Some(&d) = position.get(dep.as_str()) {
                in_degree[i] += 1;
                dependents[d].push(i);
            }
        }
    }

    // Min-heap over declaration indices: among runnable services, the one
    // declared first always wins.
    let mut ready: BinaryHeap<std::cmp::Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|&(_, &deg)| deg == 0)
        .map(|(i, _)| std::cmp::Reverse(i))
        .collect();

    let mut order = Vec::with_capacity(nodes.len());
    while let Some(std::cmp::Reverse(i)) = ready.pop() {
        order.push(nodes[i].name.clone());
        for &dep in &dependents[i] {
            in_degree[dep] -= 1;
            if in_degree[dep] == 0 {
                ready.push(std::cmp::Reverse(dep));
            }
        }
    }

    if order.len() != nodes.len() {
        let stuck: Vec<String> = nodes
            .iter()
            .filter(|n| !order.contains(&n.name))
            .map(|n| n.name.clone())
            .collect();
        return Err(GraphError::CyclicDependency { services: stuck });
    }

    Ok(order)
}

// ── Unit tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    fn node(name: &str, deps: &[&str]) -> ServiceNode {
        ServiceNode::new(name, deps.iter().copied())
    }

    #[test]
    fn test_chain_orders_dependencies_first() {
        // c depends on b depends on a
        let nodes = vec![node("c", &["b"]), node("b", &["a"]), node("a", &[])];
        let order = execution_order(&nodes).unwrap();
        assert_eq!(order, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_independent_services_keep_declaration_order() {
        let nodes = vec![node("web", &[]), node("worker", &[]), node("cron", &[])];
        let order = execution_order(&nodes).unwrap();
        assert_eq!(order, vec!["web", "worker", "cron"]);
    }

    #[test]
    fn test_diamond_respects_all_edges() {
        // d depends on b and c; b and c depend on a
        let nodes = vec![
            node("d", &["b", "c"]),
            node("c", &["a"]),
            node("b", &["a"]),
            node("a", &[]),
        ];
        let order = execution_order(&nodes).unwrap();
        let idx = |n: &str| order.iter().position(|x| x == n).unwrap();
        assert!(idx("a") < idx("b"));
        assert!(idx("a") < idx("c"));
        assert!(idx("b") < idx("d"));
        assert!(idx("c") < idx("d"));
        // b and c are tied once a ran — declaration order puts c first
        assert!(idx("c") < idx("b"));
    }

    #[test]
    fn test_two_node_cycle_is_detected() {
        let nodes = vec![node("a", &["b"]), node("b", &["a"])];
        let err = execution_order(&nodes).unwrap_err();
        let GraphError::CyclicDependency { services } = err;
        assert!(services.contains(&"a".to_string()));
        assert!(services.contains(&"b".to_string()));
    }

    #[test]
    fn test_self_cycle_is_detected() {
        let nodes = vec![node("a", &["a"])];
        assert!(matches!(
            execution_order(&nodes),
            Err(GraphError::CyclicDependency { .. })
        ));
    }

    #[test]
    fn test_cycle_error_excludes_orderable_services() {
        let nodes = vec![node("ok", &[]), node("x", &["y"]), node("y", &["x"])];
        let err = execution_order(&nodes).unwrap_err();
        let GraphError::CyclicDependency { services } = err;
        assert!(!services.contains(&"ok".to_string()));
        assert_eq!(services.len(), 2);
    }

    #[test]
    fn test_undeclared_dependency_is_ignored() {
        let nodes = vec![node("app", &["database"])];
        let order = execution_order(&nodes).unwrap();
        assert_eq!(order, vec!["app"]);
    }

    #[test]
    fn test_empty_input_yields_empty_order() {
        assert!(execution_order(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_rerun_is_deterministic() {
        let nodes = vec![
            node("e", &["b"]),
            node("d", &[]),
            node("c", &["d"]),
            node("b", &["d"]),
            node("a", &["c", "b"]),
        ];
        let first = execution_order(&nodes).unwrap();
        for _ in 0..10 {
            assert_eq!(execution_order(&nodes).unwrap(), first);
        }
    }

    // ── property tests ───────────────────────────────────────────────────────

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        /// Generate an acyclic node list by only allowing dependencies on
        /// later-declared services.
        fn acyclic_nodes() -> impl Strategy<Value = Vec<ServiceNode>> {
            (2_usize..8).prop_flat_map(|n| {
                let masks = proptest::collection::vec(any::<u8>(), n);
                masks.prop_map(move |masks| {
                    (0..n)
                        .map(|i| {
                            let deps: Vec<String> = (i + 1..n)
                                .filter(|j| masks[i] & (1 << (j % 8)) != 0)
                                .map(|j| format!("s{j}"))
                                .collect();
                            ServiceNode::new(format!("s{i}"), deps)
                        })
                        .collect()
                })
            })
        }

        proptest! {
            /// Every dependency precedes its dependent in the output.
            #[test]
            fn prop_order_respects_every_edge(nodes in acyclic_nodes()) {
                let order = execution_order(&nodes).expect("acyclic input");
                let idx = |name: &str| order.iter().position(|x| x == name).expect("present");
                for node in &nodes {
                    for dep in &node.depends_on {
                        prop_assert!(idx(dep) < idx(&node.name));
                    }
                }
            }

            /// The output is a permutation of the input names.
            #[test]
            fn prop_order_is_a_permutation(nodes in acyclic_nodes()) {
                let order = execution_order(&nodes).expect("acyclic input");
                prop_assert_eq!(order.len(), nodes.len());
                for node in &nodes {
                    prop_assert!(order.contains(&node.name));
                }
            }

            /// Re-running yields the same order.
            #[test]
            fn prop_order_is_deterministic(nodes in acyclic_nodes()) {
                let first = execution_order(&nodes).expect("acyclic input");
                let second = execution_order(&nodes).expect("acyclic input");
                prop_assert_eq!(first, second);
            }
        }
    }
}
