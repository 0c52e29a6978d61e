//! Graph export of a projected document.
//!
//! Turns a [`KbDocument`] into nodes and edges for graph databases and
//! NetworkX:
//!
//! ```text
//!   entity/event           -> node (label = type, name = mention text)
//!   relation R(arg1, arg2) -> arg1 -[R]-> arg2
//!   event E, argument r:X  -> E -[r]-> X
//!   coreference {A, B, C}  -> A -[COREF]-> B, A -[COREF]-> C
//! ```
//!
//! # Usage
//!
//! ```rust
//! use bratkb::config::EntityTypes;
//! use bratkb::graph::GraphDocument;
//! use bratkb::parse::StandoffParser;
//! use bratkb::project::project;
//!
//! let doc = StandoffParser::default()
//!     .parse_str("d", "EGFR binds HER2", "T1\tProtein 0 4\tEGFR\nT2\tProtein 11 15\tHER2\nR1\tInteracts Arg1:T1 Arg2:T2")
//!     .unwrap();
//! let graph = GraphDocument::from_kb(&project(&doc, &EntityTypes::new(["Protein"])));
//!
//! assert_eq!(graph.node_count(), 2);
//! assert!(graph.to_cypher().contains("[:Interacts]"));
//! ```

use crate::{KbDocument, Offset};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Relation label of coreference edges.
pub const COREF_RELATION: &str = "COREF";

/// Node kind recorded in the `kind` property.
const ENTITY_KIND: &str = "entity";
const EVENT_KIND: &str = "event";

/// A node in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Prefixed record id.
    pub id: String,
    /// Node label (entity or event type).
    pub node_type: String,
    /// Display name (mention or trigger text).
    pub name: String,
    /// Additional properties.
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl GraphNode {
    /// Create a new graph node.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        node_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            name: name.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Add a property to the node.
    #[must_use]
    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    fn with_span(self, offsets: &[Offset]) -> Self {
        match (offsets.first(), offsets.last()) {
            (Some(&(start, _)), Some(&(_, end))) => {
                self.with_property("start", start).with_property("end", end)
            }
            _ => self,
        }
    }
}

/// A directed edge in the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Source node id.
    pub source: String,
    /// Target node id.
    pub target: String,
    /// Relation type or argument role.
    pub relation: String,
    /// Additional properties.
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl GraphEdge {
    /// Create a new graph edge.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        relation: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            relation: relation.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Add a property to the edge.
    #[must_use]
    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// A graph ready for export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Entity and event nodes.
    pub nodes: Vec<GraphNode>,
    /// Relation, argument and coreference edges.
    pub edges: Vec<GraphEdge>,
    /// Graph-level metadata.
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl GraphDocument {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph of a projected document.
    ///
    /// Edges whose endpoints are not nodes (dangling references) are kept;
    /// graph databases create them as bare nodes or skip them.
    #[must_use]
    pub fn from_kb(doc: &KbDocument) -> Self {
        let mut graph = Self::new();
        graph
            .metadata
            .insert("document_id".into(), doc.document_id.clone().into());

        for entity in &doc.entities {
            let mut node = GraphNode::new(&entity.id, &entity.entity_type, entity.text.join(" "))
                .with_property("kind", ENTITY_KIND)
                .with_span(&entity.offsets);
            if let Some(db) = entity.normalized.first() {
                node = node.with_property("kb_id", format!("{}:{}", db.db_name, db.db_id));
            }
            graph.nodes.push(node);
        }

        for event in &doc.events {
            graph.nodes.push(
                GraphNode::new(&event.id, &event.event_type, event.trigger.text.join(" "))
                    .with_property("kind", EVENT_KIND)
                    .with_span(&event.trigger.offsets),
            );
            for arg in &event.arguments {
                graph
                    .edges
                    .push(GraphEdge::new(&event.id, &arg.ref_id, &arg.role));
            }
        }

        for relation in &doc.relations {
            graph.edges.push(
                GraphEdge::new(&relation.arg1_id, &relation.arg2_id, &relation.relation_type)
                    .with_property("id", relation.id.clone()),
            );
        }

        for coref in &doc.coreferences {
            if let Some((first, rest)) = coref.entity_ids.split_first() {
                for other in rest {
                    graph.edges.push(
                        GraphEdge::new(first, other, COREF_RELATION)
                            .with_property("cluster", coref.id.clone()),
                    );
                }
            }
        }

        graph
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// True if there are no nodes and no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Edges whose source or target is not a node.
    pub fn dangling_edges(&self) -> impl Iterator<Item = &GraphEdge> {
        let ids: HashSet<&str> = self.nodes.iter().map(|n| n.id.as_str()).collect();
        self.edges
            .iter()
            .filter(move |e| !ids.contains(e.source.as_str()) || !ids.contains(e.target.as_str()))
    }

    /// Export to Neo4j Cypher statements.
    #[must_use]
    pub fn to_cypher(&self) -> String {
        let mut cypher = String::new();

        for node in &self.nodes {
            cypher.push_str(&format!(
                "CREATE (n{}:{} {{id: '{}'{}}});\n",
                sanitize_cypher_name(&node.id),
                sanitize_cypher_name(&node.node_type),
                escape_cypher_string(&node.id),
                format_cypher_props(&node.properties, Some(&node.name)),
            ));
        }

        cypher.push('\n');

        for edge in &self.edges {
            cypher.push_str(&format!(
                "MATCH (a {{id: '{}'}}), (b {{id: '{}'}}) CREATE (a)-[:{}{}]->(b);\n",
                escape_cypher_string(&edge.source),
                escape_cypher_string(&edge.target),
                sanitize_cypher_name(&edge.relation),
                wrap_edge_props(&format_cypher_props(&edge.properties, None)),
            ));
        }

        cypher
    }

    /// Export to NetworkX node-link JSON.
    ///
    /// Load with:
    /// ```python
    /// import json, networkx as nx
    /// G = nx.node_link_graph(json.load(open('graph.json')))
    /// ```
    #[must_use]
    pub fn to_networkx_json(&self) -> String {
        #[derive(Serialize)]
        struct NetworkXGraph<'a> {
            directed: bool,
            multigraph: bool,
            graph: &'a BTreeMap<String, serde_json::Value>,
            nodes: Vec<NetworkXNode<'a>>,
            links: Vec<NetworkXLink<'a>>,
        }

        #[derive(Serialize)]
        struct NetworkXNode<'a> {
            id: &'a str,
            #[serde(rename = "type")]
            node_type: &'a str,
            name: &'a str,
            #[serde(flatten)]
            properties: &'a BTreeMap<String, serde_json::Value>,
        }

        #[derive(Serialize)]
        struct NetworkXLink<'a> {
            source: &'a str,
            target: &'a str,
            relation: &'a str,
            #[serde(flatten)]
            properties: &'a BTreeMap<String, serde_json::Value>,
        }

        let graph = NetworkXGraph {
            directed: true,
            // Events may have several arguments pointing at the same node.
            multigraph: true,
            graph: &self.metadata,
            nodes: self
                .nodes
                .iter()
                .map(|n| NetworkXNode {
                    id: &n.id,
                    node_type: &n.node_type,
                    name: &n.name,
                    properties: &n.properties,
                })
                .collect(),
            links: self
                .edges
                .iter()
                .map(|e| NetworkXLink {
                    source: &e.source,
                    target: &e.target,
                    relation: &e.relation,
                    properties: &e.properties,
                })
                .collect(),
        };

        serde_json::to_string_pretty(&graph).unwrap_or_else(|_| "{}".to_string())
    }

    /// Export to the given format.
    #[must_use]
    pub fn export(&self, format: GraphExportFormat) -> String {
        match format {
            GraphExportFormat::Cypher => self.to_cypher(),
            GraphExportFormat::NetworkXJson => self.to_networkx_json(),
        }
    }
}

/// Supported graph export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphExportFormat {
    /// Neo4j Cypher statements.
    Cypher,
    /// NetworkX node-link JSON.
    NetworkXJson,
}

/// Format properties as `, key: value` pairs, `name` first when given.
fn format_cypher_props(props: &BTreeMap<String, serde_json::Value>, name: Option<&str>) -> String {
    let mut parts = Vec::new();
    if let Some(name) = name {
        parts.push(format!("name: '{}'", escape_cypher_string(name)));
    }

    for (key, value) in props {
        let formatted = match value {
            serde_json::Value::String(s) => format!("{}: '{}'", key, escape_cypher_string(s)),
            serde_json::Value::Number(n) => format!("{}: {}", key, n),
            serde_json::Value::Bool(b) => format!("{}: {}", key, b),
            _ => continue,
        };
        parts.push(formatted);
    }

    if parts.is_empty() {
        String::new()
    } else {
        format!(", {}", parts.join(", "))
    }
}

fn wrap_edge_props(props: &str) -> String {
    match props.strip_prefix(", ") {
        Some(inner) => format!(" {{{inner}}}"),
        None => String::new(),
    }
}

/// Escape special characters in Cypher strings.
fn escape_cypher_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Sanitize names for Cypher identifiers.
fn sanitize_cypher_name(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
