// datasmith-core/src/domain/contract/extractor.rs

// Normalizes a raw contract document into a ContractModel. Extraction is
// permissive by design: every lookup has an explicit default, so a missing
// or partial section never blocks generation. Only a non-mapping document
// (or an absent `spec` section) collapses to an all-default model.

use serde_yaml::Value;
use tracing::debug;

use super::model::{
    AccessControl, BusinessRule, ColumnSpec, CompletenessTarget, ContractModel, DataQualitySpec,
    MaskingPolicy, MonitoringMetric, Owner, Sla, SourceTable, TargetRef,
};

/// Default freshness window applied when the contract declares none.
const DEFAULT_MAX_AGE: &str = "25 hours";

/// Permissive cursor over an optional YAML node.
///
/// Centralizes the defaulted field access: `get` never fails, and the
/// terminal readers (`str_or`, `bool_or`, ...) supply the documented default
/// when the node is absent or has the wrong shape.
#[derive(Clone, Copy)]
struct Node<'a>(Option<&'a Value>);

impl<'a> Node<'a> {
    fn new(value: &'a Value) -> Self {
        Node(Some(value))
    }

    fn get(self, key: &str) -> Node<'a> {
        Node(self.0.and_then(|v| v.get(key)))
    }

    /// String value, stringifying scalars; `default` for anything else.
    fn str_or(self, default: &str) -> String {
        match self.0 {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => default.to_string(),
        }
    }

    fn bool_or(self, default: bool) -> bool {
        match self.0 {
            Some(Value::Bool(b)) => *b,
            _ => default,
        }
    }

    fn f64_or(self, default: f64) -> f64 {
        self.0.and_then(Value::as_f64).unwrap_or(default)
    }

    /// Sequence items, empty for missing or non-sequence nodes.
    fn seq(self) -> &'a [Value] {
        match self.0 {
            Some(Value::Sequence(items)) => items.as_slice(),
            _ => &[],
        }
    }

    /// String items of a sequence; non-string items are skipped.
    fn str_list(self) -> Vec<String> {
        self.seq()
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect()
    }

    /// Mapping entries in document order; non-string keys are skipped.
    fn entries(self) -> Vec<(String, Node<'a>)> {
        match self.0 {
            Some(Value::Mapping(map)) => map
                .iter()
                .filter_map(|(k, v)| k.as_str().map(|key| (key.to_string(), Node::new(v))))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Node serialized back to YAML text (empty when absent).
    fn yaml_text(self) -> String {
        match self.0 {
            Some(v) => serde_yaml::to_string(v)
                .map(|s| s.trim_end().to_string())
                .unwrap_or_default(),
            None => String::new(),
        }
    }
}

/// Build the normalized contract model from a raw document.
pub fn extract_contract(doc: &Value) -> ContractModel {
    let root = Node::new(doc);
    let metadata = root.get("metadata");
    let spec = root.get("spec");
    let info = spec.get("info");
    let destination = spec.get("destination");
    let schema = spec.get("schema");

    let owner_node = info.get("owner");
    let owner = Owner {
        // Accept both `owner: {name, email}` and a bare `owner: someone`.
        name: owner_node.get("name").str_or(&owner_node.str_or("")),
        email: owner_node.get("email").str_or(""),
    };

    let model = ContractModel {
        name: metadata.get("name").str_or("unknown"),
        version: metadata.get("version").str_or("1.0.0"),
        title: info.get("title").str_or(""),
        description: info.get("description").str_or(""),
        owner,
        source_tables: extract_source_tables(spec.get("source").get("upstream_tables")),
        target: TargetRef {
            database: destination.get("database").str_or(""),
            schema: destination.get("schema").str_or(""),
            table: destination.get("table").str_or(""),
            materialization: destination.get("materialization").str_or("table"),
        },
        columns: extract_columns(schema.get("properties")),
        grain: schema.get("grain").str_or(""),
        primary_key: schema.get("primary_key").str_or(""),
        data_quality: extract_data_quality(spec.get("data_quality")),
        masking_policies: extract_masking_policies(spec.get("masking_policies")),
        access_control: AccessControl {
            authorized_roles: spec.get("access_control").get("authorized_roles").str_list(),
        },
        sla: Sla {
            data_freshness: spec.get("sla").get("data_freshness").str_or(""),
        },
    };

    debug!(
        name = %model.name,
        columns = model.columns.len(),
        sources = model.source_tables.len(),
        "Contract extracted"
    );

    model
}

/// Normalize upstream tables to the uniform structured shape.
///
/// When the first list element is a mapping the whole list is read as
/// structured entries. Otherwise each string entry is wrapped, deriving the
/// name from the final dot-separated segment of the location.
fn extract_source_tables(tables: Node<'_>) -> Vec<SourceTable> {
    let entries = tables.seq();
    let structured = entries.first().map(Value::is_mapping).unwrap_or(false);

    if structured {
        entries
            .iter()
            .map(|v| {
                let t = Node::new(v);
                SourceTable {
                    name: t.get("name").str_or(""),
                    location: t.get("location").str_or(""),
                    description: t.get("description").str_or(""),
                    key_columns: t.get("key_columns").str_list(),
                    filter: t.get("filter").str_or(""),
                }
            })
            .collect()
    } else {
        entries
            .iter()
            .filter_map(|v| v.as_str())
            .map(|location| SourceTable {
                name: location.rsplit('.').next().unwrap_or(location).to_string(),
                location: location.to_string(),
                ..SourceTable::default()
            })
            .collect()
    }
}

fn extract_columns(properties: Node<'_>) -> Vec<ColumnSpec> {
    properties
        .entries()
        .into_iter()
        .map(|(name, col)| {
            let constraints = col.get("constraints");
            // `derivation` wins when the key is present (even empty); the
            // legacy `source` field is the fallback.
            let legacy_source = col.get("source").str_or("");
            ColumnSpec {
                name,
                data_type: col.get("type").str_or("string"),
                description: col.get("description").str_or(""),
                derivation: col.get("derivation").str_or(&legacy_source),
                required: constraints.get("required").bool_or(false),
                pii: col.get("pii").bool_or(false),
                tags: col.get("tags").str_list(),
                masking_policy: col.get("masking_policy").str_or(""),
                constraints_text: constraints.yaml_text(),
            }
        })
        .collect()
}

fn extract_data_quality(dq: Node<'_>) -> DataQualitySpec {
    DataQualitySpec {
        completeness: dq
            .get("completeness")
            .entries()
            .into_iter()
            .map(|(column, pct)| CompletenessTarget {
                column,
                percent: pct.f64_or(0.0),
            })
            .collect(),
        freshness_max_age: dq.get("freshness").get("max_age").str_or(DEFAULT_MAX_AGE),
        business_rules: dq
            .get("business_rules")
            .seq()
            .iter()
            .map(|v| {
                let rule = Node::new(v);
                BusinessRule {
                    rule_id: rule.get("rule_id").str_or(""),
                    name: rule.get("name").str_or(""),
                    description: rule.get("description").str_or(""),
                }
            })
            .collect(),
        monitoring_metrics: dq
            .get("monitoring")
            .get("metrics")
            .seq()
            .iter()
            .map(|v| {
                let metric = Node::new(v);
                MonitoringMetric {
                    name: metric.get("name").str_or(""),
                    threshold: metric.get("threshold").str_or(""),
                }
            })
            .collect(),
    }
}

fn extract_masking_policies(policies: Node<'_>) -> Vec<MaskingPolicy> {
    policies
        .entries()
        .into_iter()
        .map(|(name, policy)| MaskingPolicy {
            name,
            data_type: policy.get("data_type").str_or("STRING"),
            applies_to: policy.get("applies_to").str_or(""),
            description: policy.get("description").str_or(""),
            behavior: policy.get("behavior").str_or(""),
            authorized_roles: policy.get("authorized_roles").str_list(),
        })
        .collect()
}
