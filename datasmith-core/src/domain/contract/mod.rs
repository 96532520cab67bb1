// datasmith-core/src/domain/contract/mod.rs

pub mod extractor;
pub mod model;

pub use extractor::extract_contract;
pub use model::{
    AccessControl, BusinessRule, ColumnSpec, CompletenessTarget, ContractModel, DataQualitySpec,
    MaskingPolicy, MonitoringMetric, Owner, Sla, SourceTable, TargetRef,
};
