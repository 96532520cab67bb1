// datasmith-core/src/application/quality.rs

// Derives the Data Metric Function setup script from the contract's quality
// rules. Sections are emitted in a fixed order; apart from the generation
// timestamp banner line the output is a pure function of the model.

use regex::Regex;

use crate::domain::contract::{ColumnSpec, ContractModel};

const BANNER: &str =
    "-- ============================================================================";

/// Tags that mark a column as a key dimension worth cardinality tracking.
const DIMENSION_TAGS: [&str; 5] = ["classification", "segment", "tier", "risk_tier", "geography"];

/// Fallback freshness window when the SLA text cannot be interpreted.
const DEFAULT_FRESHNESS_SECONDS: u64 = 86_400;

/// Minimum expected rows when the contract does not override it.
const DEFAULT_MIN_ROWS: u64 = 500;

// --- GENERATOR SERVICE ---

pub struct QualityRuleGenerator;

impl QualityRuleGenerator {
    /// Emit the quality-monitoring script for a contract.
    pub fn generate(contract: &ContractModel, generated_at: &str) -> String {
        let target = contract.qualified_target();

        // Header + Part 1: schedule (always emitted)
        let mut parts: Vec<String> = vec![
            BANNER.to_string(),
            "-- DATA METRIC FUNCTIONS: Generated from Data Contract".to_string(),
            BANNER.to_string(),
            format!("-- Contract: {} v{}", contract.name, contract.version),
            format!("-- Generated: {}", generated_at),
            "-- Template-based generation from contract quality rules".to_string(),
            BANNER.to_string(),
            String::new(),
            "USE ROLE ACCOUNTADMIN;".to_string(),
            format!("USE DATABASE {};", contract.target.database),
            format!("USE SCHEMA {};", contract.target.schema),
            String::new(),
            BANNER.to_string(),
            "-- PART 1: SET DMF SCHEDULE".to_string(),
            BANNER.to_string(),
            String::new(),
            format!("ALTER TABLE {}", target),
            "    SET DATA_METRIC_SCHEDULE = 'USING CRON 0,30 * * * * UTC';".to_string(),
            String::new(),
        ];

        // Part 2: completeness (NULL_COUNT)
        parts.extend([
            BANNER.to_string(),
            "-- PART 2: COMPLETENESS CHECKS (NULL_COUNT)".to_string(),
            BANNER.to_string(),
            "-- Columns with required: true in contract must not have nulls".to_string(),
            String::new(),
        ]);
        for column in completeness_columns(contract) {
            let expectation = format!("no_null_{}", column).to_lowercase();
            parts.extend([
                format!("ALTER TABLE {}", target),
                "    ADD DATA METRIC FUNCTION SNOWFLAKE.CORE.NULL_COUNT".to_string(),
                format!("    ON ({})", column),
                format!("    EXPECTATION {} (VALUE = 0);", expectation),
                String::new(),
            ]);
        }

        // Part 3: uniqueness (DUPLICATE_COUNT) on the primary key
        if !contract.primary_key.is_empty() {
            let pk = &contract.primary_key;
            parts.extend([
                BANNER.to_string(),
                "-- PART 3: UNIQUENESS CHECK (DUPLICATE_COUNT)".to_string(),
                BANNER.to_string(),
                format!("-- Primary key ({}) must be unique per contract", pk),
                String::new(),
                format!("ALTER TABLE {}", target),
                "    ADD DATA METRIC FUNCTION SNOWFLAKE.CORE.DUPLICATE_COUNT".to_string(),
                format!("    ON ({})", pk),
                format!("    EXPECTATION no_duplicate_{} (VALUE = 0);", pk.to_lowercase()),
                String::new(),
            ]);
        }

        // Part 4: cardinality tracking (UNIQUE_COUNT), informational
        let dimension_columns = cardinality_columns(contract);
        if !dimension_columns.is_empty() {
            parts.extend([
                BANNER.to_string(),
                "-- PART 4: CARDINALITY TRACKING (UNIQUE_COUNT)".to_string(),
                BANNER.to_string(),
                "-- Track distinct values for key dimensions (informational)".to_string(),
                String::new(),
            ]);
            for column in dimension_columns {
                parts.extend([
                    format!("ALTER TABLE {}", target),
                    "    ADD DATA METRIC FUNCTION SNOWFLAKE.CORE.UNIQUE_COUNT".to_string(),
                    format!("    ON ({});", column),
                    String::new(),
                ]);
            }
        }

        // Part 5: freshness SLA, on the first timestamp-like column
        let max_age = &contract.data_quality.freshness_max_age;
        let max_seconds = freshness_seconds(max_age);
        if let Some(ts_column) = freshness_column(contract) {
            parts.extend([
                BANNER.to_string(),
                "-- PART 5: FRESHNESS SLA".to_string(),
                BANNER.to_string(),
                format!("-- Contract SLA: {} (max {} seconds)", max_age, max_seconds),
                String::new(),
                format!("ALTER TABLE {}", target),
                "    ADD DATA METRIC FUNCTION SNOWFLAKE.CORE.FRESHNESS".to_string(),
                format!("    ON ({})", ts_column),
                format!("    EXPECTATION freshness_sla (VALUE <= {});", max_seconds),
                String::new(),
            ]);
        }

        // Part 6: row count threshold (always emitted)
        let row_threshold = row_count_threshold(contract);
        parts.extend([
            BANNER.to_string(),
            "-- PART 6: ROW COUNT THRESHOLD".to_string(),
            BANNER.to_string(),
            format!("-- Minimum expected rows: {}", row_threshold),
            String::new(),
            format!("ALTER TABLE {}", target),
            "    ADD DATA METRIC FUNCTION SNOWFLAKE.CORE.ROW_COUNT".to_string(),
            "    ON ()".to_string(),
            format!("    EXPECTATION min_row_count (VALUE >= {});", row_threshold),
            String::new(),
        ]);

        // Part 7: verification queries (always emitted)
        parts.extend([
            BANNER.to_string(),
            "-- PART 7: VERIFY DMF CONFIGURATION".to_string(),
            BANNER.to_string(),
            String::new(),
            "-- View all DMFs applied".to_string(),
            "SELECT".to_string(),
            "    metric_name,".to_string(),
            "    ref_arguments AS columns,".to_string(),
            "    schedule,".to_string(),
            "    schedule_status".to_string(),
            "FROM TABLE(".to_string(),
            "    INFORMATION_SCHEMA.DATA_METRIC_FUNCTION_REFERENCES(".to_string(),
            format!("        REF_ENTITY_NAME => '{}',", target),
            "        REF_ENTITY_DOMAIN => 'TABLE'".to_string(),
            "    )".to_string(),
            ")".to_string(),
            "ORDER BY metric_name;".to_string(),
            String::new(),
            "-- Run initial quality check".to_string(),
            "SELECT * FROM TABLE(SYSTEM$EVALUATE_DATA_QUALITY_EXPECTATIONS(".to_string(),
            format!("    REF_ENTITY_NAME => '{}'));", target),
            String::new(),
            BANNER.to_string(),
            "-- SETUP COMPLETE".to_string(),
            BANNER.to_string(),
        ]);

        parts.join("\n")
    }
}

// --- RULE DERIVATION ---

/// Union of required columns, 100%-completeness columns and the primary key.
/// The primary key is forced in and always listed first.
fn completeness_columns(contract: &ContractModel) -> Vec<String> {
    let mut columns: Vec<String> = contract
        .columns
        .iter()
        .filter(|c| c.required)
        .map(|c| c.name.clone())
        .collect();

    for target in &contract.data_quality.completeness {
        if target.percent == 100.0 && !columns.contains(&target.column) {
            columns.push(target.column.clone());
        }
    }

    let pk = &contract.primary_key;
    if !pk.is_empty() && !columns.contains(pk) {
        columns.insert(0, pk.clone());
    }

    columns
}

/// Key-dimension columns: tagged with one of the dimension tags, or carrying
/// an enum constraint.
fn cardinality_columns(contract: &ContractModel) -> Vec<&str> {
    contract
        .columns
        .iter()
        .filter(|c| {
            c.tags.iter().any(|tag| DIMENSION_TAGS.contains(&tag.as_str()))
                || c.constraints_text.contains("enum")
        })
        .map(|c| c.name.as_str())
        .collect()
}

/// First column usable as the freshness reference, in declaration order.
fn freshness_column(contract: &ContractModel) -> Option<&str> {
    contract
        .columns
        .iter()
        .find(|c| is_timestamp_like(c))
        .map(|c| c.name.as_str())
}

fn is_timestamp_like(column: &ColumnSpec) -> bool {
    matches!(
        column.data_type.as_str(),
        "timestamp" | "timestamp_ntz" | "timestamp_ltz"
    ) || column.tags.iter().any(|tag| tag == "timestamp")
        || column.name.to_lowercase().contains("calculated_at")
}

/// Interpret the free-text SLA window. Only hour-based texts are understood;
/// anything else (or a failed numeric parse) falls back to the default.
fn freshness_seconds(max_age: &str) -> u64 {
    if !max_age.to_lowercase().contains("hour") {
        return DEFAULT_FRESHNESS_SECONDS;
    }
    match extract_digits(max_age) {
        Some(hours) => hours * 3600,
        None => DEFAULT_FRESHNESS_SECONDS,
    }
}

/// Minimum row count, overridable by a `row_count` monitoring metric. An
/// unparseable threshold silently keeps the previous value.
fn row_count_threshold(contract: &ContractModel) -> u64 {
    let mut threshold = DEFAULT_MIN_ROWS;
    for metric in &contract.data_quality.monitoring_metrics {
        if metric.name == "row_count" {
            if let Some(value) = extract_digits(&metric.threshold) {
                threshold = value;
            }
        }
    }
    threshold
}

/// Concatenate every digit run in the text and parse the result.
fn extract_digits(text: &str) -> Option<u64> {
    let re = Regex::new(r"\d+").ok()?;
    let digits: String = re.find_iter(text).map(|m| m.as_str()).collect();
    digits.parse().ok()
}
