//! Query payload decoding and lexical SQL extraction

mod query_payload;
mod sql_extractor;

pub use query_payload::{
    normalize_record, NormalizedRecord, QueryCategory, QueryFacts, QueryMetadata, QueryPayload,
    CATEGORIES_NOT_AVAILABLE, COMMAND_NOT_AVAILABLE, ID_NOT_AVAILABLE, TYPE_NOT_AVAILABLE,
    UNNAMED_QUERY,
};
pub use sql_extractor::{
    attribute_from_clause, extract_attribute_names, extract_case_descriptions,
    extract_sql_details, extract_table_names, SqlDetails, CASE_DESCRIPTION_PREFIX,
    WILDCARD_ATTRIBUTE,
};
