pub mod json_api;

pub use json_api::{
    apply_action, apply_action_json, match_report_json, ActionEffect, ActionRequest,
    ActionResponse, MatchAction, MatchReport, ReportRequest, API_SCHEMA_VERSION,
};

pub mod error_codes {
    pub const INVALID_JSON: &str = "INVALID_JSON";
    pub const UNSUPPORTED_SCHEMA: &str = "UNSUPPORTED_SCHEMA";
    pub const READ_ONLY: &str = "READ_ONLY";
    pub const BLOCKED: &str = "BLOCKED";
    pub const EMPTY_UNDO: &str = "EMPTY_UNDO";
    pub const INVALID_TRANSITION: &str = "INVALID_TRANSITION";
    pub const INVALID_SETUP: &str = "INVALID_SETUP";
    pub const INVALID_TOSS: &str = "INVALID_TOSS";
    pub const INVALID_DELIVERY: &str = "INVALID_DELIVERY";
    pub const INVALID_STATE: &str = "INVALID_STATE";
    pub const SERIALIZATION: &str = "SERIALIZATION";
}
