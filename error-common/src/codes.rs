// Error codes implementation
// Stable codes attached to every engine error so that callers and log
// pipelines can match on them without parsing messages.

pub mod registry {
    pub const DUPLICATE_PATH: &str = "REGISTRY_1001";
    pub const UNKNOWN_FIELD: &str = "REGISTRY_1002";
    pub const INVALID_DEFINITION: &str = "REGISTRY_1003";
    pub const UNSUPPORTED_VERSION: &str = "REGISTRY_1004";
}

pub mod config {
    pub const LOAD_FAILED: &str = "CONFIG_2001";
    pub const VALIDATION_FAILED: &str = "CONFIG_2002";
}

pub mod input {
    pub const MALFORMED_DOCUMENT: &str = "INPUT_3001";
    pub const INVALID_REQUEST: &str = "INPUT_3002";
}

pub mod connector {
    pub const UNAVAILABLE: &str = "CONNECTOR_4001";
    pub const FAILED: &str = "CONNECTOR_4002";
}

pub mod system {
    pub const IO: &str = "SYSTEM_5001";
    pub const SERIALIZATION: &str = "SYSTEM_5002";
}
