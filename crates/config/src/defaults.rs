// Listener defaults
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_port() -> u16 {
    8080
}

// Store defaults
pub fn default_store_backend() -> String {
    "memory".to_string()
}

pub fn default_mongo_uri() -> String {
    "mongodb://localhost".to_string()
}

pub fn default_mongo_database() -> String {
    "ballots".to_string()
}

pub fn default_mongo_collection() -> String {
    "polls".to_string()
}

/// Development key accepted when no key is configured.
pub const DEV_API_KEY: &str = "abc123ABC";

pub fn default_api_key() -> String {
    DEV_API_KEY.to_string()
}

// Logging defaults
pub fn default_log_format() -> String {
    "pretty".to_string()
}
