use crate::*;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("auth.api_key is required")]
    MissingApiKey,

    #[error("{field} references environment variable '{var}', which is not set")]
    UnresolvedEnvVar { field: String, var: String },

    #[error("server.port must be between 1 and 65535")]
    InvalidPort,

    #[error("server.host is required")]
    MissingHost,

    #[error("store.mongo.{field} is required for the mongo backend")]
    MissingMongoField { field: String },
}

#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct DefaultApplied {
    pub field: String,
    pub value: String,
}

#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
    pub defaults_applied: Vec<DefaultApplied>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, field: &str, message: &str) {
        self.warnings.push(ValidationWarning {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn add_default(&mut self, field: &str, value: &str) {
        self.defaults_applied.push(DefaultApplied {
            field: field.to_string(),
            value: value.to_string(),
        });
    }
}

pub fn validate_config(config: &BallotsConfig) -> ValidationReport {
    let mut report = ValidationReport::new();
    let unset = &config.unresolved_env_vars;

    validate_listen(&config.server, unset, &mut report);
    validate_store(&config.store, unset, &mut report);
    validate_auth(&config.auth, unset, &mut report);

    report
}

/// First unset variable whose placeholder survived into `value`.
///
/// Only variables recorded while loading the file count, so a literal `$`
/// in a value supplied on the command line is never mistaken for one.
fn unresolved_in<'a>(value: &str, unset: &'a [String]) -> Option<&'a str> {
    unset
        .iter()
        .map(String::as_str)
        .find(|var| contains_placeholder(value, var))
}

fn check_unresolved(field: &str, value: &str, unset: &[String], report: &mut ValidationReport) -> bool {
    match unresolved_in(value, unset) {
        Some(var) => {
            report.add_error(ValidationError::UnresolvedEnvVar {
                field: field.to_string(),
                var: var.to_string(),
            });
            true
        }
        None => false,
    }
}

fn validate_listen(server: &ListenConfig, unset: &[String], report: &mut ValidationReport) {
    if server.host.trim().is_empty() {
        report.add_error(ValidationError::MissingHost);
    } else {
        check_unresolved("server.host", &server.host, unset, report);
    }

    if server.port == 0 {
        report.add_error(ValidationError::InvalidPort);
    } else if server.port == default_port() {
        report.add_default("server.port", &server.port.to_string());
    }
}

fn validate_store(store: &StoreConfig, unset: &[String], report: &mut ValidationReport) {
    if store.backend == default_store_backend() {
        report.add_default("store.backend", &store.backend);
    }

    if !store.is_mongo() {
        return;
    }

    let mongo = &store.mongo;
    for (field, value) in [
        ("uri", &mongo.uri),
        ("database", &mongo.database),
        ("collection", &mongo.collection),
    ] {
        if value.trim().is_empty() {
            report.add_error(ValidationError::MissingMongoField {
                field: field.to_string(),
            });
        } else {
            check_unresolved(&format!("store.mongo.{}", field), value, unset, report);
        }
    }
}

fn validate_auth(auth: &AuthConfig, unset: &[String], report: &mut ValidationReport) {
    if auth.api_key.is_empty() {
        report.add_error(ValidationError::MissingApiKey);
        return;
    }

    if check_unresolved("auth.api_key", &auth.api_key, unset, report) {
        return;
    }

    if auth.api_key == DEV_API_KEY {
        report.add_warning(
            "auth.api_key",
            "using the built-in development key; set auth.api_key for production",
        );
    }
}
