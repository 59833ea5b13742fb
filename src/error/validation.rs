use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid header format: '{value}'. Expected 'Key: Value'")]
    InvalidHeaderFormat { value: String },
    #[error("Invalid boolean '{value}'. Expected true/false, yes/no, on/off, or 1/0.")]
    InvalidBoolean { value: String },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Value must be >= {min}.")]
    ValueTooSmall { min: u64 },
    #[error("Invalid value: {source}")]
    InvalidNumber {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Invalid environment '{value}'. Use production or staging.")]
    InvalidEnvironment { value: String },
    #[error("Invalid plan type '{value}'. Use starter or enterprise.")]
    InvalidPlanType { value: String },
    #[error("Missing request body (set --request or provide in config).")]
    MissingRequest,
    #[error("Request must be a valid JSON-RPC body: {source}")]
    InvalidRequestJson {
        #[source]
        source: serde_json::Error,
    },
    #[error("Missing {flag} (required unless --override-url is set).")]
    MissingTargetFlag { flag: &'static str },
    #[error("Enterprise plans require an explicit worker count (--workers).")]
    EnterpriseRequiresWorkers,
    #[error("{variable} is not set. Add it to the environment or the env file.")]
    MissingAppId { variable: &'static str },
    #[error("{variable} still holds the placeholder '{value}'. Set a real Portal App ID.")]
    PlaceholderAppId {
        variable: &'static str,
        value: String,
    },
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
