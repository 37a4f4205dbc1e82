#[derive(thiserror::Error, Debug)]
pub enum ConfigError<E> {
    #[error("endpoints.{0}")]
    Endpoints(E),

    #[error("signer.{0}")]
    Signer(E),

    #[error("submission.{0}")]
    Submission(E),

    #[error("relay.{0}")]
    Relay(E),

    #[error("coretime.{0}")]
    Coretime(E),

    #[error("renewal.{0}")]
    Renewal(E),
}

#[derive(thiserror::Error, Debug)]
pub enum FieldError<E> {
    #[error("relay: {0}")]
    InvalidRelayEndpoint(E),

    #[error("coretime: {0}")]
    InvalidCoretimeEndpoint(E),

    #[error("collator: {0}")]
    InvalidCollatorEndpoint(E),

    #[error("uri: {0}")]
    InvalidUri(E),

    #[error("finalization_timeout: {0}")]
    InvalidFinalizationTimeout(E),

    #[error("ready_timeout: {0}")]
    InvalidReadyTimeout(E),

    #[error("assignment.parts: {0}")]
    InvalidAssignmentParts(E),

    #[error("broker.region_length: {0}")]
    InvalidRegionLength(E),

    #[error("broker.ideal_bulk_proportion: {0}")]
    InvalidIdealBulkProportion(E),

    #[error("leases: {0}")]
    InvalidLeases(E),

    #[error("beneficiary: {0}")]
    InvalidBeneficiary(E),
}

#[derive(thiserror::Error, Debug)]
pub enum ConversionError {
    #[error("'{0}' is not a valid url: {1}")]
    InvalidUrl(String, String),

    #[error("'{0}' uses scheme '{1}', expected 'ws' or 'wss'")]
    UnsupportedScheme(String, String),

    #[error("unknown batch mode '{0}', expected 'batch' or 'batch_all'")]
    UnknownBatchMode(String),

    #[error("unknown header source '{0}', expected 'latest' or 'genesis'")]
    UnknownHeaderSource(String),
}

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("can't be empty")]
    CantBeEmpty(),

    #[error("can't be zero")]
    CantBeZero(),

    #[error("{0} exceeds the maximum of {1}")]
    ExceedsMaximum(u64, u64),

    #[error("expected exactly {expected} entries, got {actual}")]
    WrongLength { expected: usize, actual: usize },
}
