use thiserror::Error;

/// Result type alias using DateError
pub type Result<T> = std::result::Result<T, DateError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Resolution
    NotFound,
    NotRegistered,
    InvalidOverride,

    // Caller input
    InvalidInput,

    // Setup
    NotInitialized,
    Configuration,
    ConnectionInUse,

    // Integration/IO
    Persistence,
    Io,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::NotRegistered => "ERR_NOT_REGISTERED",
            ExErrorKind::InvalidOverride => "ERR_INVALID_OVERRIDE",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotInitialized => "ERR_NOT_INITIALIZED",
            ExErrorKind::Configuration => "ERR_CONFIGURATION",
            ExErrorKind::ConnectionInUse => "ERR_CONNECTION_IN_USE",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Io => "ERR_IO",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling and rich context
/// (segment, date, argument field) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    segment: Option<String>,
    date: Option<String>,
    field: Option<ArgumentField>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            segment: None,
            date: None,
            field: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add segment context
    pub fn with_segment(mut self, segment: impl Into<String>) -> Self {
        self.segment = Some(segment.into());
        self
    }

    /// Add date context (the raw, possibly malformed, value)
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Add the offending argument field
    pub fn with_field(mut self, field: ArgumentField) -> Self {
        self.field = Some(field);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the segment context, if any
    pub fn segment(&self) -> Option<&str> {
        self.segment.as_deref()
    }

    /// Get the date context, if any
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    /// Get the offending argument field, if any
    pub fn field(&self) -> Option<ArgumentField> {
        self.field
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(segment) = &self.segment {
            write!(f, " (segment: {})", segment)?;
        }
        if let Some(date) = &self.date {
            write!(f, " (date: {})", date)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Which argument was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentField {
    Segment,
    Date,
    /// Id of a string resource
    ResourceId,
    /// Language of a string resource value
    Lang,
}

impl ArgumentField {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArgumentField::Segment => "segment",
            ArgumentField::Date => "date",
            ArgumentField::ResourceId => "id",
            ArgumentField::Lang => "lang",
        }
    }
}

impl std::fmt::Display for ArgumentField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error taxonomy for business date operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DateError {
    // ===== Resolution Errors =====
    /// Segment has no row in the business date table (read or write path)
    #[error("segment was not found. segment:{segment}.")]
    SegmentNotFound { segment: String },

    /// Business date table holds no rows at all
    #[error("business date was not registered.")]
    NotRegistered,

    /// Configured override is not a valid `yyyyMMdd` calendar date
    #[error("business date override was invalid. date=[{date}] segment=[{segment}]")]
    InvalidOverride { date: String, segment: String },

    // ===== Argument Errors =====
    /// A required argument was not supplied
    #[error("{field} was null.")]
    MissingArgument { field: ArgumentField },

    /// A required argument was supplied but empty
    #[error("{field} was empty.")]
    EmptyArgument { field: ArgumentField },

    /// Date argument is not a valid `yyyyMMdd` calendar date
    #[error("date was not formatted 'yyyyMMdd' or non existent date. date:{value}.")]
    MalformedDate { value: String },

    // ===== Setup Errors =====
    /// Provider or loader used before `initialize` compiled its queries
    #[error("queries were not initialized; call initialize first")]
    NotInitialized,

    /// Provider or settings configuration is unusable
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// A unit of work tried to register a connection name twice
    #[error("database connection name is already used. connection name=[{name}]")]
    ConnectionInUse { name: String },

    // ===== Integration Errors =====
    /// Underlying row store failed
    #[error("persistence failure in {op}: {message}")]
    Persistence { op: String, message: String },

    /// Filesystem failure
    #[error("io failure in {op}: {message}")]
    Io { op: String, message: String },
}

impl DateError {
    /// True for the invalid-argument class (null, empty or malformed input)
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            DateError::MissingArgument { .. }
                | DateError::EmptyArgument { .. }
                | DateError::MalformedDate { .. }
        )
    }

    /// True for configuration errors a caller may reasonably recover from
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            DateError::SegmentNotFound { .. } | DateError::NotRegistered
        )
    }

    /// Get the canonical kind of this error
    pub fn kind(&self) -> ExErrorKind {
        match self {
            DateError::SegmentNotFound { .. } => ExErrorKind::NotFound,
            DateError::NotRegistered => ExErrorKind::NotRegistered,
            DateError::InvalidOverride { .. } => ExErrorKind::InvalidOverride,
            DateError::MissingArgument { .. }
            | DateError::EmptyArgument { .. }
            | DateError::MalformedDate { .. } => ExErrorKind::InvalidInput,
            DateError::NotInitialized => ExErrorKind::NotInitialized,
            DateError::InvalidConfiguration { .. } => ExErrorKind::Configuration,
            DateError::ConnectionInUse { .. } => ExErrorKind::ConnectionInUse,
            DateError::Persistence { .. } => ExErrorKind::Persistence,
            DateError::Io { .. } => ExErrorKind::Io,
        }
    }
}

impl From<DateError> for ExError {
    fn from(err: DateError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        let ex = ExError::new(kind).with_message(message);
        match err {
            DateError::SegmentNotFound { segment } => ex.with_segment(segment),
            DateError::NotRegistered => ex,
            DateError::InvalidOverride { date, segment } => {
                ex.with_segment(segment).with_date(date)
            }
            DateError::MissingArgument { field } | DateError::EmptyArgument { field } => {
                ex.with_field(field)
            }
            DateError::MalformedDate { value } => {
                ex.with_field(ArgumentField::Date).with_date(value)
            }
            DateError::NotInitialized
            | DateError::InvalidConfiguration { .. }
            | DateError::ConnectionInUse { .. } => ex,
            DateError::Persistence { op, .. } | DateError::Io { op, .. } => ex.with_op(op),
        }
    }
}
