use cloudinit_core_types::RequestId;
use thiserror::Error;

/// Result type alias using RenderError
pub type Result<T> = std::result::Result<T, RenderError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure surfaced by the renderer, the engine or the CLI maps onto
/// one of these kinds. The code returned by [`ExErrorKind::code`] is stable
/// and is what ends up in status conditions and log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Resolution
    ReferenceNotFound,
    KeyNotFound,
    Cancelled,
    Lookup,

    // Encoding
    NoParts,
    InvalidBoundary,
    GzipRequiresBase64,
    NonTextOutput,
    Compression,
    InvalidHeaderValue,

    // Declared input
    InvalidConfig,

    // Object store
    NotFound,
    AlreadyExists,
    Persistence,

    // CLI input files
    Serialization,
    Io,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::ReferenceNotFound => "ERR_REFERENCE_NOT_FOUND",
            ExErrorKind::KeyNotFound => "ERR_KEY_NOT_FOUND",
            ExErrorKind::Cancelled => "ERR_CANCELLED",
            ExErrorKind::Lookup => "ERR_LOOKUP",
            ExErrorKind::NoParts => "ERR_NO_PARTS",
            ExErrorKind::InvalidBoundary => "ERR_INVALID_BOUNDARY",
            ExErrorKind::GzipRequiresBase64 => "ERR_GZIP_REQUIRES_BASE64",
            ExErrorKind::NonTextOutput => "ERR_NON_TEXT_OUTPUT",
            ExErrorKind::Compression => "ERR_COMPRESSION",
            ExErrorKind::InvalidHeaderValue => "ERR_INVALID_HEADER_VALUE",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Io => "ERR_IO",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus whatever context was available where the
/// error was raised: the operation, the offending part index and the
/// referenced object.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    part_index: Option<usize>,
    object: Option<String>,
    request_id: Option<RequestId>,
    message: String,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            part_index: None,
            object: None,
            request_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the index of the part that failed
    pub fn with_part_index(mut self, index: usize) -> Self {
        self.part_index = Some(index);
        self
    }

    /// Add the referenced object, formatted as `<kind> <namespace>/<name>`
    pub fn with_object(mut self, object: impl Into<String>) -> Self {
        self.object = Some(object.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn part_index(&self) -> Option<usize> {
        self.part_index
    }

    pub fn object(&self) -> Option<&str> {
        self.object.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

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
        if let Some(index) = self.part_index {
            write!(f, " (part: {})", index)?;
        }
        if let Some(object) = &self.object {
            write!(f, " (object: {})", object)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Failure to turn a declared part into concrete bytes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// A non-optional reference points at an object that does not exist
    #[error("part {index}: referenced object {reference} not found")]
    ReferenceNotFound { index: usize, reference: String },

    /// The referenced object exists but lacks the key
    #[error("part {index}: key '{key}' not found in {reference}")]
    KeyNotFound {
        index: usize,
        reference: String,
        key: String,
    },

    /// The caller cancelled the render or its deadline passed
    #[error("part {index}: render cancelled")]
    Cancelled { index: usize },

    /// The lookup backend failed for a reason other than not-found
    #[error("part {index}: cannot read {reference}: {message}")]
    Lookup {
        index: usize,
        reference: String,
        message: String,
    },
}

impl ResolutionError {
    pub fn part_index(&self) -> usize {
        match self {
            ResolutionError::ReferenceNotFound { index, .. }
            | ResolutionError::KeyNotFound { index, .. }
            | ResolutionError::Cancelled { index }
            | ResolutionError::Lookup { index, .. } => *index,
        }
    }
}

/// Failure to assemble or encode the document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("no parts found in the cloud-init declaration")]
    NoParts,

    #[error("invalid MIME boundary {boundary:?}: {reason}")]
    InvalidBoundary {
        boundary: String,
        reason: &'static str,
    },

    #[error("base64 encoding is mandatory when gzip is enabled")]
    GzipRequiresBase64,

    /// Output is not valid UTF-8 and base64 encoding is off
    #[error("document is not valid text at byte {valid_up_to}; enable base64 encoding")]
    NonTextOutput { valid_up_to: usize },

    #[error("gzip compression failed: {message}")]
    Compression { message: String },

    /// A part's metadata would break out of its header line
    #[error("part {index}: invalid {header} value: {reason}")]
    InvalidHeaderValue {
        index: usize,
        header: &'static str,
        reason: &'static str,
    },
}

/// Failure to read the declared input surface
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A part declares both a config-object and a secret-object reference
    #[error("part {index}: configMapKeyRef and secretKeyRef are mutually exclusive")]
    AmbiguousReference { index: usize },

    #[error("cannot parse declaration: {message}")]
    Parse { message: String },
}

/// Everything `render` can fail with
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::Parse {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse {
            message: err.to_string(),
        }
    }
}

impl From<ResolutionError> for ExError {
    fn from(err: ResolutionError) -> Self {
        let message = err.to_string();
        match err {
            ResolutionError::ReferenceNotFound { index, reference } => {
                ExError::new(ExErrorKind::ReferenceNotFound)
                    .with_op("resolve")
                    .with_part_index(index)
                    .with_object(reference)
                    .with_message(message)
            }
            ResolutionError::KeyNotFound {
                index, reference, ..
            } => ExError::new(ExErrorKind::KeyNotFound)
                .with_op("resolve")
                .with_part_index(index)
                .with_object(reference)
                .with_message(message),
            ResolutionError::Cancelled { index } => ExError::new(ExErrorKind::Cancelled)
                .with_op("resolve")
                .with_part_index(index)
                .with_message(message),
            ResolutionError::Lookup {
                index, reference, ..
            } => ExError::new(ExErrorKind::Lookup)
                .with_op("resolve")
                .with_part_index(index)
                .with_object(reference)
                .with_message(message),
        }
    }
}

impl From<EncodeError> for ExError {
    fn from(err: EncodeError) -> Self {
        let kind = match &err {
            EncodeError::NoParts => ExErrorKind::NoParts,
            EncodeError::InvalidBoundary { .. } => ExErrorKind::InvalidBoundary,
            EncodeError::GzipRequiresBase64 => ExErrorKind::GzipRequiresBase64,
            EncodeError::NonTextOutput { .. } => ExErrorKind::NonTextOutput,
            EncodeError::Compression { .. } => ExErrorKind::Compression,
            EncodeError::InvalidHeaderValue { .. } => ExErrorKind::InvalidHeaderValue,
        };
        let ex = ExError::new(kind)
            .with_op("encode")
            .with_message(err.to_string());
        match err {
            EncodeError::InvalidHeaderValue { index, .. } => ex.with_part_index(index),
            _ => ex,
        }
    }
}

impl From<ConfigError> for ExError {
    fn from(err: ConfigError) -> Self {
        let ex = ExError::new(ExErrorKind::InvalidConfig)
            .with_op("parse_config")
            .with_message(err.to_string());
        match err {
            ConfigError::AmbiguousReference { index } => ex.with_part_index(index),
            ConfigError::Parse { .. } => ex,
        }
    }
}

impl From<RenderError> for ExError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Config(e) => e.into(),
            RenderError::Resolution(e) => e.into(),
            RenderError::Encode(e) => e.into(),
        }
    }
}
