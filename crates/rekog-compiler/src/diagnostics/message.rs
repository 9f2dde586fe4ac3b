use rowan::TextRange;

/// What went wrong, grouped roughly by compilation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    // Unbalanced `(` or `[`
    UnclosedGroup,
    UnclosedOption,

    // User omitted something required - root cause errors
    ExpectedRuleName,
    ExpectedDefinedAs,
    ExpectedElement,

    // User wrote something that doesn't belong
    UnterminatedString,
    UnexpectedToken,
    NestingTooDeep,

    // Malformed values
    InvalidNumber,
    InvalidRange,
    CodePointTooLarge,
    InvalidRepeat,
    ProseUnsupported,

    // Valid syntax, invalid semantics
    DuplicateDefinition,
    BaseRuleOverride,
    IncrementalUndefined,
    UndefinedReference,
}

impl DiagnosticKind {
    /// Default severity for this kind. Can be overridden per diagnostic.
    pub fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Default hint for this kind, automatically included in diagnostics.
    pub fn default_hint(&self) -> Option<&'static str> {
        match self {
            Self::ExpectedDefinedAs => Some("e.g., `name = element`"),
            Self::NestingTooDeep => Some("flatten the groups or raise the recursion limit"),
            Self::ProseUnsupported => Some("replace the prose with a rule definition"),
            Self::BaseRuleOverride => Some("rename the rule to keep the base definition"),
            _ => None,
        }
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnclosedGroup => "missing closing `)`",
            Self::UnclosedOption => "missing closing `]`",

            Self::ExpectedRuleName => "expected a rule name",
            Self::ExpectedDefinedAs => "expected `=` or `=/`",
            Self::ExpectedElement => "expected an element",

            Self::UnterminatedString => "unterminated string",
            Self::UnexpectedToken => "unexpected token",
            Self::NestingTooDeep => "groups nested too deeply",

            Self::InvalidNumber => "invalid numeric value",
            Self::InvalidRange => "numeric range is empty",
            Self::CodePointTooLarge => "value exceeds U+10FFFF",
            Self::InvalidRepeat => "repeat minimum exceeds its maximum",
            Self::ProseUnsupported => "prose values are not supported",

            Self::DuplicateDefinition => "duplicate definition",
            Self::BaseRuleOverride => "rule shadows a base rule",
            Self::IncrementalUndefined => "`=/` extends an undefined rule",
            Self::UndefinedReference => "undefined reference",
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::DuplicateDefinition => "`{}` is already defined".to_string(),
            Self::BaseRuleOverride => "`{}` is already defined by the base grammar".to_string(),
            Self::IncrementalUndefined => "`{}` must be defined with `=` before `=/`".to_string(),
            Self::UndefinedReference => "`{}` is not defined".to_string(),

            Self::UnclosedGroup | Self::UnclosedOption => {
                format!("{}; {{}}", self.fallback_message())
            }

            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    pub(crate) replacement: String,
    pub(crate) description: String,
}

impl Fix {
    pub fn new(replacement: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            replacement: replacement.into(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) range: TextRange,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(range: TextRange, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    pub(crate) severity: Severity,
    /// The range shown to the user (underlined in output).
    pub(crate) range: TextRange,
    pub(crate) message: String,
    pub(crate) fix: Option<Fix>,
    pub(crate) related: Vec<RelatedInfo>,
    pub(crate) hints: Vec<String>,
}

impl DiagnosticMessage {
    pub(crate) fn new(kind: DiagnosticKind, range: TextRange, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            range,
            message: message.into(),
            fix: None,
            related: Vec::new(),
            hints: kind.default_hint().map(String::from).into_iter().collect(),
        }
    }

    pub(crate) fn with_default_message(kind: DiagnosticKind, range: TextRange) -> Self {
        Self::new(kind, range, kind.fallback_message())
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.severity,
            u32::from(self.range.start()),
            u32::from(self.range.end()),
            self.message
        )?;
        if let Some(fix) = &self.fix {
            write!(f, " (fix: {})", fix.description)?;
        }
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message,
                u32::from(related.range.start()),
                u32::from(related.range.end())
            )?;
        }
        for hint in &self.hints {
            write!(f, " (hint: {})", hint)?;
        }
        Ok(())
    }
}
