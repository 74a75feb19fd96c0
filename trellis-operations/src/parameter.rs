//! Parameter metadata, derived from operation struct fields

/// JSON-ish type of a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
}

impl ParamType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
        }
    }
}

/// Metadata about one operation parameter
#[derive(Debug, Clone)]
pub struct ParamMeta {
    pub name: &'static str,
    /// Taken from the field's doc comment
    pub description: &'static str,
    pub param_type: ParamType,
    /// Non-`Option` fields are required
    pub required: bool,
    /// Optional single-character CLI flag
    pub short: Option<char>,
}

impl ParamMeta {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            description: "",
            param_type: ParamType::String,
            required: false,
            short: None,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn description(mut self, desc: &'static str) -> Self {
        self.description = desc;
        self
    }

    pub const fn param_type(mut self, t: ParamType) -> Self {
        self.param_type = t;
        self
    }

    pub const fn short(mut self, c: Option<char>) -> Self {
        self.short = c;
        self
    }
}
