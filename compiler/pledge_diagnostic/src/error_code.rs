use std::fmt;

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where the first digit indicates the phase:
/// - E0xxx: Lexer errors
/// - E1xxx: Parser errors
/// - E2xxx: Semantic resolution errors
///
/// Only the resolution range is allocated here; earlier phases live in
/// their own crates and reserve their ranges.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Semantic Resolution Errors (E2xxx)
    /// Type name declared twice
    E2001,
    /// Referenced type not found
    E2002,
    /// Duplicate field name
    E2003,
    /// Duplicate constant name
    E2004,
    /// Serialization hint on a trait field
    E2005,
    /// Illegal modifier on a native function
    E2006,
    /// Conflicting function modifiers
    E2007,
    /// Modifier requires the function to be bound to a type
    E2008,
    /// `virtual` outside a trait
    E2009,
    /// `overrides` outside a contract
    E2010,
    /// Malformed `extends` receiver argument
    E2011,
    /// `mutating` without `extends`
    E2012,
    /// Reserved or duplicate argument name
    E2013,
    /// Type reference cannot be resolved in this position
    E2014,
    /// Duplicate function name within one owner
    E2015,
    /// Second `init` declaration
    E2016,
    /// Contract without `init`
    E2017,
    /// Struct without fields
    E2018,
    /// Receiver argument has an unacceptable shape
    E2019,
    /// Duplicate receiver for the same dispatch key
    E2020,
    /// External receivers disabled by configuration
    E2021,
    /// Empty comment-receiver text
    E2022,
    /// Named trait missing or not trait-kind
    E2023,
    /// Circular trait dependency
    E2024,
    /// Trait field requirement not met
    E2025,
    /// Invalid `overrides` signature
    E2026,
    /// Static function/constant name collision
    E2027,
    /// Invalid serialization hint
    E2028,
    /// Constant expression rejected
    E2029,
}

impl ErrorCode {
    /// The code as it appears in rendered output, e.g. `"E2001"`.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            ErrorCode::E2007 => "E2007",
            ErrorCode::E2008 => "E2008",
            ErrorCode::E2009 => "E2009",
            ErrorCode::E2010 => "E2010",
            ErrorCode::E2011 => "E2011",
            ErrorCode::E2012 => "E2012",
            ErrorCode::E2013 => "E2013",
            ErrorCode::E2014 => "E2014",
            ErrorCode::E2015 => "E2015",
            ErrorCode::E2016 => "E2016",
            ErrorCode::E2017 => "E2017",
            ErrorCode::E2018 => "E2018",
            ErrorCode::E2019 => "E2019",
            ErrorCode::E2020 => "E2020",
            ErrorCode::E2021 => "E2021",
            ErrorCode::E2022 => "E2022",
            ErrorCode::E2023 => "E2023",
            ErrorCode::E2024 => "E2024",
            ErrorCode::E2025 => "E2025",
            ErrorCode::E2026 => "E2026",
            ErrorCode::E2027 => "E2027",
            ErrorCode::E2028 => "E2028",
            ErrorCode::E2029 => "E2029",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
