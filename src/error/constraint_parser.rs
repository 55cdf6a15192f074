use std::sync::OnceLock;

use regex::Regex;

/// Utility for parsing PostgreSQL constraint violation messages.
///
/// Unique indexes in this schema may be built on expressions such as
/// `LOWER(name)`, so the parser unwraps function calls and casts to find the
/// underlying column.
pub struct ConstraintParser;

/// Compiled regex patterns for constraint parsing, cached for performance
struct RegexPatterns {
    key_value: Regex,
    column_name: Regex,
    table_name: Regex,
    expression_column: Regex,
}

impl RegexPatterns {
    fn new() -> Option<Self> {
        Some(Self {
            // "Key (lower(name::text))=(beach house) already exists"
            key_value: Regex::new(r"Key \((.+)\)=\((.*)\) already exists").ok()?,
            column_name: Regex::new(r#"column "([^"]+)""#).ok()?,
            table_name: Regex::new(r#"(?:table|relation) "([^"]+)""#).ok()?,
            // innermost identifier of "lower(name::text)" or plain "name"
            expression_column: Regex::new(r"([A-Za-z_][A-Za-z0-9_]*)(?:::[A-Za-z ]+)?\)*$").ok()?,
        })
    }
}

static REGEX_PATTERNS: OnceLock<Option<RegexPatterns>> = OnceLock::new();

const CONSTRAINT_SUFFIXES: &[&str] = &["_key", "_idx", "_check", "_unique"];

impl ConstraintParser {
    fn patterns() -> Option<&'static RegexPatterns> {
        REGEX_PATTERNS.get_or_init(RegexPatterns::new).as_ref()
    }

    /// Parses a unique constraint violation into `(entity, field, value)`.
    ///
    /// The constraint name is preferred for entity and field; the value is
    /// always taken from the `Key (...)=(...)` detail when present.
    pub fn parse_unique_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String, String)> {
        let key_value = Self::extract_key_value_from_message(message);

        if let Some((entity, field)) = constraint_name.and_then(Self::parse_constraint_name) {
            let value = key_value
                .map(|(_, value)| value)
                .unwrap_or_else(|| "duplicate_value".to_string());
            return Some((entity, field, value));
        }

        let (field, value) = key_value?;
        let entity =
            Self::extract_table_from_message(message).unwrap_or_else(|| "resource".to_string());
        Some((entity, field, value))
    }

    /// Parses a not-null violation into `(entity, field)`.
    pub fn parse_not_null_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        let field = Self::extract_column_from_message(message)?;
        let entity = Self::extract_table_from_message(message)
            .or_else(|| constraint_name.and_then(Self::parse_constraint_name).map(|(e, _)| e))
            .unwrap_or_else(|| "resource".to_string());
        Some((entity, field))
    }

    /// Parses a check violation into `(entity, field)`.
    pub fn parse_check_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        if let Some(parsed) = constraint_name.and_then(Self::parse_constraint_name) {
            return Some(parsed);
        }

        let field = Self::extract_column_from_message(message)?;
        let entity =
            Self::extract_table_from_message(message).unwrap_or_else(|| "resource".to_string());
        Some((entity, field))
    }

    /// Splits a conventional constraint name into `(table, column)`.
    ///
    /// - "villas_name_key" -> ("villas", "name")
    /// - "villas_square_meters_check" -> ("villas", "square_meters")
    pub fn parse_constraint_name(constraint_name: &str) -> Option<(String, String)> {
        let stem = CONSTRAINT_SUFFIXES
            .iter()
            .find_map(|suffix| constraint_name.strip_suffix(suffix))?;
        let (table, column) = stem.split_once('_')?;
        if table.is_empty() || column.is_empty() {
            return None;
        }
        Some((table.to_string(), column.to_string()))
    }

    /// Extracts `(field, value)` from a `Key (...)=(...)` detail line.
    pub fn extract_key_value_from_message(message: &str) -> Option<(String, String)> {
        let patterns = Self::patterns()?;
        let captures = patterns.key_value.captures(message)?;
        let expression = captures.get(1)?.as_str();
        let value = captures.get(2)?.as_str().to_string();
        let field = patterns
            .expression_column
            .captures(expression)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| expression.to_string());
        Some((field, value))
    }

    /// Extracts a quoted column name.
    pub fn extract_column_from_message(message: &str) -> Option<String> {
        let captures = Self::patterns()?.column_name.captures(message)?;
        Some(captures.get(1)?.as_str().to_string())
    }

    /// Extracts a quoted table or relation name.
    pub fn extract_table_from_message(message: &str) -> Option<String> {
        let captures = Self::patterns()?.table_name.captures(message)?;
        Some(captures.get(1)?.as_str().to_string())
    }
}
