use regex::Regex;

/// Matchers for unsafe query-construction idioms across Python and JS/TS
/// syntax: concatenation, interpolation and formatting next to SQL keywords,
/// plus direct interpolation inside database-execute calls.
pub fn injection_patterns() -> Vec<(Regex, &'static str)> {
    vec![
        (
            Regex::new(r"(?i)(SELECT|INSERT|UPDATE|DELETE|DROP|CREATE)\s+.*\+\s*[a-zA-Z_][a-zA-Z0-9_]*")
                .unwrap(),
            "String concatenation in SQL query",
        ),
        (
            Regex::new(r#"(?i)f["'].*?(SELECT|INSERT|UPDATE|DELETE|DROP)\s+.*?\{[^}]+\}.*?["']"#)
                .unwrap(),
            "f-string interpolation in SQL query",
        ),
        (
            Regex::new(r#"(?i)["'].*?(SELECT|INSERT|UPDATE|DELETE|DROP)\s+.*?["']\.format\s*\("#)
                .unwrap(),
            ".format() in SQL query",
        ),
        (
            Regex::new(r#"(?i)["'].*?(SELECT|INSERT|UPDATE|DELETE|DROP)\s+.*?%s.*?["'].*?%"#)
                .unwrap(),
            "% formatting in SQL query",
        ),
        (
            Regex::new(r#"(?i)\.execute\s*\(\s*["'].*?\+"#).unwrap(),
            "String concatenation in execute()",
        ),
        (
            Regex::new(r#"(?i)\.execute\s*\(\s*f["']"#).unwrap(),
            "f-string in execute()",
        ),
        (
            Regex::new(r#"(?i)\.query\s*\(\s*["'].*?\$\{"#).unwrap(),
            "Template literal with variable in query()",
        ),
        (
            Regex::new(r"(?i)(raw|query)\s*\(\s*`.*?\$\{").unwrap(),
            "Template literal interpolation in raw query",
        ),
    ]
}
