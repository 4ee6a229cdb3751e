use regex::Regex;

/// Matchers for hardcoded credentials: each requires a minimum-length
/// credential-shaped value after a recognized key name, or a well-known
/// vendor prefix.
pub fn secret_patterns() -> Vec<(Regex, &'static str)> {
    vec![
        (
            Regex::new(r#"(?i)(api[_-]?key|apikey)\s*[=:]\s*["'][a-zA-Z0-9]{16,}["']"#).unwrap(),
            "API Key",
        ),
        (
            Regex::new(r#"(?i)(secret|password|passwd|pwd)\s*[=:]\s*["'][^"']{8,}["']"#).unwrap(),
            "Password/Secret",
        ),
        (
            Regex::new(
                r#"(?i)(token|auth[_-]?token|access[_-]?token)\s*[=:]\s*["'][a-zA-Z0-9_\-.]{20,}["']"#,
            )
            .unwrap(),
            "Token",
        ),
        (Regex::new(r"(?i)AKIA[0-9A-Z]{16}").unwrap(), "AWS Access Key"),
        (
            Regex::new(r#"(?i)(aws[_-]?secret|secret[_-]?key)\s*[=:]\s*["'][a-zA-Z0-9/+=]{40}["']"#)
                .unwrap(),
            "AWS Secret Key",
        ),
        (
            Regex::new(r"-----BEGIN\s+(RSA\s+)?PRIVATE\s+KEY-----").unwrap(),
            "Private Key",
        ),
        (
            Regex::new(r#"(?i)(mysql|postgres|mongodb|redis)://[^"'\s]+:[^"'\s]+@"#).unwrap(),
            "Database Connection String",
        ),
        (
            Regex::new(r"(?i)bearer\s+[a-zA-Z0-9_\-.]{20,}").unwrap(),
            "Bearer Token",
        ),
        (
            Regex::new(r"ghp_[a-zA-Z0-9]{36}").unwrap(),
            "GitHub Personal Access Token",
        ),
        (Regex::new(r"sk-[a-zA-Z0-9]{48}").unwrap(), "OpenAI API Key"),
    ]
}
