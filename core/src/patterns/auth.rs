use regex::Regex;

/// HTTP-verb route declarations across three syntactic families:
/// decorator-based (FastAPI/Flask), method-chaining (Express) and
/// annotation-based (NestJS).
pub fn route_patterns() -> Vec<(Regex, &'static str)> {
    vec![
        (
            Regex::new(r#"(?i)@(app|router)\.(get|post|put|delete|patch)\s*\(\s*["'][^"']*["']"#)
                .unwrap(),
            "Python",
        ),
        (
            Regex::new(r#"(?i)(app|router)\.(get|post|put|delete|patch)\s*\(\s*["'][^"']+["']"#)
                .unwrap(),
            "JavaScript",
        ),
        (
            Regex::new(r#"(?i)@(Get|Post|Put|Delete|Patch)\s*\(\s*["']?[^)]*["']?\s*\)"#).unwrap(),
            "TypeScript",
        ),
    ]
}

/// Auth decorators, middleware identifiers and guards for the same families.
pub fn auth_patterns() -> Vec<Regex> {
    vec![
        Regex::new(
            r"(?i)@(require|login_required|authenticated|auth|jwt_required|token_required|permission|protected)",
        )
        .unwrap(),
        Regex::new(r"(?i)@(Depends\s*\(\s*\w*auth|Depends\s*\(\s*\w*token|Depends\s*\(\s*get_current_user)")
            .unwrap(),
        Regex::new(r"(?i)(isAuthenticated|requireAuth|authMiddleware|verifyToken|authenticate)\s*[,)]")
            .unwrap(),
        Regex::new(r"(?i)(passport\.authenticate|jwt\.verify)").unwrap(),
        Regex::new(r"(?i)@(UseGuards|AuthGuard)").unwrap(),
    ]
}

/// A single statement that installs auth middleware for the whole file;
/// every route declared after it is considered protected.
pub fn file_level_auth_patterns() -> Vec<Regex> {
    vec![
        Regex::new(r"(?i)router\.use\s*\(\s*(authenticate|authMiddleware|protect)").unwrap(),
        Regex::new(r"(?i)app\.use\s*\(\s*(authenticate|authMiddleware|protect)").unwrap(),
    ]
}

/// Keyword heuristic for operations where the bar for requiring auth is lower.
pub fn sensitive_op_pattern() -> Regex {
    Regex::new(r"(?i)(delete|remove|drop|update|create|insert|modify|admin|user|password|payment|checkout)")
        .unwrap()
}

/// Routes bound to a mutating HTTP verb.
pub fn mutating_verb_pattern() -> Regex {
    Regex::new(r"(?i)\.(post|put|delete|patch)").unwrap()
}
