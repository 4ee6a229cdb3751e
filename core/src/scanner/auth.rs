use super::{truncate_chars, Category, CodeFile, Finding, FindingKind, Scanner, Severity};
use crate::patterns::{
    auth_patterns, file_level_auth_patterns, mutating_verb_pattern, route_patterns,
    sensitive_op_pattern,
};
use regex::Regex;

/// 路由上下文窗口的半径（行数）
///
/// Approximates "is this route wrapped by an auth check" without parsing
/// scopes. Tunable, not a guaranteed scope boundary.
const CONTEXT_WINDOW: usize = 5;

const EVIDENCE_CHARS: usize = 80;

pub struct AuthScanner {
    routes: Vec<(Regex, &'static str)>,
    auth: Vec<Regex>,
    file_level_auth: Vec<Regex>,
    sensitive: Regex,
    mutating: Regex,
}

impl AuthScanner {
    pub fn new() -> Self {
        Self {
            routes: route_patterns(),
            auth: auth_patterns(),
            file_level_auth: file_level_auth_patterns(),
            sensitive: sensitive_op_pattern(),
            mutating: mutating_verb_pattern(),
        }
    }

    fn scan_file(&self, file: &CodeFile, findings: &mut Vec<Finding>) {
        // 文件级中间件覆盖：router.use(authenticate) 保护文件里声明的所有路由
        if self
            .file_level_auth
            .iter()
            .any(|p| p.is_match(&file.content))
        {
            return;
        }

        let lines: Vec<&str> = file.content.lines().collect();

        for (i, line) in lines.iter().enumerate() {
            // 每行最多报一条：第一个命中的框架模式决定归属
            let Some((route_text, framework)) = self
                .routes
                .iter()
                .find_map(|(re, fw)| re.find(line).map(|m| (m.as_str(), *fw)))
            else {
                continue;
            };

            let start = i.saturating_sub(CONTEXT_WINDOW);
            let end = (i + CONTEXT_WINDOW).min(lines.len());
            let context = lines[start..end].join("\n");

            let has_auth = self.auth.iter().any(|p| p.is_match(&context));
            let is_sensitive = self.sensitive.is_match(line);
            let is_mutating = self.mutating.is_match(line);

            if has_auth || !(is_mutating || is_sensitive) {
                continue;
            }

            let (severity, explanation) = if is_sensitive {
                (
                    Severity::High,
                    "This endpoint appears to lack authentication middleware. It performs sensitive operations that should require authentication.",
                )
            } else {
                (
                    Severity::Medium,
                    "This endpoint appears to lack authentication middleware. Mutating endpoints (POST/PUT/DELETE/PATCH) should typically require authentication.",
                )
            };

            findings.push(Finding {
                file: file.path.clone(),
                line: i + 1,
                kind: FindingKind::MissingAuth,
                subtype: framework.to_string(),
                severity,
                evidence: truncate_chars(route_text, EVIDENCE_CHARS),
                explanation: explanation.to_string(),
                ai_risk: None,
                ai_exploit: None,
                ai_fix: None,
            });
        }
    }
}

impl Default for AuthScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner for AuthScanner {
    fn name(&self) -> &'static str {
        "AuthScanner"
    }

    fn category(&self) -> Category {
        Category::MissingAuth
    }

    fn scan(&self, files: &[CodeFile]) -> Vec<Finding> {
        let mut findings = Vec::new();
        for file in files {
            self.scan_file(file, &mut findings);
        }
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn py_file(content: &str) -> CodeFile {
        CodeFile {
            path: "routes.py".to_string(),
            content: content.to_string(),
            extension: "py".to_string(),
        }
    }

    fn js_file(content: &str) -> CodeFile {
        CodeFile {
            path: "routes.js".to_string(),
            content: content.to_string(),
            extension: "js".to_string(),
        }
    }

    #[test]
    fn flags_sensitive_route_without_auth() {
        let scanner = AuthScanner::new();
        let files = vec![py_file(concat!(
            "@app.post(\"/admin/delete_user\")\n",
            "def delete_user(user_id: int):\n",
            "    db.remove(user_id)\n",
            "    return {\"ok\": True}\n",
        ))];

        let findings = scanner.scan(&files);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::High);
        assert_eq!(findings[0].subtype, "Python");
        assert_eq!(findings[0].line, 1);
        assert!(findings[0].evidence.contains("/admin/delete_user"));
    }

    #[test]
    fn auth_decorator_in_window_suppresses_finding() {
        let scanner = AuthScanner::new();
        let files = vec![py_file(concat!(
            "@jwt_required\n",
            "@limiter.limit(\"5/minute\")\n",
            "@app.post(\"/admin/delete_user\")\n",
            "def delete_user(user_id: int):\n",
            "    db.remove(user_id)\n",
        ))];

        assert!(scanner.scan(&files).is_empty());
    }

    #[test]
    fn file_level_middleware_exempts_every_route() {
        let scanner = AuthScanner::new();
        let files = vec![js_file(concat!(
            "router.use(authenticate);\n",
            "router.post('/payment', handlePayment);\n",
            "router.delete('/users/:id', removeUser);\n",
        ))];

        assert!(scanner.scan(&files).is_empty());
    }

    #[test]
    fn non_mutating_non_sensitive_route_is_not_flagged() {
        let scanner = AuthScanner::new();
        let files = vec![py_file(concat!(
            "@app.get(\"/items\")\n",
            "def list_items():\n",
            "    return items\n",
        ))];

        assert!(scanner.scan(&files).is_empty());
    }

    #[test]
    fn mutating_non_sensitive_route_is_medium() {
        let scanner = AuthScanner::new();
        let files = vec![py_file(concat!(
            "@app.post(\"/echo\")\n",
            "def echo(body: dict):\n",
            "    return body\n",
        ))];

        let findings = scanner.scan(&files);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Medium);
    }

    #[test]
    fn trailing_middleware_argument_counts_as_auth() {
        let scanner = AuthScanner::new();
        let files = vec![js_file(
            "app.post('/payment', requireAuth, handlePayment);\n",
        )];

        assert!(scanner.scan(&files).is_empty());
    }

    #[test]
    fn auth_outside_window_does_not_count() {
        let scanner = AuthScanner::new();
        let mut content = String::from("@jwt_required\n");
        for _ in 0..6 {
            content.push_str("# filler\n");
        }
        content.push_str("@app.post(\"/echo\")\ndef echo(body):\n    return body\n");

        let findings = scanner.scan(&[py_file(&content)]);
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn evidence_is_bounded_to_80_chars() {
        let scanner = AuthScanner::new();
        let long_path = "p".repeat(200);
        let files = vec![py_file(&format!("@app.post(\"/{}\")\n", long_path))];

        let findings = scanner.scan(&files);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].evidence.chars().count() <= EVIDENCE_CHARS);
    }
}
