use super::{truncate_chars, Category, CodeFile, Finding, FindingKind, Scanner, Severity};
use crate::patterns::injection_patterns;
use regex::Regex;

const EVIDENCE_CHARS: usize = 100;

/// 单行注释前缀，命中即跳过该行（三种语言家族）
const COMMENT_MARKERS: [&str; 3] = ["#", "//", "*"];

pub struct SqlInjectionScanner {
    patterns: Vec<(Regex, &'static str)>,
}

impl SqlInjectionScanner {
    pub fn new() -> Self {
        Self {
            patterns: injection_patterns(),
        }
    }
}

impl Default for SqlInjectionScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl Scanner for SqlInjectionScanner {
    fn name(&self) -> &'static str {
        "SqlInjectionScanner"
    }

    fn category(&self) -> Category {
        Category::SqlInjection
    }

    fn scan(&self, files: &[CodeFile]) -> Vec<Finding> {
        let mut findings = Vec::new();

        for file in files {
            for (line_idx, line) in file.content.lines().enumerate() {
                let trimmed = line.trim();
                if COMMENT_MARKERS.iter().any(|m| trimmed.starts_with(m)) {
                    continue;
                }

                // 每个模式独立判定，同一行可以产生多条结果
                for (regex, vuln_type) in &self.patterns {
                    if regex.is_match(line) {
                        findings.push(Finding {
                            file: file.path.clone(),
                            line: line_idx + 1,
                            kind: FindingKind::SqlInjection,
                            subtype: vuln_type.to_string(),
                            severity: Severity::Critical,
                            evidence: truncate_chars(trimmed, EVIDENCE_CHARS),
                            explanation: format!(
                                "{} detected. Use parameterized queries or prepared statements instead of string interpolation to prevent SQL injection attacks.",
                                vuln_type
                            ),
                            ai_risk: None,
                            ai_exploit: None,
                            ai_fix: None,
                        });
                    }
                }
            }
        }

        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_file(path: &str, content: &str) -> CodeFile {
        CodeFile {
            path: path.to_string(),
            content: content.to_string(),
            extension: path.rsplit('.').next().unwrap_or("").to_string(),
        }
    }

    #[test]
    fn detects_string_concatenation() {
        let scanner = SqlInjectionScanner::new();
        let files = vec![code_file(
            "db.py",
            r#"query = "SELECT * FROM users WHERE id = " + user_id"#,
        )];

        let findings = scanner.scan(&files);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].subtype, "String concatenation in SQL query");
        assert_eq!(findings[0].severity, Severity::Critical);
        assert!(findings[0].evidence.starts_with("query ="));
    }

    #[test]
    fn skips_comment_lines() {
        let scanner = SqlInjectionScanner::new();
        let files = vec![code_file(
            "db.py",
            concat!(
                "# query = \"SELECT * FROM users WHERE id = \" + user_id\n",
                "// query = \"SELECT * FROM users WHERE id = \" + user_id\n",
                " * query = \"SELECT * FROM users WHERE id = \" + user_id\n",
            ),
        )];

        assert!(scanner.scan(&files).is_empty());
    }

    #[test]
    fn one_line_can_yield_multiple_findings() {
        let scanner = SqlInjectionScanner::new();
        // f-string 版 execute 同时命中两个模式
        let files = vec![code_file(
            "db.py",
            r#"cursor.execute(f"SELECT name FROM users WHERE id = {uid}")"#,
        )];

        let findings = scanner.scan(&files);
        assert!(findings.len() >= 2);
        let subtypes: Vec<&str> = findings.iter().map(|f| f.subtype.as_str()).collect();
        assert!(subtypes.contains(&"f-string in execute()"));
        assert!(subtypes.contains(&"f-string interpolation in SQL query"));
    }

    #[test]
    fn detects_template_literal_in_raw_query() {
        let scanner = SqlInjectionScanner::new();
        let files = vec![code_file(
            "db.js",
            "const rows = await db.raw(`SELECT * FROM orders WHERE id = ${orderId}`);",
        )];

        let findings = scanner.scan(&files);
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].subtype,
            "Template literal interpolation in raw query"
        );
    }

    #[test]
    fn evidence_is_trimmed_and_bounded() {
        let scanner = SqlInjectionScanner::new();
        let long_tail = "x".repeat(300);
        let line = format!(
            "    query = \"SELECT * FROM users WHERE name = \" + {}",
            long_tail
        );
        let files = vec![code_file("db.py", &line)];

        let findings = scanner.scan(&files);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].evidence.starts_with("query ="));
        assert_eq!(findings[0].evidence.chars().count(), EVIDENCE_CHARS);
    }

    #[test]
    fn parameterized_queries_are_clean() {
        let scanner = SqlInjectionScanner::new();
        let files = vec![code_file(
            "db.py",
            "cursor.execute(\"SELECT * FROM users WHERE id = %s\", (user_id,))",
        )];

        assert!(scanner.scan(&files).is_empty());
    }
}
