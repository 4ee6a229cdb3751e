// Repository sampler - 仓库采样器
// 有界目录遍历：在硬预算内挑选一份有代表性的文件样本并载入内存

use crate::error::{CoreError, Result};
use crate::scanner::CodeFile;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// 支持的源文件扩展名
pub const SUPPORTED_EXTENSIONS: &[&str] = &["py", "js", "ts", "jsx", "tsx"];

/// 不进入的目录：版本控制元数据、依赖缓存、构建产物、测试夹具
const SKIP_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "__pycache__",
    "venv",
    ".venv",
    "site-packages",
    "target",
    "dist",
    "build",
    "out",
    "vendor",
    "fixtures",
    "__fixtures__",
    "testdata",
];

/// 二进制/生成产物扩展名，直接跳过
const SKIP_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "svg", "ico", "pdf", "zip", "tar", "gz", "7z", "exe", "dll",
    "so", "dylib", "wasm", "ttf", "woff", "woff2", "eot", "lock", "map", "pyc", "class", "jar",
    "bin",
];

/// 扫描资源预算
///
/// Each cap is enforced independently; the tightest one wins.
/// Invariant: loaded <= indexed <= discovered.
#[derive(Debug, Clone, Copy)]
pub struct ScanBudget {
    /// 完整载入内存的文件数上限
    pub max_files_loaded: usize,
    /// 停止目录遍历前允许索引的文件数上限
    pub max_files_indexed: usize,
    /// 允许访问的文件系统条目总数上限
    pub max_entries_visited: usize,
    /// 单个文件的字节数上限
    pub max_file_bytes: u64,
}

impl Default for ScanBudget {
    fn default() -> Self {
        Self {
            max_files_loaded: 200,
            max_files_indexed: 1000,
            max_entries_visited: 20_000,
            max_file_bytes: 512 * 1024,
        }
    }
}

/// 一次采样的结果
#[derive(Debug, Clone)]
pub struct FileSample {
    pub files: Vec<CodeFile>,
    pub total_discovered: usize,
    pub truncated: bool,
}

impl FileSample {
    pub fn files_loaded(&self) -> usize {
        self.files.len()
    }
}

/// 遍历仓库目录树并载入一份截断的工作集
///
/// Hidden directories and the SKIP_DIRS set are pruned in place and never
/// descended into. Unreadable files are silently skipped. Discovery stops
/// early (and marks the sample truncated) when a walk cap is reached.
pub async fn sample_repository(root: &Path, budget: &ScanBudget) -> Result<FileSample> {
    if !root.is_dir() {
        return Err(CoreError::Walk(format!(
            "not a directory: {}",
            root.display()
        )));
    }

    let (discovered, mut truncated) = discover_files(root, budget);

    let mut files = Vec::new();
    for path in discovered.iter().take(budget.max_files_loaded) {
        match load_file(root, path, budget.max_file_bytes).await {
            Some(file) => files.push(file),
            None => continue,
        }
    }

    let total_discovered = discovered.len();
    truncated = truncated || total_discovered > files.len();

    Ok(FileSample {
        files,
        total_discovered,
        truncated,
    })
}

fn discover_files(root: &Path, budget: &ScanBudget) -> (Vec<PathBuf>, bool) {
    let mut discovered = Vec::new();
    let mut visited = 0usize;
    let mut truncated = false;

    let walker = WalkBuilder::new(root)
        .hidden(true)
        .ignore(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .filter_entry(|entry| {
            // 原地剪枝：不进入已知的非源码目录
            let is_dir = entry.file_type().map_or(false, |ft| ft.is_dir());
            if is_dir && entry.depth() > 0 {
                let name = entry.file_name().to_string_lossy();
                if SKIP_DIRS.contains(&name.as_ref()) {
                    return false;
                }
            }
            true
        })
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => continue,
        };

        visited += 1;
        if visited >= budget.max_entries_visited {
            truncated = true;
            break;
        }

        if !entry.file_type().map_or(false, |ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        if !is_candidate_file(path) {
            continue;
        }

        discovered.push(path.to_path_buf());
        if discovered.len() >= budget.max_files_indexed {
            truncated = true;
            break;
        }
    }

    (discovered, truncated)
}

fn is_candidate_file(path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if is_minified(&name) {
        return false;
    }

    let ext = match path.extension() {
        Some(ext) => ext.to_string_lossy().to_lowercase(),
        None => return false,
    };
    if SKIP_EXTENSIONS.contains(&ext.as_str()) {
        return false;
    }

    SUPPORTED_EXTENSIONS.contains(&ext.as_str())
}

fn is_minified(name: &str) -> bool {
    name.ends_with(".min.js") || name.ends_with(".min.css") || name.ends_with("-min.js")
}

async fn load_file(root: &Path, path: &Path, max_bytes: u64) -> Option<CodeFile> {
    let metadata = tokio::fs::metadata(path).await.ok()?;
    if metadata.len() > max_bytes {
        return None;
    }

    // 读取失败的文件静默跳过；无法解码的字节被替换，绝不致命
    let bytes = tokio::fs::read(path).await.ok()?;
    let content = String::from_utf8_lossy(&bytes).into_owned();

    let relative = path.strip_prefix(root).unwrap_or(path);
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    Some(CodeFile {
        path: relative.to_string_lossy().to_string(),
        content,
        extension,
    })
}
