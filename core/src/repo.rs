// Repository fetcher - 仓库获取
// 在硬超时内把远端仓库物化到临时目录，任何失败路径都不留进程和目录

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tempfile::TempDir;
use thiserror::Error;
use tokio::process::Command;

pub const DEFAULT_CLONE_TIMEOUT: Duration = Duration::from_secs(60);

/// 对调用方唯一可见的获取错误
///
/// Underlying git diagnostics are logged, never surfaced.
#[derive(Debug, Error)]
#[error("Could not retrieve repository")]
pub struct FetchError;

/// 一次成功克隆的临时检出
///
/// Dropping the guard removes the working directory, including on every
/// failure path of the caller.
pub struct ClonedRepo {
    dir: TempDir,
}

impl ClonedRepo {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// 只接受 GitHub 仓库定位串
pub fn is_supported_locator(locator: &str) -> bool {
    locator.starts_with("https://github.com/") || locator.starts_with("git@github.com:")
}

/// 浅克隆仓库到临时目录
///
/// 超时后子进程会被强制终止（kill_on_drop），临时目录随 guard 释放。
pub async fn fetch_repository(locator: &str, timeout: Duration) -> Result<ClonedRepo, FetchError> {
    if !is_supported_locator(locator) {
        tracing::warn!("rejected unsupported repository locator: {}", locator);
        return Err(FetchError);
    }

    let dir = tempfile::Builder::new()
        .prefix("security_audit_")
        .tempdir()
        .map_err(|e| {
            tracing::error!("failed to create temp dir for clone: {}", e);
            FetchError
        })?;

    let child = Command::new("git")
        .arg("clone")
        .arg("--depth")
        .arg("1")
        .arg(locator)
        .arg(dir.path())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| {
            tracing::error!("failed to spawn git clone: {}", e);
            FetchError
        })?;

    match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) if output.status.success() => Ok(ClonedRepo { dir }),
        Ok(Ok(output)) => {
            tracing::error!(
                "git clone of {} exited with {}: {}",
                locator,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            Err(FetchError)
        }
        Ok(Err(e)) => {
            tracing::error!("git clone of {} failed to run: {}", locator, e);
            Err(FetchError)
        }
        Err(_) => {
            // 超时：wait future 被丢弃，kill_on_drop 负责终止进程树
            tracing::error!("git clone of {} timed out after {:?}", locator, timeout);
            Err(FetchError)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_github_locators() {
        assert!(is_supported_locator("https://github.com/owner/repo"));
        assert!(is_supported_locator("git@github.com:owner/repo.git"));
        assert!(!is_supported_locator("https://gitlab.com/owner/repo"));
        assert!(!is_supported_locator("file:///etc/passwd"));
        assert!(!is_supported_locator("not a url"));
    }

    #[tokio::test]
    async fn unsupported_locator_fails_fast_with_opaque_error() {
        let err = fetch_repository("https://example.com/repo", DEFAULT_CLONE_TIMEOUT)
            .await
            .err()
            .expect("must fail");
        assert_eq!(err.to_string(), "Could not retrieve repository");
    }
}
