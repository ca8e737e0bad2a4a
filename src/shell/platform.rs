//! Host platform queries.

use super::command::CommandRunner;

/// Check if running in a CI environment.
///
/// Used to force non-interactive mode in `main()`.
/// Checks common CI environment variables: `CI`, `GITHUB_ACTIONS`,
/// `GITLAB_CI`, `CIRCLECI`, `TRAVIS`, `JENKINS_URL`, `TF_BUILD`.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
        || std::env::var("TF_BUILD").is_ok()
}

/// Check if running as root/administrator.
///
/// On Windows `net session` only succeeds from an elevated token, so its
/// exit status is used as the signal.
pub fn is_elevated(runner: &dyn CommandRunner) -> bool {
    #[cfg(unix)]
    {
        let _ = runner;
        // SAFETY: geteuid() is a simple syscall that returns the effective user ID
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        use super::command::CommandLine;
        use std::time::Duration;

        let cmd = CommandLine::new(["net", "session"]);
        runner
            .run(&cmd, Duration::from_secs(15))
            .map(|r| r.success)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::ScriptedRunner;

    #[test]
    fn is_ci_detects_environment() {
        // Just ensure function doesn't panic
        let _ = is_ci();
    }

    #[test]
    fn is_elevated_does_not_panic() {
        let runner = ScriptedRunner::new();
        let _ = is_elevated(&runner);
    }
}
