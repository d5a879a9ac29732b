//! Detection of the external tools the post-scaffold steps rely on

use std::process::Command;

/// An external tool the scaffold shells out to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tool {
    /// Human-readable name
    pub name: &'static str,
    /// Binary looked up on PATH
    pub program: &'static str,
    /// Where to get it when missing
    pub install_hint: &'static str,
}

/// Tools used by the default configuration
pub const REQUIRED_TOOLS: &[Tool] = &[
    Tool {
        name: "Git",
        program: "git",
        install_hint: "https://git-scm.com/downloads",
    },
    Tool {
        name: "Node.js",
        program: "node",
        install_hint: "https://nodejs.org",
    },
    Tool {
        name: "npm",
        program: "npm",
        install_hint: "bundled with Node.js",
    },
];

/// Runtime detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

/// Check whether `tool` responds to `--version`
pub fn check_tool(tool: &Tool) -> RuntimeInfo {
    let output = Command::new(tool.program).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            RuntimeInfo {
                name: tool.name,
                version: Some(version),
                available: true,
            }
        }
        _ => RuntimeInfo {
            name: tool.name,
            version: None,
            available: false,
        },
    }
}

/// Check every tool; missing ones are reported, never fatal
///
/// Returns the detection results and one warning line per missing tool.
pub fn check_runtimes(tools: &[Tool]) -> (Vec<RuntimeInfo>, Vec<String>) {
    let mut results = Vec::new();
    let mut missing = Vec::new();

    for tool in tools {
        let info = check_tool(tool);
        if !info.available {
            missing.push(format!("{} ({})", tool.name, tool.install_hint));
        }
        results.push(info);
    }

    (results, missing)
}
