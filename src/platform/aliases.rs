use std::sync::LazyLock;

/// Canonical OS identifier -> accepted asset-name tokens (spec §4.2).
/// Comparisons against these tables are always case-insensitive.
static OS_ALIASES: LazyLock<Vec<(&'static str, &'static [&'static str])>> = LazyLock::new(|| {
    vec![
        ("darwin", &["macos", "macosx", "osx"]),
        ("windows", &["win", "win32", "win64", "mingw"]),
        ("linux", &[]),
    ]
});

static ARCH_ALIASES: LazyLock<Vec<(&'static str, &'static [&'static str])>> = LazyLock::new(|| {
    vec![
        ("amd64", &["x86_64", "x64"]),
        ("arm64", &["aarch64"]),
        ("386", &["x86", "i386", "i686"]),
    ]
});

/// Every token (canonical name plus aliases) that refers to `canonical`.
pub fn alias_tokens(canonical: &str, table: &[(&str, &[&str])]) -> Vec<String> {
    let canonical_lower = canonical.to_lowercase();
    let mut tokens = vec![canonical_lower.clone()];
    for (name, aliases) in table {
        if name.eq_ignore_ascii_case(&canonical_lower) {
            tokens.extend(aliases.iter().map(|s| s.to_string()));
        }
    }
    tokens
}

pub fn os_tokens(goos: &str) -> Vec<String> {
    alias_tokens(goos, &OS_ALIASES)
}

pub fn arch_tokens(goarch: &str) -> Vec<String> {
    alias_tokens(goarch, &ARCH_ALIASES)
}

/// The target platform to select assets for. Defaults to the host the
/// binary is compiled for, but can be overridden (e.g. `--target-os`,
/// `--target-arch`) so a CI pipeline can fetch artifacts for another
/// platform than the one it runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub goos: String,
    pub goarch: String,
}

impl Platform {
    pub fn host() -> Self {
        Self {
            goos: host_goos().to_string(),
            goarch: host_goarch().to_string(),
        }
    }

    pub fn new(goos: impl Into<String>, goarch: impl Into<String>) -> Self {
        Self {
            goos: goos.into(),
            goarch: goarch.into(),
        }
    }

    pub fn os_tokens(&self) -> Vec<String> {
        os_tokens(&self.goos)
    }

    pub fn arch_tokens(&self) -> Vec<String> {
        arch_tokens(&self.goarch)
    }

    /// Name tokens of platforms that are definitely *not* this one, used
    /// for the exclusion pass of the inference engine (spec §4.2 step 1).
    pub fn foreign_os_suffixes(&self) -> &'static [&'static str] {
        match self.goos.as_str() {
            "darwin" => &[".exe", ".msi", ".dll"],
            "linux" => &[".exe", ".msi", ".dll", ".dmg", ".pkg", ".app"],
            "windows" => &[".dmg", ".pkg", ".app", ".deb", ".rpm"],
            _ => &[],
        }
    }
}

fn host_goos() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

fn host_goarch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        other => other,
    }
}

#[cfg(test)]
#[path = "../../tests/platform/aliases.rs"]
mod tests;
