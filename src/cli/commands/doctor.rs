//! Doctor command - verify configuration and credentials.

use crate::cli::Output;
use crate::config::Settings;
use crate::secrets::{EnvSecretStore, MapSecretStore, SecretStore};
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(config_path: Option<&str>, settings: &Settings) -> anyhow::Result<()> {
    Output::header("Finn Doctor");
    println!();
    println!("Checking configuration and credentials...\n");

    let mut checks = Vec::new();

    println!("{}", style("Configuration").bold());
    let path = config_path
        .map(std::path::PathBuf::from)
        .unwrap_or_else(Settings::default_config_path);
    let config_check = check_config_file(&path);
    config_check.print();
    checks.push(config_check);

    println!();

    println!("{}", style("Secrets").bold());
    let secret_checks = check_secrets(settings, &EnvSecretStore::new());
    for check in &secret_checks {
        check.print();
    }
    checks.extend(secret_checks);

    println!();

    println!("{}", style("Cache").bold());
    let cache_check = check_cache(settings);
    cache_check.print();
    checks.push(cache_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Finn.",
            errors
        ));
        anyhow::bail!("{} doctor check(s) failed", errors);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Finn is ready to use.");
    }

    Ok(())
}

/// Check that every credential resolves, and from where.
fn check_secrets(settings: &Settings, env: &EnvSecretStore) -> Vec<CheckResult> {
    let secrets = &settings.secrets;
    let inline = MapSecretStore::new(secrets.values.clone());
    let scope = secrets.scope.as_str();

    [
        (&secrets.search_endpoint_key, true),
        (&secrets.search_admin_key, false),
        (&secrets.deployment_name_key, false),
        (&secrets.llm_api_key, false),
        (&secrets.llm_endpoint_key, true),
    ]
    .into_iter()
    .map(|(key, is_url)| {
        let name = format!("{}/{}", scope, key);
        let found = inline
            .get(scope, key)
            .map(|v| (v, inline.name()))
            .or_else(|| env.get(scope, key).map(|v| (v, env.name())));

        match found {
            Some((value, source)) if is_url && url::Url::parse(&value).is_err() => {
                CheckResult::error(
                    &name,
                    &format!("not a valid URL (from {})", source),
                    "Use the full https:// endpoint of the service",
                )
            }
            Some((_, source)) => CheckResult::ok(&name, &format!("found in {}", source)),
            None => CheckResult::error(
                &name,
                "not found",
                &format!(
                    "Set {} or add it under [secrets.values.{}] in the config file",
                    env.var_name(scope, key),
                    scope
                ),
            ),
        }
    })
    .collect()
}

/// Check if config file exists.
fn check_config_file(path: &Path) -> CheckResult {
    if path.exists() {
        CheckResult::ok("Config file", &format!("{}", path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: finn config init",
        )
    }
}

/// Report the completion cache location.
fn check_cache(settings: &Settings) -> CheckResult {
    if !settings.llm.cache_enabled {
        return CheckResult::ok("Completion cache", "disabled");
    }

    let path = settings.cache_path(settings.llm.cache_seed);
    if path.exists() {
        let size = std::fs::metadata(&path)
            .map(|m| format_size(m.len()))
            .unwrap_or_else(|_| "unknown size".to_string());
        CheckResult::ok("Completion cache", &format!("{} ({})", path.display(), size))
    } else {
        CheckResult::ok(
            "Completion cache",
            &format!("{} (not created yet)", path.display()),
        )
    }
}

/// Format file size in human-readable format.
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
