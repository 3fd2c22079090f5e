//! `amdm setup` – drive the first-run setup wizard end to end.

use amdm_core::bridge::Backend;
use amdm_core::setup::{SetupStep, SetupWizard};
use anyhow::{Context, Result};

/// Walks every setup step in order: installs whatever the dependency report
/// says is missing (one attempt per tool; a failure aborts the run), settles
/// the cookies step, and records setup as complete with the backend.
pub async fn run_setup(
    backend: &dyn Backend,
    skip_cookies: bool,
    cookies: Option<&str>,
    force: bool,
) -> Result<()> {
    if !force && backend.is_setup_complete().await? {
        println!("Setup already completed. Re-run with --force to repeat it.");
        return Ok(());
    }

    let mut wizard = SetupWizard::new();
    let mut report = wizard
        .refresh_report(backend)
        .await
        .context("query dependency status")?;

    loop {
        let step = wizard.current_step();
        println!(
            "[{}/{}] {}",
            wizard.current_index() + 1,
            SetupStep::ORDER.len(),
            step.title()
        );

        for tool in step.required_tools() {
            let status = report.tool(*tool);
            if status.installed {
                println!(
                    "  {} ok ({})",
                    tool.label(),
                    status.version.as_deref().unwrap_or("version unknown")
                );
                continue;
            }
            println!("  installing {}...", tool.label());
            report = wizard
                .run_install(backend, *tool)
                .await
                .with_context(|| format!("install {}", tool.label()))?;
        }

        // An explicit --cookies file is imported even when the stored
        // cookies already validate; the user asked for that file.
        if step == SetupStep::Cookies && (cookies.is_some() || !wizard.is_completed(step)) {
            resolve_cookies(backend, &mut wizard, skip_cookies, cookies).await?;
        }

        if wizard.current_index() + 1 == SetupStep::ORDER.len() {
            wizard
                .finish(backend)
                .await
                .context("record setup as complete")?;
            break;
        }
        if !wizard.next_step() {
            let detail = wizard
                .last_error()
                .unwrap_or("required signals still missing");
            anyhow::bail!("setup step '{}' did not complete: {}", step.title(), detail);
        }
    }

    println!("Setup complete.");
    Ok(())
}

/// Settles the cookies step: import a given file, honor an explicit skip, or
/// re-validate whatever the backend already has stored.
async fn resolve_cookies(
    backend: &dyn Backend,
    wizard: &mut SetupWizard,
    skip_cookies: bool,
    cookies: Option<&str>,
) -> Result<()> {
    if let Some(path) = cookies {
        let status = wizard
            .run_import_cookies(backend, path)
            .await
            .with_context(|| format!("import cookies from {path}"))?;
        if !status.valid {
            anyhow::bail!(
                "cookies file rejected: {}",
                status.detail.as_deref().unwrap_or("invalid")
            );
        }
        println!("  cookies imported from {path}");
        return Ok(());
    }

    if skip_cookies {
        wizard.skip_current();
        println!("  skipped; import cookies later to download purchased content");
        return Ok(());
    }

    let status = backend.validate_cookies().await?;
    if status.valid {
        wizard.complete_step(SetupStep::Cookies);
        println!("  existing cookies are valid");
        return Ok(());
    }
    anyhow::bail!(
        "no valid cookies: {}; pass --cookies <path> or --skip-cookies",
        status.detail.as_deref().unwrap_or("none stored")
    )
}
