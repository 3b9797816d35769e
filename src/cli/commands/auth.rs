use anyhow::{bail, Context, Result};
use clap::ArgMatches;

use djangogen::models::validate_app_name;
use djangogen::prompt::collect_auth_options;
use djangogen::scaffold::auth::{bootstrap, generate_auth_app, test_accounts, GUIDE_FILE};
use djangogen::scaffold::deep_clean;
use djangogen::AuthOptions;

use crate::cli::utils::{pluralize, print_error, print_info, print_report, print_success, print_warning};
use crate::cli::Session;

pub async fn handle_setup_auth(matches: &ArgMatches, session: &mut Session) -> Result<()> {
    let app = matches
        .get_one::<String>("app")
        .map(|s| s.as_str())
        .unwrap_or("accounts");
    validate_app_name(app)?;

    println!("🔐 Django authentication setup");
    println!("==============================\n");

    let Some(options) = collect_auth_options(session.prompter.as_mut(), app)? else {
        print_info("Setup cancelled.");
        return Ok(());
    };

    println!("Setting up '{}' app...", app);
    if !session.ctx.app_exists(app) {
        session
            .toolchain()
            .start_app(app)
            .await
            .with_context(|| format!("Failed to create app '{}' via manage.py", app))?;
        print_success(&format!("App '{}' created.", app));
    }

    let report = generate_auth_app(&session.ctx, &options)?;
    print_report(&report);

    print_info("Initializing groups (database required)...");
    print_warning("Running makemigrations and migrate first...");
    if let Err(e) = session.toolchain().apply_migrations(Some(app)).await {
        recover_migrations(session, app, &e.to_string()).await?;
    }

    let accounts = options.create_test_users.then(test_accounts);
    match bootstrap(&session.toolchain(), accounts.as_ref()).await {
        Ok(()) => print_success("Groups initialized."),
        Err(e) => print_error(&format!("Group initialization failed: {}", e)),
    }
    if let Some(accounts) = &accounts {
        println!("\n👤 Test accounts (change these passwords):");
        println!("   superuser / {}", accounts.superuser_password);
        println!("   admin     / {}", accounts.admin_password);
    }

    print_summary(&options);
    Ok(())
}

/// Custom user models often break an existing database; offer a full reset.
async fn recover_migrations(session: &mut Session, app: &str, error: &str) -> Result<()> {
    print_error(&format!("Migration failed: {}", error));
    print_error("This is often due to introducing a custom user model in an existing database.");
    print_warning("Strategy: a deep clean deletes db.sqlite3 and all migrations to start fresh.");

    let reset = session
        .prompter
        .confirm("Do you want to PERMANENTLY RESET the database and all migrations?", false)?;
    if !reset {
        bail!("Setup stopped due to migration errors.");
    }

    print_info("Deep cleaning project...");
    let removed = deep_clean(&session.ctx.root)?;
    print_info(&format!("Removed {}.", pluralize("file", removed.len())));

    print_info("Retrying migrations...");
    let toolchain = session.toolchain();
    for step in [toolchain.make_migrations(None).await, toolchain.make_migrations(Some(app)).await] {
        if let Err(e) = step {
            print_warning(&e.to_string());
        }
    }
    if let Err(e) = toolchain.migrate().await {
        print_error(&format!("Migrations still failing: {}", e));
    }
    Ok(())
}

fn print_summary(options: &AuthOptions) {
    if options.two_factor {
        print_info("2FA selected. Install 'django-two-factor-auth' for a full implementation.");
    }
    if options.welcome_email {
        print_info("Welcome email enabled. Configure the SMTP settings in settings.py for production.");
    }

    let mount = options.mount_prefix();
    println!("\n🎉 Setup completed successfully!");
    print_info(&format!("Login at: /{}login/", mount));
    print_info(&format!("Dashboard at: /{}dashboard/", mount));
    print_info(&format!("Admin site at: /{}/", options.admin_url));
    print_info(&format!("Read {} for the generated structure and next steps.", GUIDE_FILE));
}
