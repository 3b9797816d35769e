use clap::{Arg, ArgAction, Command};
use dotenv::dotenv;
use std::path::PathBuf;
use std::process;

use djangogen::config::Config;
use djangogen::prompt::{DefaultsPrompter, Prompter, TerminalPrompter};
use djangogen::{logging, ProjectContext};

mod cli;

use cli::Session;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load environment variables from .env file
    dotenv().ok();

    let matches = build_cli().get_matches();

    if let Err(e) = run_command(matches).await {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn app_arg() -> Arg {
    Arg::new("app")
        .help("Django app label")
        .required(false)
        .index(1)
}

fn entity_arg() -> Arg {
    Arg::new("entity")
        .help("Model class name (e.g. Student)")
        .required(false)
        .index(2)
}

fn force_arg() -> Arg {
    Arg::new("force")
        .long("force")
        .help("Overwrite generated files that already exist")
        .action(ArgAction::SetTrue)
}

fn build_cli() -> Command {
    Command::new("djangogen")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Django project scaffolding: apps, models, CRUD resources, auth and deployment")
        .long_about(
            "Generates and patches Django source files in place. Every edit checks for its own \
             output first, so commands can be re-run safely.",
        )
        .arg_required_else_help(true)
        .subcommand(
            Command::new("init-project")
                .about("Run django-admin startproject in the project root, named after the directory"),
        )
        .subcommand(
            Command::new("create-app")
                .about("Create an app (manage.py startapp) and register it in INSTALLED_APPS")
                .arg(app_arg()),
        )
        .subcommand(
            Command::new("create-entity")
                .about("Create a model interactively, or add fields to an existing one")
                .arg(app_arg())
                .arg(entity_arg()),
        )
        .subcommand(
            Command::new("create-form")
                .about("Generate a ModelForm for a model")
                .arg(app_arg())
                .arg(entity_arg()),
        )
        .subcommand(
            Command::new("create-handlers")
                .about("Generate CRUD views, urls and templates for a model")
                .arg(app_arg())
                .arg(entity_arg())
                .arg(force_arg()),
        )
        .subcommand(
            Command::new("create-full-resource")
                .about("Model, form, views, urls and templates in one go")
                .arg(app_arg())
                .arg(entity_arg())
                .arg(force_arg()),
        )
        .subcommand(
            Command::new("create-command")
                .about("Generate a management command skeleton")
                .arg(app_arg())
                .arg(
                    Arg::new("name")
                        .help("Command name (snake_case)")
                        .required(false)
                        .index(2),
                )
                .arg(
                    Arg::new("description")
                        .short('d')
                        .long("description")
                        .help("Help text shown by manage.py help"),
                ),
        )
        .subcommand(
            Command::new("create-service")
                .about("Add a service class to <app>/services.py")
                .arg(app_arg())
                .arg(
                    Arg::new("name")
                        .help("Service name; 'Service' is appended")
                        .required(false)
                        .index(2),
                ),
        )
        .subcommand(
            Command::new("list-routes")
                .about("List every url pattern of the project")
                .arg(
                    Arg::new("format")
                        .short('f')
                        .long("format")
                        .help("Output format")
                        .value_parser(["table", "json"])
                        .default_value("table"),
                ),
        )
        .subcommand(
            Command::new("setup-auth")
                .about("Generate a complete authentication app with groups")
                .arg(
                    Arg::new("app")
                        .long("app")
                        .help("App label for the authentication app")
                        .default_value("accounts"),
                ),
        )
        .subcommand(
            Command::new("configure-deployment")
                .about("Write deployment descriptors and production settings")
                .arg(
                    Arg::new("platform-name")
                        .short('p')
                        .long("platform-name")
                        .help("Target platform")
                        .value_parser(["render", "heroku"])
                        .default_value("render"),
                )
                .arg(force_arg()),
        )
        .subcommand(
            Command::new("generate-dependency-manifest")
                .about("Write pip freeze output to a requirements file")
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Output file")
                        .value_parser(clap::value_parser!(PathBuf))
                        .default_value("requirements.txt"),
                ),
        )
        .arg(
            Arg::new("project-root")
                .long("project-root")
                .help("Django project root (where manage.py lives)")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("yes")
                .short('y')
                .long("yes")
                .help("Accept the default answer for every prompt")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Verbose logging")
                .global(true)
                .action(ArgAction::SetTrue),
        )
}

fn start_session(matches: &clap::ArgMatches) -> anyhow::Result<Session> {
    let root = match matches.get_one::<PathBuf>("project-root") {
        Some(root) => root.clone(),
        None => std::env::current_dir()?,
    };

    let mut config = Config::load_from_dir(&root)?;
    if matches.get_flag("yes") {
        config.runtime.assume_yes = true;
    }
    if matches.get_flag("verbose") {
        config.runtime.verbose = true;
    }

    logging::init(&config.logging, config.runtime.verbose);

    let ctx = ProjectContext::resolve(&config.project);
    let prompter: Box<dyn Prompter> = if config.runtime.assume_yes {
        Box::new(DefaultsPrompter)
    } else {
        Box::new(TerminalPrompter)
    };
    Ok(Session::new(ctx, prompter))
}

async fn run_command(matches: clap::ArgMatches) -> anyhow::Result<()> {
    let mut session = start_session(&matches)?;

    match matches.subcommand() {
        Some(("init-project", _)) => {
            cli::commands::init::handle_init_project(&mut session).await?
        }
        Some(("create-app", sub_matches)) => {
            cli::commands::app::handle_create_app(sub_matches, &mut session).await?
        }
        Some(("create-entity", sub_matches)) => {
            cli::commands::entity::handle_create_entity(sub_matches, &mut session).await?
        }
        Some(("create-form", sub_matches)) => {
            cli::commands::resource::handle_create_form(sub_matches, &mut session).await?
        }
        Some(("create-handlers", sub_matches)) => {
            cli::commands::resource::handle_create_handlers(sub_matches, &mut session).await?
        }
        Some(("create-full-resource", sub_matches)) => {
            cli::commands::resource::handle_create_full_resource(sub_matches, &mut session).await?
        }
        Some(("create-command", sub_matches)) => {
            cli::commands::extras::handle_create_command(sub_matches, &mut session).await?
        }
        Some(("create-service", sub_matches)) => {
            cli::commands::extras::handle_create_service(sub_matches, &mut session).await?
        }
        Some(("list-routes", sub_matches)) => {
            cli::commands::routes::handle_list_routes(sub_matches, &session)?
        }
        Some(("setup-auth", sub_matches)) => {
            cli::commands::auth::handle_setup_auth(sub_matches, &mut session).await?
        }
        Some(("configure-deployment", sub_matches)) => {
            cli::commands::deploy::handle_configure_deployment(sub_matches, &mut session).await?
        }
        Some(("generate-dependency-manifest", sub_matches)) => {
            cli::commands::manifest::handle_generate_manifest(sub_matches, &mut session).await?
        }
        _ => {
            unreachable!("Command parsing should ensure we never reach this");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_missing_positionals_parse() {
        let matches = build_cli()
            .try_get_matches_from(["djangogen", "create-entity"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, "create-entity");
        assert!(sub.get_one::<String>("app").is_none());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let matches = build_cli()
            .try_get_matches_from(["djangogen", "list-routes", "--format", "json", "--yes"])
            .unwrap();
        assert!(matches.get_flag("yes"));
        let (_, sub) = matches.subcommand().unwrap();
        assert_eq!(sub.get_one::<String>("format").map(String::as_str), Some("json"));
    }
}
