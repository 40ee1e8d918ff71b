use clap::Parser;
use tracing_subscriber::EnvFilter;

use localsafe::cli::commands::{self, add::AddArgs, update::UpdateArgs};
use localsafe::cli::{output, Cli, Commands, Context, TrashCommand};
use localsafe::errors::Result;
use localsafe::vault::Selector;

/// Env var holding the tracing filter (e.g. `LOCALSAFE_LOG=debug`).
const LOG_ENV: &str = "LOCALSAFE_LOG";

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    // Completions need no config or vault.
    if let Commands::Completions { shell } = cli.command {
        return commands::completions::execute(shell);
    }

    let ctx = Context::load(cli)?;

    // Unattended trash retention; never blocks the command.
    let policy = ctx.settings.retention_policy();
    if policy.trash_older_than.is_some() {
        match ctx.vault() {
            Ok(vault) => {
                policy.run_at_startup(&vault);
            }
            Err(e) => tracing::warn!(error = %e, "retention skipped"),
        }
    }

    match cli.command {
        Commands::Init => commands::init::execute(&ctx),
        Commands::Status => commands::status::execute(&ctx),
        Commands::Add {
            ref name,
            ref username,
            ref url,
            ref secret,
            ref note,
            ref tags,
            ref passphrase,
        } => commands::add::execute(
            &ctx,
            &AddArgs {
                name: name.as_deref(),
                username: username.as_deref(),
                url: url.as_deref(),
                secret: secret.as_deref(),
                note: note.as_deref(),
                tags: tags.as_deref(),
                passphrase: passphrase.as_deref(),
            },
        ),
        Commands::List {
            ref tag,
            ref domain,
            json,
        } => commands::list::execute(&ctx, tag.as_deref(), domain.as_deref(), json),
        Commands::View {
            ref id,
            ref name,
            ref passphrase,
            json,
        } => commands::view::execute(
            &ctx,
            id.as_deref(),
            name.as_deref(),
            passphrase.as_deref(),
            json,
        ),
        Commands::Tag {
            ref id,
            ref name,
            ref tags,
        } => commands::tag::execute(&ctx, id.as_deref(), name.as_deref(), tags),
        Commands::Update {
            ref id,
            ref name,
            ref new_name,
            ref username,
            ref url,
            ref tags,
            ref secret,
            ref note,
            ref passphrase,
            ref new_passphrase,
        } => commands::update::execute(
            &ctx,
            &UpdateArgs {
                id: id.as_deref(),
                name: name.as_deref(),
                new_name: new_name.as_deref(),
                username: username.as_deref(),
                url: url.as_deref(),
                tags: tags.as_deref(),
                secret: secret.as_deref(),
                note: note.as_deref(),
                passphrase: passphrase.as_deref(),
                new_passphrase: new_passphrase.as_deref(),
            },
        ),
        Commands::Delete {
            ref id,
            ref name,
            ref tag,
            ref domain,
            soft,
            ref confirm,
        } => commands::delete::execute(
            &ctx,
            Selector::from_parts(
                id.as_deref(),
                name.as_deref(),
                tag.as_deref(),
                domain.as_deref(),
            ),
            soft,
            confirm.as_deref(),
        ),
        Commands::Verify { fix } => commands::verify::execute(&ctx, fix),
        Commands::Trash { ref action } => match action {
            TrashCommand::List { action, name } => {
                commands::trash::list(&ctx, action.as_deref(), name.as_deref())
            }
            TrashCommand::Restore { id, name, confirm } => commands::trash::restore(
                &ctx,
                id.as_deref(),
                name.as_deref(),
                confirm.as_deref(),
            ),
            TrashCommand::Purge {
                before,
                older_than,
                confirm,
            } => commands::trash::purge(
                &ctx,
                before.as_deref(),
                older_than.as_deref(),
                confirm.as_deref(),
            ),
        },
        Commands::Export {
            ref format,
            pretty,
            ref dest,
            ref confirm,
        } => commands::export::execute(
            &ctx,
            format,
            pretty,
            dest.as_deref(),
            confirm.as_deref(),
        ),
        Commands::Audit { last, ref since } => {
            commands::audit_cmd::execute(&ctx, last, since.as_deref())
        }
        Commands::Completions { .. } => Ok(()),
    }
}
