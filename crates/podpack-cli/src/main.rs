use std::path::PathBuf;

use anstyle::{AnsiColor, Effects, Style};
use anyhow::Result;
use clap::{Parser, Subcommand};
use podpack_core::CancellationToken;
use podpack_store::{
    add_remote, default_system_scope_root, default_user_scope_root, load_remotes, FsStore,
    RemoteRecord,
};
use podpack_transaction::{FirstRemoteChooser, Transaction, TransactionOptions};

#[derive(Parser, Debug)]
#[command(name = "podpack")]
#[command(about = "Manage sandboxed application bundles and their runtimes", long_about = None)]
struct Cli {
    #[arg(long, global = true)]
    system: bool,
    #[arg(long, global = true, value_name = "PATH")]
    prefix: Option<PathBuf>,
    #[arg(long, global = true)]
    no_pull: bool,
    #[arg(long, global = true)]
    no_deploy: bool,
    #[arg(long, global = true)]
    no_deps: bool,
    #[arg(long, global = true)]
    no_related: bool,
    #[arg(short = 'y', long, global = true)]
    assumeyes: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    RemoteAdd {
        name: String,
        url: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        disabled: bool,
        #[arg(long)]
        tag: Option<String>,
    },
    RemoteList,
    Install {
        remote: String,
        #[arg(value_name = "REF")]
        bundle_ref: String,
        #[arg(long = "subpath", value_name = "SUBPATH")]
        subpaths: Vec<String>,
    },
    Update {
        #[arg(value_name = "REF")]
        bundle_ref: String,
        #[arg(long)]
        commit: Option<String>,
        #[arg(long = "subpath", value_name = "SUBPATH")]
        subpaths: Vec<String>,
    },
    InstallOci {
        uri: String,
        tag: String,
    },
    List,
}

fn main() {
    env_logger::init();

    if let Err(err) = run_cli(Cli::parse()) {
        eprintln!("{} {err:#}", colorize(error_style(), "error:"));
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    let store = open_store(&cli)?;

    match &cli.command {
        Commands::RemoteAdd {
            name,
            url,
            title,
            disabled,
            tag,
        } => {
            store.layout().ensure_base_dirs()?;
            add_remote(
                store.layout(),
                RemoteRecord {
                    name: name.clone(),
                    url: url.clone(),
                    title: title.clone(),
                    disabled: *disabled,
                    tag: tag.clone(),
                },
            )?;
            println!("Added remote {name}");
        }
        Commands::RemoteList => {
            let remotes = load_remotes(store.layout())?;
            if remotes.remotes.is_empty() {
                println!("No remotes configured");
            }
            for remote in &remotes.remotes {
                let marker = if remote.disabled {
                    colorize(dim_style(), " (disabled)")
                } else {
                    String::new()
                };
                println!("{} {}{marker}", remote.name, remote.url);
            }
        }
        Commands::Install {
            remote,
            bundle_ref,
            subpaths,
        } => {
            store.layout().ensure_base_dirs()?;
            let mut tx = transaction_for(&cli, &store);
            tx.add_install(remote, bundle_ref, subpath_filter(subpaths))?;
            tx.run(true, &CancellationToken::new())?;
        }
        Commands::Update {
            bundle_ref,
            commit,
            subpaths,
        } => {
            store.layout().ensure_base_dirs()?;
            let mut tx = transaction_for(&cli, &store);
            tx.add_update(bundle_ref, subpath_filter(subpaths), commit.clone())?;
            tx.run(false, &CancellationToken::new())?;
        }
        Commands::InstallOci { uri, tag } => {
            store.layout().ensure_base_dirs()?;
            let mut tx = transaction_for(&cli, &store);
            tx.add_install_from_oci(uri, tag)?;
            tx.run(true, &CancellationToken::new())?;
        }
        Commands::List => {
            let deployed = store.list_deployed()?;
            if deployed.is_empty() {
                println!("No bundles installed");
            }
            for (bundle_ref, data) in deployed {
                let short: String = data.commit.chars().take(12).collect();
                println!("{bundle_ref} {} {short}", data.origin);
            }
        }
    }

    Ok(())
}

fn open_store(cli: &Cli) -> Result<FsStore> {
    if cli.system {
        let root = cli
            .prefix
            .clone()
            .unwrap_or_else(default_system_scope_root);
        return Ok(FsStore::system_scope(root));
    }

    let root = match &cli.prefix {
        Some(prefix) => prefix.clone(),
        None => default_user_scope_root()?,
    };
    Ok(FsStore::user_scope(root, default_system_scope_root()))
}

fn transaction_for<'a>(cli: &Cli, store: &'a FsStore) -> Transaction<'a> {
    let options = TransactionOptions {
        no_pull: cli.no_pull,
        no_deploy: cli.no_deploy,
        add_deps: !cli.no_deps,
        add_related: !cli.no_related,
    };

    let tx = Transaction::new(store, options);
    if cli.assumeyes {
        tx.with_chooser(FirstRemoteChooser)
    } else {
        tx
    }
}

fn subpath_filter(subpaths: &[String]) -> Option<Vec<String>> {
    if subpaths.is_empty() {
        None
    } else {
        Some(subpaths.to_vec())
    }
}

fn error_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightRed.into()))
        .effects(Effects::BOLD)
}

fn dim_style() -> Style {
    Style::new().effects(Effects::DIMMED)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}

#[cfg(test)]
mod tests;
