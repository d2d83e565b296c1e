use clap::Parser;
use secrets::cli::{Action, Cli};

fn main() {
    let cli = Cli::parse();

    let result = match cli.action() {
        Action::Lookup(key) => secrets::cli::commands::lookup::execute(&cli, key),
        Action::List => secrets::cli::commands::list::execute(&cli),
        Action::Export => secrets::cli::commands::export::execute(&cli),
        Action::ShellSource => secrets::cli::commands::shell::execute(&cli),
        Action::Decrypt => secrets::cli::commands::decrypt::execute(&cli),
        Action::Encrypt(file) => secrets::cli::commands::encrypt::execute(&cli, file),
        Action::Edit => secrets::cli::commands::edit::execute(&cli),
        Action::Keygen => secrets::cli::commands::keygen::execute(&cli),
        Action::Rekey => secrets::cli::commands::rekey::execute(&cli),
        Action::Template => secrets::cli::commands::template::execute(&cli),
        Action::Completions(shell) => secrets::cli::commands::completions::execute(shell),
        #[cfg(feature = "audit-log")]
        Action::Audit => secrets::cli::commands::audit_cmd::execute(&cli),
    };

    if let Err(e) = result {
        secrets::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
