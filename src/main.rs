use clap::Parser;
use miette::Result;
use mbi::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    // RUST_LOG wins over --verbose
    let level = if global.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();

    match cli.command {
        Commands::Inventory(args) => mbi::cli::commands::inventory::run(args, &global),
        Commands::Delivery(args) => mbi::cli::commands::delivery::run(args, &global),
        Commands::Projects(args) => mbi::cli::commands::projects::run(args, &global),
        Commands::Status(args) => mbi::cli::commands::status::run(args, &global),
        Commands::Sheets(args) => mbi::cli::commands::sheets::run(args, &global),
        Commands::Dashboard(args) => mbi::cli::commands::dashboard::run(args, &global),
        Commands::Config(cmd) => mbi::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => mbi::cli::commands::completions::run(args),
    }
}
