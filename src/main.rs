use brigade::cli::{Cli, Commands};
use clap::Parser;
use miette::Result;

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

    match cli.command {
        Commands::Init(args) => brigade::cli::commands::init::run(args),
        Commands::Ing(cmd) => brigade::cli::commands::ing::run(cmd, &global),
        Commands::Recipe(cmd) => brigade::cli::commands::recipe::run(cmd, &global),
        Commands::Cost(args) => brigade::cli::commands::cost::run(args, &global),
        Commands::Completions(args) => brigade::cli::commands::completions::run(args),
    }
}
