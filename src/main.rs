use clap::Parser;
use miette::Result;

use gearguard::cli::commands::{
    auth, board, cache, calendar, completions, config, dashboard, equipment, report, request,
    team, user,
};
use gearguard::cli::{AppContext, Cli, Commands};
use gearguard::core::logging;

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
    logging::init(global.verbose, global.quiet);

    // These never touch the backend
    let command = match cli.command {
        Commands::Config(cmd) => return config::run(cmd),
        Commands::Completions(args) => return completions::run(args),
        other => other,
    };

    let mut ctx = AppContext::new(&global)?;

    match command {
        Commands::Login(args) => auth::run_login(args, &mut ctx),
        Commands::Logout => auth::run_logout(&mut ctx),
        Commands::Signup(args) => auth::run_signup(args, &ctx),
        Commands::Whoami => auth::run_whoami(&ctx),
        Commands::Status => auth::run_status(&ctx),
        Commands::Equipment(cmd) => equipment::run(cmd, &ctx),
        Commands::Request(cmd) => request::run(cmd, &ctx),
        Commands::Board(args) => board::run(args, &ctx),
        Commands::Calendar(args) => calendar::run(args, &ctx),
        Commands::Team(cmd) => team::run(cmd, &ctx),
        Commands::User(cmd) => user::run(cmd, &ctx),
        Commands::Report(args) => report::run(args, &ctx),
        Commands::Dashboard => dashboard::run(&ctx),
        Commands::Cache(cmd) => cache::run(cmd, &ctx),
        Commands::Config(_) | Commands::Completions(_) => Ok(()),
    }
}
