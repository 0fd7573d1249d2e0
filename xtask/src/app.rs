use anyhow::Result;

pub fn run(cli: crate::cli::Cli) -> Result<()> {
    match cli.cmd {
        crate::cli::Cmd::Test {
            package,
            verbose_dispatch,
        } => crate::tasks::unit::run(package, verbose_dispatch),
        crate::cli::Cmd::Check { target, release } => crate::tasks::check::run(&target, release),
        crate::cli::Cmd::Doctor => crate::tasks::doctor::run(),
    }
}
