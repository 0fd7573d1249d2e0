use clap::{Parser, Subcommand, ValueEnum};

/// Bare-metal target of the Cortex-M3 board.
pub const FIRMWARE_TARGET: &str = "thumbv7m-none-eabi";

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Package {
    #[value(name = "error")]
    Error,
    #[value(name = "hal")]
    Hal,
    #[value(name = "timer")]
    Timer,
}

impl Package {
    pub const ALL: [Self; 3] = [Self::Error, Self::Hal, Self::Timer];

    pub fn crate_name(self) -> &'static str {
        match self {
            Self::Error => "axt_error",
            Self::Hal => "axt_hal",
            Self::Timer => "axt_timer",
        }
    }

    /// Whether the crate has a `std` feature for hosted tests.
    pub fn has_std_feature(self) -> bool {
        !matches!(self, Self::Error)
    }
}

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "AXI timer pool developer tasks")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Run host unit and integration tests with the simulated hardware.
    ///
    /// Usage:
    ///   cargo xtask test
    ///   cargo xtask test timer --verbose-dispatch
    Test {
        /// Limit the run to one crate.
        #[arg(value_enum)]
        package: Option<Package>,

        #[arg(
            long = "verbose-dispatch",
            help = "Build the timer crate with per-channel dispatch tracing."
        )]
        verbose_dispatch: bool,
    },

    /// Build the no_std crates for the board target.
    Check {
        #[arg(long, default_value = FIRMWARE_TARGET)]
        target: String,

        #[arg(long, help = "Build in release mode (size-optimised profile).")]
        release: bool,
    },

    /// Check that the toolchain has what the other tasks need.
    Doctor,
}
