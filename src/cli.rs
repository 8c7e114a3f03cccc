// cli.rs - Command-line interface configuration
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(name = "fridge-farm")]
#[command(about = "Helix farm fridge viewer", long_about = None)]
pub struct Cli {
    /// Hide the control panel (Space still toggles the door)
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// Initial window width in logical pixels
    #[arg(long, default_value_t = 1280, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: u32,

    /// Initial window height in logical pixels
    #[arg(long, default_value_t = 720, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: u32,

    /// Print the pod placements as JSON and exit
    #[arg(long = "print-layout")]
    pub print_layout: bool,
}
