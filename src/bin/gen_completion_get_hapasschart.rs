use clap::CommandFactory;
use clap_complete::{generate, Shell};
use ha_passchart::get_hapasschart::GetHaPassChart;
use std::io;

fn main() {
    let mut command = GetHaPassChart::command();
    let bin_name = command.get_name().to_string();

    generate(Shell::Bash, &mut command, bin_name, &mut io::stdout())
}
