use clap::Parser;
use ha_passchart::get_hapasschart::{run, GetHaPassChart};
use simple_logger::SimpleLogger;
use std::process;

fn main() {
    SimpleLogger::new().init().unwrap();

    let args = GetHaPassChart::parse();

    if let Err(e) = run(&args) {
        eprintln!("get_hapasschart: {e}");
        process::exit(e.exit_code());
    }
}
