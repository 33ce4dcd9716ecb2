use colored::Colorize;
use std::fmt::Display;

pub fn write_heading(title: &str) {
    println!("{}", title.green().bold());
}

pub fn write_field(label: &str, value: impl Display) {
    println!("{}: {}", label.yellow(), value);
}

pub fn write_ok(msg: impl Display) {
    println!("{} {}", "OK".green(), msg);
}

pub fn write_error(err: &anyhow::Error) {
    eprintln!("{} {:#}", "error:".red().bold(), err);
}
