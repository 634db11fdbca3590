use clap::Command;
use clap_complete::{generate, Shell};
use std::io::{self, Write};

pub fn run_completion(shell: Shell, command: &mut Command) {
    write_completion(shell, command, &mut io::stdout());
}

fn write_completion(shell: Shell, command: &mut Command, out: &mut dyn Write) {
    let name = command.get_name().to_string();
    generate(shell, command, name, out);
}
