use clap::{Arg, ArgAction, Command};

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .help("Output in JSON format")
        .action(ArgAction::SetTrue)
}

pub fn build_cli() -> Command {
    Command::new("hostprobe")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Query windows, write access and memory of the running host")
        .long_about(
            "hostprobe answers three questions about the machine it runs on: whether a \
             window owned by a given executable has a title matching a pattern, whether the \
             current user can write to a path according to its access-control list, and how \
             much physical memory is in use.",
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("window")
                .about("Find the first window of a process whose title matches a pattern")
                .arg(
                    Arg::new("process")
                        .long("process")
                        .short('p')
                        .help("Executable base name, e.g. notepad.exe (defaults to [window] process)"),
                )
                .arg(
                    Arg::new("title")
                        .long("title")
                        .short('t')
                        .help("Regular expression the window title must match")
                        .required(true),
                )
                .arg(
                    Arg::new("buffer-len")
                        .long("buffer-len")
                        .help("Window text buffer length in UTF-16 units, terminator included")
                        .value_parser(clap::value_parser!(u16).range(2..=32768)),
                )
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("writable")
                .about("Check whether the current user can write to a path")
                .arg(
                    Arg::new("path")
                        .help("File or directory to check")
                        .required(true)
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    Arg::new("explain")
                        .long("explain")
                        .help("Show which access-control entry decided the result")
                        .action(ArgAction::SetTrue),
                )
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("memory")
                .about("Show system memory status")
                .arg(json_arg()),
        )
}
