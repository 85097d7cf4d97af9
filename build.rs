// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

fn repo_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("repo")
            .short('r')
            .long("repo")
            .value_name("URL")
            .default_value("https://deb.debian.org/debian")
            .help("Repository base URL"),
    )
    .arg(
        Arg::new("arch")
            .short('a')
            .long("arch")
            .default_value("amd64")
            .help("Target architecture"),
    )
    .arg(
        Arg::new("dist")
            .short('d')
            .long("dist")
            .default_value("stable")
            .help("Distribution (suite) name"),
    )
    .arg(
        Arg::new("component")
            .short('c')
            .long("component")
            .default_value("main")
            .help("Repository component"),
    )
    .arg(
        Arg::new("version_order")
            .long("version-order")
            .value_parser(["lexical", "debian"])
            .default_value("lexical")
            .help("How versions are ordered when picking the newest"),
    )
}

fn build_cli() -> Command {
    Command::new("debfetch")
        .version(env!("CARGO_PKG_VERSION"))
        .author("debfetch Contributors")
        .about("Fetch the latest build of a package from a Debian-style repository")
        .subcommand_required(true)
        .subcommand(repo_args(
            Command::new("fetch")
                .about("Download the newest build of a package as <package>.deb")
                .arg(Arg::new("package").required(true).help("Package name (exact match)"))
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("PATH")
                        .help("Output file (default: ./<package>.deb)"),
                ),
        ))
        .subcommand(repo_args(
            Command::new("show")
                .about("Show the record that would be downloaded")
                .arg(Arg::new("package").required(true).help("Package name (exact match)"))
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(clap::ArgAction::SetTrue)
                        .help("Print the resolved package as JSON"),
                ),
        ))
        .subcommand(repo_args(
            Command::new("versions")
                .about("List every published version of a package, newest first")
                .arg(Arg::new("package").required(true).help("Package name (exact match)")),
        ))
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "elvish", "fish", "powershell", "zsh"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory
    let out_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).expect("Failed to create man directory");

    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();
    man.render(&mut buffer)
        .expect("Failed to render man page");

    let man_path = man_dir.join("debfetch.1");
    fs::write(&man_path, buffer).expect("Failed to write man page");
}
