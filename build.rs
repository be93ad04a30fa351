// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Arguments shared by every recipe command
fn recipe_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("recipe")
            .default_value("brigade.toml")
            .help("Path to the recipe file"),
    )
    .arg(
        Arg::new("option")
            .short('o')
            .long("option")
            .value_name("NAME=VALUE")
            .action(ArgAction::Append)
            .help("Option override (repeatable)"),
    )
    .arg(
        Arg::new("setting")
            .short('s')
            .long("setting")
            .value_name("KEY=VALUE")
            .action(ArgAction::Append)
            .help("Platform setting, e.g. os=Windows (repeatable)"),
    )
    .arg(
        Arg::new("profile")
            .short('p')
            .long("profile")
            .help("Profile file with settings, options and configure arguments"),
    )
    .arg(
        Arg::new("cache")
            .long("cache")
            .help("Dependency package cache"),
    )
}

fn build_folder_arg() -> Arg {
    Arg::new("build_folder")
        .short('b')
        .long("build-folder")
        .help("Build folder (default: from the recipe layout)")
}

fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print machine-readable JSON")
}

fn build_cli() -> Command {
    Command::new("brigade")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Brigade Contributors")
        .about("Evaluate declarative build recipes and cook them with CMake")
        .subcommand_required(true)
        .subcommand(
            recipe_args(Command::new("inspect"))
                .about("Resolve options and dependencies without building")
                .arg(json_arg()),
        )
        .subcommand(
            recipe_args(Command::new("generate"))
                .about("Validate the recipe and write toolchain files")
                .arg(build_folder_arg()),
        )
        .subcommand(
            recipe_args(Command::new("cook"))
                .about("Run every phase: validate, generate, configure, build, package, describe")
                .arg(build_folder_arg())
                .arg(
                    Arg::new("package_folder")
                        .long("package-folder")
                        .help("Install prefix for the package phase"),
                )
                .arg(
                    Arg::new("jobs")
                        .short('j')
                        .long("jobs")
                        .help("Number of parallel build jobs"),
                )
                .arg(
                    Arg::new("configure_arg")
                        .long("configure-arg")
                        .value_name("ARG")
                        .action(ArgAction::Append)
                        .allow_hyphen_values(true)
                        .help("Extra argument for the configure step (repeatable)"),
                )
                .arg(json_arg()),
        )
        .subcommand(
            Command::new("describe")
                .about("Print the package descriptor as JSON")
                .arg(
                    Arg::new("recipe")
                        .default_value("brigade.toml")
                        .help("Path to the recipe file"),
                ),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "elvish", "fish", "powershell", "zsh"])
                        .help("Shell to generate completions for"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("brigade.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
