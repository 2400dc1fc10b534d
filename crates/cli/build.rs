use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("lawdispatch")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert forum law pages into BBCode dispatches")
        .arg(
            clap::arg!(-c --config <FILE> "Config file")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-l --law <NAME> "Only update these laws (repeatable)")
                .value_name("NAME")
                .action(clap::ArgAction::Append),
        )
        .arg(clap::arg!(-i --input <INPUT> "Render a single local HTML file, or '-' for stdin"))
        .arg(clap::arg!(--no_template "Print the rendered BBCode without the template"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_name("FILE")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--skip_registry "Do not update the dispatch registry"))
        .arg(clap::arg!(--delay <SECS> "Seconds to wait between two laws"))
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
        .arg(clap::arg!(--user_agent <UA> "Custom User-Agent for HTTP requests").value_name("UA"))
        .arg(clap::arg!(-v --verbose "Enable debug logging"));

    for shell in [
        clap_complete::Shell::Bash,
        clap_complete::Shell::Zsh,
        clap_complete::Shell::Fish,
        clap_complete::Shell::PowerShell,
    ] {
        clap_complete::generate_to(shell, &mut cmd, "lawdispatch", &completions_dir).unwrap();
    }

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
