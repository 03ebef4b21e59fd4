use std::{env, fs, path::PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let mut cmd = clap::Command::new("harvest")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Harvest Contributors")
        .about("Extract named fields from web pages with CSS selectors")
        .arg(clap::arg!(<INPUT> "URL to fetch, local HTML file, or '-' for stdin"))
        .arg(
            clap::arg!(-s --select <RULE> "Field rule as NAME=CSS (repeatable)")
                .value_name("NAME=CSS")
                .action(clap::ArgAction::Append),
        )
        .arg(
            clap::arg!(--all <NAME> "Take every match for field NAME")
                .value_name("NAME")
                .action(clap::ArgAction::Append),
        )
        .arg(
            clap::arg!(--order <RULE> "Take match number N (zero-based) for field NAME")
                .value_name("NAME=N")
                .action(clap::ArgAction::Append),
        )
        .arg(
            clap::arg!(--"no-strip" <NAME> "Keep surrounding whitespace for field NAME")
                .value_name("NAME")
                .action(clap::ArgAction::Append),
        )
        .arg(
            clap::arg!(-r --rules <FILE> "JSON rule set file mapping field names to rules")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(--"rules-dir" <DIR> "Directory of saved <domain>.json rule sets")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(
            clap::arg!(-f --format <FORMAT> "Output format (json, text)")
                .default_value("json")
                .value_parser(["json", "text"]),
        )
        .arg(clap::arg!(--compact "Print JSON on a single line"))
        .arg(
            clap::arg!(-o --output <FILE> "Output file (default: stdout)")
                .value_parser(clap::value_parser!(std::path::PathBuf)),
        )
        .arg(clap::arg!(--timeout <SECS> "HTTP timeout in seconds").default_value("30"))
        .arg(clap::arg!(--"user-agent" <UA> "Custom User-Agent for HTTP requests").value_name("UA"))
        .arg(clap::arg!(-v --verbose "Print progress and per-field diagnostics to stderr"));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "harvest", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "harvest", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "harvest", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "harvest", &completions_dir).unwrap();

    println!(
        "cargo:warning=Shell completions generated in: {}",
        completions_dir.display()
    );
}
