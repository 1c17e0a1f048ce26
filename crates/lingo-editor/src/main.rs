use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use lingo_editor::{Editor, EditorConfig};
use lingo_keys::{ConflictPrompt, KeyNode};
use lingo_resource::{LoadReport, ResourceType};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let dir = || {
        Arg::new("dir")
            .required(true)
            .value_parser(value_parser!(PathBuf))
            .help("Project directory")
    };
    let yes = || {
        Arg::new("yes")
            .long("yes")
            .short('y')
            .action(ArgAction::SetTrue)
            .help("Replace or merge an existing destination without asking")
    };

    Command::new("lingo")
        .version(lingo_editor::VERSION)
        .about("Translation key editor")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Editor configuration file (TOML)"),
        )
        .subcommand(
            Command::new("init")
                .about("Create a project in an existing directory")
                .arg(dir())
                .arg(
                    Arg::new("type")
                        .long("type")
                        .default_value("json")
                        .value_parser(["json", "properties"])
                        .help("Resource format"),
                ),
        )
        .subcommand(Command::new("keys").about("Print the key tree").arg(dir()))
        .subcommand(
            Command::new("add")
                .about("Add a translation key")
                .arg(dir())
                .arg(Arg::new("key").required(true)),
        )
        .subcommand(
            Command::new("remove")
                .about("Remove a translation key, or a group of keys with everything below it")
                .arg(dir())
                .arg(Arg::new("key").required(true)),
        )
        .subcommand(
            Command::new("rename")
                .about("Rename a key")
                .arg(dir())
                .arg(Arg::new("from").required(true))
                .arg(Arg::new("to").required(true))
                .arg(yes()),
        )
        .subcommand(
            Command::new("duplicate")
                .about("Copy a key to a new key")
                .arg(dir())
                .arg(Arg::new("from").required(true))
                .arg(Arg::new("to").required(true))
                .arg(yes()),
        )
        .subcommand(
            Command::new("add-locale")
                .about("Add a locale resource")
                .arg(dir())
                .arg(Arg::new("locale").required(true)),
        )
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lingo=info")))
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let mut editor = Editor::launch(config)?;

    let Some((command, args)) = matches.subcommand() else {
        bail!("no command given");
    };
    let dir = args.get_one::<PathBuf>("dir").context("missing project directory")?;

    if command == "init" {
        let kind: ResourceType = arg(args, "type")?.parse()?;
        editor.create_project(dir, kind)?;
        println!("Created {kind} project in {}", dir.display());
        return finish(&mut editor);
    }

    let report = editor
        .import_project(dir)
        .with_context(|| format!("cannot open project in {}", dir.display()))?;
    print_load_report(&report);

    match command {
        "keys" => {
            if let Some(project) = editor.project() {
                for node in project.resources().tree().root().children() {
                    print_node(node, 0);
                }
            }
        }
        "add" => {
            let key = arg(args, "key")?;
            if !editor.add_key(key)? {
                println!("'{key}' already exists");
            }
        }
        "remove" => {
            let removed = editor.remove_key(arg(args, "key")?)?;
            println!("Removed {} key(s)", removed.len());
        }
        "rename" | "duplicate" => {
            let (from, to) = (arg(args, "from")?, arg(args, "to")?);
            let yes = args.get_flag("yes");
            let confirm = |prompt: &ConflictPrompt| {
                if !yes {
                    eprintln!("{prompt}; pass --yes to proceed");
                }
                yes
            };
            let moves = if command == "rename" {
                editor.rename_key(from, to, confirm)?
            } else {
                editor.duplicate_key(from, to, confirm)?
            };
            println!("{} key(s) written under '{to}'", moves.len());
        }
        "add-locale" => {
            let locale = arg(args, "locale")?;
            editor.add_locale(locale)?;
            println!("Added locale {locale}");
        }
        other => bail!("unknown command '{other}'"),
    }

    finish(&mut editor)
}

fn arg<'a>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing argument <{name}>"))
}

/// Save if needed and close, failing when any resource was not written
fn finish(editor: &mut Editor) -> anyhow::Result<()> {
    let save = editor.is_dirty();
    let Some(report) = editor.close_project(save)? else {
        return Ok(());
    };
    for failure in &report.failed {
        eprintln!("failed to write {}: {}", failure.label, failure.error);
    }
    if !report.is_success() {
        bail!("{} resource(s) could not be written", report.failed.len());
    }
    Ok(())
}

fn print_load_report(report: &LoadReport) {
    for failure in &report.failed {
        eprintln!("failed to load {}: {}", failure.label, failure.error);
    }
    for rejected in &report.rejected {
        eprintln!("ignored invalid key {rejected}");
    }
}

fn print_node(node: KeyNode<'_>, depth: usize) {
    let marker = if node.is_leaf() { "" } else { "/" };
    println!("{:indent$}{}{marker}", "", node.name(), indent = depth * 2);
    for child in node.children() {
        print_node(child, depth + 1);
    }
}
