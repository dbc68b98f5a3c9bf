use anyhow::Result;
use build_patcher::maven::{PomSummary, ReportFields};
use build_patcher::xml::{AttrRules, DeleteRules, RewritePipeline, RewriteRequest};
use build_patcher::{
    cvv, manifest::Manifest, properties::BuildProperties, rewrite_file, rewrite_str, rules_file,
    RewriteOutcome,
};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "build-patcher")]
#[command(about = "Structural rewriting for Java build files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite attributes in Ant build.xml / Maven build files
    Rewrite(RewriteArgs),

    /// Query or edit build.properties and MANIFEST.MF files
    Buildparser {
        /// File format; detected from the file name when omitted
        #[arg(short = 't', long = "type", value_enum)]
        file_type: Option<FileType>,

        /// Edit the file in place when replacing
        #[arg(short, long)]
        in_place: bool,

        /// [node name] [replacement] <filename>
        #[arg(num_args = 1..=3, required = true)]
        args: Vec<String>,
    },

    /// Verify class-file versions against a target Java release
    Cvv {
        /// Recurse into directories
        #[arg(short, long)]
        recurse: bool,

        /// Target version that is valid, e.g. "1.8" or "8"
        #[arg(short, long)]
        target: String,

        /// Print the version of every class
        #[arg(short, long)]
        verbose: bool,

        /// No per-class output
        #[arg(short, long)]
        silent: bool,

        /// Only print the offending file names
        #[arg(short, long)]
        file_only: bool,

        /// Class files or directories to check; jar archives are not inspected
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },

    /// Summarize a Maven pom.xml
    Pom {
        /// Print the group id
        #[arg(long)]
        group: bool,

        /// Print whether the pom inherits from a parent
        #[arg(long)]
        ischild: bool,

        /// Print the artifact id
        #[arg(long)]
        artifact: bool,

        /// Print the version
        #[arg(long = "pom-version")]
        version: bool,

        /// Print the declared dependencies
        #[arg(long)]
        dependencies: bool,

        file: PathBuf,
    },
}

#[derive(clap::Args)]
struct RewriteArgs {
    /// Transform files instead of operating on stdin and stdout
    #[arg(short = 'f', long = "file")]
    files: Vec<PathBuf>,

    /// Load the ruleset from a TOML file instead of flags
    #[arg(long, conflicts_with_all = ["change", "delete", "gentoo_classpath", "maven_cleaning"])]
    rules: Option<PathBuf>,

    /// Change the value of an attribute, creating it when absent
    #[arg(short = 'c', long)]
    change: bool,

    /// Delete attributes from matching elements
    #[arg(short = 'd', long)]
    delete: bool,

    /// Element tag to change; repeat for multiple elements
    #[arg(short = 'e', long = "element")]
    elements: Vec<String>,

    /// Attribute of the matching elements to change; repeat to chain pairs
    #[arg(short = 'a', long = "attribute")]
    attributes: Vec<String>,

    /// Value to set the attribute to
    #[arg(short = 'v', long = "value")]
    values: Vec<String>,

    /// Element tag to change in source scope only
    #[arg(short = 'r', long = "source-element")]
    source_elements: Vec<String>,

    /// Attribute to change in source scope only
    #[arg(short = 't', long = "source-attribute")]
    source_attributes: Vec<String>,

    /// Value for the source-scope attribute
    #[arg(short = 'y', long = "source-value")]
    source_values: Vec<String>,

    /// Element tag to change in target scope only
    #[arg(short = 'b', long = "target-element")]
    target_elements: Vec<String>,

    /// Attribute to change in target scope only
    #[arg(short = 'k', long = "target-attribute")]
    target_attributes: Vec<String>,

    /// Value for the target-scope attribute
    #[arg(short = 'l', long = "target-value")]
    target_values: Vec<String>,

    /// Element tag to delete attributes from
    #[arg(short = 'n', long = "delete-element")]
    delete_elements: Vec<String>,

    /// Attribute of the matching elements to delete
    #[arg(short = 'm', long = "delete-attribute")]
    delete_attributes: Vec<String>,

    /// Restrict changes to the nth match, counting from zero
    #[arg(short = 'i', long)]
    index: Option<usize>,

    /// Rewrite build.xml to use gentoo.classpath where applicable
    #[arg(short = 'g', long = "gentoo-classpath")]
    gentoo_classpath: bool,

    /// Clean up a maven-generated build.xml
    #[arg(short = 'q', long = "maven-cleaning")]
    maven_cleaning: bool,

    /// Extra project dirs in classpath notation, appended to the placeholder
    #[arg(short = 's', long = "multi-project-dirs")]
    multi_project_dirs: Vec<String>,

    /// Classpath placeholder to inject
    #[arg(long)]
    classpath: Option<String>,

    /// Show a unified diff of the changes
    #[arg(long)]
    diff: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum FileType {
    Manifest,
    Buildprops,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rewrite(args) => cmd_rewrite(args),

        Commands::Buildparser {
            file_type,
            in_place,
            args,
        } => cmd_buildparser(file_type, in_place, args),

        Commands::Cvv {
            recurse,
            target,
            verbose,
            silent,
            file_only,
            paths,
        } => cmd_cvv(recurse, &target, verbose, silent, file_only, &paths),

        Commands::Pom {
            group,
            ischild,
            artifact,
            version,
            dependencies,
            file,
        } => cmd_pom(group, ischild, artifact, version, dependencies, &file),
    }
}

/// Helper: show a unified diff between original and rewritten content.
fn display_diff(file: &str, original: &str, modified: &str) {
    println!("\n{}", format!("--- {} (original)", file).dimmed());
    println!("{}", format!("+++ {} (rewritten)", file).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
}

fn build_request(args: &RewriteArgs) -> Result<RewriteRequest> {
    if let Some(rules_path) = &args.rules {
        return Ok(rules_file::load_from_path(rules_path)?);
    }

    Ok(RewriteRequest {
        change: args.change,
        delete_mode: args.delete,
        global: AttrRules::new(
            args.elements.clone(),
            args.attributes.clone(),
            args.values.clone(),
        ),
        source: AttrRules::new(
            args.source_elements.clone(),
            args.source_attributes.clone(),
            args.source_values.clone(),
        ),
        target: AttrRules::new(
            args.target_elements.clone(),
            args.target_attributes.clone(),
            args.target_values.clone(),
        ),
        delete: DeleteRules::new(args.delete_elements.clone(), args.delete_attributes.clone()),
        index: args.index,
        gentoo_classpath: args.gentoo_classpath,
        maven_cleanup: args.maven_cleaning,
        multi_project_dirs: args.multi_project_dirs.clone(),
        classpath: args.classpath.clone(),
    })
}

fn cmd_rewrite(args: RewriteArgs) -> Result<()> {
    let request = build_request(&args)?;
    let pipeline = RewritePipeline::new(request)?;

    // No files means filter mode: stdin to stdout, diagnostics on stderr.
    if args.files.is_empty() {
        let mut input = String::new();
        std::io::stdin().read_to_string(&mut input)?;
        let (output, _) = rewrite_str(&input, &pipeline)?;
        print!("{}", output);
        return Ok(());
    }

    let mut rewritten = 0;
    let mut unchanged = 0;
    let mut failed = 0;

    for file in &args.files {
        let before = if args.diff {
            fs::read_to_string(file).ok()
        } else {
            None
        };

        match rewrite_file(file, &pipeline) {
            Ok(RewriteOutcome::Rewritten) => {
                println!("{} {}: rewritten", "✓".green(), file.display());
                rewritten += 1;

                if let Some(before) = before {
                    if let Ok(after) = fs::read_to_string(file) {
                        display_diff(&file.display().to_string(), &before, &after);
                    }
                }
            }
            Ok(RewriteOutcome::Unchanged) => {
                println!("{} {}: unchanged", "⊙".yellow(), file.display());
                unchanged += 1;
            }
            Err(e) => {
                eprintln!("{} {}: {}", "✗".red(), file.display(), e);
                failed += 1;
            }
        }
    }

    println!();
    println!("{}", "Summary:".bold());
    println!("  {} rewritten", format!("{}", rewritten).green());
    println!("  {} unchanged", format!("{}", unchanged).yellow());
    println!("  {} failed", format!("{}", failed).red());

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn detect_file_type(explicit: Option<FileType>, path: &Path) -> Result<FileType> {
    if let Some(t) = explicit {
        return Ok(t);
    }
    match path.file_name().and_then(|n| n.to_str()) {
        Some("MANIFEST.MF") => Ok(FileType::Manifest),
        Some("build.properties") => Ok(FileType::Buildprops),
        _ => anyhow::bail!("unknown file type, specify with --type"),
    }
}

fn cmd_buildparser(file_type: Option<FileType>, in_place: bool, args: Vec<String>) -> Result<()> {
    // The file name is always the last positional.
    let path = PathBuf::from(args.last().expect("clap enforces at least one arg"));
    let file_type = detect_file_type(file_type, &path)?;

    match file_type {
        FileType::Manifest => {
            let contents = fs::read_to_string(&path)?;
            let mut doc = Manifest::parse(&contents)?;
            match args.as_slice() {
                [name, replacement, _] => {
                    doc.set(name, replacement);
                    if in_place {
                        fs::write(&path, doc.serialize())?;
                    } else {
                        print!("{}", doc.serialize());
                    }
                }
                [name, _] => {
                    if let Some(value) = doc.get(name) {
                        println!("{}", value);
                    }
                }
                _ => {
                    for name in doc.names() {
                        println!("{}", name);
                    }
                }
            }
        }
        FileType::Buildprops => {
            let mut doc = BuildProperties::from_path(&path);
            match args.as_slice() {
                [name, replacement, _] => {
                    doc.set(name, replacement);
                    if in_place {
                        fs::write(&path, doc.serialize())?;
                    } else {
                        print!("{}", doc.serialize());
                    }
                }
                [name, _] => {
                    if let Some(value) = doc.value(name) {
                        println!("{}", value);
                    }
                }
                _ => {
                    for name in doc.names() {
                        println!("{}", name);
                    }
                }
            }
        }
    }

    Ok(())
}

fn cmd_cvv(
    recurse: bool,
    target: &str,
    verbose: bool,
    silent: bool,
    file_only: bool,
    paths: &[PathBuf],
) -> Result<()> {
    let Some(target) = cvv::parse_target(target) else {
        eprintln!("invalid target version: {}", target);
        std::process::exit(2);
    };

    let mut check = cvv::VersionCheck::new(target);

    for path in paths {
        if path.is_file() {
            check.check_file(path)?;
        } else if recurse && path.is_dir() {
            check.check_dir(path)?;
        }
    }

    if file_only {
        let mut seen = std::collections::BTreeSet::new();
        for record in &check.bad {
            if seen.insert(&record.path) {
                println!("{}", record.path.display());
            }
        }
    } else {
        if verbose {
            for record in &check.good {
                println!(
                    "{} {} {}",
                    "Good:".green(),
                    record.release(),
                    record.path.display()
                );
            }
        }

        if !silent {
            for record in &check.bad {
                println!(
                    "{} {} {}",
                    "Bad:".red(),
                    record.release(),
                    record.path.display()
                );
            }
        }

        println!("CVV: {}", check.target());
        println!(
            "Checked: {} Good: {} Bad: {}",
            check.checked(),
            check.good.len(),
            check.bad.len()
        );
    }

    if !check.bad.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_pom(
    group: bool,
    ischild: bool,
    artifact: bool,
    version: bool,
    dependencies: bool,
    file: &Path,
) -> Result<()> {
    let contents = fs::read_to_string(file)?;
    let summary = PomSummary::parse(&contents)?;

    // With no field flags, print everything.
    let fields = if group || ischild || artifact || version || dependencies {
        ReportFields {
            group,
            is_child: ischild,
            artifact,
            version,
            dependencies,
        }
    } else {
        ReportFields::all()
    };

    print!("{}", summary.report(&fields));
    Ok(())
}
