use anyhow::Result;
use bitlet::areas::repository::Repository;
use bitlet::errors::error_kind;
use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "bitlet",
    version = "0.1.0",
    about = "A small local version-control system",
    long_about = "bitlet tracks snapshots of a working directory: stage files, commit them, \
    branch, check out older states and merge branches with three-way conflict markers.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add {
        #[arg(index = 1)]
        file: String,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command records every staged change in a new commit on the active branch."
    )]
    Commit {
        #[arg(index = 1, default_value = "", help = "The commit message")]
        message: String,
    },
    #[command(name = "rm", about = "Stage a file for removal")]
    Rm {
        #[arg(index = 1)]
        file: String,
    },
    #[command(name = "log", about = "Show the history of the active branch")]
    Log,
    #[command(name = "global-log", about = "Show every commit ever made")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of the commits with the given message")]
    Find {
        #[arg(index = 1)]
        message: String,
    },
    #[command(name = "status", about = "Show branches, staged changes and untracked files")]
    Status,
    #[command(
        name = "checkout",
        about = "Switch branches or restore a file",
        long_about = "checkout <branch> switches to a branch, checkout -- <file> restores a file \
        from the active commit and checkout <commit> -- <file> restores it from another commit."
    )]
    Checkout {
        #[arg(index = 1, help = "Branch name, or commit id when a file is given")]
        target: Option<String>,
        #[arg(index = 2, last = true, help = "File to restore")]
        file: Option<String>,
    },
    #[command(name = "branch", about = "Create a branch at the active commit")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "reset", about = "Move the active branch and working tree to a commit")]
    Reset {
        #[arg(index = 1)]
        commit: String,
    },
    #[command(name = "merge", about = "Merge a branch into the active branch")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
}

fn open_repository(path: Option<&str>) -> Result<Repository> {
    match path {
        Some(path) => Repository::new(path, Box::new(std::io::stdout())),
        None => Repository::new(std::env::current_dir()?, Box::new(std::io::stdout())),
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Init { path } => open_repository(path.as_deref())?.init()?,
        Commands::Add { file } => open_repository(None)?.add(file)?,
        Commands::Commit { message } => {
            open_repository(None)?.commit(message)?;
        }
        Commands::Rm { file } => open_repository(None)?.rm(file)?,
        Commands::Log => open_repository(None)?.log()?,
        Commands::GlobalLog => open_repository(None)?.global_log()?,
        Commands::Find { message } => {
            open_repository(None)?.find(message)?;
        }
        Commands::Status => {
            open_repository(None)?.status()?;
        }
        Commands::Checkout { target, file } => {
            let repository = open_repository(None)?;
            match (target, file) {
                (Some(branch), None) => repository.checkout_branch(branch)?,
                (None, Some(file)) => repository.checkout_file(file)?,
                (Some(commit), Some(file)) => repository.checkout_file_from_commit(commit, file)?,
                (None, None) => anyhow::bail!("Incorrect operands."),
            }
        }
        Commands::Branch { name } => open_repository(None)?.branch(name)?,
        Commands::RmBranch { name } => open_repository(None)?.rm_branch(name)?,
        Commands::Reset { commit } => open_repository(None)?.reset(commit)?,
        Commands::Merge { branch } => {
            open_repository(None)?.merge(branch)?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            match error_kind(&error) {
                Some(kind) => println!("{}", kind),
                None => eprintln!("error: {:#}", error),
            }
            ExitCode::FAILURE
        }
    }
}
