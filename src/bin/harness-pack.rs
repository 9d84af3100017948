//! One-shot packaging CLI: unpack a function archive, install its
//! dependencies, and build a runnable image.

use anyhow::Result;
use clap::{Parser, Subcommand};
use harness_packaging::{
    dockerfile_for, image_tag, BuildOptions, ImageBuilder, Installer, RuntimeKind, ZipHandler,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "harness-pack", about = "Function packaging for the FaaS harness")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a function archive and extract it to a directory
    Unpack {
        zip: PathBuf,
        dest: PathBuf,
        #[arg(long, default_value_t = 50)]
        max_size_mb: u64,
    },
    /// Install a function's dependencies into its directory (one-shot)
    Install {
        #[arg(long)]
        runtime: String,
        dir: PathBuf,
    },
    /// Print the generated Dockerfile for a runtime
    Dockerfile {
        #[arg(long)]
        runtime: String,
        #[arg(long)]
        base_image: Option<String>,
        #[arg(long, default_value = "latest")]
        version: String,
    },
    /// Build a function image with the local Docker daemon
    Build {
        #[arg(long)]
        runtime: String,
        #[arg(long)]
        name: String,
        dir: PathBuf,
        #[arg(long)]
        base_image: Option<String>,
        #[arg(long, default_value = "latest")]
        version: String,
        #[arg(long)]
        tag: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Unpack {
            zip,
            dest,
            max_size_mb,
        } => {
            let zip_data = std::fs::read(&zip)?;
            let handler = ZipHandler::new(max_size_mb * 1024 * 1024);
            let archive = handler.process_zip(&zip_data).await?;
            handler.extract_to_directory(&zip_data, &dest).await?;
            info!(
                files = archive.files.len(),
                sha256 = %archive.sha256,
                dest = %dest.display(),
                "archive unpacked"
            );
            println!("{}", archive.sha256);
        }
        Commands::Install { runtime, dir } => {
            let runtime = RuntimeKind::parse(&runtime)?;
            Installer::new().install_dependencies(runtime, &dir).await?;
        }
        Commands::Dockerfile {
            runtime,
            base_image,
            version,
        } => {
            let runtime = RuntimeKind::parse(&runtime)?;
            let options = BuildOptions {
                base_image,
                version,
            };
            print!("{}", dockerfile_for(runtime, &options));
        }
        Commands::Build {
            runtime,
            name,
            dir,
            base_image,
            version,
            tag,
        } => {
            let runtime = RuntimeKind::parse(&runtime)?;
            let options = BuildOptions {
                base_image,
                version,
            };
            let image_ref = tag.unwrap_or_else(|| image_tag(&name, &options.version));
            ImageBuilder::new()
                .build_image(&name, runtime, &dir, &options, &image_ref)
                .await?;
            println!("{image_ref}");
        }
    }

    Ok(())
}
