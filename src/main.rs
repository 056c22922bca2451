use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use gltf_dump::{
    dump_mesh_data, format_transform_report, Document, ExportConfig, MeshData, SceneGraph,
};

#[derive(Parser)]
#[command(name = "gltf-dump")]
#[command(about = "Dumps glTF mesh geometry and node transforms as text")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump one mesh as OBJ-style text
    Mesh {
        /// Input .gltf file
        input: PathBuf,

        /// Mesh index
        #[arg(short, long, default_value_t = 0)]
        mesh: usize,

        /// Binary buffer (overrides buffers[0].uri)
        #[arg(short, long)]
        buffer: Option<PathBuf>,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Decimal places for every number
        #[arg(short, long)]
        precision: Option<usize>,
    },

    /// Print the world transform of every mesh-bearing node
    Transforms {
        /// Input .gltf file
        input: PathBuf,

        /// Decimal places for every number
        #[arg(short, long)]
        precision: Option<usize>,
    },
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Mesh {
            input,
            mesh,
            buffer,
            output,
            precision,
        } => {
            let config = export_config(precision);
            let document = load_document(&input)?;
            let buffer = load_buffer(&document, &input, buffer.as_deref())?;

            let mesh_data = MeshData::from_gltf(&document, &buffer, mesh)
                .with_context(|| format!("Failed to load mesh {} from {:?}", mesh, input))?;
            let text = dump_mesh_data(&mesh_data, &config)?;

            match output {
                Some(path) => fs::write(&path, text)
                    .with_context(|| format!("Failed to write output: {:?}", path))?,
                None => print!("{}", text),
            }
        }
        Commands::Transforms { input, precision } => {
            let config = export_config(precision);
            let document = load_document(&input)?;

            let scene = SceneGraph::from_gltf(&document)
                .with_context(|| format!("Failed to build scene graph from {:?}", input))?;
            print!(
                "{}",
                format_transform_report(&scene.mesh_transforms(), &config)
            );
        }
    }

    Ok(())
}

fn export_config(precision: Option<usize>) -> ExportConfig {
    let mut config = ExportConfig::default();
    if let Some(precision) = precision {
        config.precision = precision;
    }
    config
}

fn load_document(path: &Path) -> Result<Document> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read glTF: {:?}", path))?;
    Document::from_slice(&bytes).with_context(|| format!("Failed to parse glTF: {:?}", path))
}

/// Reads buffer 0, either from an explicit path or from the document's buffer URI.
fn load_buffer(document: &Document, input: &Path, explicit: Option<&Path>) -> Result<Vec<u8>> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let buffer = document
                .root.buffers
                .first()
                .context("Document has no buffers")?;
            if document.root.buffers.len() > 1 {
                log::warn!(
                    "Document has {} buffers, only buffer 0 is read",
                    document.root.buffers.len()
                );
            }

            let uri = buffer.uri.as_deref().context("Buffer 0 has no URI")?;
            if uri.starts_with("data:") {
                bail!("Embedded data URIs are not supported, pass --buffer instead");
            }
            input.parent().unwrap_or(Path::new(".")).join(uri)
        }
    };

    log::info!("Reading buffer {:?}", path);
    fs::read(&path).with_context(|| format!("Failed to read buffer: {:?}", path))
}
