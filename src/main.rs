use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use raid_disk_stack::catalog::pricing::PricingCatalog;
use raid_disk_stack::catalog::snapshot::SnapshotCatalog;
use raid_disk_stack::catalog::MachineTypeCatalog;
use raid_disk_stack::{logger, synthesize_template};

const DEFAULT_OUTPUT: &str = "raid_12disks.yml";

/// Synthesizes the provisioning template for an EC2 node with cache and RAID
/// disk pools.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Where to write the rendered template.
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Region whose machine-type offer document to read.
    #[arg(long, default_value = "us-east-1")]
    region: String,

    /// Read the machine-type catalog from a local JSON snapshot instead of
    /// the pricing endpoint.
    #[arg(long)]
    catalog_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    logger::init();

    let cli = Cli::parse();

    let catalog: Box<dyn MachineTypeCatalog> = match &cli.catalog_file {
        Some(file_path) => Box::new(SnapshotCatalog::new(file_path.clone())),
        None => Box::new(PricingCatalog::new(&cli.region)),
    };

    let raw_machine_types = catalog.machine_types().context("machine-type catalog lookup failed")?;

    let rendered = synthesize_template(raw_machine_types).context("template synthesis failed")?;

    fs::write(&cli.output, &rendered)
        .with_context(|| format!("failed to write template to '{}'", cli.output.display()))?;

    log::info!("Template written to '{}'.", cli.output.display());
    Ok(())
}
