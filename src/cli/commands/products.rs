use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{client_from_session, output_product, output_products, output_success, read_json_stdin};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ProductCommands {
    #[command(about = "List all products")]
    List,

    #[command(about = "Show one product")]
    Get {
        #[arg(help = "Product ID")]
        id: u64,
    },

    #[command(about = "Create a product from a JSON object on stdin (ADMIN)")]
    Create,

    #[command(about = "Update a product from a JSON object on stdin (ADMIN)")]
    Update {
        #[arg(help = "Product ID")]
        id: u64,
    },

    #[command(about = "Delete a product (ADMIN)")]
    Delete {
        #[arg(help = "Product ID")]
        id: u64,
    },
}

pub async fn handle(
    cmd: ProductCommands,
    server: Option<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let client = client_from_session(server)?;

    match cmd {
        ProductCommands::List => output_products(&output_format, &client.list_products().await?),
        ProductCommands::Get { id } => output_product(&output_format, &client.get_product(id).await?),
        ProductCommands::Create => {
            let data = read_json_stdin()?;
            let product = client.create_product(&data).await?;
            output_product(&output_format, &product)
        }
        ProductCommands::Update { id } => {
            let data = read_json_stdin()?;
            let product = client.update_product(id, &data).await?;
            output_product(&output_format, &product)
        }
        ProductCommands::Delete { id } => {
            client.delete_product(id).await?;
            output_success(
                &output_format,
                &format!("Product {} deleted", id),
                Some(json!({ "id": id })),
            )
        }
    }
}
