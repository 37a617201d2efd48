use bitpos::dto::{CreateProductDto, UpdateProductDto};
use bitpos::money::Btc;
use clap::Subcommand;

use crate::client::BitposClient;
use crate::output::{self, OutputConfig};

/// Product catalog commands for vendors
#[derive(Subcommand, Debug)]
pub enum ProductCommands {
    /// List the logged-in vendor's products
    List,
    /// Add a product to the catalog
    Add {
        #[clap(long)]
        name: String,
        /// Unit price in BTC
        #[clap(long)]
        price: Btc,
        #[clap(long)]
        description: Option<String>,
        #[clap(long)]
        image_url: Option<String>,
    },
    /// Change fields of an existing product
    Update {
        /// The product ID
        id: String,
        #[clap(long)]
        name: Option<String>,
        /// Unit price in BTC
        #[clap(long)]
        price: Option<Btc>,
        #[clap(long)]
        description: Option<String>,
        /// Pass an empty string to remove the image
        #[clap(long)]
        image_url: Option<String>,
    },
    /// Delete a product that no order refers to
    Delete {
        /// The product ID
        id: String,
    },
}

/// Executes a product command
pub async fn execute(
    client: &BitposClient,
    cmd: ProductCommands,
    config: &OutputConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ProductCommands::List => {
            let products = client.list_products().await?;
            output::print_products(&products, config);
        }
        ProductCommands::Add {
            name,
            price,
            description,
            image_url,
        } => {
            let product = client
                .add_product(&CreateProductDto {
                    name,
                    description,
                    price_btc: price,
                    image_url,
                })
                .await?;
            output::print_product(&product, config);
        }
        ProductCommands::Update {
            id,
            name,
            price,
            description,
            image_url,
        } => {
            let product = client
                .update_product(
                    &id,
                    &UpdateProductDto {
                        name,
                        description,
                        price_btc: price,
                        image_url,
                    },
                )
                .await?;
            output::print_product(&product, config);
        }
        ProductCommands::Delete { id } => {
            client.delete_product(&id).await?;
            output::print_done(&format!("Deleted product {}", id), config);
        }
    }
    Ok(())
}
