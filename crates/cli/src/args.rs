use std::path::PathBuf;

use clap::{Parser, Subcommand};
use common::{CategoryId, ProductId};
use domain::{Money, SortOrder};

#[derive(Debug, Parser)]
#[command(name = "novaforge")]
#[command(about = "NovaForge video game store client", long_about = None)]
pub struct Cli {
    /// Storefront backend URL (overrides NOVAFORGE_BACKEND_URL)
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Directory holding the cart and session (overrides NOVAFORGE_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the catalog
    Catalog {
        /// Only products in this category
        #[arg(long)]
        category: Option<CategoryId>,

        /// Minimum price, VAT included
        #[arg(long)]
        min_price: Option<Money>,

        /// Maximum price, VAT included
        #[arg(long)]
        max_price: Option<Money>,

        /// name, price-asc or price-desc
        #[arg(long, default_value = "name")]
        sort: SortOrder,
    },

    /// Show the newest games
    Featured,

    /// List categories
    Categories,

    /// Show one product
    Product { id: ProductId },

    /// Add a product to the cart
    Add {
        id: ProductId,

        #[arg(long, short, default_value_t = 1)]
        quantity: u32,
    },

    /// Remove a product from the cart
    Remove { id: ProductId },

    /// Set a line's quantity (0 or less removes it)
    SetQuantity {
        id: ProductId,

        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },

    /// Empty the cart
    Clear,

    /// Show the cart with its tax breakdown
    Cart,

    /// Log in and remember the session
    Login { email: String, password: String },

    /// Forget the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// List past purchases
    Orders,

    /// Open a payment session for the cart
    Checkout,

    /// Record a successful payment (empties the cart)
    CheckoutComplete,

    /// Record a failed payment (keeps the cart)
    CheckoutCancel,
}
