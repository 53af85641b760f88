//! Command dispatch.

use std::io::Write;
use std::path::{Path, PathBuf};

use client::{AuthSession, CatalogService, CheckoutService, ClientError, StorefrontApi};
use domain::{CartStore, CatalogQuery, Money, PriceRange};
use storage::FileStorage;

use crate::args::Command;
use crate::error::CliError;
use crate::render;

/// Runs commands against a backend, keeping the cart and session in
/// `data_dir`.
pub struct App<A> {
    api: A,
    data_dir: PathBuf,
}

impl<A: StorefrontApi + Clone> App<A> {
    pub fn new(api: A, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            api,
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn storage(&self) -> FileStorage {
        FileStorage::new(&self.data_dir)
    }

    fn cart(&self) -> CartStore<FileStorage> {
        CartStore::open(self.storage())
    }

    fn session(&self) -> AuthSession<FileStorage> {
        AuthSession::restore(self.storage())
    }

    /// Executes one command, writing its output to `out`.
    #[tracing::instrument(skip_all)]
    pub async fn run<W: Write>(&self, command: Command, out: &mut W) -> Result<(), CliError> {
        let catalog = CatalogService::new(self.api.clone());

        match command {
            Command::Catalog {
                category,
                min_price,
                max_price,
                sort,
            } => {
                let mut query = CatalogQuery::new().sorted_by(sort);
                if let Some(category) = category {
                    query = query.in_category(category);
                }
                if min_price.is_some() || max_price.is_some() {
                    let range = PriceRange::new(
                        min_price.unwrap_or(Money::zero()),
                        max_price.unwrap_or(Money::from_cents(i64::MAX)),
                    )?;
                    query = query.priced_within(range);
                }
                render::products(out, &catalog.browse(&query).await)?;
            }
            Command::Featured => render::products(out, &catalog.featured().await)?,
            Command::Categories => render::categories(out, &catalog.categories().await)?,
            Command::Product { id } => render::product_detail(out, &catalog.product(id).await?)?,
            Command::Add { id, quantity } => {
                let product = catalog.product(id).await?;
                if !product.in_stock() {
                    return Err(CliError::OutOfStock(id));
                }

                let mut cart = self.cart();
                cart.add_item(product.to_line_item(quantity))?;
                if let Some(line) = cart.added_line() {
                    render::added(out, line)?;
                }
                if cart.is_popover_open() {
                    render::mini_cart(out, cart.count(), cart.total())?;
                }
            }
            Command::Remove { id } => {
                let mut cart = self.cart();
                cart.remove_item(id);
                render::mini_cart(out, cart.count(), cart.total())?;
            }
            Command::SetQuantity { id, quantity } => {
                let mut cart = self.cart();
                cart.update_quantity(id, quantity)?;
                render::mini_cart(out, cart.count(), cart.total())?;
            }
            Command::Clear => {
                self.cart().clear();
                writeln!(out, "Cart cleared.")?;
            }
            Command::Cart => {
                let cart = self.cart();
                render::cart(out, cart.items(), &cart.tax_breakdown())?;
            }
            Command::Login { email, password } => {
                let mut session = self.session();
                let user = session.login(&self.api, &email, &password).await?;
                write!(out, "Logged in as ")?;
                render::user(out, user)?;
            }
            Command::Logout => {
                self.session().logout()?;
                writeln!(out, "Logged out.")?;
            }
            Command::Whoami => match self.session().user() {
                Some(user) => render::user(out, user)?,
                None => writeln!(out, "Not logged in.")?,
            },
            Command::Orders => {
                let session = self.session();
                let user = session.user().ok_or(ClientError::NotAuthenticated)?;
                let purchases = self.api.purchase_history(user.id).await?;
                render::purchases(out, &purchases)?;
            }
            Command::Checkout => {
                let payment = CheckoutService::new(self.api.clone())
                    .begin(&self.cart(), &self.session())
                    .await?;
                writeln!(out, "Complete your payment at:")?;
                writeln!(out, "{}", payment.payment_url)?;
            }
            Command::CheckoutComplete => {
                CheckoutService::new(self.api.clone()).complete(&mut self.cart());
                writeln!(out, "Payment completed. Thank you for your purchase!")?;
            }
            Command::CheckoutCancel => {
                let cart = self.cart();
                CheckoutService::new(self.api.clone()).cancel(&cart);
                writeln!(out, "Payment was not completed. Your cart has been kept.")?;
            }
        }

        Ok(())
    }
}
