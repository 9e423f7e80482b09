//! Storefront CLI

use std::{
    error::Error,
    io::{self, Write},
    process::ExitCode,
    time::Duration,
};

use clap::{Args, Parser, Subcommand};
use storefront_app::{
    config::StorefrontConfig,
    context::AppContext,
    domain::{
        carts::store::CartView,
        orders::CheckoutForm,
        products::models::{Sku, filter_products},
        recommendations::add_recommended,
    },
    observability, render,
};
use tracing::error;

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront CLI", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: StorefrontConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse the catalog
    Products(ProductsCommand),

    /// Inspect and change the persisted cart
    Cart(CartCommand),

    /// Submit the cart as an order
    Checkout(CheckoutArgs),

    /// Place an order described in plain language
    Order(TextArgs),

    /// Ask for products that address a problem
    Recommend(RecommendArgs),
}

#[derive(Debug, Args)]
struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    /// List the catalog
    List {
        /// Only show products whose name or SKU contains this text
        #[arg(long, default_value = "")]
        search: String,
    },

    /// Show one product
    Show {
        sku: String,

        /// Also add one unit to the cart
        #[arg(long)]
        add: bool,
    },
}

#[derive(Debug, Args)]
struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart and its total
    Show,

    /// Add one unit of a product
    Add { sku: String },

    /// Remove a product's line entirely
    Remove { sku: String },

    /// Empty the cart
    Clear,

    /// Follow the cart as other sessions change it, until Ctrl-C
    Watch {
        /// How often to check the persisted cart, in milliseconds
        #[arg(long, default_value_t = 500)]
        interval_ms: u64,
    },
}

#[derive(Debug, Args)]
struct CheckoutArgs {
    /// Customer name
    #[arg(long)]
    name: String,

    /// Customer email
    #[arg(long)]
    email: String,

    /// Request priority handling
    #[arg(long)]
    priority: bool,
}

#[derive(Debug, Args)]
struct TextArgs {
    /// Free text; multiple words are joined with spaces
    #[arg(required = true, num_args = 1..)]
    text: Vec<String>,
}

#[derive(Debug, Args)]
struct RecommendArgs {
    #[command(flatten)]
    problem: TextArgs,

    /// Add every recommended product to the cart
    #[arg(long)]
    add: bool,
}

#[tokio::main]
pub async fn main() -> ExitCode {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(init_error) = observability::init_subscriber(&cli.config.logging) {
        report(&init_error.to_string());

        return ExitCode::FAILURE;
    }

    let app = AppContext::from_config(&cli.config);
    let mut out = io::stdout().lock();

    match run(cli.command, &app, &mut out).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!(%message, "command failed");

            report(&message);

            ExitCode::FAILURE
        }
    }
}

fn report(message: &str) {
    #[expect(
        clippy::print_stderr,
        reason = "final user-facing error, independent of the log filter"
    )]
    {
        eprintln!("{message}");
    }
}

async fn run(command: Commands, app: &AppContext, out: &mut impl Write) -> Result<(), String> {
    match command {
        Commands::Products(ProductsCommand { command }) => match command {
            ProductsSubcommand::List { search } => list_products(app, out, &search).await,
            ProductsSubcommand::Show { sku, add } => show_product(app, out, &sku, add).await,
        },
        Commands::Cart(CartCommand { command }) => match command {
            CartSubcommand::Show => show_cart(app, out),
            CartSubcommand::Add { sku } => add_to_cart(app, out, &sku).await,
            CartSubcommand::Remove { sku } => remove_from_cart(app, out, &sku),
            CartSubcommand::Clear => clear_cart(app, out),
            CartSubcommand::Watch { interval_ms } => {
                watch_cart(app, out, Duration::from_millis(interval_ms)).await
            }
        },
        Commands::Checkout(args) => checkout(app, out, args).await,
        Commands::Order(args) => place_order(app, out, &args.text.join(" ")).await,
        Commands::Recommend(args) => {
            recommend(app, out, &args.problem.text.join(" "), args.add).await
        }
    }
}

async fn list_products(app: &AppContext, out: &mut impl Write, search: &str) -> Result<(), String> {
    let products = app
        .products
        .list_products()
        .await
        .map_err(|error| describe("failed to load products", &error))?;

    render::write_catalog(out, filter_products(&products, search)).map_err(write_failed)
}

async fn show_product(
    app: &AppContext,
    out: &mut impl Write,
    sku: &str,
    add: bool,
) -> Result<(), String> {
    let product = app
        .products
        .get_product(&Sku::from(sku))
        .await
        .map_err(|error| describe(&format!("failed to load product {sku}"), &error))?;

    render::write_product(out, &product).map_err(write_failed)?;

    if add {
        let mut view = app.carts.attach();

        match view.add_item(&product) {
            Some(quantity) => writeln!(out, "\nAdded to cart (now {quantity})."),
            None => writeln!(out, "\nNot added: the cart total would be too large."),
        }
        .map_err(write_failed)?;

        view.detach();
    }

    Ok(())
}

fn show_cart(app: &AppContext, out: &mut impl Write) -> Result<(), String> {
    let view = app.carts.attach();

    render::write_cart(out, view.cart()).map_err(write_failed)?;

    view.detach();

    Ok(())
}

async fn add_to_cart(app: &AppContext, out: &mut impl Write, sku: &str) -> Result<(), String> {
    let product = app
        .products
        .get_product(&Sku::from(sku))
        .await
        .map_err(|error| describe(&format!("failed to load product {sku}"), &error))?;

    with_view(app, out, |view| {
        view.add_item(&product);
    })
}

fn remove_from_cart(app: &AppContext, out: &mut impl Write, sku: &str) -> Result<(), String> {
    let sku = Sku::from(sku);

    with_view(app, out, |view| {
        view.remove_item(&sku);
    })
}

fn clear_cart(app: &AppContext, out: &mut impl Write) -> Result<(), String> {
    with_view(app, out, CartView::clear)
}

/// Apply `change` to a fresh view and print the resulting cart.
fn with_view(
    app: &AppContext,
    out: &mut impl Write,
    change: impl FnOnce(&mut CartView),
) -> Result<(), String> {
    let mut view = app.carts.attach();

    change(&mut view);

    render::write_cart(out, view.cart()).map_err(write_failed)?;

    view.detach();

    Ok(())
}

async fn watch_cart(app: &AppContext, out: &mut impl Write, period: Duration) -> Result<(), String> {
    let mut view = app.carts.attach();
    let watcher = app
        .carts
        .watch_slot(period)
        .map_err(|error| describe("failed to watch the cart", &error))?;

    render::write_cart(out, view.cart()).map_err(write_failed)?;
    out.flush().map_err(write_failed)?;

    loop {
        tokio::select! {
            changed = view.changed() => {
                let event = changed.map_err(|error| describe("cart updates stopped", &error))?;

                writeln!(out, "\nCart changed ({}):", event.origin).map_err(write_failed)?;
                render::write_cart(out, view.cart()).map_err(write_failed)?;
                out.flush().map_err(write_failed)?;
            }
            signal = tokio::signal::ctrl_c() => {
                signal.map_err(|error| describe("failed to listen for Ctrl-C", &error))?;

                break;
            }
        }
    }

    watcher.stop();
    view.detach();

    Ok(())
}

async fn checkout(app: &AppContext, out: &mut impl Write, args: CheckoutArgs) -> Result<(), String> {
    let form = CheckoutForm {
        customer_name: args.name,
        email: args.email,
        is_priority: args.priority,
    };

    let mut view = app.carts.attach();

    let notice = app
        .checkout()
        .submit(&mut view, &form)
        .await
        .map_err(|error| describe("checkout failed", &error))?;

    view.detach();

    render::write_notice(out, &notice).map_err(write_failed)
}

async fn place_order(app: &AppContext, out: &mut impl Write, text: &str) -> Result<(), String> {
    let outcome = app
        .intake()
        .submit(text)
        .await
        .map_err(|error| describe("order intake failed", &error))?;

    // An unrecognized extraction is only logged.
    match outcome {
        Some(outcome) => render::write_notice(out, &outcome.notice).map_err(write_failed),
        None => Ok(()),
    }
}

async fn recommend(
    app: &AppContext,
    out: &mut impl Write,
    problem: &str,
    add: bool,
) -> Result<(), String> {
    let proposal = app
        .recommendations
        .recommend(problem)
        .await
        .map_err(|error| describe("recommendation failed", &error))?;

    render::write_proposal(out, &proposal).map_err(write_failed)?;

    if add {
        let mut view = app.carts.attach();
        let added = add_recommended(app.products.as_ref(), &mut view, &proposal).await;

        writeln!(out, "\nAdded {added} recommended items to your cart.").map_err(write_failed)?;

        view.detach();
    }

    Ok(())
}

/// `context: cause: cause...`
fn describe(context: &str, error: &dyn Error) -> String {
    let mut message = format!("{context}: {error}");
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(&format!(": {cause}"));
        source = cause.source();
    }

    message
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "passed directly to map_err"
)]
fn write_failed(error: io::Error) -> String {
    format!("failed to write output: {error}")
}
