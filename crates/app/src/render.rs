//! Terminal rendering for the catalog, the cart and proposals.

use std::io;

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Money, iso};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};

use crate::domain::{
    carts::models::Cart,
    orders::notice::Notice,
    products::models::Product,
    recommendations::models::Proposal,
};

/// Format a backend price as US dollars.
///
/// Prices the currency type cannot hold fall back to the plain decimal.
#[must_use]
pub fn format_price(price: Decimal) -> String {
    price
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|minor| minor.round().to_i64())
        .map_or_else(
            || format!("${price}"),
            |minor| Money::from_minor(minor, iso::USD).to_string(),
        )
}

/// Write the catalog table.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_catalog<'a>(
    out: &mut impl io::Write,
    products: impl IntoIterator<Item = &'a Product>,
) -> io::Result<()> {
    let mut builder = Builder::default();

    builder.push_record(["SKU", "Name", "Price", "Stock"]);

    for product in products {
        builder.push_record([
            product.sku.to_string(),
            product.item_name.clone(),
            format_price(product.price),
            product.stock.to_string(),
        ]);
    }

    write_table(out, builder, 2..4)
}

/// Write a single product with its description.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_product(out: &mut impl io::Write, product: &Product) -> io::Result<()> {
    writeln!(out, "{} ({})", product.item_name, product.sku)?;
    writeln!(out, "Price: {}", format_price(product.price))?;
    writeln!(out, "Stock: {}", product.stock)?;
    writeln!(out, "Image: {}", product.image_url)?;

    if let Some(description) = &product.description {
        writeln!(out, "\n{description}")?;
    }

    Ok(())
}

/// Write the cart table and its total.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_cart(out: &mut impl io::Write, cart: &Cart) -> io::Result<()> {
    if cart.is_empty() {
        return writeln!(out, "Your cart is empty.");
    }

    let mut builder = Builder::default();

    builder.push_record(["SKU", "Name", "Qty", "Price", "Line total"]);

    for line in cart.lines() {
        builder.push_record([
            line.sku().to_string(),
            line.product.item_name.clone(),
            line.quantity.to_string(),
            format_price(line.product.price),
            line.line_total().map_or_else(|| "-".to_string(), format_price),
        ]);
    }

    write_table(out, builder, 2..5)?;

    writeln!(
        out,
        "Total: {} ({} items)",
        format_price(cart.total()),
        cart.item_count()
    )
}

/// Write a recommendation proposal.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_proposal(out: &mut impl io::Write, proposal: &Proposal) -> io::Result<()> {
    writeln!(out, "{}", proposal.summary)?;

    if !proposal.recommended_items.is_empty() {
        let mut builder = Builder::default();

        builder.push_record(["SKU", "Name", "Price", "Why"]);

        for item in &proposal.recommended_items {
            builder.push_record([
                item.sku.to_string(),
                item.item_name.clone(),
                format_price(item.price),
                item.rationale.clone(),
            ]);
        }

        write_table(out, builder, 2..3)?;
    }

    writeln!(
        out,
        "Estimated cost: {}",
        format_price(proposal.estimated_cost)
    )
}

/// Write a success notice.
///
/// # Errors
///
/// Returns an error if writing to `out` fails.
pub fn write_notice(out: &mut impl io::Write, notice: &Notice) -> io::Result<()> {
    writeln!(out, "✔ {}", notice.message)
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    numeric: std::ops::Range<usize>,
) -> io::Result<()> {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Rows::first(), Color::BOLD);
    table.modify(Columns::new(numeric), Alignment::right());

    writeln!(out, "{table}")
}
