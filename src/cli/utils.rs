use std::io::Read;

use serde_json::{json, Map, Value};

use crate::cli::client::ApiClient;
use crate::cli::config::{load_session, Session};
use crate::cli::{OutputFormat, DEFAULT_SERVER};
use crate::store::models::Product;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = Map::new();
            response.insert("success".to_string(), json!(true));
            response.insert("message".to_string(), json!(message));

            if let Some(Value::Object(extra)) = data {
                response.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Print a single product
pub fn output_product(output_format: &OutputFormat, product: &Product) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(product)?),
        OutputFormat::Text => {
            println!("#{} {}", product.id, product.title);
            println!("Price: {:.2}", product.price);
            println!("Category: {}", product.category);
            println!(
                "Rating: {:.1} ({} reviews)",
                product.rating.rate, product.rating.count
            );
            println!("Image: {}", product.image);
            println!("{}", product.description);
        }
    }
    Ok(())
}

/// Print a product listing, one line per product in text mode
pub fn output_products(output_format: &OutputFormat, products: &[Product]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(products)?),
        OutputFormat::Text => {
            if products.is_empty() {
                println!("No products");
                return Ok(());
            }
            println!("{:>6}  {:>10}  {:<20}  TITLE", "ID", "PRICE", "CATEGORY");
            for product in products {
                println!(
                    "{:>6}  {:>10.2}  {:<20}  {}",
                    product.id,
                    product.price,
                    truncate(&product.category, 20),
                    product.title
                );
            }
        }
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

/// Read a JSON object from stdin (create/update payloads).
pub fn read_json_stdin() -> anyhow::Result<Value> {
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    parse_json_object(&input)
}

pub fn parse_json_object(input: &str) -> anyhow::Result<Value> {
    let value: Value = serde_json::from_str(input.trim())
        .map_err(|e| anyhow::anyhow!("stdin is not valid JSON: {}", e))?;

    if !value.is_object() {
        anyhow::bail!("expected a JSON object on stdin");
    }
    Ok(value)
}

/// Server from the flag, else the stored session, else the local default.
pub fn resolve_server(flag: Option<String>, session: Option<&Session>) -> String {
    flag.or_else(|| session.map(|s| s.server.clone()))
        .unwrap_or_else(|| DEFAULT_SERVER.to_string())
}

/// Client for `server`, carrying the stored token when the session belongs to it.
pub fn client_from_session(server: Option<String>) -> anyhow::Result<ApiClient> {
    let session = load_session()?;
    let base = resolve_server(server, session.as_ref());
    let client = ApiClient::new(base);

    Ok(match session {
        Some(s) if s.server.trim_end_matches('/') == client.base_url() => client.with_token(s.token),
        _ => client,
    })
}
