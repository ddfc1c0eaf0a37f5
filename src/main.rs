//! Headless driver for the shop client.
//!
//! Runs one action against the configured inventory service and prints the
//! resulting notification plus, where relevant, the visible inventory. The
//! session persists between runs, so `login` once and then `list`, `buy`, ...

use anyhow::Context;
use sweet_shop_client::app::messages;
use sweet_shop_client::{
    AuthMode, ClientConfig, Credentials, FileStorage, FilterCriteria, InventoryClient, Outcome,
    SessionStore, Shop, SweetId,
};
use tracing_subscriber::EnvFilter;

type CliShop = Shop<InventoryClient, FileStorage>;

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: sweet-shop <command> [args]\n\
         \n\
         Commands:\n\
           login <username> <password>\n\
           register <username> <password>\n\
           list [name] [category] [min-price] [max-price]\n\
           buy <id>\n\
           restock <id> <quantity>\n\
           delete <id>\n\
           logout\n\
         \n\
         Env vars (all optional):\n\
           SWEET_SHOP_API_BASE, SWEET_SHOP_SESSION_DIR, SWEET_SHOP_SESSION_KEY,\n\
           SWEET_SHOP_NOTIFICATION_SECS, SWEET_SHOP_LOGOUT_ON_UNAUTHORIZED\n"
    );
    std::process::exit(2);
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }

    let config = ClientConfig::from_env().context("invalid configuration")?;
    let storage = FileStorage::new(&config.session_dir);
    let shop = Shop::with_config(
        InventoryClient::new(config.api_base.clone()),
        SessionStore::with_key(storage, config.session_key.clone()),
        &config,
    );

    let command = args[0].as_str();
    let rest = &args[1..];

    let outcome = match command {
        "login" | "register" => {
            let [username, password] = rest else { usage_and_exit() };
            let mode = if command == "login" { AuthMode::Login } else { AuthMode::Register };
            let outcome = shop.authenticate(&Credentials::new(username, password), mode).await;
            if outcome.is_done() {
                print_inventory(&shop).await;
            }
            outcome
        }
        "list" => {
            let input = |i: usize| rest.get(i).map(String::as_str).unwrap_or("");
            shop.set_criteria(FilterCriteria::from_inputs(input(0), input(1), input(2), input(3)))
                .await;
            restore(&shop).await?;
            print_inventory(&shop).await;
            Outcome::Done
        }
        "buy" => {
            let id = parse_id(rest.first())?;
            restore(&shop).await?;
            shop.purchase(id).await
        }
        "restock" => {
            let [id, quantity] = rest else { usage_and_exit() };
            let id = parse_id(Some(id))?;
            restore(&shop).await?;
            shop.restock(id, quantity).await
        }
        "delete" => {
            let id = parse_id(rest.first())?;
            restore(&shop).await?;
            shop.delete(id).await
        }
        "logout" => shop.logout().await,
        _ => usage_and_exit(),
    };

    if let Some(notification) = shop.notification().await {
        println!("{}", notification.text);
    }
    if let Outcome::Failed(err) = outcome {
        anyhow::bail!(err);
    }
    Ok(())
}

/// Loads the persisted session; every command but `login`/`register`/`logout`
/// needs one.
async fn restore(shop: &CliShop) -> anyhow::Result<()> {
    match shop.restore().await {
        Outcome::Skipped => anyhow::bail!("not signed in; run `sweet-shop login <username> <password>` first"),
        Outcome::Failed(err) => {
            if let Some(notification) = shop.notification().await {
                println!("{}", notification.text);
            }
            Err(anyhow::Error::new(err).context(messages::LOAD_FAILED))
        }
        Outcome::Done => Ok(()),
    }
}

fn parse_id(raw: Option<&String>) -> anyhow::Result<SweetId> {
    let raw = raw.map(String::as_str).unwrap_or_else(|| usage_and_exit());
    let id = raw
        .parse::<i64>()
        .with_context(|| format!("'{raw}' is not a sweet id"))?;
    Ok(SweetId(id))
}

async fn print_inventory(shop: &CliShop) {
    let snapshot = shop.snapshot().await;
    if let Some(username) = &snapshot.username {
        println!("Signed in as {username}");
    }
    println!(
        "{} of {} sweets{}",
        snapshot.visible.len(),
        snapshot.total,
        if snapshot.criteria.is_empty() { "" } else { " (filtered)" }
    );
    for sweet in &snapshot.visible {
        let stock = if sweet.in_stock() {
            format!("{} in stock", sweet.quantity)
        } else {
            "out of stock".to_string()
        };
        println!(
            "  #{:<4} {:<24} {:<16} {:>8}  {}",
            sweet.id, sweet.name, sweet.category, sweet.price, stock
        );
    }
}
