use anyhow::bail;
use clap::{Parser, Subcommand};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::Style;
use or_overlay_core::{
    api::CatalogClient,
    badge::{badge_for, BadgeLabel},
    cache,
    matcher::resolve_path,
    model::ModelRecord,
    pricing::{format_price, price_tier, PriceTier},
    PricingCatalog,
};

// ── Palette ──────────────────────────────────────────────────────────

fn s_header() -> Style { Style::new().color256(252).bold() }  // bright gray, bold
fn s_dim() -> Style    { Style::new().color256(248) }         // light gray
fn s_price() -> Style  { Style::new().color256(109) }         // teal

fn tier_style(tier: PriceTier) -> Style {
    match tier {
        PriceTier::Free     => Style::new().color256(114), // green
        PriceTier::Cheap    => Style::new().color256(109), // teal
        PriceTier::Mid      => Style::new().color256(214), // amber
        PriceTier::Premium  => Style::new().color256(139), // mauve
        PriceTier::Frontier => Style::new().color256(167), // red
    }
}

fn tier_color(tier: PriceTier) -> Color {
    match tier {
        PriceTier::Free     => Color::Green,
        PriceTier::Cheap    => Color::Cyan,
        PriceTier::Mid      => Color::Yellow,
        PriceTier::Premium  => Color::Magenta,
        PriceTier::Frontier => Color::Red,
    }
}

// ── CLI Args ─────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name = "or-overlay",
    about = "Resolve model link paths against the OpenRouter pricing catalog",
    version,
    after_help = "examples:\n  \
        or-overlay /openai/gpt-4\n  \
        or-overlay openai/gpt-4-20251217      (date-suffixed paths still resolve)\n  \
        or-overlay /azure/gpt-4 --json\n  \
        or-overlay list --limit 20\n  \
        or-overlay sync                        (refresh the cached catalog)"
)]
struct Cli {
    /// Link path (`/openai/gpt-4`) or bare model id (`openai/gpt-4`).
    path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,

    /// Machine-readable output.
    #[arg(long, short)]
    json: bool,

    /// Bypass the cached catalog.
    #[arg(long)]
    refresh: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog models with prices and tiers.
    List {
        #[arg(long, short, default_value_t = 50)]
        limit: usize,
    },
    /// Refresh the cached catalog.
    Sync,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::List { limit }) => list(limit, cli.json, cli.refresh).await,
        Some(Commands::Sync) => sync().await,
        None => match cli.path {
            Some(path) => resolve(&path, cli.json, cli.refresh).await,
            None => list(50, cli.json, cli.refresh).await,
        },
    }
}

// ── Catalog loading ──────────────────────────────────────────────────

async fn load_catalog(refresh: bool) -> anyhow::Result<PricingCatalog> {
    if !refresh {
        if let Some(catalog) = cache::load(cache::now_ms()) {
            return Ok(catalog);
        }
    }
    let models = CatalogClient::new().fetch_models().await?;
    let catalog = PricingCatalog::build(models);
    cache::store(&catalog, cache::now_ms());
    Ok(catalog)
}

// ── Commands ─────────────────────────────────────────────────────────

async fn resolve(query: &str, json: bool, refresh: bool) -> anyhow::Result<()> {
    let catalog = load_catalog(refresh).await?;
    let path = if query.starts_with('/') {
        query.to_string()
    } else {
        format!("/{query}")
    };

    let Some(model) = resolve_path(&path, &catalog) else {
        bail!("no pricing match for {query}");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(model)?);
        return Ok(());
    }
    print_model(model);
    Ok(())
}

fn print_model(model: &ModelRecord) {
    let badge = badge_for(model);
    println!(
        "{} {}",
        s_header().apply_to(&model.id),
        tier_style(badge.tier).apply_to(format!("[{}]", badge.tier))
    );
    if let Some(name) = &model.name {
        println!("  {}", s_dim().apply_to(name));
    }
    let label = match &badge.label {
        BadgeLabel::Free => "FREE".to_string(),
        BadgeLabel::Prices { input, output } => format!("{input}/{output}"),
    };
    println!(
        "  {}  {}",
        s_price().apply_to(label),
        s_dim().apply_to(&badge.title)
    );
}

async fn list(limit: usize, json: bool, refresh: bool) -> anyhow::Result<()> {
    let catalog = load_catalog(refresh).await?;

    if json {
        let shown = &catalog.models[..catalog.models.len().min(limit)];
        println!("{}", serde_json::to_string_pretty(shown)?);
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_BORDERS_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["model", "input $/M", "output $/M", "tier"]);
    for model in catalog.models.iter().take(limit) {
        let tier = price_tier(model.pricing.prompt.as_deref());
        table.add_row(vec![
            Cell::new(&model.id),
            Cell::new(format_price(model.pricing.prompt.as_deref())),
            Cell::new(format_price(model.pricing.completion.as_deref())),
            Cell::new(tier.as_str()).fg(tier_color(tier)),
        ]);
    }
    println!("{table}");
    println!(
        "{}",
        s_dim().apply_to(format!(
            "{} of {} models",
            catalog.len().min(limit),
            catalog.len()
        ))
    );
    Ok(())
}

async fn sync() -> anyhow::Result<()> {
    let previous = cache::cached_timestamp();
    let models = CatalogClient::new().fetch_models().await?;
    let catalog = PricingCatalog::build(models);
    cache::store(&catalog, cache::now_ms());

    if let Some(dt) = previous.and_then(|ts| chrono::DateTime::from_timestamp_millis(ts as i64)) {
        println!(
            "{}",
            s_dim().apply_to(format!("replaced catalog from {}", dt.format("%Y-%m-%d %H:%M UTC")))
        );
    }
    println!("cached {} models", catalog.len());
    if let Some(path) = cache::cache_path() {
        println!("{}", s_dim().apply_to(path.display().to_string()));
    }
    Ok(())
}
