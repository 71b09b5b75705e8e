use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use rolodex_core::catalog::{
    BlogCategory, BlogPost, Catalog, Deal, DealQuery, DealSort, IndexDatum, IndexGroup,
};
use rolodex_core::prep::{
    Carousel, Difficulty, Flashcard, FlashcardQuery, Industry, InterviewInsight, Topic,
};
use rolodex_core::{
    extract_domain, format_currency_abbreviated, format_date_compact, format_date_verbose,
    select_most_recent,
};

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
pub enum DealsCommand {
    List(DealsListArgs),
    Recent(DealsRecentArgs),
    Sectors,
    Banks,
    /// Firms on the logo wall
    Logos,
}

#[derive(Args, Debug)]
pub struct DealsListArgs {
    #[arg(long)]
    pub sector: Option<String>,
    #[arg(long)]
    pub bank: Option<String>,
    #[arg(long, alias = "query")]
    pub search: Option<String>,
    #[arg(long, default_value_t = DealSort::Date)]
    pub sort: DealSort,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct DealsRecentArgs {
    #[arg(short = 'n', long, default_value_t = 2)]
    pub count: usize,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
pub enum BlogCommand {
    List(BlogListArgs),
    Show(BlogShowArgs),
}

#[derive(Args, Debug)]
pub struct BlogListArgs {
    #[arg(long)]
    pub category: Option<BlogCategory>,
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct BlogShowArgs {
    pub slug: String,
}

#[derive(Args, Debug)]
pub struct MarketsArgs {
    #[arg(long)]
    pub group: Option<IndexGroup>,
}

#[derive(Args, Debug)]
pub struct FlashcardsArgs {
    #[arg(long)]
    pub difficulty: Option<Difficulty>,
    #[arg(long)]
    pub industry: Option<Industry>,
    #[arg(long)]
    pub topic: Option<Topic>,
    /// Advance this many cards before showing one; wraps past the end
    #[arg(long, default_value_t = 0)]
    pub skip: usize,
    /// List every matching card instead of showing one
    #[arg(long)]
    pub all: bool,
}

#[derive(Args, Debug)]
pub struct PulseArgs {
    /// Rotate this many slides forward; wraps past the end
    #[arg(long, default_value_t = 0)]
    pub skip: usize,
}

fn load_catalog() -> Result<Catalog> {
    Catalog::embedded().context("Failed to load embedded datasets")
}

pub fn handle_deals_command(command: DealsCommand) -> Result<()> {
    let catalog = load_catalog()?;
    match command {
        DealsCommand::List(args) => {
            let deals = catalog.query_deals(&DealQuery {
                sector: args.sector,
                bank: args.bank,
                search: args.search,
                sort_by: args.sort,
            });
            if args.json {
                println!("{}", serde_json::to_string_pretty(&deals)?);
                return Ok(());
            }
            if deals.is_empty() {
                println!("No deals match.");
            }
            for deal in &deals {
                println!("{}", render_deal(deal));
            }
        }
        DealsCommand::Recent(args) => {
            let recent = select_most_recent(catalog.deals(), args.count);
            if recent.is_empty() {
                println!("No recent deals.");
            }
            for deal in &recent {
                println!("{}", render_deal(deal));
            }
        }
        DealsCommand::Sectors => {
            for sector in catalog.sectors() {
                println!("{sector}");
            }
        }
        DealsCommand::Banks => {
            for bank in catalog.all_banks() {
                println!("{bank}");
            }
        }
        DealsCommand::Logos => {
            for logo in catalog.banks() {
                match &logo.logo_src {
                    Some(src) => println!("{:<24} {src}", logo.name),
                    None => println!("{}", logo.name),
                }
            }
        }
    }
    Ok(())
}

pub fn handle_blog_command(command: BlogCommand) -> Result<()> {
    let catalog = load_catalog()?;
    match command {
        BlogCommand::List(args) => {
            let posts = catalog.posts_in(args.category);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&posts)?);
                return Ok(());
            }
            for post in posts {
                println!("{}", render_post_summary(post));
            }
        }
        BlogCommand::Show(args) => {
            let Some(post) = catalog.post_by_slug(&args.slug) else {
                bail!("No post with slug '{}'", args.slug);
            };
            println!("{}", post.title);
            println!("{} · {}", format_date_verbose(&post.date), post.category);
            for paragraph in &post.content {
                println!();
                println!("{paragraph}");
            }
        }
    }
    Ok(())
}

pub fn show_markets(args: &MarketsArgs) -> Result<()> {
    let catalog = load_catalog()?;
    let groups: Vec<IndexGroup> = match args.group {
        Some(group) => vec![group],
        None => IndexGroup::ALL.to_vec(),
    };
    for (idx, group) in groups.iter().enumerate() {
        if idx > 0 {
            println!();
        }
        println!("{}", group.title());
        for datum in catalog.indices(*group) {
            println!("{}", render_ticker(datum));
        }
    }
    Ok(())
}

pub fn show_flashcards(args: &FlashcardsArgs) -> Result<()> {
    let catalog = load_catalog()?;
    let mut deck = catalog.flashcard_deck(FlashcardQuery {
        difficulty: args.difficulty,
        industry: args.industry,
        topic: args.topic,
    });
    if deck.is_empty() {
        println!("No flashcards match these filters.");
        return Ok(());
    }
    if args.all {
        for (idx, card) in deck.visible().enumerate() {
            if idx > 0 {
                println!();
            }
            println!("{}", render_flashcard(card, idx, deck.len()));
        }
        return Ok(());
    }
    deck.skip(args.skip);
    let total = deck.len();
    let position = deck.position();
    if let Some(card) = deck.current() {
        println!("{}", render_flashcard(card, position, total));
    }
    Ok(())
}

pub fn show_pulse(args: &PulseArgs) -> Result<()> {
    let catalog = load_catalog()?;
    let insights = catalog.insights();
    let mut cursor = Carousel::new(insights.len());
    let Some(insight) = insights.get(cursor.advance_by(args.skip)) else {
        println!("No market insights available.");
        return Ok(());
    };
    println!("{}", render_insight(insight, cursor.index(), cursor.len()));
    Ok(())
}

fn render_deal(deal: &Deal) -> String {
    let mut line = format!(
        "- [{}] {}  {}  {}  ({}",
        deal.id,
        format_date_compact(&deal.date),
        deal.headline(),
        format_currency_abbreviated(deal.value_usd),
        deal.sector
    );
    if let Some(domain) = extract_domain(deal.source_url.as_deref()) {
        line.push_str(&format!(" · {domain}"));
    }
    line.push(')');
    line
}

fn render_post_summary(post: &BlogPost) -> String {
    format!(
        "{}  {:<10}  {}  (/blog/{})",
        format_date_compact(&post.date),
        post.category,
        post.title,
        post.slug
    )
}

fn render_ticker(datum: &IndexDatum) -> String {
    let symbol = datum.symbol.as_deref().unwrap_or("");
    let arrow = if datum.is_up() { "▲" } else { "▼" };
    format!(
        "{arrow} {:<6} {:<14} {:>10} {:>8} {:>8}",
        symbol,
        datum.name,
        datum.formatted_price(),
        datum.formatted_change(),
        datum.formatted_change_pct()
    )
}

fn render_flashcard(card: &Flashcard, position: usize, total: usize) -> String {
    let mut out = format!(
        "[{}/{}] {} · {} · {}\n{}",
        position + 1,
        total,
        card.difficulty,
        card.industry,
        card.topic,
        card.question
    );
    for (idx, option) in card.options.iter().enumerate() {
        let letter = char::from(b'A' + (idx % 26) as u8);
        out.push_str(&format!("\n  {letter}. {option}"));
    }
    out
}

fn render_insight(insight: &InterviewInsight, position: usize, total: usize) -> String {
    let mut out = format!(
        "[{}/{}] {} ({})\n{}",
        position + 1,
        total,
        insight.title,
        insight.focus,
        insight.description
    );
    for point in &insight.key_points {
        out.push_str(&format!("\n  • {point}"));
    }
    for quote in &insight.market_data {
        let arrow = if quote.is_positive { "▲" } else { "▼" };
        out.push_str(&format!(
            "\n  {arrow} {:<6} {:>10} {:>9} {:>7}",
            quote.index, quote.price, quote.change, quote.change_percent
        ));
    }
    if !insight.timestamp.is_empty() {
        out.push_str(&format!("\nUpdated {}", insight.timestamp));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deal_line_includes_value_and_domain() {
        let catalog = Catalog::embedded().expect("catalog");
        let deal = catalog
            .deals()
            .iter()
            .find(|deal| deal.id == "d3")
            .expect("d3");
        assert_eq!(
            render_deal(deal),
            "- [d3] 8/6/25  APT4 Ventures buys CloudVault  $25.0M  (Cloud Computing · bloomberg.com)"
        );
    }

    #[test]
    fn deal_line_without_source() {
        let catalog = Catalog::embedded().expect("catalog");
        let deal = catalog
            .deals()
            .iter()
            .find(|deal| deal.id == "d2")
            .expect("d2");
        assert!(render_deal(deal).ends_with("$8.0M  (Data Analytics)"));
    }

    #[test]
    fn ticker_marks_direction() {
        let catalog = Catalog::embedded().expect("catalog");
        let nasdaq = catalog
            .indices(IndexGroup::Headline)
            .iter()
            .find(|datum| datum.symbol.as_deref() == Some("IXIC"))
            .expect("nasdaq");
        assert!(render_ticker(nasdaq).starts_with("▼ IXIC"));
        let spx = &catalog.indices(IndexGroup::Headline)[0];
        assert!(render_ticker(spx).starts_with("▲ SPX"));
    }

    #[test]
    fn flashcard_shows_position_and_lettered_options() {
        let catalog = Catalog::embedded().expect("catalog");
        let card = &catalog.flashcards()[6];
        let rendered = render_flashcard(card, 0, 3);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "[1/3] Hard · TMT · Valuation");
        assert_eq!(lines[1], "Which valuation multiple is most capital-structure neutral?");
        assert_eq!(lines[3], "  B. EV/EBITDA");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn insight_lists_points_and_quotes() {
        let catalog = Catalog::embedded().expect("catalog");
        let rendered = render_insight(&catalog.insights()[1], 1, 3);
        assert!(rendered.starts_with("[2/3] Morgan Stanley Healthcare Phone (Healthcare)"));
        assert!(rendered.contains("  • Gene therapy deals averaging $2.1B in 2024"));
        assert!(rendered.contains("▼ PFE"));
        assert!(rendered.ends_with("Updated 4 hours ago"));
    }

    #[test]
    fn post_summary_links_by_slug() {
        let catalog = Catalog::embedded().expect("catalog");
        let post = catalog.posts().first().expect("post");
        assert!(render_post_summary(post).ends_with("(/blog/expanding-rolodex-with-gpt-5)"));
    }
}
