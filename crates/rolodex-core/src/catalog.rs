//! Static datasets behind the dashboards: deals feed, blog posts, market
//! ticker, bank logo wall and the interview prep content.

use crate::helpers::{classify_relationship_verb, slugify, Dated};
use crate::prep::{Flashcard, FlashcardDeck, FlashcardQuery, InterviewInsight};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const DEALS_JSON: &str = include_str!("../data/deals.json");
const BLOG_POSTS_JSON: &str = include_str!("../data/blog_posts.json");
const INDICES_JSON: &str = include_str!("../data/indices.json");
const BANKS_JSON: &str = include_str!("../data/banks.json");
const FLASHCARDS_JSON: &str = include_str!("../data/flashcards.json");
const MARKET_PULSE_JSON: &str = include_str!("../data/market_pulse.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("malformed {dataset} dataset: {source}")]
    Dataset {
        dataset: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Deal {
    pub id: String,
    pub title: String,
    pub date: String,
    #[serde(default)]
    pub value_usd: Option<f64>,
    pub sector: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    pub target_name: String,
    pub bidder_name: String,
    #[serde(default)]
    pub target_advisors: Vec<String>,
    #[serde(default)]
    pub bidder_advisors: Vec<String>,
    #[serde(default)]
    pub source_url: Option<String>,
}

impl Deal {
    /// "APT4 Ventures buys TechCorp AI"
    pub fn headline(&self) -> String {
        format!(
            "{} {} {}",
            self.bidder_name,
            classify_relationship_verb(&self.title),
            self.target_name
        )
    }

    pub fn advisors(&self) -> impl Iterator<Item = &String> {
        self.target_advisors.iter().chain(self.bidder_advisors.iter())
    }

    fn matches(&self, query: &str) -> bool {
        self.title.to_lowercase().contains(query)
            || self.target_name.to_lowercase().contains(query)
            || self.bidder_name.to_lowercase().contains(query)
            || self.sector.to_lowercase().contains(query)
    }
}

impl Dated for Deal {
    fn date(&self) -> &str {
        &self.date
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DealSort {
    #[default]
    Date,
    Value,
}

impl DealSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            DealSort::Date => "date",
            DealSort::Value => "value",
        }
    }
}

impl fmt::Display for DealSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DealSort {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "date" => Ok(DealSort::Date),
            "value" => Ok(DealSort::Value),
            other => Err(format!("Unknown sort: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DealQuery {
    pub sector: Option<String>,
    pub bank: Option<String>,
    pub search: Option<String>,
    pub sort_by: DealSort,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BlogCategory {
    Product,
    Industry,
    Recruiting,
}

impl BlogCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlogCategory::Product => "product",
            BlogCategory::Industry => "industry",
            BlogCategory::Recruiting => "recruiting",
        }
    }
}

impl fmt::Display for BlogCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlogCategory {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "product" => Ok(BlogCategory::Product),
            "industry" => Ok(BlogCategory::Industry),
            "recruiting" => Ok(BlogCategory::Recruiting),
            other => Err(format!("Unknown category: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    pub date: String,
    pub category: BlogCategory,
    #[serde(default)]
    pub slug: String,
    #[serde(default, rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub content: Vec<String>,
}

impl Dated for BlogPost {
    fn date(&self) -> &str {
        &self.date
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IndexDatum {
    pub name: String,
    #[serde(default)]
    pub symbol: Option<String>,
    pub price: f64,
    pub change: f64,
    #[serde(default)]
    pub change_pct: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}

impl IndexDatum {
    /// Prices at or above 1000 get thousands separators and at most two
    /// decimals; smaller prices always show two decimals.
    pub fn formatted_price(&self) -> String {
        let formatted = if self.price >= 1000.0 {
            group_thousands(&trim_decimals(format!("{:.2}", self.price)))
        } else {
            format!("{:.2}", self.price)
        };
        match &self.unit {
            Some(unit) => format!("{formatted}{unit}"),
            None => formatted,
        }
    }

    pub fn formatted_change(&self) -> String {
        format!("{}{:.2}", plus_sign(self.change), self.change)
    }

    pub fn formatted_change_pct(&self) -> String {
        match self.change_pct {
            Some(pct) => format!("{}{pct:.2}%", plus_sign(pct)),
            None => String::new(),
        }
    }

    pub fn is_up(&self) -> bool {
        self.change >= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexGroup {
    Headline,
    Commodities,
    Rates,
    Tech,
}

impl IndexGroup {
    pub const ALL: [IndexGroup; 4] = [
        IndexGroup::Headline,
        IndexGroup::Commodities,
        IndexGroup::Rates,
        IndexGroup::Tech,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IndexGroup::Headline => "headline",
            IndexGroup::Commodities => "commodities",
            IndexGroup::Rates => "rates",
            IndexGroup::Tech => "tech",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            IndexGroup::Headline => "Markets at a glance",
            IndexGroup::Commodities => "Commodities",
            IndexGroup::Rates => "Rates & Bonds",
            IndexGroup::Tech => "Tech Leaders",
        }
    }
}

impl fmt::Display for IndexGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndexGroup {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "headline" | "indices" => Ok(IndexGroup::Headline),
            "commodities" => Ok(IndexGroup::Commodities),
            "rates" | "bonds" => Ok(IndexGroup::Rates),
            "tech" => Ok(IndexGroup::Tech),
            other => Err(format!("Unknown index group: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct IndexSnapshot {
    #[serde(default)]
    headline: Vec<IndexDatum>,
    #[serde(default)]
    commodities: Vec<IndexDatum>,
    #[serde(default)]
    rates: Vec<IndexDatum>,
    #[serde(default)]
    tech: Vec<IndexDatum>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyLogo {
    pub name: String,
    #[serde(default)]
    pub logo_src: Option<String>,
}

/// Every dataset the site renders, parsed from the embedded JSON.
#[derive(Debug, Clone)]
pub struct Catalog {
    deals: Vec<Deal>,
    posts: Vec<BlogPost>,
    indices: IndexSnapshot,
    banks: Vec<CompanyLogo>,
    flashcards: Vec<Flashcard>,
    insights: Vec<InterviewInsight>,
}

impl Catalog {
    pub fn embedded() -> Result<Self, CatalogError> {
        let deals: Vec<Deal> = parse_dataset("deals", DEALS_JSON)?;
        let mut posts: Vec<BlogPost> = parse_dataset("blog posts", BLOG_POSTS_JSON)?;
        for post in &mut posts {
            if post.slug.trim().is_empty() {
                post.slug = slugify(&post.title);
            }
        }
        let indices: IndexSnapshot = parse_dataset("indices", INDICES_JSON)?;
        let banks: Vec<CompanyLogo> = parse_dataset("banks", BANKS_JSON)?;
        let flashcards: Vec<Flashcard> = parse_dataset("flashcards", FLASHCARDS_JSON)?;
        let insights: Vec<InterviewInsight> = parse_dataset("market pulse", MARKET_PULSE_JSON)?;
        Ok(Self {
            deals,
            posts,
            indices,
            banks,
            flashcards,
            insights,
        })
    }

    pub fn deals(&self) -> &[Deal] {
        &self.deals
    }

    pub fn query_deals(&self, query: &DealQuery) -> Vec<Deal> {
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);
        let mut matched: Vec<Deal> = self
            .deals
            .iter()
            .filter(|deal| {
                query
                    .sector
                    .as_deref()
                    .map_or(true, |sector| deal.sector.eq_ignore_ascii_case(sector))
            })
            .filter(|deal| {
                query.bank.as_deref().map_or(true, |bank| {
                    deal.advisors().any(|advisor| advisor.eq_ignore_ascii_case(bank))
                })
            })
            .filter(|deal| search.as_deref().map_or(true, |q| deal.matches(q)))
            .cloned()
            .collect();
        match query.sort_by {
            DealSort::Date => matched.sort_by(|a, b| b.date.cmp(&a.date)),
            DealSort::Value => matched.sort_by(|a, b| compare_value_desc(a.value_usd, b.value_usd)),
        }
        matched
    }

    /// Distinct sectors, alphabetical.
    pub fn sectors(&self) -> Vec<String> {
        let sectors: BTreeSet<&str> = self.deals.iter().map(|deal| deal.sector.as_str()).collect();
        sectors.into_iter().map(str::to_string).collect()
    }

    /// Distinct advisors on either side of any deal, alphabetical.
    pub fn all_banks(&self) -> Vec<String> {
        let banks: BTreeSet<&str> = self
            .deals
            .iter()
            .flat_map(|deal| deal.advisors())
            .map(String::as_str)
            .collect();
        banks.into_iter().map(str::to_string).collect()
    }

    pub fn posts(&self) -> &[BlogPost] {
        &self.posts
    }

    pub fn posts_in(&self, category: Option<BlogCategory>) -> Vec<&BlogPost> {
        self.posts
            .iter()
            .filter(|post| category.map_or(true, |wanted| post.category == wanted))
            .collect()
    }

    pub fn post_by_slug(&self, slug: &str) -> Option<&BlogPost> {
        self.posts.iter().find(|post| post.slug == slug)
    }

    pub fn indices(&self, group: IndexGroup) -> &[IndexDatum] {
        match group {
            IndexGroup::Headline => &self.indices.headline,
            IndexGroup::Commodities => &self.indices.commodities,
            IndexGroup::Rates => &self.indices.rates,
            IndexGroup::Tech => &self.indices.tech,
        }
    }

    pub fn banks(&self) -> &[CompanyLogo] {
        &self.banks
    }

    pub fn flashcards(&self) -> &[Flashcard] {
        &self.flashcards
    }

    pub fn query_flashcards(&self, query: &FlashcardQuery) -> Vec<&Flashcard> {
        self.flashcards
            .iter()
            .filter(|card| query.matches(card))
            .collect()
    }

    /// A fresh deck positioned on the first card matching `query`.
    pub fn flashcard_deck(&self, query: FlashcardQuery) -> FlashcardDeck {
        let mut deck = FlashcardDeck::new(self.flashcards.clone());
        deck.set_query(query);
        deck
    }

    pub fn insights(&self) -> &[InterviewInsight] {
        &self.insights
    }
}

fn parse_dataset<T>(dataset: &'static str, raw: &str) -> Result<T, CatalogError>
where
    T: for<'de> Deserialize<'de>,
{
    serde_json::from_str(raw).map_err(|source| CatalogError::Dataset { dataset, source })
}

// Undisclosed amounts sort after every disclosed one.
fn compare_value_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn plus_sign(value: f64) -> &'static str {
    if value > 0.0 {
        "+"
    } else {
        ""
    }
}

fn trim_decimals(formatted: String) -> String {
    if !formatted.contains('.') {
        return formatted;
    }
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (unsigned, None),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}
