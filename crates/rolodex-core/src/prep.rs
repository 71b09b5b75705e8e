//! Interview prep content: the technical flashcard deck and the rotating
//! market pulse insights.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("Unknown difficulty: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Industry {
    Generalist,
    #[serde(rename = "TMT")]
    Tmt,
    Healthcare,
}

impl Industry {
    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::Generalist => "Generalist",
            Industry::Tmt => "TMT",
            Industry::Healthcare => "Healthcare",
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Industry {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "generalist" => Ok(Industry::Generalist),
            "tmt" => Ok(Industry::Tmt),
            "healthcare" | "hc" => Ok(Industry::Healthcare),
            other => Err(format!("Unknown industry: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Topic {
    Accounting,
    Valuation,
    #[serde(rename = "LBO")]
    Lbo,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Accounting => "Accounting",
            Topic::Valuation => "Valuation",
            Topic::Lbo => "LBO",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "accounting" => Ok(Topic::Accounting),
            "valuation" => Ok(Topic::Valuation),
            "lbo" => Ok(Topic::Lbo),
            other => Err(format!("Unknown topic: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flashcard {
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub difficulty: Difficulty,
    pub industry: Industry,
    pub topic: Topic,
}

/// A `None` axis matches every card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlashcardQuery {
    pub difficulty: Option<Difficulty>,
    pub industry: Option<Industry>,
    pub topic: Option<Topic>,
}

impl FlashcardQuery {
    pub fn matches(&self, card: &Flashcard) -> bool {
        self.difficulty.map_or(true, |wanted| card.difficulty == wanted)
            && self.industry.map_or(true, |wanted| card.industry == wanted)
            && self.topic.map_or(true, |wanted| card.topic == wanted)
    }
}

/// Wrap-around position over a list whose length may change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Carousel {
    index: usize,
    len: usize,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Moves one step forward, wrapping to the start. An empty list stays at 0.
    pub fn advance(&mut self) -> usize {
        self.index = if self.len == 0 {
            0
        } else {
            (self.index + 1) % self.len
        };
        self.index
    }

    pub fn advance_by(&mut self, steps: usize) -> usize {
        if self.len > 0 {
            self.index = (self.index + steps % self.len) % self.len;
        }
        self.index
    }

    /// Any change in length sends the position back to the first item.
    pub fn resize(&mut self, len: usize) {
        if len != self.len {
            self.len = len;
            self.index = 0;
        }
    }
}

/// The flashcard deck as a reader walks it: a filter plus a position
/// within the filtered cards.
#[derive(Debug, Clone)]
pub struct FlashcardDeck {
    cards: Vec<Flashcard>,
    visible: Vec<usize>,
    cursor: Carousel,
}

impl FlashcardDeck {
    pub fn new(cards: Vec<Flashcard>) -> Self {
        let visible: Vec<usize> = (0..cards.len()).collect();
        let cursor = Carousel::new(visible.len());
        Self {
            cards,
            visible,
            cursor,
        }
    }

    pub fn set_query(&mut self, query: FlashcardQuery) {
        self.visible = self
            .cards
            .iter()
            .enumerate()
            .filter(|(_, card)| query.matches(card))
            .map(|(idx, _)| idx)
            .collect();
        self.cursor.resize(self.visible.len());
    }

    pub fn visible(&self) -> impl Iterator<Item = &Flashcard> {
        self.visible.iter().map(|idx| &self.cards[*idx])
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn position(&self) -> usize {
        self.cursor.index()
    }

    pub fn current(&self) -> Option<&Flashcard> {
        self.visible
            .get(self.cursor.index())
            .map(|idx| &self.cards[*idx])
    }

    pub fn next_card(&mut self) -> Option<&Flashcard> {
        self.cursor.advance();
        self.current()
    }

    pub fn skip(&mut self, steps: usize) -> Option<&Flashcard> {
        self.cursor.advance_by(steps);
        self.current()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum InterviewFocus {
    #[serde(rename = "TMT")]
    Tmt,
    Healthcare,
    #[serde(rename = "Financial Services")]
    FinancialServices,
}

impl InterviewFocus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewFocus::Tmt => "TMT",
            InterviewFocus::Healthcare => "Healthcare",
            InterviewFocus::FinancialServices => "Financial Services",
        }
    }
}

impl fmt::Display for InterviewFocus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quote as displayed, already formatted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MarketQuote {
    pub index: String,
    pub price: String,
    pub change: String,
    pub change_percent: String,
    pub is_positive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InterviewInsight {
    pub id: String,
    pub focus: InterviewFocus,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub market_data: Vec<MarketQuote>,
    #[serde(default)]
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, difficulty: Difficulty, industry: Industry, topic: Topic) -> Flashcard {
        Flashcard {
            id: id.to_string(),
            question: format!("{id}?"),
            options: Vec::new(),
            difficulty,
            industry,
            topic,
        }
    }

    fn deck() -> FlashcardDeck {
        FlashcardDeck::new(vec![
            card("a", Difficulty::Easy, Industry::Generalist, Topic::Valuation),
            card("b", Difficulty::Medium, Industry::Tmt, Topic::Accounting),
            card("c", Difficulty::Easy, Industry::Tmt, Topic::Lbo),
            card("d", Difficulty::Hard, Industry::Healthcare, Topic::Lbo),
        ])
    }

    fn ids(deck: &FlashcardDeck) -> Vec<&str> {
        deck.visible().map(|card| card.id.as_str()).collect()
    }

    #[test]
    fn carousel_wraps_and_empty_stays_at_zero() {
        let mut cursor = Carousel::new(3);
        assert_eq!(cursor.advance(), 1);
        assert_eq!(cursor.advance(), 2);
        assert_eq!(cursor.advance(), 0);
        assert_eq!(cursor.advance_by(7), 1);

        let mut empty = Carousel::new(0);
        assert_eq!(empty.advance(), 0);
        assert_eq!(empty.advance_by(5), 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn carousel_resets_only_when_length_changes() {
        let mut cursor = Carousel::new(4);
        cursor.advance_by(2);
        cursor.resize(4);
        assert_eq!(cursor.index(), 2);
        cursor.resize(3);
        assert_eq!(cursor.index(), 0);
        assert_eq!(cursor.len(), 3);
    }

    #[test]
    fn filters_combine_and_none_means_all() {
        let mut deck = deck();
        assert_eq!(ids(&deck), vec!["a", "b", "c", "d"]);

        deck.set_query(FlashcardQuery {
            difficulty: Some(Difficulty::Easy),
            ..FlashcardQuery::default()
        });
        assert_eq!(ids(&deck), vec!["a", "c"]);

        deck.set_query(FlashcardQuery {
            difficulty: Some(Difficulty::Easy),
            industry: Some(Industry::Tmt),
            topic: Some(Topic::Lbo),
        });
        assert_eq!(ids(&deck), vec!["c"]);
    }

    #[test]
    fn next_card_wraps_within_filtered_deck() {
        let mut deck = deck();
        deck.set_query(FlashcardQuery {
            topic: Some(Topic::Lbo),
            ..FlashcardQuery::default()
        });
        assert_eq!(deck.current().map(|card| card.id.as_str()), Some("c"));
        assert_eq!(deck.next_card().map(|card| card.id.as_str()), Some("d"));
        assert_eq!(deck.next_card().map(|card| card.id.as_str()), Some("c"));
    }

    #[test]
    fn empty_filter_result_has_no_current_card() {
        let mut deck = deck();
        deck.set_query(FlashcardQuery {
            difficulty: Some(Difficulty::Hard),
            topic: Some(Topic::Valuation),
            ..FlashcardQuery::default()
        });
        assert!(deck.is_empty());
        assert!(deck.current().is_none());
        assert!(deck.next_card().is_none());
        assert_eq!(deck.position(), 0);
    }

    #[test]
    fn changing_filter_restarts_at_first_card() {
        let mut deck = deck();
        deck.skip(3);
        assert_eq!(deck.position(), 3);
        deck.set_query(FlashcardQuery {
            industry: Some(Industry::Tmt),
            ..FlashcardQuery::default()
        });
        assert_eq!(deck.position(), 0);
        assert_eq!(deck.current().map(|card| card.id.as_str()), Some("b"));
    }

    #[test]
    fn filter_values_parse_case_insensitively() {
        assert_eq!("tmt".parse::<Industry>(), Ok(Industry::Tmt));
        assert_eq!("LBO".parse::<Topic>(), Ok(Topic::Lbo));
        assert_eq!(" Hard ".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("expert".parse::<Difficulty>().is_err());
    }
}
