//! Card priority - カード優先度の設定値
//!
//! UI の card priority 編集画面が扱う値オブジェクト。
//! 並べ替え（rearrange）ロジック自体はここには無い。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Buster,
    Arts,
    Quick,
}

impl CardType {
    fn code(&self) -> char {
        match self {
            CardType::Buster => 'B',
            CardType::Arts => 'A',
            CardType::Quick => 'Q',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardAffinity {
    Weak,
    Normal,
    Resist,
}

impl CardAffinity {
    fn prefix(&self) -> &'static str {
        match self {
            CardAffinity::Weak => "W",
            CardAffinity::Normal => "",
            CardAffinity::Resist => "R",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardScoreError {
    #[error("unknown card score code: {0:?}")]
    Unknown(String),

    #[error("duplicate card score in priority: {0}")]
    Duplicate(CardScore),
}

/// Score of a card: its type combined with the enemy's affinity to it.
///
/// 文字列表現は `WB`, `B`, `RQ` のような短いコード。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CardScore {
    pub card_type: CardType,
    pub affinity: CardAffinity,
}

impl CardScore {
    pub const fn new(card_type: CardType, affinity: CardAffinity) -> Self {
        Self {
            card_type,
            affinity,
        }
    }
}

impl fmt::Display for CardScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.affinity.prefix(), self.card_type.code())
    }
}

impl FromStr for CardScore {
    type Err = CardScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        let (affinity, rest) = match code.as_str() {
            c if c.len() == 2 && c.starts_with('W') => (CardAffinity::Weak, &c[1..]),
            c if c.len() == 2 && c.starts_with('R') => (CardAffinity::Resist, &c[1..]),
            c => (CardAffinity::Normal, c),
        };
        let card_type = match rest {
            "B" => CardType::Buster,
            "A" => CardType::Arts,
            "Q" => CardType::Quick,
            _ => return Err(CardScoreError::Unknown(s.trim().to_string())),
        };
        Ok(CardScore::new(card_type, affinity))
    }
}

impl TryFrom<String> for CardScore {
    type Error = CardScoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CardScore> for String {
    fn from(score: CardScore) -> Self {
        score.to_string()
    }
}

/// Ordered card ranking, highest priority first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardPriority(Vec<CardScore>);

impl CardPriority {
    pub const DEFAULT: &'static str = "WB, WA, WQ, B, A, Q, RB, RA, RQ";

    pub fn scores(&self) -> &[CardScore] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Builds the editable list item for the card priority screen.
    pub fn into_list_item(self, rearrange_cards: bool) -> CardPriorityListItem {
        CardPriorityListItem::new(self.0, rearrange_cards)
    }
}

impl Default for CardPriority {
    fn default() -> Self {
        let mut scores = Vec::with_capacity(9);
        for affinity in [CardAffinity::Weak, CardAffinity::Normal, CardAffinity::Resist] {
            for card_type in [CardType::Buster, CardType::Arts, CardType::Quick] {
                scores.push(CardScore::new(card_type, affinity));
            }
        }
        Self(scores)
    }
}

impl FromStr for CardPriority {
    type Err = CardScoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self(Vec::new()));
        }

        let mut scores: Vec<CardScore> = Vec::new();
        for token in s.split(',') {
            let score: CardScore = token.parse()?;
            if scores.contains(&score) {
                return Err(CardScoreError::Duplicate(score));
            }
            scores.push(score);
        }
        Ok(Self(scores))
    }
}

impl fmt::Display for CardPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_scores(f, &self.0)
    }
}

fn write_scores(f: &mut fmt::Formatter<'_>, scores: &[CardScore]) -> fmt::Result {
    for (i, score) in scores.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{score}")?;
    }
    Ok(())
}

/// One entry of the card priority editor.
///
/// `scores` の順序がそのまま優先度。空でもよい。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardPriorityListItem {
    pub scores: Vec<CardScore>,
    pub rearrange_cards: bool,
}

impl CardPriorityListItem {
    pub fn new(scores: Vec<CardScore>, rearrange_cards: bool) -> Self {
        Self {
            scores,
            rearrange_cards,
        }
    }
}

impl fmt::Display for CardPriorityListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_scores(f, &self.scores)
    }
}
