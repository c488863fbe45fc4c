use std::collections::BTreeSet;

//
// ─── ANSWER CHECK ──────────────────────────────────────────────────────────────
//

/// Returns true when the selected options are exactly the correct set.
///
/// Selection order and repeated indices do not matter.
///
/// ```
/// # use std::collections::BTreeSet;
/// # use quiz_core::scoring::is_correct;
/// let correct = BTreeSet::from([0, 2]);
/// assert!(is_correct([2, 0, 2], &correct));
/// assert!(!is_correct([0], &correct));
/// ```
pub fn is_correct(selected: impl IntoIterator<Item = usize>, correct: &BTreeSet<usize>) -> bool {
    selected.into_iter().collect::<BTreeSet<_>>() == *correct
}

/// Rounded percentage of `score` over `total`; 0 when `total` is 0.
///
/// Halves round up, so 1 of 8 reports 13.
#[must_use]
pub fn accuracy(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let score = u64::from(score);
    let total = u64::from(total);
    let rounded = (200 * score + total) / (2 * total);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

//
// ─── RANK ──────────────────────────────────────────────────────────────────────
//

/// Qualitative result tier derived from the final score ratio.
///
/// - `Master`: every answer correct
/// - `Veteran`: at least 80%
/// - `Rookie`: at least 60%
/// - `Egg`: anything below, including an empty session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Egg,
    Rookie,
    Veteran,
    Master,
}

impl Rank {
    /// Tier for `score` correct answers out of `total`.
    ///
    /// Thresholds are compared in integers so 4/5 lands exactly on 0.8.
    #[must_use]
    pub fn from_score(score: u32, total: u32) -> Self {
        if total == 0 {
            return Self::Egg;
        }
        let score = u64::from(score);
        let total = u64::from(total);
        if score >= total {
            Self::Master
        } else if score * 5 >= total * 4 {
            Self::Veteran
        } else if score * 5 >= total * 3 {
            Self::Rookie
        } else {
            Self::Egg
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Master => "社会福祉士マスター",
            Self::Veteran => "ベテランソーシャルワーカー",
            Self::Rookie => "合格圏のルーキー",
            Self::Egg => "社会福祉士の卵",
        }
    }

    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Master => "👑",
            Self::Veteran => "💎",
            Self::Rookie => "🌟",
            Self::Egg => "🥚",
        }
    }
}
