//! Deterministic deck generation for new games.
//!
//! Every `DealSource` maps to exactly one 52-card permutation, reproducible
//! bit-for-bit. The permutation is in dealing order: `deck[i]` is dealt onto
//! tableau column `i % 8`.
//!
//! Sources:
//!   * `Classic(n)`: the standard deck (suit-major, rank-minor) shuffled by
//!     Fisher–Yates with a generator compatible with the .NET Framework
//!     `System.Random(n)`.
//!   * `Microsoft(n)`: the deal numbering of the Windows FreeCell game.
//!   * `PySol(seed)`: PySolFC seed strings ("ms123", "13101775566348840960").
//!   * `Deck(cards)`: an explicit permutation, e.g. loaded from a file.

use std::fs;
use std::path::Path;

use core::fmt;

use num_bigint::BigUint;
use num_traits::{ToPrimitive, Zero};

use crate::card::{standard_deck, Card, Rank, Suit, CARDS_PER_DECK};

pub const DECK_LEN: usize = CARDS_PER_DECK as usize;

/// Largest game number accepted for `Classic` and `Microsoft` deals.
pub const MAX_GAME_NUMBER: u32 = 1_000_000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DealSource {
    Classic(u32),
    Microsoft(u32),
    PySol(String),
    Deck(DeckSpec),
}

impl DealSource {
    /// Human-readable name of the deal, e.g. "game 617" or "ms617".
    pub fn label(&self) -> String {
        match self {
            DealSource::Classic(n) => format!("game {}", n),
            DealSource::Microsoft(n) => format!("microsoft {}", n),
            DealSource::PySol(s) => format!("pysol {}", s.trim()),
            DealSource::Deck(spec) => spec.label.clone(),
        }
    }

    /// Produce the deck for this source.
    pub fn deck(&self) -> Result<[Card; DECK_LEN], DealError> {
        match self {
            DealSource::Classic(n) => classic_deck(*n),
            DealSource::Microsoft(n) => microsoft_deck(*n),
            DealSource::PySol(s) => Ok(deck_from_pysol_seed_str(s)?.deck),
            DealSource::Deck(spec) => Ok(spec.deck),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeckSpec {
    /// Human-readable label (seed, filename, etc.)
    pub label: String,
    /// The exact deck permutation in dealing order.
    pub deck: [Card; DECK_LEN],
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DealError {
    GameNumberOutOfRange(u32),
    BadSeed(String),
    BadDeck(String),
    Io(String),
}

impl fmt::Display for DealError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GameNumberOutOfRange(n) => {
                write!(f, "game number {} out of range 1..={}", n, MAX_GAME_NUMBER)
            }
            Self::BadSeed(s) => write!(f, "bad seed: {}", s),
            Self::BadDeck(s) => write!(f, "bad deck: {}", s),
            Self::Io(s) => write!(f, "io error: {}", s),
        }
    }
}

impl std::error::Error for DealError {}

fn check_game_number(n: u32) -> Result<(), DealError> {
    if (1..=MAX_GAME_NUMBER).contains(&n) {
        Ok(())
    } else {
        Err(DealError::GameNumberOutOfRange(n))
    }
}

// --- Fisher–Yates shared by the seeded generators ---

trait Shuffle {
    fn randint_inclusive(&mut self, a: usize, b: usize) -> usize;

    fn shuffle<T>(&mut self, seq: &mut [T]) {
        if seq.len() <= 1 {
            return;
        }
        for n in (1..seq.len()).rev() {
            let j = self.randint_inclusive(0, n);
            seq.swap(n, j);
        }
    }
}

// -----------------------------------------------------------------------------
// Classic game numbers.

/// Shuffle the standard deck for classic game number `n` (1..=1_000_000).
pub fn classic_deck(n: u32) -> Result<[Card; DECK_LEN], DealError> {
    check_game_number(n)?;
    let mut deck = standard_deck();
    // n <= MAX_GAME_NUMBER fits in i32.
    let mut rng = ClassicRandom::new(n as i32);
    rng.shuffle(&mut deck);
    Ok(deck)
}

/// Subtractive generator matching .NET Framework `System.Random(int)`.
struct ClassicRandom {
    seeds: [i32; 56],
    inext: usize,
    inextp: usize,
}

impl ClassicRandom {
    const MBIG: i32 = i32::MAX;
    const MSEED: i32 = 161_803_398;

    fn new(seed: i32) -> Self {
        let mut seeds = [0i32; 56];
        let subtraction = if seed == i32::MIN {
            i32::MAX
        } else {
            seed.abs()
        };
        let mut mj = Self::MSEED.wrapping_sub(subtraction);
        seeds[55] = mj;
        let mut mk: i32 = 1;
        for i in 1..55 {
            let ii = (21 * i) % 55;
            seeds[ii] = mk;
            mk = mj.wrapping_sub(mk);
            if mk < 0 {
                mk = mk.wrapping_add(Self::MBIG);
            }
            mj = seeds[ii];
        }
        for _ in 1..5 {
            for i in 1..56 {
                seeds[i] = seeds[i].wrapping_sub(seeds[1 + (i + 30) % 55]);
                if seeds[i] < 0 {
                    seeds[i] = seeds[i].wrapping_add(Self::MBIG);
                }
            }
        }
        ClassicRandom {
            seeds,
            inext: 0,
            inextp: 21,
        }
    }

    fn internal_sample(&mut self) -> i32 {
        let mut next = self.inext + 1;
        if next >= 56 {
            next = 1;
        }
        let mut nextp = self.inextp + 1;
        if nextp >= 56 {
            nextp = 1;
        }
        let mut ret = self.seeds[next].wrapping_sub(self.seeds[nextp]);
        if ret == Self::MBIG {
            ret -= 1;
        }
        if ret < 0 {
            ret = ret.wrapping_add(Self::MBIG);
        }
        self.seeds[next] = ret;
        self.inext = next;
        self.inextp = nextp;
        ret
    }

    /// Uniform value in `0..max`.
    fn next_below(&mut self, max: usize) -> usize {
        let sample = self.internal_sample() as f64 * (1.0 / Self::MBIG as f64);
        (sample * max as f64) as usize
    }
}

impl Shuffle for ClassicRandom {
    fn randint_inclusive(&mut self, a: usize, b: usize) -> usize {
        a + self.next_below(b + 1 - a)
    }
}

// -----------------------------------------------------------------------------
// Microsoft deal numbers.

/// The Windows FreeCell deal for `n` (1..=1_000_000).
///
/// Cards are numbered rank-major (AC, AD, AH, AS, 2C, ...) and the deck
/// starts reversed; each draw swaps position `i` with a position counted
/// from the end of the still-undealt part.
pub fn microsoft_deck(n: u32) -> Result<[Card; DECK_LEN], DealError> {
    check_game_number(n)?;
    let mut order: [u8; DECK_LEN] = core::array::from_fn(|i| (DECK_LEN - 1 - i) as u8);
    let mut state = n;
    for i in 0..DECK_LEN {
        state = state.wrapping_mul(214_013).wrapping_add(2_531_011) & 0x7fff_ffff;
        let r = (state >> 16) as usize;
        let j = (DECK_LEN - 1) - r % (DECK_LEN - i);
        order.swap(i, j);
    }
    Ok(order.map(|c| Card::new(Suit::ALL[(c % 4) as usize], Rank::ALL[(c / 4) as usize])))
}

// -----------------------------------------------------------------------------
// PySolFC seeds.
//
//   * "msNNNN" seeds and numbers < 32000 are Microsoft-compatible: the
//     cards start rank-major (AC, AD, AH, AS, 2C, ...) and are shuffled by
//     LCRandom31, so "ms617" is Windows deal 617.
//   * Any other number seeds an MT19937 the way CPython's random.Random
//     does, over PySolFC's own order: suit-major with suits C,S,H,D.
//   * The shuffled talon is dealt from its end, so the list is reversed.

/// Generate a `DeckSpec` from a PySolFC game number / seed string.
///
/// Accepts:
///   * "13101775566348840960"   (numeric)
///   * "ms12345"               (MS-style)
///   * strings with whitespace / punctuation (like PySolFC seed strings)
pub fn deck_from_pysol_seed_str(seed_s: &str) -> Result<DeckSpec, DealError> {
    let seed = normalize_pysol_seed_str(seed_s)?;
    let label = format!("pysol {}", seed.as_display_str());
    let deck = generate_deck_from_seed(&seed)?;
    Ok(DeckSpec { label, deck })
}

// PySolFC suit order: Clubs(0), Spades(1), Hearts(2), Diamonds(3)
const PYSOL_SUITS: [Suit; 4] = [Suit::Clubs, Suit::Spades, Suit::Hearts, Suit::Diamonds];

#[derive(Clone, Debug)]
enum PysolSeed {
    Ms(u64),
    /// A non-negative integer seed (PySolFC accepts arbitrarily-large ints).
    Num(BigUint),
}

impl PysolSeed {
    fn as_display_str(&self) -> String {
        match self {
            PysolSeed::Ms(n) => format!("ms{}", n),
            PysolSeed::Num(n) => n.to_string(),
        }
    }
}

fn normalize_pysol_seed_str(s: &str) -> Result<PysolSeed, DealError> {
    // Drop a trailing 'L', lowercase, strip whitespace and # - _ . ,
    let mut t = s.trim().to_string();
    if t.ends_with('L') {
        t.pop();
    }
    let cleaned: String = t
        .chars()
        .map(|ch| ch.to_ascii_lowercase())
        .filter(|&ch| !(ch.is_whitespace() || matches!(ch, '#' | '-' | '_' | '.' | ',')))
        .collect();
    if cleaned.is_empty() {
        return Err(DealError::BadSeed("empty seed".to_string()));
    }

    if let Some(rest) = cleaned.strip_prefix("ms") {
        if rest.is_empty() || !rest.chars().all(|c| c.is_ascii_digit()) {
            return Err(DealError::BadSeed(format!("invalid ms seed {:?}", s)));
        }
        let n: u64 = rest
            .parse()
            .map_err(|_| DealError::BadSeed(format!("could not parse ms seed {:?}", s)))?;
        return Ok(PysolSeed::Ms(n));
    }

    if !cleaned.chars().all(|c| c.is_ascii_digit()) {
        return Err(DealError::BadSeed(format!(
            "seed contains non-digits after normalization: {:?}",
            cleaned
        )));
    }
    let n = BigUint::parse_bytes(cleaned.as_bytes(), 10)
        .ok_or_else(|| DealError::BadSeed(format!("could not parse seed {:?}", s)))?;
    Ok(PysolSeed::Num(n))
}

fn microsoft_order() -> Vec<Card> {
    Rank::ALL
        .iter()
        .flat_map(|&rank| Suit::ALL.iter().map(move |&suit| Card::new(suit, rank)))
        .collect()
}

fn microsoft_shuffle(seed: u64) -> Result<Vec<Card>, DealError> {
    let mut cards = microsoft_order();
    LCRandom31::new(seed)?.shuffle(&mut cards);
    Ok(cards)
}

fn pysol_order() -> Vec<Card> {
    PYSOL_SUITS
        .iter()
        .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card::new(suit, rank)))
        .collect()
}

fn generate_deck_from_seed(seed: &PysolSeed) -> Result<[Card; DECK_LEN], DealError> {
    let mut cards = match seed {
        PysolSeed::Ms(n) => microsoft_shuffle(*n)?,
        PysolSeed::Num(n) => match n.to_u64().filter(|&v| v < 32000) {
            Some(small) => microsoft_shuffle(small)?,
            None => {
                let mut cards = pysol_order();
                MTRandom::new_big(n).shuffle(&mut cards);
                cards
            }
        },
    };

    // Dealing order is reversed (top of talon is the end of the list).
    cards.reverse();

    let mut deck = [cards[0]; DECK_LEN];
    deck.copy_from_slice(&cards);
    Ok(deck)
}

// --- LCRandom31 (matches pysol_cards.random.LCRandom31) ---

struct LCRandom31 {
    seed: u64,
    seedx: u64,
}

impl LCRandom31 {
    const MAX_SEED: u64 = (1u64 << 33) - 1;

    fn new(seed: u64) -> Result<Self, DealError> {
        if seed < 1 || seed > Self::MAX_SEED {
            return Err(DealError::BadSeed(format!("ms seed {} out of range", seed)));
        }
        let seedx = if seed < 0x1_0000_0000 {
            seed
        } else {
            seed - 0x1_0000_0000
        };
        Ok(Self { seed, seedx })
    }

    fn rand_step(&mut self) {
        self.seedx = (self.seedx.wrapping_mul(214013).wrapping_add(2531011)) & Self::MAX_SEED;
    }

    fn rand_15(&mut self) -> u16 {
        self.rand_step();
        ((self.seedx >> 16) & 0x7fff) as u16
    }

    fn rand_16(&mut self) -> u16 {
        self.rand_step();
        ((self.seedx >> 16) & 0xffff) as u16
    }

    fn random_u16ish(&mut self) -> u32 {
        if self.seed < 0x1_0000_0000 {
            let r = self.rand_15() as u32;
            if self.seed < 0x8000_0000 {
                r
            } else {
                r | 0x8000
            }
        } else {
            (self.rand_16() as u32) + 1
        }
    }
}

impl Shuffle for LCRandom31 {
    fn randint_inclusive(&mut self, a: usize, b: usize) -> usize {
        let span = (b + 1).saturating_sub(a);
        if span <= 1 {
            return a;
        }
        let r = self.random_u16ish() as usize;
        a + (r % span)
    }
}

// --- MT19937 matching CPython's _random ---

struct MTRandom {
    mt: [u32; 624],
    index: usize,
}

impl MTRandom {
    fn new_big(seed: &BigUint) -> Self {
        let mut r = Self {
            mt: [0u32; 624],
            index: 624,
        };
        r.seed_big(seed);
        r
    }

    fn seed_big(&mut self, seed: &BigUint) {
        // CPython feeds the absolute value to init_by_array as
        // little-endian 32-bit words.
        if seed.is_zero() {
            self.init_by_array(&[0u32]);
            return;
        }
        let key = seed.to_u32_digits();
        self.init_by_array(&key);
    }

    fn init_genrand(&mut self, s: u32) {
        self.mt[0] = s;
        for i in 1..624 {
            let prev = self.mt[i - 1];
            self.mt[i] = 1812433253u32
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(i as u32);
        }
        self.index = 624;
    }

    fn init_by_array(&mut self, key: &[u32]) {
        self.init_genrand(19650218u32);
        let mut i: usize = 1;
        let mut j: usize = 0;
        let key_len = key.len().max(1);
        let mut k: usize = 624.max(key_len);

        while k > 0 {
            let prev = self.mt[i - 1];
            let x = prev ^ (prev >> 30);
            let mul = 1664525u32.wrapping_mul(x);
            self.mt[i] = (self.mt[i] ^ mul)
                .wrapping_add(key[j])
                .wrapping_add(j as u32);
            i += 1;
            j += 1;
            if i >= 624 {
                self.mt[0] = self.mt[623];
                i = 1;
            }
            if j >= key_len {
                j = 0;
            }
            k -= 1;
        }

        k = 623;
        while k > 0 {
            let prev = self.mt[i - 1];
            let x = prev ^ (prev >> 30);
            let mul = 1566083941u32.wrapping_mul(x);
            self.mt[i] = (self.mt[i] ^ mul).wrapping_sub(i as u32);
            i += 1;
            if i >= 624 {
                self.mt[0] = self.mt[623];
                i = 1;
            }
            k -= 1;
        }

        self.mt[0] = 0x8000_0000;
        self.index = 624;
    }

    fn twist(&mut self) {
        const N: usize = 624;
        const M: usize = 397;
        const MATRIX_A: u32 = 0x9908_b0df;
        const UPPER_MASK: u32 = 0x8000_0000;
        const LOWER_MASK: u32 = 0x7fff_ffff;

        for i in 0..N {
            let x = (self.mt[i] & UPPER_MASK) | (self.mt[(i + 1) % N] & LOWER_MASK);
            let mut x_a = x >> 1;
            if (x & 1) != 0 {
                x_a ^= MATRIX_A;
            }
            self.mt[i] = self.mt[(i + M) % N] ^ x_a;
        }
        self.index = 0;
    }

    fn next_u32(&mut self) -> u32 {
        if self.index >= 624 {
            self.twist();
        }
        let mut y = self.mt[self.index];
        self.index += 1;

        // tempering
        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^= y >> 18;
        y
    }

    fn random_f64(&mut self) -> f64 {
        // 53-bit float from two draws, as CPython's random() does.
        let a = (self.next_u32() >> 5) as u64;
        let b = (self.next_u32() >> 6) as u64;
        let numerator = (a << 26) + b;
        (numerator as f64) / ((1u64 << 53) as f64)
    }
}

impl Shuffle for MTRandom {
    fn randint_inclusive(&mut self, a: usize, b: usize) -> usize {
        let span = (b + 1).saturating_sub(a);
        if span <= 1 {
            return a;
        }
        let r = self.random_f64();
        a + ((r * (span as f64)) as usize)
    }
}

// -----------------------------------------------------------------------------
// Explicit decks.

/// Parse a single bracketed integer list (e.g. "[1, 2, 3]") into a deck.
///
/// The list must contain exactly 52 integers, each a `Card::index()` in
/// 0..=51, with no duplicates.
pub fn parse_bracketed_deck_list(s: &str) -> Result<[Card; DECK_LEN], DealError> {
    let open = s.find('[').ok_or_else(|| DealError::BadDeck("missing '['".to_string()))?;
    let close = s.rfind(']').ok_or_else(|| DealError::BadDeck("missing ']'".to_string()))?;
    if close <= open {
        return Err(DealError::BadDeck("malformed [...] list".to_string()));
    }

    let mut cards = Vec::with_capacity(DECK_LEN);
    for part in s[open + 1..close].split(',') {
        let t = part.trim();
        if t.is_empty() {
            continue;
        }
        let v: u8 = t
            .parse()
            .map_err(|_| DealError::BadDeck(format!("could not parse '{}' as u8", t)))?;
        let card = Card::try_from_index(v).map_err(|e| DealError::BadDeck(e.to_string()))?;
        cards.push(card);
    }
    into_permutation(cards)
}

/// Parse whitespace- or comma-separated card codes ("AH 2C TD ...").
pub fn parse_card_codes(s: &str) -> Result<[Card; DECK_LEN], DealError> {
    let cards = s
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<Card>().map_err(|e| DealError::BadDeck(e.to_string())))
        .collect::<Result<Vec<_>, _>>()?;
    into_permutation(cards)
}

/// Check that `cards` is a permutation of the 52-card deck.
fn into_permutation(cards: Vec<Card>) -> Result<[Card; DECK_LEN], DealError> {
    if cards.len() != DECK_LEN {
        return Err(DealError::BadDeck(format!(
            "deck must have {} cards, got {}",
            DECK_LEN,
            cards.len()
        )));
    }
    let mut seen = [false; DECK_LEN];
    for card in &cards {
        let i = card.index() as usize;
        if seen[i] {
            return Err(DealError::BadDeck(format!("duplicate card {}", card)));
        }
        seen[i] = true;
    }
    let mut deck = [cards[0]; DECK_LEN];
    deck.copy_from_slice(&cards);
    Ok(deck)
}

/// Load a deck from a text file holding either a bracketed index list or
/// 52 card codes. Lines starting with '#' are comments.
pub fn load_deck_file(path: &Path) -> Result<DeckSpec, DealError> {
    let text = fs::read_to_string(path)
        .map_err(|e| DealError::Io(format!("could not read deck file '{}': {}", path.display(), e)))?;
    let body: String = text
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");

    let deck = if body.contains('[') {
        parse_bracketed_deck_list(&body)?
    } else {
        parse_card_codes(&body)?
    };
    let label = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "deck file".to_string());
    Ok(DeckSpec { label, deck })
}
