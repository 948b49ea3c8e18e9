//! Rule-based compound sentiment scoring for short social posts.
//!
//! Valence-lexicon scoring in the VADER style: general English sentiment
//! vocabulary plus crypto slang. Each lexicon word carries a valence on a
//! `-4..=4` scale which is then adjusted by nearby boosters and negations, by
//! all-caps emphasis, by a contrastive "but", and by exclamation marks.
//! The sum is squashed into `[-1.0, 1.0]`.

use serde::Serialize;

use crate::error::PipelineError;
use crate::ports::Store;

/// Word valences on a `-4..=4` scale. Keys are lowercase single words in
/// strictly ascending order.
pub(crate) const LEXICON: &[(&str, f64)] = &[
    ("abandoned", -1.9),
    ("abuse", -3.2),
    ("accomplished", 1.8),
    ("achieve", 1.8),
    ("achievement", 2.1),
    ("admire", 2.1),
    ("adorable", 2.2),
    ("advantage", 1.0),
    ("afraid", -2.0),
    ("agree", 1.5),
    ("airdrop", 1.0),
    ("alarming", -2.2),
    ("alive", 1.6),
    ("alpha", 1.0),
    ("amazing", 2.8),
    ("anger", -2.7),
    ("angry", -2.3),
    ("anguish", -2.9),
    ("annoyed", -1.6),
    ("annoying", -1.8),
    ("anxiety", -0.7),
    ("anxious", -1.0),
    ("apocalypse", -3.4),
    ("appreciate", 1.9),
    ("appreciated", 2.3),
    ("approval", 2.1),
    ("approved", 1.8),
    ("ashamed", -2.1),
    ("astonishing", 2.5),
    ("ath", 2.0),
    ("attack", -2.1),
    ("attractive", 1.9),
    ("awesome", 3.1),
    ("awful", -2.0),
    ("awkward", -0.6),
    ("bad", -2.5),
    ("bagholder", -1.6),
    ("bagholders", -1.6),
    ("bankrupt", -2.6),
    ("based", 1.5),
    ("bearish", -2.3),
    ("beautiful", 2.9),
    ("best", 3.2),
    ("betrayed", -3.2),
    ("better", 1.9),
    ("bitter", -1.8),
    ("blame", -1.4),
    ("bleak", -1.7),
    ("bleed", -1.7),
    ("bleeding", -2.0),
    ("blessed", 2.9),
    ("bliss", 2.7),
    ("bold", 1.6),
    ("bonus", 2.5),
    ("boom", 2.1),
    ("booming", 2.3),
    ("boring", -1.3),
    ("brave", 2.4),
    ("breakout", 1.7),
    ("breakthrough", 2.1),
    ("bright", 1.9),
    ("brilliant", 2.8),
    ("broke", -1.8),
    ("broken", -2.1),
    ("brutal", -3.1),
    ("bubble", -0.8),
    ("bug", -1.4),
    ("bullish", 2.3),
    ("burden", -1.9),
    ("calm", 1.3),
    ("capitulation", -2.2),
    ("catastrophe", -3.4),
    ("catastrophic", -3.3),
    ("celebrate", 2.7),
    ("celebrating", 2.7),
    ("celebration", 2.5),
    ("champion", 2.9),
    ("chaos", -2.7),
    ("charming", 2.8),
    ("cheated", -2.5),
    ("cheer", 2.3),
    ("cheerful", 2.5),
    ("clean", 1.7),
    ("clever", 2.0),
    ("collapse", -2.2),
    ("collapsed", -2.5),
    ("collapsing", -2.4),
    ("comfortable", 1.5),
    ("concern", -1.0),
    ("concerned", -1.3),
    ("confidence", 2.3),
    ("confident", 2.2),
    ("confused", -1.3),
    ("congrats", 2.4),
    ("congratulations", 2.9),
    ("cool", 1.3),
    ("corrupt", -3.0),
    ("crash", -2.4),
    ("crashing", -2.6),
    ("creative", 1.9),
    ("crisis", -3.1),
    ("crushed", -1.8),
    ("cry", -2.1),
    ("crying", -2.1),
    ("cute", 2.0),
    ("damage", -2.2),
    ("damn", -1.7),
    ("danger", -2.4),
    ("dangerous", -2.1),
    ("dark", -1.4),
    ("dead", -3.3),
    ("decline", -1.1),
    ("declining", -1.4),
    ("dedicated", 2.0),
    ("defeat", -2.0),
    ("defeated", -2.1),
    ("degen", 0.3),
    ("delight", 2.9),
    ("delighted", 3.1),
    ("delightful", 2.9),
    ("delisted", -2.0),
    ("depressed", -2.3),
    ("depressing", -1.6),
    ("depression", -2.7),
    ("despair", -2.6),
    ("desperate", -1.3),
    ("destroyed", -3.4),
    ("destruction", -2.7),
    ("devastated", -3.1),
    ("devastating", -3.2),
    ("dip", -0.8),
    ("disappointed", -1.9),
    ("disappointing", -2.2),
    ("disappointment", -2.3),
    ("disaster", -3.1),
    ("disgust", -2.9),
    ("disgusting", -2.4),
    ("distress", -2.4),
    ("doom", -1.7),
    ("doubt", -1.5),
    ("down", -0.8),
    ("drop", -1.1),
    ("dropped", -1.2),
    ("dumb", -2.3),
    ("dump", -1.8),
    ("dumping", -2.0),
    ("easy", 1.9),
    ("ecstatic", 2.9),
    ("effective", 2.1),
    ("elegant", 2.1),
    ("embarrassed", -1.5),
    ("empowered", 2.0),
    ("empty", -0.8),
    ("encouraged", 1.5),
    ("encouraging", 2.4),
    ("enemy", -2.5),
    ("energetic", 1.9),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("enjoying", 2.4),
    ("enthusiastic", 2.5),
    ("epic", 2.1),
    ("error", -1.7),
    ("euphoria", 2.9),
    ("evil", -3.4),
    ("excellent", 2.7),
    ("exceptional", 2.4),
    ("excited", 2.2),
    ("exciting", 2.2),
    ("exhausted", -1.5),
    ("exit", -0.4),
    ("exploit", -1.6),
    ("exploited", -2.0),
    ("fabulous", 3.0),
    ("fail", -2.5),
    ("failed", -2.3),
    ("fair", 1.3),
    ("faith", 1.8),
    ("fake", -2.1),
    ("falling", -0.9),
    ("fantastic", 2.6),
    ("fatal", -2.5),
    ("fault", -2.1),
    ("favorite", 2.0),
    ("fear", -2.2),
    ("fearful", -2.2),
    ("fine", 0.8),
    ("fortunate", 1.9),
    ("fraud", -2.8),
    ("free", 2.3),
    ("fresh", 1.3),
    ("friendly", 2.2),
    ("frightened", -1.9),
    ("frustrated", -2.4),
    ("frustrating", -1.9),
    ("fud", -1.8),
    ("fun", 2.3),
    ("furious", -2.7),
    ("gains", 2.0),
    ("garbage", -1.7),
    ("gem", 1.8),
    ("generous", 2.3),
    ("genius", 2.1),
    ("glad", 2.0),
    ("gloomy", -2.3),
    ("glorious", 2.7),
    ("gm", 0.9),
    ("good", 1.9),
    ("gorgeous", 3.0),
    ("grand", 2.0),
    ("grateful", 2.0),
    ("great", 3.1),
    ("greed", -1.7),
    ("greedy", -1.3),
    ("grief", -2.2),
    ("grow", 1.4),
    ("growing", 1.3),
    ("growth", 1.6),
    ("guilty", -1.8),
    ("hack", -2.5),
    ("hacked", -2.6),
    ("haha", 2.0),
    ("happy", 2.7),
    ("hard", -0.4),
    ("harm", -2.5),
    ("hate", -2.7),
    ("healthy", 1.7),
    ("heartbroken", -3.3),
    ("hell", -3.6),
    ("helpful", 1.7),
    ("helpless", -2.0),
    ("hero", 2.6),
    ("hodl", 1.1),
    ("honest", 2.3),
    ("hooray", 2.4),
    ("hope", 1.9),
    ("hopeful", 2.3),
    ("hopeless", -2.0),
    ("horrible", -2.5),
    ("horrific", -3.4),
    ("hurt", -2.4),
    ("hurting", -1.7),
    ("hype", 1.2),
    ("hyped", 1.8),
    ("ideal", 2.4),
    ("idiot", -2.3),
    ("impressed", 2.1),
    ("impressive", 2.3),
    ("improve", 1.9),
    ("improved", 2.1),
    ("improvement", 2.0),
    ("incredible", 2.6),
    ("innovative", 1.9),
    ("insane", -1.7),
    ("inspiring", 2.2),
    ("interesting", 1.7),
    ("jealous", -2.0),
    ("joy", 2.8),
    ("joyful", 2.9),
    ("keen", 1.5),
    ("kill", -3.7),
    ("killed", -3.5),
    ("kind", 2.4),
    ("lame", -1.8),
    ("laugh", 2.6),
    ("legendary", 2.4),
    ("lfg", 2.0),
    ("liar", -3.1),
    ("lies", -1.8),
    ("like", 2.0),
    ("liked", 1.8),
    ("likes", 1.8),
    ("liquidated", -2.6),
    ("lol", 1.8),
    ("lonely", -1.5),
    ("lose", -1.6),
    ("losing", -1.6),
    ("loss", -1.9),
    ("losses", -2.0),
    ("lost", -1.3),
    ("love", 3.2),
    ("loved", 2.9),
    ("lovely", 2.8),
    ("loves", 2.7),
    ("loving", 2.9),
    ("lucky", 1.9),
    ("mad", -2.2),
    ("magic", 2.3),
    ("magnificent", 2.9),
    ("marvelous", 2.9),
    ("masterpiece", 3.1),
    ("mess", -1.5),
    ("miserable", -2.2),
    ("misery", -2.7),
    ("mistake", -1.4),
    ("mistakes", -1.5),
    ("moon", 1.8),
    ("mooning", 2.2),
    ("moonshot", 1.8),
    ("motivated", 1.9),
    ("nasty", -2.6),
    ("negative", -2.7),
    ("nervous", -1.1),
    ("ngmi", -2.0),
    ("nice", 1.8),
    ("nightmare", -3.0),
    ("optimism", 2.5),
    ("optimistic", 1.3),
    ("outperform", 1.5),
    ("outrage", -2.3),
    ("outstanding", 3.0),
    ("overvalued", -1.2),
    ("pain", -2.3),
    ("painful", -2.4),
    ("panic", -2.3),
    ("paradise", 3.2),
    ("passion", 2.0),
    ("passionate", 2.4),
    ("pathetic", -2.2),
    ("peace", 2.5),
    ("perfect", 2.7),
    ("phenomenal", 2.6),
    ("playful", 1.9),
    ("pleased", 1.9),
    ("pleasure", 2.7),
    ("plunge", -1.6),
    ("plunged", -1.8),
    ("poor", -2.1),
    ("positive", 2.6),
    ("powerful", 1.8),
    ("pretty", 2.2),
    ("pride", 1.4),
    ("problem", -1.7),
    ("profit", 1.9),
    ("promising", 2.0),
    ("proud", 2.1),
    ("pump", 1.2),
    ("pumping", 1.6),
    ("rally", 2.0),
    ("recommend", 1.5),
    ("recover", 1.2),
    ("recovered", 1.3),
    ("recovery", 1.4),
    ("regret", -1.8),
    ("rekt", -2.6),
    ("relief", 2.1),
    ("relieved", 1.6),
    ("remarkable", 2.5),
    ("resilient", 1.6),
    ("respect", 2.1),
    ("reward", 2.0),
    ("rewarding", 2.4),
    ("rich", 2.6),
    ("risk", -1.1),
    ("risky", -0.8),
    ("rocket", 1.4),
    ("rug", -3.0),
    ("rugged", -3.0),
    ("rugpull", -3.0),
    ("ruin", -2.8),
    ("ruined", -2.4),
    ("sad", -2.1),
    ("safe", 1.9),
    ("satisfied", 1.8),
    ("scam", -3.0),
    ("scammer", -3.0),
    ("scammers", -3.0),
    ("scared", -2.2),
    ("scary", -2.2),
    ("secure", 1.4),
    ("selloff", -1.8),
    ("shame", -2.1),
    ("shill", -1.0),
    ("shit", -2.6),
    ("shock", -1.6),
    ("shocked", -1.3),
    ("sick", -2.3),
    ("sinking", -1.9),
    ("slump", -1.7),
    ("smart", 1.7),
    ("smile", 1.5),
    ("smiling", 2.0),
    ("solid", 1.4),
    ("sorry", -0.3),
    ("spectacular", 2.8),
    ("splendid", 2.8),
    ("stellar", 2.3),
    ("stress", -1.8),
    ("stressed", -1.4),
    ("strong", 2.3),
    ("struggle", -1.3),
    ("struggling", -1.8),
    ("stuck", -1.0),
    ("stunning", 2.7),
    ("stupid", -2.4),
    ("succeed", 2.2),
    ("success", 2.7),
    ("successful", 2.8),
    ("suffer", -2.5),
    ("suffering", -2.1),
    ("superb", 3.1),
    ("support", 1.7),
    ("supportive", 1.9),
    ("sure", 1.3),
    ("surge", 1.6),
    ("surging", 1.7),
    ("suspicious", -1.5),
    ("sweet", 2.0),
    ("tank", -1.2),
    ("tanked", -2.0),
    ("tanking", -2.0),
    ("tears", -0.9),
    ("terrible", -2.1),
    ("terrific", 2.1),
    ("terrified", -3.0),
    ("terrifying", -2.7),
    ("thank", 1.5),
    ("thankful", 2.7),
    ("thanks", 1.9),
    ("threat", -2.4),
    ("thrilled", 2.7),
    ("thrilling", 2.1),
    ("thrive", 2.2),
    ("thriving", 2.3),
    ("tired", -1.9),
    ("top", 0.8),
    ("toxic", -2.4),
    ("tragedy", -3.4),
    ("tragic", -3.0),
    ("trash", -1.6),
    ("triumph", 2.4),
    ("trouble", -1.7),
    ("trust", 2.3),
    ("ugly", -2.3),
    ("undervalued", 1.2),
    ("unfair", -2.1),
    ("unhappy", -1.8),
    ("upset", -1.6),
    ("useful", 1.9),
    ("useless", -1.8),
    ("valuable", 2.1),
    ("vibrant", 2.2),
    ("victim", -1.6),
    ("victory", 2.8),
    ("violent", -2.9),
    ("wagmi", 2.2),
    ("warning", -1.4),
    ("waste", -1.8),
    ("wasted", -2.2),
    ("weak", -1.9),
    ("weakness", -1.5),
    ("welcome", 2.0),
    ("win", 2.8),
    ("winner", 2.8),
    ("winning", 2.4),
    ("wins", 2.7),
    ("wise", 1.8),
    ("wonderful", 2.7),
    ("worried", -2.2),
    ("worry", -1.9),
    ("worse", -2.1),
    ("worst", -3.1),
    ("worthless", -1.9),
    ("wow", 2.8),
    ("wreck", -1.4),
    ("wrecked", -2.1),
    ("wrong", -2.1),
    ("yay", 2.4),
    ("yes", 1.7),
];

/// Intensifiers (positive) and dampeners (negative) applied to the
/// following lexicon word.
const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", BOOST),
    ("completely", BOOST),
    ("extremely", BOOST),
    ("highly", BOOST),
    ("hugely", BOOST),
    ("incredibly", BOOST),
    ("insanely", BOOST),
    ("massively", BOOST),
    ("really", BOOST),
    ("so", BOOST),
    ("super", BOOST),
    ("totally", BOOST),
    ("very", BOOST),
    ("barely", -BOOST),
    ("hardly", -BOOST),
    ("kinda", -BOOST),
    ("marginally", -BOOST),
    ("slightly", -BOOST),
    ("somewhat", -BOOST),
];

const NEGATIONS: &[&str] = &[
    "ain't", "aint", "aren't", "cannot", "can't", "cant", "didn't", "didnt", "doesn't", "doesnt",
    "don't", "dont", "isn't", "isnt", "neither", "never", "no", "nobody", "none", "nor", "not",
    "nothing", "nowhere", "wasn't", "wasnt", "without", "won't", "wont",
];

const BOOST: f64 = 0.293;
const CAPS_BOOST: f64 = 0.733;
const NEGATION_SCALAR: f64 = -0.74;
const EXCLAMATION_BOOST: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const NORMALIZATION_ALPHA: f64 = 15.0;
/// How far back boosters and negations reach, with the weight at each distance.
const LOOKBACK_DECAY: [f64; 3] = [1.0, 0.95, 0.9];

struct Token {
    lower: String,
    all_caps: bool,
}

fn tokenize(text: &str) -> Vec<Token> {
    text.split_whitespace()
        .filter_map(|raw| {
            let word = raw
                .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .trim_matches('\'');
            if word.is_empty() {
                return None;
            }
            let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
            let all_caps = letters.len() > 1 && letters.iter().all(|c| c.is_uppercase());
            Some(Token {
                lower: word.to_lowercase().replace('\u{2019}', "'"),
                all_caps,
            })
        })
        .collect()
}

fn valence(word: &str) -> Option<f64> {
    LEXICON
        .binary_search_by(|&(lex_word, _)| lex_word.cmp(word))
        .ok()
        .map(|i| LEXICON[i].1)
}

fn booster(word: &str) -> Option<f64> {
    BOOSTERS
        .iter()
        .find(|&&(b, _)| b == word)
        .map(|&(_, v)| v)
}

fn is_negation(word: &str) -> bool {
    NEGATIONS.contains(&word) || word.ends_with("n't")
}

/// Compound sentiment of `text` in `[-1.0, 1.0]`.
///
/// Returns `0.0` for empty text or text with no lexicon words.
#[must_use]
pub fn compound_score(text: &str) -> f64 {
    let tokens = tokenize(text);
    if tokens.is_empty() {
        return 0.0;
    }

    // All-caps only signals emphasis when the rest of the text is not shouting too.
    let caps_differential =
        tokens.iter().any(|t| t.all_caps) && tokens.iter().any(|t| !t.all_caps);

    let mut valences: Vec<f64> = tokens
        .iter()
        .enumerate()
        .map(|(i, token)| {
            let Some(mut v) = valence(&token.lower) else {
                return 0.0;
            };

            if caps_differential && token.all_caps {
                v += CAPS_BOOST.copysign(v);
            }

            let mut negated = false;
            for (distance, decay) in LOOKBACK_DECAY.iter().enumerate() {
                let Some(prev) = i.checked_sub(distance + 1).map(|j| &tokens[j]) else {
                    break;
                };
                if let Some(scalar) = booster(&prev.lower) {
                    v += scalar * decay * v.signum();
                }
                negated |= is_negation(&prev.lower);
            }

            if negated {
                v *= NEGATION_SCALAR;
            }
            v
        })
        .collect();

    if let Some(pivot) = tokens.iter().position(|t| t.lower == "but") {
        for (i, v) in valences.iter_mut().enumerate() {
            match i.cmp(&pivot) {
                std::cmp::Ordering::Less => *v *= 0.5,
                std::cmp::Ordering::Greater => *v *= 1.5,
                std::cmp::Ordering::Equal => {}
            }
        }
    }

    let mut sum: f64 = valences.iter().sum();
    if sum == 0.0 {
        return 0.0;
    }

    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
    #[allow(clippy::cast_precision_loss)]
    let emphasis = exclamations as f64 * EXCLAMATION_BOOST;
    sum += emphasis.copysign(sum);

    (sum / (sum * sum + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreReport {
    /// Tweets that lacked a score when the run started.
    pub unscored: usize,
    /// Tweets whose score this run actually wrote.
    pub updated: u64,
}

/// Scores every stored tweet that has no sentiment yet and writes all scores
/// in one bulk conditional update.
///
/// Does not write anything when there is nothing to score.
///
/// # Errors
///
/// Returns [`PipelineError::Store`] if reading or the bulk write fails.
pub async fn score_unscored(store: &dyn Store) -> Result<ScoreReport, PipelineError> {
    let pending = store.unscored_tweets().await?;
    if pending.is_empty() {
        tracing::info!("no unscored tweets");
        return Ok(ScoreReport::default());
    }

    let scores: Vec<(String, f64)> = pending
        .iter()
        .map(|t| (t.tweet_id.clone(), compound_score(&t.content)))
        .collect();

    let updated = store.apply_sentiment_scores(&scores).await?;
    tracing::info!(
        unscored = pending.len(),
        updated,
        "sentiment scores written"
    );

    Ok(ScoreReport {
        unscored: pending.len(),
        updated,
    })
}

#[cfg(test)]
#[path = "scorer_test.rs"]
mod tests;
