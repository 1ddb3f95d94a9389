//! Built-in drill corpora with qualified distractors.
//!
//! Each distractor list is curated from confusion families attested in
//! reading didactics:
//!
//! - letters: vertical mirror symmetry (b/d, p/q), horizontal mirror
//!   symmetry (b/p, n/u, m/w), morphological similarity (i/l/j, c/e/o, v/y)
//! - syllables: nasal families (on/an/en/in/un), mirror-letter onsets
//!   (ba/da/pa), mirror inversions (le/el, li/il, me/em)
//! - words: mirror words (son/nos, les/sel), orthographic rhyme families
//!   (main/nain/bain/pain), single-letter differences (mer/ver/fer)
//!
//! Some distractor ids intentionally reference forms outside the pool
//! (e.g. "qa", "chap"); the trial builder drops unresolved ids.

use crate::corpus::{Item, ItemPool, UnitType};
use crate::error::Result;

/// Get the built-in pool for a unit type.
///
/// Validation runs on every call, the same path a custom pool takes when
/// it becomes active.
pub fn builtin_pool(unit: UnitType) -> Result<ItemPool> {
    let items = match unit {
        UnitType::Letter => letters(),
        UnitType::Syllable => syllables(),
        UnitType::Word => words(),
    };
    ItemPool::new(unit, items)
}

fn letters() -> Vec<Item> {
    vec![
        // Mirror symmetry family
        Item::new("b", "b", &["d", "p", "q"]),
        Item::new("d", "d", &["b", "p", "q"]),
        Item::new("p", "p", &["b", "d", "q"]),
        Item::new("q", "q", &["b", "d", "p"]),
        // n/u/m/w family
        Item::new("n", "n", &["u", "m", "h"]),
        Item::new("u", "u", &["n", "m", "v"]),
        Item::new("m", "m", &["n", "w", "u"]),
        Item::new("w", "w", &["m", "v", "u"]),
        // i/l/j/t family
        Item::new("i", "i", &["l", "j", "t"]),
        Item::new("l", "l", &["i", "j", "t"]),
        Item::new("j", "j", &["i", "l", "t"]),
        // h/n/r family
        Item::new("h", "h", &["n", "r", "b"]),
        Item::new("r", "r", &["n", "h", "v"]),
        // c/e/o/a family
        Item::new("c", "c", &["e", "o", "a"]),
        Item::new("e", "e", &["c", "o", "a"]),
        Item::new("o", "o", &["c", "e", "a"]),
        Item::new("a", "a", &["c", "e", "o"]),
        // v/y family
        Item::new("v", "v", &["y", "u", "w"]),
        Item::new("y", "y", &["v", "u", "w"]),
        // f/t family
        Item::new("f", "f", &["t", "l", "i"]),
        Item::new("t", "t", &["f", "l", "i"]),
        // Isolated letters with their nearest confusions
        Item::new("g", "g", &["q", "p", "b"]),
        Item::new("k", "k", &["h", "r", "f"]),
        Item::new("s", "s", &["z", "c", "e"]),
        Item::new("z", "z", &["s", "n", "u"]),
        Item::new("x", "x", &["k", "v", "z"]),
    ]
}

fn syllables() -> Vec<Item> {
    vec![
        // Nasal family
        Item::new("on", "on", &["an", "en", "in"]),
        Item::new("an", "an", &["on", "en", "in"]),
        Item::new("en", "en", &["on", "an", "in"]),
        Item::new("in", "in", &["on", "an", "en"]),
        Item::new("un", "un", &["on", "an", "in"]),
        // ou/on/au/eu family
        Item::new("ou", "ou", &["on", "au", "eu"]),
        Item::new("au", "au", &["ou", "eu", "on"]),
        Item::new("eu", "eu", &["ou", "au", "on"]),
        // ba/da/pa family (b/d/p confusions)
        Item::new("ba", "ba", &["da", "pa", "qa"]),
        Item::new("da", "da", &["ba", "pa", "qa"]),
        Item::new("pa", "pa", &["ba", "da", "qa"]),
        // be/de/pe family
        Item::new("be", "be", &["de", "pe", "ge"]),
        Item::new("de", "de", &["be", "pe", "ge"]),
        Item::new("pe", "pe", &["be", "de", "ge"]),
        // bi/di/pi family
        Item::new("bi", "bi", &["di", "pi", "ni"]),
        Item::new("di", "di", &["bi", "pi", "ni"]),
        Item::new("pi", "pi", &["bi", "di", "ni"]),
        // bo/do/po family
        Item::new("bo", "bo", &["do", "po", "go"]),
        Item::new("do", "do", &["bo", "po", "go"]),
        Item::new("po", "po", &["bo", "do", "go"]),
        // Mirror syllables (order inversion)
        Item::new("le", "le", &["el", "la", "li"]),
        Item::new("el", "el", &["le", "al", "il"]),
        Item::new("li", "li", &["il", "la", "le"]),
        Item::new("il", "il", &["li", "el", "al"]),
        Item::new("me", "me", &["em", "ma", "mi"]),
        Item::new("em", "em", &["me", "am", "im"]),
        // ni/nu/na family
        Item::new("ni", "ni", &["nu", "na", "mi"]),
        Item::new("nu", "nu", &["ni", "na", "mu"]),
        Item::new("na", "na", &["ni", "nu", "ma"]),
        // si/sa/su/se family
        Item::new("si", "si", &["sa", "su", "se"]),
        Item::new("sa", "sa", &["si", "su", "se"]),
        Item::new("su", "su", &["si", "sa", "se"]),
        Item::new("se", "se", &["si", "sa", "su"]),
    ]
}

fn words() -> Vec<Item> {
    vec![
        // Mirror words
        Item::new("son", "son", &["nos", "bon", "ton"]),
        Item::new("nos", "nos", &["son", "bon", "ton"]),
        Item::new("les", "les", &["sel", "des", "ses"]),
        Item::new("sel", "sel", &["les", "del", "vel"]),
        Item::new("lit", "lit", &["til", "bit", "kit"]),
        // Orthographic rhymes in -ain
        Item::new("main", "main", &["nain", "bain", "pain"]),
        Item::new("nain", "nain", &["main", "bain", "pain"]),
        Item::new("bain", "bain", &["main", "nain", "pain"]),
        Item::new("pain", "pain", &["main", "nain", "bain"]),
        // Rhymes in -at
        Item::new("chat", "chat", &["chap", "char", "chas"]),
        Item::new("rat", "rat", &["mat", "bat", "fat"]),
        Item::new("mat", "mat", &["rat", "bat", "fat"]),
        // Word-onset confusions
        Item::new("lapin", "lapin", &["sapin", "rapin", "napin"]),
        Item::new("sapin", "sapin", &["lapin", "rapin", "capin"]),
        Item::new("bouche", "bouche", &["touche", "mouche", "louche"]),
        Item::new("touche", "touche", &["bouche", "mouche", "louche"]),
        Item::new("mouche", "mouche", &["bouche", "touche", "louche"]),
        // Visually close function words
        Item::new("sur", "sur", &["par", "car", "tar"]),
        Item::new("par", "par", &["sur", "car", "mar"]),
        Item::new("mais", "mais", &["puis", "suis", "lais"]),
        Item::new("puis", "puis", &["mais", "suis", "nuis"]),
        Item::new("dans", "dans", &["sans", "bans", "rans"]),
        Item::new("sans", "sans", &["dans", "bans", "rans"]),
        // Common words one letter apart
        Item::new("mer", "mer", &["ver", "fer", "per"]),
        Item::new("ver", "ver", &["mer", "fer", "per"]),
        Item::new("roi", "roi", &["loi", "moi", "toi"]),
        Item::new("loi", "loi", &["roi", "moi", "toi"]),
        Item::new("moi", "moi", &["roi", "loi", "toi"]),
        Item::new("toi", "toi", &["roi", "loi", "moi"]),
    ]
}
