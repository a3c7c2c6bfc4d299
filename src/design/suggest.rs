use rand::Rng;
use rand::seq::SliceRandom;

use crate::design::model::{BgPreset, Occasion};

/// Canned messages offered per occasion.
pub fn suggestions(occasion: Occasion) -> &'static [&'static str] {
    match occasion {
        Occasion::Birthday => &["Happy bday! 🎂", "Have a lit day ✨"],
        Occasion::Anniversary => &["Forever ❤️", "Cheers to you two 💕"],
        Occasion::Invitation => &["Join us 🎉"],
        Occasion::Custom => &["Thinking of you ✨"],
    }
}

pub fn suggest_message<R: Rng + ?Sized>(occasion: Occasion, rng: &mut R) -> &'static str {
    let options = suggestions(occasion);
    options.choose(rng).copied().unwrap_or("Thinking of you ✨")
}

/// Pick a random occasion, then a random suggestion for it.
pub fn random_message<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    let occasion = Occasion::ALL
        .choose(rng)
        .copied()
        .unwrap_or(Occasion::Custom);
    suggest_message(occasion, rng)
}

pub fn random_preset<R: Rng + ?Sized>(rng: &mut R) -> BgPreset {
    BgPreset::ALL.choose(rng).copied().unwrap_or_default()
}
