use std::env;
use std::fs;

use log::{info, warn};

use rs_markov_core::{Chain, ChainError};

/// Seed vocabulary for sentence generation. Any seed missing from the
/// training data is skipped with a warning.
const FIRST_WORDS: [&str; 12] = [
    "Now", "Then", "Whilst", "She", "He", "It", "Look", "Ah!", "Come", "The", "True", "There",
];

/// Reads one training file and returns its whitespace-separated words.
fn read_words(path: &str) -> std::io::Result<Vec<String>> {
    let contents = fs::read_to_string(path)?;
    Ok(contents.split_whitespace().map(str::to_owned).collect())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Training files come from the command line; default to the
    // conventional file name when none are given
    let mut files: Vec<String> = env::args().skip(1).collect();
    if files.is_empty() {
        files.push("training_data.txt".to_owned());
    }

    // Each file is trained as its own independent sequence, so the last
    // word of one file never links to the first word of the next
    let mut chain: Chain<String> = Chain::new();
    for file in &files {
        let words = read_words(file)?;
        info!("training on {} ({} words)", file, words.len());
        chain.train(words)?;
    }

    // Generate one sentence per seed word, ending at the first word that
    // closes a sentence
    for seed in FIRST_WORDS {
        let walk = chain.generate(seed.to_owned(), |word| word.ends_with('.'));

        match walk.collect::<Result<Vec<String>, ChainError<String>>>() {
            Ok(words) => println!("{}", words.join(" ")),
            Err(ChainError::UnknownState(token)) => {
                warn!("generation failed starting from word '{}': never seen in training", token);
            }
            // Anything else is a bug in the chain itself
            Err(err) => return Err(err.into()),
        }
    }

    Ok(())
}
