//! Interactive confirmations.

use crate::ui::messages::warning;
use std::io::{self, BufRead, Write};

/// Ask a yes/no confirmation from the user. Anything but y/yes (or a read
/// failure) means no.
pub fn ask_confirmation(prompt: &str) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    read_answer()
        .map(|s| matches!(s.as_str(), "y" | "yes"))
        .unwrap_or(false)
}

/// Split an option label after its first character, the key to type.
fn split_label(opt: &str) -> (&str, &str) {
    let at = opt.char_indices().nth(1).map(|(i, _)| i).unwrap_or(opt.len());
    opt.split_at(at)
}

fn choice_key(opt: &str) -> Option<char> {
    opt.chars().next().and_then(|c| c.to_lowercase().next())
}

fn match_choice(answer: &str, options: &[&str]) -> Option<char> {
    let c = answer.chars().next()?;
    options.iter().filter_map(|o| choice_key(o)).find(|o| *o == c)
}

/// Ask the user to pick one of `options` by its first letter.
/// Returns the lower-cased letter chosen, or None for anything else.
pub fn ask_choice(prompt: &str, options: &[&str]) -> Option<char> {
    println!("{}", prompt);
    for opt in options {
        let (key, rest) = split_label(opt);
        println!("  [{}]{}", key, rest);
    }
    print!("> ");
    let _ = io::stdout().flush();

    match_choice(&read_answer()?, options)
}

fn read_answer() -> Option<String> {
    let mut s = String::new();
    io::stdin().lock().read_line(&mut s).ok()?;
    Some(s.trim().to_lowercase())
}
