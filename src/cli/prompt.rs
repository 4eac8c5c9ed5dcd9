use std::io::{self, Write};
use crate::engine::Confirm;

/// Interactive y/n confirmation on the terminal
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        print!("{} (y/n): ", prompt);
        if let Err(e) = io::stdout().flush() {
            log::warn!("Failed to flush prompt: {}", e);
            return false;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => {
                // EOF: treat as "no"
                println!();
                false
            }
            Ok(_) => is_yes(&input),
            Err(e) => {
                log::warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }
}

fn is_yes(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    input == "y" || input == "yes"
}
