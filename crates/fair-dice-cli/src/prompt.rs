//! Interactive counter-party reading answers from a terminal.

use crate::table::TITLE;
use fair_dice_core::games::{DiceRoll, FirstMoveDecision, SelectedDice};
use fair_dice_core::protocol::{CommitMessage, ExchangeStep, RevealMessage};
use fair_dice_core::{Counterparty, DiceSet, GameError, Party, Result};
use std::io::{self, BufRead, Write};

/// One parsed line of user input
enum Answer {
    Number(u64),
    Exit,
    Help,
}

/// Asks the user for guesses, dice and roll contributions.
///
/// `X` aborts the game and `?` prints the probability table.
pub struct Prompt<R, W> {
    input: R,
    output: W,
    help: String,
    write_error: Option<io::Error>,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W, help: String) -> Self {
        Self {
            input,
            output,
            help,
            write_error: None,
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    /// Observers cannot fail, so the first write error is kept and the game
    /// aborts at the next question.
    fn say(&mut self, text: &str) {
        if self.write_error.is_none() {
            if let Err(e) = writeln!(self.output, "{}", text) {
                self.write_error = Some(e);
            }
        }
    }

    fn read_answer(&mut self) -> Result<Answer> {
        loop {
            if let Some(e) = self.write_error.take() {
                return Err(GameError::Aborted(format!("terminal write failed: {}", e)));
            }
            write!(self.output, "Your selection: ")
                .and_then(|_| self.output.flush())
                .map_err(|e| GameError::Aborted(e.to_string()))?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .map_err(|e| GameError::Aborted(e.to_string()))?;
            if read == 0 {
                return Err(GameError::Aborted("input closed".into()));
            }

            match line.trim() {
                "x" | "X" => return Ok(Answer::Exit),
                "?" => return Ok(Answer::Help),
                other => match other.parse::<u64>() {
                    Ok(n) => return Ok(Answer::Number(n)),
                    Err(_) => self.say("Please enter one of the listed options."),
                },
            }
        }
    }

    /// Show `menu`, then read until the user picks a number or exits
    fn ask_number(&mut self, menu: &[String]) -> Result<u64> {
        loop {
            for line in menu {
                self.say(line);
            }
            self.say("X - exit");
            self.say("? - help");
            match self.read_answer()? {
                Answer::Number(n) => return Ok(n),
                Answer::Exit => return Err(GameError::Aborted("user exited".into())),
                Answer::Help => {
                    let help = format!("{}\n{}", TITLE, self.help);
                    self.say(&help);
                }
            }
        }
    }

    fn ask_value(&mut self, max: u32) -> Result<u32> {
        let menu: Vec<String> = (0..=max).map(|v| format!("{} - {}", v, v)).collect();
        let n = self.ask_number(&menu)?;
        // Oversized input becomes an out-of-range value for the game to reject
        Ok(u32::try_from(n).unwrap_or(u32::MAX))
    }
}

impl<R: BufRead, W: Write> Counterparty for Prompt<R, W> {
    fn guess_first_move(&mut self, commit: &CommitMessage) -> Result<u32> {
        self.say("Let's determine who makes the first move.");
        self.say(&format!(
            "I selected a random value in the range 0..{} (HMAC={}).",
            commit.max_value(),
            commit.digest
        ));
        self.say("Try to guess my selection.");
        self.ask_value(commit.max_value())
    }

    fn pick_dice(&mut self, sets: &[DiceSet], available: &[usize]) -> Result<usize> {
        self.say("Choose your dice:");
        let menu: Vec<String> = available
            .iter()
            .map(|&i| format!("{} - {}", i, sets[i]))
            .collect();
        let n = self.ask_number(&menu)?;
        Ok(usize::try_from(n).unwrap_or(usize::MAX))
    }

    fn add_value(&mut self, commit: &CommitMessage) -> Result<u32> {
        let whose = match commit.step {
            ExchangeStep::Roll(Party::User) => "your",
            _ => "my",
        };
        self.say(&format!("It's time for {} roll.", whose));
        self.say(&format!(
            "I selected a random value in the range 0..{} (HMAC={}).",
            commit.max_value(),
            commit.digest
        ));
        self.say(&format!("Add your number modulo {}.", commit.bound));
        self.ask_value(commit.max_value())
    }

    fn observe_reveal(&mut self, reveal: &RevealMessage) {
        let result = &reveal.result;
        match reveal.step {
            ExchangeStep::FirstMove => self.say(&format!(
                "My selection: {} (KEY={}).",
                result.party_value, result.secret_key
            )),
            ExchangeStep::Roll(_) => {
                self.say(&format!(
                    "My number is {} (KEY={}).",
                    result.party_value, result.secret_key
                ));
                self.say(&format!(
                    "The fair number generation result is {} + {} = {} (mod {}).",
                    result.party_value, result.counter_value, result.combined, result.bound
                ));
            }
        }
    }

    fn observe_first_move(&mut self, decision: &FirstMoveDecision) {
        match decision.first_mover {
            Party::User => self.say("You make the first move."),
            Party::Computer => self.say("I make the first move."),
        }
    }

    fn observe_pick(&mut self, party: Party, selected: &SelectedDice) {
        match party {
            Party::User => self.say(&format!("You choose the [{}] dice.", selected.dice)),
            Party::Computer => self.say(&format!("I choose the [{}] dice.", selected.dice)),
        }
    }

    fn observe_roll(&mut self, roll: &DiceRoll) {
        match roll.party {
            Party::User => self.say(&format!("Your roll result is {}.", roll.face)),
            Party::Computer => self.say(&format!("My roll result is {}.", roll.face)),
        }
    }

    fn on_rejected(&mut self, error: &GameError) -> Result<()> {
        self.say(&format!("{}. Try again.", error));
        Ok(())
    }
}
