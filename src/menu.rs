//! The interactive fleet session: print, add, remove, expense, exit.
//!
//! The session reads from any `BufRead` and writes to any `Write`, so the binary hands it the
//! terminal and tests hand it byte buffers.

use crate::commands::report;
use crate::import::decode;
use crate::model::{Amount, Expense, Fleet, Removal};
use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use tracing::debug;

const MENU: &str = "(P)rint, (A)dd, (R)emove, (E)xpense, e(X)it : ";
const ADD_PROMPT: &str = "Please enter the new boat CSV data          : ";
const REMOVE_PROMPT: &str = "Which boat do you want to remove?           : ";
const EXPENSE_PROMPT: &str = "Which boat do you want to spend on?         : ";
const AMOUNT_PROMPT: &str = "How much do you want to spend?              : ";

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum MenuOption {
    Print,
    Add,
    Remove,
    Expense,
    Exit,
}

impl MenuOption {
    /// The first non-blank character of `line` selects the option, ignoring case.
    fn from_line(line: &str) -> Option<Self> {
        match line.trim().chars().next()?.to_ascii_uppercase() {
            'P' => Some(MenuOption::Print),
            'A' => Some(MenuOption::Add),
            'R' => Some(MenuOption::Remove),
            'E' => Some(MenuOption::Expense),
            'X' => Some(MenuOption::Exit),
            _ => None,
        }
    }
}

/// Runs the menu loop against `fleet` until the user picks exit or the input ends.
///
/// Saving is left to the caller.
pub(crate) fn session<R, W>(fleet: &mut Fleet, input: R, output: W) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    Menu { input, output }.run(fleet)
}

struct Menu<R, W> {
    input: R,
    output: W,
}

impl<R, W> Menu<R, W>
where
    R: BufRead,
    W: Write,
{
    fn run(&mut self, fleet: &mut Fleet) -> Result<()> {
        loop {
            self.say("")?;
            let Some(line) = self.prompt(MENU)? else {
                debug!("Input ended, leaving the menu");
                return Ok(());
            };
            let option = match MenuOption::from_line(&line) {
                Some(option) => option,
                None => {
                    self.say("Invalid menu option, try again")?;
                    continue;
                }
            };
            debug!("Menu option {option:?}");
            let keep_going = match option {
                MenuOption::Print => {
                    self.say(&report(fleet))?;
                    true
                }
                MenuOption::Add => self.add(fleet)?,
                MenuOption::Remove => self.remove(fleet)?,
                MenuOption::Expense => self.expense(fleet)?,
                MenuOption::Exit => false,
            };
            if !keep_going {
                return Ok(());
            }
        }
    }

    /// Each action returns false when the input ended while it was prompting.
    fn add(&mut self, fleet: &mut Fleet) -> Result<bool> {
        let Some(line) = self.prompt(ADD_PROMPT)? else {
            return Ok(false);
        };
        match decode(&line) {
            Ok(boat) => {
                let message = format!("{} added successfully.", boat.name());
                fleet.add(boat);
                self.say(&message)?;
            }
            Err(e) => {
                debug!("Rejected new boat: {e}");
                self.say(&format!(
                    "Invalid input. Make sure data is correctly formatted: {e}"
                ))?;
            }
        }
        Ok(true)
    }

    fn remove(&mut self, fleet: &mut Fleet) -> Result<bool> {
        let Some(name) = self.prompt(REMOVE_PROMPT)? else {
            return Ok(false);
        };
        let message = match fleet.remove(&name) {
            Removal::Removed(boat) => format!("{} removed successfully.", boat.name()),
            Removal::NotFound => format!("Cannot find boat {name}."),
        };
        self.say(&message)?;
        Ok(true)
    }

    fn expense(&mut self, fleet: &mut Fleet) -> Result<bool> {
        let Some(name) = self.prompt(EXPENSE_PROMPT)? else {
            return Ok(false);
        };
        if fleet.find(&name).is_none() {
            self.say(&format!("Cannot find boat {name}."))?;
            return Ok(true);
        }

        let Some(raw) = self.prompt(AMOUNT_PROMPT)? else {
            return Ok(false);
        };
        let amount: Amount = match raw.parse() {
            Ok(amount) => amount,
            Err(e) => {
                self.say(&format!("Invalid amount: {e}"))?;
                return Ok(true);
            }
        };
        if amount.is_negative() {
            self.say("An expense cannot be negative.")?;
            return Ok(true);
        }

        let message = match fleet.authorize_expense(&name, amount) {
            Expense::Authorized { spent } => format!("Expense authorized. ${spent} spent."),
            Expense::Rejected { remaining } => {
                format!("Expense not permitted, only ${remaining} left to spend.")
            }
            Expense::NotFound => format!("Cannot find boat {name}."),
        };
        self.say(&message)?;
        Ok(true)
    }

    /// Writes `text` without a newline and reads one line. `None` means the input has ended.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}").context("Unable to write to the output")?;
        self.output.flush().context("Unable to flush the output")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Unable to read from the input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}").context("Unable to write to the output")
    }
}
