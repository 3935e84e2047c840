//! Interactive prompts.
//!
//! Commands ask the user for anything they were not given on the command
//! line through [`Prompter`]. [`TerminalPrompter`] re-asks until the answer
//! is valid, so malformed input never reaches a command.

use anyhow::{bail, Context, Result};
use noterand_core::model::Range;
use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::path::{Path, PathBuf};

/// What a chosen file will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileMode {
    Read,
    Write,
}

pub trait Prompter {
    /// Asks until the answer is one of `options` (compared case-insensitively).
    fn ask_bounded_choice(&mut self, prompt: &str, options: &[&str]) -> Result<String>;

    /// Asks for a number within `low..=high`; `None` leaves it unbounded.
    fn ask_bounded_number(
        &mut self,
        prompt: &str,
        low: u32,
        high: Option<u32>,
        hex: bool,
    ) -> Result<u32>;

    /// Asks for both ends of a range, the second no lower than the first.
    fn ask_range(
        &mut self,
        prompts: [&str; 2],
        low: u32,
        high: u32,
        current: Option<Range>,
        hex: bool,
    ) -> Result<Range>;

    fn ask_yes_no(&mut self, prompt: &str) -> Result<bool>;

    /// Settles on a file to read or write, starting from `default`.
    ///
    /// # Returns
    /// `None` when the user gives up.
    fn choose_destination_file(
        &mut self,
        prompt: &str,
        mode: FileMode,
        default: Option<&Path>,
        overwrite: bool,
    ) -> Result<Option<PathBuf>>;
}

/// Prompts over any line reader and writer.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message).context("Failed to write prompt")?;
        Ok(())
    }

    /// Prints the prompt and reads one trimmed line.
    fn ask(&mut self, prompt: &str) -> Result<String> {
        writeln!(self.output, "\n{}", prompt).context("Failed to write prompt")?;
        self.output.flush().context("Failed to write prompt")?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read answer")?;
        if read == 0 {
            bail!("Input closed while waiting for an answer");
        }
        Ok(line.trim().to_string())
    }
}

fn show(value: u32, hex: bool) -> String {
    if hex {
        format!("{:X}", value)
    } else {
        value.to_string()
    }
}

fn parse_number(text: &str, hex: bool) -> Option<u32> {
    if hex {
        u32::from_str_radix(text.trim_start_matches("0x"), 16).ok()
    } else {
        text.parse().ok()
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask_bounded_choice(&mut self, prompt: &str, options: &[&str]) -> Result<String> {
        loop {
            let answer = self.ask(prompt)?.to_uppercase();
            if let Some(option) = options.iter().find(|o| o.to_uppercase() == answer) {
                return Ok(option.to_string());
            }
            self.say(&format!(
                "You entered \"{}\" which is not a valid option. Enter one of {}.",
                answer,
                options.join(", ")
            ))?;
        }
    }

    fn ask_bounded_number(
        &mut self,
        prompt: &str,
        low: u32,
        high: Option<u32>,
        hex: bool,
    ) -> Result<u32> {
        let prompt = match high {
            Some(high) => format!(
                "{} It must be within {} and {}.",
                prompt,
                show(low, hex),
                show(high, hex)
            ),
            None => format!("{} It must be at least {}.", prompt, show(low, hex)),
        };
        loop {
            let answer = self.ask(&prompt)?;
            let Some(number) = parse_number(&answer, hex) else {
                let kind = if hex { "a hex" } else { "an int" };
                self.say(&format!("Could not parse \"{}\" as {} value.", answer, kind))?;
                continue;
            };
            match high {
                _ if number < low => self.say(&format!(
                    "The minimum is {}, but you entered {}.",
                    show(low, hex),
                    answer
                ))?,
                Some(high) if number > high => self.say(&format!(
                    "The maximum is {}, but you entered {}.",
                    show(high, hex),
                    answer
                ))?,
                _ => return Ok(number),
            }
        }
    }

    fn ask_range(
        &mut self,
        prompts: [&str; 2],
        low: u32,
        high: u32,
        current: Option<Range>,
        hex: bool,
    ) -> Result<Range> {
        let [first_prompt, second_prompt] = match current {
            Some(current) => [
                format!("{} Currently it's {}.", prompts[0], show(current.low(), hex)),
                format!("{} Currently it's {}.", prompts[1], show(current.high(), hex)),
            ],
            None => [prompts[0].to_string(), prompts[1].to_string()],
        };
        let first = self.ask_bounded_number(&first_prompt, low, Some(high), hex)?;
        if first == high {
            self.say("You entered the maximum value possible already, so the range is complete.")?;
            return Ok(Range::single(first));
        }
        let second = self.ask_bounded_number(&second_prompt, first, Some(high), hex)?;
        Ok(Range::new(first, second))
    }

    fn ask_yes_no(&mut self, prompt: &str) -> Result<bool> {
        let answer = self.ask_bounded_choice(prompt, &["Y", "N", "YES", "NO"])?;
        Ok(answer.starts_with('Y'))
    }

    fn choose_destination_file(
        &mut self,
        prompt: &str,
        mode: FileMode,
        default: Option<&Path>,
        overwrite: bool,
    ) -> Result<Option<PathBuf>> {
        let mut candidate = default.map(Path::to_path_buf);
        loop {
            let path = match candidate.take() {
                Some(path) => path,
                None => {
                    let answer = self.ask(prompt)?;
                    if answer.is_empty() {
                        continue;
                    }
                    PathBuf::from(answer)
                }
            };
            let exists = path.exists();
            let accepted = match mode {
                FileMode::Read if exists => true,
                FileMode::Read => {
                    self.say(&format!(
                        "\"{}\" cannot be read as it doesn't exist.",
                        path.display()
                    ))?;
                    false
                }
                FileMode::Write if !exists => {
                    self.say(&format!("Writing to \"{}\".", path.display()))?;
                    true
                }
                FileMode::Write if overwrite => {
                    self.say(&format!("Automatically overwriting \"{}\".", path.display()))?;
                    true
                }
                FileMode::Write => self.ask_yes_no(&format!(
                    "File {} already exists. Overwrite? Y/N",
                    path.display()
                ))?,
            };
            if accepted {
                return Ok(Some(path));
            }
            if !self.ask_yes_no("Pick a different file? Y/N")? {
                return Ok(None);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn scripted(input: &str) -> TerminalPrompter<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalPrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn transcript(prompter: TerminalPrompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(prompter.into_output()).unwrap()
    }

    #[test]
    fn test_number_reprompts_until_valid() {
        let mut prompter = scripted("abc\n0\n300\n12\n");
        let number = prompter
            .ask_bounded_number("How many?", 1, Some(255), false)
            .unwrap();
        assert_eq!(number, 12);
        let text = transcript(prompter);
        assert!(text.contains("Could not parse \"abc\" as an int value."));
        assert!(text.contains("The minimum is 1, but you entered 0."));
        assert!(text.contains("The maximum is 255, but you entered 300."));
    }

    #[test]
    fn test_hex_numbers() {
        let mut prompter = scripted("zz\nff\n");
        let number = prompter
            .ask_bounded_number("Value?", 0, Some(0xFF), true)
            .unwrap();
        assert_eq!(number, 255);
        assert!(transcript(prompter).contains("It must be within 0 and FF."));
    }

    #[test]
    fn test_range_stops_at_maximum() {
        let mut prompter = scripted("64\n");
        let range = prompter
            .ask_range(["Lowest?", "Highest?"], 0, 64, None, false)
            .unwrap();
        assert_eq!(range, Range::single(64));

        let mut prompter = scripted("10\n5\n20\n");
        let range = prompter
            .ask_range(["Lowest?", "Highest?"], 0, 64, Some(Range::new(1, 2)), false)
            .unwrap();
        assert_eq!(range, Range::new(10, 20));
        assert!(transcript(prompter).contains("Lowest? Currently it's 1."));
    }

    #[test]
    fn test_yes_no_and_choice() {
        let mut prompter = scripted("maybe\nyes\nn\n");
        assert!(prompter.ask_yes_no("Continue?").unwrap());
        assert!(!prompter.ask_yes_no("Again?").unwrap());

        let mut prompter = scripted("b\n");
        assert_eq!(prompter.ask_bounded_choice("Pick", &["A", "B"]).unwrap(), "B");
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut prompter = scripted("");
        assert!(prompter.ask_yes_no("Continue?").is_err());
    }

    #[test]
    fn test_destination_file() {
        let dir = tempdir().unwrap();
        let existing = dir.path().join("output.txt");
        std::fs::write(&existing, "old").unwrap();

        let mut prompter = scripted("");
        let chosen = prompter
            .choose_destination_file("File?", FileMode::Write, Some(&existing), true)
            .unwrap();
        assert_eq!(chosen, Some(existing.clone()));

        let fresh = dir.path().join("fresh.txt");
        let mut prompter = scripted(&format!("n\ny\n{}\n", fresh.display()));
        let chosen = prompter
            .choose_destination_file("File?", FileMode::Write, Some(&existing), false)
            .unwrap();
        assert_eq!(chosen, Some(fresh));

        let mut prompter = scripted("n\n");
        let chosen = prompter
            .choose_destination_file(
                "File?",
                FileMode::Read,
                Some(&dir.path().join("missing.json")),
                false,
            )
            .unwrap();
        assert_eq!(chosen, None);
    }
}
