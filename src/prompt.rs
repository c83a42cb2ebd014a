//! Interactive question-and-answer session.
//!
//! One call to [`Session::ask`] walks the user through a single linear flow
//! and produces a [`RunRequest`]:
//!
//! ```text
//! ? Hi! Welcome to "Watermark manager". ... Are you ready? [Y/n]
//! ? What file do you want to mark? [MojaFota.jpg]
//! ? Watermark type: 1) Text watermark  2) Image watermark [1]
//! ? Type your watermark text:            (or: Type your watermark name: [logo.png])
//! ? Adjust the image first? none, brighten, contrast, greyscale, invert [none]
//! ? Intensity from -1.0 to 1.0 [0.5]     (brighten and contrast only)
//! ```
//!
//! Unparseable answers are asked again. Files are checked for existence as
//! soon as they are named; a missing file ends the round with
//! [`Outcome::Restart`]. The session itself never loops back; the caller
//! owns the outer loop.

use crate::config::PromptConfig;
use crate::imaging::{Intensity, ToneKind};
use crate::pipeline::{RunRequest, WatermarkSource};
use std::fs::File;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum FileCheckError {
    #[error("{} does not exist", .0.display())]
    Missing(PathBuf),
    #[error("Error opening file: {}", path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Confirm that `path` exists and can be opened for reading.
pub fn check_file_exists(path: &Path) -> Result<(), FileCheckError> {
    File::open(path).map(drop).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => FileCheckError::Missing(path.to_path_buf()),
        _ => FileCheckError::Unreadable {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

/// Result of one round of questions.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// All answers collected; run the pipeline.
    Run(RunRequest),
    /// A named file was unusable; start over.
    Restart,
    /// The user declined or input ended.
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MarkType {
    Text,
    Image,
}

/// Prompt session over any line-oriented input and writable output.
pub struct Session<R, W> {
    input: R,
    output: W,
    dir: PathBuf,
    defaults: PromptConfig,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// `dir` is the working image folder that file names are resolved against.
    pub fn new(input: R, output: W, dir: impl Into<PathBuf>, defaults: PromptConfig) -> Self {
        Self {
            input,
            output,
            dir: dir.into(),
            defaults,
        }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Ask one full round of questions.
    pub fn ask(&mut self) -> Result<Outcome, PromptError> {
        let welcome = format!(
            "Hi! Welcome to \"Watermark manager\". Copy your image files to `{}` folder. \
             Then you'll be able to use them in the app. Are you ready? [Y/n]",
            self.dir.display()
        );
        let Some(ready) = self.ask_parsed(&welcome, parse_yes_no)? else {
            return Ok(Outcome::Quit);
        };
        if !ready {
            return Ok(Outcome::Quit);
        }

        let default_input = self.defaults.default_input.clone();
        let Some(input_name) =
            self.ask_with_default("What file do you want to mark?", &default_input)?
        else {
            return Ok(Outcome::Quit);
        };
        let input = self.dir.join(&input_name);
        if !self.file_ok(&input)? {
            return Ok(Outcome::Restart);
        }

        let Some(mark_type) = self.ask_parsed(
            "Watermark type: 1) Text watermark  2) Image watermark [1]",
            parse_mark_type,
        )?
        else {
            return Ok(Outcome::Quit);
        };

        let watermark = match mark_type {
            MarkType::Text => {
                let Some(text) = self.read_answer("Type your watermark text:")? else {
                    return Ok(Outcome::Quit);
                };
                WatermarkSource::Text(text)
            }
            MarkType::Image => {
                let default_mark = self.defaults.default_watermark.clone();
                let Some(name) =
                    self.ask_with_default("Type your watermark name:", &default_mark)?
                else {
                    return Ok(Outcome::Quit);
                };
                let path = self.dir.join(&name);
                if !self.file_ok(&path)? {
                    return Ok(Outcome::Restart);
                }
                WatermarkSource::Image(path)
            }
        };

        let Some(kind) = self.ask_parsed(
            "Adjust the image first? none, brighten, contrast, greyscale, invert [none]",
            parse_tone_choice,
        )?
        else {
            return Ok(Outcome::Quit);
        };

        let adjustment = match kind {
            None => None,
            Some(kind) if kind.takes_intensity() => {
                let Some(intensity) =
                    self.ask_parsed("Intensity from -1.0 to 1.0 [0.5]", parse_intensity)?
                else {
                    return Ok(Outcome::Quit);
                };
                Some(kind.with_intensity(intensity))
            }
            Some(kind) => Some(kind.with_intensity(Intensity::default())),
        };

        Ok(Outcome::Run(RunRequest {
            input,
            adjustment,
            watermark,
        }))
    }

    /// Print a question and read one line. `None` at end of input.
    fn read_answer(&mut self, question: &str) -> Result<Option<String>, PromptError> {
        write!(self.output, "? {} ", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Like [`read_answer`](Self::read_answer), substituting `default` for a
    /// blank answer.
    fn ask_with_default(
        &mut self,
        question: &str,
        default: &str,
    ) -> Result<Option<String>, PromptError> {
        let question = format!("{} [{}]", question, default);
        Ok(self.read_answer(&question)?.map(|answer| {
            let answer = answer.trim();
            if answer.is_empty() {
                default.to_string()
            } else {
                answer.to_string()
            }
        }))
    }

    /// Ask until `parse` accepts the answer.
    fn ask_parsed<T>(
        &mut self,
        question: &str,
        parse: impl Fn(&str) -> Result<T, String>,
    ) -> Result<Option<T>, PromptError> {
        loop {
            let Some(answer) = self.read_answer(question)? else {
                return Ok(None);
            };
            match parse(answer.trim()) {
                Ok(value) => return Ok(Some(value)),
                Err(msg) => writeln!(self.output, ">> {}", msg)?,
            }
        }
    }

    /// Report an unusable file. Returns whether the file is fine.
    fn file_ok(&mut self, path: &Path) -> Result<bool, PromptError> {
        match check_file_exists(path) {
            Ok(()) => Ok(true),
            Err(e) => {
                writeln!(self.output, "{}", e)?;
                Ok(false)
            }
        }
    }
}

fn parse_yes_no(answer: &str) -> Result<bool, String> {
    match answer.to_ascii_lowercase().as_str() {
        "" | "y" | "yes" => Ok(true),
        "n" | "no" => Ok(false),
        _ => Err("Please answer y or n".to_string()),
    }
}

fn parse_mark_type(answer: &str) -> Result<MarkType, String> {
    match answer.to_ascii_lowercase().as_str() {
        "" | "1" | "t" | "text" => Ok(MarkType::Text),
        "2" | "i" | "image" => Ok(MarkType::Image),
        _ => Err("Please choose 1 (text) or 2 (image)".to_string()),
    }
}

fn parse_tone_choice(answer: &str) -> Result<Option<ToneKind>, String> {
    match answer.to_ascii_lowercase().as_str() {
        "" | "none" | "no" | "n" => Ok(None),
        other => other.parse::<ToneKind>().map(Some),
    }
}

fn parse_intensity(answer: &str) -> Result<Intensity, String> {
    if answer.is_empty() {
        return Ok(Intensity::default());
    }
    let value: f32 = answer
        .parse()
        .map_err(|_| format!("'{answer}' is not a number"))?;
    if !(-1.0..=1.0).contains(&value) {
        return Err("Intensity must be between -1.0 and 1.0".to_string());
    }
    Ok(Intensity::new(value))
}
