//! Interactive prompting for missing inputs.
//!
//! Reads from any `BufRead` and writes to any `Write`, so the whole flow is
//! testable without a terminal. Callers decide whether a terminal is
//! attached before constructing a prompter.

use std::io::{BufRead, Write};

use serde_json::Value;

use helix_proto::{BaseClass, InputParam};

use crate::error::CliError;
use crate::inputs::{ExecutableInputs, InputParser};

/// Interactive input prompter.
pub struct Prompter<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Create a prompter over a reader/writer pair.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Prompt for every missing required input; when nothing was supplied at
    /// all and optional parameters exist, offer the optional-parameter menu
    /// afterwards.
    ///
    /// No-op for executables without an input spec.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Cancelled`] when the user ends input on a
    /// required parameter, or any IO error.
    pub async fn prompt_for_missing(
        &mut self,
        inputs: &mut ExecutableInputs<'_>,
    ) -> Result<(), CliError> {
        if !inputs.has_input_spec() {
            return Ok(());
        }
        let no_prior_inputs = inputs.is_empty();
        let parser = inputs.parser();

        for name in inputs.required_names() {
            if inputs.is_set(&name) {
                continue;
            }
            if inputs.is_empty() {
                writeln!(self.writer, "Entering interactive mode for input selection.")?;
            }
            let param = match inputs.spec_param(&name) {
                Some(param) => param.clone(),
                None => continue,
            };
            let value = self.prompt_for_input(parser, &param).await?;
            inputs.set(name, value);
        }

        if no_prior_inputs && !inputs.optional_names().is_empty() {
            self.prompt_for_optional(inputs).await?;
        }
        Ok(())
    }

    /// Prompt for one parameter, array or scalar per its class.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Cancelled`] on EOF for scalar parameters, or any
    /// IO error.
    pub async fn prompt_for_input(
        &mut self,
        parser: InputParser<'_>,
        param: &InputParam,
    ) -> Result<Value, CliError> {
        self.show_header(param)?;
        if param.class.array {
            self.prompt_array(parser, param).await
        } else {
            self.prompt_single(parser, param).await
        }
    }

    async fn prompt_single(
        &mut self,
        parser: InputParser<'_>,
        param: &InputParam,
    ) -> Result<Value, CliError> {
        let hint = if param.class.base.is_data_class() {
            "ID or path"
        } else {
            "value"
        };
        writeln!(
            self.writer,
            "Enter {} {hint} ('?' for help)",
            param.class.base
        )?;
        loop {
            write!(self.writer, "{}: ", param.name)?;
            self.writer.flush()?;
            let line = match self.read_line()? {
                Some(line) => line,
                None => return Err(CliError::Cancelled),
            };
            if line == "?" {
                self.show_help(param)?;
                continue;
            }
            let token = match self.single_token(param, &line)? {
                Some(token) => token,
                None => continue,
            };
            match parser.parse_input_or_jor(param.class, &token).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    writeln!(
                        self.writer,
                        "Error occurred when parsing for class {}: {e}",
                        param.class
                    )?;
                }
            }
        }
    }

    async fn prompt_array(
        &mut self,
        parser: InputParser<'_>,
        param: &InputParam,
    ) -> Result<Value, CliError> {
        writeln!(
            self.writer,
            "Enter {} values, one per line (empty line to finish, '?' for help)",
            param.class.base
        )?;
        let mut values = Vec::new();
        loop {
            write!(self.writer, "{}[{}]: ", param.name, values.len())?;
            self.writer.flush()?;
            let line = match self.read_line()? {
                Some(line) => line,
                None => return Ok(Value::Array(values)),
            };
            if line.is_empty() {
                return Ok(Value::Array(values));
            }
            if line == "?" {
                self.show_help(param)?;
                continue;
            }
            match parser.parse_input_or_jor(param.class, &line).await {
                Ok(value) => values.push(value),
                Err(e) => {
                    writeln!(
                        self.writer,
                        "Error occurred when parsing for class {}: {e}",
                        param.class
                    )?;
                }
            }
        }
    }

    async fn prompt_for_optional(
        &mut self,
        inputs: &mut ExecutableInputs<'_>,
    ) -> Result<(), CliError> {
        let parser = inputs.parser();
        let optional = inputs.optional_names();
        loop {
            writeln!(self.writer)?;
            writeln!(
                self.writer,
                "Select an optional parameter to set by its # (<ENTER> to finish):"
            )?;
            writeln!(self.writer)?;
            for (index, name) in optional.iter().enumerate() {
                let Some(param) = inputs.spec_param(name) else {
                    continue;
                };
                let mut entry = format!(" [{index}] {} ({name})", param.display_name());
                if let Some(current) = inputs.get(name) {
                    entry.push_str(&format!(" [={current}]"));
                } else if let Some(default) = &param.default {
                    entry.push_str(&format!(" [default={default}]"));
                }
                writeln!(self.writer, "{entry}")?;
            }
            writeln!(self.writer)?;

            let selection = loop {
                write!(self.writer, "Optional param #: ")?;
                self.writer.flush()?;
                let line = match self.read_line()? {
                    Some(line) => line,
                    None => return Ok(()),
                };
                if line.is_empty() {
                    return Ok(());
                }
                match line.parse::<usize>() {
                    Ok(index) if index < optional.len() => break index,
                    _ => writeln!(self.writer, "Error: selection is out of range")?,
                }
            };

            let name = optional[selection].clone();
            let param = match inputs.spec_param(&name) {
                Some(param) => param.clone(),
                None => continue,
            };
            // A cancelled entry returns to the menu rather than aborting.
            match self.prompt_for_input(parser, &param).await {
                Ok(value) => inputs.set(name, value),
                Err(CliError::Cancelled) => {}
                Err(e) => return Err(e),
            }
        }
    }

    fn show_header(&mut self, param: &InputParam) -> Result<(), CliError> {
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "Input:   {} ({})",
            param.display_name(),
            param.name
        )?;
        writeln!(self.writer, "Class:   {}", param.class)?;
        if let Some(type_spec) = &param.type_spec {
            writeln!(self.writer, "Type(s): {type_spec}")?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    fn show_help(&mut self, param: &InputParam) -> Result<(), CliError> {
        let help = param.help.as_deref().unwrap_or("<no extra help available>");
        writeln!(self.writer, "  {}: {help}", param.display_name())?;
        if param.class.base == BaseClass::Boolean {
            writeln!(self.writer, "  Enter \"true\" or \"false\"")?;
        }
        Ok(())
    }

    // Multiple whitespace-separated tokens are almost always a mistake for
    // non-string classes; strings take the line verbatim.
    fn single_token(
        &mut self,
        param: &InputParam,
        line: &str,
    ) -> Result<Option<String>, CliError> {
        if param.class.base == BaseClass::String {
            return Ok(Some(line.to_string()));
        }
        let mut tokens = line.split_whitespace();
        let first = tokens.next().unwrap_or("").to_string();
        if tokens.next().is_some() {
            writeln!(
                self.writer,
                "Error: more than one argument given. Please quote your entire input."
            )?;
            return Ok(None);
        }
        Ok(Some(first))
    }

    fn read_line(&mut self) -> Result<Option<String>, CliError> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(
            line.trim_end_matches(['\n', '\r']).to_string(),
        ))
    }
}
